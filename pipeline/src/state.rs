//! State shared between the acquisition loop and the interrupt handlers.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Cross-context pipeline state.
///
/// Every field is a word-sized atomic: the output slot is read from the
/// PWM wrap interrupt at arbitrary instruction boundaries, and the tick
/// counter is written from the alarm interrupt while the acquisition loop
/// polls it. Plain loads and stores only; the cores this runs on (ARMv6-M)
/// have no read-modify-write atomics, so each counter has exactly one
/// writer.
pub struct PipelineShared {
    tick: AtomicU32,
    output: AtomicU32,
    starved: AtomicU32,
    halted: AtomicBool,
}

impl PipelineShared {
    pub const fn new() -> Self {
        Self {
            tick: AtomicU32::new(0),
            output: AtomicU32::new(0),
            starved: AtomicU32::new(0),
            halted: AtomicBool::new(false),
        }
    }

    /// Advance the sample tick. Single writer: the sample clock interrupt.
    pub fn advance_tick(&self) {
        let t = self.tick.load(Ordering::Relaxed);
        self.tick.store(t.wrapping_add(1), Ordering::Relaxed);
    }

    pub fn tick_count(&self) -> u32 {
        self.tick.load(Ordering::Relaxed)
    }

    /// Publish the most recently processed sample for output regeneration.
    pub fn store_output(&self, sample: u16) {
        self.output.store(sample as u32, Ordering::Release);
    }

    pub fn output(&self) -> u16 {
        self.output.load(Ordering::Acquire) as u16
    }

    /// Record one missed processing deadline and return the running total.
    /// Single writer: the acquisition loop.
    pub fn record_starvation(&self) -> u32 {
        let n = self.starved.load(Ordering::Relaxed).wrapping_add(1);
        self.starved.store(n, Ordering::Relaxed);
        n
    }

    pub fn starvation_count(&self) -> u32 {
        self.starved.load(Ordering::Relaxed)
    }

    /// Latch the fatal-fault flag; output regeneration emits silence from
    /// the next wrap onward.
    pub fn halt(&self) {
        self.halted.store(true, Ordering::Release);
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }
}

impl Default for PipelineShared {
    fn default() -> Self {
        Self::new()
    }
}

/// Edge detector over the sample tick.
///
/// The acquisition loop compares the counter against the value it last
/// latched, so it reacts exactly once per trigger firing and never to a
/// firing that happened before the detector was armed.
pub struct TickEdge {
    last: u32,
}

impl TickEdge {
    pub fn new(shared: &PipelineShared) -> Self {
        Self {
            last: shared.tick_count(),
        }
    }

    /// True exactly once per tick advance.
    pub fn poll(&mut self, shared: &PipelineShared) -> bool {
        let t = shared.tick_count();
        if t == self.last {
            return false;
        }
        self.last = t;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_advances_once_per_firing() {
        let shared = PipelineShared::new();
        for n in 1..=5 {
            shared.advance_tick();
            assert_eq!(shared.tick_count(), n);
        }
    }

    #[test]
    fn edge_fires_once_per_advance_and_never_early() {
        let shared = PipelineShared::new();
        let mut edge = TickEdge::new(&shared);
        assert!(!edge.poll(&shared));
        for _ in 0..3 {
            shared.advance_tick();
            assert!(edge.poll(&shared));
            assert!(!edge.poll(&shared));
            assert!(!edge.poll(&shared));
        }
    }

    #[test]
    fn edge_ignores_firings_before_arming() {
        let shared = PipelineShared::new();
        shared.advance_tick();
        shared.advance_tick();
        let mut edge = TickEdge::new(&shared);
        assert!(!edge.poll(&shared));
        shared.advance_tick();
        assert!(edge.poll(&shared));
    }

    #[test]
    fn output_slot_roundtrip() {
        let shared = PipelineShared::new();
        assert_eq!(shared.output(), 0);
        shared.store_output(320);
        assert_eq!(shared.output(), 320);
    }

    #[test]
    fn starvation_counter() {
        let shared = PipelineShared::new();
        assert_eq!(shared.starvation_count(), 0);
        assert_eq!(shared.record_starvation(), 1);
        assert_eq!(shared.record_starvation(), 2);
        assert_eq!(shared.starvation_count(), 2);
    }

    #[test]
    fn halt_latches() {
        let shared = PipelineShared::new();
        assert!(!shared.is_halted());
        shared.halt();
        assert!(shared.is_halted());
    }
}
