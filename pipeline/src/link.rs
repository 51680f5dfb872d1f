//! Cross-core sample handoff.
//!
//! Two independent single-producer single-consumer directions form a
//! full-duplex pipe: acquisition pushes raw input and pops processed
//! output, processing pops input and pushes output. Each side pushes
//! exactly once per pop, so a direction never holds more than one sample
//! in flight and strict FIFO order is preserved without a lock.

use crate::{Error, Transform};

/// Value the processing side pushes before its first pop.
///
/// The acquisition loop pops before it pushes, so without this primer both
/// sides would block on each other's first cycle.
pub const PRIMER_SAMPLE: u16 = 0;

/// One end of the inter-core pipe.
pub trait SampleLink {
    /// Push one sample towards the peer. May block while the slot is
    /// full; under the one-push-one-pop protocol it never does.
    fn send(&mut self, sample: u16);

    /// Pop one sample from the peer if one is waiting.
    fn try_recv(&mut self) -> Option<u16>;

    /// Pop one sample, spinning until the peer delivers.
    fn recv(&mut self) -> u16 {
        loop {
            if let Some(sample) = self.try_recv() {
                return sample;
            }
            core::hint::spin_loop();
        }
    }
}

/// Push the synchronization primer. Must precede the acquisition side's
/// first pop.
pub fn prime<L: SampleLink>(link: &mut L) {
    link.send(PRIMER_SAMPLE);
}

/// One acquisition cycle: pop the previously processed sample, then push
/// the new input.
///
/// `pop` carries the caller's deadline policy; a plain `try_recv` gives a
/// zero-length window, a spinning pop a longer one. When it comes back
/// empty the push is skipped as well: pushing into a starved cycle would
/// leave two samples in flight in one direction and desynchronize the
/// stream permanently, while the balanced skip lets the pipe recover on
/// its own once the peer catches up. The caller holds its last output for
/// the starved period.
pub fn acquire_cycle<L, P>(link: &mut L, input: u16, pop: P) -> Result<u16, Error>
where
    L: SampleLink,
    P: FnOnce(&mut L) -> Option<u16>,
{
    match pop(link) {
        Some(output) => {
            link.send(input);
            Ok(output)
        }
        None => Err(Error::PipelineStarvation),
    }
}

/// One processing cycle: pop an unprocessed sample, transform it, push the
/// result back.
pub fn process_one<L: SampleLink, T: Transform>(link: &mut L, effect: &mut T) {
    let raw = link.recv();
    link.send(effect.apply(raw));
}

/// Processing-core forever loop.
pub fn run<L: SampleLink, T: Transform>(mut link: L, mut effect: T) -> ! {
    prime(&mut link);
    loop {
        process_one(&mut link, &mut effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bypass;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Capacity-1 slot; panics on overwrite so a protocol violation shows
    /// up as a test failure instead of a silently dropped sample.
    type Slot = Rc<RefCell<Option<u16>>>;

    struct End {
        tx: Slot,
        rx: Slot,
    }

    impl SampleLink for End {
        fn send(&mut self, sample: u16) {
            let mut slot = self.tx.borrow_mut();
            assert!(slot.is_none(), "slot overwritten before being consumed");
            *slot = Some(sample);
        }

        fn try_recv(&mut self) -> Option<u16> {
            self.rx.borrow_mut().take()
        }
    }

    fn duplex() -> (End, End) {
        let a = Slot::default();
        let b = Slot::default();
        (
            End {
                tx: a.clone(),
                rx: b.clone(),
            },
            End { tx: b, rx: a },
        )
    }

    #[test]
    fn primer_arrives_before_first_pop() {
        let (mut acq, mut proc) = duplex();
        prime(&mut proc);
        assert_eq!(acq.try_recv(), Some(PRIMER_SAMPLE));
    }

    #[test]
    fn identity_stream_is_delayed_by_one_cycle() {
        let (mut acq, mut proc) = duplex();
        let mut effect = Bypass;
        prime(&mut proc);
        let mut observed = vec![];
        for input in [10, 20, 30] {
            // Pop-before-push: the value observed here was produced one
            // full cycle earlier.
            observed.push(acq.recv());
            acq.send(input);
            process_one(&mut proc, &mut effect);
        }
        observed.push(acq.recv());
        assert_eq!(observed, [PRIMER_SAMPLE, 10, 20, 30]);
    }

    #[test]
    fn fifo_order_no_drop_no_duplicate() {
        let (mut acq, mut proc) = duplex();
        let mut effect = Bypass;
        prime(&mut proc);
        let inputs: Vec<u16> = (0..257u32).map(|i| (i * 31 + 7) as u16).collect();
        let mut observed = vec![];
        for &input in &inputs {
            observed.push(acq.recv());
            acq.send(input);
            process_one(&mut proc, &mut effect);
        }
        observed.push(acq.recv());
        assert_eq!(observed[0], PRIMER_SAMPLE);
        assert_eq!(&observed[1..], &inputs[..]);
    }

    #[test]
    fn acquire_cycle_pairs_one_pop_with_one_push() {
        let (mut acq, mut proc) = duplex();
        let mut effect = Bypass;
        prime(&mut proc);

        assert_eq!(acquire_cycle(&mut acq, 10, |l| l.try_recv()), Ok(PRIMER_SAMPLE));
        process_one(&mut proc, &mut effect);
        assert_eq!(acquire_cycle(&mut acq, 20, |l| l.try_recv()), Ok(10));
    }

    #[test]
    fn starved_cycle_skips_push_and_resynchronizes() {
        let (mut acq, mut proc) = duplex();
        let mut effect = Bypass;
        prime(&mut proc);

        assert_eq!(acquire_cycle(&mut acq, 10, |l| l.try_recv()), Ok(PRIMER_SAMPLE));

        // The processing side misses this period entirely: the pop window
        // closes empty, the caller holds its last output and input 20 is
        // never pushed.
        assert_eq!(
            acquire_cycle(&mut acq, 20, |l| l.try_recv()),
            Err(Error::PipelineStarvation)
        );

        // The skipped push left exactly one sample in flight for the late
        // processing pass.
        process_one(&mut proc, &mut effect);

        // The stream resumes in order, without duplicating the held
        // sample: the late result, then each subsequent input.
        assert_eq!(acquire_cycle(&mut acq, 30, |l| l.try_recv()), Ok(10));
        process_one(&mut proc, &mut effect);
        assert_eq!(acquire_cycle(&mut acq, 40, |l| l.try_recv()), Ok(30));
        process_one(&mut proc, &mut effect);
        assert_eq!(acquire_cycle(&mut acq, 50, |l| l.try_recv()), Ok(40));
    }

    #[test]
    fn transform_applied_once_per_sample() {
        let (mut acq, mut proc) = duplex();
        let mut count = 0u32;
        let mut effect = |s: u16| {
            count += 1;
            s.wrapping_add(1)
        };
        prime(&mut proc);
        for input in [10, 20, 30] {
            acq.recv();
            acq.send(input);
            process_one(&mut proc, &mut effect);
        }
        assert_eq!(acq.recv(), 31);
        assert_eq!(count, 3);
    }
}
