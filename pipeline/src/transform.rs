//! Pluggable per-sample transforms.
//!
//! A transform runs entirely on the processing core. It may keep state
//! (filters, envelopes), but that state is owned exclusively by the
//! processing loop and never shared across cores.

/// One effect stage: one sample in, one sample out.
///
/// Implementations must be non-blocking and bounded; the budget is a
/// single sample period, and the same input must always yield the same
/// output for the same internal state.
pub trait Transform {
    fn apply(&mut self, sample: u16) -> u16;
}

/// Identity placeholder used until a real effect is selected.
#[derive(Debug, Default, Copy, Clone)]
pub struct Bypass;

impl Transform for Bypass {
    fn apply(&mut self, sample: u16) -> u16 {
        sample
    }
}

impl<F: FnMut(u16) -> u16> Transform for F {
    fn apply(&mut self, sample: u16) -> u16 {
        self(sample)
    }
}
