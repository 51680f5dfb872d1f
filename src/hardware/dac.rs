//! Output regeneration through PWM.
//!
//! PWM slice 0 approximates the analog output level. Its wrap interrupt
//! fires at the slice's own wrap rate (~62 kHz in the reference
//! configuration), decoupled from the sample cadence, and copies the
//! latest processed sample into the duty-cycle register. Observing one
//! sample several times between updates is an oversampling artifact, not
//! an error.

use embedded_hal::pwm::SetDutyCycle;

use pipeline::{duty_code, PipelineShared};

use super::OutputSlice;

pub struct DacOutput {
    slice: OutputSlice,
}

impl DacOutput {
    /// Take over a configured, enabled slice.
    pub fn new(slice: OutputSlice) -> Self {
        Self { slice }
    }

    /// Wrap interrupt body: refresh the duty-cycle register.
    ///
    /// One register read and one register write, nothing that can block.
    /// A halted pipeline is regenerated as silence.
    pub fn refresh(&mut self, shared: &PipelineShared) {
        self.slice.clear_interrupt();
        let duty = if shared.is_halted() {
            0
        } else {
            duty_code(shared.output())
        };
        self.slice.channel_a.set_duty_cycle(duty).unwrap();
    }
}
