//! Sample-cadence trigger.
//!
//! Alarm 0 of the hardware timer paces the acquisition loop. Deadlines
//! are spaced start-to-start: the next one is derived from the previous
//! deadline rather than from the moment the handler ran, so handler
//! latency does not accumulate into the cadence.

use hal::timer::Alarm;

use pipeline::PipelineShared;

use super::design_parameters::SAMPLE_PERIOD;
use super::{hal, Instant};

pub struct SampleClock {
    alarm: hal::timer::Alarm0,
    timer: hal::Timer,
    deadline: Instant,
}

impl SampleClock {
    pub fn new(timer: hal::Timer, alarm: hal::timer::Alarm0) -> Self {
        Self {
            alarm,
            timer,
            deadline: Instant::from_ticks(0),
        }
    }

    /// Arm the first deadline and enable the alarm interrupt.
    pub fn start(&mut self) {
        self.deadline = self.timer.get_counter() + SAMPLE_PERIOD;
        self.alarm.schedule_at(self.deadline).unwrap();
        self.alarm.enable_interrupt();
    }

    /// Alarm interrupt body: advance the tick and re-arm.
    ///
    /// Stays O(1) and never calls into acquisition or processing.
    pub fn on_tick(&mut self, shared: &PipelineShared) {
        self.alarm.clear_interrupt();
        shared.advance_tick();

        self.deadline += SAMPLE_PERIOD;
        // A deadline in the past cannot be armed; skip whole periods until
        // the next one is in the future.
        let now = self.timer.get_counter();
        while self.deadline <= now {
            self.deadline += SAMPLE_PERIOD;
        }
        // A dead alarm would stall acquisition forever with the output
        // still running; a failed re-arm is a fatal fault, not a skipped
        // tick.
        self.alarm.schedule_at(self.deadline).unwrap();
    }
}
