//! Startup timing validation.

use crate::{duty_code, AdcCode, Error};

/// Timing parameters shared by the sample clock, the spin-wait and the
/// output stage. Validated once before the pipeline is allowed to start.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimingConfig {
    /// System clock feeding the PWM counter, in Hz.
    pub sysclk_hz: u32,
    /// PWM wrap (TOP) value; also the native output resolution.
    pub pwm_top: u16,
    /// PWM integer clock divider.
    pub pwm_div: u8,
    /// Sample period in microseconds.
    pub sample_period_us: u32,
}

impl TimingConfig {
    /// Frequency of the wrap event, i.e. of output regeneration.
    pub fn pwm_wrap_hz(&self) -> u32 {
        self.sysclk_hz / (self.pwm_div as u32 * (self.pwm_top as u32 + 1))
    }

    /// Acquisition sample rate.
    pub fn sample_rate_hz(&self) -> u32 {
        1_000_000 / self.sample_period_us
    }

    /// Reject configurations that cannot regenerate every sample.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sample_period_us == 0 {
            return Err(Error::Configuration("sample period is zero"));
        }
        if self.pwm_div == 0 {
            return Err(Error::Configuration("PWM divider is zero"));
        }
        if duty_code(AdcCode::MAX) > self.pwm_top {
            return Err(Error::Configuration(
                "full-scale duty code exceeds the PWM wrap value",
            ));
        }
        if self.pwm_wrap_hz() < self.sample_rate_hz() {
            return Err(Error::Configuration(
                "PWM wraps slower than the sample rate",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> TimingConfig {
        TimingConfig {
            sysclk_hz: 125_000_000,
            pwm_top: 2000,
            pwm_div: 1,
            sample_period_us: 45,
        }
    }

    #[test]
    fn reference_configuration_is_accepted() {
        let config = reference();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.sample_rate_hz(), 22_222);
        assert_eq!(config.pwm_wrap_hz(), 62_468);
    }

    #[test]
    fn zero_sample_period_is_rejected() {
        let config = TimingConfig {
            sample_period_us: 0,
            ..reference()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn wrap_slower_than_sample_rate_is_rejected() {
        let config = TimingConfig {
            pwm_top: 65_535,
            pwm_div: 255,
            ..reference()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn wrap_below_full_scale_duty_is_rejected() {
        // duty_code(AdcCode::MAX) = 574.
        let config = TimingConfig {
            pwm_top: 500,
            ..reference()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }
}
