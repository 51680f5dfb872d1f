//! Fixed operating parameters of the sample pipeline.

use fugit::MicrosDurationU64;

/// External crystal on the Pico board.
pub const XOSC_FREQUENCY_HZ: u32 = 12_000_000;

/// SPI clock for the ADC exchange. A hardware limit of the converter.
pub const ADC_SCK_HZ: u32 = 4_000_000;

/// Command byte opening every exchange; the high bit flags a read request
/// per the converter's convention.
pub const READ_BIT: u8 = 0x80;

/// Scaling base for the sample-period derivation.
pub const BASE_INTERVAL_US: u64 = 10_000;

/// Sample-rate scale; together with [`BASE_INTERVAL_US`] this pins the
/// period at 45 us (~22.2 kHz).
pub const SAMPLE_RATE_SCALE: u64 = 220;

/// The sample period: the single source of truth for the acquisition
/// cadence and for every deadline derived from it.
pub const SAMPLE_PERIOD: MicrosDurationU64 =
    MicrosDurationU64::micros(BASE_INTERVAL_US / SAMPLE_RATE_SCALE);

/// Deadline for one full ADC exchange. The two-byte frame takes 4 us on
/// the wire; a stalled or absent converter trips this instead of hanging
/// the acquisition loop.
pub const EXCHANGE_DEADLINE: MicrosDurationU64 = SAMPLE_PERIOD;

/// How long the acquisition loop waits for the processing core before
/// declaring the cycle starved.
pub const STARVATION_DEADLINE: MicrosDurationU64 = SAMPLE_PERIOD;

/// PWM wrap value: the native output resolution, stretched by the
/// coarse/fine duty split.
pub const PWM_TOP: u16 = 2000;

/// PWM integer clock divider; the counter runs at the full system clock.
pub const PWM_DIV_INT: u8 = 1;
