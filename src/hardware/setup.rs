//! Pedal hardware bring-up.
//!
//! Everything target-specific that happens before the two forever-loops
//! start lives here: clocks, the ADC SPI port, the PWM output stage, the
//! sample clock, the timing sanity check and the launch of the processing
//! core.

use core::ptr::addr_of_mut;

use embedded_hal::digital::OutputPin;
use hal::clocks::Clock;
use hal::fugit::RateExtU32;
use hal::multicore::{Multicore, Stack};
use hal::Sio;

use pipeline::TimingConfig;

use super::design_parameters::{
    ADC_SCK_HZ, PWM_DIV_INT, PWM_TOP, SAMPLE_PERIOD, XOSC_FREQUENCY_HZ,
};
use super::{hal, pac, AdcCs, AdcInput, AdcSpi, AdcSpiPins, CoreLink, DacOutput, SampleClock};

/// Stack for the processing core.
static mut CORE1_STACK: Stack<4096> = Stack::new();

/// The hardware interfaces of the pedal, ready to run.
pub struct PedalDevices {
    pub adc: AdcInput,
    pub dac: DacOutput,
    pub sample_clock: SampleClock,
    pub link: CoreLink,
    pub timer: hal::Timer,
}

/// Configure the pedal hardware.
///
/// Validates the timing configuration (refusing to start, before any
/// output is enabled, on a mismatch) and launches `core1_entry` on the
/// second core so its primer push precedes the acquisition loop's first
/// pop.
pub fn setup(mut device: pac::Peripherals, core1_entry: fn() -> !) -> PedalDevices {
    // RTT logging first so every later step can report.
    rtt_target::rtt_init_print!();
    static LOGGER: rtt_logger::RTTLogger =
        rtt_logger::RTTLogger::new(log::LevelFilter::Info);
    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(log::LevelFilter::Trace))
        .unwrap();
    log::info!("Starting");

    let mut watchdog = hal::Watchdog::new(device.WATCHDOG);
    let clocks = hal::clocks::init_clocks_and_plls(
        XOSC_FREQUENCY_HZ,
        device.XOSC,
        device.CLOCKS,
        device.PLL_SYS,
        device.PLL_USB,
        &mut device.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let config = TimingConfig {
        sysclk_hz: clocks.system_clock.freq().to_Hz(),
        pwm_top: PWM_TOP,
        pwm_div: PWM_DIV_INT,
        sample_period_us: SAMPLE_PERIOD.to_micros() as u32,
    };
    if let Err(error) = config.validate() {
        panic!("refusing to start: {}", error);
    }
    log::info!(
        "{} Hz sample rate, {} Hz output regeneration",
        config.sample_rate_hz(),
        config.pwm_wrap_hz()
    );

    let mut sio = Sio::new(device.SIO);
    let pins = hal::gpio::Pins::new(
        device.IO_BANK0,
        device.PADS_BANK0,
        sio.gpio_bank0,
        &mut device.RESETS,
    );

    // Output stage: PWM slice 0, channel A on GPIO0.
    let slices = hal::pwm::Slices::new(device.PWM, &mut device.RESETS);
    let mut slice = slices.pwm0;
    slice.set_top(PWM_TOP);
    slice.set_div_int(PWM_DIV_INT);
    slice.set_div_frac(0);
    slice.clear_interrupt();
    slice.enable_interrupt();
    slice.channel_a.output_to(pins.gpio0);
    slice.enable();

    // ADC port: SPI0 at the converter's fixed clock, CS driven manually.
    let spi_pins: AdcSpiPins = (
        pins.gpio19.reconfigure(),
        pins.gpio16.reconfigure(),
        pins.gpio18.reconfigure(),
    );
    let spi: AdcSpi = hal::spi::Spi::<_, _, _, 8>::new(device.SPI0, spi_pins).init(
        &mut device.RESETS,
        clocks.peripheral_clock.freq(),
        ADC_SCK_HZ.Hz(),
        embedded_hal::spi::MODE_0,
    );
    let mut cs: AdcCs = pins.gpio17.reconfigure();
    cs.set_high().unwrap();

    let mut timer = hal::Timer::new(device.TIMER, &mut device.RESETS, &clocks);
    let alarm = timer.alarm_0().unwrap();

    // Launch the processing core. Its primer push sits in the FIFO before
    // acquisition performs its first pop.
    let mut mc = Multicore::new(&mut device.PSM, &mut device.PPB, &mut sio.fifo);
    let stack = unsafe { &mut *addr_of_mut!(CORE1_STACK.mem) };
    mc.cores()[1].spawn(stack, move || core1_entry()).unwrap();

    PedalDevices {
        adc: AdcInput::new(spi, cs, timer),
        dac: DacOutput::new(slice),
        sample_clock: SampleClock::new(timer, alarm),
        link: CoreLink::new(sio.fifo),
        timer,
    }
}
