//! Hardware-specific setup and drivers for the pedal.
pub use rp2040_hal as hal;

pub use hal::pac;

mod adc;
mod dac;
pub mod design_parameters;
mod link;
mod sample_clock;
mod setup;

pub use adc::AdcInput;
pub use dac::DacOutput;
pub use link::CoreLink;
pub use sample_clock::SampleClock;
pub use setup::{setup, PedalDevices};

/// An instant on the 1 MHz hardware timer.
pub type Instant = fugit::TimerInstantU64<1_000_000>;

/// Chip select for the ADC, driven manually around each exchange.
pub type AdcCs = hal::gpio::Pin<
    hal::gpio::bank0::Gpio17,
    hal::gpio::FunctionSioOutput,
    hal::gpio::PullNone,
>;

/// (MOSI, MISO, SCK) pinout of the ADC port.
pub type AdcSpiPins = (
    hal::gpio::Pin<hal::gpio::bank0::Gpio19, hal::gpio::FunctionSpi, hal::gpio::PullNone>,
    hal::gpio::Pin<hal::gpio::bank0::Gpio16, hal::gpio::FunctionSpi, hal::gpio::PullNone>,
    hal::gpio::Pin<hal::gpio::bank0::Gpio18, hal::gpio::FunctionSpi, hal::gpio::PullNone>,
);

pub type AdcSpi = hal::spi::Spi<hal::spi::Enabled, pac::SPI0, AdcSpiPins>;

/// The PWM slice regenerating the analog output level.
pub type OutputSlice = hal::pwm::Slice<hal::pwm::Pwm0, hal::pwm::FreeRunning>;

#[inline(never)]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    use core::{
        fmt::Write,
        sync::atomic::{AtomicBool, Ordering},
    };
    use cortex_m::asm;
    use rtt_target::{ChannelMode, UpChannel};

    cortex_m::interrupt::disable();

    // Recursion protection
    static PANICKED: AtomicBool = AtomicBool::new(false);
    while PANICKED.load(Ordering::Relaxed) {
        asm::bkpt();
    }
    PANICKED.store(true, Ordering::Relaxed);

    // The wrap interrupt no longer runs; force the duty register to zero
    // directly so the output stage emits silence instead of replaying the
    // last sample.
    let pwm = unsafe { &*pac::PWM::ptr() };
    pwm.ch(0).cc().modify(|_, w| unsafe { w.a().bits(0) });

    // Analogous to panic-rtt-target
    if let Some(mut channel) = unsafe { UpChannel::conjure(0) } {
        channel.set_mode(ChannelMode::BlockIfFull);
        writeln!(channel, "{}", info).ok();
    }

    // Abort
    asm::udf();
}

#[cortex_m_rt::exception]
unsafe fn HardFault(ef: &cortex_m_rt::ExceptionFrame) -> ! {
    panic!("HardFault at {:#?}", ef);
}

#[cortex_m_rt::exception]
unsafe fn DefaultHandler(irqn: i16) {
    panic!("Unhandled exception (IRQn = {})", irqn);
}
