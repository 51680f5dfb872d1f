//! Dual-core audio sample pipeline.
//!
//! Core 0 acquires one ADC sample per period, hands it to core 1 through
//! the inter-core FIFOs and pops the previously processed sample back;
//! the PWM wrap interrupt regenerates the analog output level from the
//! most recent processed sample, asynchronously to both loops.

#![no_std]
#![no_main]

use core::cell::RefCell;

use cortex_m_rt::entry;
use critical_section::Mutex;
use hal::pac::{self, interrupt};
use rp2040_hal as hal;

use pico_pedal::hardware::{self, design_parameters, DacOutput, SampleClock};
use pipeline::{Bypass, Error, PipelineShared, SampleLink, TickEdge};

/// Boot block for the on-board QSPI flash.
#[link_section = ".boot2"]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_W25Q080;

/// State shared between the acquisition loop and the interrupt handlers.
static SHARED: PipelineShared = PipelineShared::new();

/// Sample clock, owned by the `TIMER_IRQ_0` handler after startup.
static SAMPLE_CLOCK: Mutex<RefCell<Option<SampleClock>>> = Mutex::new(RefCell::new(None));

/// Output stage, owned by the `PWM_IRQ_WRAP` handler after startup.
static OUTPUT: Mutex<RefCell<Option<DacOutput>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    let device = pac::Peripherals::take().unwrap();

    let hardware::PedalDevices {
        adc,
        dac,
        mut sample_clock,
        link,
        timer,
    } = hardware::setup(device, processing_core);

    sample_clock.start();
    critical_section::with(|cs| {
        SAMPLE_CLOCK.borrow_ref_mut(cs).replace(sample_clock);
        OUTPUT.borrow_ref_mut(cs).replace(dac);
    });

    unsafe {
        pac::NVIC::unmask(pac::Interrupt::TIMER_IRQ_0);
        pac::NVIC::unmask(pac::Interrupt::PWM_IRQ_WRAP);
    }

    acquisition(adc, link, timer)
}

/// Core 0 forever-loop: acquire, hand off, pace.
fn acquisition(
    mut adc: hardware::AdcInput,
    mut link: hardware::CoreLink,
    timer: hal::Timer,
) -> ! {
    let mut edge = TickEdge::new(&SHARED);
    loop {
        let input = match adc.acquire() {
            Ok(code) => code.value(),
            Err(error) => fault(error),
        };

        // Pop the previous cycle's output before pushing the new input, so
        // processing always has a queued sample, at the cost of one cycle
        // of pipeline latency.
        match pipeline::acquire_cycle(&mut link, input, |link| pop_processed(link, timer)) {
            Ok(output) => SHARED.store_output(output),
            Err(error) => {
                // Recoverable: the last output is held for one more period
                // and the push was skipped, so the one-in-flight protocol
                // stays balanced once the other core catches up.
                let misses = SHARED.record_starvation();
                if misses.is_power_of_two() {
                    log::warn!("{} ({} total)", error, misses);
                }
            }
        }

        // Throttle to the sample clock; the rest of the period belongs to
        // the processing core.
        while !edge.poll(&SHARED) {
            core::hint::spin_loop();
        }
    }
}

/// Pop the processed sample, giving the processing core at most one
/// period.
fn pop_processed(link: &mut hardware::CoreLink, timer: hal::Timer) -> Option<u16> {
    let deadline = timer.get_counter() + design_parameters::STARVATION_DEADLINE;
    loop {
        if let Some(sample) = link.try_recv() {
            return Some(sample);
        }
        if timer.get_counter() > deadline {
            return None;
        }
        core::hint::spin_loop();
    }
}

/// Core 1 entry: transform samples forever.
fn processing_core() -> ! {
    let device = unsafe { pac::Peripherals::steal() };
    let sio = hal::Sio::new(device.SIO);
    pipeline::run(hardware::CoreLink::new(sio.fifo), Bypass)
}

/// Fatal-fault supervisor: silence the output, report, stop.
fn fault(error: Error) -> ! {
    SHARED.halt();
    critical_section::with(|cs| {
        if let Some(dac) = OUTPUT.borrow_ref_mut(cs).as_mut() {
            dac.refresh(&SHARED);
        }
    });
    log::error!("halting output: {}", error);
    panic!("unrecoverable pipeline fault: {}", error);
}

#[interrupt]
fn TIMER_IRQ_0() {
    critical_section::with(|cs| {
        if let Some(clock) = SAMPLE_CLOCK.borrow_ref_mut(cs).as_mut() {
            clock.on_tick(&SHARED);
        }
    });
}

#[interrupt]
fn PWM_IRQ_WRAP() {
    critical_section::with(|cs| {
        if let Some(dac) = OUTPUT.borrow_ref_mut(cs).as_mut() {
            dac.refresh(&SHARED);
        }
    });
}
