//! ADC acquisition over SPI.
//!
//! The converter is framed by a manually driven chip select: one command
//! byte with the read bit set, one don't-care byte, and the conversion
//! result clocked back across the same two transfers. Each byte moves
//! through the nb-based full-duplex interface so the wait on the FIFO
//! status can carry a deadline; a plain blocking exchange would hang the
//! acquisition loop forever on a stalled or absent converter.

use embedded_hal::digital::OutputPin;
use embedded_hal_nb::spi::FullDuplex;

use pipeline::{AdcCode, Error};

use super::design_parameters::{EXCHANGE_DEADLINE, READ_BIT};
use super::{hal, AdcCs, AdcSpi, Instant};

pub struct AdcInput {
    spi: AdcSpi,
    cs: AdcCs,
    timer: hal::Timer,
}

impl AdcInput {
    pub fn new(spi: AdcSpi, cs: AdcCs, timer: hal::Timer) -> Self {
        Self { spi, cs, timer }
    }

    /// Acquire one conversion.
    ///
    /// Asserts CS, exchanges the fixed two-byte frame and decodes the
    /// result. A deadline overrun deasserts CS and reports
    /// [`Error::PeripheralFault`].
    pub fn acquire(&mut self) -> Result<AdcCode, Error> {
        let deadline = self.timer.get_counter() + EXCHANGE_DEADLINE;

        let mut frame = [READ_BIT, 0x00];
        self.cs.set_low().unwrap();
        let result = self.exchange(&mut frame, deadline);
        self.cs.set_high().unwrap();

        result.map(|()| AdcCode::from(frame))
    }

    fn exchange(&mut self, frame: &mut [u8; 2], deadline: Instant) -> Result<(), Error> {
        for byte in frame.iter_mut() {
            self.flush_write(*byte, deadline)?;
            *byte = self.flush_read(deadline)?;
        }
        Ok(())
    }

    fn flush_write(&mut self, byte: u8, deadline: Instant) -> Result<(), Error> {
        loop {
            match self.spi.write(byte) {
                Ok(()) => return Ok(()),
                Err(nb::Error::WouldBlock) => self.check_deadline(deadline)?,
                Err(nb::Error::Other(_)) => return Err(Error::PeripheralFault),
            }
        }
    }

    fn flush_read(&mut self, deadline: Instant) -> Result<u8, Error> {
        loop {
            match self.spi.read() {
                Ok(byte) => return Ok(byte),
                Err(nb::Error::WouldBlock) => self.check_deadline(deadline)?,
                Err(nb::Error::Other(_)) => return Err(Error::PeripheralFault),
            }
        }
    }

    fn check_deadline(&self, deadline: Instant) -> Result<(), Error> {
        if self.timer.get_counter() > deadline {
            return Err(Error::PeripheralFault);
        }
        Ok(())
    }
}
