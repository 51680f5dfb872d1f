//! The inter-core FIFOs as a sample link.

use pipeline::SampleLink;

use super::hal;

/// Full-duplex pipe between the two cores.
///
/// The SIO FIFOs give one hardware queue per direction with exactly one
/// core on each end, so the handoff is safe for one producer and one
/// consumer running truly concurrently, without a lock.
pub struct CoreLink {
    fifo: hal::sio::SioFifo,
}

impl CoreLink {
    pub fn new(fifo: hal::sio::SioFifo) -> Self {
        Self { fifo }
    }
}

impl SampleLink for CoreLink {
    fn send(&mut self, sample: u16) {
        self.fifo.write_blocking(u32::from(sample));
    }

    fn try_recv(&mut self) -> Option<u16> {
        self.fifo.read().map(|word| word as u16)
    }
}
