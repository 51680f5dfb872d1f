/// One decoded ADC conversion.
///
/// The converter returns two bytes per chip-select frame. The first byte
/// carries the high bits, the second is left-aligned with its LSB as
/// padding. This layout is a hardware contract, not negotiable at runtime.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AdcCode(u16);

impl AdcCode {
    /// Largest value the two-byte framing can produce.
    pub const MAX: u16 = 0x7fff;

    pub fn value(self) -> u16 {
        self.0
    }
}

impl From<[u8; 2]> for AdcCode {
    fn from(frame: [u8; 2]) -> Self {
        Self(((frame[0] as u16) << 7) | ((frame[1] as u16) >> 1))
    }
}

impl From<AdcCode> for u16 {
    fn from(code: AdcCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode() {
        for (frame, value) in [
            ([0x00, 0x00], 0),
            ([0x02, 0x80], 320),
            ([0x01, 0x00], 128),
            ([0x00, 0x02], 1),
            ([0xff, 0xff], AdcCode::MAX),
        ] {
            assert_eq!(AdcCode::from(frame).value(), value);
        }
    }

    #[test]
    fn second_byte_lsb_is_padding() {
        assert_eq!(AdcCode::from([0x12, 0x35]), AdcCode::from([0x12, 0x34]));
    }
}
