/// Map a decoded signal value onto the PWM compare register.
///
/// The high bits set the coarse duty and the low six bits add a small
/// correction on top, stretching the effective output resolution past the
/// native wrap value. The numeric behavior is inherited unchanged from the
/// board this was tuned on; treat it as a pinned contract, not as a
/// validated dithering scheme.
pub fn duty_code(signal: u16) -> u16 {
    (signal >> 6) + (signal & 0x3f)
}
