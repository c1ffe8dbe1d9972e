//! Conversion result decoding.

/// Width of a conversion result in bits.
pub const SAMPLE_BITS: u32 = 12;

/// Number of distinct output codes.
pub const SAMPLE_CODES: u32 = 1 << SAMPLE_BITS;

const SIGN_BIT: u32 = SAMPLE_BITS - 1;
const SAMPLE_MASK: u16 = (SAMPLE_CODES - 1) as u16;

/// Decode a 2-byte transfer into a signed sample.
///
/// The chip clocks out the result MSB first with the 12-bit two's-complement
/// code right-justified; the top four bits carry no information.
pub fn decode(buf: [u8; 2]) -> i32 {
    let temp = u16::from_be_bytes(buf);
    sign_extend(temp & SAMPLE_MASK, SIGN_BIT)
}

/// Sign-extend `value`, treating bit `sign_bit` as the sign.
fn sign_extend(value: u16, sign_bit: u32) -> i32 {
    let shift = 31 - sign_bit;
    ((value as i32) << shift) >> shift
}
