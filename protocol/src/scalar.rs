//! Scalar encoders for the legacy wire format.
//!
//! All three encodings predate this implementation and must be reproduced
//! bit-exactly: a word-swapped 32-bit integer, a two-characters-per-word
//! string packing with sign extension, and a custom 32-bit float ("REAL")
//! with a 25-bit mantissa, 1-bit sign and 6-bit exponent.

const MANTISSA_BITS: u32 = 25;
const EXPONENT_BITS: u32 = 6;

const MANTISSA_MAX: u32 = (1 << MANTISSA_BITS) - 1;
const EXPONENT_MAX: u32 = (1 << EXPONENT_BITS) - 1;

/// Encodes a 32-bit integer as two big-endian 16-bit words, low word first.
///
/// This is not a plain big-endian u32: the legacy host wrote each 16-bit
/// half through network byte order separately, leaving the halves in
/// little-endian word order.
pub fn encode_u32(v: u32) -> [u8; 4] {
    let lo = (v & 0xFFFF) as u16;
    let hi = (v >> 16) as u16;

    let mut out = [0u8; 4];
    out[0..2].copy_from_slice(&lo.to_be_bytes());
    out[2..4].copy_from_slice(&hi.to_be_bytes());
    out
}

/// Encodes a string as a u16 length followed by byte pairs packed into
/// 16-bit words.
///
/// The length counts the appended null terminator. Each pair of bytes is
/// combined as `lo + (hi << 8)` with both bytes sign-extended to i16 and
/// wrapping addition, reproducing the legacy host's signed-char-into-short
/// aliasing. An odd final byte pairs with zero.
pub fn encode_string(s: &str) -> Vec<u8> {
    let mut raw = s.as_bytes().to_vec();
    raw.push(0);

    let mut out = Vec::with_capacity(2 + raw.len() + 1);
    out.extend_from_slice(&(raw.len() as u16).to_be_bytes());

    for pair in raw.chunks(2) {
        let lo = pair[0] as i8 as i16;
        let hi = if pair.len() > 1 { pair[1] as i8 as i16 } else { 0 };
        let word = lo.wrapping_add(hi.wrapping_shl(8)) as u16;
        out.extend_from_slice(&word.to_be_bytes());
    }

    out
}

/// Encodes a float in the REAL format: mantissa in the low 25 bits, sign
/// at bit 25, exponent in the top 6 bits.
///
/// The magnitude is scaled into [0, 1) by repeated division (by 64 in the
/// coarse loop, then by 2), counting the exponent as it goes. The mantissa
/// is the scaled value times 2^25, truncated toward zero. Values too large
/// for the exponent saturate to the maximum representable REAL; there is no
/// infinity or NaN encoding, every input funnels through the same clamps.
pub fn encode_real(f: f32) -> [u8; 4] {
    let sign: u32 = if f < 0.0 { 1 } else { 0 };
    let mut y = f.abs();
    let mut exponent: u32 = 0;

    // Bulk-scale large magnitudes by powers of 64.
    while y >= 64.0 && exponent < (1 << EXPONENT_BITS) - 6 {
        exponent += 6;
        y /= 64.0;
    }

    // Fine scale until the value drops below 1.
    while y >= 1.0 && exponent < EXPONENT_MAX {
        exponent += 1;
        y /= 2.0;
    }

    // Truncate toward zero; `as` saturates instead of wrapping, so the
    // explicit clamp below covers any residual overflow.
    let mut mantissa = (y * (1u32 << MANTISSA_BITS) as f32) as u32;
    if mantissa > MANTISSA_MAX {
        mantissa = MANTISSA_MAX;
    }

    if exponent > EXPONENT_MAX {
        exponent = EXPONENT_MAX;
        if mantissa > 0 {
            mantissa = MANTISSA_MAX;
        }
    }

    let packed = (mantissa & MANTISSA_MAX) | (sign << MANTISSA_BITS) | (exponent << (MANTISSA_BITS + 1));
    encode_u32(packed)
}
