//! Bit extraction from 32-bit navigation word containers.
//!
//! u-blox right-aligns every 30-bit GPS word in a `u32`: parity sits in
//! bits 0..=5, the 24 data bits in bits 6..=29 and bits 30..=31 carry
//! no navigation data. Offsets below count from the least significant bit.
//!
//! These helpers never apply physical scale factors: callers scale the raw
//! result with [scale] and a power of two from [pow2].

use num_traits::AsPrimitive;

use crate::constants::{GPS_DATA_BITS, GPS_PARITY_SIZE};

#[inline]
const fn mask(width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1 << width) - 1
    }
}

/// Reads `width` bits starting at bit `offset` of `word`.
/// Callers guarantee `width >= 1` and `offset + width <= 32`.
#[inline]
pub fn unsigned(word: u32, offset: u32, width: u32) -> u32 {
    (word >> offset) & mask(width)
}

/// Reads `width` bits starting at bit `offset` and interprets them
/// as a two's complement integer.
#[inline]
pub fn signed(word: u32, offset: u32, width: u32) -> i32 {
    sign_extend(unsigned(word, offset, width), width)
}

/// Two's complement interpretation of the `width` least significant bits
/// of `raw`: when the top bit is set the result is `raw - 2^width`.
#[inline]
pub fn sign_extend(raw: u32, width: u32) -> i32 {
    let raw = raw & mask(width);
    if width < 32 && raw & (1 << (width - 1)) != 0 {
        (raw | !mask(width)) as i32
    } else {
        raw as i32
    }
}

/// Field split across two words.
///
/// The `low_width` least significant bits of the result are the most
/// significant data bits of `low_word`, the `high_width` most significant
/// bits of the result are the least significant data bits of `high_word`.
/// In LNAV the MSBs of a split field always end a word and the LSBs
/// open the following one, so `high_word` precedes `low_word` in the stream.
#[inline]
pub fn spanning(low_word: u32, high_word: u32, low_width: u32, high_width: u32) -> u32 {
    let low = unsigned(
        low_word,
        GPS_PARITY_SIZE + GPS_DATA_BITS - low_width,
        low_width,
    );
    let high = unsigned(high_word, GPS_PARITY_SIZE, high_width);
    (high << low_width) | low
}

/// [spanning] followed by two's complement interpretation
/// over `low_width + high_width` bits.
#[inline]
pub fn spanning_signed(low_word: u32, high_word: u32, low_width: u32, high_width: u32) -> i32 {
    sign_extend(
        spanning(low_word, high_word, low_width, high_width),
        low_width + high_width,
    )
}

/// Exact power of two, `exp` in `-63..=63`.
#[inline]
pub const fn pow2(exp: i32) -> f64 {
    if exp >= 0 {
        (1u64 << exp) as f64
    } else {
        1.0 / (1u64 << -exp) as f64
    }
}

/// Applies a physical scale factor to a raw extraction result.
#[inline]
pub fn scale<T: AsPrimitive<f64>>(raw: T, factor: f64) -> f64 {
    raw.as_() * factor
}
