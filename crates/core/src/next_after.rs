//! Adjacent representable values.
//!
//! Doubles of one sign are ordered like their bit patterns read as unsigned integers. Mapping
//! negative patterns to negated magnitudes gives a single signed key that is monotonic across
//! the whole line, with both zeros at key 0:
//!
//! ```text
//! -inf .. -MAX .. -min_subnormal   ±0   +min_subnormal .. +MAX .. +inf
//!  -0x7ff0..     ..     -1          0        1        ..     0x7ff0..
//! ```
//!
//! Stepping the key by one visits every representable value, so subnormals and the
//! transitions into and out of infinity need no special cases.

use crate::common::ieee754::SIGN_BIT;

/// Maps a non-NaN double to its position on the ordered line.
#[inline]
const fn ordered_key(value: f64) -> i64 {
    let bits = value.to_bits();
    let magnitude = (bits & !SIGN_BIT) as i64;
    if bits & SIGN_BIT == 0 { magnitude } else { -magnitude }
}

/// Inverse of [`ordered_key`]; key 0 maps to `+0.0`.
#[inline]
const fn from_ordered_key(key: i64) -> f64 {
    if key < 0 {
        f64::from_bits(SIGN_BIT | key.unsigned_abs())
    } else {
        f64::from_bits(key as u64)
    }
}

/// Returns the representable double adjacent to `from` in the direction of `toward`.
///
/// - `from == toward` returns `toward`, so `nextafter(0.0, -0.0)` is `-0.0`.
/// - Stepping off zero yields the smallest subnormal with the sign of the direction.
/// - Stepping outward from `±f64::MAX` yields `±inf`; stepping inward from `±inf` yields `±f64::MAX`.
/// - A step that lands on zero keeps the sign of `from`.
/// - Either argument NaN yields NaN.
///
/// The result depends only on the arguments. The rounding mode is not consulted and no flag
/// is read or written.
///
/// # Examples
///
/// ```
/// use fpenv_core::nextafter;
///
/// assert_eq!(nextafter(1.0, 2.0), 1.0 + f64::EPSILON);
/// assert_eq!(nextafter(0.0, -1.0), -f64::from_bits(1));
/// assert_eq!(nextafter(f64::MAX, f64::INFINITY), f64::INFINITY);
/// ```
pub fn nextafter(from: f64, toward: f64) -> f64 {
    if from.is_nan() {
        return from;
    }
    if toward.is_nan() {
        return toward;
    }
    if from == toward {
        return toward;
    }

    let key = ordered_key(from);
    let next = if toward > from { key + 1 } else { key - 1 };
    if next == 0 {
        return from_ordered_key(0).copysign(from);
    }
    from_ordered_key(next)
}

/// IEEE-754 `nextUp`: the least double greater than `value`.
///
/// `next_up(f64::MAX)` is `+inf`, `next_up(+inf)` is `+inf` and `next_up(-0.0)` is the
/// smallest positive subnormal.
#[inline]
pub fn next_up(value: f64) -> f64 {
    nextafter(value, f64::INFINITY)
}

/// IEEE-754 `nextDown`: the greatest double less than `value`.
#[inline]
pub fn next_down(value: f64) -> f64 {
    nextafter(value, f64::NEG_INFINITY)
}
