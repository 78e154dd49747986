//! IEEE-754 category classification.
//!
//! Classification looks only at the exponent and mantissa fields of the bit pattern:
//!
//! | Exponent  | Mantissa | Class       |
//! |-----------|----------|-------------|
//! | all ones  | 0        | `INFINITE`  |
//! | all ones  | ≠ 0      | `NAN`       |
//! | 0         | 0        | `ZERO`      |
//! | 0         | ≠ 0      | `SUBNORMAL` |
//! | otherwise | any      | `NORMAL`    |
//!
//! No arithmetic is performed, so classifying a value can never raise or clear a flag.

use std::fmt;
use std::num::FpCategory;

use crate::common::ieee754::{Binary64, EXPONENT_ALL_ONES, QUIET_BIT};

/// IEEE-754 category of a double.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FloatClass {
    /// Not a number, quiet or signaling.
    Nan,
    /// Positive or negative infinity.
    Infinite,
    /// Positive or negative zero.
    Zero,
    /// Nonzero value below the smallest normal magnitude.
    Subnormal,
    /// Every other finite value.
    Normal,
}

impl FloatClass {
    /// Every class, in declaration order.
    pub const ALL: [Self; 5] = [Self::Nan, Self::Infinite, Self::Zero, Self::Subnormal, Self::Normal];

    /// Upper-case name, as in `<math.h>` (`FP_NAN` without the prefix).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nan => "NAN",
            Self::Infinite => "INFINITE",
            Self::Zero => "ZERO",
            Self::Subnormal => "SUBNORMAL",
            Self::Normal => "NORMAL",
        }
    }
}

impl fmt::Display for FloatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<FpCategory> for FloatClass {
    fn from(category: FpCategory) -> Self {
        match category {
            FpCategory::Nan => Self::Nan,
            FpCategory::Infinite => Self::Infinite,
            FpCategory::Zero => Self::Zero,
            FpCategory::Subnormal => Self::Subnormal,
            FpCategory::Normal => Self::Normal,
        }
    }
}

impl From<FloatClass> for FpCategory {
    fn from(class: FloatClass) -> Self {
        match class {
            FloatClass::Nan => Self::Nan,
            FloatClass::Infinite => Self::Infinite,
            FloatClass::Zero => Self::Zero,
            FloatClass::Subnormal => Self::Subnormal,
            FloatClass::Normal => Self::Normal,
        }
    }
}

/// Returns the IEEE-754 category of `value`.
///
/// # Examples
///
/// ```
/// use fpenv_core::{FloatClass, classify};
///
/// assert_eq!(classify(-0.0), FloatClass::Zero);
/// assert_eq!(classify(f64::MIN_POSITIVE * f64::EPSILON), FloatClass::Subnormal);
/// assert_eq!(classify(f64::NEG_INFINITY), FloatClass::Infinite);
/// ```
#[inline]
pub const fn classify(value: f64) -> FloatClass {
    let fields = Binary64::from_f64(value);
    match (fields.exponent, fields.mantissa) {
        (EXPONENT_ALL_ONES, 0) => FloatClass::Infinite,
        (EXPONENT_ALL_ONES, _) => FloatClass::Nan,
        (0, 0) => FloatClass::Zero,
        (0, _) => FloatClass::Subnormal,
        _ => FloatClass::Normal,
    }
}

/// Returns `true` when `value` is a normal number: finite, nonzero and not subnormal.
#[inline]
pub const fn isnormal(value: f64) -> bool {
    matches!(classify(value), FloatClass::Normal)
}

/// Returns `true` when `value` is a NaN whose quiet bit is clear.
///
/// Only the bit pattern is inspected, so asking does not quieten the NaN or raise `INVALID`.
#[inline]
pub const fn is_signaling_nan(value: f64) -> bool {
    matches!(classify(value), FloatClass::Nan) && value.to_bits() & QUIET_BIT == 0
}
