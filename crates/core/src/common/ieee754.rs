//! IEEE-754 binary64 field layout.
//!
//! A double is laid out (most significant bit first) as:
//!
//! | Bits   | Field            | Width |
//! |--------|------------------|-------|
//! | 63     | sign             | 1     |
//! | 62..52 | biased exponent  | 11    |
//! | 51..0  | mantissa         | 52    |
//!
//! `f64::to_bits` gives the pattern as a native integer, so no byte order is involved.

/// Bit mask for the sign bit (bit 63).
pub const SIGN_BIT: u64 = 0x8000_0000_0000_0000;

/// Bit mask for the biased exponent field (bits 62..52).
pub const EXPONENT_MASK: u64 = 0x7FF0_0000_0000_0000;

/// Bit mask for the mantissa (trailing significand) field (bits 51..0).
pub const MANTISSA_MASK: u64 = 0x000F_FFFF_FFFF_FFFF;

/// Most significant mantissa bit; set for quiet NaNs, clear for signaling NaNs.
pub const QUIET_BIT: u64 = 0x0008_0000_0000_0000;

/// Position of the exponent field.
pub const EXPONENT_SHIFT: u32 = 52;

/// Biased exponent value with every bit set (infinities and NaNs).
pub const EXPONENT_ALL_ONES: u16 = 0x7FF;

/// Exponent bias.
pub const EXPONENT_BIAS: i32 = 1023;

/// Pattern of a signaling NaN with the lowest payload bit set.
pub const SIGNALING_NAN: u64 = 0x7FF0_0000_0000_0001;

/// Decomposed binary64 fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Binary64 {
    /// Sign bit; `true` for negative values (including `-0.0`).
    pub sign: bool,
    /// Biased exponent (0..=2047).
    pub exponent: u16,
    /// Trailing 52 significand bits.
    pub mantissa: u64,
}

impl Binary64 {
    /// Splits `value` into sign, biased exponent and mantissa.
    #[inline]
    pub const fn from_f64(value: f64) -> Self {
        Self::from_bits(value.to_bits())
    }

    /// Splits a raw 64-bit pattern into its fields.
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            sign: bits & SIGN_BIT != 0,
            exponent: ((bits & EXPONENT_MASK) >> EXPONENT_SHIFT) as u16,
            mantissa: bits & MANTISSA_MASK,
        }
    }

    /// Reassembles the fields into a raw pattern. Out-of-range fields are masked.
    #[inline]
    pub const fn to_bits(self) -> u64 {
        let sign = if self.sign { SIGN_BIT } else { 0 };
        sign | (((self.exponent as u64) << EXPONENT_SHIFT) & EXPONENT_MASK)
            | (self.mantissa & MANTISSA_MASK)
    }

    /// Reassembles the fields into a double.
    #[inline]
    pub const fn to_f64(self) -> f64 {
        f64::from_bits(self.to_bits())
    }

    /// Unbiased exponent. Meaningless for zeros, subnormals, infinities and NaNs.
    #[inline]
    pub const fn unbiased_exponent(self) -> i32 {
        self.exponent as i32 - EXPONENT_BIAS
    }
}

impl From<f64> for Binary64 {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<Binary64> for f64 {
    fn from(fields: Binary64) -> Self {
        fields.to_f64()
    }
}
