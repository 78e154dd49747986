//! Arithmetic evaluated at run time under the live environment.
//!
//! The compiler assumes the default environment: it folds `0.1 + 0.2` at compile time in
//! round-to-nearest and discards operations whose results are unused, so neither the rounding
//! mode nor the flags see them. The operations here pass operands and results through
//! [`black_box`], which forces each operation to execute on the hardware, in program order
//! relative to the surrounding environment calls.
//!
//! ```
//! use fpenv_core::{ExceptionFlag, FpEnv, strict};
//!
//! # fn main() -> Result<(), fpenv_core::FenvError> {
//! let env = FpEnv::acquire()?;
//! env.exceptions().clear(ExceptionFlag::Inexact)?;
//! let _ = strict::add(strict::add(0.1, 0.1), 0.1);
//! assert!(env.exceptions().flag(ExceptionFlag::Inexact).test());
//! # Ok(())
//! # }
//! ```

use std::hint::black_box;

use crate::common::error::Result;
use crate::common::ieee754::Binary64;
use crate::env::{FpBackend, FpEnv};
use crate::exceptions::ExceptionFlag;

/// 2^52: from here up every double is an integer.
const TWO_POW_52: f64 = 4_503_599_627_370_496.0;

/// `a + b`, rounded in the current mode.
#[inline]
pub fn add(a: f64, b: f64) -> f64 {
    black_box(black_box(a) + black_box(b))
}

/// `a - b`, rounded in the current mode.
#[inline]
pub fn sub(a: f64, b: f64) -> f64 {
    black_box(black_box(a) - black_box(b))
}

/// `a * b`, rounded in the current mode.
#[inline]
pub fn mul(a: f64, b: f64) -> f64 {
    black_box(black_box(a) * black_box(b))
}

/// `a / b`, rounded in the current mode.
#[inline]
pub fn div(a: f64, b: f64) -> f64 {
    black_box(black_box(a) / black_box(b))
}

/// Square root, rounded in the current mode.
#[inline]
pub fn sqrt(a: f64) -> f64 {
    black_box(black_box(a).sqrt())
}

/// `a * b + c` with a single rounding in the current mode.
#[inline]
pub fn mul_add(a: f64, b: f64, c: f64) -> f64 {
    black_box(black_box(a).mul_add(black_box(b), black_box(c)))
}

/// Rounds to an integral value in the current rounding mode (C `rint`).
///
/// Raises `INEXACT` when the result differs from `x`. NaNs, infinities and values of magnitude
/// 2^52 or more are returned unchanged, and a zero result keeps the sign of `x`.
pub fn rint(x: f64) -> f64 {
    // Exponent field test rather than a comparison, so a NaN never raises INVALID here.
    if Binary64::from_f64(x).unbiased_exponent() >= 52 {
        return x;
    }
    // Adding ±2^52 pushes the fraction out of the significand; the hardware rounds it away in
    // the current mode, and the subtraction is exact.
    let shift = TWO_POW_52.copysign(x);
    sub(add(x, shift), shift).copysign(x)
}

/// [`rint`] without the `INEXACT` side effect (C `nearbyint`).
///
/// # Errors
///
/// Propagates a failure to restore the `INEXACT` flag.
pub fn nearbyint<B: FpBackend>(env: &FpEnv<B>, x: f64) -> Result<f64> {
    let register = env.exceptions();
    let saved = register.save(ExceptionFlag::Inexact);
    let rounded = rint(x);
    register.restore(&saved, ExceptionFlag::Inexact)?;
    Ok(rounded)
}
