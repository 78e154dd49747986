//! Pure floating-point helpers.

use pyo3::prelude::*;

/// IEEE-754 class of `x`: one of `"NAN"`, `"INFINITE"`, `"ZERO"`, `"SUBNORMAL"`, `"NORMAL"`.
#[pyfunction]
pub fn classify(x: f64) -> &'static str {
    fpenv_core::classify(x).name()
}

/// Whether `x` is a normal number.
#[pyfunction]
pub fn isnormal(x: f64) -> bool {
    fpenv_core::isnormal(x)
}

/// Whether `x` is a signaling NaN.
#[pyfunction]
pub fn issignaling(x: f64) -> bool {
    fpenv_core::is_signaling_nan(x)
}

/// Next representable value after `x` in the direction of `y`.
#[pyfunction]
pub fn nextafter(x: f64, y: f64) -> f64 {
    fpenv_core::nextafter(x, y)
}
