//! Rounding-mode Python binding.
//!
//! `ROUND` mirrors `RoundingMode` as a Python enum whose members read and switch the live
//! mode, and `RoundingScope` is a context manager that restores the environment on exit:
//!
//! ```python
//! with fenv.RoundingScope(fenv.ROUND.UPWARD):
//!     ...
//! ```

use fpenv_core::{EnvSnapshot, FenvError, ModeError, RoundingMode};
use pyo3::prelude::*;
use pyo3::types::PyInt;

use crate::utils::{host, to_py_err};

/// Python-exposed rounding mode.
#[pyclass(eq, eq_int, hash, frozen, name = "ROUND", module = "fenv")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PyRound {
    /// Round to nearest, ties to even.
    #[pyo3(name = "TONEAREST")]
    ToNearest = 0,
    /// Round towards −∞.
    #[pyo3(name = "DOWNWARD")]
    Downward = 1,
    /// Round towards +∞.
    #[pyo3(name = "UPWARD")]
    Upward = 2,
    /// Round towards zero.
    #[pyo3(name = "TOWARDZERO")]
    TowardZero = 3,
}

impl From<RoundingMode> for PyRound {
    fn from(mode: RoundingMode) -> Self {
        match mode {
            RoundingMode::ToNearest => Self::ToNearest,
            RoundingMode::Downward => Self::Downward,
            RoundingMode::Upward => Self::Upward,
            RoundingMode::TowardZero => Self::TowardZero,
        }
    }
}

impl From<PyRound> for RoundingMode {
    fn from(mode: PyRound) -> Self {
        match mode {
            PyRound::ToNearest => Self::ToNearest,
            PyRound::Downward => Self::Downward,
            PyRound::Upward => Self::Upward,
            PyRound::TowardZero => Self::TowardZero,
        }
    }
}

#[pymethods]
impl PyRound {
    /// Returns the current rounding mode of the calling thread.
    #[staticmethod]
    fn get() -> PyResult<Self> {
        host()?.rounding().get().map(Self::from).map_err(to_py_err)
    }

    /// Makes this the current rounding mode of the calling thread.
    fn set(&self) -> PyResult<()> {
        host()?.rounding().set((*self).into()).map_err(to_py_err)
    }

    /// Looks a mode up by number (0..=3) or name (`"upward"`, `"FE_UPWARD"`).
    #[staticmethod]
    fn parse(value: &Bound<'_, PyAny>) -> PyResult<Self> {
        mode_from_py(value).map(Self::from)
    }

    /// Mode number.
    #[getter]
    fn value(&self) -> u8 {
        RoundingMode::from(*self).number()
    }
}

/// Reads a rounding mode from a Python int (mode number) or str (mode name).
///
/// # Errors
///
/// `UnsupportedModeError` for unknown numbers and names, `TypeError` for other types.
pub fn mode_from_py(value: &Bound<'_, PyAny>) -> PyResult<RoundingMode> {
    let mode = if value.is_instance_of::<PyInt>() {
        value.extract::<i64>().map_or_else(
            |_| Err(FenvError::UnsupportedMode(ModeError::Name(value.to_string()))),
            RoundingMode::try_from,
        )
    } else {
        value.extract::<String>()?.parse()
    };
    mode.map_err(to_py_err)
}

/// Context manager that captures the environment on entry, optionally switches the rounding
/// mode, and restores everything (flags included) on exit.
///
/// Re-entering the same object nests; exits restore in reverse order.
#[pyclass(unsendable, module = "fenv")]
pub struct RoundingScope {
    mode: Option<RoundingMode>,
    saved: Vec<EnvSnapshot>,
}

#[pymethods]
impl RoundingScope {
    #[new]
    #[pyo3(signature = (mode=None))]
    fn new(mode: Option<PyRound>) -> Self {
        Self { mode: mode.map(RoundingMode::from), saved: Vec::new() }
    }

    fn __enter__(mut slf: PyRefMut<'_, Self>) -> PyResult<PyRefMut<'_, Self>> {
        let env = host()?;
        let snapshot = env.snapshot().map_err(to_py_err)?;
        if let Some(mode) = slf.mode {
            env.rounding().set(mode).map_err(to_py_err)?;
        }
        slf.saved.push(snapshot);
        Ok(slf)
    }

    fn __exit__(
        &mut self,
        _exc_type: &Bound<'_, PyAny>,
        _exc_value: &Bound<'_, PyAny>,
        _traceback: &Bound<'_, PyAny>,
    ) -> PyResult<bool> {
        if let Some(snapshot) = self.saved.pop() {
            host()?.restore(&snapshot).map_err(to_py_err)?;
        }
        Ok(false)
    }
}
