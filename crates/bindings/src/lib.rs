//! Python bindings for the floating-point environment.
//!
//! This crate exposes `fpenv-core` to Python via PyO3 as the `fenv` module. It provides:
//! 1. **Classification:** `classify`, `isnormal`, `issignaling` and `nextafter`.
//! 2. **Rounding:** the `ROUND` enum with `get`/`set`, and the `RoundingScope` context manager.
//! 3. **Exceptions:** the `EXCEPT` enum, `EXCEPT_ALL`, and `ExceptFlag` for flag sets, saved
//!    state and traps.
//! 4. **Utilities:** `configure`, `init_logging`, `version`, and the exception hierarchy
//!    `FenvError` > `UnsupportedModeError`, `InvalidFlagError`.
//!
//! Every call acts on the environment of the OS thread it runs on.

use fpenv_core::ExceptionFlag;
use pyo3::prelude::*;
use pyo3::types::PyFrozenSet;

/// Pure helpers (`classify`, `nextafter`).
pub mod classify;
/// Python dict to `EnvConfig` conversion.
pub mod conversion;
/// `EXCEPT` and `ExceptFlag`.
pub mod exceptions;
/// `ROUND` and `RoundingScope`.
pub mod rounding;
/// Version, logging and error mapping.
pub mod utils;

/// Registers all classes, functions and constants onto the given Python module.
///
/// # Errors
///
/// A `PyErr` if registration fails.
pub fn register_fenv_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();

    m.add_class::<rounding::PyRound>()?;
    m.add_class::<rounding::RoundingScope>()?;
    m.add_class::<exceptions::PyExcept>()?;
    m.add_class::<exceptions::ExceptFlag>()?;

    let all = PyFrozenSet::new(py, ExceptionFlag::ALL.map(exceptions::PyExcept::from))?;
    m.add("EXCEPT_ALL", all)?;

    m.add("FenvError", py.get_type::<utils::FenvError>())?;
    m.add("UnsupportedModeError", py.get_type::<utils::UnsupportedModeError>())?;
    m.add("InvalidFlagError", py.get_type::<utils::InvalidFlagError>())?;

    m.add_function(wrap_pyfunction!(classify::classify, m)?)?;
    m.add_function(wrap_pyfunction!(classify::isnormal, m)?)?;
    m.add_function(wrap_pyfunction!(classify::issignaling, m)?)?;
    m.add_function(wrap_pyfunction!(classify::nextafter, m)?)?;
    m.add_function(wrap_pyfunction!(conversion::configure, m)?)?;
    m.add_function(wrap_pyfunction!(utils::init_logging, m)?)?;
    m.add_function(wrap_pyfunction!(utils::version, m)?)?;

    Ok(())
}

#[pymodule]
fn fenv(m: &Bound<'_, PyModule>) -> PyResult<()> {
    register_fenv_module(m)
}
