//! Utility functions exposed to Python.
//!
//! Provides the version string, log installation, and the mapping from core errors to the
//! Python exception hierarchy of the `fenv` module.

use fpenv_core::{FenvError as CoreError, FpEnv};
use pyo3::create_exception;
use pyo3::exceptions::PyException;
use pyo3::prelude::*;
use tracing_subscriber::EnvFilter;

create_exception!(fenv, FenvError, PyException, "Floating-point environment failure.");
create_exception!(
    fenv,
    UnsupportedModeError,
    FenvError,
    "Rounding mode outside the four IEEE-754 directions, or rejected by the platform."
);
create_exception!(
    fenv,
    InvalidFlagError,
    FenvError,
    "Exception flag unknown, or not implemented on this platform."
);

/// Converts a core error into the matching Python exception.
pub fn to_py_err(err: CoreError) -> PyErr {
    let msg = err.to_string();
    match err {
        CoreError::UnsupportedMode(_) => UnsupportedModeError::new_err(msg),
        CoreError::InvalidFlag(_) | CoreError::UnsupportedFlag(_) => InvalidFlagError::new_err(msg),
        _ => FenvError::new_err(msg),
    }
}

/// Returns the library version string.
#[pyfunction]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Routes the library's `tracing` output to stderr.
///
/// `filter` uses `RUST_LOG` syntax, e.g. `"fpenv_core=debug"`. Returns `False` if a subscriber
/// was already installed.
#[pyfunction]
#[pyo3(signature = (filter="fpenv_core=debug"))]
pub fn init_logging(filter: &str) -> PyResult<bool> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(format!("Invalid filter: {e}")))?;
    Ok(tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init().is_ok())
}

/// Handle on the calling thread's environment.
///
/// Python may run consecutive calls on different OS threads, so each call acquires its own.
pub fn host() -> PyResult<FpEnv> {
    FpEnv::acquire().map_err(to_py_err)
}
