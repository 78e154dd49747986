//! Python↔Rust configuration conversion.
//!
//! Converts Python dicts into the core `EnvConfig` type via JSON serialization, so the same
//! schema is accepted from Python and from configuration files.

use fpenv_core::EnvConfig;
use pyo3::prelude::*;

use crate::utils::{host, to_py_err};

/// Converts a Python dict such as `{"rounding": "UPWARD", "traps": ["DIVBYZERO"]}` to an
/// `EnvConfig`.
///
/// # Errors
///
/// A `PyErr` if the dict cannot be serialized, or `FenvError` if it is not a valid
/// configuration.
pub fn py_dict_to_config(py: Python<'_>, dict: &Bound<'_, PyAny>) -> PyResult<EnvConfig> {
    let json = py.import("json")?;
    let dumps = json.getattr("dumps")?;
    let json_str: String = dumps.call1((dict,))?.extract()?;
    EnvConfig::from_json(&json_str).map_err(to_py_err)
}

/// Applies a configuration dict to the calling thread's environment.
#[pyfunction]
pub fn configure(py: Python<'_>, config: &Bound<'_, PyAny>) -> PyResult<()> {
    let config = py_dict_to_config(py, config)?;
    host()?.apply(&config).map_err(to_py_err)
}
