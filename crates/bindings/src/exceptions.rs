//! Exception-flag Python binding.
//!
//! Flag sets cross the boundary as Python sets of `EXCEPT` members. `EXCEPT` members act on
//! their own flag; `ExceptFlag` acts on sets and carries saved flag state.

use std::collections::HashSet;

use fpenv_core::{ExceptionFlag, ExceptionFlags, SavedFlags};
use pyo3::prelude::*;

use crate::utils::{host, to_py_err};

/// Python-exposed exception flag; the value is the bit number.
#[pyclass(eq, eq_int, hash, frozen, name = "EXCEPT", module = "fenv")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PyExcept {
    /// Invalid operation.
    #[pyo3(name = "INVALID")]
    Invalid = 0,
    /// Denormal operand. Never raised on the supported platforms.
    #[pyo3(name = "DENORM")]
    Denorm = 1,
    /// Division by zero.
    #[pyo3(name = "DIVBYZERO")]
    DivByZero = 2,
    /// Overflow.
    #[pyo3(name = "OVERFLOW")]
    Overflow = 3,
    /// Underflow.
    #[pyo3(name = "UNDERFLOW")]
    Underflow = 4,
    /// Inexact result.
    #[pyo3(name = "INEXACT")]
    Inexact = 5,
}

impl From<ExceptionFlag> for PyExcept {
    fn from(flag: ExceptionFlag) -> Self {
        match flag {
            ExceptionFlag::Invalid => Self::Invalid,
            ExceptionFlag::Denorm => Self::Denorm,
            ExceptionFlag::DivByZero => Self::DivByZero,
            ExceptionFlag::Overflow => Self::Overflow,
            ExceptionFlag::Underflow => Self::Underflow,
            ExceptionFlag::Inexact => Self::Inexact,
        }
    }
}

impl From<PyExcept> for ExceptionFlag {
    fn from(flag: PyExcept) -> Self {
        match flag {
            PyExcept::Invalid => Self::Invalid,
            PyExcept::Denorm => Self::Denorm,
            PyExcept::DivByZero => Self::DivByZero,
            PyExcept::Overflow => Self::Overflow,
            PyExcept::Underflow => Self::Underflow,
            PyExcept::Inexact => Self::Inexact,
        }
    }
}

/// Converts a Python set of `EXCEPT` members to a core flag set.
pub fn to_flags(excepts: &HashSet<PyExcept>) -> ExceptionFlags {
    excepts.iter().map(|&e| ExceptionFlag::from(e)).collect()
}

/// Converts a core flag set to a Python set of `EXCEPT` members.
pub fn from_flags(flags: ExceptionFlags) -> HashSet<PyExcept> {
    flags.iter().map(PyExcept::from).collect()
}

#[pymethods]
impl PyExcept {
    /// Whether this flag is raised.
    fn test(&self) -> PyResult<bool> {
        Ok(host()?.exceptions().flag((*self).into()).test())
    }

    /// Clears this flag.
    fn clear(&self) -> PyResult<()> {
        host()?.exceptions().flag((*self).into()).clear().map_err(to_py_err)
    }

    /// Raises this flag.
    #[pyo3(name = "raise_")]
    fn raise_flag(&self) -> PyResult<()> {
        host()?.exceptions().flag((*self).into()).raise().map_err(to_py_err)
    }

    /// Bit number.
    #[getter]
    fn value(&self) -> u8 {
        ExceptionFlag::from(*self).bit()
    }

    /// Converts a bitmask (bit `n` is the flag with value `n`) to a set of members.
    #[staticmethod]
    fn from_mask(mask: u64) -> PyResult<HashSet<Self>> {
        ExceptionFlags::from_mask(mask).map(from_flags).map_err(to_py_err)
    }

    /// Converts a set of members to a bitmask.
    #[staticmethod]
    fn to_mask(flags: HashSet<Self>) -> u8 {
        to_flags(&flags).bits()
    }
}

/// Flag-set operations, plus saved flag state from `ExceptFlag.getflag`.
#[pyclass(unsendable, module = "fenv")]
pub struct ExceptFlag {
    saved: SavedFlags,
}

#[pymethods]
impl ExceptFlag {
    /// Members of `excepts` that are currently raised.
    #[staticmethod]
    fn test(excepts: HashSet<PyExcept>) -> PyResult<HashSet<PyExcept>> {
        Ok(from_flags(host()?.exceptions().test(to_flags(&excepts))))
    }

    /// Clears the members of `excepts`.
    #[staticmethod]
    fn clear(excepts: HashSet<PyExcept>) -> PyResult<()> {
        host()?.exceptions().clear(to_flags(&excepts)).map_err(to_py_err)
    }

    /// Raises the members of `excepts`.
    #[staticmethod]
    #[pyo3(name = "raise_")]
    fn raise_flags(excepts: HashSet<PyExcept>) -> PyResult<()> {
        host()?.exceptions().raise(to_flags(&excepts)).map_err(to_py_err)
    }

    /// Captures the state of the members of `excepts`.
    #[staticmethod]
    fn getflag(excepts: HashSet<PyExcept>) -> PyResult<Self> {
        Ok(Self { saved: host()?.exceptions().save(to_flags(&excepts)) })
    }

    /// Puts the members of `excepts` back into the captured state.
    fn setflag(&self, excepts: HashSet<PyExcept>) -> PyResult<()> {
        host()?.exceptions().restore(&self.saved, to_flags(&excepts)).map_err(to_py_err)
    }

    /// Captured flags that were raised.
    #[getter]
    fn flags(&self) -> HashSet<PyExcept> {
        from_flags(self.saved.raised())
    }

    /// Flags whose traps are enabled.
    #[staticmethod]
    fn get_traps() -> PyResult<HashSet<PyExcept>> {
        host()?.exceptions().enabled_traps().map(from_flags).map_err(to_py_err)
    }

    /// Enables traps for `excepts`; returns the previously enabled set.
    #[staticmethod]
    fn enable_traps(excepts: HashSet<PyExcept>) -> PyResult<HashSet<PyExcept>> {
        host()?.exceptions().enable_traps(to_flags(&excepts)).map(from_flags).map_err(to_py_err)
    }

    /// Disables traps for `excepts`; returns the previously enabled set.
    #[staticmethod]
    fn disable_traps(excepts: HashSet<PyExcept>) -> PyResult<HashSet<PyExcept>> {
        host()?.exceptions().disable_traps(to_flags(&excepts)).map(from_flags).map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        format!("ExceptFlag({})", self.saved.raised())
    }
}
