//! Common types shared by every component of the library.
//!
//! This module provides:
//! 1. **Binary64 Layout:** Field masks and the decomposed view of an IEEE-754 double.
//! 2. **Error Handling:** The `FenvError` taxonomy and the crate-wide `Result` alias.

/// Error types for environment and flag operations.
pub mod error;

/// IEEE-754 binary64 field layout.
pub mod ieee754;

pub use error::{FenvError, FlagError, ModeError, Result};
pub use ieee754::Binary64;

/// Strips a leading `FE_` (any case) from a `<fenv.h>` constant name.
pub(crate) fn strip_fe_prefix(name: &str) -> &str {
    match (name.get(..3), name.get(3..)) {
        (Some(prefix), Some(rest)) if prefix.eq_ignore_ascii_case("FE_") => rest,
        _ => name,
    }
}
