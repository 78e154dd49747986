//! IEEE-754 floating-point environment control.
//!
//! This crate exposes the hardware floating-point environment of the current thread:
//! 1. **Classification:** IEEE-754 category of an `f64`, decided from its bit pattern.
//! 2. **Rounding:** Reading and setting the active rounding direction, with scoped restore guards.
//! 3. **Exceptions:** Testing, clearing and raising the sticky exception flags.
//! 4. **Stepping:** `nextafter` and friends, computed on the ordered bit pattern.
//! 5. **Runtime arithmetic:** Opaque operations that execute under the live environment.
//!
//! All environment access goes through an [`FpEnv`] handle. The handle is bound to the thread
//! that acquired it, mirroring the per-thread nature of the hardware register it describes.
//!
//! ```
//! use fpenv_core::{ExceptionFlag, FpEnv, RoundingMode, strict};
//!
//! # fn main() -> Result<(), fpenv_core::FenvError> {
//! let env = FpEnv::acquire()?;
//! let _guard = env.rounding().with_mode(RoundingMode::Upward)?;
//! env.exceptions().clear(ExceptionFlag::Inexact)?;
//!
//! assert_eq!(strict::rint(3.25), 4.0);
//! assert!(env.exceptions().flag(ExceptionFlag::Inexact).test());
//! # Ok(())
//! # }
//! ```

/// Shared building blocks: binary64 layout and the error taxonomy.
pub mod common;
/// IEEE-754 category classification.
pub mod classify;
/// Serde-backed initial environment configuration.
pub mod config;
/// The environment handle and its backends.
pub mod env;
/// Sticky exception flags and the register that holds them.
pub mod exceptions;
/// Adjacent representable values.
pub mod next_after;
/// Rounding modes and the controller that reads and writes them.
pub mod rounding;
/// Arithmetic that is evaluated at run time under the live environment.
pub mod strict;

pub use crate::classify::{FloatClass, classify, is_signaling_nan, isnormal};
pub use crate::common::error::{FenvError, FlagError, ModeError, Result};
pub use crate::common::ieee754::Binary64;
pub use crate::config::EnvConfig;
pub use crate::env::{Capabilities, EnvSnapshot, FpBackend, FpEnv, HostFenv};
pub use crate::exceptions::{ExceptionFlag, ExceptionFlags, ExceptionRegister, FlagView, SavedFlags};
pub use crate::next_after::{next_down, next_up, nextafter};
pub use crate::rounding::{EnvGuard, RoundingController, RoundingMode};
