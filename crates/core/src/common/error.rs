//! Error taxonomy for environment control.
//!
//! Only programmer errors and platform limitations are reported here. Numerically special
//! results (NaN, infinities, subnormals) are ordinary values, and IEEE-754 "exceptions" are
//! state in the flag register, never `Err`.

use std::fmt;

use thiserror::Error;

use crate::exceptions::{ExceptionFlag, ExceptionFlags};
use crate::rounding::RoundingMode;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, FenvError>;

/// Errors produced by environment, rounding and flag operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FenvError {
    /// A rounding mode outside the four IEEE-754 directions was observed or requested.
    #[error("unsupported rounding mode: {0}")]
    UnsupportedMode(ModeError),

    /// A flag value outside the six defined flags was supplied.
    #[error("invalid exception flag: {0}")]
    InvalidFlag(FlagError),

    /// The flag exists but the platform does not implement it.
    #[error("exception flag {0} is not implemented on this platform")]
    UnsupportedFlag(ExceptionFlag),

    /// Trap enablement is unavailable, or the platform refused the requested traps.
    #[error("cannot change trap enablement for {0}")]
    TrapsUnsupported(ExceptionFlags),

    /// The target has no per-thread hardware floating-point environment this crate can drive.
    #[error("no supported floating-point environment on {arch}-{os}")]
    UnsupportedPlatform {
        /// Target architecture (`std::env::consts::ARCH`).
        arch: &'static str,
        /// Target operating system (`std::env::consts::OS`).
        os: &'static str,
    },

    /// A C environment call reported failure.
    #[error("{call} failed")]
    Environment {
        /// Name of the failing `<fenv.h>` function.
        call: &'static str,
    },

    /// An environment configuration could not be parsed.
    #[error("invalid environment configuration: {0}")]
    Config(String),
}

/// Detail for [`FenvError::UnsupportedMode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModeError {
    /// The hardware reported a raw encoding that maps to none of the four modes.
    Observed(i32),
    /// The platform rejected a request to switch to this mode.
    Rejected(RoundingMode),
    /// A mode number outside `0..=3`.
    Number(i64),
    /// A mode name that is not `TONEAREST`, `DOWNWARD`, `UPWARD` or `TOWARDZERO`.
    Name(String),
}

impl fmt::Display for ModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Observed(raw) => write!(f, "hardware reports encoding {raw:#x}"),
            Self::Rejected(mode) => write!(f, "platform rejected {mode}"),
            Self::Number(n) => write!(f, "no mode numbered {n}"),
            Self::Name(name) => write!(f, "no mode named {name:?}"),
        }
    }
}

/// Detail for [`FenvError::InvalidFlag`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlagError {
    /// A bit number outside `0..=5`.
    Bit(u32),
    /// A mask with bits set outside the low six.
    Mask(u64),
    /// A flag name that is not one of the six.
    Name(String),
}

impl fmt::Display for FlagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bit(bit) => write!(f, "no flag at bit {bit}"),
            Self::Mask(mask) => write!(f, "mask {mask:#x} has bits outside the six flags"),
            Self::Name(name) => write!(f, "no flag named {name:?}"),
        }
    }
}
