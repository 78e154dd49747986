//! Initial environment configuration.
//!
//! A configuration describes the environment a thread should start from. It is plain data,
//! deserialized from JSON, and takes effect through [`FpEnv::apply`](crate::FpEnv::apply):
//!
//! ```json
//! { "rounding": "TOWARDZERO", "clear_flags": true, "traps": ["DIVBYZERO"] }
//! ```
//!
//! Every field is optional; an empty object is the C99 default environment.

use serde::Deserialize;

use crate::common::error::{FenvError, Result};
use crate::exceptions::{ExceptionFlag, ExceptionFlags};
use crate::rounding::RoundingMode;

/// Default values for configuration fields.
mod defaults {
    /// Clear every flag when a configuration is applied.
    pub const CLEAR_FLAGS: bool = true;
}

/// Environment to establish on a thread.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvConfig {
    /// Rounding mode to switch to.
    #[serde(default)]
    pub rounding: RoundingMode,

    /// Clear all exception flags.
    #[serde(default = "EnvConfig::default_clear_flags")]
    pub clear_flags: bool,

    /// Flags whose traps are enabled. Leave empty on platforms without trap control.
    #[serde(default)]
    pub traps: Vec<ExceptionFlag>,
}

impl EnvConfig {
    const fn default_clear_flags() -> bool {
        defaults::CLEAR_FLAGS
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// [`FenvError::Config`] for malformed JSON, unknown fields, or unknown mode and flag names.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| FenvError::Config(e.to_string()))
    }

    /// The trap list as a set.
    pub fn trap_flags(&self) -> ExceptionFlags {
        self.traps.iter().copied().collect()
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            rounding: RoundingMode::default(),
            clear_flags: defaults::CLEAR_FLAGS,
            traps: Vec::new(),
        }
    }
}
