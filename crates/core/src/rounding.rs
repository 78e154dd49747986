//! Rounding-mode support.
//!
//! IEEE-754 defines four rounding directions, numbered here as in C99 `fegetround` order of
//! declaration:
//!
//! | Number | Mode         | Description                          |
//! |--------|--------------|--------------------------------------|
//! | 0      | `TONEAREST`  | Round to nearest, ties to even       |
//! | 1      | `DOWNWARD`   | Round towards −∞                     |
//! | 2      | `UPWARD`     | Round towards +∞                     |
//! | 3      | `TOWARDZERO` | Round towards zero (truncate)        |
//!
//! A [`RoundingMode`] is only a label. Reading and writing the live mode goes through the
//! [`RoundingController`] of an [`FpEnv`] handle, and [`EnvGuard`] gives scoped changes that
//! are undone on every exit path.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, error, trace};

use crate::common::error::{FenvError, ModeError, Result};
use crate::common::strip_fe_prefix;
use crate::env::{EnvSnapshot, FpBackend, FpEnv};

/// IEEE-754 rounding direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
#[repr(u8)]
pub enum RoundingMode {
    /// Round to nearest, ties to even (default IEEE mode).
    #[default]
    ToNearest = 0,
    /// Round towards −∞.
    Downward = 1,
    /// Round towards +∞.
    Upward = 2,
    /// Round towards zero.
    TowardZero = 3,
}

impl RoundingMode {
    /// Every mode, ordered by number.
    pub const ALL: [Self; 4] = [Self::ToNearest, Self::Downward, Self::Upward, Self::TowardZero];

    /// Mode number (0..=3).
    #[inline]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Decodes a mode number.
    ///
    /// # Errors
    ///
    /// [`FenvError::UnsupportedMode`] for numbers outside `0..=3`.
    pub const fn from_number(number: u32) -> Result<Self> {
        match number {
            0 => Ok(Self::ToNearest),
            1 => Ok(Self::Downward),
            2 => Ok(Self::Upward),
            3 => Ok(Self::TowardZero),
            _ => Err(FenvError::UnsupportedMode(ModeError::Number(number as i64))),
        }
    }

    /// Upper-case name as used by `<fenv.h>` (`FE_TONEAREST` without the prefix).
    pub const fn name(self) -> &'static str {
        match self {
            Self::ToNearest => "TONEAREST",
            Self::Downward => "DOWNWARD",
            Self::Upward => "UPWARD",
            Self::TowardZero => "TOWARDZERO",
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoundingMode {
    type Err = FenvError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let name = strip_fe_prefix(trimmed);
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| FenvError::UnsupportedMode(ModeError::Name(s.to_owned())))
    }
}

impl TryFrom<String> for RoundingMode {
    type Error = FenvError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl TryFrom<u8> for RoundingMode {
    type Error = FenvError;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_number(value.into())
    }
}

impl TryFrom<i64> for RoundingMode {
    type Error = FenvError;

    fn try_from(value: i64) -> Result<Self> {
        u32::try_from(value)
            .map_err(|_| FenvError::UnsupportedMode(ModeError::Number(value)))
            .and_then(Self::from_number)
    }
}

/// Reads and writes the rounding mode of one environment handle.
#[derive(Debug)]
pub struct RoundingController<'a, B: FpBackend> {
    env: &'a FpEnv<B>,
}

impl<'a, B: FpBackend> RoundingController<'a, B> {
    pub(crate) const fn new(env: &'a FpEnv<B>) -> Self {
        Self { env }
    }

    /// Reads the current rounding mode.
    ///
    /// # Errors
    ///
    /// [`FenvError::UnsupportedMode`] if the hardware reports an encoding that is none of the
    /// four modes.
    pub fn get(&self) -> Result<RoundingMode> {
        let raw = self.env.backend().get_round();
        let mode = self
            .env
            .layout()
            .mode_from_bits(raw)
            .ok_or(FenvError::UnsupportedMode(ModeError::Observed(raw)))?;
        trace!(%mode, "read rounding mode");
        Ok(mode)
    }

    /// Switches the rounding mode for every later operation on this thread.
    ///
    /// # Errors
    ///
    /// [`FenvError::UnsupportedMode`] if the platform rejects `mode`. The previous mode then
    /// stays in effect; no other mode is substituted.
    pub fn set(&self, mode: RoundingMode) -> Result<()> {
        let raw = self.env.layout().mode_bits(mode);
        if self.env.backend().set_round(raw) != 0 {
            error!(%mode, raw, "platform rejected rounding mode");
            return Err(FenvError::UnsupportedMode(ModeError::Rejected(mode)));
        }
        debug!(%mode, "set rounding mode");
        Ok(())
    }

    /// Captures the complete environment; the returned guard restores it when dropped.
    ///
    /// # Errors
    ///
    /// [`FenvError::Environment`] if the environment cannot be captured.
    pub fn scope(&self) -> Result<EnvGuard<'a, B>> {
        EnvGuard::new(self.env)
    }

    /// Like [`RoundingController::scope`], then switches to `mode`.
    ///
    /// # Errors
    ///
    /// Capture failure, or [`FenvError::UnsupportedMode`] if `mode` is rejected (in which case
    /// the guard is dropped and nothing changes).
    pub fn with_mode(&self, mode: RoundingMode) -> Result<EnvGuard<'a, B>> {
        let guard = self.scope()?;
        self.set(mode)?;
        Ok(guard)
    }

    /// Runs `f` under `mode` and restores the previous environment afterwards, also when `f`
    /// panics. Flags raised by `f` are discarded with the rest of the environment; test them
    /// inside `f`.
    ///
    /// # Errors
    ///
    /// As for [`RoundingController::with_mode`]; `f` is not run on error.
    pub fn run_with<T>(&self, mode: RoundingMode, f: impl FnOnce() -> T) -> Result<T> {
        let guard = self.with_mode(mode)?;
        let value = f();
        guard.restore()?;
        Ok(value)
    }
}

/// Restores a captured environment when dropped.
///
/// Guards nest: each one restores exactly what was live when it was created, so dropping them
/// in reverse order of creation (which Rust scoping does) unwinds the changes LIFO. The guard
/// borrows its handle and is therefore confined to the handle's thread.
#[must_use = "the environment is restored as soon as the guard is dropped"]
pub struct EnvGuard<'a, B: FpBackend> {
    env: &'a FpEnv<B>,
    saved: Option<EnvSnapshot>,
    _thread: PhantomData<*const ()>,
}

impl<B: FpBackend> fmt::Debug for EnvGuard<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvGuard").field("armed", &self.saved.is_some()).finish()
    }
}

impl<'a, B: FpBackend> EnvGuard<'a, B> {
    /// Captures the environment of `env`.
    ///
    /// # Errors
    ///
    /// [`FenvError::Environment`] if the capture fails.
    pub fn new(env: &'a FpEnv<B>) -> Result<Self> {
        let saved = env.snapshot()?;
        trace!("entered environment scope");
        Ok(Self { env, saved: Some(saved), _thread: PhantomData })
    }

    /// Restores now and reports the outcome, instead of on drop.
    ///
    /// # Errors
    ///
    /// [`FenvError::Environment`] if the platform rejects the saved environment.
    pub fn restore(mut self) -> Result<()> {
        match self.saved.take() {
            Some(saved) => self.env.restore(&saved),
            None => Ok(()),
        }
    }
}

impl<B: FpBackend> Drop for EnvGuard<'_, B> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            // Drop cannot report; restore already logged the failure.
            let _ = self.env.restore(&saved);
        }
    }
}
