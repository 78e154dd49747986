//! The floating-point environment handle.
//!
//! The rounding mode and the sticky flags live in a hardware register that belongs to the
//! current thread. This module makes that explicit:
//! 1. **Backend:** [`FpBackend`] is the narrow seam over the register, speaking raw `<fenv.h>`
//!    encodings. [`HostFenv`] is the production implementation.
//! 2. **Handle:** [`FpEnv`] owns a backend and hands out the rounding controller and the
//!    exception register. It is neither `Send` nor `Sync`, so it cannot leave its thread.
//! 3. **Snapshots:** [`EnvSnapshot`] captures the complete environment for later restore.
//!
//! [`FpEnv::acquire`] is the capability check: it refuses targets that do not provide a
//! per-thread environment rather than pretending a process-wide one is equivalent.
#![cfg_attr(test, allow(unused_results, missing_docs))]

use std::fmt;
use std::marker::PhantomData;

use libc::c_int;
use tracing::{debug, error};

use crate::common::error::{FenvError, Result};
use crate::config::EnvConfig;
use crate::exceptions::{ExceptionFlags, ExceptionRegister};
use crate::rounding::RoundingController;

/// Host backend over the platform C library.
pub mod host;
/// Per-architecture `<fenv.h>` encodings.
pub mod platform;

pub use host::HostFenv;
pub use platform::PlatformLayout;

/// Storage for a C `fenv_t`.
///
/// Sized and aligned for the largest `fenv_t` among the supported platforms (32 bytes on
/// glibc x86_64), with room to spare.
#[repr(C, align(16))]
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct RawEnv([u64; 8]);

impl fmt::Debug for RawEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawEnv(..)")
    }
}

/// Raw access to one thread's floating-point register.
///
/// Methods mirror the C99 `<fenv.h>` calls and their conventions: masks and modes are the
/// platform encodings described by [`FpBackend::layout`], and a zero return means success.
#[cfg_attr(test, mockall::automock)]
pub trait FpBackend {
    /// Encoding table for this backend's platform.
    fn layout(&self) -> &'static PlatformLayout;
    /// `fegetround`.
    fn get_round(&self) -> c_int;
    /// `fesetround`.
    fn set_round(&self, raw: c_int) -> c_int;
    /// `fetestexcept`.
    fn test_except(&self, mask: c_int) -> c_int;
    /// `feclearexcept`.
    fn clear_except(&self, mask: c_int) -> c_int;
    /// `feraiseexcept`.
    fn raise_except(&self, mask: c_int) -> c_int;
    /// `fesetexceptflag`: for each flag in `mask`, set its state to the matching bit of `values`.
    fn set_except_state(&self, values: c_int, mask: c_int) -> c_int;
    /// `fegetenv`.
    fn save_env(&self, out: &mut RawEnv) -> c_int;
    /// `fesetenv`.
    fn load_env(&self, env: &RawEnv) -> c_int;
    /// `feenableexcept`: returns the previously enabled mask, or -1.
    fn enable_traps(&self, mask: c_int) -> c_int;
    /// `fedisableexcept`: returns the previously enabled mask, or -1.
    fn disable_traps(&self, mask: c_int) -> c_int;
    /// `fegetexcept`: returns the enabled mask, or -1.
    fn enabled_traps(&self) -> c_int;
}

/// What the platform behind a handle can do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Platform name from the layout table.
    pub platform: &'static str,
    /// Whether each thread has its own environment. Always `true` for an acquired handle.
    pub per_thread: bool,
    /// Flags the platform implements; the rest always test clear.
    pub supported_flags: ExceptionFlags,
    /// Whether traps can be enabled and disabled.
    pub traps: bool,
}

/// Opaque capture of the complete environment: rounding mode, flags and any other mode bits.
///
/// Only restorable on the thread that took it.
#[derive(Clone)]
pub struct EnvSnapshot {
    raw: RawEnv,
    _thread: PhantomData<*const ()>,
}

impl fmt::Debug for EnvSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSnapshot").finish_non_exhaustive()
    }
}

/// Handle over the current thread's floating-point environment.
///
/// ```
/// use fpenv_core::{FpEnv, RoundingMode};
///
/// # fn main() -> Result<(), fpenv_core::FenvError> {
/// let env = FpEnv::acquire()?;
/// assert_eq!(env.rounding().get()?, RoundingMode::ToNearest);
/// # Ok(())
/// # }
/// ```
pub struct FpEnv<B: FpBackend = HostFenv> {
    backend: B,
    _thread: PhantomData<*const ()>,
}

impl<B: FpBackend> fmt::Debug for FpEnv<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FpEnv").field("platform", &self.backend.layout().name).finish()
    }
}

impl FpEnv<HostFenv> {
    /// Acquires the handle for the calling thread's hardware environment.
    ///
    /// # Errors
    ///
    /// [`FenvError::UnsupportedPlatform`] when the target has no per-thread environment.
    pub fn acquire() -> Result<Self> {
        let backend = HostFenv::new()?;
        debug!(platform = backend.layout().name, "acquired floating-point environment");
        Ok(Self::with_backend(backend))
    }
}

impl<B: FpBackend> FpEnv<B> {
    /// Wraps an explicit backend.
    pub const fn with_backend(backend: B) -> Self {
        Self { backend, _thread: PhantomData }
    }

    /// The backend this handle drives.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Encoding table of the platform.
    pub fn layout(&self) -> &'static PlatformLayout {
        self.backend.layout()
    }

    /// What this platform supports.
    pub fn capabilities(&self) -> Capabilities {
        let layout = self.layout();
        Capabilities {
            platform: layout.name,
            per_thread: true,
            supported_flags: layout.supported_flags(),
            traps: layout.traps,
        }
    }

    /// Rounding-mode controller bound to this handle.
    pub const fn rounding(&self) -> RoundingController<'_, B> {
        RoundingController::new(self)
    }

    /// Exception-flag register bound to this handle.
    pub const fn exceptions(&self) -> ExceptionRegister<'_, B> {
        ExceptionRegister::new(self)
    }

    /// Captures the complete environment.
    ///
    /// # Errors
    ///
    /// [`FenvError::Environment`] if `fegetenv` fails.
    pub fn snapshot(&self) -> Result<EnvSnapshot> {
        let mut raw = RawEnv::default();
        if self.backend.save_env(&mut raw) != 0 {
            return Err(FenvError::Environment { call: "fegetenv" });
        }
        Ok(EnvSnapshot { raw, _thread: PhantomData })
    }

    /// Restores an environment captured by [`FpEnv::snapshot`], flags included.
    ///
    /// # Errors
    ///
    /// [`FenvError::Environment`] if `fesetenv` fails.
    pub fn restore(&self, snapshot: &EnvSnapshot) -> Result<()> {
        if self.backend.load_env(&snapshot.raw) != 0 {
            error!("fesetenv rejected a snapshot");
            return Err(FenvError::Environment { call: "fesetenv" });
        }
        debug!("restored floating-point environment");
        Ok(())
    }

    /// Applies an initial configuration: rounding mode, then flag clearing, then traps.
    ///
    /// # Errors
    ///
    /// Whatever the individual steps report; steps before the failing one stay applied.
    pub fn apply(&self, config: &EnvConfig) -> Result<()> {
        self.rounding().set(config.rounding)?;
        if config.clear_flags {
            self.exceptions().clear(ExceptionFlags::ALL)?;
        }
        let traps = config.trap_flags();
        if !traps.is_empty() {
            let _previous = self.exceptions().enable_traps(traps)?;
        }
        Ok(())
    }
}
