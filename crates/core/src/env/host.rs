//! Host backend: the platform C library's `<fenv.h>`.

use libc::c_int;
use tracing::trace;

use super::platform::{self, PlatformLayout};
use super::{FpBackend, RawEnv};
use crate::common::error::{FenvError, Result};

#[cfg(any(target_os = "linux", target_os = "android", target_os = "macos"))]
mod ffi {
    use libc::c_int;

    use super::RawEnv;

    #[cfg_attr(any(target_os = "linux", target_os = "android"), link(name = "m"))]
    unsafe extern "C" {
        pub fn fegetround() -> c_int;
        pub fn fesetround(round: c_int) -> c_int;
        pub fn fetestexcept(excepts: c_int) -> c_int;
        pub fn feclearexcept(excepts: c_int) -> c_int;
        pub fn feraiseexcept(excepts: c_int) -> c_int;
        // fexcept_t is a 16- or 32-bit integer holding the same bits as the FE_* masks; a
        // little-endian u64 slot is wide enough for either.
        pub fn fesetexceptflag(flagp: *const u64, excepts: c_int) -> c_int;
        pub fn fegetenv(envp: *mut RawEnv) -> c_int;
        pub fn fesetenv(envp: *const RawEnv) -> c_int;
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[link(name = "m")]
    unsafe extern "C" {
        pub fn feenableexcept(excepts: c_int) -> c_int;
        pub fn fedisableexcept(excepts: c_int) -> c_int;
        pub fn fegetexcept() -> c_int;
    }
}

/// Backend that drives the calling thread's hardware environment through `<fenv.h>`.
///
/// Construct it with [`HostFenv::new`], which fails on targets without a known layout.
#[derive(Debug, Clone, Copy)]
pub struct HostFenv {
    layout: &'static PlatformLayout,
}

impl HostFenv {
    /// Probes the compilation target.
    ///
    /// # Errors
    ///
    /// [`FenvError::UnsupportedPlatform`] when the target has no per-thread environment this
    /// crate knows how to drive.
    pub fn new() -> Result<Self> {
        platform::HOST.map(|layout| Self { layout }).ok_or(FenvError::UnsupportedPlatform {
            arch: std::env::consts::ARCH,
            os: std::env::consts::OS,
        })
    }
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "macos"))]
impl FpBackend for HostFenv {
    fn layout(&self) -> &'static PlatformLayout {
        self.layout
    }

    fn get_round(&self) -> c_int {
        // SAFETY: fegetround only reads the calling thread's control register.
        let raw = unsafe { ffi::fegetround() };
        trace!(raw, "fegetround");
        raw
    }

    fn set_round(&self, raw: c_int) -> c_int {
        // SAFETY: fesetround validates `raw` and returns nonzero for unknown encodings.
        unsafe { ffi::fesetround(raw) }
    }

    fn test_except(&self, mask: c_int) -> c_int {
        // SAFETY: fetestexcept only reads the status register.
        unsafe { ffi::fetestexcept(mask) }
    }

    fn clear_except(&self, mask: c_int) -> c_int {
        // SAFETY: clears status bits of the calling thread; no memory is touched.
        unsafe { ffi::feclearexcept(mask) }
    }

    fn raise_except(&self, mask: c_int) -> c_int {
        // SAFETY: sets status bits of the calling thread. With a trap enabled for one of the
        // bits this delivers SIGFPE, which is the documented effect of enabling traps.
        unsafe { ffi::feraiseexcept(mask) }
    }

    fn set_except_state(&self, values: c_int, mask: c_int) -> c_int {
        let slot = values as u64;
        // SAFETY: `slot` is a live, aligned u64 for the duration of the call and the callee
        // reads at most four bytes from it.
        unsafe { ffi::fesetexceptflag(&raw const slot, mask) }
    }

    fn save_env(&self, out: &mut RawEnv) -> c_int {
        // SAFETY: RawEnv is larger than and at least as aligned as fenv_t on every supported
        // platform, and `out` is a valid exclusive reference.
        unsafe { ffi::fegetenv(out) }
    }

    fn load_env(&self, env: &RawEnv) -> c_int {
        // SAFETY: `env` was filled by fegetenv on this thread (RawEnv is only produced by
        // save_env), so it holds a valid fenv_t.
        unsafe { ffi::fesetenv(env) }
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    fn enable_traps(&self, mask: c_int) -> c_int {
        // SAFETY: changes the trap-enable bits of the calling thread only.
        unsafe { ffi::feenableexcept(mask) }
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    fn disable_traps(&self, mask: c_int) -> c_int {
        // SAFETY: changes the trap-enable bits of the calling thread only.
        unsafe { ffi::fedisableexcept(mask) }
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    fn enabled_traps(&self) -> c_int {
        // SAFETY: reads the trap-enable bits of the calling thread.
        unsafe { ffi::fegetexcept() }
    }

    #[cfg(not(all(target_os = "linux", target_env = "gnu")))]
    fn enable_traps(&self, _mask: c_int) -> c_int {
        -1
    }

    #[cfg(not(all(target_os = "linux", target_env = "gnu")))]
    fn disable_traps(&self, _mask: c_int) -> c_int {
        -1
    }

    #[cfg(not(all(target_os = "linux", target_env = "gnu")))]
    fn enabled_traps(&self) -> c_int {
        -1
    }
}

// Without a C environment the handle can never be built (HOST is None), so every call fails.
#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "macos")))]
impl FpBackend for HostFenv {
    fn layout(&self) -> &'static PlatformLayout {
        self.layout
    }

    fn get_round(&self) -> c_int {
        -1
    }

    fn set_round(&self, _raw: c_int) -> c_int {
        -1
    }

    fn test_except(&self, _mask: c_int) -> c_int {
        0
    }

    fn clear_except(&self, _mask: c_int) -> c_int {
        -1
    }

    fn raise_except(&self, _mask: c_int) -> c_int {
        -1
    }

    fn set_except_state(&self, _values: c_int, _mask: c_int) -> c_int {
        -1
    }

    fn save_env(&self, _out: &mut RawEnv) -> c_int {
        -1
    }

    fn load_env(&self, _env: &RawEnv) -> c_int {
        -1
    }

    fn enable_traps(&self, _mask: c_int) -> c_int {
        -1
    }

    fn disable_traps(&self, _mask: c_int) -> c_int {
        -1
    }

    fn enabled_traps(&self) -> c_int {
        -1
    }
}
