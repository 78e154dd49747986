//! Test harness for environment tests.
#![allow(clippy::expect_used)]

use fpenv_core::{ExceptionFlags, FpEnv};
use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber once per test binary; `RUST_LOG=fpenv_core=trace` shows
/// every register access.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Runs `f` with a handle on the current thread's environment.
///
/// Flags are cleared before `f` runs, and the environment found on entry is restored after it
/// returns, so tests cannot leak state into each other even if the harness reuses threads.
pub fn with_env<T>(f: impl FnOnce(&FpEnv) -> T) -> T {
    init_tracing();
    let env = FpEnv::acquire().expect("host has a floating-point environment");
    let guard = env.rounding().scope().expect("capture environment");
    env.exceptions().clear(ExceptionFlags::ALL).expect("clear flags");
    let out = f(&env);
    guard.restore().expect("restore environment");
    out
}
