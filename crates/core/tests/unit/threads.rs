//! Per-thread isolation of the environment.

use std::thread;

use fpenv_core::{EnvConfig, ExceptionFlag, ExceptionFlags, FpEnv, RoundingMode, strict};

use crate::common::{init_tracing, with_env};

#[test]
fn child_changes_do_not_leak_into_parent() {
    with_env(|env| {
        env.rounding().set(RoundingMode::Downward).unwrap();
        env.exceptions().raise(ExceptionFlag::Overflow).unwrap();

        let child = thread::spawn(|| {
            init_tracing();
            let env = FpEnv::acquire().unwrap();
            env.rounding().set(RoundingMode::Upward).unwrap();
            env.exceptions().clear(ExceptionFlags::ALL).unwrap();
            let _ = strict::div(1.0, 0.0);
            (env.rounding().get().unwrap(), env.exceptions().test(ExceptionFlags::ALL))
        })
        .join()
        .unwrap();

        // The child's changes took effect on its own thread only.
        assert_eq!(child, (RoundingMode::Upward, ExceptionFlags::from(ExceptionFlag::DivByZero)));
        assert_eq!(env.rounding().get().unwrap(), RoundingMode::Downward);
        assert_eq!(env.exceptions().test(ExceptionFlags::ALL), ExceptionFlag::Overflow.into());
    });
}

#[test]
fn parent_changes_after_spawn_are_invisible_to_child() {
    with_env(|env| {
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();
        let (go_tx, go_rx) = std::sync::mpsc::channel::<()>();

        let child = thread::spawn(move || {
            let env = FpEnv::acquire().unwrap();
            env.apply(&EnvConfig::default()).unwrap();
            ready_tx.send(()).unwrap();
            go_rx.recv().unwrap();
            env.rounding().get().unwrap()
        });

        ready_rx.recv().unwrap();
        env.rounding().set(RoundingMode::TowardZero).unwrap();
        go_tx.send(()).unwrap();

        assert_eq!(child.join().unwrap(), RoundingMode::ToNearest);
        assert_eq!(env.rounding().get().unwrap(), RoundingMode::TowardZero);
    });
}

#[test]
fn threads_compute_under_their_own_modes() {
    let results: Vec<(RoundingMode, f64)> = RoundingMode::ALL
        .into_iter()
        .map(|mode| {
            thread::spawn(move || {
                let env = FpEnv::acquire().unwrap();
                env.apply(&EnvConfig { rounding: mode, ..EnvConfig::default() }).unwrap();
                (mode, strict::div(1.0, 3.0))
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let down = results[1].1;
    let up = results[2].1;
    assert_eq!(results[0].1, 1.0 / 3.0);
    assert!(down < up);
    assert_eq!(results[3].1, down);
}
