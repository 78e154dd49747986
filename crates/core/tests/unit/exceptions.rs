//! Exception-flag tests against the host register.

use fpenv_core::{ExceptionFlag, ExceptionFlags, FenvError, RoundingMode, strict};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::with_env;

const STANDARD: [ExceptionFlag; 5] = [
    ExceptionFlag::Invalid,
    ExceptionFlag::DivByZero,
    ExceptionFlag::Overflow,
    ExceptionFlag::Underflow,
    ExceptionFlag::Inexact,
];

#[test]
fn cleared_register_reports_nothing() {
    with_env(|env| assert_eq!(env.exceptions().test(ExceptionFlags::ALL), ExceptionFlags::EMPTY));
}

// ══════════════════════════════════════════════════════════
// Flags raised by arithmetic
// ══════════════════════════════════════════════════════════

#[test]
fn three_tenths_is_inexact_but_two_tenths_is_not() {
    with_env(|env| {
        let inexact = env.exceptions().flag(ExceptionFlag::Inexact);

        let _ = strict::add(0.1, 0.1);
        assert!(!inexact.test(), "0.1 + 0.1 is exact in binary64");

        let _ = strict::add(strict::add(0.1, 0.1), 0.1);
        assert!(inexact.test());
    });
}

#[rstest]
#[case::overflow(strict::mul, f64::MAX, 2.0, ExceptionFlag::Overflow | ExceptionFlag::Inexact)]
#[case::underflow(strict::mul, 1e-300, 1e-300, ExceptionFlag::Underflow | ExceptionFlag::Inexact)]
#[case::div_by_zero(strict::div, 1.0, 0.0, ExceptionFlag::DivByZero.into())]
#[case::zero_by_zero(strict::div, 0.0, 0.0, ExceptionFlag::Invalid.into())]
#[case::inf_minus_inf(strict::sub, f64::INFINITY, f64::INFINITY, ExceptionFlag::Invalid.into())]
#[case::exact(strict::mul, 1.5, 2.0, ExceptionFlags::EMPTY)]
fn operation_raises(
    #[case] op: fn(f64, f64) -> f64,
    #[case] a: f64,
    #[case] b: f64,
    #[case] expected: ExceptionFlags,
) {
    with_env(|env| {
        let _ = op(a, b);
        assert_eq!(env.exceptions().test(ExceptionFlags::ALL), expected);
    });
}

#[test]
fn sqrt_of_negative_is_invalid() {
    with_env(|env| {
        assert!(strict::sqrt(-1.0).is_nan());
        assert_eq!(env.exceptions().test(ExceptionFlags::ALL), ExceptionFlag::Invalid.into());
    });
}

#[test]
fn flags_are_sticky() {
    with_env(|env| {
        let _ = strict::div(1.0, 0.0);
        for _ in 0..8 {
            let _ = strict::add(1.0, 2.0);
        }
        assert!(env.exceptions().flag(ExceptionFlag::DivByZero).test());
    });
}

// ══════════════════════════════════════════════════════════
// Register operations
// ══════════════════════════════════════════════════════════

#[rstest]
fn raise_test_clear_round_trip(
    #[values(
        ExceptionFlag::Invalid,
        ExceptionFlag::DivByZero,
        ExceptionFlag::Overflow,
        ExceptionFlag::Underflow,
        ExceptionFlag::Inexact
    )]
    flag: ExceptionFlag,
) {
    with_env(|env| {
        let view = env.exceptions().flag(flag);
        assert!(!view.test());
        view.raise().unwrap();
        assert!(view.test());
        assert_eq!(env.exceptions().test(ExceptionFlags::ALL), flag.into());
        view.clear().unwrap();
        assert!(!view.test());
    });
}

#[test]
fn clearing_one_flag_leaves_the_others() {
    with_env(|env| {
        let register = env.exceptions();
        register.raise(ExceptionFlag::Invalid | ExceptionFlag::Inexact).unwrap();

        register.clear(ExceptionFlag::Inexact).unwrap();
        assert_eq!(register.test(ExceptionFlags::ALL), ExceptionFlag::Invalid.into());

        register.raise(ExceptionFlag::Inexact).unwrap();
        register.clear(ExceptionFlag::Invalid).unwrap();
        assert_eq!(register.test(ExceptionFlags::ALL), ExceptionFlag::Inexact.into());
    });
}

#[test]
fn test_reports_only_requested_flags() {
    with_env(|env| {
        let register = env.exceptions();
        register.raise(ExceptionFlag::Overflow | ExceptionFlag::Underflow).unwrap();
        assert_eq!(
            register.test(ExceptionFlag::Overflow | ExceptionFlag::Inexact),
            ExceptionFlag::Overflow.into()
        );
        assert_eq!(register.test(ExceptionFlags::STANDARD).len(), 2);
    });
}

#[test]
fn clearing_a_clear_flag_is_a_no_op() {
    with_env(|env| {
        env.exceptions().clear(ExceptionFlags::ALL).unwrap();
        env.exceptions().clear(ExceptionFlag::Overflow).unwrap();
        assert!(env.exceptions().test(ExceptionFlags::ALL).is_empty());
    });
}

#[test]
fn raising_every_standard_flag() {
    with_env(|env| {
        let all: ExceptionFlags = STANDARD.into_iter().collect();
        env.exceptions().raise(all).unwrap();
        assert_eq!(env.exceptions().test(ExceptionFlags::ALL), ExceptionFlags::STANDARD);
    });
}

#[test]
fn denorm_is_reported_unsupported() {
    with_env(|env| {
        assert!(!env.capabilities().supported_flags.has(ExceptionFlag::Denorm));
        assert_eq!(
            env.exceptions().raise(ExceptionFlag::Denorm | ExceptionFlag::Inexact).unwrap_err(),
            FenvError::UnsupportedFlag(ExceptionFlag::Denorm)
        );
        assert!(env.exceptions().test(ExceptionFlags::ALL).is_empty());

        // Arithmetic on a subnormal never shows up as DENORM.
        let _ = strict::mul(f64::MIN_POSITIVE / 4.0, 2.0);
        assert!(!env.exceptions().flag(ExceptionFlag::Denorm).test());
        env.exceptions().clear(ExceptionFlag::Denorm).unwrap();
    });
}

#[test]
fn save_and_restore_selected_flags() {
    with_env(|env| {
        let register = env.exceptions();
        register.raise(ExceptionFlag::Inexact).unwrap();
        let saved = register.save(ExceptionFlag::Inexact | ExceptionFlag::Overflow);
        assert_eq!(saved.raised(), ExceptionFlag::Inexact.into());

        register.clear(ExceptionFlags::ALL).unwrap();
        register.raise(ExceptionFlag::Overflow | ExceptionFlag::Invalid).unwrap();
        register.restore(&saved, ExceptionFlags::ALL).unwrap();

        // INVALID was not captured and is left alone.
        assert_eq!(
            register.test(ExceptionFlags::ALL),
            ExceptionFlag::Inexact | ExceptionFlag::Invalid
        );
    });
}

#[test]
fn flags_and_mode_are_independent() {
    with_env(|env| {
        env.rounding().set(RoundingMode::Upward).unwrap();
        env.exceptions().raise(ExceptionFlags::STANDARD).unwrap();
        env.exceptions().clear(ExceptionFlags::ALL).unwrap();
        assert_eq!(env.rounding().get().unwrap(), RoundingMode::Upward);
    });
}

#[cfg(all(target_os = "linux", target_env = "gnu", target_arch = "x86_64"))]
#[test]
fn traps_can_be_toggled() {
    with_env(|env| {
        let register = env.exceptions();
        assert!(env.capabilities().traps);
        let initial = register.enabled_traps().unwrap();

        // Nothing is raised while the trap is armed.
        let previous = register.enable_traps(ExceptionFlag::DivByZero).unwrap();
        assert_eq!(previous, initial);
        assert!(register.enabled_traps().unwrap().has(ExceptionFlag::DivByZero));

        let previous = register.disable_traps(ExceptionFlag::DivByZero).unwrap();
        assert!(previous.has(ExceptionFlag::DivByZero));
        assert_eq!(register.enabled_traps().unwrap(), initial);
    });
}

#[test]
fn trapping_denorm_is_unsupported() {
    with_env(|env| {
        assert_eq!(
            env.exceptions().enable_traps(ExceptionFlag::Denorm).unwrap_err(),
            FenvError::UnsupportedFlag(ExceptionFlag::Denorm)
        );
    });
}
