//! Classification tests.
//!
//! Classification is decided by the exponent and mantissa fields alone, so these tests probe
//! the field boundaries and check that classifying never touches the flag register.

use fpenv_core::{Binary64, ExceptionFlags, FloatClass, classify, is_signaling_nan, isnormal};
use proptest::prelude::*;
use rstest::rstest;

use crate::common::with_env;

#[rstest]
#[case::positive_zero(0.0, FloatClass::Zero)]
#[case::negative_zero(-0.0, FloatClass::Zero)]
#[case::one(1.0, FloatClass::Normal)]
#[case::negative_max(-f64::MAX, FloatClass::Normal)]
#[case::min_positive(f64::MIN_POSITIVE, FloatClass::Normal)]
#[case::largest_subnormal(f64::from_bits(0x000F_FFFF_FFFF_FFFF), FloatClass::Subnormal)]
#[case::smallest_subnormal(f64::from_bits(1), FloatClass::Subnormal)]
#[case::negative_subnormal(-f64::from_bits(1), FloatClass::Subnormal)]
#[case::positive_infinity(f64::INFINITY, FloatClass::Infinite)]
#[case::negative_infinity(f64::NEG_INFINITY, FloatClass::Infinite)]
#[case::quiet_nan(f64::NAN, FloatClass::Nan)]
#[case::negative_quiet_nan(-f64::NAN, FloatClass::Nan)]
#[case::signaling_nan(f64::from_bits(0x7FF0_0000_0000_0001), FloatClass::Nan)]
#[case::payload_nan(f64::from_bits(0x7FF4_0000_DEAD_BEEF), FloatClass::Nan)]
fn classifies_landmarks(#[case] value: f64, #[case] expected: FloatClass) {
    assert_eq!(classify(value), expected);
    assert_eq!(isnormal(value), expected == FloatClass::Normal);
}

#[test]
fn smallest_normal_times_epsilon_is_subnormal() {
    let smallest_normal = f64::MIN_POSITIVE;
    let tiny = smallest_normal * f64::EPSILON;
    assert_eq!(classify(smallest_normal), FloatClass::Normal);
    assert_eq!(classify(tiny), FloatClass::Subnormal);
    assert_eq!(classify(0.0), FloatClass::Zero);
}

#[test]
fn names_match_math_h() {
    let names: Vec<_> = FloatClass::ALL.iter().map(ToString::to_string).collect();
    assert_eq!(names, ["NAN", "INFINITE", "ZERO", "SUBNORMAL", "NORMAL"]);
}

#[test]
fn classifying_a_signaling_nan_raises_nothing() {
    with_env(|env| {
        let snan = std::hint::black_box(f64::from_bits(0x7FF0_0000_0000_0001));
        assert_eq!(classify(snan), FloatClass::Nan);
        assert!(is_signaling_nan(snan));
        assert!(!isnormal(snan));
        assert_eq!(env.exceptions().test(ExceptionFlags::ALL), ExceptionFlags::EMPTY);
    });
}

#[test]
fn classifying_leaves_raised_flags_alone() {
    with_env(|env| {
        env.exceptions().raise(ExceptionFlags::STANDARD).unwrap();
        for x in [0.0, f64::from_bits(1), 1.0, f64::INFINITY, f64::NAN] {
            let _ = classify(std::hint::black_box(x));
        }
        assert_eq!(env.exceptions().test(ExceptionFlags::ALL), ExceptionFlags::STANDARD);
    });
}

proptest! {
    #[test]
    fn finite_nonzero_non_subnormal_is_normal(
        exponent in 1u16..0x7FF,
        mantissa in 0u64..(1 << 52),
        sign in any::<bool>(),
    ) {
        let x = Binary64 { sign, exponent, mantissa }.to_f64();
        prop_assert_eq!(classify(x), FloatClass::Normal);
        prop_assert!(isnormal(x));
    }

    #[test]
    fn agrees_with_std_on_every_pattern(bits in any::<u64>()) {
        let x = f64::from_bits(bits);
        prop_assert_eq!(classify(x), FloatClass::from(x.classify()));
    }
}
