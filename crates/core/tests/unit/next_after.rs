//! `nextafter` tests.

use fpenv_core::{ExceptionFlags, FloatClass, classify, next_down, next_up, nextafter};
use proptest::prelude::*;
use rstest::rstest;

use crate::common::with_env;

const TINY: f64 = 4.9406564584124654e-324;

#[rstest]
#[case::up_from_one(1.0, 2.0, 1.0 + f64::EPSILON)]
#[case::down_from_one(1.0, 0.0, 1.0 - f64::EPSILON / 2.0)]
#[case::zero_toward_positive(0.0, 1.0, TINY)]
#[case::zero_toward_negative(0.0, -1.0, -TINY)]
#[case::negative_zero_toward_positive(-0.0, 1.0, TINY)]
#[case::max_to_infinity(f64::MAX, f64::INFINITY, f64::INFINITY)]
#[case::negative_max_to_infinity(-f64::MAX, f64::NEG_INFINITY, f64::NEG_INFINITY)]
#[case::infinity_inward(f64::INFINITY, 0.0, f64::MAX)]
#[case::negative_infinity_inward(f64::NEG_INFINITY, 0.0, -f64::MAX)]
#[case::into_subnormals(f64::MIN_POSITIVE, 0.0, f64::from_bits(0x000F_FFFF_FFFF_FFFF))]
#[case::out_of_subnormals(f64::from_bits(0x000F_FFFF_FFFF_FFFF), 1.0, f64::MIN_POSITIVE)]
#[case::negative_toward_zero(-1.0, 0.0, -(1.0 - f64::EPSILON / 2.0))]
fn steps_one_ulp(#[case] from: f64, #[case] toward: f64, #[case] expected: f64) {
    assert_eq!(nextafter(from, toward).to_bits(), expected.to_bits());
}

#[test]
fn stepping_off_zero_never_skips_subnormals() {
    let first = nextafter(0.0, f64::MAX);
    assert_eq!(classify(first), FloatClass::Subnormal);
    assert_eq!(first.to_bits(), 1);
}

#[test]
fn equal_arguments_return_toward() {
    assert!(nextafter(0.0, -0.0).is_sign_negative());
    assert!(nextafter(-0.0, 0.0).is_sign_positive());
    assert_eq!(nextafter(f64::INFINITY, f64::INFINITY), f64::INFINITY);
}

#[test]
fn nan_propagates() {
    assert!(nextafter(f64::NAN, 1.0).is_nan());
    assert!(nextafter(1.0, f64::NAN).is_nan());
    assert!(nextafter(f64::NAN, f64::NAN).is_nan());
}

#[test]
fn next_up_and_down_bracket() {
    for x in [-1.0e300, -1.0, -TINY, 0.0, TINY, 1.0, 1.0e300] {
        assert!(next_down(x) < x && x < next_up(x), "{x:e}");
    }
}

#[test]
fn stepping_raises_no_flags() {
    with_env(|env| {
        let _ = std::hint::black_box(nextafter(std::hint::black_box(f64::MAX), f64::INFINITY));
        let _ = std::hint::black_box(nextafter(std::hint::black_box(f64::MIN_POSITIVE), 0.0));
        let _ = std::hint::black_box(nextafter(std::hint::black_box(0.0), 1.0));
        assert_eq!(env.exceptions().test(ExceptionFlags::ALL), ExceptionFlags::EMPTY);
    });
}

fn non_nan() -> impl Strategy<Value = f64> {
    any::<u64>().prop_map(f64::from_bits).prop_filter("not NaN", |x| !x.is_nan())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    #[test]
    fn step_and_back_returns_origin(x in non_nan(), y in non_nan()) {
        prop_assume!(x != y);
        let there = nextafter(x, y);
        prop_assert_eq!(nextafter(there, x), x);
    }

    #[test]
    fn step_toward_self_is_identity(x in non_nan()) {
        prop_assert_eq!(nextafter(x, x).to_bits(), x.to_bits());
    }

    #[test]
    fn step_moves_strictly_toward_target(x in non_nan(), y in non_nan()) {
        prop_assume!(x != y);
        let there = nextafter(x, y);
        if x < y {
            prop_assert!(there > x && there <= y);
        } else {
            prop_assert!(there < x && there >= y);
        }
    }
}
