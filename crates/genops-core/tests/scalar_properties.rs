//! Properties of the primitive fast path

use approx::assert_relative_eq;
use genops_core::{Error, OperationKind, Resolver};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::cmp::Ordering;

macro_rules! compare_agrees_with_predicates {
    ($($name:ident: $ty:ty),*) => {
        proptest! {
            $(
                #[test]
                fn $name(x in any::<$ty>(), y in any::<$ty>()) {
                    let r = Resolver::new();
                    let order = r.compare(&x, &y).unwrap();
                    prop_assert_eq!(order, x.cmp(&y));
                    prop_assert_eq!(r.less_than(&x, &y).unwrap(), order == Ordering::Less);
                    prop_assert_eq!(r.less_than_or_equals(&x, &y).unwrap(), order != Ordering::Greater);
                    prop_assert_eq!(r.greater_than(&x, &y).unwrap(), order == Ordering::Greater);
                    prop_assert_eq!(r.greater_than_or_equals(&x, &y).unwrap(), order != Ordering::Less);
                    prop_assert_eq!(r.equals(&x, &y).unwrap(), x == y);
                }
            )*
        }
    };
}

compare_agrees_with_predicates!(
    prop_u8_compare: u8,
    prop_i8_compare: i8,
    prop_u16_compare: u16,
    prop_i16_compare: i16,
    prop_u32_compare: u32,
    prop_i32_compare: i32,
    prop_u64_compare: u64,
    prop_i64_compare: i64
);

proptest! {
    #[test]
    fn prop_float_compare_unsupported_equals_native(x in any::<f64>(), y in any::<f64>()) {
        let r = Resolver::new();
        let compare_unsupported = matches!(
            r.compare(&x, &y),
            Err(Error::UnsupportedOperation { operation: OperationKind::Compare, .. })
        );
        prop_assert!(compare_unsupported);
        prop_assert!(r.less_than(&x, &y).is_err());
        prop_assert_eq!(r.equals(&x, &y).unwrap(), x == y);

        let (a, b) = (x as f32, y as f32);
        prop_assert!(r.compare(&a, &b).is_err());
        prop_assert_eq!(r.equals(&a, &b).unwrap(), a == b);
    }

    #[test]
    fn prop_checked_add_never_wraps(x in any::<i16>(), y in any::<i16>()) {
        let r = Resolver::new();
        match x.checked_add(y) {
            Some(sum) => prop_assert_eq!(r.add_checked(&x, &y).unwrap(), sum),
            None => {
                let overflowed = matches!(
                    r.add_checked(&x, &y),
                    Err(Error::ArithmeticOverflow { .. })
                );
                prop_assert!(overflowed);
            }
        }
        prop_assert_eq!(r.add(&x, &y).unwrap(), x.wrapping_add(y));
    }
}

#[test]
fn test_nan_equality_follows_ieee() {
    let r = Resolver::new();
    assert!(!r.equals(&f64::NAN, &f64::NAN).unwrap());
    assert!(!r.equals(&f32::NAN, &f32::NAN).unwrap());
    assert!(r.equals(&0.0f64, &-0.0f64).unwrap());
}

#[test]
fn test_float_arithmetic_follows_ieee() {
    let r = Resolver::new();
    assert_relative_eq!(r.add(&0.1f64, &0.2).unwrap(), 0.3, epsilon = 1e-15);
    assert_relative_eq!(r.multiply_checked(&1.1f32, &1.1).unwrap(), 1.21, epsilon = 1e-6);
    assert_relative_eq!(r.modulo(&-7.5f64, &2.0).unwrap(), -1.5);
    assert!(r.divide(&0.0f64, &0.0).unwrap().is_nan());
    assert_eq!(r.divide(&-1.0f64, &0.0).unwrap(), f64::NEG_INFINITY);
}

#[test]
fn test_bool_and_decimal_compare_unsupported() {
    let r = Resolver::new();
    assert!(r.compare(&true, &false).is_err());
    assert!(r.equals(&true, &true).unwrap());

    let a = Decimal::new(12345, 2);
    let b = Decimal::new(123450, 3);
    assert!(r.compare(&a, &b).is_err());
    assert!(r.equals(&a, &b).unwrap());
}

#[test]
fn test_i8_max_plus_one_overflows() {
    let r = Resolver::new();
    match r.add_checked(&i8::MAX, &1) {
        Err(Error::ArithmeticOverflow { operation, type_name }) => {
            assert_eq!(operation, OperationKind::AddChecked);
            assert_eq!(type_name, "i8");
        }
        other => panic!("expected overflow, got {other:?}"),
    }
}
