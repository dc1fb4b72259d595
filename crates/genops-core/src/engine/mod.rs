//! Vector engines for bulk element-wise operations
//!
//! An engine applies one operation across whole sequences. Engines form a
//! chain: every [`SpecializedEngine`] holds a fallback, and every chain ends
//! in an [`EmulatedEngine`], which evaluates element by element through the
//! [`Resolver`](crate::Resolver). Chains are built bottom-up, so a fallback
//! always exists before the engine that points at it and cycles cannot form.
//!
//! # Routing
//!
//! Entry points in [`VectorOps`] validate lengths first, then identify the
//! element type once:
//!
//! - the ten vectorizable primitives travel as typed [`Lanes`] and are offered
//!   to each specialized engine's [`Kernels`] on the way down
//! - every other type, `bool` and `Decimal` included, travels as
//!   [`Lanes::Other`] straight to the emulated terminal
//!
//! Regardless of which engine handles a call, element `i` of the destination
//! equals the scalar operation applied to element `i` of the operands.

mod call;
mod emulated;
mod specialized;

pub use call::{BulkCall, ErasedCall, Lanes, Operands, ShiftOperands};
pub use emulated::EmulatedEngine;
pub use specialized::{Kernels, SpecializedEngine};

use crate::error::{Error, Result};
use crate::numeric::{Scalar, Seal};
use crate::ops::{BinaryOp, RelationalOp, ShiftOp, UnaryOp};
use std::cmp::Ordering;
use std::fmt;

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// One link of an engine chain
///
/// Implemented only by [`EmulatedEngine`] and [`SpecializedEngine`]; new
/// fast paths plug in as [`Kernels`].
pub trait VectorEngine: sealed::Sealed + Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// The next engine down the chain, `None` for the terminal
    fn fallback(&self) -> Option<&dyn VectorEngine>;

    /// Run an identified bulk call
    ///
    /// Calls reaching an engine here may not have gone through
    /// [`VectorOps`], so every engine checks lengths before reading operands
    /// and fails with [`Error::LengthMismatch`] on a mismatch. The default
    /// forwards to the fallback.
    fn dispatch(&self, lanes: Lanes<'_>) -> Result<()> {
        match self.fallback() {
            Some(fallback) => fallback.dispatch(lanes),
            None => Err(Error::Execution(format!(
                "engine '{}' has no fallback for {} on {}",
                self.name(),
                lanes.kind(),
                lanes.type_name()
            ))),
        }
    }

    /// Engine names from this engine down to the terminal
    fn chain(&self) -> Vec<&str> {
        let mut names = vec![self.name()];
        let mut next = self.fallback();
        while let Some(engine) = next {
            names.push(engine.name());
            next = engine.fallback();
        }
        names
    }
}

macro_rules! binary_entry_points {
    ($($op:ident => $vv:ident, $vs:ident, $sv:ident;)*) => {
        $(
            #[doc = concat!("Element-wise `", stringify!($vv), "` of two sequences")]
            fn $vv<T: Scalar>(&self, lhs: &[T], rhs: &[T], dst: &mut [T]) -> Result<()> {
                self.binary(BinaryOp::$op, Operands::VectorVector(lhs, rhs), dst)
            }

            #[doc = concat!("Element-wise `", stringify!($vv), "` of a sequence and a scalar right operand")]
            fn $vs<T: Scalar>(&self, lhs: &[T], rhs: &T, dst: &mut [T]) -> Result<()> {
                self.binary(BinaryOp::$op, Operands::VectorScalar(lhs, rhs), dst)
            }

            #[doc = concat!("Element-wise `", stringify!($vv), "` of a scalar left operand and a sequence")]
            fn $sv<T: Scalar>(&self, lhs: &T, rhs: &[T], dst: &mut [T]) -> Result<()> {
                self.binary(BinaryOp::$op, Operands::ScalarVector(lhs, rhs), dst)
            }
        )*
    };
}

macro_rules! shift_entry_points {
    ($($op:ident => $vs:ident, $vv:ident, $sv:ident;)*) => {
        $(
            /// Shift every element by the same count
            fn $vs<T: Scalar>(&self, input: &[T], count: i32, dst: &mut [T]) -> Result<()> {
                self.shift(ShiftOp::$op, ShiftOperands::VectorScalar(input, count), dst)
            }

            /// Shift element `i` by `counts[i]`
            fn $vv<T: Scalar>(&self, input: &[T], counts: &[i32], dst: &mut [T]) -> Result<()> {
                self.shift(ShiftOp::$op, ShiftOperands::VectorVector(input, counts), dst)
            }

            /// Shift one value by each count
            fn $sv<T: Scalar>(&self, value: &T, counts: &[i32], dst: &mut [T]) -> Result<()> {
                self.shift(ShiftOp::$op, ShiftOperands::ScalarVector(value, counts), dst)
            }
        )*
    };
}

macro_rules! predicate_entry_points {
    ($($op:ident => $vv:ident, $vs:ident, $sv:ident;)*) => {
        $(
            fn $vv<T: Scalar>(&self, lhs: &[T], rhs: &[T], dst: &mut [bool]) -> Result<()> {
                self.relational(RelationalOp::$op, Operands::VectorVector(lhs, rhs), dst)
            }

            fn $vs<T: Scalar>(&self, lhs: &[T], rhs: &T, dst: &mut [bool]) -> Result<()> {
                self.relational(RelationalOp::$op, Operands::VectorScalar(lhs, rhs), dst)
            }

            fn $sv<T: Scalar>(&self, lhs: &T, rhs: &[T], dst: &mut [bool]) -> Result<()> {
                self.relational(RelationalOp::$op, Operands::ScalarVector(lhs, rhs), dst)
            }
        )*
    };
}

/// Typed bulk entry points, available on every engine
///
/// Vector-shaped operands must have the destination's length; a mismatch
/// fails with [`Error::LengthMismatch`] before anything is written. Errors
/// raised part-way through a call may leave earlier elements written.
pub trait VectorOps: VectorEngine {
    /// Validate `call` and route it down the chain
    fn execute<T: Scalar>(&self, call: BulkCall<'_, T>) -> Result<()> {
        call.validate()?;
        match T::into_lanes(call, Seal) {
            Ok(lanes) => self.dispatch(lanes),
            Err(call) => {
                let mut erased = call::Erased::new(call);
                self.dispatch(Lanes::Other(&mut erased))
            }
        }
    }

    fn unary<T: Scalar>(&self, op: UnaryOp, input: &[T], dst: &mut [T]) -> Result<()> {
        self.execute(BulkCall::Unary { op, input, dst })
    }

    fn binary<T: Scalar>(&self, op: BinaryOp, operands: Operands<'_, T>, dst: &mut [T]) -> Result<()> {
        self.execute(BulkCall::Binary { op, operands, dst })
    }

    fn shift<T: Scalar>(
        &self,
        op: ShiftOp,
        operands: ShiftOperands<'_, T>,
        dst: &mut [T],
    ) -> Result<()> {
        self.execute(BulkCall::Shift { op, operands, dst })
    }

    fn relational<T: Scalar>(
        &self,
        op: RelationalOp,
        operands: Operands<'_, T>,
        dst: &mut [bool],
    ) -> Result<()> {
        self.execute(BulkCall::Relational { op, operands, dst })
    }

    // =========================================================================
    // Unary
    // =========================================================================

    fn plus<T: Scalar>(&self, input: &[T], dst: &mut [T]) -> Result<()> {
        self.unary(UnaryOp::Plus, input, dst)
    }

    fn negate<T: Scalar>(&self, input: &[T], dst: &mut [T]) -> Result<()> {
        self.unary(UnaryOp::Negate, input, dst)
    }

    fn not<T: Scalar>(&self, input: &[T], dst: &mut [T]) -> Result<()> {
        self.unary(UnaryOp::Not, input, dst)
    }

    fn ones_complement<T: Scalar>(&self, input: &[T], dst: &mut [T]) -> Result<()> {
        self.unary(UnaryOp::OnesComplement, input, dst)
    }

    // =========================================================================
    // Binary, in vector-vector, vector-scalar and scalar-vector shapes
    // =========================================================================

    binary_entry_points! {
        Add => add, add_scalar, scalar_add;
        AddChecked => add_checked, add_checked_scalar, scalar_add_checked;
        Subtract => subtract, subtract_scalar, scalar_subtract;
        SubtractChecked => subtract_checked, subtract_checked_scalar, scalar_subtract_checked;
        Multiply => multiply, multiply_scalar, scalar_multiply;
        MultiplyChecked => multiply_checked, multiply_checked_scalar, scalar_multiply_checked;
        Divide => divide, divide_scalar, scalar_divide;
        Modulo => modulo, modulo_scalar, scalar_modulo;
        Or => or, or_scalar, scalar_or;
        And => and, and_scalar, scalar_and;
        Xor => xor, xor_scalar, scalar_xor;
    }

    // =========================================================================
    // Shifts
    // =========================================================================

    shift_entry_points! {
        Left => shift_left, shift_left_by, scalar_shift_left;
        Right => shift_right, shift_right_by, scalar_shift_right;
    }

    // =========================================================================
    // Equality and ordering
    // =========================================================================

    fn equals<T: Scalar>(&self, lhs: &[T], rhs: &[T], dst: &mut [bool]) -> Result<()> {
        self.execute(BulkCall::Equals {
            operands: Operands::VectorVector(lhs, rhs),
            dst,
        })
    }

    fn equals_scalar<T: Scalar>(&self, lhs: &[T], rhs: &T, dst: &mut [bool]) -> Result<()> {
        self.execute(BulkCall::Equals {
            operands: Operands::VectorScalar(lhs, rhs),
            dst,
        })
    }

    fn scalar_equals<T: Scalar>(&self, lhs: &T, rhs: &[T], dst: &mut [bool]) -> Result<()> {
        self.execute(BulkCall::Equals {
            operands: Operands::ScalarVector(lhs, rhs),
            dst,
        })
    }

    fn compare<T: Scalar>(&self, lhs: &[T], rhs: &[T], dst: &mut [Ordering]) -> Result<()> {
        self.execute(BulkCall::Compare {
            operands: Operands::VectorVector(lhs, rhs),
            dst,
        })
    }

    fn compare_scalar<T: Scalar>(&self, lhs: &[T], rhs: &T, dst: &mut [Ordering]) -> Result<()> {
        self.execute(BulkCall::Compare {
            operands: Operands::VectorScalar(lhs, rhs),
            dst,
        })
    }

    fn scalar_compare<T: Scalar>(&self, lhs: &T, rhs: &[T], dst: &mut [Ordering]) -> Result<()> {
        self.execute(BulkCall::Compare {
            operands: Operands::ScalarVector(lhs, rhs),
            dst,
        })
    }

    predicate_entry_points! {
        LessThan => less_than, less_than_scalar, scalar_less_than;
        LessThanOrEquals => less_than_or_equals, less_than_or_equals_scalar, scalar_less_than_or_equals;
        GreaterThan => greater_than, greater_than_scalar, scalar_greater_than;
        GreaterThanOrEquals => greater_than_or_equals, greater_than_or_equals_scalar, scalar_greater_than_or_equals;
    }
}

impl<E: VectorEngine + ?Sized> VectorOps for E {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::OperationKind;
    use crate::resolver::Resolver;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn engine() -> Arc<dyn VectorEngine> {
        Arc::new(EmulatedEngine::sequential(Arc::new(Resolver::new())))
    }

    #[test]
    fn test_length_mismatch_leaves_destination() {
        let engine = engine();
        let a = [1u32, 2, 3];
        let b = [1u32, 2];
        let mut dst = [7u32; 3];
        let err = engine.add(&a, &b, &mut dst).unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                expected: 3,
                actual: 2,
                operand: "rhs"
            }
        ));
        assert_eq!(dst, [7, 7, 7]);

        let mut short = [0u32; 2];
        assert!(engine.negate(&a, &mut short).is_err());
        assert_eq!(short, [0, 0]);
    }

    #[test]
    fn test_scalar_shapes() {
        let engine = engine();
        let v = [10i64, 20, 30];
        let mut dst = [0i64; 3];

        engine.divide_scalar(&v, &10, &mut dst).unwrap();
        assert_eq!(dst, [1, 2, 3]);

        engine.scalar_divide(&60, &v, &mut dst).unwrap();
        assert_eq!(dst, [6, 3, 2]);

        engine.scalar_modulo(&25, &v, &mut dst).unwrap();
        assert_eq!(dst, [5, 5, 25]);
    }

    #[test]
    fn test_compare_and_predicates() {
        let engine = engine();
        let a = [1u8, 5, 9];
        let mut order = [Ordering::Equal; 3];
        engine.compare_scalar(&a, &5, &mut order).unwrap();
        assert_eq!(order, [Ordering::Less, Ordering::Equal, Ordering::Greater]);

        let mut flags = [false; 3];
        engine.scalar_greater_than_or_equals(&5, &a, &mut flags).unwrap();
        assert_eq!(flags, [true, true, false]);

        engine.equals_scalar(&a, &9, &mut flags).unwrap();
        assert_eq!(flags, [false, false, true]);
    }

    #[test]
    fn test_bool_and_decimal_travel_as_other() {
        let engine = engine();
        let flags = [true, false];
        let mut dst = [false; 2];
        engine.not(&flags, &mut dst).unwrap();
        assert_eq!(dst, [false, true]);

        let mut order = [Ordering::Equal; 2];
        let err = engine.compare(&flags, &flags, &mut order).unwrap_err();
        assert_eq!(err.operation(), Some(OperationKind::Compare));

        let prices = [Decimal::new(150, 2), Decimal::new(-25, 1)];
        let mut out = [Decimal::ZERO; 2];
        engine.multiply_scalar(&prices, &Decimal::TWO, &mut out).unwrap();
        assert_eq!(out, [Decimal::new(300, 2), Decimal::new(-50, 1)]);
    }

    #[test]
    fn test_shift_entry_points() {
        let engine = engine();
        let x = [1u16, 2, 0x8000];
        let mut dst = [0u16; 3];
        engine.shift_left(&x, 1, &mut dst).unwrap();
        assert_eq!(dst, [2, 4, 0]);
        engine.shift_right(&x, 17, &mut dst).unwrap();
        assert_eq!(dst, [0, 1, 0x4000]);

        engine.shift_left_by(&x, &[0, 3, 1], &mut dst).unwrap();
        assert_eq!(dst, [1, 16, 0]);
        engine.scalar_shift_right(&0x80u16, &[7, 4, 16], &mut dst).unwrap();
        assert_eq!(dst, [1, 8, 0x80]);

        let err = engine.shift_right_by(&x, &[1, 2], &mut dst).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { operand: "counts", .. }));
        assert_eq!(dst, [1, 8, 0x80]);
    }
}
