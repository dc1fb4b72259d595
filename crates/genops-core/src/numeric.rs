//! The primitive set and the `Scalar` bound
//!
//! Every generic body in this crate is written against [`Scalar`]. Its methods
//! default to the extension path (the registry inside a [`Resolver`]); the
//! built-in primitives override all of them with native code, so for
//! those types monomorphization selects the native operator at compile time
//! and the registry is never consulted.
//!
//! # Fast-path semantics
//!
//! - Unchecked integer arithmetic wraps, checked variants report overflow
//! - Integer division by zero reports [`Error::DivisionByZero`], `MIN / -1`
//!   reports overflow
//! - Shift counts are masked to the bit width of the type
//! - Floats follow IEEE semantics; checked variants behave as unchecked
//! - `Decimal` reports overflow for every arithmetic operation
//! - `Compare` is unavailable for `bool`, `f32`, `f64` and `Decimal`;
//!   `Equals` is available everywhere and uses native equality

use crate::engine::{BulkCall, Lanes};
use crate::error::{Error, Result};
use crate::ops::{BinaryOp, OperationKind, ShiftOp, UnaryOp};
use crate::provider::ProviderTag;
use crate::resolver::Resolver;
use num_traits::{
    CheckedRem, Float, PrimInt, WrappingAdd, WrappingMul, WrappingNeg, WrappingShl, WrappingShr,
    WrappingSub,
};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;

/// The closed set of types with a built-in fast path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
    Decimal,
}

impl Primitive {
    pub const ALL: [Primitive; 12] = [
        Self::Bool,
        Self::U8,
        Self::I8,
        Self::U16,
        Self::I16,
        Self::U32,
        Self::I32,
        Self::U64,
        Self::I64,
        Self::F32,
        Self::F64,
        Self::Decimal,
    ];

    /// Types the specialized engine dispatches on, in dispatch order
    pub const VECTORIZABLE: [Primitive; 10] = [
        Self::U8,
        Self::I8,
        Self::U16,
        Self::I16,
        Self::U32,
        Self::I32,
        Self::U64,
        Self::I64,
        Self::F32,
        Self::F64,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::U32 => "u32",
            Self::I32 => "i32",
            Self::U64 => "u64",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Decimal => "decimal",
        }
    }

    pub fn size_bytes(&self) -> usize {
        match self {
            Self::Bool | Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
            Self::Decimal => 16,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::U8 | Self::I8 | Self::U16 | Self::I16 | Self::U32 | Self::I32 | Self::U64 | Self::I64
        )
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::F32 | Self::F64 | Self::Decimal
        )
    }

    /// Floating-point family, including decimal
    pub fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64 | Self::Decimal)
    }

    pub fn is_vectorizable(&self) -> bool {
        !matches!(self, Self::Bool | Self::Decimal)
    }

    /// The primitive `T` is, `None` for every custom type
    pub fn of<T: Scalar>() -> Option<Primitive> {
        T::primitive(Seal)
    }

    /// Whether the fast path provides a 3-way compare
    pub fn supports_compare(&self) -> bool {
        self.is_integer()
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

mod private {
    /// Argument only this crate can construct, so only the built-in
    /// primitives can override the fast-path methods of [`Scalar`](super::Scalar)
    #[derive(Debug, Clone, Copy)]
    pub struct Seal;
}

pub(crate) use private::Seal;

/// Bound for every value a generic operation body works on
///
/// Custom types implement this with an empty body, optionally tagging a
/// provider through [`PROVIDER_TAGS`](Scalar::PROVIDER_TAGS), and get their
/// operations from the registry. The remaining methods take a `Seal` that
/// only this crate can name: the built-in primitives override them, every
/// other type keeps the registry defaults, so the scalar resolver and the
/// emulated engine always agree on how a type is evaluated.
///
/// ```rust
/// use genops_core::{OperationProvider, Primitive, Resolver, Result, Scalar};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Grams(u32);
///
/// impl Scalar for Grams {}
///
/// struct GramsOps;
///
/// impl OperationProvider<Grams> for GramsOps {
///     fn add(&self, a: &Grams, b: &Grams) -> Result<Grams> {
///         Ok(Grams(a.0 + b.0))
///     }
/// }
///
/// let resolver = Resolver::new();
/// resolver.register::<Grams, _>(GramsOps).unwrap();
/// assert_eq!(resolver.add(&Grams(2), &Grams(3)).unwrap(), Grams(5));
/// assert_eq!(Primitive::of::<Grams>(), None);
/// ```
///
/// Overriding an operation outside this crate does not compile:
///
/// ```compile_fail
/// use genops_core::{BinaryOp, Resolver, Result, Scalar};
///
/// #[derive(Debug, Clone)]
/// struct Wrapped(i32);
///
/// impl Scalar for Wrapped {
///     fn binary(_: BinaryOp, a: &Self, b: &Self, _: &Resolver) -> Result<Self> {
///         Ok(Wrapped(a.0 + b.0))
///     }
/// }
/// ```
pub trait Scalar: Clone + fmt::Debug + Send + Sync + 'static {
    /// Declarative provider tag consulted by auto-discovery. Exactly one tag
    /// is meaningful; more than one is treated as none.
    const PROVIDER_TAGS: &'static [ProviderTag<Self>] = &[];

    /// Set for the built-in primitives; see [`Primitive::of`]
    #[doc(hidden)]
    fn primitive(_: Seal) -> Option<Primitive> {
        None
    }

    #[doc(hidden)]
    fn unary(op: UnaryOp, x: &Self, resolver: &Resolver, _: Seal) -> Result<Self> {
        resolver
            .provider::<Self>()
            .ok_or_else(|| Error::unsupported::<Self>(op))?
            .unary(op, x)
    }

    #[doc(hidden)]
    fn binary(op: BinaryOp, a: &Self, b: &Self, resolver: &Resolver, _: Seal) -> Result<Self> {
        resolver
            .provider::<Self>()
            .ok_or_else(|| Error::unsupported::<Self>(op))?
            .binary(op, a, b)
    }

    #[doc(hidden)]
    fn shift(op: ShiftOp, x: &Self, count: i32, resolver: &Resolver, _: Seal) -> Result<Self> {
        resolver
            .provider::<Self>()
            .ok_or_else(|| Error::unsupported::<Self>(op))?
            .shift(op, x, count)
    }

    #[doc(hidden)]
    fn equals(a: &Self, b: &Self, resolver: &Resolver, _: Seal) -> Result<bool> {
        resolver
            .provider::<Self>()
            .ok_or_else(|| Error::unsupported::<Self>(OperationKind::Equals))?
            .equals(a, b)
    }

    #[doc(hidden)]
    fn compare(a: &Self, b: &Self, resolver: &Resolver, _: Seal) -> Result<Ordering> {
        resolver
            .provider::<Self>()
            .ok_or_else(|| Error::unsupported::<Self>(OperationKind::Compare))?
            .compare(a, b)
    }

    /// Identify a bulk call as one of the vectorizable primitives, handing the
    /// call back unchanged for every other type
    #[doc(hidden)]
    fn into_lanes(
        call: BulkCall<'_, Self>,
        _: Seal,
    ) -> std::result::Result<Lanes<'_>, BulkCall<'_, Self>> {
        Err(call)
    }
}

// =============================================================================
// Native integer operations
// =============================================================================

trait NativeInt:
    PrimInt
    + WrappingAdd
    + WrappingSub
    + WrappingMul
    + WrappingNeg
    + WrappingShl
    + WrappingShr
    + CheckedRem
    + Scalar
{
}

impl<I> NativeInt for I where
    I: PrimInt
        + WrappingAdd
        + WrappingSub
        + WrappingMul
        + WrappingNeg
        + WrappingShl
        + WrappingShr
        + CheckedRem
        + Scalar
{
}

#[inline]
fn int_unary<I: NativeInt>(op: UnaryOp, x: I) -> Result<I> {
    match op {
        UnaryOp::Plus => Ok(x),
        UnaryOp::Negate => Ok(x.wrapping_neg()),
        UnaryOp::OnesComplement => Ok(!x),
        UnaryOp::Not => Err(Error::unsupported::<I>(op)),
    }
}

#[inline]
fn int_binary<I: NativeInt>(op: BinaryOp, a: I, b: I) -> Result<I> {
    match op {
        BinaryOp::Add => Ok(a.wrapping_add(&b)),
        BinaryOp::Subtract => Ok(a.wrapping_sub(&b)),
        BinaryOp::Multiply => Ok(a.wrapping_mul(&b)),
        BinaryOp::AddChecked => a.checked_add(&b).ok_or_else(|| Error::overflow::<I>(op)),
        BinaryOp::SubtractChecked => a.checked_sub(&b).ok_or_else(|| Error::overflow::<I>(op)),
        BinaryOp::MultiplyChecked => a.checked_mul(&b).ok_or_else(|| Error::overflow::<I>(op)),
        BinaryOp::Divide => {
            if b.is_zero() {
                return Err(Error::division_by_zero::<I>(op));
            }
            a.checked_div(&b).ok_or_else(|| Error::overflow::<I>(op))
        }
        BinaryOp::Modulo => {
            if b.is_zero() {
                return Err(Error::division_by_zero::<I>(op));
            }
            a.checked_rem(&b).ok_or_else(|| Error::overflow::<I>(op))
        }
        BinaryOp::Or => Ok(a | b),
        BinaryOp::And => Ok(a & b),
        BinaryOp::Xor => Ok(a ^ b),
    }
}

#[inline]
fn int_shift<I: NativeInt>(op: ShiftOp, x: I, count: i32) -> I {
    // reinterpreting the count keeps the low bits, which is all the mask uses
    let count = count as u32;
    match op {
        ShiftOp::Left => x.wrapping_shl(count),
        ShiftOp::Right => x.wrapping_shr(count),
    }
}

macro_rules! impl_integer_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                fn primitive(_: Seal) -> Option<Primitive> {
                    Some(Primitive::$variant)
                }

                #[inline]
                fn unary(op: UnaryOp, x: &Self, _: &Resolver, _: Seal) -> Result<Self> {
                    int_unary(op, *x)
                }

                #[inline]
                fn binary(op: BinaryOp, a: &Self, b: &Self, _: &Resolver, _: Seal) -> Result<Self> {
                    int_binary(op, *a, *b)
                }

                #[inline]
                fn shift(op: ShiftOp, x: &Self, count: i32, _: &Resolver, _: Seal) -> Result<Self> {
                    Ok(int_shift(op, *x, count))
                }

                #[inline]
                fn equals(a: &Self, b: &Self, _: &Resolver, _: Seal) -> Result<bool> {
                    Ok(a == b)
                }

                #[inline]
                fn compare(a: &Self, b: &Self, _: &Resolver, _: Seal) -> Result<Ordering> {
                    Ok(a.cmp(b))
                }

                fn into_lanes(
                    call: BulkCall<'_, Self>,
                    _: Seal,
                ) -> std::result::Result<Lanes<'_>, BulkCall<'_, Self>> {
                    Ok(Lanes::$variant(call))
                }
            }
        )*
    };
}

impl_integer_scalar!(
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
);

// =============================================================================
// Native floating-point operations
// =============================================================================

#[inline]
fn float_unary<F: Float + Scalar>(op: UnaryOp, x: F) -> Result<F> {
    match op {
        UnaryOp::Plus => Ok(x),
        UnaryOp::Negate => Ok(-x),
        UnaryOp::Not | UnaryOp::OnesComplement => Err(Error::unsupported::<F>(op)),
    }
}

#[inline]
fn float_binary<F: Float + Scalar>(op: BinaryOp, a: F, b: F) -> Result<F> {
    match op {
        BinaryOp::Add | BinaryOp::AddChecked => Ok(a + b),
        BinaryOp::Subtract | BinaryOp::SubtractChecked => Ok(a - b),
        BinaryOp::Multiply | BinaryOp::MultiplyChecked => Ok(a * b),
        BinaryOp::Divide => Ok(a / b),
        BinaryOp::Modulo => Ok(a % b),
        BinaryOp::Or | BinaryOp::And | BinaryOp::Xor => Err(Error::unsupported::<F>(op)),
    }
}

macro_rules! impl_float_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                fn primitive(_: Seal) -> Option<Primitive> {
                    Some(Primitive::$variant)
                }

                #[inline]
                fn unary(op: UnaryOp, x: &Self, _: &Resolver, _: Seal) -> Result<Self> {
                    float_unary(op, *x)
                }

                #[inline]
                fn binary(op: BinaryOp, a: &Self, b: &Self, _: &Resolver, _: Seal) -> Result<Self> {
                    float_binary(op, *a, *b)
                }

                fn shift(op: ShiftOp, _: &Self, _: i32, _: &Resolver, _: Seal) -> Result<Self> {
                    Err(Error::unsupported::<Self>(op))
                }

                #[inline]
                fn equals(a: &Self, b: &Self, _: &Resolver, _: Seal) -> Result<bool> {
                    Ok(a == b)
                }

                fn compare(_: &Self, _: &Self, _: &Resolver, _: Seal) -> Result<Ordering> {
                    Err(Error::unsupported::<Self>(OperationKind::Compare))
                }

                fn into_lanes(
                    call: BulkCall<'_, Self>,
                    _: Seal,
                ) -> std::result::Result<Lanes<'_>, BulkCall<'_, Self>> {
                    Ok(Lanes::$variant(call))
                }
            }
        )*
    };
}

impl_float_scalar!(f32 => F32, f64 => F64);

// =============================================================================
// bool and Decimal (fast path, never vectorized)
// =============================================================================

impl Scalar for bool {
    fn primitive(_: Seal) -> Option<Primitive> {
        Some(Primitive::Bool)
    }

    fn unary(op: UnaryOp, x: &Self, _: &Resolver, _: Seal) -> Result<Self> {
        match op {
            UnaryOp::Not => Ok(!*x),
            _ => Err(Error::unsupported::<Self>(op)),
        }
    }

    fn binary(op: BinaryOp, a: &Self, b: &Self, _: &Resolver, _: Seal) -> Result<Self> {
        match op {
            BinaryOp::Or => Ok(*a | *b),
            BinaryOp::And => Ok(*a & *b),
            BinaryOp::Xor => Ok(*a ^ *b),
            _ => Err(Error::unsupported::<Self>(op)),
        }
    }

    fn shift(op: ShiftOp, _: &Self, _: i32, _: &Resolver, _: Seal) -> Result<Self> {
        Err(Error::unsupported::<Self>(op))
    }

    fn equals(a: &Self, b: &Self, _: &Resolver, _: Seal) -> Result<bool> {
        Ok(a == b)
    }

    fn compare(_: &Self, _: &Self, _: &Resolver, _: Seal) -> Result<Ordering> {
        Err(Error::unsupported::<Self>(OperationKind::Compare))
    }
}

impl Scalar for Decimal {
    fn primitive(_: Seal) -> Option<Primitive> {
        Some(Primitive::Decimal)
    }

    fn unary(op: UnaryOp, x: &Self, _: &Resolver, _: Seal) -> Result<Self> {
        match op {
            UnaryOp::Plus => Ok(*x),
            UnaryOp::Negate => Ok(-*x),
            UnaryOp::Not | UnaryOp::OnesComplement => Err(Error::unsupported::<Self>(op)),
        }
    }

    fn binary(op: BinaryOp, a: &Self, b: &Self, _: &Resolver, _: Seal) -> Result<Self> {
        let (a, b) = (*a, *b);
        let result = match op {
            BinaryOp::Add | BinaryOp::AddChecked => a.checked_add(b),
            BinaryOp::Subtract | BinaryOp::SubtractChecked => a.checked_sub(b),
            BinaryOp::Multiply | BinaryOp::MultiplyChecked => a.checked_mul(b),
            BinaryOp::Divide | BinaryOp::Modulo if b.is_zero() => {
                return Err(Error::division_by_zero::<Self>(op));
            }
            BinaryOp::Divide => a.checked_div(b),
            BinaryOp::Modulo => a.checked_rem(b),
            BinaryOp::Or | BinaryOp::And | BinaryOp::Xor => {
                return Err(Error::unsupported::<Self>(op));
            }
        };
        result.ok_or_else(|| Error::overflow::<Self>(op))
    }

    fn shift(op: ShiftOp, _: &Self, _: i32, _: &Resolver, _: Seal) -> Result<Self> {
        Err(Error::unsupported::<Self>(op))
    }

    fn equals(a: &Self, b: &Self, _: &Resolver, _: Seal) -> Result<bool> {
        Ok(a == b)
    }

    fn compare(_: &Self, _: &Self, _: &Resolver, _: Seal) -> Result<Ordering> {
        Err(Error::unsupported::<Self>(OperationKind::Compare))
    }
}

// =============================================================================
// Tests
// =============================================================================
