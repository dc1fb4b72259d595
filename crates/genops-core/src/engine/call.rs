//! Bulk call descriptions
//!
//! A [`BulkCall`] is one element-wise operation over borrowed sequences: the
//! operation, its operands and the destination. Engines receive calls wrapped
//! in [`Lanes`], which records whether the element type is one of the
//! vectorizable primitives.

use crate::error::{Error, Result};
use crate::iteration::Iteration;
use crate::numeric::Scalar;
use crate::ops::{BinaryOp, OperationKind, RelationalOp, ShiftOp, UnaryOp};
use crate::resolver::Resolver;
use std::cmp::Ordering;

/// Operand shapes of a two-operand bulk call
#[derive(Debug)]
pub enum Operands<'a, T> {
    /// `lhs op rhs[i]`
    ScalarVector(&'a T, &'a [T]),
    /// `lhs[i] op rhs`
    VectorScalar(&'a [T], &'a T),
    /// `lhs[i] op rhs[i]`
    VectorVector(&'a [T], &'a [T]),
}

impl<T> Clone for Operands<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Operands<'_, T> {}

impl<'a, T> Operands<'a, T> {
    /// Operands for element `i`
    #[inline]
    pub fn at(&self, i: usize) -> (&'a T, &'a T) {
        match *self {
            Self::ScalarVector(lhs, rhs) => (lhs, &rhs[i]),
            Self::VectorScalar(lhs, rhs) => (&lhs[i], rhs),
            Self::VectorVector(lhs, rhs) => (&lhs[i], &rhs[i]),
        }
    }

    fn check(&self, expected: usize) -> Result<()> {
        let (lhs, rhs) = match *self {
            Self::ScalarVector(_, rhs) => (None, Some(rhs.len())),
            Self::VectorScalar(lhs, _) => (Some(lhs.len()), None),
            Self::VectorVector(lhs, rhs) => (Some(lhs.len()), Some(rhs.len())),
        };
        check_len(expected, lhs, "lhs")?;
        check_len(expected, rhs, "rhs")
    }
}

/// Operand shapes of a shift; counts are always `i32`
#[derive(Debug)]
pub enum ShiftOperands<'a, T> {
    /// `value << counts[i]`
    ScalarVector(&'a T, &'a [i32]),
    /// `values[i] << count`
    VectorScalar(&'a [T], i32),
    /// `values[i] << counts[i]`
    VectorVector(&'a [T], &'a [i32]),
}

impl<T> Clone for ShiftOperands<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ShiftOperands<'_, T> {}

impl<'a, T> ShiftOperands<'a, T> {
    /// Value and count for element `i`
    #[inline]
    pub fn at(&self, i: usize) -> (&'a T, i32) {
        match *self {
            Self::ScalarVector(value, counts) => (value, counts[i]),
            Self::VectorScalar(values, count) => (&values[i], count),
            Self::VectorVector(values, counts) => (&values[i], counts[i]),
        }
    }

    fn check(&self, expected: usize) -> Result<()> {
        let (values, counts) = match *self {
            Self::ScalarVector(_, counts) => (None, Some(counts.len())),
            Self::VectorScalar(values, _) => (Some(values.len()), None),
            Self::VectorVector(values, counts) => (Some(values.len()), Some(counts.len())),
        };
        check_len(expected, values, "input")?;
        check_len(expected, counts, "counts")
    }
}

fn check_len(expected: usize, actual: Option<usize>, operand: &'static str) -> Result<()> {
    match actual {
        Some(actual) if actual != expected => Err(Error::length_mismatch(expected, actual, operand)),
        _ => Ok(()),
    }
}

/// One element-wise operation with its operands and destination
#[derive(Debug)]
pub enum BulkCall<'a, T> {
    Unary {
        op: UnaryOp,
        input: &'a [T],
        dst: &'a mut [T],
    },
    Binary {
        op: BinaryOp,
        operands: Operands<'a, T>,
        dst: &'a mut [T],
    },
    Shift {
        op: ShiftOp,
        operands: ShiftOperands<'a, T>,
        dst: &'a mut [T],
    },
    Equals {
        operands: Operands<'a, T>,
        dst: &'a mut [bool],
    },
    Compare {
        operands: Operands<'a, T>,
        dst: &'a mut [Ordering],
    },
    Relational {
        op: RelationalOp,
        operands: Operands<'a, T>,
        dst: &'a mut [bool],
    },
}

impl<T> BulkCall<'_, T> {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Unary { op, .. } => (*op).into(),
            Self::Binary { op, .. } => (*op).into(),
            Self::Shift { op, .. } => (*op).into(),
            Self::Equals { .. } => OperationKind::Equals,
            Self::Compare { .. } => OperationKind::Compare,
            Self::Relational { op, .. } => (*op).into(),
        }
    }

    /// Number of elements the call writes
    pub fn len(&self) -> usize {
        match self {
            Self::Unary { dst, .. } | Self::Binary { dst, .. } | Self::Shift { dst, .. } => {
                dst.len()
            }
            Self::Equals { dst, .. } | Self::Relational { dst, .. } => dst.len(),
            Self::Compare { dst, .. } => dst.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every vector-shaped operand must match the destination length
    pub fn validate(&self) -> Result<()> {
        let expected = self.len();
        match self {
            Self::Unary { input, .. } => check_len(expected, Some(input.len()), "input"),
            Self::Shift { operands, .. } => operands.check(expected),
            Self::Binary { operands, .. }
            | Self::Equals { operands, .. }
            | Self::Compare { operands, .. }
            | Self::Relational { operands, .. } => operands.check(expected),
        }
    }
}

/// A bulk call over a type the engines cannot name
///
/// Only the emulated engine runs these; every other engine forwards them.
pub trait ErasedCall {
    fn type_name(&self) -> &'static str;

    fn kind(&self) -> OperationKind;

    fn len(&self) -> usize;

    /// See [`BulkCall::validate`]
    fn validate(&self) -> Result<()>;

    /// Run the call element by element through the resolver
    fn emulate(&mut self, resolver: &Resolver, iteration: &dyn Iteration) -> Result<()>;
}

pub(crate) struct Erased<'a, T: Scalar> {
    call: BulkCall<'a, T>,
}

impl<'a, T: Scalar> Erased<'a, T> {
    pub(crate) fn new(call: BulkCall<'a, T>) -> Self {
        Self { call }
    }
}

impl<T: Scalar> ErasedCall for Erased<'_, T> {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn kind(&self) -> OperationKind {
        self.call.kind()
    }

    fn len(&self) -> usize {
        self.call.len()
    }

    fn validate(&self) -> Result<()> {
        self.call.validate()
    }

    fn emulate(&mut self, resolver: &Resolver, iteration: &dyn Iteration) -> Result<()> {
        super::emulated::run(&mut self.call, resolver, iteration)
    }
}

/// A bulk call after type identification
pub enum Lanes<'a> {
    U8(BulkCall<'a, u8>),
    I8(BulkCall<'a, i8>),
    U16(BulkCall<'a, u16>),
    I16(BulkCall<'a, i16>),
    U32(BulkCall<'a, u32>),
    I32(BulkCall<'a, i32>),
    U64(BulkCall<'a, u64>),
    I64(BulkCall<'a, i64>),
    F32(BulkCall<'a, f32>),
    F64(BulkCall<'a, f64>),
    /// Any non-vectorizable type, including `bool` and `Decimal`
    Other(&'a mut dyn ErasedCall),
}

macro_rules! for_each_lane {
    ($lanes:expr, $call:pat => $body:expr, $erased:pat => $other:expr) => {
        match $lanes {
            Lanes::U8($call) => $body,
            Lanes::I8($call) => $body,
            Lanes::U16($call) => $body,
            Lanes::I16($call) => $body,
            Lanes::U32($call) => $body,
            Lanes::I32($call) => $body,
            Lanes::U64($call) => $body,
            Lanes::I64($call) => $body,
            Lanes::F32($call) => $body,
            Lanes::F64($call) => $body,
            Lanes::Other($erased) => $other,
        }
    };
}

pub(crate) use for_each_lane;

impl Lanes<'_> {
    pub fn kind(&self) -> OperationKind {
        for_each_lane!(self, call => call.kind(), erased => erased.kind())
    }

    pub fn len(&self) -> usize {
        for_each_lane!(self, call => call.len(), erased => erased.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length check of the carried call; engines run it before touching
    /// any operand
    pub fn validate(&self) -> Result<()> {
        for_each_lane!(self, call => call.validate(), erased => erased.validate())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::U8(_) => "u8",
            Self::I8(_) => "i8",
            Self::U16(_) => "u16",
            Self::I16(_) => "i16",
            Self::U32(_) => "u32",
            Self::I32(_) => "i32",
            Self::U64(_) => "u64",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Other(erased) => erased.type_name(),
        }
    }
}

impl std::fmt::Debug for Lanes<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lanes")
            .field("type", &self.type_name())
            .field("kind", &self.kind())
            .field("len", &self.len())
            .finish()
    }
}
