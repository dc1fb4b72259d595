//! Operation providers for caller-defined value types
//!
//! A provider implements the operation set for exactly one concrete type.
//! Every method defaults to [`Error::UnsupportedOperation`], so a provider
//! only writes the operations its type actually has; declining one
//! operation leaves the others usable.
//!
//! # Example
//!
//! ```rust
//! use genops_core::{declare_provider, OperationProvider, Resolver, Result};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Meters(f64);
//!
//! #[derive(Default)]
//! struct MetersOps;
//!
//! impl OperationProvider<Meters> for MetersOps {
//!     fn add(&self, a: &Meters, b: &Meters) -> Result<Meters> {
//!         Ok(Meters(a.0 + b.0))
//!     }
//! }
//!
//! declare_provider!(Meters => MetersOps);
//!
//! let resolver = Resolver::new();
//! let total = resolver.add(&Meters(1.5), &Meters(2.0)).unwrap();
//! assert_eq!(total, Meters(3.5));
//! assert!(resolver.shift_left(&Meters(1.0), 2).is_err());
//! ```

use crate::error::{Error, Result};
use crate::ops::{BinaryOp, OperationKind, ShiftOp, UnaryOp};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// The operation set for one concrete type `T`
pub trait OperationProvider<T>: Send + Sync {
    fn plus(&self, _x: &T) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::Plus))
    }

    fn negate(&self, _x: &T) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::Negate))
    }

    /// Logical not
    fn not(&self, _x: &T) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::Not))
    }

    fn ones_complement(&self, _x: &T) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::OnesComplement))
    }

    fn add(&self, _a: &T, _b: &T) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::Add))
    }

    fn add_checked(&self, _a: &T, _b: &T) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::AddChecked))
    }

    fn subtract(&self, _a: &T, _b: &T) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::Subtract))
    }

    fn subtract_checked(&self, _a: &T, _b: &T) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::SubtractChecked))
    }

    fn multiply(&self, _a: &T, _b: &T) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::Multiply))
    }

    fn multiply_checked(&self, _a: &T, _b: &T) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::MultiplyChecked))
    }

    fn divide(&self, _a: &T, _b: &T) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::Divide))
    }

    fn modulo(&self, _a: &T, _b: &T) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::Modulo))
    }

    fn or(&self, _a: &T, _b: &T) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::Or))
    }

    fn and(&self, _a: &T, _b: &T) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::And))
    }

    fn xor(&self, _a: &T, _b: &T) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::Xor))
    }

    fn shift_left(&self, _x: &T, _count: i32) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::ShiftLeft))
    }

    fn shift_right(&self, _x: &T, _count: i32) -> Result<T> {
        Err(Error::unsupported::<T>(OperationKind::ShiftRight))
    }

    fn equals(&self, _a: &T, _b: &T) -> Result<bool> {
        Err(Error::unsupported::<T>(OperationKind::Equals))
    }

    /// 3-way compare; the four ordering predicates are derived from this
    fn compare(&self, _a: &T, _b: &T) -> Result<Ordering> {
        Err(Error::unsupported::<T>(OperationKind::Compare))
    }

    fn unary(&self, op: UnaryOp, x: &T) -> Result<T> {
        match op {
            UnaryOp::Plus => self.plus(x),
            UnaryOp::Negate => self.negate(x),
            UnaryOp::Not => self.not(x),
            UnaryOp::OnesComplement => self.ones_complement(x),
        }
    }

    fn binary(&self, op: BinaryOp, a: &T, b: &T) -> Result<T> {
        match op {
            BinaryOp::Add => self.add(a, b),
            BinaryOp::AddChecked => self.add_checked(a, b),
            BinaryOp::Subtract => self.subtract(a, b),
            BinaryOp::SubtractChecked => self.subtract_checked(a, b),
            BinaryOp::Multiply => self.multiply(a, b),
            BinaryOp::MultiplyChecked => self.multiply_checked(a, b),
            BinaryOp::Divide => self.divide(a, b),
            BinaryOp::Modulo => self.modulo(a, b),
            BinaryOp::Or => self.or(a, b),
            BinaryOp::And => self.and(a, b),
            BinaryOp::Xor => self.xor(a, b),
        }
    }

    fn shift(&self, op: ShiftOp, x: &T, count: i32) -> Result<T> {
        match op {
            ShiftOp::Left => self.shift_left(x, count),
            ShiftOp::Right => self.shift_right(x, count),
        }
    }
}

/// Declarative association between a type and the provider that implements
/// its operations
///
/// The named provider must be constructible without arguments. Tags are
/// attached through [`Scalar::PROVIDER_TAGS`](crate::Scalar::PROVIDER_TAGS),
/// usually via [`declare_provider!`](crate::declare_provider).
pub struct ProviderTag<T: 'static> {
    provider_name: fn() -> &'static str,
    construct: fn() -> Arc<dyn OperationProvider<T>>,
}

impl<T: 'static> ProviderTag<T> {
    /// Tag naming provider type `P`
    pub const fn of<P>() -> Self
    where
        P: OperationProvider<T> + Default + 'static,
    {
        Self {
            provider_name: type_name_of::<P>,
            construct: construct_default::<T, P>,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        (self.provider_name)()
    }

    /// Build a fresh provider instance
    pub fn construct(&self) -> Arc<dyn OperationProvider<T>> {
        (self.construct)()
    }
}

impl<T: 'static> Clone for ProviderTag<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for ProviderTag<T> {}

impl<T: 'static> fmt::Debug for ProviderTag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderTag")
            .field("target", &std::any::type_name::<T>())
            .field("provider", &self.provider_name())
            .finish()
    }
}

fn type_name_of<P>() -> &'static str {
    std::any::type_name::<P>()
}

fn construct_default<T, P>() -> Arc<dyn OperationProvider<T>>
where
    T: 'static,
    P: OperationProvider<T> + Default + 'static,
{
    Arc::new(P::default())
}

/// Implement [`Scalar`](crate::Scalar) for a custom type, tagging it with the
/// provider that auto-discovery should construct on first use
#[macro_export]
macro_rules! declare_provider {
    ($ty:ty => $provider:ty) => {
        impl $crate::Scalar for $ty {
            const PROVIDER_TAGS: &'static [$crate::ProviderTag<Self>] =
                &[$crate::ProviderTag::of::<$provider>()];
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Tally(u32);

    #[derive(Default)]
    struct AddOnly;

    impl OperationProvider<Tally> for AddOnly {
        fn add(&self, a: &Tally, b: &Tally) -> Result<Tally> {
            Ok(Tally(a.0 + b.0))
        }
    }

    #[test]
    fn test_declined_operations_are_unsupported() {
        let ops = AddOnly;
        assert_eq!(ops.add(&Tally(2), &Tally(3)).unwrap(), Tally(5));

        match ops.shift_left(&Tally(1), 3) {
            Err(Error::UnsupportedOperation { operation, .. }) => {
                assert_eq!(operation, OperationKind::ShiftLeft)
            }
            other => panic!("expected unsupported, got {other:?}"),
        }
        assert!(ops.compare(&Tally(1), &Tally(2)).is_err());

        // declining one operation leaves the others usable
        assert_eq!(ops.add(&Tally(1), &Tally(1)).unwrap(), Tally(2));
    }

    #[test]
    fn test_enum_dispatch_routes_by_kind() {
        let ops = AddOnly;
        assert_eq!(
            ops.binary(BinaryOp::Add, &Tally(4), &Tally(4)).unwrap(),
            Tally(8)
        );
        let err = ops.binary(BinaryOp::Xor, &Tally(1), &Tally(1)).unwrap_err();
        assert_eq!(err.operation(), Some(OperationKind::Xor));
        let err = ops.unary(UnaryOp::Negate, &Tally(1)).unwrap_err();
        assert_eq!(err.operation(), Some(OperationKind::Negate));
        let err = ops.shift(ShiftOp::Right, &Tally(1), 1).unwrap_err();
        assert_eq!(err.operation(), Some(OperationKind::ShiftRight));
    }

    #[test]
    fn test_provider_tag_constructs_default() {
        const TAG: ProviderTag<Tally> = ProviderTag::of::<AddOnly>();
        assert!(TAG.provider_name().ends_with("AddOnly"));
        let provider = TAG.construct();
        assert_eq!(provider.add(&Tally(1), &Tally(2)).unwrap(), Tally(3));
        assert!(format!("{TAG:?}").contains("Tally"));
    }
}
