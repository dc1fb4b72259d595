//! Scalar operation resolver and the provider registry
//!
//! The resolver answers "what is `op(a, b)` for this `T`?" for any
//! [`Scalar`]. Built-in primitives are answered by their native
//! implementations without touching the registry. Every other type is looked
//! up in the registry, which is populated either by an explicit
//! [`Resolver::register`] call or, on first use, by auto-discovery of the
//! type's declared [`ProviderTag`](crate::ProviderTag).
//!
//! # Registry invariants
//!
//! - A type's slot is written at most once; the first writer wins
//! - Auto-discovery runs at most once per type and never fails: if the slot
//!   was filled by an explicit registration in the meantime, discovery is a
//!   no-op
//! - Population of one type's slot never blocks resolution of another type
//!
//! # Example
//!
//! ```rust
//! use genops_core::Resolver;
//!
//! let resolver = Resolver::new();
//! assert_eq!(resolver.add(&40u8, &2u8).unwrap(), 42);
//! assert!(resolver.less_than(&-1i32, &1i32).unwrap());
//! assert!(resolver.add_checked(&i8::MAX, &1i8).is_err());
//! ```

use crate::error::{Error, Result};
use crate::numeric::{Primitive, Scalar, Seal};
use crate::ops::{BinaryOp, OperationKind, RelationalOp, ShiftOp, UnaryOp};
use crate::provider::OperationProvider;
use dashmap::DashMap;
use lazy_static::lazy_static;
use std::any::{type_name, Any, TypeId};
use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, Once, OnceLock};
use tracing::{debug, warn};

type ErasedProvider = Box<dyn Any + Send + Sync>;

/// Registry entry for one type
struct Slot {
    discovery: Once,
    provider: OnceLock<ErasedProvider>,
}

impl Slot {
    fn new() -> Self {
        Self {
            discovery: Once::new(),
            provider: OnceLock::new(),
        }
    }

    fn get<T: Scalar>(&self) -> Option<Arc<dyn OperationProvider<T>>> {
        self.provider
            .get()
            .and_then(|erased| erased.downcast_ref::<Arc<dyn OperationProvider<T>>>())
            .cloned()
    }
}

lazy_static! {
    static ref GLOBAL_RESOLVER: Arc<Resolver> = Arc::new(Resolver::new());
}

/// Resolves and invokes operations for any [`Scalar`] type
pub struct Resolver {
    slots: DashMap<TypeId, Arc<Slot>>,
}

impl Resolver {
    /// Create a resolver with an empty, caller-owned registry
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// The process-wide resolver
    pub fn global() -> Arc<Resolver> {
        Arc::clone(&GLOBAL_RESOLVER)
    }

    fn slot<T: Scalar>(&self) -> Arc<Slot> {
        let key = TypeId::of::<T>();
        if let Some(slot) = self.slots.get(&key).map(|entry| Arc::clone(entry.value())) {
            return slot;
        }
        Arc::clone(
            self.slots
                .entry(key)
                .or_insert_with(|| Arc::new(Slot::new()))
                .value(),
        )
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Bind `provider` to `T` for the lifetime of this resolver
    ///
    /// Fails with [`Error::DuplicateRegistration`] if `T` already has a
    /// provider, whether it came from discovery or an earlier registration.
    pub fn register<T, P>(&self, provider: P) -> Result<()>
    where
        T: Scalar,
        P: OperationProvider<T> + 'static,
    {
        self.register_shared::<T>(Arc::new(provider))
    }

    /// Like [`register`](Self::register) for an already shared provider
    pub fn register_shared<T: Scalar>(&self, provider: Arc<dyn OperationProvider<T>>) -> Result<()> {
        if Primitive::of::<T>().is_some() {
            warn!(
                type_name = type_name::<T>(),
                "provider registered for a built-in primitive; the native implementation always takes precedence"
            );
        }

        let slot = self.slot::<T>();
        slot.provider
            .set(Box::new(provider))
            .map_err(|_| Error::duplicate::<T>())?;

        debug!(type_name = type_name::<T>(), "registered operation provider");
        Ok(())
    }

    /// The provider bound to `T`, running auto-discovery on first use
    ///
    /// Returns `None` while `T` is unresolved. Built-in primitives are never
    /// looked up here; their operations do not go through providers.
    pub fn provider<T: Scalar>(&self) -> Option<Arc<dyn OperationProvider<T>>> {
        let slot = self.slot::<T>();
        if let Some(provider) = slot.get::<T>() {
            return Some(provider);
        }
        slot.discovery.call_once(|| discover::<T>(&slot));
        slot.get::<T>()
    }

    /// Whether operations on `T` can reach an implementation
    pub fn is_resolved<T: Scalar>(&self) -> bool {
        Primitive::of::<T>().is_some() || self.provider::<T>().is_some()
    }

    /// Resolve `T` once for repeated application of `operation`
    ///
    /// Fails up front with [`Error::UnsupportedOperation`] when `T` has
    /// neither a fast path nor a provider.
    pub fn bind<T: Scalar>(&self, operation: impl Into<OperationKind>) -> Result<Bound<'_, T>> {
        if Primitive::of::<T>().is_some() {
            return Ok(Bound {
                resolver: self,
                provider: None,
            });
        }
        match self.provider::<T>() {
            Some(provider) => Ok(Bound {
                resolver: self,
                provider: Some(provider),
            }),
            None => Err(Error::unsupported::<T>(operation)),
        }
    }

    // =========================================================================
    // Kind-dispatched operations
    // =========================================================================

    pub fn unary<T: Scalar>(&self, op: UnaryOp, x: &T) -> Result<T> {
        T::unary(op, x, self, Seal)
    }

    pub fn binary<T: Scalar>(&self, op: BinaryOp, a: &T, b: &T) -> Result<T> {
        T::binary(op, a, b, self, Seal)
    }

    pub fn shift<T: Scalar>(&self, op: ShiftOp, x: &T, count: i32) -> Result<T> {
        T::shift(op, x, count, self, Seal)
    }

    /// Ordering predicate computed from the sign of [`compare`](Self::compare)
    pub fn relational<T: Scalar>(&self, op: RelationalOp, a: &T, b: &T) -> Result<bool> {
        Ok(op.holds(T::compare(a, b, self, Seal)?))
    }

    // =========================================================================
    // Named operations
    // =========================================================================

    pub fn plus<T: Scalar>(&self, x: &T) -> Result<T> {
        self.unary(UnaryOp::Plus, x)
    }

    pub fn negate<T: Scalar>(&self, x: &T) -> Result<T> {
        self.unary(UnaryOp::Negate, x)
    }

    pub fn not<T: Scalar>(&self, x: &T) -> Result<T> {
        self.unary(UnaryOp::Not, x)
    }

    pub fn ones_complement<T: Scalar>(&self, x: &T) -> Result<T> {
        self.unary(UnaryOp::OnesComplement, x)
    }

    pub fn add<T: Scalar>(&self, a: &T, b: &T) -> Result<T> {
        self.binary(BinaryOp::Add, a, b)
    }

    pub fn add_checked<T: Scalar>(&self, a: &T, b: &T) -> Result<T> {
        self.binary(BinaryOp::AddChecked, a, b)
    }

    pub fn subtract<T: Scalar>(&self, a: &T, b: &T) -> Result<T> {
        self.binary(BinaryOp::Subtract, a, b)
    }

    pub fn subtract_checked<T: Scalar>(&self, a: &T, b: &T) -> Result<T> {
        self.binary(BinaryOp::SubtractChecked, a, b)
    }

    pub fn multiply<T: Scalar>(&self, a: &T, b: &T) -> Result<T> {
        self.binary(BinaryOp::Multiply, a, b)
    }

    pub fn multiply_checked<T: Scalar>(&self, a: &T, b: &T) -> Result<T> {
        self.binary(BinaryOp::MultiplyChecked, a, b)
    }

    pub fn divide<T: Scalar>(&self, a: &T, b: &T) -> Result<T> {
        self.binary(BinaryOp::Divide, a, b)
    }

    pub fn modulo<T: Scalar>(&self, a: &T, b: &T) -> Result<T> {
        self.binary(BinaryOp::Modulo, a, b)
    }

    pub fn or<T: Scalar>(&self, a: &T, b: &T) -> Result<T> {
        self.binary(BinaryOp::Or, a, b)
    }

    pub fn and<T: Scalar>(&self, a: &T, b: &T) -> Result<T> {
        self.binary(BinaryOp::And, a, b)
    }

    pub fn xor<T: Scalar>(&self, a: &T, b: &T) -> Result<T> {
        self.binary(BinaryOp::Xor, a, b)
    }

    pub fn shift_left<T: Scalar>(&self, x: &T, count: i32) -> Result<T> {
        self.shift(ShiftOp::Left, x, count)
    }

    pub fn shift_right<T: Scalar>(&self, x: &T, count: i32) -> Result<T> {
        self.shift(ShiftOp::Right, x, count)
    }

    pub fn equals<T: Scalar>(&self, a: &T, b: &T) -> Result<bool> {
        T::equals(a, b, self, Seal)
    }

    pub fn compare<T: Scalar>(&self, a: &T, b: &T) -> Result<Ordering> {
        T::compare(a, b, self, Seal)
    }

    pub fn less_than<T: Scalar>(&self, a: &T, b: &T) -> Result<bool> {
        self.relational(RelationalOp::LessThan, a, b)
    }

    pub fn less_than_or_equals<T: Scalar>(&self, a: &T, b: &T) -> Result<bool> {
        self.relational(RelationalOp::LessThanOrEquals, a, b)
    }

    pub fn greater_than<T: Scalar>(&self, a: &T, b: &T) -> Result<bool> {
        self.relational(RelationalOp::GreaterThan, a, b)
    }

    pub fn greater_than_or_equals<T: Scalar>(&self, a: &T, b: &T) -> Result<bool> {
        self.relational(RelationalOp::GreaterThanOrEquals, a, b)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("slots", &self.slots.len())
            .finish()
    }
}

/// Auto-discovery: read the declarative tag and populate the slot
fn discover<T: Scalar>(slot: &Slot) {
    match T::PROVIDER_TAGS {
        [] => {}
        [tag] => {
            let provider = tag.construct();
            if slot.provider.set(Box::new(provider)).is_ok() {
                debug!(
                    type_name = type_name::<T>(),
                    provider = tag.provider_name(),
                    "discovered operation provider"
                );
            }
        }
        tags => {
            warn!(
                type_name = type_name::<T>(),
                tags = tags.len(),
                "ambiguous provider tags; leaving type unresolved"
            );
        }
    }
}

/// A type resolved once, ready for repeated operations
///
/// Built-in primitives carry no provider and run natively; other types carry
/// the provider found at bind time.
pub struct Bound<'r, T: Scalar> {
    resolver: &'r Resolver,
    provider: Option<Arc<dyn OperationProvider<T>>>,
}

impl<T: Scalar> Bound<'_, T> {
    #[inline]
    pub fn unary(&self, op: UnaryOp, x: &T) -> Result<T> {
        match &self.provider {
            Some(provider) => provider.unary(op, x),
            None => T::unary(op, x, self.resolver, Seal),
        }
    }

    #[inline]
    pub fn binary(&self, op: BinaryOp, a: &T, b: &T) -> Result<T> {
        match &self.provider {
            Some(provider) => provider.binary(op, a, b),
            None => T::binary(op, a, b, self.resolver, Seal),
        }
    }

    #[inline]
    pub fn shift(&self, op: ShiftOp, x: &T, count: i32) -> Result<T> {
        match &self.provider {
            Some(provider) => provider.shift(op, x, count),
            None => T::shift(op, x, count, self.resolver, Seal),
        }
    }

    #[inline]
    pub fn equals(&self, a: &T, b: &T) -> Result<bool> {
        match &self.provider {
            Some(provider) => provider.equals(a, b),
            None => T::equals(a, b, self.resolver, Seal),
        }
    }

    #[inline]
    pub fn compare(&self, a: &T, b: &T) -> Result<Ordering> {
        match &self.provider {
            Some(provider) => provider.compare(a, b),
            None => T::compare(a, b, self.resolver, Seal),
        }
    }
}
