//! Generic arithmetic, bitwise and comparison operations over any value type
//!
//! This crate lets one generic algorithm body operate on a type parameter
//! `T` resolved at the call site, for both a closed set of built-in
//! primitives and an open set of caller-defined types.
//!
//! # Architecture Overview
//!
//! The library is organized into two layers:
//!
//! 1. **Scalar resolution** - [`Resolver`] computes one operation on one or
//!    two values. Primitives take a native fast path chosen at compile time;
//!    other types go through an [`OperationProvider`] found in the resolver's
//!    registry, either registered explicitly or discovered from the type's
//!    [`ProviderTag`].
//! 2. **Vector engines** - a chain of [`VectorEngine`]s applies one operation
//!    across whole sequences. [`SpecializedEngine`]s try their [`Kernels`]
//!    first and forward the rest; the chain always ends in the
//!    [`EmulatedEngine`], which loops over the resolver.
//!
//! # Example
//!
//! ```rust
//! use genops_core::{EngineBuilder, Resolver, VectorOps};
//!
//! let resolver = Resolver::new();
//! assert_eq!(resolver.add(&2u8, &3u8).unwrap(), 5);
//! assert!(resolver.add_checked(&i8::MAX, &1).is_err());
//! assert!(resolver.less_than(&-1i64, &0).unwrap());
//!
//! let engine = EngineBuilder::new().emulated().build();
//! let mut dst = [0.0f64; 3];
//! engine
//!     .multiply_scalar(&[1.0, 2.0, 3.0], &0.5, &mut dst)
//!     .unwrap();
//! assert_eq!(dst, [0.5, 1.0, 1.5]);
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod iteration;
pub mod numeric;
pub mod ops;
pub mod provider;
pub mod resolver;

// Re-export core types
pub use error::{Error, Result};

pub use numeric::{Primitive, Scalar};
pub use ops::{BinaryOp, OperationKind, RelationalOp, ShiftOp, UnaryOp};
pub use provider::{OperationProvider, ProviderTag};
pub use resolver::{Bound, Resolver};

pub use iteration::{ExecutionStrategy, Iteration, SequentialLoop, Task};
#[cfg(feature = "parallel")]
pub use iteration::ParallelLoop;

pub use engine::{
    BulkCall, EmulatedEngine, ErasedCall, Kernels, Lanes, Operands, ShiftOperands,
    SpecializedEngine, VectorEngine, VectorOps,
};

pub use builder::{BuilderState, EngineBuilder, Layered, NeedsTerminal};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        declare_provider, EngineBuilder, Error, OperationProvider, Resolver, Result, Scalar,
        VectorEngine, VectorOps,
    };
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
