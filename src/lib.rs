//! # genops
//!
//! Generic arithmetic, bitwise and comparison operations for any value type,
//! one value at a time or across whole sequences.
//!
//! This crate re-exports the workspace:
//!
//! - [`genops_core`]: the scalar [`Resolver`], its provider registry and the
//!   vector engine chain
//! - [`genops_kernels`]: portable and AVX2 kernel sets plus
//!   [`best_available_engine`]
//!
//! # Example
//!
//! ```rust
//! use genops::prelude::*;
//!
//! let engine = genops::best_available_engine();
//! let mut dst = [0u16; 3];
//! engine.add_scalar(&[1, 2, u16::MAX], &1, &mut dst).unwrap();
//! assert_eq!(dst, [2, 3, 0]);
//!
//! let mut flags = [false; 3];
//! engine.scalar_less_than(&2u16, &dst, &mut flags).unwrap();
//! assert_eq!(flags, [false, true, false]);
//! ```

pub use genops_core::*;

pub use genops_kernels::{
    best_available_engine, best_engine_name, portable_engine, Avx2Kernels, PortableKernels,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use genops_core::prelude::*;
    pub use genops_kernels::best_available_engine;
}
