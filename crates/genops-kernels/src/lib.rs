//! Concrete kernel sets for the genops engine chain
//!
//! [`PortableKernels`] works everywhere. [`Avx2Kernels`] is compiled with
//! the `avx2` feature on x86_64 and only used when the CPU reports AVX2.
//!
//! # Example
//!
//! ```rust
//! use genops_core::VectorOps;
//! use genops_kernels::best_available_engine;
//!
//! let engine = best_available_engine();
//! let mut dst = [0i32; 4];
//! engine
//!     .add(&[1, 2, 3, 4], &[10, 20, 30, 40], &mut dst)
//!     .unwrap();
//! assert_eq!(dst, [11, 22, 33, 44]);
//! ```

pub mod avx2;
pub mod portable;

pub use avx2::Avx2Kernels;
pub use portable::PortableKernels;

use genops_core::{EngineBuilder, VectorEngine};
use lazy_static::lazy_static;
use std::sync::Arc;
use tracing::debug;

lazy_static! {
    static ref BEST_ENGINE: Arc<dyn VectorEngine> = build_best_engine();
}

/// Portable kernels over the process-wide emulated engine
pub fn portable_engine() -> Arc<dyn VectorEngine> {
    EngineBuilder::new()
        .emulated()
        .specialize(PortableKernels::new())
        .build()
}

/// Most capable chain for the running CPU, built once per process
///
/// AVX2, then portable, then emulated when AVX2 is available; portable then
/// emulated otherwise.
pub fn best_available_engine() -> Arc<dyn VectorEngine> {
    BEST_ENGINE.clone()
}

/// Get the best available kernel set name
pub fn best_engine_name() -> &'static str {
    if Avx2Kernels::is_available() {
        return "avx2";
    }
    "portable"
}

fn build_best_engine() -> Arc<dyn VectorEngine> {
    let builder = EngineBuilder::new()
        .emulated()
        .specialize(PortableKernels::new());
    let builder = if Avx2Kernels::is_available() {
        builder.specialize(Avx2Kernels::new())
    } else {
        builder
    };
    debug!(kernels = best_engine_name(), "selected best available engine");
    builder.build()
}
