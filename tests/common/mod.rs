//! Shared utilities for facade integration tests

#![allow(dead_code)]

use genops::{BinaryOp, BulkCall, Kernels, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Overrides nothing; every call passes straight through
#[derive(Debug, Default)]
pub struct PassThrough;

impl Kernels for PassThrough {
    fn name(&self) -> &str {
        "pass-through"
    }
}

/// Overrides `Multiply` for `i32` in every shape and counts the calls it
/// handles
#[derive(Debug, Default, Clone)]
pub struct CountingMultiply {
    pub hits: Arc<AtomicUsize>,
}

impl CountingMultiply {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Kernels for CountingMultiply {
    fn name(&self) -> &str {
        "counting-multiply"
    }

    fn try_i32(&self, call: &mut BulkCall<'_, i32>) -> Option<Result<()>> {
        let BulkCall::Binary {
            op: BinaryOp::Multiply,
            operands,
            dst,
        } = call
        else {
            return None;
        };
        self.hits.fetch_add(1, Ordering::SeqCst);
        for (i, out) in dst.iter_mut().enumerate() {
            let (&a, &b) = operands.at(i);
            *out = a.wrapping_mul(b);
        }
        Some(Ok(()))
    }
}

/// Lengths that straddle AVX2 register widths and chunk boundaries
pub fn edge_case_lengths() -> Vec<usize> {
    vec![0, 1, 3, 4, 7, 8, 9, 15, 16, 17, 31, 33, 100]
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
