//! Shared utilities for integration tests

use genops_core::{EmulatedEngine, Resolver, VectorEngine};
use std::sync::Arc;

/// Generate sequence lengths that test edge cases for lane-wise kernels
pub fn edge_case_lengths() -> Vec<usize> {
    vec![
        0,   // Empty
        1,   // Single element
        3,   // Below f64 lane width
        4,   // AVX2 f64 width
        5,   // AVX2 f64 width + 1
        7,   // AVX2 f32 width - 1
        8,   // AVX2 f32 width
        9,   // AVX2 f32 width + 1
        17,  // Power of 2 + 1
        31,  // Prime
        64,  // Cache line
        127, // Mersenne prime
    ]
}

/// Special floating-point values for edge case testing
pub fn special_values() -> Vec<f64> {
    vec![
        0.0,
        -0.0,
        1.0,
        -1.0,
        f64::MIN,
        f64::MAX,
        f64::MIN_POSITIVE,
        f64::EPSILON,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NAN,
        std::f64::consts::PI,
        1e308, // Near overflow
    ]
}

/// Emulated terminal over a private resolver
pub fn reference_engine() -> Arc<dyn VectorEngine> {
    Arc::new(EmulatedEngine::sequential(Arc::new(Resolver::new())))
}

/// Assert two float sequences are bit-identical
pub fn assert_same_bits(actual: &[f64], expected: &[f64], context: &str) {
    assert_eq!(actual.len(), expected.len(), "length mismatch for {context}");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(
            a.to_bits(),
            e.to_bits(),
            "{context}: index {i} differs, got {a}, expected {e}"
        );
    }
}
