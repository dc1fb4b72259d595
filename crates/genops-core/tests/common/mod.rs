//! Shared utilities for integration tests

#![allow(dead_code)]

use genops_core::{declare_provider, OperationProvider, Result, Scalar};
use std::cmp::Ordering;

/// Money in minor units, ordered and summable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cents(pub i64);

#[derive(Default)]
pub struct CentsOps;

impl OperationProvider<Cents> for CentsOps {
    fn add(&self, a: &Cents, b: &Cents) -> Result<Cents> {
        Ok(Cents(a.0 + b.0))
    }

    fn subtract(&self, a: &Cents, b: &Cents) -> Result<Cents> {
        Ok(Cents(a.0 - b.0))
    }

    fn equals(&self, a: &Cents, b: &Cents) -> Result<bool> {
        Ok(a == b)
    }

    fn compare(&self, a: &Cents, b: &Cents) -> Result<Ordering> {
        Ok(a.0.cmp(&b.0))
    }
}

declare_provider!(Cents => CentsOps);

/// A value with no tag; usable only after explicit registration
#[derive(Debug, Clone, PartialEq)]
pub struct Label(pub String);

impl Scalar for Label {}

/// Provider that stamps every result with its identity
pub struct Stamped(pub u32);

impl OperationProvider<Label> for Stamped {
    fn add(&self, a: &Label, b: &Label) -> Result<Label> {
        Ok(Label(format!("{}{}#{}", a.0, b.0, self.0)))
    }
}

/// Initialize tracing output for a test run, once
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
