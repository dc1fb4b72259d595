//! Error types for generic operations
//!
//! Provides the single error type shared by the resolver and the vector engines.

use crate::ops::OperationKind;
use thiserror::Error;

/// Core error type for scalar and bulk operations
#[derive(Error, Debug)]
pub enum Error {
    /// No provider for the type, the provider declines the operation, or the
    /// fast path deliberately excludes it
    #[error("Unsupported operation: {operation} is not available for {type_name}")]
    UnsupportedOperation {
        operation: OperationKind,
        type_name: &'static str,
    },

    /// Vector-shaped operands and destination disagree on length
    #[error("Length mismatch in {operand}: expected {expected}, got {actual}")]
    LengthMismatch {
        expected: usize,
        actual: usize,
        operand: &'static str,
    },

    /// A provider is already bound to the type
    #[error("Duplicate registration: {type_name} already has an operation provider")]
    DuplicateRegistration { type_name: &'static str },

    /// A checked operation overflowed the type's range
    #[error("Arithmetic overflow: {operation} overflowed {type_name}")]
    ArithmeticOverflow {
        operation: OperationKind,
        type_name: &'static str,
    },

    /// Integer or decimal division with a zero divisor
    #[error("Division by zero: {operation} on {type_name}")]
    DivisionByZero {
        operation: OperationKind,
        type_name: &'static str,
    },

    /// Failure of the iteration capability itself
    #[error("Execution error: {0}")]
    Execution(String),

    /// Provider-specific failure
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn unsupported<T: ?Sized>(operation: impl Into<OperationKind>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn overflow<T: ?Sized>(operation: impl Into<OperationKind>) -> Self {
        Self::ArithmeticOverflow {
            operation: operation.into(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn division_by_zero<T: ?Sized>(operation: impl Into<OperationKind>) -> Self {
        Self::DivisionByZero {
            operation: operation.into(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn duplicate<T: ?Sized>() -> Self {
        Self::DuplicateRegistration {
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn length_mismatch(expected: usize, actual: usize, operand: &'static str) -> Self {
        Self::LengthMismatch {
            expected,
            actual,
            operand,
        }
    }

    /// The operation this error is about, when there is one
    pub fn operation(&self) -> Option<OperationKind> {
        match self {
            Self::UnsupportedOperation { operation, .. }
            | Self::ArithmeticOverflow { operation, .. }
            | Self::DivisionByZero { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}
