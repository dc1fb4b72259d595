//! Operation kinds
//!
//! [`OperationKind`] is the closed set of operations the resolver and the
//! vector engines know about. The shape-specific enums ([`UnaryOp`],
//! [`BinaryOp`], [`ShiftOp`], [`RelationalOp`]) are what dispatch actually
//! matches on; each one converts into an `OperationKind` for error reporting.

use std::cmp::Ordering;
use std::fmt;

/// Every operation known to the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    // Unary
    Plus,
    Negate,
    Not,
    OnesComplement,

    // Binary arithmetic
    Add,
    AddChecked,
    Subtract,
    SubtractChecked,
    Multiply,
    MultiplyChecked,
    Divide,
    Modulo,

    // Bitwise
    Or,
    And,
    Xor,
    ShiftLeft,
    ShiftRight,

    // Relational
    Equals,
    Compare,

    // Derived from `Compare`, never implemented directly
    LessThan,
    LessThanOrEquals,
    GreaterThan,
    GreaterThanOrEquals,
}

impl OperationKind {
    /// All operation kinds, implemented ones first
    pub const ALL: [OperationKind; 23] = [
        Self::Plus,
        Self::Negate,
        Self::Not,
        Self::OnesComplement,
        Self::Add,
        Self::AddChecked,
        Self::Subtract,
        Self::SubtractChecked,
        Self::Multiply,
        Self::MultiplyChecked,
        Self::Divide,
        Self::Modulo,
        Self::Or,
        Self::And,
        Self::Xor,
        Self::ShiftLeft,
        Self::ShiftRight,
        Self::Equals,
        Self::Compare,
        Self::LessThan,
        Self::LessThanOrEquals,
        Self::GreaterThan,
        Self::GreaterThanOrEquals,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Plus => "plus",
            Self::Negate => "negate",
            Self::Not => "not",
            Self::OnesComplement => "ones_complement",
            Self::Add => "add",
            Self::AddChecked => "add_checked",
            Self::Subtract => "subtract",
            Self::SubtractChecked => "subtract_checked",
            Self::Multiply => "multiply",
            Self::MultiplyChecked => "multiply_checked",
            Self::Divide => "divide",
            Self::Modulo => "modulo",
            Self::Or => "or",
            Self::And => "and",
            Self::Xor => "xor",
            Self::ShiftLeft => "shift_left",
            Self::ShiftRight => "shift_right",
            Self::Equals => "equals",
            Self::Compare => "compare",
            Self::LessThan => "less_than",
            Self::LessThanOrEquals => "less_than_or_equals",
            Self::GreaterThan => "greater_than",
            Self::GreaterThanOrEquals => "greater_than_or_equals",
        }
    }

    /// Whether this kind is computed from `Compare` rather than implemented
    pub fn is_derived(&self) -> bool {
        matches!(
            self,
            Self::LessThan | Self::LessThanOrEquals | Self::GreaterThan | Self::GreaterThanOrEquals
        )
    }

    /// Whether this kind reports overflow instead of wrapping
    pub fn is_checked(&self) -> bool {
        matches!(
            self,
            Self::AddChecked | Self::SubtractChecked | Self::MultiplyChecked
        )
    }

    /// The wrapping counterpart of a checked kind (identity for the rest)
    pub fn unchecked(&self) -> Self {
        match self {
            Self::AddChecked => Self::Add,
            Self::SubtractChecked => Self::Subtract,
            Self::MultiplyChecked => Self::Multiply,
            other => *other,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Single-operand operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Negate,
    /// Logical not
    Not,
    /// Bitwise complement
    OnesComplement,
}

/// Two-operand operations producing a value of the operand type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    AddChecked,
    Subtract,
    SubtractChecked,
    Multiply,
    MultiplyChecked,
    Divide,
    Modulo,
    Or,
    And,
    Xor,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 11] = [
        Self::Add,
        Self::AddChecked,
        Self::Subtract,
        Self::SubtractChecked,
        Self::Multiply,
        Self::MultiplyChecked,
        Self::Divide,
        Self::Modulo,
        Self::Or,
        Self::And,
        Self::Xor,
    ];

    pub fn is_bitwise(&self) -> bool {
        matches!(self, Self::Or | Self::And | Self::Xor)
    }
}

/// Shifts by an integer count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftOp {
    Left,
    Right,
}

/// Orderings derived from the sign of a 3-way compare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationalOp {
    LessThan,
    LessThanOrEquals,
    GreaterThan,
    GreaterThanOrEquals,
}

impl RelationalOp {
    pub const ALL: [RelationalOp; 4] = [
        Self::LessThan,
        Self::LessThanOrEquals,
        Self::GreaterThan,
        Self::GreaterThanOrEquals,
    ];

    /// Evaluate against the result of `Compare`
    #[inline]
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Self::LessThan => ordering.is_lt(),
            Self::LessThanOrEquals => ordering.is_le(),
            Self::GreaterThan => ordering.is_gt(),
            Self::GreaterThanOrEquals => ordering.is_ge(),
        }
    }
}

impl From<UnaryOp> for OperationKind {
    fn from(op: UnaryOp) -> Self {
        match op {
            UnaryOp::Plus => Self::Plus,
            UnaryOp::Negate => Self::Negate,
            UnaryOp::Not => Self::Not,
            UnaryOp::OnesComplement => Self::OnesComplement,
        }
    }
}

impl From<BinaryOp> for OperationKind {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Add => Self::Add,
            BinaryOp::AddChecked => Self::AddChecked,
            BinaryOp::Subtract => Self::Subtract,
            BinaryOp::SubtractChecked => Self::SubtractChecked,
            BinaryOp::Multiply => Self::Multiply,
            BinaryOp::MultiplyChecked => Self::MultiplyChecked,
            BinaryOp::Divide => Self::Divide,
            BinaryOp::Modulo => Self::Modulo,
            BinaryOp::Or => Self::Or,
            BinaryOp::And => Self::And,
            BinaryOp::Xor => Self::Xor,
        }
    }
}

impl From<ShiftOp> for OperationKind {
    fn from(op: ShiftOp) -> Self {
        match op {
            ShiftOp::Left => Self::ShiftLeft,
            ShiftOp::Right => Self::ShiftRight,
        }
    }
}

impl From<RelationalOp> for OperationKind {
    fn from(op: RelationalOp) -> Self {
        match op {
            RelationalOp::LessThan => Self::LessThan,
            RelationalOp::LessThanOrEquals => Self::LessThanOrEquals,
            RelationalOp::GreaterThan => Self::GreaterThan,
            RelationalOp::GreaterThanOrEquals => Self::GreaterThanOrEquals,
        }
    }
}
