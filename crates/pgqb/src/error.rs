//! Error types for pgqb

use crate::qb::State;
use thiserror::Error;

/// Result type alias for pgqb operations
pub type QbResult<T> = Result<T, QbError>;

/// Faults raised while composing expressions or assembling a statement.
///
/// Every fault is raised synchronously at the call that broke a contract.
/// Nothing is ever partially rendered into the output text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QbError {
    /// An operator received an operand outside its accepted type set
    #[error("unsupported operand type(s) for {operator}: '{left}' and '{right}'")]
    OperandType {
        operator: String,
        left: String,
        right: String,
    },

    /// A unary operator received an operand outside its accepted type set
    #[error("bad operand type for unary {operator}: '{operand}'")]
    UnaryOperandType { operator: String, operand: String },

    /// A value failed a column's declared constraint
    #[error("Constraint violation on '{column}': {message}")]
    Constraint { column: String, message: String },

    /// A builder method was called from a state with no path to its clause kind
    #[error("Impossible action: {from} -> {to}")]
    IllegalTransition { from: State, to: State },

    /// An enumerated or structural argument is outside its allowed set
    #[error("Invalid value: {0}")]
    Value(String),

    /// A structured literal could not be encoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QbError {
    /// Create an operand-type fault for a binary operator
    pub fn operand_type(
        operator: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self::OperandType {
            operator: operator.into(),
            left: left.into(),
            right: right.into(),
        }
    }

    /// Create an operand-type fault for a unary operator
    pub fn unary_operand_type(operator: impl Into<String>, operand: impl Into<String>) -> Self {
        Self::UnaryOperandType {
            operator: operator.into(),
            operand: operand.into(),
        }
    }

    /// Create a constraint-violation fault for a specific column
    pub fn constraint(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Constraint {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a value fault
    pub fn value(message: impl Into<String>) -> Self {
        Self::Value(message.into())
    }

    /// Check if this is an operand-type fault (binary or unary)
    pub fn is_operand_type(&self) -> bool {
        matches!(self, Self::OperandType { .. } | Self::UnaryOperandType { .. })
    }

    /// Check if this is a constraint-violation fault
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Constraint { .. })
    }

    /// Check if this is an illegal-transition fault
    pub fn is_illegal_transition(&self) -> bool {
        matches!(self, Self::IllegalTransition { .. })
    }

    /// Check if this is a value fault
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl From<serde_json::Error> for QbError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
