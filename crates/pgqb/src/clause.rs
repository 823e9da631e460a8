//! Boolean predicate combinator for WHERE and HAVING.
//!
//! Combinations nest left-to-right exactly as called. `OR` always renders
//! inside its own parentheses and `AND` never does, so
//! `a.or(b).and(c).or(true)` renders `((a OR b) AND c OR true)`.

use crate::error::{QbError, QbResult};
use crate::expr::{Operand, Term};
use crate::types::TypeCategory;
use std::fmt;

/// A boolean-valued expression.
#[derive(Debug, Clone)]
pub struct Clause {
    operand: Operand,
}

impl Clause {
    /// Wrap a boolean (or untyped) operand.
    pub fn new(operand: Operand) -> QbResult<Self> {
        match operand.column_type().category() {
            TypeCategory::Boolean | TypeCategory::Any => Ok(Self {
                operand: operand.without_alias(),
            }),
            _ => Err(QbError::operand_type(
                "clause",
                operand.column_type().sql_name(),
                "boolean",
            )),
        }
    }

    /// Raw SQL predicate.
    ///
    /// # Safety
    /// The text is emitted verbatim. Be careful with SQL injection.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            operand: Operand::raw(sql),
        }
    }

    /// `self AND other`
    pub fn and(&self, other: impl Into<Clause>) -> Clause {
        self.combine("AND", other.into())
    }

    /// `(self OR other)`
    pub fn or(&self, other: impl Into<Clause>) -> Clause {
        self.combine("OR", other.into())
    }

    /// `NOT (self)`
    pub fn not(&self) -> Clause {
        Clause {
            operand: self.operand.negate(),
        }
    }

    fn combine(&self, operator: &'static str, other: Clause) -> Clause {
        Clause {
            operand: self
                .operand
                .logical(operator, Term::Operand(other.operand)),
        }
    }

    pub fn to_sql(&self) -> String {
        self.operand.to_sql()
    }

    pub fn into_operand(self) -> Operand {
        self.operand
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }
}

impl From<bool> for Clause {
    fn from(value: bool) -> Self {
        let token = if value { "true" } else { "false" };
        Clause {
            operand: Operand::raw(token),
        }
    }
}

impl TryFrom<Operand> for Clause {
    type Error = QbError;

    fn try_from(operand: Operand) -> QbResult<Self> {
        Clause::new(operand)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
