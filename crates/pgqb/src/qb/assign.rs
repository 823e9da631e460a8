use crate::expr::Term;
use crate::quote::quote_identifier;
use std::fmt;

/// One `"column" = <value>` pair of an UPDATE statement.
///
/// Built by [`crate::Operand::set`], which runs the column's constraint check.
#[derive(Debug, Clone)]
pub struct Assignment {
    column: String,
    value: Term,
}

impl Assignment {
    pub(crate) fn new(column: String, value: Term) -> Self {
        Self { column, value }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// `SET` targets are never table-qualified.
    pub fn to_sql(&self) -> String {
        format!("{} = {}", quote_identifier(&self.column), self.value.to_sql())
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
