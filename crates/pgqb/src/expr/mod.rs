//! Expression compiler.
//!
//! [`Operand`] is a node in an expression tree: a column reference, a literal,
//! a binary/unary operation, a function call or a cast. Operands are immutable
//! values; every composing method returns a new operand and leaves the
//! receiver untouched (functions and casts consume the receiver so its alias
//! can move to the wrapper).
//!
//! # Example
//! ```ignore
//! use pgqb::{Operand, SqlType};
//!
//! let age = Operand::typed("age", SqlType::Integer);
//! let expr = age.multiply(2)?.multiply(3)?.divide(2)?;
//! assert_eq!(expr.to_sql(), r#"(("age" * 2) * 3) / 2"#);
//!
//! let name = Operand::typed("name", SqlType::Text).with_alias("n").upper();
//! assert_eq!(name.to_sql(), r#"upper("name") AS "n""#);
//! # Ok::<(), pgqb::QbError>(())
//! ```

mod function;
mod node;

#[cfg(test)]
mod tests;

pub(crate) use node::Term;

use crate::error::{QbError, QbResult};
use crate::qb::{Assignment, Direction, OrderItem};
use crate::quote::quote_literal;
use crate::types::{ColumnType, SqlType, TypeCategory};
use crate::value::Value;
use node::{Grouping, Node, Operation, Unary};
use std::fmt;
use std::sync::Arc;

/// The structural kind of an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Reference,
    Literal,
    Operation,
    FunctionCall,
    Raw,
}

/// Families of binary operators, each with its own accepted operand set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperatorClass {
    /// `+` and `-`
    Additive,
    /// `*`, `/`, `%`, `^`
    Multiplicative,
    /// `<<`, `>>`
    Shift,
    /// `||`
    Concat,
    /// `LIKE`, `ILIKE`
    Pattern,
    /// `=`, `!=`, `<`, `<=`, `>`, `>=`
    Comparison,
}

/// A node in an expression tree.
#[derive(Clone)]
pub struct Operand {
    name: String,
    column_type: Arc<dyn ColumnType>,
    table: Option<String>,
    schema: Option<String>,
    alias: Option<String>,
    node: Node,
}

impl Operand {
    fn from_node(name: impl Into<String>, column_type: Arc<dyn ColumnType>, node: Node) -> Self {
        Self {
            name: name.into(),
            column_type,
            table: None,
            schema: None,
            alias: None,
            node,
        }
    }

    /// An untyped column reference.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::from_node(name, Arc::new(SqlType::Any), Node::Reference)
    }

    /// A column reference with a declared type.
    pub fn typed(name: impl Into<String>, column_type: impl ColumnType + 'static) -> Self {
        Self::from_node(name, Arc::new(column_type), Node::Reference)
    }

    /// A column reference with a shared type handle.
    pub fn with_type(name: impl Into<String>, column_type: Arc<dyn ColumnType>) -> Self {
        Self::from_node(name, column_type, Node::Reference)
    }

    /// A literal used as an operand (e.g. on the left of an operator).
    pub fn literal(value: impl Into<Value>) -> Self {
        let value = value.into();
        if let Value::Operand(op) = value {
            return op;
        }
        let column_type: Arc<dyn ColumnType> = Arc::new(literal_type(&value));
        let token = quote_literal(&value);
        Self::from_node(token.clone(), column_type, Node::Literal(token))
    }

    /// Raw SQL expression.
    ///
    /// # Safety
    /// The text is emitted verbatim. Be careful with SQL injection.
    pub fn raw(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        Self::from_node(sql.clone(), Arc::new(SqlType::Any), Node::Raw(sql))
    }

    /// Set the display alias; rendering appends `AS "alias"`.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Column name (or the derived name of an operation).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn column_type(&self) -> &dyn ColumnType {
        self.column_type.as_ref()
    }

    pub fn kind(&self) -> OperandKind {
        match &self.node {
            Node::Reference => OperandKind::Reference,
            Node::Literal(_) => OperandKind::Literal,
            Node::Raw(_) => OperandKind::Raw,
            Node::Operation(_) | Node::Unary(_) => OperandKind::Operation,
            Node::Function(_) | Node::Cast(_) => OperandKind::FunctionCall,
        }
    }

    /// Alias if set, otherwise the rendered expression.
    pub fn alias_or_sql(&self) -> String {
        match &self.alias {
            Some(alias) => crate::quote::quote_ident_part(alias),
            None => self.to_sql(),
        }
    }

    /// Render the expression (with its alias, if any).
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    /// Render the expression without its alias.
    pub fn to_sql_unaliased(&self) -> String {
        let mut out = String::new();
        self.write_body(&mut out);
        out
    }

    /// Attach table/schema qualifiers. Only the owning table calls this.
    pub(crate) fn bind(&mut self, table: Option<&str>, schema: Option<&str>) {
        self.table = table.map(str::to_string);
        self.schema = schema.map(str::to_string);
    }

    pub(crate) fn without_alias(mut self) -> Self {
        self.alias = None;
        self
    }

    pub(crate) fn category(&self) -> TypeCategory {
        self.column_type.category()
    }

    /// The inner operand of a unary minus, used for `ORDER BY ... DESC`.
    pub(crate) fn negated_inner(&self) -> Option<&Operand> {
        match &self.node {
            Node::Unary(unary) if unary.operator == "-" && !unary.postfix => Some(&unary.operand),
            _ => None,
        }
    }

    pub(crate) fn is_reference(&self) -> bool {
        matches!(self.node, Node::Reference)
    }

    // ==================== Composition ====================

    fn compose(
        &self,
        operator: &'static str,
        class: OperatorClass,
        other: Value,
        inverse: bool,
    ) -> QbResult<Operand> {
        self.check_operands(operator, class, &other)?;
        let name = match &other {
            Value::Operand(op) => format!("{}_{}", self.name, op.name),
            _ => self.name.clone(),
        };
        Ok(self.build(operator, class, name, Term::from_value(other), inverse))
    }

    fn build(
        &self,
        operator: &'static str,
        class: OperatorClass,
        name: String,
        right: Term,
        inverse: bool,
    ) -> Operand {
        let (grouping, result_type): (Grouping, Arc<dyn ColumnType>) = match class {
            OperatorClass::Additive => (Grouping::None, self.column_type.clone()),
            OperatorClass::Multiplicative | OperatorClass::Shift => {
                (Grouping::Operands, self.column_type.clone())
            }
            OperatorClass::Concat => (Grouping::None, Arc::new(SqlType::Text)),
            OperatorClass::Pattern | OperatorClass::Comparison => {
                (Grouping::None, Arc::new(SqlType::Boolean))
            }
        };

        let left = Term::Operand(self.clone().without_alias());
        let (left, right) = if inverse { (right, left) } else { (left, right) };

        Self::from_node(
            name,
            result_type,
            Node::Operation(Arc::new(Operation {
                operator,
                left,
                right,
                grouping,
            })),
        )
    }

    /// Combine two boolean operands; used by [`crate::Clause`].
    pub(crate) fn logical(&self, operator: &'static str, right: Term) -> Operand {
        let grouping = if operator == "OR" {
            Grouping::Whole
        } else {
            Grouping::None
        };
        Self::from_node(
            self.name.clone(),
            Arc::new(SqlType::Boolean),
            Node::Operation(Arc::new(Operation {
                operator,
                left: Term::Operand(self.clone().without_alias()),
                right,
                grouping,
            })),
        )
    }

    fn check_operands(&self, operator: &str, class: OperatorClass, other: &Value) -> QbResult<()> {
        use TypeCategory as C;

        let left = self.category();
        let right = value_category(other);
        let accepted = match class {
            OperatorClass::Comparison => true,
            OperatorClass::Multiplicative | OperatorClass::Shift => {
                matches!(left, C::Numeric | C::Any) && is_numeric_operand(other, right)
            }
            OperatorClass::Additive => match left {
                C::Numeric => is_numeric_operand(other, right),
                C::Temporal => {
                    matches!(other, Value::Interval(_) | Value::Null)
                        || (operator == "-" && matches!(right, Some(C::Temporal | C::Any)))
                        || (operator == "+" && right == Some(C::Any))
                }
                C::Any => is_numeric_operand(other, right) || matches!(other, Value::Interval(_)),
                _ => false,
            },
            OperatorClass::Concat => match left {
                C::Text | C::Any => true,
                C::Structured => matches!(right, Some(C::Structured | C::Any)),
                _ => false,
            },
            OperatorClass::Pattern => {
                matches!(left, C::Text | C::Any) && matches!(right, Some(C::Text | C::Any))
            }
        };

        if accepted {
            Ok(())
        } else {
            Err(QbError::operand_type(
                operator,
                self.column_type.sql_name(),
                other.type_name(),
            ))
        }
    }

    fn unary(
        &self,
        operator: &'static str,
        postfix: bool,
        accepted: &[TypeCategory],
    ) -> QbResult<Operand> {
        if !accepted.contains(&self.category()) {
            return Err(QbError::unary_operand_type(
                operator,
                self.column_type.sql_name(),
            ));
        }
        let result_type: Arc<dyn ColumnType> = if operator == "-" {
            self.column_type.clone()
        } else {
            Arc::new(SqlType::Boolean)
        };
        Ok(Self::from_node(
            self.name.clone(),
            result_type,
            Node::Unary(Arc::new(Unary {
                operator,
                operand: self.clone().without_alias(),
                postfix,
            })),
        ))
    }

    // ==================== Arithmetic ====================

    /// `self + other`
    pub fn add(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose("+", OperatorClass::Additive, other.into(), false)
    }

    /// `other + self`
    pub fn radd(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose("+", OperatorClass::Additive, other.into(), true)
    }

    /// `self - other`
    pub fn subtract(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose("-", OperatorClass::Additive, other.into(), false)
    }

    /// `other - self`
    pub fn rsubtract(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose("-", OperatorClass::Additive, other.into(), true)
    }

    /// `self * other`
    pub fn multiply(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose("*", OperatorClass::Multiplicative, other.into(), false)
    }

    /// `other * self`
    pub fn rmultiply(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose("*", OperatorClass::Multiplicative, other.into(), true)
    }

    /// `self / other`
    pub fn divide(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose("/", OperatorClass::Multiplicative, other.into(), false)
    }

    /// `other / self`
    pub fn rdivide(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose("/", OperatorClass::Multiplicative, other.into(), true)
    }

    /// `self % other`
    pub fn modulo(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose("%", OperatorClass::Multiplicative, other.into(), false)
    }

    /// `self ^ other`
    pub fn power(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose("^", OperatorClass::Multiplicative, other.into(), false)
    }

    /// `self << other`
    pub fn shift_left(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose("<<", OperatorClass::Shift, other.into(), false)
    }

    /// `self >> other`
    pub fn shift_right(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose(">>", OperatorClass::Shift, other.into(), false)
    }

    /// `self || other`
    pub fn concat(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose("||", OperatorClass::Concat, other.into(), false)
    }

    /// `other || self`
    pub fn rconcat(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose("||", OperatorClass::Concat, other.into(), true)
    }

    /// `-self`
    pub fn neg(&self) -> QbResult<Operand> {
        self.unary("-", false, &[TypeCategory::Numeric, TypeCategory::Any])
    }

    // ==================== Comparison ====================

    /// `self = other`; the column's constraint is checked first.
    pub fn eq(&self, other: impl Into<Value>) -> QbResult<Operand> {
        let other = other.into();
        self.column_type.check_constraint(&self.name, &other)?;
        self.compose("=", OperatorClass::Comparison, other, false)
    }

    /// `self != other`
    pub fn ne(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose("!=", OperatorClass::Comparison, other.into(), false)
    }

    /// `self < other`
    pub fn lt(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose("<", OperatorClass::Comparison, other.into(), false)
    }

    /// `self <= other`
    pub fn le(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose("<=", OperatorClass::Comparison, other.into(), false)
    }

    /// `self > other`
    pub fn gt(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose(">", OperatorClass::Comparison, other.into(), false)
    }

    /// `self >= other`
    pub fn ge(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.compose(">=", OperatorClass::Comparison, other.into(), false)
    }

    /// Alias for [`Operand::ge`].
    pub fn gte(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.ge(other)
    }

    /// Alias for [`Operand::le`].
    pub fn lte(&self, other: impl Into<Value>) -> QbResult<Operand> {
        self.le(other)
    }

    /// `self LIKE pattern`
    pub fn like(&self, pattern: impl Into<Value>) -> QbResult<Operand> {
        self.compose("LIKE", OperatorClass::Pattern, pattern.into(), false)
    }

    /// `self ILIKE pattern` (case-insensitive)
    pub fn ilike(&self, pattern: impl Into<Value>) -> QbResult<Operand> {
        self.compose("ILIKE", OperatorClass::Pattern, pattern.into(), false)
    }

    /// `self IN (values...)`; an empty list renders the always-false `1=0`.
    pub fn is_in<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Operand {
        self.in_list("IN", values, "1=0")
    }

    /// `self NOT IN (values...)`; an empty list renders the always-true `1=1`.
    pub fn not_in<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Operand {
        self.in_list("NOT IN", values, "1=1")
    }

    fn in_list<V: Into<Value>>(
        &self,
        operator: &'static str,
        values: impl IntoIterator<Item = V>,
        empty: &str,
    ) -> Operand {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Self::from_node(
                self.name.clone(),
                Arc::new(SqlType::Boolean),
                Node::Raw(empty.to_string()),
            );
        }
        let tokens: Vec<String> = values
            .into_iter()
            .map(|v| Term::from_value(v).to_sql())
            .collect();
        let list = Term::Token(format!("({})", tokens.join(", ")));
        self.build(operator, OperatorClass::Comparison, self.name.clone(), list, false)
    }

    /// `self BETWEEN low AND high`
    pub fn between(&self, low: impl Into<Value>, high: impl Into<Value>) -> Operand {
        let range = format!(
            "{} AND {}",
            Term::from_value(low.into()).to_sql(),
            Term::from_value(high.into()).to_sql()
        );
        self.build(
            "BETWEEN",
            OperatorClass::Comparison,
            self.name.clone(),
            Term::Token(range),
            false,
        )
    }

    /// `self IS NULL`
    pub fn is_null(&self) -> Operand {
        self.null_check("IS NULL")
    }

    /// `self IS NOT NULL`
    pub fn is_not_null(&self) -> Operand {
        self.null_check("IS NOT NULL")
    }

    fn null_check(&self, operator: &'static str) -> Operand {
        Self::from_node(
            self.name.clone(),
            Arc::new(SqlType::Boolean),
            Node::Unary(Arc::new(Unary {
                operator,
                operand: self.clone().without_alias(),
                postfix: true,
            })),
        )
    }

    /// `NOT self`
    pub fn not(&self) -> QbResult<Operand> {
        self.unary("NOT", false, &[TypeCategory::Boolean, TypeCategory::Any])
    }

    /// `NOT self` without the type check; the caller guarantees a predicate.
    pub(crate) fn negate(&self) -> Operand {
        Self::from_node(
            self.name.clone(),
            Arc::new(SqlType::Boolean),
            Node::Unary(Arc::new(Unary {
                operator: "NOT",
                operand: self.clone().without_alias(),
                postfix: false,
            })),
        )
    }

    // ==================== Statement helpers ====================

    /// Ascending sort key.
    pub fn asc(&self) -> OrderItem {
        OrderItem::new(self.clone(), Direction::Asc)
    }

    /// Descending sort key.
    pub fn desc(&self) -> OrderItem {
        OrderItem::new(self.clone(), Direction::Desc)
    }

    /// `SET "column" = value` for UPDATE statements.
    ///
    /// Only plain column references can be assigned to.
    pub fn set(&self, value: impl Into<Value>) -> QbResult<Assignment> {
        if !self.is_reference() {
            return Err(QbError::value(format!(
                "cannot assign to expression '{}'",
                self.to_sql_unaliased()
            )));
        }
        let value = value.into();
        self.column_type.check_constraint(&self.name, &value)?;
        Ok(Assignment::new(self.name.clone(), Term::from_value(value)))
    }
}

fn literal_type(value: &Value) -> SqlType {
    use crate::value::{Numeric, Temporal};

    match value {
        Value::Numeric(Numeric::Int(_)) => SqlType::BigInt,
        Value::Numeric(_) => SqlType::Double,
        Value::Text(_) => SqlType::Text,
        Value::Temporal(Temporal::Date(_)) => SqlType::Date,
        Value::Temporal(Temporal::Time(_)) => SqlType::Time { with_tz: false },
        Value::Temporal(Temporal::DateTime(_)) => SqlType::Timestamp { with_tz: false },
        Value::Temporal(Temporal::DateTimeTz(_)) => SqlType::Timestamp { with_tz: true },
        Value::Structured(serde_json::Value::Bool(_)) => SqlType::Boolean,
        Value::Structured(_) => SqlType::Jsonb,
        Value::Interval(_) | Value::Null | Value::Operand(_) => SqlType::Any,
    }
}

/// Category of a right-hand value; `None` for NULL and interval literals.
fn value_category(value: &Value) -> Option<TypeCategory> {
    match value {
        Value::Numeric(_) => Some(TypeCategory::Numeric),
        Value::Text(_) => Some(TypeCategory::Text),
        Value::Temporal(_) => Some(TypeCategory::Temporal),
        Value::Structured(serde_json::Value::Bool(_)) => Some(TypeCategory::Boolean),
        Value::Structured(_) => Some(TypeCategory::Structured),
        Value::Interval(_) | Value::Null => None,
        Value::Operand(op) => Some(op.category()),
    }
}

fn is_numeric_operand(value: &Value, category: Option<TypeCategory>) -> bool {
    value.is_numeric()
        || matches!(value, Value::Null)
        || (value.as_operand().is_some()
            && matches!(category, Some(TypeCategory::Numeric | TypeCategory::Any)))
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

impl fmt::Debug for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operand")
            .field("name", &self.name)
            .field("type", &self.column_type.sql_name())
            .field("table", &self.table)
            .field("alias", &self.alias)
            .field("sql", &self.to_sql())
            .finish()
    }
}
