//! Expression tree nodes and their rendering.
//!
//! Nodes are immutable once built and shared through `Arc`, so cloning an
//! [`Operand`] never copies a subtree. Every node only points at operands that
//! existed before it, which keeps the tree acyclic.

use crate::expr::Operand;
use crate::quote::{quote_literal, write_ident_part, write_identifier};
use crate::value::Value;
use std::sync::Arc;

/// How an operation parenthesizes when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Grouping {
    /// Render as-is.
    None,
    /// Wrap nested operations on either side (`*`, `/`, `%`, `^`, shifts).
    Operands,
    /// Wrap the whole operation (boolean `OR`).
    Whole,
}

/// One side of an operation or one function argument.
#[derive(Debug, Clone)]
pub(crate) enum Term {
    Operand(Operand),
    /// An already-quoted literal token.
    Token(String),
}

impl Term {
    pub(crate) fn from_value(value: Value) -> Self {
        match value {
            Value::Operand(op) => Term::Operand(op.without_alias()),
            other => Term::Token(quote_literal(&other)),
        }
    }

    pub(crate) fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out, false);
        out
    }

    fn write_sql(&self, out: &mut String, wrap_operations: bool) {
        match self {
            Term::Token(token) => out.push_str(token),
            Term::Operand(op) if wrap_operations && op.is_groupable_operation() => {
                out.push('(');
                op.write_body(out);
                out.push(')');
            }
            Term::Operand(op) => op.write_body(out),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Operation {
    pub(crate) operator: &'static str,
    pub(crate) left: Term,
    pub(crate) right: Term,
    pub(crate) grouping: Grouping,
}

impl Operation {
    fn write_sql(&self, out: &mut String) {
        let whole = self.grouping == Grouping::Whole;
        let wrap = self.grouping == Grouping::Operands;
        if whole {
            out.push('(');
        }
        self.left.write_sql(out, wrap);
        out.push(' ');
        out.push_str(self.operator);
        out.push(' ');
        self.right.write_sql(out, wrap);
        if whole {
            out.push(')');
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Unary {
    pub(crate) operator: &'static str,
    pub(crate) operand: Operand,
    /// `x IS NULL` rather than `-x`.
    pub(crate) postfix: bool,
}

impl Unary {
    fn write_sql(&self, out: &mut String) {
        if self.postfix {
            self.operand.write_body(out);
            out.push(' ');
            out.push_str(self.operator);
            return;
        }
        out.push_str(self.operator);
        if self.operator.chars().all(char::is_alphabetic) {
            out.push(' ');
        }
        let mut body = String::new();
        self.operand.write_body(&mut body);
        // `--` would open a line comment
        let clashes = body.starts_with('-') && self.operator.ends_with('-');
        if clashes || self.operand.is_groupable_operation() {
            out.push('(');
            out.push_str(&body);
            out.push(')');
        } else {
            out.push_str(&body);
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FunctionCall {
    pub(crate) name: String,
    pub(crate) args: Vec<Term>,
}

impl FunctionCall {
    fn write_sql(&self, out: &mut String) {
        out.push_str(&self.name);
        out.push('(');
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            arg.write_sql(out, false);
        }
        out.push(')');
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Cast {
    pub(crate) inner: Term,
    pub(crate) type_name: String,
}

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Reference,
    /// A literal operand; holds its quoted token.
    Literal(String),
    /// Raw SQL passed through untouched.
    Raw(String),
    Operation(Arc<Operation>),
    Unary(Arc<Unary>),
    Function(Arc<FunctionCall>),
    Cast(Arc<Cast>),
}

impl Operand {
    /// Render without the alias.
    pub(crate) fn write_body(&self, out: &mut String) {
        match &self.node {
            Node::Reference => self.write_reference(out),
            Node::Literal(token) | Node::Raw(token) => out.push_str(token),
            Node::Operation(op) => op.write_sql(out),
            Node::Unary(unary) => unary.write_sql(out),
            Node::Function(call) => call.write_sql(out),
            Node::Cast(cast) => {
                out.push_str("cast(");
                cast.inner.write_sql(out, false);
                out.push_str(" as ");
                out.push_str(&cast.type_name);
                out.push(')');
            }
        }
    }

    /// Render with the live alias, if any.
    pub(crate) fn write_sql(&self, out: &mut String) {
        self.write_body(out);
        if let Some(alias) = &self.alias {
            out.push_str(" AS ");
            write_ident_part(alias, out);
        }
    }

    fn write_reference(&self, out: &mut String) {
        if let Some(schema) = &self.schema {
            write_identifier(schema, out);
            out.push('.');
        }
        if let Some(table) = &self.table {
            write_identifier(table, out);
            out.push('.');
        }
        write_identifier(&self.name, out);
    }

    /// Binary operations that are not already self-parenthesized.
    fn is_groupable_operation(&self) -> bool {
        matches!(&self.node, Node::Operation(op) if op.grouping != Grouping::Whole)
    }
}
