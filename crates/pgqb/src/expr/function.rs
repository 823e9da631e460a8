//! Function calls and casts.
//!
//! Wrapping consumes the receiver: the wrapper takes over its alias, name and
//! table qualifier, so `upper(x) AS "n"` never also renders `x AS "n"` inside.

use super::node::{Cast, FunctionCall, Node, Term};
use super::Operand;
use crate::error::{QbError, QbResult};
use crate::quote::is_plain_identifier;
use crate::types::{ColumnType, SqlType, TypeCategory};
use crate::value::Value;
use std::sync::Arc;

impl Operand {
    /// Wrap this operand in `name(self, args...)`.
    ///
    /// With `inverse`, the extra arguments come first: `name(args..., self)`.
    /// The function name is emitted unquoted and must be a plain identifier.
    pub fn wrap_function(
        mut self,
        name: &str,
        args: Vec<Value>,
        inverse: bool,
    ) -> QbResult<Operand> {
        if !is_plain_identifier(name) {
            return Err(QbError::value(format!("invalid function name '{name}'")));
        }

        let alias = self.alias.take();
        let mut terms: Vec<Term> = args.into_iter().map(Term::from_value).collect();
        let receiver = Term::Operand(self.clone());
        if inverse {
            terms.push(receiver);
        } else {
            terms.insert(0, receiver);
        }

        Ok(Operand {
            name: self.name,
            column_type: self.column_type,
            table: self.table,
            schema: self.schema,
            alias,
            node: Node::Function(Arc::new(FunctionCall {
                name: name.to_string(),
                args: terms,
            })),
        })
    }

    fn wrap_infallible(self, name: &'static str, column_type: Arc<dyn ColumnType>) -> Operand {
        let alias = self.alias.clone();
        let receiver = self.without_alias();
        Operand {
            name: receiver.name.clone(),
            column_type,
            table: receiver.table.clone(),
            schema: receiver.schema.clone(),
            alias,
            node: Node::Function(Arc::new(FunctionCall {
                name: name.to_string(),
                args: vec![Term::Operand(receiver)],
            })),
        }
    }

    fn keep_type(&self) -> Arc<dyn ColumnType> {
        self.column_type.clone()
    }

    /// `count(self)`
    pub fn count(self) -> Operand {
        self.wrap_infallible("count", Arc::new(SqlType::BigInt))
    }

    /// `sum(self)`
    pub fn sum(self) -> Operand {
        let ty = self.keep_type();
        self.wrap_infallible("sum", ty)
    }

    /// `avg(self)`
    pub fn avg(self) -> Operand {
        self.wrap_infallible("avg", Arc::new(SqlType::Decimal { precision: None, scale: None }))
    }

    /// `min(self)`
    pub fn min(self) -> Operand {
        let ty = self.keep_type();
        self.wrap_infallible("min", ty)
    }

    /// `max(self)`
    pub fn max(self) -> Operand {
        let ty = self.keep_type();
        self.wrap_infallible("max", ty)
    }

    /// `array_agg(self)`
    pub fn array_agg(self) -> Operand {
        self.wrap_infallible("array_agg", Arc::new(SqlType::Any))
    }

    /// `upper(self)`
    pub fn upper(self) -> Operand {
        self.wrap_infallible("upper", Arc::new(SqlType::Text))
    }

    /// `lower(self)`
    pub fn lower(self) -> Operand {
        self.wrap_infallible("lower", Arc::new(SqlType::Text))
    }

    /// `length(self)`
    pub fn length(self) -> Operand {
        self.wrap_infallible("length", Arc::new(SqlType::Integer))
    }

    /// `abs(self)`
    pub fn abs(self) -> Operand {
        let ty = self.keep_type();
        self.wrap_infallible("abs", ty)
    }

    /// `round(self, digits)`
    pub fn round(self, digits: i32) -> QbResult<Operand> {
        self.wrap_function("round", vec![Value::from(digits)], false)
    }

    /// `coalesce(self, fallback)`
    pub fn coalesce(self, fallback: impl Into<Value>) -> QbResult<Operand> {
        self.wrap_function("coalesce", vec![fallback.into()], false)
    }

    /// Integer division: `div(self, divisor)`.
    pub fn floor_div(self, divisor: impl Into<Value>) -> QbResult<Operand> {
        let divisor = divisor.into();
        let numeric = |c: TypeCategory| matches!(c, TypeCategory::Numeric | TypeCategory::Any);
        let accepted = numeric(self.category())
            && (divisor.is_numeric()
                || divisor.as_operand().is_some_and(|op| numeric(op.category())));
        if !accepted {
            return Err(QbError::operand_type(
                "//",
                self.column_type.sql_name(),
                divisor.type_name(),
            ));
        }
        self.wrap_function("div", vec![divisor], false)
    }

    /// `log(base, self)`
    pub fn log(self, base: impl Into<Value>) -> QbResult<Operand> {
        self.wrap_function("log", vec![base.into()], true)
    }

    /// `cast(self as <type>)`
    ///
    /// The result takes the target type and the receiver's alias.
    pub fn cast(mut self, target: impl ColumnType + 'static) -> Operand {
        let alias = self.alias.take();
        let type_name = target.sql_name();
        Operand {
            name: self.name.clone(),
            column_type: Arc::new(target),
            table: self.table.clone(),
            schema: self.schema.clone(),
            alias,
            node: Node::Cast(Arc::new(Cast {
                inner: Term::Operand(self),
                type_name,
            })),
        }
    }
}
