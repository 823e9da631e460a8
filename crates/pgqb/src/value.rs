//! Right-hand operand values.
//!
//! Every argument that an operator, function or statement accepts is turned
//! into a [`Value`] once, at the call boundary. Rendering and type checks then
//! pattern-match on the variant instead of inspecting runtime types.

use crate::error::QbResult;
use crate::expr::Operand;
use crate::types::Interval;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::Serialize;
use std::fmt;

/// A numeric literal, rendered bare.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
    #[cfg(feature = "rust_decimal")]
    Decimal(rust_decimal::Decimal),
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Int(v) => write!(f, "{v}"),
            Numeric::Float(v) => write!(f, "{v}"),
            #[cfg(feature = "rust_decimal")]
            Numeric::Decimal(v) => write!(f, "{v}"),
        }
    }
}

/// A date/time literal, rendered as quoted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    DateTimeTz(DateTime<FixedOffset>),
}

/// A classified operand value.
#[derive(Debug, Clone)]
pub enum Value {
    /// Integer, float or decimal number.
    Numeric(Numeric),
    /// Text (single-quoted).
    Text(String),
    /// Date, time or timestamp (single-quoted).
    Temporal(Temporal),
    /// Collections, maps and booleans, serialized as quoted JSON.
    Structured(serde_json::Value),
    /// `interval '...'` literal.
    Interval(Interval),
    /// SQL `NULL`.
    Null,
    /// Another expression.
    Operand(Operand),
}

impl Value {
    /// Serialize any serde value as a structured (JSON) literal.
    pub fn json<T: Serialize>(value: &T) -> QbResult<Self> {
        Ok(Value::Structured(serde_json::to_value(value)?))
    }

    /// Runtime type name, as reported in operand-type faults.
    pub fn type_name(&self) -> String {
        match self {
            Value::Numeric(Numeric::Int(_)) => "integer".to_string(),
            Value::Numeric(Numeric::Float(_)) => "double precision".to_string(),
            #[cfg(feature = "rust_decimal")]
            Value::Numeric(Numeric::Decimal(_)) => "numeric".to_string(),
            Value::Text(_) => "text".to_string(),
            Value::Temporal(Temporal::Date(_)) => "date".to_string(),
            Value::Temporal(Temporal::Time(_)) => "time".to_string(),
            Value::Temporal(Temporal::DateTime(_)) => "timestamp".to_string(),
            Value::Temporal(Temporal::DateTimeTz(_)) => "timestamptz".to_string(),
            Value::Structured(serde_json::Value::Bool(_)) => "boolean".to_string(),
            Value::Structured(_) => "json".to_string(),
            Value::Interval(_) => "interval".to_string(),
            Value::Null => "null".to_string(),
            Value::Operand(op) => op.column_type().sql_name(),
        }
    }

    /// The operand, if this value is an expression.
    pub fn as_operand(&self) -> Option<&Operand> {
        match self {
            Value::Operand(op) => Some(op),
            _ => None,
        }
    }

    pub(crate) fn is_numeric(&self) -> bool {
        matches!(self, Value::Numeric(_))
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Numeric(Numeric::Int(i64::from(v)))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Numeric(Numeric::Float(f64::from(v)))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Numeric(Numeric::Float(v))
    }
}

#[cfg(feature = "rust_decimal")]
impl From<rust_decimal::Decimal> for Value {
    fn from(v: rust_decimal::Decimal) -> Self {
        Value::Numeric(Numeric::Decimal(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Text(v.to_string())
    }
}

#[cfg(feature = "uuid")]
impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Text(v.hyphenated().to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Temporal(Temporal::Date(v))
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Temporal(Temporal::Time(v))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Temporal(Temporal::DateTime(v))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(v: DateTime<Tz>) -> Self {
        Value::Temporal(Temporal::DateTimeTz(v.fixed_offset()))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Structured(serde_json::Value::Bool(v))
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Structured(v)
    }
}

impl<T: Into<serde_json::Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Structured(serde_json::Value::from(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<Interval> for Value {
    fn from(v: Interval) -> Self {
        Value::Interval(v)
    }
}

impl From<Operand> for Value {
    fn from(v: Operand) -> Self {
        Value::Operand(v)
    }
}

impl From<&Operand> for Value {
    fn from(v: &Operand) -> Self {
        Value::Operand(v.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn classifies_scalars() {
        assert!(matches!(Value::from(1u8), Value::Numeric(Numeric::Int(1))));
        assert!(matches!(Value::from(1.5f32), Value::Numeric(Numeric::Float(_))));
        assert!(matches!(Value::from("x"), Value::Text(_)));
        assert!(matches!(Value::from(false), Value::Structured(_)));
        assert!(matches!(Value::from(Some(3)), Value::Numeric(Numeric::Int(3))));
        assert!(matches!(Value::from(None::<&str>), Value::Null));
    }

    #[test]
    fn timezone_aware_timestamps_keep_offset() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        match Value::from(ts) {
            Value::Temporal(Temporal::DateTimeTz(dt)) => {
                assert_eq!(dt.offset().local_minus_utc(), 0)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn json_serializes_structs() {
        #[derive(Serialize)]
        struct Tag {
            name: &'static str,
        }
        let v = Value::json(&Tag { name: "a" }).unwrap();
        assert_eq!(v.type_name(), "json");
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::from(1).type_name(), "integer");
        assert_eq!(Value::from(1.0).type_name(), "double precision");
        assert_eq!(Value::from("a").type_name(), "text");
        assert_eq!(Value::from(true).type_name(), "boolean");
        assert_eq!(Value::from(vec!["a"]).type_name(), "json");
        assert_eq!(Value::from(Interval::new().days(1)).type_name(), "interval");
    }
}
