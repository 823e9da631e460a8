use crate::error::{QbError, QbResult};
use crate::value::{Numeric, Value};
use std::fmt;

// numeric(p, s) limits enforced by PostgreSQL
const DECIMAL_MAX_MAGNITUDE: u32 = 131_072;
const DECIMAL_MAX_SCALE: u32 = 16_383;
const MONEY_SCALE: u32 = 2;

/// Coarse type family used to decide which operators accept an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Numeric,
    Text,
    Temporal,
    Boolean,
    Structured,
    /// Untyped references and raw expressions accept every operator.
    Any,
}

/// The contract every column type exposes to the expression compiler.
pub trait ColumnType: fmt::Debug + Send + Sync {
    /// SQL spelling of the type, as used in `cast(x as <type>)` and in faults.
    fn sql_name(&self) -> String;

    /// Operator family of the type.
    fn category(&self) -> TypeCategory;

    /// Validate a value before it is embedded next to this column.
    ///
    /// Called before an equality comparison, an INSERT value or an UPDATE
    /// assignment is rendered.
    fn check_constraint(&self, _column: &str, _value: &Value) -> QbResult<()> {
        Ok(())
    }
}

/// Built-in PostgreSQL column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    SmallInt,
    Integer,
    BigInt,
    SmallSerial,
    Serial,
    BigSerial,
    /// `numeric(p, s)`; build through [`SqlType::decimal`] to validate bounds.
    Decimal {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    Real,
    Double,
    Money,
    /// `char(n)`; no length means `char(1)`.
    Char(Option<u32>),
    /// `varchar(n)`; no length means unbounded.
    Varchar(Option<u32>),
    Text,
    Date,
    Time {
        with_tz: bool,
    },
    Timestamp {
        with_tz: bool,
    },
    Boolean,
    Json,
    Jsonb,
    Any,
}

impl SqlType {
    /// `numeric(precision, scale)` with PostgreSQL's bounds checked.
    pub fn decimal(precision: Option<u32>, scale: Option<u32>) -> QbResult<Self> {
        if let Some(p) = precision
            && p > DECIMAL_MAX_MAGNITUDE + DECIMAL_MAX_SCALE
        {
            return Err(QbError::value(format!(
                "Precision {p} is bigger than allowed ({})",
                DECIMAL_MAX_MAGNITUDE + DECIMAL_MAX_SCALE
            )));
        }
        if let Some(s) = scale
            && s > DECIMAL_MAX_SCALE
        {
            return Err(QbError::value(format!(
                "Scale {s} is bigger than allowed ({DECIMAL_MAX_SCALE})"
            )));
        }
        Ok(SqlType::Decimal { precision, scale })
    }

    /// Inclusive integer bounds for the integer and serial types.
    pub fn integer_range(&self) -> Option<(i64, i64)> {
        match self {
            SqlType::SmallInt => Some((i16::MIN as i64, i16::MAX as i64)),
            SqlType::SmallSerial => Some((1, i16::MAX as i64)),
            SqlType::Integer => Some((i32::MIN as i64, i32::MAX as i64)),
            SqlType::Serial => Some((1, i32::MAX as i64)),
            SqlType::BigInt => Some((i64::MIN, i64::MAX)),
            SqlType::BigSerial => Some((1, i64::MAX)),
            _ => None,
        }
    }

    /// Maximum character length for `char`/`varchar`.
    pub fn max_length(&self) -> Option<u32> {
        match self {
            SqlType::Char(len) => Some(len.unwrap_or(1)),
            SqlType::Varchar(len) => *len,
            _ => None,
        }
    }

    /// Maximum number of fractional digits for `numeric`/`money`.
    pub fn max_scale(&self) -> Option<u32> {
        match self {
            SqlType::Decimal { scale, .. } => *scale,
            SqlType::Money => Some(MONEY_SCALE),
            _ => None,
        }
    }

    fn check_integer(&self, column: &str, numeric: &Numeric) -> QbResult<()> {
        let Some((min, max)) = self.integer_range() else {
            return Ok(());
        };
        let in_range = match numeric {
            Numeric::Int(v) => (min..=max).contains(v),
            Numeric::Float(v) => *v >= min as f64 && *v <= max as f64,
            #[cfg(feature = "rust_decimal")]
            Numeric::Decimal(d) => {
                rust_decimal::Decimal::from(min) <= *d && *d <= rust_decimal::Decimal::from(max)
            }
        };
        if in_range {
            Ok(())
        } else {
            Err(QbError::constraint(
                column,
                format!("value is out of range for type {} [{min}, {max}]", self.sql_name()),
            ))
        }
    }

    /// Maximum number of integer-part digits for `numeric(p, s)`.
    pub fn max_integer_digits(&self) -> Option<u32> {
        match self {
            SqlType::Decimal {
                precision: Some(p),
                scale,
            } => Some(p.saturating_sub(scale.unwrap_or(0))),
            _ => None,
        }
    }

    fn check_digits(&self, column: &str, numeric: &Numeric) -> QbResult<()> {
        let (max_integer, max_scale) = (self.max_integer_digits(), self.max_scale());
        if max_integer.is_none() && max_scale.is_none() {
            return Ok(());
        }
        let Some((integer, fraction)) = decimal_digits(numeric) else {
            return Ok(());
        };
        if let Some(max) = max_integer
            && integer > max as usize
        {
            return Err(QbError::constraint(
                column,
                format!(
                    "value {numeric} has {integer} integer digits, more than {max} allowed by type {}",
                    self.sql_name()
                ),
            ));
        }
        if let Some(max) = max_scale
            && fraction > max as usize
        {
            return Err(QbError::constraint(
                column,
                format!("scale of {numeric} exceeds {max} for type {}", self.sql_name()),
            ));
        }
        Ok(())
    }
}

/// Integer-part and fractional digit counts of a numeric value, taken from
/// its shortest decimal spelling. Non-finite floats have none.
fn decimal_digits(numeric: &Numeric) -> Option<(usize, usize)> {
    let text = match numeric {
        Numeric::Int(v) => v.unsigned_abs().to_string(),
        Numeric::Float(v) if v.is_finite() => format!("{}", v.abs()),
        Numeric::Float(_) => return None,
        #[cfg(feature = "rust_decimal")]
        Numeric::Decimal(d) => d.normalize().abs().to_string(),
    };
    let (integer, fraction) = text.split_once('.').unwrap_or((&text, ""));
    let integer = integer.trim_start_matches('0').len();
    let fraction = fraction.trim_end_matches('0').len();
    Some((integer, fraction))
}

impl ColumnType for SqlType {
    fn sql_name(&self) -> String {
        match self {
            SqlType::SmallInt => "smallint".to_string(),
            SqlType::Integer => "integer".to_string(),
            SqlType::BigInt => "bigint".to_string(),
            SqlType::SmallSerial => "smallserial".to_string(),
            SqlType::Serial => "serial".to_string(),
            SqlType::BigSerial => "bigserial".to_string(),
            SqlType::Decimal { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => format!("numeric({p}, {s})"),
                (Some(p), None) => format!("numeric({p})"),
                _ => "numeric".to_string(),
            },
            SqlType::Real => "real".to_string(),
            SqlType::Double => "double precision".to_string(),
            SqlType::Money => "money".to_string(),
            SqlType::Char(Some(n)) => format!("char({n})"),
            SqlType::Char(None) => "char".to_string(),
            SqlType::Varchar(Some(n)) => format!("varchar({n})"),
            SqlType::Varchar(None) => "varchar".to_string(),
            SqlType::Text => "text".to_string(),
            SqlType::Date => "date".to_string(),
            SqlType::Time { with_tz: false } => "time".to_string(),
            SqlType::Time { with_tz: true } => "timetz".to_string(),
            SqlType::Timestamp { with_tz: false } => "timestamp".to_string(),
            SqlType::Timestamp { with_tz: true } => "timestamptz".to_string(),
            SqlType::Boolean => "boolean".to_string(),
            SqlType::Json => "json".to_string(),
            SqlType::Jsonb => "jsonb".to_string(),
            SqlType::Any => "any".to_string(),
        }
    }

    fn category(&self) -> TypeCategory {
        match self {
            SqlType::SmallInt
            | SqlType::Integer
            | SqlType::BigInt
            | SqlType::SmallSerial
            | SqlType::Serial
            | SqlType::BigSerial
            | SqlType::Decimal { .. }
            | SqlType::Real
            | SqlType::Double
            | SqlType::Money => TypeCategory::Numeric,
            SqlType::Char(_) | SqlType::Varchar(_) | SqlType::Text => TypeCategory::Text,
            SqlType::Date | SqlType::Time { .. } | SqlType::Timestamp { .. } => {
                TypeCategory::Temporal
            }
            SqlType::Boolean => TypeCategory::Boolean,
            SqlType::Json | SqlType::Jsonb => TypeCategory::Structured,
            SqlType::Any => TypeCategory::Any,
        }
    }

    fn check_constraint(&self, column: &str, value: &Value) -> QbResult<()> {
        match value {
            Value::Numeric(n) => {
                self.check_integer(column, n)?;
                self.check_digits(column, n)
            }
            Value::Text(s) => match self.max_length() {
                Some(max) if s.chars().count() > max as usize => Err(QbError::constraint(
                    column,
                    format!(
                        "value of length {} is too long for type {}",
                        s.chars().count(),
                        self.sql_name()
                    ),
                )),
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_bounds_are_value_faults() {
        assert!(SqlType::decimal(Some(10), Some(2)).is_ok());
        assert!(SqlType::decimal(Some(200_000), None).unwrap_err().is_value());
        assert!(SqlType::decimal(None, Some(20_000)).unwrap_err().is_value());
    }

    #[test]
    fn sql_names() {
        assert_eq!(SqlType::Varchar(Some(32)).sql_name(), "varchar(32)");
        assert_eq!(
            SqlType::decimal(Some(10), Some(2)).unwrap().sql_name(),
            "numeric(10, 2)"
        );
        assert_eq!(SqlType::Timestamp { with_tz: true }.sql_name(), "timestamptz");
    }

    #[test]
    fn varchar_length_constraint() {
        let ty = SqlType::Varchar(Some(3));
        assert!(ty.check_constraint("code", &Value::from("abc")).is_ok());
        let err = ty.check_constraint("code", &Value::from("abcd")).unwrap_err();
        assert!(err.is_constraint_violation());
        assert!(err.to_string().contains("'code'"));
    }

    #[test]
    fn char_defaults_to_one() {
        let ty = SqlType::Char(None);
        assert!(ty.check_constraint("flag", &Value::from("y")).is_ok());
        assert!(ty.check_constraint("flag", &Value::from("yes")).is_err());
    }

    #[test]
    fn integer_range_constraint() {
        assert!(SqlType::SmallInt.check_constraint("n", &Value::from(32_767)).is_ok());
        assert!(SqlType::SmallInt.check_constraint("n", &Value::from(32_768)).is_err());
        assert!(SqlType::Serial.check_constraint("id", &Value::from(0)).is_err());
        assert!(SqlType::Integer.check_constraint("n", &Value::from(1e12)).is_err());
    }

    #[test]
    fn unrelated_values_pass() {
        assert!(SqlType::Integer.check_constraint("n", &Value::from("x")).is_ok());
        assert!(SqlType::Varchar(Some(1)).check_constraint("s", &Value::from(12345)).is_ok());
    }

    #[cfg(feature = "rust_decimal")]
    #[test]
    fn money_scale_constraint() {
        use rust_decimal::Decimal;
        use std::str::FromStr;

        let ok = Value::from(Decimal::from_str("10.25").unwrap());
        let bad = Value::from(Decimal::from_str("10.255").unwrap());
        assert!(SqlType::Money.check_constraint("price", &ok).is_ok());
        assert!(SqlType::Money.check_constraint("price", &bad).is_err());
    }

    #[test]
    fn decimal_precision_constraint() {
        let ty = SqlType::decimal(Some(5), Some(2)).unwrap();
        assert!(ty.check_constraint("price", &Value::from(999)).is_ok());
        assert!(ty.check_constraint("price", &Value::from(-999.99)).is_ok());
        assert!(ty.check_constraint("price", &Value::from(0.5)).is_ok());
        let err = ty.check_constraint("price", &Value::from(123_456_789)).unwrap_err();
        assert!(err.is_constraint_violation());
        assert!(ty.check_constraint("price", &Value::from(1000)).is_err());
        assert!(ty.check_constraint("price", &Value::from(1.125)).is_err());

        let unscaled = SqlType::decimal(Some(3), None).unwrap();
        assert!(unscaled.check_constraint("n", &Value::from(999)).is_ok());
        assert!(unscaled.check_constraint("n", &Value::from(1000)).is_err());
    }

    #[test]
    fn float_scale_constraint() {
        assert!(SqlType::Money.check_constraint("m", &Value::from(10.25)).is_ok());
        assert!(SqlType::Money.check_constraint("m", &Value::from(10.255)).is_err());
        assert!(SqlType::Money.check_constraint("m", &Value::from(1e15)).is_ok());
        assert!(SqlType::Money.check_constraint("m", &Value::from(f64::NAN)).is_ok());
    }

    #[test]
    fn categories() {
        assert_eq!(SqlType::Money.category(), TypeCategory::Numeric);
        assert_eq!(SqlType::Jsonb.category(), TypeCategory::Structured);
        assert_eq!(SqlType::Date.category(), TypeCategory::Temporal);
    }
}
