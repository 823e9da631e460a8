//! Identifier and literal quoting.
//!
//! These functions are the only place raw user text reaches the output. Every
//! table, column and alias name goes through [`quote_identifier`] (or
//! [`quote_ident_part`]) and every scalar value goes through [`quote_literal`].
//!
//! - Identifiers are double-quoted per dotted segment: `public.users` becomes
//!   `"public"."users"`; an embedded `"` is doubled.
//! - Text literals are single-quoted; `'` and `\` are doubled.
//! - Numbers are rendered bare.
//!
//! None of these functions can fail.
//!
//! # Example
//! ```ignore
//! use pgqb::quote::{quote_identifier, quote_text};
//!
//! assert_eq!(quote_identifier("schema.table.col"), r#""schema"."table"."col""#);
//! assert_eq!(quote_text("O'Reilly"), "'O''Reilly'");
//! ```

use crate::value::{Numeric, Temporal, Value};

/// Quote a (possibly dotted) identifier.
///
/// Each `.`-separated segment is wrapped in double quotes individually.
pub fn quote_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    write_identifier(raw, &mut out);
    out
}

/// Quote an optional identifier; an absent qualifier stays absent.
pub fn quote_identifier_opt(raw: Option<&str>) -> Option<String> {
    raw.map(quote_identifier)
}

/// Quote a single identifier segment without splitting on `.`.
///
/// Used for aliases, which are never qualified.
pub fn quote_ident_part(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    write_ident_part(raw, &mut out);
    out
}

pub(crate) fn write_identifier(raw: &str, out: &mut String) {
    for (i, part) in raw.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        write_ident_part(part, out);
    }
}

pub(crate) fn write_ident_part(raw: &str, out: &mut String) {
    out.push('"');
    for ch in raw.chars() {
        if ch == '"' {
            out.push('"');
            out.push('"');
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

/// Quote a text literal: `'` and `\` are doubled and the result is single-quoted.
pub fn quote_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('\'');
    for ch in raw.chars() {
        match ch {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Render a scalar value as a SQL literal token.
///
/// Numbers render bare, everything else is stringified and quoted with
/// [`quote_text`]. Structured values are serialized as JSON first. An operand
/// renders as its expression.
pub fn quote_literal(value: &Value) -> String {
    match value {
        Value::Numeric(n) => quote_numeric(n),
        Value::Text(s) => quote_text(s),
        Value::Temporal(t) => quote_text(&temporal_text(t)),
        Value::Structured(json) => quote_text(&json.to_string()),
        Value::Interval(interval) => interval.to_sql(),
        Value::Null => "NULL".to_string(),
        Value::Operand(operand) => operand.to_sql(),
    }
}

fn quote_numeric(n: &Numeric) -> String {
    match n {
        Numeric::Int(v) => v.to_string(),
        Numeric::Float(v) => {
            if !v.is_finite() {
                // NaN and infinities are only reachable as quoted text in PostgreSQL.
                let text = if v.is_nan() {
                    "NaN"
                } else if v.is_sign_positive() {
                    "Infinity"
                } else {
                    "-Infinity"
                };
                return quote_text(text);
            }
            let s = v.to_string();
            if s.contains('.') { s } else { format!("{s}.0") }
        }
        #[cfg(feature = "rust_decimal")]
        Numeric::Decimal(d) => d.to_string(),
    }
}

fn temporal_text(t: &Temporal) -> String {
    match t {
        Temporal::Date(d) => d.to_string(),
        Temporal::Time(t) => t.to_string(),
        Temporal::DateTime(dt) => dt.to_string(),
        Temporal::DateTimeTz(dt) => dt.to_string(),
    }
}

/// Check a plain (unquoted) SQL name: `[A-Za-z_][A-Za-z0-9_$]*`.
///
/// Used for names that are emitted without quoting, such as function names.
pub fn is_plain_identifier(raw: &str) -> bool {
    let mut chars = raw.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '$' || c.is_ascii_alphanumeric())
}
