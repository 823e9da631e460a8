//! # pgqb
//!
//! A PostgreSQL statement builder: typed column references, expressions and
//! predicates assembled into one SQL string through a fluent API.
//!
//! ## Features
//!
//! - **Expression trees**: arithmetic, comparison, concatenation, functions and
//!   casts over columns and literals, parenthesized by operator precedence
//! - **Checked operands**: each operator accepts a fixed set of operand types
//! - **Column constraints**: lengths, integer ranges and decimal scales are
//!   validated before a value is embedded
//! - **Ordered statements**: a state machine only accepts clauses in an order
//!   that yields valid SQL, and resets the builder on any fault
//! - **Inlined literals**: identifiers are double-quoted and values are quoted
//!   inline; no placeholders are emitted
//! - **Render hooks**: observe every rendered statement (`tracing` integration
//!   behind the `tracing` feature)
//!
//! ## Example
//!
//! ```ignore
//! use pgqb::prelude::*;
//!
//! let mut users = table("users")
//!     .with_column("name", SqlType::Varchar(Some(64)))
//!     .with_column("age", SqlType::Integer);
//!
//! let name = users.col("name")?;
//! let age = users.col("age")?;
//!
//! let sql = users
//!     .select([name.clone()])?
//!     .where_(Clause::new(age.ge(18)?)?)?
//!     .limit(10)?
//!     .to_sql()?;
//! assert_eq!(
//!     sql,
//!     r#"SELECT "users"."name" FROM "users" WHERE "users"."age" >= 18 LIMIT 10"#
//! );
//!
//! let sql = users
//!     .insert([name, age], [vec![Value::from("Nikita"), Value::from(23)]])?
//!     .to_sql()?;
//! assert_eq!(
//!     sql,
//!     r#"INSERT INTO "users" ("users"."name", "users"."age") VALUES ('Nikita', 23)"#
//! );
//! # Ok::<(), pgqb::QbError>(())
//! ```

pub mod clause;
pub mod error;
pub mod expr;
pub mod monitor;
pub mod prelude;
pub mod qb;
pub mod quote;
pub mod types;
pub mod value;

pub use clause::Clause;
pub use error::{QbError, QbResult};
pub use expr::{Operand, OperandKind};
pub use monitor::{RenderContext, RenderHook, StatementKind};
pub use qb::{Assignment, Direction, JoinKind, OrderItem, State, Table, table};
pub use quote::{quote_ident_part, quote_identifier, quote_literal, quote_text};
pub use types::{ColumnType, Interval, SqlType, TypeCategory};
pub use value::{Numeric, Temporal, Value};

#[cfg(feature = "tracing")]
pub use monitor::TracingSqlHook;
