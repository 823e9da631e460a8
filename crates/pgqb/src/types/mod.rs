//! Column type contract and the built-in PostgreSQL type catalogue.
//!
//! Expressions only ever talk to column types through [`ColumnType`]; the
//! [`SqlType`] catalogue is one implementation of it. Custom column types
//! (domains, enums, extension types) can implement the trait directly.

mod column;
mod interval;

pub use column::{ColumnType, SqlType, TypeCategory};
pub use interval::Interval;
