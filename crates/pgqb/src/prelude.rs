//! Convenient imports for typical `pgqb` usage.
//!
//! ```ignore
//! use pgqb::prelude::*;
//! ```

pub use crate::{
    Clause, ColumnType, Interval, Operand, OrderItem, QbError, QbResult, SqlType, Table, Value,
    table,
};
