//! Render hooks.
//!
//! A [`RenderHook`] registered on a [`crate::Table`] sees every statement the
//! table renders and every fault a builder call raises.
//!
//! # Example
//!
//! ```rust,ignore
//! use pgqb::monitor::{RenderContext, RenderHook};
//!
//! struct Printer;
//!
//! impl RenderHook for Printer {
//!     fn on_render(&self, ctx: &RenderContext<'_>) {
//!         println!("[{:?}] {}", ctx.kind, ctx.sql);
//!     }
//! }
//!
//! let mut users = pgqb::table("users").with_hook(Printer);
//! ```

#[cfg(feature = "tracing")]
mod tracing_hook;

#[cfg(test)]
mod tests;

#[cfg(feature = "tracing")]
pub use tracing_hook::TracingSqlHook;

use crate::error::QbError;

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// The kind of statement a builder rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

/// What a hook sees when a statement is rendered.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Name of the rendering table.
    pub table: &'a str,
    pub kind: StatementKind,
    pub sql: &'a str,
}

/// Observer for statement rendering.
pub trait RenderHook: Send + Sync {
    /// Called once per successful `to_sql`.
    fn on_render(&self, ctx: &RenderContext<'_>);

    /// Called before a builder fault propagates.
    fn on_fault(&self, _table: &str, _error: &QbError) {}
}
