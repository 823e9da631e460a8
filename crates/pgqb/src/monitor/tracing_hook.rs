use super::truncate_sql_bytes;
use super::{RenderContext, RenderHook};
use crate::error::QbError;
use tracing::Level;

macro_rules! emit_at_level {
    ($level:expr, $($field:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!($($field)*),
            Level::WARN  => tracing::warn!($($field)*),
            Level::INFO  => tracing::info!($($field)*),
            Level::DEBUG => tracing::debug!($($field)*),
            Level::TRACE => tracing::trace!($($field)*),
        }
    };
}

/// A `tracing`-based hook that emits every rendered statement and every
/// builder fault.
///
/// Enable via the crate feature: `pgqb = { features = ["tracing"] }`.
#[derive(Debug, Clone)]
pub struct TracingSqlHook {
    /// Level for rendered statements.
    pub level: Level,
    /// Level for builder faults. `None` keeps faults out of the log.
    pub fault_level: Option<Level>,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for TracingSqlHook {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            fault_level: Some(Level::WARN),
            max_sql_length: Some(200),
        }
    }
}

impl TracingSqlHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level for rendered statements.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Level for refused builder calls.
    pub fn fault_level(mut self, level: Level) -> Self {
        self.fault_level = Some(level);
        self
    }

    /// Only log rendered statements.
    pub fn quiet_faults(mut self) -> Self {
        self.fault_level = None;
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }
}

impl RenderHook for TracingSqlHook {
    fn on_render(&self, ctx: &RenderContext<'_>) {
        let sql = self.truncate_sql(ctx.sql);
        emit_at_level!(
            self.level,
            target: "pgqb.sql",
            table = ctx.table,
            kind = ctx.kind.as_str(),
            sql_bytes = ctx.sql.len(),
            sql = %sql,
        );
    }

    fn on_fault(&self, table: &str, error: &QbError) {
        let Some(level) = self.fault_level else {
            return;
        };
        let kind = if error.is_illegal_transition() {
            "transition"
        } else if error.is_constraint_violation() {
            "constraint"
        } else {
            "argument"
        };
        emit_at_level!(
            level,
            target: "pgqb.sql",
            table,
            fault = kind,
            error = %error,
            "statement refused",
        );
    }
}
