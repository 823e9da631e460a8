use super::*;
use crate::clause::Clause;
use crate::qb::{State, table};
use crate::types::SqlType;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Recorder {
    rendered: Mutex<Vec<(String, StatementKind, String)>>,
    faults: Mutex<Vec<String>>,
}

impl RenderHook for Arc<Recorder> {
    fn on_render(&self, ctx: &RenderContext<'_>) {
        self.rendered
            .lock()
            .unwrap()
            .push((ctx.table.to_string(), ctx.kind, ctx.sql.to_string()));
    }

    fn on_fault(&self, table: &str, error: &QbError) {
        self.faults.lock().unwrap().push(format!("{table}: {error}"));
    }
}

#[test]
fn truncate_respects_char_boundary() {
    assert_eq!(truncate_sql_bytes("abc", 10), "abc");
    assert_eq!(truncate_sql_bytes("héllo", 2), "h");
    assert_eq!(truncate_sql_bytes("héllo", 3), "hé");
}

#[test]
fn hook_sees_rendered_statements() {
    let recorder = Arc::new(Recorder::default());
    let mut users = table("users")
        .with_column("id", SqlType::Integer)
        .with_hook(recorder.clone());

    users.select_all().unwrap();
    let sql = users.to_sql().unwrap();
    users.delete().unwrap();
    users.to_sql().unwrap();

    let rendered = recorder.rendered.lock().unwrap();
    assert_eq!(rendered.len(), 2);
    assert_eq!(rendered[0], ("users".to_string(), StatementKind::Select, sql));
    assert_eq!(rendered[1].1, StatementKind::Delete);
}

#[test]
fn hook_sees_faults() {
    let recorder = Arc::new(Recorder::default());
    let mut users = table("users").with_hook(recorder.clone());

    assert!(users.limit(1).is_err());
    let faults = recorder.faults.lock().unwrap();
    assert_eq!(faults.len(), 1);
    assert!(faults[0].starts_with("users: Impossible action: Initial -> Limit"));
}

#[cfg(feature = "tracing")]
#[test]
fn tracing_hook_truncates() {
    let hook = TracingSqlHook::new().max_sql_length(6);
    assert_eq!(hook.truncate_sql("SELECT 1"), "SELECT...");
    assert_eq!(hook.clone().no_truncate().truncate_sql("SELECT 1"), "SELECT 1");
    assert_eq!(TracingSqlHook::default().level, tracing::Level::DEBUG);
}

#[cfg(feature = "tracing")]
#[test]
fn tracing_hook_fault_level() {
    use tracing::Level;

    assert_eq!(TracingSqlHook::default().fault_level, Some(Level::WARN));
    let hook = TracingSqlHook::new().fault_level(Level::ERROR);
    assert_eq!(hook.fault_level, Some(Level::ERROR));
    assert_eq!(hook.quiet_faults().fault_level, None);

    // faults still reach the hook and reset the builder when quieted
    let mut users = table("users").with_hook(TracingSqlHook::new().quiet_faults());
    assert!(users.where_(Clause::from(true)).unwrap_err().is_illegal_transition());
    assert_eq!(users.state(), State::Initial);
}
