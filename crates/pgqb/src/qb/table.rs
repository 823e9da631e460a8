use super::assign::Assignment;
use super::join::JoinKind;
use super::order::OrderItem;
use super::state::{State, StateMachine, Transition};
use crate::clause::Clause;
use crate::error::{QbError, QbResult};
use crate::expr::{Operand, Term};
use crate::monitor::{RenderContext, RenderHook, StatementKind};
use crate::quote::{quote_ident_part, quote_identifier};
use crate::types::ColumnType;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Create a statement builder bound to a table.
pub fn table(name: impl Into<String>) -> Table {
    Table::new(name)
}

/// A table binding plus one in-progress statement.
///
/// Every clause method checks the statement state machine, renders its
/// fragment and appends it. [`Table::to_sql`] joins the fragments and resets
/// the builder, so the same instance can build the next statement right away.
/// Any fault raised by a clause method also resets the builder.
///
/// A `Table` holds mutable statement state: use one instance per statement
/// being built at a time.
///
/// # Example
/// ```ignore
/// use pgqb::{table, Clause, SqlType};
///
/// let mut users = table("users")
///     .with_column("name", SqlType::Text)
///     .with_column("age", SqlType::Integer);
///
/// let adult = Clause::new(users.col("age")?.ge(18)?)?;
/// let sql = users
///     .select([users.col("name")?])?
///     .where_(adult)?
///     .limit(10)?
///     .to_sql()?;
/// assert_eq!(
///     sql,
///     r#"SELECT "users"."name" FROM "users" WHERE "users"."age" >= 18 LIMIT 10"#
/// );
/// ```
#[derive(Clone)]
pub struct Table {
    name: String,
    schema: Option<String>,
    alias: Option<String>,
    columns: Vec<Operand>,
    machine: StateMachine,
    kind: Option<StatementKind>,
    fragments: Vec<String>,
    hooks: Vec<Arc<dyn RenderHook>>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            alias: None,
            columns: Vec::new(),
            machine: StateMachine::new(),
            kind: None,
            fragments: Vec::new(),
            hooks: Vec::new(),
        }
    }

    // ==================== Configuration ====================

    /// Qualify the table (and its columns) with a schema.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self.rebind();
        self
    }

    /// Alias the table; columns are then qualified by the alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self.rebind();
        self
    }

    /// Register a column (builder form).
    pub fn with_column(mut self, name: impl Into<String>, ty: impl ColumnType + 'static) -> Self {
        self.column(name, ty);
        self
    }

    /// Register a column. Re-registering a name replaces its type.
    pub fn column(&mut self, name: impl Into<String>, ty: impl ColumnType + 'static) -> &mut Self {
        let mut operand = Operand::typed(name, ty);
        operand.bind(Some(self.qualifier()), self.column_schema());
        match self.columns.iter_mut().find(|c| c.name() == operand.name()) {
            Some(existing) => *existing = operand,
            None => self.columns.push(operand),
        }
        self
    }

    /// Register a render hook.
    pub fn with_hook(mut self, hook: impl RenderHook + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    fn rebind(&mut self) {
        let table = self.alias.clone().unwrap_or_else(|| self.name.clone());
        let schema = if self.alias.is_some() {
            None
        } else {
            self.schema.clone()
        };
        for column in &mut self.columns {
            column.bind(Some(&table), schema.as_deref());
        }
    }

    /// Name columns are qualified with: the alias if set, else the table name.
    fn qualifier(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    fn column_schema(&self) -> Option<&str> {
        if self.alias.is_some() {
            None
        } else {
            self.schema.as_deref()
        }
    }

    // ==================== Accessors ====================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Current statement state.
    pub fn state(&self) -> State {
        self.machine.state()
    }

    /// A registered column, qualified by this table.
    pub fn col(&self, name: &str) -> QbResult<Operand> {
        self.find_column(name).cloned().ok_or_else(|| {
            QbError::value(format!("table '{}' has no column '{name}'", self.name))
        })
    }

    pub fn columns(&self) -> &[Operand] {
        &self.columns
    }

    /// `"t".*`
    pub fn all(&self) -> Operand {
        Operand::raw(format!("{}.*", quote_identifier(self.qualifier())))
    }

    fn find_column(&self, name: &str) -> Option<&Operand> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// `"schema"."table" AS "alias"`
    pub fn from_sql(&self) -> String {
        let mut sql = String::new();
        if let Some(schema) = &self.schema {
            sql.push_str(&quote_identifier(schema));
            sql.push('.');
        }
        sql.push_str(&quote_identifier(&self.name));
        if let Some(alias) = &self.alias {
            sql.push_str(" AS ");
            sql.push_str(&quote_ident_part(alias));
        }
        sql
    }

    // ==================== Statement plumbing ====================

    /// Drop the in-progress statement.
    pub fn reset(&mut self) {
        self.machine.reset();
        self.kind = None;
        self.fragments.clear();
    }

    /// Report, reset and hand back a fault.
    fn fail(&mut self, error: QbError) -> QbError {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "pgqb.state",
            table = %self.name,
            state = %self.machine.state(),
            error = %error,
            "statement reset",
        );
        for hook in &self.hooks {
            hook.on_fault(&self.name, &error);
        }
        self.reset();
        error
    }

    /// Check the transition to `target`, render, append, enter.
    fn step<F>(&mut self, target: State, repeatable: bool, render: F) -> QbResult<&mut Self>
    where
        F: FnOnce(&Self) -> QbResult<String>,
    {
        match self.machine.check(target, repeatable) {
            Ok(Transition::Stay) => return Ok(self),
            Ok(Transition::Enter) => {}
            Err((from, to)) => return Err(self.fail(QbError::IllegalTransition { from, to })),
        }
        let fragment = match render(self) {
            Ok(fragment) => fragment,
            Err(error) => return Err(self.fail(error)),
        };
        self.fragments.push(fragment);
        self.machine.enter(target);
        match target {
            State::Select | State::Distinct => self.kind = Some(StatementKind::Select),
            State::Insert => self.kind = Some(StatementKind::Insert),
            State::Update => self.kind = Some(StatementKind::Update),
            State::Delete => self.kind = Some(StatementKind::Delete),
            _ => {}
        }
        Ok(self)
    }

    /// Check a non-repeatable transition without touching the fragments.
    ///
    /// `Ok(false)` means the builder already is in `target`.
    fn admits(&mut self, target: State) -> QbResult<bool> {
        match self.machine.check(target, false) {
            Ok(Transition::Stay) => Ok(false),
            Ok(Transition::Enter) => Ok(true),
            Err((from, to)) => Err(self.fail(QbError::IllegalTransition { from, to })),
        }
    }

    /// Report a fault raised before a transition could be checked.
    fn reject(&mut self, error: QbError) -> QbResult<&mut Self> {
        Err(self.fail(error))
    }

    // ==================== SELECT ====================

    /// `WITH "alias" AS (<other statement>)`
    ///
    /// Renders (and resets) `other` once the transition is allowed; a
    /// refused or repeated call leaves `other` untouched.
    pub fn with_cte(&mut self, alias: &str, other: &mut Table) -> QbResult<&mut Self> {
        if !self.admits(State::With)? {
            return Ok(self);
        }
        if other.fragments.is_empty() {
            return self.reject(QbError::value(format!(
                "common table expression '{alias}' has an empty body"
            )));
        }
        let body = match other.to_sql() {
            Ok(body) => body,
            Err(error) => return self.reject(error),
        };
        self.step(State::With, false, |_| {
            Ok(format!("WITH {} AS ({body})", quote_ident_part(alias)))
        })
    }

    /// `SELECT DISTINCT` or `SELECT DISTINCT ON (...)`.
    pub fn distinct(&mut self, on: impl IntoIterator<Item = Operand>) -> QbResult<&mut Self> {
        let on: Vec<String> = on.into_iter().map(|op| op.to_sql_unaliased()).collect();
        self.step(State::Distinct, false, |_| {
            Ok(if on.is_empty() {
                "SELECT DISTINCT".to_string()
            } else {
                format!("SELECT DISTINCT ON ({})", on.join(", "))
            })
        })
    }

    /// `SELECT <fields> FROM <table>`; no fields selects `"t".*`.
    pub fn select(&mut self, fields: impl IntoIterator<Item = Operand>) -> QbResult<&mut Self> {
        let fields: Vec<String> = fields.into_iter().map(|op| op.to_sql()).collect();
        self.step(State::Select, false, |t| {
            let columns = if fields.is_empty() {
                t.all().to_sql()
            } else {
                fields.join(", ")
            };
            let keyword = if t.machine.state() == State::Distinct {
                ""
            } else {
                "SELECT "
            };
            Ok(format!("{keyword}{columns} FROM {}", t.from_sql()))
        })
    }

    /// `SELECT "t".* FROM <table>`
    pub fn select_all(&mut self) -> QbResult<&mut Self> {
        self.select(Vec::new())
    }

    /// `<KIND> JOIN <other> ON <condition>`; the kind is parsed from a token
    /// such as `"LEFT"` or `"FULL OUTER"`.
    pub fn join(&mut self, kind: &str, other: &Table, on: Option<Clause>) -> QbResult<&mut Self> {
        match kind.parse::<JoinKind>() {
            Ok(kind) => self.join_kind(kind, other, on),
            Err(error) => self.reject(error),
        }
    }

    /// Join with an already-parsed kind. `CROSS` joins take no condition;
    /// every other kind requires one.
    pub fn join_kind(
        &mut self,
        kind: JoinKind,
        other: &Table,
        on: Option<Clause>,
    ) -> QbResult<&mut Self> {
        let target = other.from_sql();
        self.step(State::Join, true, |_| match (kind.needs_condition(), on) {
            (true, Some(on)) => Ok(format!("{kind} {target} ON {on}")),
            (false, None) => Ok(format!("{kind} {target}")),
            (true, None) => Err(QbError::value(format!("{kind} requires an ON condition"))),
            (false, Some(_)) => Err(QbError::value(format!("{kind} takes no ON condition"))),
        })
    }

    /// `WHERE <clause>`; after UPDATE or DELETE this filters the mutation.
    pub fn where_(&mut self, clause: Clause) -> QbResult<&mut Self> {
        let target = match self.machine.state() {
            State::Update | State::Delete | State::MutationWhere => State::MutationWhere,
            _ => State::Where,
        };
        self.step(target, false, |_| Ok(format!("WHERE {clause}")))
    }

    /// `GROUP BY <fields>`
    pub fn group_by(&mut self, fields: impl IntoIterator<Item = Operand>) -> QbResult<&mut Self> {
        let fields: Vec<String> = fields.into_iter().map(|op| op.to_sql_unaliased()).collect();
        self.step(State::GroupBy, false, |_| {
            if fields.is_empty() {
                return Err(QbError::value("GROUP BY needs at least one field"));
            }
            Ok(format!("GROUP BY {}", fields.join(", ")))
        })
    }

    /// `HAVING <clause>`
    pub fn having(&mut self, clause: Clause) -> QbResult<&mut Self> {
        self.step(State::Having, false, |_| Ok(format!("HAVING {clause}")))
    }

    /// `ORDER BY <key> ASC|DESC, ...`
    ///
    /// Bare names are resolved through the column registry, so `"-age"`
    /// renders `"users"."age" DESC`.
    pub fn order_by(
        &mut self,
        items: impl IntoIterator<Item = impl Into<OrderItem>>,
    ) -> QbResult<&mut Self> {
        let items: Vec<OrderItem> = items.into_iter().map(Into::into).collect();
        self.step(State::OrderBy, false, |t| {
            if items.is_empty() {
                return Err(QbError::value("ORDER BY needs at least one key"));
            }
            let keys: Vec<String> = items
                .iter()
                .map(|item| item.render(|name| t.find_column(name).cloned()))
                .collect();
            Ok(format!("ORDER BY {}", keys.join(", ")))
        })
    }

    pub fn limit(&mut self, n: u64) -> QbResult<&mut Self> {
        self.step(State::Limit, false, |_| Ok(format!("LIMIT {n}")))
    }

    pub fn offset(&mut self, n: u64) -> QbResult<&mut Self> {
        self.step(State::Offset, false, |_| Ok(format!("OFFSET {n}")))
    }

    // ==================== Mutations ====================

    /// `INSERT INTO <table> (<fields>) VALUES (...), (...)`
    ///
    /// Each value is checked against its column's constraint before rendering.
    pub fn insert<R>(
        &mut self,
        fields: impl IntoIterator<Item = Operand>,
        rows: impl IntoIterator<Item = R>,
    ) -> QbResult<&mut Self>
    where
        R: IntoIterator,
        R::Item: Into<Value>,
    {
        let fields: Vec<Operand> = fields.into_iter().collect();
        let rows: Vec<Vec<Value>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        self.step(State::Insert, false, |t| {
            let head = t.insert_head(&fields)?;
            if rows.is_empty() {
                return Err(QbError::value("INSERT needs at least one row"));
            }
            let mut tuples = Vec::with_capacity(rows.len());
            for row in rows {
                if row.len() != fields.len() {
                    return Err(QbError::value(format!(
                        "row has {} values for {} columns",
                        row.len(),
                        fields.len()
                    )));
                }
                let mut values = Vec::with_capacity(row.len());
                for (field, value) in fields.iter().zip(row) {
                    field.column_type().check_constraint(field.name(), &value)?;
                    values.push(Term::from_value(value).to_sql());
                }
                tuples.push(format!("({})", values.join(", ")));
            }
            Ok(format!("{head} VALUES {}", tuples.join(", ")))
        })
    }

    /// `INSERT INTO <table> (<fields>) <other statement>`
    ///
    /// Renders (and resets) `other` once the transition and the column list
    /// are accepted; a refused or repeated call leaves `other` untouched.
    pub fn insert_from(
        &mut self,
        fields: impl IntoIterator<Item = Operand>,
        other: &mut Table,
    ) -> QbResult<&mut Self> {
        if !self.admits(State::Insert)? {
            return Ok(self);
        }
        let fields: Vec<Operand> = fields.into_iter().collect();
        let head = match self.insert_head(&fields) {
            Ok(head) => head,
            Err(error) => return self.reject(error),
        };
        let source = match other.to_sql() {
            Ok(source) => source,
            Err(error) => return self.reject(error),
        };
        self.step(State::Insert, false, |_| Ok(format!("{head} {source}")))
    }

    fn insert_head(&self, fields: &[Operand]) -> QbResult<String> {
        if fields.is_empty() {
            return Err(QbError::value("INSERT needs at least one column"));
        }
        let columns: Vec<String> = fields.iter().map(Operand::to_sql_unaliased).collect();
        Ok(format!("INSERT INTO {} ({})", self.from_sql(), columns.join(", ")))
    }

    /// `UPDATE <table> SET "a" = ..., "b" = ...`
    pub fn update(
        &mut self,
        assignments: impl IntoIterator<Item = Assignment>,
    ) -> QbResult<&mut Self> {
        let assignments: Vec<String> = assignments.into_iter().map(|a| a.to_sql()).collect();
        self.step(State::Update, false, |t| {
            if assignments.is_empty() {
                return Err(QbError::value("UPDATE needs at least one assignment"));
            }
            Ok(format!("UPDATE {} SET {}", t.from_sql(), assignments.join(", ")))
        })
    }

    /// `DELETE FROM <table>`
    pub fn delete(&mut self) -> QbResult<&mut Self> {
        self.step(State::Delete, false, |t| Ok(format!("DELETE FROM {}", t.from_sql())))
    }

    /// `RETURNING <fields>`; no fields returns `"t".*`.
    pub fn returning(&mut self, fields: impl IntoIterator<Item = Operand>) -> QbResult<&mut Self> {
        let fields: Vec<String> = fields.into_iter().map(|op| op.to_sql()).collect();
        self.step(State::Returning, false, |t| {
            let columns = if fields.is_empty() {
                t.all().to_sql()
            } else {
                fields.join(", ")
            };
            Ok(format!("RETURNING {columns}"))
        })
    }

    // ==================== Rendering ====================

    /// Finish the statement: join the fragments and reset the builder.
    pub fn to_sql(&mut self) -> QbResult<String> {
        if let Err((from, to)) = self.machine.check(State::Finite, false) {
            return Err(self.fail(QbError::IllegalTransition { from, to }));
        }
        let sql = self.fragments.join(" ");
        let kind = self.kind.unwrap_or(StatementKind::Select);

        #[cfg(feature = "tracing")]
        tracing::trace!(target: "pgqb.sql", table = %self.name, kind = kind.as_str(), sql = %sql);

        let ctx = RenderContext {
            table: &self.name,
            kind,
            sql: &sql,
        };
        for hook in &self.hooks {
            hook.on_render(&ctx);
        }
        self.reset();
        Ok(sql)
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .field("alias", &self.alias)
            .field("columns", &self.columns.len())
            .field("state", &self.machine.state())
            .field("fragments", &self.fragments)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
