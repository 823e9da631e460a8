use crate::expr::Operand;
use crate::quote::quote_identifier;
use std::fmt;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone)]
enum Target {
    /// Column name, resolved against the table's registry at render time.
    Name(String),
    Operand(Operand),
}

/// One `ORDER BY` key.
///
/// Built from a column name (a leading `-` means `DESC`, `+` means `ASC`),
/// an operand (a negated operand means `DESC`) or [`Operand::asc`]/[`Operand::desc`].
#[derive(Debug, Clone)]
pub struct OrderItem {
    target: Target,
    direction: Direction,
}

impl OrderItem {
    pub fn new(operand: Operand, direction: Direction) -> Self {
        Self {
            target: Target::Operand(operand),
            direction,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Render as `<expr> ASC|DESC`, resolving bare names through `resolve`.
    pub(crate) fn render(&self, resolve: impl Fn(&str) -> Option<Operand>) -> String {
        let expr = match &self.target {
            Target::Name(name) => match resolve(name) {
                Some(op) => op.to_sql_unaliased(),
                None => quote_identifier(name),
            },
            Target::Operand(op) => op.alias_or_sql(),
        };
        format!("{expr} {}", self.direction)
    }
}

impl From<&str> for OrderItem {
    fn from(raw: &str) -> Self {
        let (name, direction) = if let Some(rest) = raw.strip_prefix('-') {
            (rest, Direction::Desc)
        } else if let Some(rest) = raw.strip_prefix('+') {
            (rest, Direction::Asc)
        } else {
            (raw, Direction::Asc)
        };
        Self {
            target: Target::Name(name.to_string()),
            direction,
        }
    }
}

impl From<String> for OrderItem {
    fn from(raw: String) -> Self {
        OrderItem::from(raw.as_str())
    }
}

impl From<Operand> for OrderItem {
    fn from(operand: Operand) -> Self {
        match operand.negated_inner() {
            Some(inner) => OrderItem::new(inner.clone(), Direction::Desc),
            None => OrderItem::new(operand, Direction::Asc),
        }
    }
}

impl From<&Operand> for OrderItem {
    fn from(operand: &Operand) -> Self {
        OrderItem::from(operand.clone())
    }
}
