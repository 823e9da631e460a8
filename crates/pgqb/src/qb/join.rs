use crate::error::QbError;
use std::fmt;
use std::str::FromStr;

/// Join kinds accepted by [`crate::Table::join`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    /// Bare `JOIN`
    Join,
    Inner,
    Left,
    LeftOuter,
    Right,
    RightOuter,
    Full,
    FullOuter,
    Cross,
}

impl JoinKind {
    /// SQL keyword sequence, always ending in `JOIN`.
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Join => "JOIN",
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::LeftOuter => "LEFT OUTER JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::RightOuter => "RIGHT OUTER JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::FullOuter => "FULL OUTER JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }

    /// Whether this kind takes an `ON` condition.
    pub fn needs_condition(self) -> bool {
        self != JoinKind::Cross
    }
}

impl FromStr for JoinKind {
    type Err = QbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_uppercase().as_str() {
            "JOIN" => Ok(JoinKind::Join),
            "INNER" => Ok(JoinKind::Inner),
            "LEFT" => Ok(JoinKind::Left),
            "LEFT OUTER" => Ok(JoinKind::LeftOuter),
            "RIGHT" => Ok(JoinKind::Right),
            "RIGHT OUTER" => Ok(JoinKind::RightOuter),
            "FULL" => Ok(JoinKind::Full),
            "FULL OUTER" => Ok(JoinKind::FullOuter),
            "CROSS" => Ok(JoinKind::Cross),
            _ => Err(QbError::value(format!("unknown join type '{s}'"))),
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tokens() {
        assert_eq!("LEFT".parse::<JoinKind>().unwrap(), JoinKind::Left);
        assert_eq!("left  outer".parse::<JoinKind>().unwrap(), JoinKind::LeftOuter);
        assert_eq!("JOIN".parse::<JoinKind>().unwrap().as_sql(), "JOIN");
        assert_eq!("FULL OUTER".parse::<JoinKind>().unwrap().as_sql(), "FULL OUTER JOIN");
    }

    #[test]
    fn unknown_token_is_value_fault() {
        let err = "SIDEWAYS".parse::<JoinKind>().unwrap_err();
        assert!(err.is_value());
    }
}
