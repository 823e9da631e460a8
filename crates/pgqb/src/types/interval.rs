/// PostgreSQL `interval` literal.
///
/// Parts render in a fixed order (seconds up to years); with no part set the
/// literal is `interval '1 seconds'`.
///
/// ```ignore
/// let i = Interval::new().days(3).hours(2);
/// assert_eq!(i.to_sql(), "interval '2 hours 3 days'");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interval {
    pub seconds: Option<i64>,
    pub minutes: Option<i64>,
    pub hours: Option<i64>,
    pub days: Option<i64>,
    pub weeks: Option<i64>,
    pub months: Option<i64>,
    pub years: Option<i64>,
}

impl Interval {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seconds(mut self, n: i64) -> Self {
        self.seconds = Some(n);
        self
    }

    pub fn minutes(mut self, n: i64) -> Self {
        self.minutes = Some(n);
        self
    }

    pub fn hours(mut self, n: i64) -> Self {
        self.hours = Some(n);
        self
    }

    pub fn days(mut self, n: i64) -> Self {
        self.days = Some(n);
        self
    }

    pub fn weeks(mut self, n: i64) -> Self {
        self.weeks = Some(n);
        self
    }

    pub fn months(mut self, n: i64) -> Self {
        self.months = Some(n);
        self
    }

    pub fn years(mut self, n: i64) -> Self {
        self.years = Some(n);
        self
    }

    /// Render as `interval '<parts>'`.
    pub fn to_sql(&self) -> String {
        let parts = [
            (self.seconds, "seconds"),
            (self.minutes, "minutes"),
            (self.hours, "hours"),
            (self.days, "days"),
            (self.weeks, "weeks"),
            (self.months, "months"),
            (self.years, "years"),
        ];

        let storage: Vec<String> = parts
            .iter()
            .filter_map(|(n, unit)| n.map(|n| format!("{n} {unit}")))
            .collect();

        if storage.is_empty() {
            return "interval '1 seconds'".to_string();
        }
        format!("interval '{}'", storage.join(" "))
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_sql())
    }
}
