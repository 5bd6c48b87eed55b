use chrono::{Datelike, Duration, NaiveDate};

/// Aggregation window selector for the dashboard.
///
/// Anything other than an explicit `week` falls back to `Today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    #[default]
    Today,
    Week,
}

impl Window {
    /// Parse the `range` query parameter; unknown or missing values
    /// default to `Today`.
    pub fn from_query(range: Option<&str>) -> Self {
        match range {
            Some("week") => Window::Week,
            _ => Window::Today,
        }
    }

    /// Inclusive date bounds of the window containing `today`.
    ///
    /// `Week` is the ISO week, Monday through Sunday.
    pub fn date_range(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Window::Today => (today, today),
            Window::Week => {
                let monday =
                    today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
                (monday, monday + Duration::days(6))
            }
        }
    }
}
