use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;

/// Returns the attendance column for `date`, e.g. `2025_03_07`.
pub fn date_column_name(date: NaiveDate) -> String {
    date.format("%Y_%m_%d").to_string()
}

/// The days of the week on which no attendance is taken, so no date column is opened.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RestDays(Vec<Weekday>);

impl RestDays {
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Self {
        Self(days.into_iter().collect())
    }

    /// No rest days at all; every day opens a column.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(&date.weekday())
    }
}

impl Default for RestDays {
    /// Saturday and Sunday.
    fn default() -> Self {
        Self(vec![Weekday::Sat, Weekday::Sun])
    }
}
