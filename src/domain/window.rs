//! Sync date window

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Inclusive date range a sync cycle covers
///
/// Rendered as `ge`/`le` prefixed ISO dates on the appointment search
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Window covering the calendar week (Monday through Sunday) that
    /// contains the given instant
    pub fn week_of(instant: DateTime<Utc>) -> Self {
        let week = instant.date_naive().week(Weekday::Mon);
        Self {
            start: week.first_day(),
            end: week.last_day(),
        }
    }

    /// Window covering the calendar week that contains the given date
    pub fn week_containing(date: NaiveDate) -> Self {
        let week = date.week(Weekday::Mon);
        Self {
            start: week.first_day(),
            end: week.last_day(),
        }
    }

    /// Window covering the current calendar week
    pub fn current_week() -> Self {
        Self::week_of(Utc::now())
    }

    /// Lower bound as a `ge`-prefixed ISO date
    pub fn ge_param(&self) -> String {
        format!("ge{}", self.start.format("%Y-%m-%d"))
    }

    /// Upper bound as a `le`-prefixed ISO date
    pub fn le_param(&self) -> String {
        format!("le{}", self.end.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_week_of_midweek_instant() {
        // 2024-01-10 is a Wednesday
        let instant = Utc.with_ymd_and_hms(2024, 1, 10, 15, 30, 0).unwrap();
        let window = DateWindow::week_of(instant);
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
    }

    #[test]
    fn test_week_boundaries() {
        // Monday maps to itself as the start
        let monday = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        let window = DateWindow::week_of(monday);
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());

        // Sunday still belongs to the same week
        let sunday = Utc.with_ymd_and_hms(2024, 1, 14, 23, 59, 59).unwrap();
        assert_eq!(DateWindow::week_of(sunday), window);
    }

    #[test]
    fn test_week_containing_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(); // Thursday
        let window = DateWindow::week_containing(date);
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2024, 3, 17).unwrap());
    }

    #[test]
    fn test_query_params() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let window = DateWindow::week_of(instant);
        assert_eq!(window.ge_param(), "ge2024-01-08");
        assert_eq!(window.le_param(), "le2024-01-14");
    }
}
