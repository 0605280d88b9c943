use chrono::{Local, NaiveDate};

use crate::error::{Error, Result};

/// How far into the future the forecast provider returns samples.
pub const FORECAST_HORIZON_DAYS: i64 = 5;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// True iff `s` is a calendar date in `YYYY-MM-DD` form. No timezone
/// adjustment is applied.
pub fn validate_date(s: &str) -> bool {
    parse_date(s).is_ok()
}

/// Parse a `YYYY-MM-DD` date, rejecting anything else.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| Error::InvalidInput("Invalid date format. Use YYYY-MM-DD".to_string()))
}

/// An inclusive, validated [start, end] date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Validate a range against today's date and the provider horizon.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Self::new_at(start, end, Local::now().date_naive())
    }

    /// Checks apply in order; the first failure wins:
    /// start <= end, then start >= today, then end <= today + horizon.
    pub(crate) fn new_at(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidInput(
                "Start date must be before or equal to end date".to_string(),
            ));
        }
        if start < today {
            return Err(Error::InvalidInput(
                "Start date cannot be in the past".to_string(),
            ));
        }
        let max_future = today + chrono::Duration::days(FORECAST_HORIZON_DAYS);
        if end > max_future {
            return Err(Error::InvalidInput(format!(
                "End date cannot be more than {FORECAST_HORIZON_DAYS} days in the future"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Dates covered by the range, chronological, inclusive on both ends.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn accepts_iso_dates_only() {
        assert!(validate_date("2024-01-02"));
        assert!(!validate_date("2024-13-02"));
        assert!(!validate_date("02/01/2024"));
        assert!(!validate_date("tomorrow"));
        assert!(!validate_date(""));
    }

    #[test]
    fn parse_date_error_names_expected_format() {
        let err = parse_date("2024/01/02").unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn full_horizon_range_is_valid() {
        let today = d("2024-06-10");
        let range = DateRange::new_at(today, d("2024-06-15"), today).unwrap();
        assert_eq!(range.days().count(), 6);
    }

    #[test]
    fn single_day_range_is_valid() {
        let today = d("2024-06-10");
        let range = DateRange::new_at(d("2024-06-12"), d("2024-06-12"), today).unwrap();
        assert_eq!(range.days().collect::<Vec<_>>(), vec![d("2024-06-12")]);
    }

    #[test]
    fn start_after_end_is_rejected() {
        let today = d("2024-06-10");
        let err = DateRange::new_at(d("2024-06-13"), d("2024-06-12"), today).unwrap_err();
        assert!(err.to_string().contains("before or equal to end"));
    }

    #[test]
    fn start_before_end_check_wins_over_other_violations() {
        // start > end and start in the past and end beyond the horizon:
        // the ordering check must still be the one reported.
        let today = d("2024-06-10");
        let err = DateRange::new_at(d("2024-06-30"), d("2024-06-01"), today).unwrap_err();
        assert!(err.to_string().contains("before or equal to end"));
    }

    #[test]
    fn past_start_is_rejected() {
        let today = d("2024-06-10");
        let err = DateRange::new_at(d("2024-06-09"), d("2024-06-11"), today).unwrap_err();
        assert!(err.to_string().contains("cannot be in the past"));
    }

    #[test]
    fn end_beyond_horizon_is_rejected() {
        let today = d("2024-06-10");
        let err = DateRange::new_at(d("2024-06-11"), d("2024-06-16"), today).unwrap_err();
        assert!(err.to_string().contains("more than 5 days in the future"));
    }

    #[test]
    fn end_exactly_at_horizon_is_valid() {
        let today = d("2024-06-10");
        assert!(DateRange::new_at(d("2024-06-10"), d("2024-06-15"), today).is_ok());
    }
}
