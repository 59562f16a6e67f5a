//! Date parsing and range filters for movement queries.
//!
//! Report dates arrive as `dd/MM/yyyy` strings; statement ranges arrive as
//! ISO dates. All date filters operate on the date component of the stored
//! timestamp only, inclusive on both ends.

use chrono::{DateTime, NaiveDate, Utc};

use super::error::LedgerError;

/// The report date pattern accepted over the wire.
pub const REPORT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parses a `dd/MM/yyyy` report date.
///
/// # Errors
///
/// Returns `LedgerError::InvalidDateFormat` for empty or malformed input,
/// before any store access.
pub fn parse_report_date(input: &str) -> Result<NaiveDate, LedgerError> {
    if input.trim().is_empty() {
        return Err(LedgerError::InvalidDateFormat(input.to_string()));
    }
    NaiveDate::parse_from_str(input, REPORT_DATE_FORMAT)
        .map_err(|_| LedgerError::InvalidDateFormat(input.to_string()))
}

/// Formats a date as `dd/MM/yyyy` for statement rows.
#[must_use]
pub fn format_report_date(date: NaiveDate) -> String {
    date.format(REPORT_DATE_FORMAT).to_string()
}

/// Returns true if the timestamp's date component falls inside the inclusive
/// `[start, end]` range. Time of day is ignored at the boundaries.
#[must_use]
pub fn date_in_range(at: DateTime<Utc>, start: NaiveDate, end: NaiveDate) -> bool {
    let date = at.date_naive();
    date >= start && date <= end
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[test]
    fn test_parse_report_date() {
        assert_eq!(
            parse_report_date("15/03/2026").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("2026-03-15")]
    #[case("15-03-2026")]
    #[case("32/01/2026")]
    #[case("15/13/2026")]
    #[case("not a date")]
    fn test_malformed_report_dates_rejected(#[case] input: &str) {
        assert!(matches!(
            parse_report_date(input),
            Err(LedgerError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn test_format_round_trips() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        assert_eq!(format_report_date(date), "02/01/2026");
        assert_eq!(parse_report_date(&format_report_date(date)).unwrap(), date);
    }

    #[test]
    fn test_range_is_inclusive_at_both_ends() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();

        // Late on the start day and early on the end day both count.
        let start_evening = Utc.with_ymd_and_hms(2026, 3, 10, 23, 59, 59).unwrap();
        let end_morning = Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 1).unwrap();
        assert!(date_in_range(start_evening, start, end));
        assert!(date_in_range(end_morning, start, end));

        let before = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 3, 21, 0, 0, 0).unwrap();
        assert!(!date_in_range(before, start, end));
        assert!(!date_in_range(after, start, end));
    }
}
