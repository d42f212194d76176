//! Derived work experience.
//!
//! Work years = span from the earliest start to the latest end across all work
//! entries, in whole months divided by 12. Overlapping and gapped positions are
//! therefore not summed: the span covers the whole career window. An ongoing or
//! blank end counts as the reference date.

use chrono::{Datelike, NaiveDate};

use crate::models::{ResumeRecord, WorkEntry};

/// Month index (`year * 12 + month0`) for a `YYYY-MM` or `YYYY-MM-DD` period.
pub fn parse_period(period: &str) -> Option<i32> {
    let period = period.trim();
    let date_part = period.get(..10).unwrap_or(period);
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d"))
        .ok()?;
    Some(month_index(date))
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// Years of experience across `entries`, or `None` when no entry has a readable start.
pub fn work_years(entries: &[WorkEntry], as_of: NaiveDate) -> Option<f64> {
    let today = month_index(as_of);
    let mut earliest: Option<i32> = None;
    let mut latest: Option<i32> = None;

    for entry in entries {
        let Some(start) = parse_period(&entry.start_time) else {
            continue;
        };
        let end = if entry.is_ongoing() || entry.end_time.trim().is_empty() {
            today
        } else {
            match parse_period(&entry.end_time) {
                Some(end) => end,
                None => continue,
            }
        };
        earliest = Some(earliest.map_or(start, |e| e.min(start)));
        latest = Some(latest.map_or(end, |l| l.max(end)));
    }

    let months = (latest? - earliest?).max(0);
    Some(months as f64 / 12.0)
}

/// Work years for a record. Unstructured work history yields `None`.
pub fn record_work_years(record: &ResumeRecord, as_of: NaiveDate) -> Option<f64> {
    let entries = record.work_entries().into_entries()?;
    work_years(&entries, as_of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::codec::encode;

    fn entry(start: &str, end: &str) -> WorkEntry {
        WorkEntry {
            start_time: start.to_string(),
            end_time: end.to_string(),
            ..Default::default()
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    #[test]
    fn test_single_closed_entry() {
        let years = work_years(&[entry("2019-07", "2022-07")], as_of()).unwrap();
        assert!((years - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_span_is_earliest_start_to_latest_end_not_sum() {
        // Two overlapping jobs: 2018-01..2020-01 and 2019-01..2021-01.
        // Summing would give 4 years; the span is 3.
        let entries = [entry("2018-01", "2020-01"), entry("2019-01", "2021-01")];
        let years = work_years(&entries, as_of()).unwrap();
        assert!((years - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gap_between_jobs_is_included_in_span() {
        let entries = [entry("2015-01", "2016-01"), entry("2020-01", "2021-01")];
        let years = work_years(&entries, as_of()).unwrap();
        assert!((years - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ongoing_entry_runs_to_reference_date() {
        let years = work_years(&[entry("2021-07", "至今")], as_of()).unwrap();
        assert!((years - 3.0).abs() < f64::EPSILON);
        let years = work_years(&[entry("2021-07", "")], as_of()).unwrap();
        assert!((years - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unreadable_entries_are_skipped() {
        assert_eq!(work_years(&[entry("", "2020-01")], as_of()), None);
        assert_eq!(work_years(&[entry("去年", "2020-01")], as_of()), None);
        assert_eq!(work_years(&[], as_of()), None);
    }

    #[test]
    fn test_end_before_start_clamps_to_zero() {
        assert_eq!(work_years(&[entry("2022-01", "2020-01")], as_of()), Some(0.0));
    }

    #[test]
    fn test_record_with_plain_text_history_has_no_work_years() {
        let mut record = ResumeRecord {
            work_history: "在某公司工作三年".to_string(),
            ..Default::default()
        };
        assert_eq!(record_work_years(&record, as_of()), None);
        record.work_history = encode(&[entry("2020-07", "2022-07")]);
        assert_eq!(record_work_years(&record, as_of()), Some(2.0));
    }
}
