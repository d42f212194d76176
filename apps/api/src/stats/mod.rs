//! Statistics Aggregator: dashboard summaries derived from a record snapshot.
//!
//! Pure read: blank or malformed values are left out of the affected metric,
//! never counted as a category of their own.

pub mod buckets;
pub mod handlers;
pub mod tally;

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{Degree, Gender, ResumeRecord};
use crate::records::experience::record_work_years;
use buckets::{
    age_bucket, average_age_from_buckets, format_average, round_one_decimal, work_years_bucket,
    AGE_BUCKETS, WORK_YEARS_BUCKETS,
};
use tally::Tally;

pub const SYSTEM_STATUS_OK: &str = "运行正常";

/// Dashboard payload, keyed by metric name.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsReport {
    pub total_resumes: usize,
    pub gender_distribution: Tally,
    pub age_distribution: Tally,
    pub education_distribution: Tally,
    pub political_distribution: Tally,
    pub work_years_distribution: Tally,
    pub time_distribution: Tally,
    pub top_schools: Tally,
    pub top_majors: Tally,
    pub top_job_intentions: Tally,
    /// Reconstructed from `age_distribution`; `null` when no ages are known.
    pub average_age: Option<f64>,
    /// `average_age` for display, `—` when undefined.
    pub average_age_label: String,
    pub system_status: &'static str,
}

/// Counts non-blank values of one attribute, in first-seen order.
pub fn categorical_distribution<R, F>(records: &[R], field: F) -> Tally
where
    R: AsRef<ResumeRecord>,
    F: Fn(&ResumeRecord) -> &str,
{
    let mut tally = Tally::new();
    for record in records {
        let value = field(record.as_ref()).trim();
        if !value.is_empty() {
            tally.increment(value);
        }
    }
    tally
}

/// Education levels with known degrees first, lowest to highest; unrecognised
/// values follow in first-seen order.
pub fn education_distribution<R: AsRef<ResumeRecord>>(records: &[R]) -> Tally {
    categorical_distribution(records, |r| r.highest_degree.as_str()).sorted_by_key(|label| {
        match Degree::parse(label) {
            Some(degree) => (0, Some(degree)),
            None => (1, None),
        }
    })
}

/// Genders counted by canonical label, so `male` and `男` share a category.
/// Unrecognised values are left out.
pub fn gender_distribution<R: AsRef<ResumeRecord>>(records: &[R]) -> Tally {
    categorical_distribution(records, |r| r.gender().map_or("", Gender::as_str))
}

pub fn age_distribution<R: AsRef<ResumeRecord>>(records: &[R]) -> Tally {
    let mut tally = Tally::with_keys(AGE_BUCKETS.iter().map(|b| b.label));
    for record in records {
        if let Some(bucket) = record.as_ref().age().and_then(age_bucket) {
            tally.increment(bucket.label);
        }
    }
    tally
}

pub fn work_years_distribution<R: AsRef<ResumeRecord>>(records: &[R], as_of: NaiveDate) -> Tally {
    let mut tally = Tally::with_keys(WORK_YEARS_BUCKETS.iter().map(|b| b.label));
    for record in records {
        if let Some(bucket) = record_work_years(record.as_ref(), as_of).and_then(work_years_bucket)
        {
            tally.increment(bucket.label);
        }
    }
    tally
}

/// Records per `YYYY-MM` of their entry timestamp, oldest month first.
pub fn time_distribution<R: AsRef<ResumeRecord>>(records: &[R]) -> Tally {
    let mut months: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for record in records {
        if let Some(at) = record.as_ref().entry_time() {
            *months.entry((at.year(), at.month())).or_default() += 1;
        }
    }
    months
        .into_iter()
        .map(|((year, month), count)| (format!("{year:04}-{month:02}"), count))
        .collect()
}

/// The `n` most frequent non-blank values of one attribute.
pub fn top_values<R, F>(records: &[R], field: F, n: usize) -> Tally
where
    R: AsRef<ResumeRecord>,
    F: Fn(&ResumeRecord) -> &str,
{
    categorical_distribution(records, field).top_n(n)
}

/// Builds the full dashboard payload. `as_of` is the reference date for
/// ongoing positions; `top_n` bounds each ranking.
pub fn compute_statistics<R: AsRef<ResumeRecord>>(
    records: &[R],
    as_of: NaiveDate,
    top_n: usize,
) -> StatisticsReport {
    let age_distribution = age_distribution(records);
    let average_age = average_age_from_buckets(&age_distribution).map(round_one_decimal);

    StatisticsReport {
        total_resumes: records.len(),
        gender_distribution: gender_distribution(records),
        education_distribution: education_distribution(records),
        political_distribution: categorical_distribution(records, |r| r.political_status.as_str()),
        work_years_distribution: work_years_distribution(records, as_of),
        time_distribution: time_distribution(records),
        top_schools: top_values(records, |r| r.school.as_str(), top_n),
        top_majors: top_values(records, |r| r.major.as_str(), top_n),
        top_job_intentions: top_values(records, |r| r.desired_position.as_str(), top_n),
        average_age_label: format_average(average_age),
        average_age,
        age_distribution,
        system_status: SYSTEM_STATUS_OK,
    }
}
