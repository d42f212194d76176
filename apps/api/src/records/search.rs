//! Filter/Search Engine: free-text query plus structured predicates over a
//! record collection snapshot.
//!
//! Pure: the same (collection, request, reference date) always yields the same
//! subset, in input order.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::scalar::{optional_number, optional_text};
use crate::models::{Gender, RecordKey, ResumeRecord};
use crate::records::experience::record_work_years;

/// Active filter/query state. Doubles as the export payload, so unset
/// constraints are omitted when serialised.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub query: String,
    #[serde(
        default,
        deserialize_with = "optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_age: Option<u32>,
    #[serde(
        default,
        deserialize_with = "optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_age: Option<u32>,
    #[serde(
        default,
        deserialize_with = "optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_work_years: Option<u32>,
    #[serde(
        default,
        deserialize_with = "optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_work_years: Option<u32>,
    #[serde(
        default,
        deserialize_with = "optional_gender",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<Gender>,
    #[serde(
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub political_status: Option<String>,
}

fn optional_gender<'de, D>(deserializer: D) -> Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    match optional_text(deserializer)? {
        None => Ok(None),
        Some(raw) => Gender::parse(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown gender '{raw}'"))),
    }
}

impl FilterRequest {
    pub fn has_structured_filters(&self) -> bool {
        self.min_age.is_some()
            || self.max_age.is_some()
            || self.min_work_years.is_some()
            || self.max_work_years.is_some()
            || self.gender.is_some()
            || self.political_status.is_some()
    }
}

/// Payload handed to the spreadsheet export: the filter state plus the legacy
/// keys of every matched record.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRequest {
    pub filters: FilterRequest,
    pub keys: Vec<RecordKey>,
}

// ────────────────────────────────────────────────────────────────────────────
// Matching
// ────────────────────────────────────────────────────────────────────────────

/// A request prepared for repeated matching.
#[derive(Debug, Clone)]
pub struct RecordFilter<'a> {
    request: &'a FilterRequest,
    needle: Option<String>,
    as_of: NaiveDate,
}

impl<'a> RecordFilter<'a> {
    /// `as_of` is the reference date for ongoing positions.
    pub fn new(request: &'a FilterRequest, as_of: NaiveDate) -> Self {
        let needle = request.query.trim();
        let needle = (!needle.is_empty()).then(|| needle.to_lowercase());
        Self {
            request,
            needle,
            as_of,
        }
    }

    pub fn matches(&self, record: &ResumeRecord) -> bool {
        self.matches_query(record)
            && self.matches_age(record)
            && self.matches_work_years(record)
            && self.matches_gender(record)
            && self.matches_political_status(record)
    }

    /// Matching records in input order.
    pub fn apply<'r, R: AsRef<ResumeRecord>>(&self, records: &'r [R]) -> Vec<&'r R> {
        records
            .iter()
            .filter(|r| self.matches((*r).as_ref()))
            .collect()
    }

    fn matches_query(&self, record: &ResumeRecord) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        record
            .string_fields()
            .iter()
            .any(|(_, value)| !value.is_empty() && value.to_lowercase().contains(needle.as_str()))
    }

    fn matches_age(&self, record: &ResumeRecord) -> bool {
        let (min, max) = (self.request.min_age, self.request.max_age);
        if min.is_none() && max.is_none() {
            return true;
        }
        match record.age() {
            Some(age) => within(age as f64, min, max),
            None => false,
        }
    }

    fn matches_work_years(&self, record: &ResumeRecord) -> bool {
        let (min, max) = (self.request.min_work_years, self.request.max_work_years);
        if min.is_none() && max.is_none() {
            return true;
        }
        match record_work_years(record, self.as_of) {
            Some(years) => within(years, min, max),
            None => false,
        }
    }

    fn matches_gender(&self, record: &ResumeRecord) -> bool {
        match self.request.gender {
            Some(gender) => record.gender() == Some(gender),
            None => true,
        }
    }

    fn matches_political_status(&self, record: &ResumeRecord) -> bool {
        match &self.request.political_status {
            Some(status) => record.political_status.trim() == status.trim(),
            None => true,
        }
    }
}

fn within(value: f64, min: Option<u32>, max: Option<u32>) -> bool {
    min.map_or(true, |min| value >= min as f64) && max.map_or(true, |max| value <= max as f64)
}

/// Filters `records` by `request`, preserving input order.
pub fn filter_records<'r, R: AsRef<ResumeRecord>>(
    records: &'r [R],
    request: &FilterRequest,
    as_of: NaiveDate,
) -> Vec<&'r R> {
    RecordFilter::new(request, as_of).apply(records)
}

/// Builds the export payload for the current filter state.
pub fn export_request<R: AsRef<ResumeRecord>>(
    records: &[R],
    request: &FilterRequest,
    as_of: NaiveDate,
) -> ExportRequest {
    let keys = filter_records(records, request, as_of)
        .into_iter()
        .map(|r| r.as_ref().key())
        .collect();
    ExportRequest {
        filters: request.clone(),
        keys,
    }
}
