//! Nested-history codec: education / work lists stored as one JSON-array text field.
//!
//! Stored text may carry every `"` doubled (`""`), left behind by an earlier
//! spreadsheet round trip. Decoding collapses those before parsing, and never
//! fails: unreadable text comes back as [`DecodedHistory::Unstructured`] and the
//! caller shows the raw field instead.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::models::HistoryEntry;

/// Result of decoding a history field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedHistory<T> {
    Structured(Vec<T>),
    /// Blank, legacy plain text, or malformed JSON.
    Unstructured,
}

impl<T> DecodedHistory<T> {
    pub fn into_entries(self) -> Option<Vec<T>> {
        match self {
            DecodedHistory::Structured(entries) => Some(entries),
            DecodedHistory::Unstructured => None,
        }
    }
}

/// Encodes entries as a JSON array. An empty list encodes to `[]`.
pub fn encode<T: Serialize>(entries: &[T]) -> String {
    serde_json::to_string(entries).unwrap_or_else(|e| {
        debug!("history encode failed: {e}");
        "[]".to_string()
    })
}

/// Decodes a stored history field.
///
/// Text that already parses is taken as-is, so legitimately empty values
/// (`"major":""`) survive. Anything else has its doubled quotes collapsed and is
/// parsed again.
pub fn decode<T: DeserializeOwned>(text: &str) -> DecodedHistory<T> {
    let text = text.trim();
    if text.is_empty() {
        return DecodedHistory::Unstructured;
    }
    if let Ok(entries) = serde_json::from_str::<Vec<T>>(text) {
        return DecodedHistory::Structured(entries);
    }
    match serde_json::from_str::<Vec<T>>(&collapse_doubled_quotes(text)) {
        Ok(entries) => DecodedHistory::Structured(entries),
        Err(e) => {
            debug!("history field is not structured ({e}); falling back to raw text");
            DecodedHistory::Unstructured
        }
    }
}

/// Replaces every non-overlapping `""` with `"`, scanning left to right.
pub fn collapse_doubled_quotes(text: &str) -> String {
    text.replace("\"\"", "\"")
}

/// Renders one entry as labelled lines. Empty attributes are skipped; the period
/// line appears only when both bounds are present.
pub fn format_entry<T: HistoryEntry>(entry: &T) -> String {
    let mut lines = Vec::new();
    let (start, end) = entry.period();
    let (start, end) = (start.trim(), end.trim());
    if !start.is_empty() && !end.is_empty() {
        lines.push(format!("起止时间：{start} – {end}"));
    }
    for (label, value) in entry.labelled_fields() {
        let value = value.trim();
        if !value.is_empty() {
            lines.push(format!("{label}：{value}"));
        }
    }
    lines.join("\n")
}

/// Display text for a stored history field: one paragraph per entry, separated
/// by a blank line. Falls back to the raw text, then to the placeholder.
pub fn format_history<T>(raw: &str) -> String
where
    T: HistoryEntry + DeserializeOwned,
{
    let decoded = decode::<T>(raw);
    match decoded {
        DecodedHistory::Structured(entries) => {
            let paragraphs: Vec<String> = entries
                .iter()
                .map(format_entry)
                .filter(|p| !p.is_empty())
                .collect();
            if paragraphs.is_empty() {
                T::EMPTY_PLACEHOLDER.to_string()
            } else {
                paragraphs.join("\n\n")
            }
        }
        DecodedHistory::Unstructured => {
            if raw.trim().is_empty() {
                T::EMPTY_PLACEHOLDER.to_string()
            } else {
                raw.to_string()
            }
        }
    }
}
