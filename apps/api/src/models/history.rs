use serde::{Deserialize, Serialize};

use crate::models::scalar::scalar_string;

/// Sentinels an end period may carry for a position that is still held.
pub const ONGOING_MARKERS: &[&str] = &["至今", "present", "现在", "今"];

/// One school attended. Periods are `YYYY-MM` or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "scalar_string")]
    pub start_time: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub end_time: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub school: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub degree: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub major: String,
}

/// One position held. `end_time` may be `YYYY-MM` or an ongoing marker such as `至今`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkEntry {
    #[serde(default, deserialize_with = "scalar_string")]
    pub start_time: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub end_time: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub company: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub position: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub responsibilities: String,
}

/// Shared shape of the two history kinds, used by the codec's display formatter.
pub trait HistoryEntry {
    /// Shown when neither structured entries nor raw text are available.
    const EMPTY_PLACEHOLDER: &'static str;

    fn period(&self) -> (&str, &str);

    /// Labelled attributes in display order, after the period line.
    fn labelled_fields(&self) -> [(&'static str, &str); 3];
}

impl HistoryEntry for EducationEntry {
    const EMPTY_PLACEHOLDER: &'static str = "暂无教育经历信息";

    fn period(&self) -> (&str, &str) {
        (self.start_time.as_str(), self.end_time.as_str())
    }

    fn labelled_fields(&self) -> [(&'static str, &str); 3] {
        [
            ("学校", self.school.as_str()),
            ("学历", self.degree.as_str()),
            ("专业", self.major.as_str()),
        ]
    }
}

impl HistoryEntry for WorkEntry {
    const EMPTY_PLACEHOLDER: &'static str = "暂无工作经历信息";

    fn period(&self) -> (&str, &str) {
        (self.start_time.as_str(), self.end_time.as_str())
    }

    fn labelled_fields(&self) -> [(&'static str, &str); 3] {
        [
            ("公司", self.company.as_str()),
            ("职位", self.position.as_str()),
            ("主要职责", self.responsibilities.as_str()),
        ]
    }
}

impl WorkEntry {
    pub fn is_ongoing(&self) -> bool {
        let end = self.end_time.trim();
        ONGOING_MARKERS
            .iter()
            .any(|marker| end.eq_ignore_ascii_case(marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_default_to_empty() {
        let entry: EducationEntry = serde_json::from_str(r#"{"school": "浙江大学"}"#).unwrap();
        assert_eq!(entry.school, "浙江大学");
        assert_eq!(entry.start_time, "");
        assert_eq!(entry.major, "");
    }

    #[test]
    fn test_null_values_become_empty() {
        let entry: WorkEntry =
            serde_json::from_str(r#"{"company": null, "position": "工程师"}"#).unwrap();
        assert_eq!(entry.company, "");
        assert_eq!(entry.position, "工程师");
    }

    #[test]
    fn test_ongoing_markers() {
        let mut entry = WorkEntry {
            end_time: "至今".to_string(),
            ..Default::default()
        };
        assert!(entry.is_ongoing());
        entry.end_time = "Present".to_string();
        assert!(entry.is_ongoing());
        entry.end_time = "2021-06".to_string();
        assert!(!entry.is_ongoing());
    }
}
