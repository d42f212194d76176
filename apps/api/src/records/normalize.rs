//! Record Normalizer: turns a form submission into the flat storage shape.
//!
//! Pure and total: every input produces a record. Required-field rules belong to
//! the form, not here.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::models::scalar::scalar_to_string;
use crate::models::{EducationEntry, ResumeRecord, WorkEntry};
use crate::records::codec::encode;

// ────────────────────────────────────────────────────────────────────────────
// Form payload
// ────────────────────────────────────────────────────────────────────────────

/// A `[start, end]` pair from a range picker. Either side may be missing.
pub type DateRange = [Option<String>; 2];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EducationForm {
    #[serde(default, deserialize_with = "lenient_range")]
    pub time_range: DateRange,
    #[serde(default)]
    pub school: Option<Value>,
    #[serde(default)]
    pub degree: Option<Value>,
    #[serde(default)]
    pub major: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkForm {
    #[serde(default, deserialize_with = "lenient_range")]
    pub time_range: DateRange,
    /// Free-text end period ("至今" and the like).
    #[serde(default)]
    pub end_time: Option<Value>,
    #[serde(default)]
    pub company: Option<Value>,
    #[serde(default)]
    pub position: Option<Value>,
    #[serde(default)]
    pub responsibilities: Option<Value>,
}

/// A field that may be typed as one value or picked as a list of tags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MultiText {
    Many(Vec<Value>),
    One(Value),
}

impl MultiText {
    pub fn joined(&self) -> String {
        match self {
            MultiText::One(value) => scalar_to_string(value),
            MultiText::Many(items) => items
                .iter()
                .map(scalar_to_string)
                .filter(|item| !item.trim().is_empty())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// Reads up to two string bounds from whatever the picker sent. Missing,
/// non-string or out-of-range positions are unset.
fn lenient_range<'de, D>(deserializer: D) -> Result<DateRange, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let bound = |i: usize| match value.as_ref().and_then(Value::as_array)?.get(i)? {
        Value::String(s) => Some(s.clone()),
        _ => None,
    };
    Ok([bound(0), bound(1)])
}

/// Entry lists: `null` or a non-list is empty, and items that are not objects
/// are dropped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(Value::Array(items)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("dropping unreadable history item: {e}");
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeForm {
    #[serde(rename = "姓名", default)]
    pub name: Option<Value>,
    #[serde(rename = "性别", default)]
    pub gender: Option<Value>,
    #[serde(rename = "年龄", default)]
    pub age: Option<Value>,
    #[serde(rename = "政治面貌", default)]
    pub political_status: Option<Value>,
    #[serde(rename = "体重", default)]
    pub weight_kg: Option<Value>,
    #[serde(rename = "籍贯", default)]
    pub hometown: Option<Value>,
    #[serde(rename = "健康状况", default)]
    pub health_status: Option<Value>,
    #[serde(rename = "身高", default)]
    pub height_cm: Option<Value>,
    #[serde(rename = "学历", default)]
    pub highest_degree: Option<Value>,
    #[serde(rename = "毕业院校", default)]
    pub school: Option<Value>,
    #[serde(rename = "专业", default)]
    pub major: Option<Value>,
    #[serde(rename = "求职意向", default)]
    pub desired_position: Option<Value>,
    #[serde(rename = "手机", default)]
    pub phone: Option<Value>,
    #[serde(rename = "邮箱", default)]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub education: Vec<EducationForm>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub work: Vec<WorkForm>,
    #[serde(rename = "荣誉奖项", default)]
    pub honors: Option<MultiText>,
    #[serde(rename = "技能证书", default)]
    pub certificates: Option<MultiText>,
    #[serde(rename = "兴趣爱好", default)]
    pub hobbies: Option<MultiText>,
    #[serde(rename = "自我评价", default)]
    pub self_assessment: Option<Value>,
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

/// Builds the storage record. The entry timestamp is left blank for the store to assign.
pub fn normalize(form: &ResumeForm) -> ResumeRecord {
    let education: Vec<EducationEntry> = form.education.iter().map(normalize_education).collect();
    let work: Vec<WorkEntry> = form.work.iter().map(normalize_work).collect();

    ResumeRecord {
        name: scalar(&form.name),
        gender: scalar(&form.gender),
        age: scalar(&form.age),
        political_status: scalar(&form.political_status),
        weight_kg: scalar(&form.weight_kg),
        hometown: scalar(&form.hometown),
        health_status: scalar(&form.health_status),
        height_cm: scalar(&form.height_cm),
        highest_degree: scalar(&form.highest_degree),
        school: scalar(&form.school),
        major: scalar(&form.major),
        desired_position: scalar(&form.desired_position),
        phone: scalar(&form.phone),
        email: scalar(&form.email),
        education_history: encode(&education),
        honors: multi(&form.honors),
        certificates: multi(&form.certificates),
        work_history: encode(&work),
        hobbies: multi(&form.hobbies),
        self_assessment: scalar(&form.self_assessment),
        entry_time: String::new(),
    }
}

fn normalize_education(form: &EducationForm) -> EducationEntry {
    let (start_time, end_time) = format_range(&form.time_range);
    EducationEntry {
        start_time,
        end_time,
        school: scalar(&form.school),
        degree: scalar(&form.degree),
        major: scalar(&form.major),
    }
}

fn normalize_work(form: &WorkForm) -> WorkEntry {
    let (start_time, picked_end) = format_range(&form.time_range);
    let free_text = scalar(&form.end_time);
    let end_time = match free_text.trim() {
        "" => picked_end,
        text => text.to_string(),
    };
    WorkEntry {
        start_time,
        end_time,
        company: scalar(&form.company),
        position: scalar(&form.position),
        responsibilities: scalar(&form.responsibilities),
    }
}

fn format_range([start, end]: &DateRange) -> (String, String) {
    (format_month(start.as_deref()), format_month(end.as_deref()))
}

/// Formats a picker value as `YYYY-MM`. Accepts `YYYY-MM`, `YYYY-MM-DD` and ISO
/// timestamps; anything unreadable formats as empty.
pub fn format_month(value: Option<&str>) -> String {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return String::new();
    };
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d"))
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

fn scalar(value: &Option<Value>) -> String {
    value.as_ref().map(scalar_to_string).unwrap_or_default()
}

fn multi(value: &Option<MultiText>) -> String {
    value.as_ref().map(MultiText::joined).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::codec::{decode, DecodedHistory};
    use serde_json::json;

    fn form(value: serde_json::Value) -> ResumeForm {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_scalars_are_stringified() {
        let record = normalize(&form(json!({
            "姓名": "张三",
            "年龄": 28,
            "身高": 175.5,
            "体重": null
        })));
        assert_eq!(record.name, "张三");
        assert_eq!(record.age, "28");
        assert_eq!(record.height_cm, "175.5");
        assert_eq!(record.weight_kg, "");
        assert_eq!(record.email, "");
        assert_eq!(record.entry_time, "");
    }

    #[test]
    fn test_empty_form_produces_empty_histories() {
        let record = normalize(&ResumeForm::default());
        assert_eq!(record.education_history, "[]");
        assert_eq!(record.work_history, "[]");
    }

    #[test]
    fn test_education_dates_formatted_as_months() {
        let record = normalize(&form(json!({
            "education": [{
                "time_range": ["2015-09-01", "2019-06-30T00:00:00.000Z"],
                "school": "浙江大学",
                "degree": "本科",
                "major": "软件工程"
            }]
        })));
        let entries = decode::<EducationEntry>(&record.education_history)
            .into_entries()
            .unwrap();
        assert_eq!(entries[0].start_time, "2015-09");
        assert_eq!(entries[0].end_time, "2019-06");
        assert_eq!(entries[0].school, "浙江大学");
    }

    #[test]
    fn test_missing_dates_format_as_empty() {
        let record = normalize(&form(json!({
            "education": [{ "time_range": ["2015-09", null], "school": "浙江大学" },
                          { "school": "清华大学" }]
        })));
        let entries = decode::<EducationEntry>(&record.education_history)
            .into_entries()
            .unwrap();
        assert_eq!(entries[0].start_time, "2015-09");
        assert_eq!(entries[0].end_time, "");
        assert_eq!(entries[1].start_time, "");
        assert_eq!(entries[1].degree, "");
    }

    #[test]
    fn test_work_override_wins_when_non_blank() {
        let record = normalize(&form(json!({
            "work": [
                { "time_range": ["2019-07-01", "2021-01-01"], "end_time": "至今", "company": "甲" },
                { "time_range": ["2019-07-01", "2021-01-01"], "end_time": "  ", "company": "乙" },
                { "time_range": ["2019-07-01", null], "end_time": "present", "company": "丙" }
            ]
        })));
        let DecodedHistory::Structured(entries) = decode::<WorkEntry>(&record.work_history) else {
            panic!("work history should decode");
        };
        assert_eq!(entries[0].end_time, "至今");
        assert_eq!(entries[1].end_time, "2021-01");
        assert_eq!(entries[2].end_time, "present");
    }

    #[test]
    fn test_multi_value_fields_joined_with_commas() {
        let record = normalize(&form(json!({
            "荣誉奖项": ["国家奖学金", "优秀毕业生"],
            "技能证书": "CET-6",
            "兴趣爱好": []
        })));
        assert_eq!(record.honors, "国家奖学金,优秀毕业生");
        assert_eq!(record.certificates, "CET-6");
        assert_eq!(record.hobbies, "");
    }

    #[test]
    fn test_numeric_multi_values_are_stringified() {
        let record = normalize(&form(json!({
            "荣誉奖项": 2023,
            "技能证书": ["CET-6", 4, null, ""],
            "兴趣爱好": true
        })));
        assert_eq!(record.honors, "2023");
        assert_eq!(record.certificates, "CET-6,4");
        assert_eq!(record.hobbies, "true");
    }

    #[test]
    fn test_irregular_history_payloads_are_accepted() {
        let record = normalize(&form(json!({
            "education": null,
            "work": [
                { "end_time": 2024, "company": "甲" },
                { "time_range": ["2015-09"], "company": "乙" },
                { "time_range": "2015-09", "company": "丙" },
                { "time_range": [201509, "2018-06"], "company": "丁" },
                "not an entry"
            ]
        })));
        assert_eq!(record.education_history, "[]");
        let entries = decode::<WorkEntry>(&record.work_history)
            .into_entries()
            .unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].end_time, "2024");
        assert_eq!(entries[1].start_time, "2015-09");
        assert_eq!(entries[1].end_time, "");
        assert_eq!(entries[2].start_time, "");
        assert_eq!(entries[3].start_time, "");
        assert_eq!(entries[3].end_time, "2018-06");
    }

    #[test]
    fn test_non_list_history_is_empty() {
        let record = normalize(&form(json!({ "education": "浙江大学", "work": {} })));
        assert_eq!(record.education_history, "[]");
        assert_eq!(record.work_history, "[]");
    }

    #[test]
    fn test_format_month_variants() {
        assert_eq!(format_month(Some("2020-03")), "2020-03");
        assert_eq!(format_month(Some("2020-03-15")), "2020-03");
        assert_eq!(format_month(Some("2020-03-15T08:00:00Z")), "2020-03");
        assert_eq!(format_month(Some("soon")), "");
        assert_eq!(format_month(None), "");
    }
}
