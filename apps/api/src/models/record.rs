use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::history::{EducationEntry, WorkEntry};
use crate::models::scalar::scalar_string;
use crate::records::codec::{decode, DecodedHistory};

/// Format of the server-assigned entry timestamp.
pub const ENTRY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^1[3-9]\d{9}$").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "男", alias = "male")]
    Male,
    #[serde(rename = "女", alias = "female")]
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "男",
            Gender::Female => "女",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "男" => Some(Gender::Male),
            "女" => Some(Gender::Female),
            other if other.eq_ignore_ascii_case("male") => Some(Gender::Male),
            other if other.eq_ignore_ascii_case("female") => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Highest completed degree, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Degree {
    #[serde(rename = "高中")]
    HighSchool,
    #[serde(rename = "中专")]
    Vocational,
    #[serde(rename = "大专", alias = "专科")]
    Associate,
    #[serde(rename = "本科")]
    Bachelor,
    #[serde(rename = "硕士")]
    Master,
    #[serde(rename = "博士")]
    Doctorate,
}

impl Degree {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "高中" => Some(Degree::HighSchool),
            "中专" => Some(Degree::Vocational),
            "大专" | "专科" => Some(Degree::Associate),
            "本科" => Some(Degree::Bachelor),
            "硕士" => Some(Degree::Master),
            "博士" => Some(Degree::Doctorate),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Identity
// ────────────────────────────────────────────────────────────────────────────

/// Opaque identifier assigned when a record enters the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    pub fn new() -> Self {
        RecordId(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Legacy (name, entry timestamp) identity. Not unique: two same-named records
/// entered within the same second share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub entry_time: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Record
// ────────────────────────────────────────────────────────────────────────────

/// Flat, string-typed storage shape of one résumé. Blank means absent.
/// Wire keys are the upstream column names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(rename = "姓名", default, deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(rename = "性别", default, deserialize_with = "scalar_string")]
    pub gender: String,
    #[serde(rename = "年龄", default, deserialize_with = "scalar_string")]
    pub age: String,
    #[serde(rename = "政治面貌", default, deserialize_with = "scalar_string")]
    pub political_status: String,
    #[serde(rename = "体重", default, deserialize_with = "scalar_string")]
    pub weight_kg: String,
    #[serde(rename = "籍贯", default, deserialize_with = "scalar_string")]
    pub hometown: String,
    #[serde(rename = "健康状况", default, deserialize_with = "scalar_string")]
    pub health_status: String,
    #[serde(rename = "身高", default, deserialize_with = "scalar_string")]
    pub height_cm: String,
    #[serde(rename = "学历", default, deserialize_with = "scalar_string")]
    pub highest_degree: String,
    #[serde(rename = "毕业院校", default, deserialize_with = "scalar_string")]
    pub school: String,
    #[serde(rename = "专业", default, deserialize_with = "scalar_string")]
    pub major: String,
    #[serde(rename = "求职意向", default, deserialize_with = "scalar_string")]
    pub desired_position: String,
    #[serde(rename = "手机", default, deserialize_with = "scalar_string")]
    pub phone: String,
    #[serde(rename = "邮箱", default, deserialize_with = "scalar_string")]
    pub email: String,
    #[serde(rename = "教育经历", default, deserialize_with = "scalar_string")]
    pub education_history: String,
    #[serde(rename = "荣誉奖项", default, deserialize_with = "scalar_string")]
    pub honors: String,
    #[serde(rename = "技能证书", default, deserialize_with = "scalar_string")]
    pub certificates: String,
    #[serde(rename = "工作经历", default, deserialize_with = "scalar_string")]
    pub work_history: String,
    #[serde(rename = "兴趣爱好", default, deserialize_with = "scalar_string")]
    pub hobbies: String,
    #[serde(rename = "自我评价", default, deserialize_with = "scalar_string")]
    pub self_assessment: String,
    #[serde(rename = "录入时间", default, deserialize_with = "scalar_string")]
    pub entry_time: String,
}

impl ResumeRecord {
    /// Every attribute in wire order, paired with its column name.
    pub fn string_fields(&self) -> [(&'static str, &str); 21] {
        [
            ("姓名", self.name.as_str()),
            ("性别", self.gender.as_str()),
            ("年龄", self.age.as_str()),
            ("政治面貌", self.political_status.as_str()),
            ("体重", self.weight_kg.as_str()),
            ("籍贯", self.hometown.as_str()),
            ("健康状况", self.health_status.as_str()),
            ("身高", self.height_cm.as_str()),
            ("学历", self.highest_degree.as_str()),
            ("毕业院校", self.school.as_str()),
            ("专业", self.major.as_str()),
            ("求职意向", self.desired_position.as_str()),
            ("手机", self.phone.as_str()),
            ("邮箱", self.email.as_str()),
            ("教育经历", self.education_history.as_str()),
            ("荣誉奖项", self.honors.as_str()),
            ("技能证书", self.certificates.as_str()),
            ("工作经历", self.work_history.as_str()),
            ("兴趣爱好", self.hobbies.as_str()),
            ("自我评价", self.self_assessment.as_str()),
            ("录入时间", self.entry_time.as_str()),
        ]
    }

    /// Numeric age. Accepts the `"25.0"` form a spreadsheet reader produces.
    pub fn age(&self) -> Option<u32> {
        let raw = self.age.trim();
        if let Ok(age) = raw.parse::<u32>() {
            return Some(age);
        }
        let value = raw.parse::<f64>().ok()?;
        if value.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&value) {
            Some(value as u32)
        } else {
            None
        }
    }

    pub fn gender(&self) -> Option<Gender> {
        Gender::parse(&self.gender)
    }

    pub fn degree(&self) -> Option<Degree> {
        Degree::parse(&self.highest_degree)
    }

    pub fn education_entries(&self) -> DecodedHistory<EducationEntry> {
        decode(&self.education_history)
    }

    pub fn work_entries(&self) -> DecodedHistory<WorkEntry> {
        decode(&self.work_history)
    }

    /// Parsed entry timestamp. Date-only and `T`-separated values are accepted too.
    pub fn entry_time(&self) -> Option<NaiveDateTime> {
        let raw = self.entry_time.trim();
        NaiveDateTime::parse_from_str(raw, ENTRY_TIME_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            name: self.name.clone(),
            entry_time: self.entry_time.clone(),
        }
    }

    pub fn matches_key(&self, key: &RecordKey) -> bool {
        self.name == key.name && self.entry_time == key.entry_time
    }

    /// 11 digits with a mainland mobile prefix (13–19).
    pub fn phone_is_valid(&self) -> bool {
        PHONE_RE.is_match(self.phone.trim())
    }

    pub fn email_is_valid(&self) -> bool {
        EMAIL_RE.is_match(self.email.trim())
    }
}

/// A record as held by the store, carrying its opaque id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub record: ResumeRecord,
}

impl AsRef<ResumeRecord> for StoredRecord {
    fn as_ref(&self) -> &ResumeRecord {
        &self.record
    }
}

impl AsRef<ResumeRecord> for ResumeRecord {
    fn as_ref(&self) -> &ResumeRecord {
        self
    }
}
