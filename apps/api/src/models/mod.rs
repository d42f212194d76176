pub mod history;
pub mod record;
pub mod scalar;

pub use history::{EducationEntry, HistoryEntry, WorkEntry};
pub use record::{Degree, Gender, RecordId, RecordKey, ResumeRecord, StoredRecord};
