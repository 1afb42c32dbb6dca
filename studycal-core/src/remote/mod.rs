//! Remote mirror of the study ledger.

pub mod rest;

use serde::{Deserialize, Serialize};

use crate::entry::{DateKey, StudyEntry};
use crate::error::StudyCalResult;

pub use rest::RestStore;

/// A row of the hosted `study_records` table.
///
/// `id`, `user_id` and the timestamps are managed by the store: they are read
/// back but never sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyRecord {
    #[serde(default, skip_serializing)]
    pub id: Option<i64>,
    pub date: DateKey,
    pub hours: u32,
    pub minutes: u32,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing)]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

impl StudyRecord {
    pub fn new(date: DateKey, entry: &StudyEntry) -> Self {
        StudyRecord {
            id: None,
            date,
            hours: entry.hours,
            minutes: entry.minutes,
            content: entry.content.clone(),
            user_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn into_entry(self) -> (DateKey, StudyEntry) {
        let entry = StudyEntry::new(self.hours, self.minutes, self.content.as_deref());
        (self.date, entry)
    }
}

/// Operations the ledger needs from its remote mirror.
///
/// Upserts are keyed on `date`: writing a record for a date that already has
/// one replaces it.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    async fn select_all_ordered_by_date(&self) -> StudyCalResult<Vec<StudyRecord>>;

    async fn upsert_by_date(&self, record: &StudyRecord) -> StudyCalResult<()>;

    async fn delete_by_date(&self, date: &DateKey) -> StudyCalResult<()>;
}
