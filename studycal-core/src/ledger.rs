//! In-memory mapping from calendar day to recorded study time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entry::{DateKey, StudyEntry};

/// One entry per date key. Serializes as a JSON object keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudyLedger {
    entries: HashMap<DateKey, StudyEntry>,
}

impl StudyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &DateKey) -> Option<&StudyEntry> {
        self.entries.get(key)
    }

    /// Insert or replace the entry for `key`.
    pub fn insert(&mut self, key: DateKey, entry: StudyEntry) -> Option<StudyEntry> {
        self.entries.insert(key, entry)
    }

    pub fn remove(&mut self, key: &DateKey) -> Option<StudyEntry> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &StudyEntry)> {
        self.entries.iter()
    }

    /// Copy of this ledger with `entry` filed under `key`.
    pub fn with_entry(&self, key: DateKey, entry: StudyEntry) -> Self {
        let mut snapshot = self.clone();
        snapshot.insert(key, entry);
        snapshot
    }
}

impl FromIterator<(DateKey, StudyEntry)> for StudyLedger {
    fn from_iter<I: IntoIterator<Item = (DateKey, StudyEntry)>>(iter: I) -> Self {
        StudyLedger {
            entries: iter.into_iter().collect(),
        }
    }
}
