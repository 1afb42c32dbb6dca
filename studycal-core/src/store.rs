//! The study record store: owner of the in-memory ledger.
//!
//! All mutations go to the remote store first and only reach the ledger once
//! the remote acknowledged them. The local cache is touched in exactly two
//! places: it is read when the startup load fails, and it receives a snapshot
//! when an upsert fails.

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::cache::LocalCache;
use crate::calendar::{self, TimeTotal};
use crate::entry::{DateKey, StudyEntry};
use crate::error::{StudyCalError, StudyCalResult};
use crate::ledger::StudyLedger;
use crate::remote::{RecordStore, StudyRecord};

/// How the last `load` went.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The ledger now mirrors the remote table.
    Remote { records: usize },
    /// The remote read failed. The ledger was replaced by the cached copy if
    /// one was readable, and left as it was otherwise.
    Degraded {
        error: StudyCalError,
        restored_from_cache: bool,
    },
}

impl LoadOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, LoadOutcome::Degraded { .. })
    }
}

pub struct StudyRecordStore<S> {
    remote: S,
    cache: LocalCache,
    ledger: StudyLedger,
    error: Option<String>,
    loaded: bool,
    revision: watch::Sender<u64>,
}

impl<S: RecordStore> StudyRecordStore<S> {
    pub fn new(remote: S, cache: LocalCache) -> Self {
        let (revision, _) = watch::channel(0);

        StudyRecordStore {
            remote,
            cache,
            ledger: StudyLedger::new(),
            error: None,
            loaded: false,
            revision,
        }
    }

    /// Replace the ledger with the remote table's contents.
    ///
    /// Never fails: a remote error is surfaced through [`Self::error`] and the
    /// cached copy is used instead when there is one.
    pub async fn load(&mut self) -> LoadOutcome {
        self.error = None;

        let outcome = match self.remote.select_all_ordered_by_date().await {
            Ok(records) => {
                let count = records.len();
                self.ledger = records.into_iter().map(StudyRecord::into_entry).collect();
                self.notify();
                info!(records = count, "loaded study records");
                LoadOutcome::Remote { records: count }
            }
            Err(error) => {
                warn!("failed to load study records, falling back to local cache: {error}");
                self.error = Some(format!("Failed to load data: {error}"));

                let restored_from_cache = match self.cache.load() {
                    Some(cached) => {
                        self.ledger = cached;
                        self.notify();
                        true
                    }
                    None => false,
                };

                LoadOutcome::Degraded {
                    error,
                    restored_from_cache,
                }
            }
        };

        self.loaded = true;
        outcome
    }

    /// Record `entry` for `key`, replacing any existing entry for that day.
    ///
    /// On remote failure the ledger is left untouched; a snapshot of the ledger
    /// including the pending entry goes to the local cache.
    pub async fn upsert(&mut self, key: DateKey, entry: StudyEntry) -> StudyCalResult<()> {
        self.ensure_loaded()?;
        self.error = None;

        let record = StudyRecord::new(key, &entry);
        match self.remote.upsert_by_date(&record).await {
            Ok(()) => {
                self.ledger.insert(key, entry);
                self.notify();
                Ok(())
            }
            Err(error) => {
                warn!(date = %key, "failed to save study record: {error}");
                self.error = Some(format!("Failed to save data: {error}"));
                self.cache.save(&self.ledger.with_entry(key, entry));
                Err(error)
            }
        }
    }

    /// Delete the entry for `key`. The ledger only changes if the remote
    /// delete succeeded.
    pub async fn remove(&mut self, key: &DateKey) -> StudyCalResult<()> {
        self.ensure_loaded()?;
        self.error = None;

        match self.remote.delete_by_date(key).await {
            Ok(()) => {
                self.ledger.remove(key);
                self.notify();
                Ok(())
            }
            Err(error) => {
                warn!(date = %key, "failed to delete study record: {error}");
                self.error = Some(format!("Failed to delete data: {error}"));
                Err(error)
            }
        }
    }

    pub fn total_for(&self, key: &DateKey) -> Option<&StudyEntry> {
        self.ledger.get(key)
    }

    pub fn ledger(&self) -> &StudyLedger {
        &self.ledger
    }

    /// Message describing the last failed operation, cleared when the next
    /// operation starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Receiver that observes a revision number bumped on every ledger change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn monthly_total(&self, reference: NaiveDate) -> TimeTotal {
        calendar::monthly_total(&self.ledger, reference)
    }

    pub fn yearly_total(&self, reference: NaiveDate) -> TimeTotal {
        calendar::yearly_total(&self.ledger, reference)
    }

    pub fn all_time_total(&self) -> TimeTotal {
        calendar::all_time_total(&self.ledger)
    }

    fn ensure_loaded(&self) -> StudyCalResult<()> {
        if self.loaded {
            Ok(())
        } else {
            Err(StudyCalError::NotLoaded)
        }
    }

    fn notify(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    /// In-memory table with switchable failures.
    #[derive(Clone, Default)]
    struct FakeStore {
        rows: Arc<Mutex<BTreeMap<DateKey, StudyRecord>>>,
        reads_fail: Arc<AtomicBool>,
        writes_fail: Arc<AtomicBool>,
    }

    impl FakeStore {
        fn with_rows(records: Vec<StudyRecord>) -> Self {
            let store = FakeStore::default();
            {
                let mut rows = store.rows.lock().unwrap();
                for record in records {
                    rows.insert(record.date, record);
                }
            }
            store
        }

        fn fail_reads(&self) {
            self.reads_fail.store(true, Ordering::SeqCst);
        }

        fn fail_writes(&self, fail: bool) {
            self.writes_fail.store(fail, Ordering::SeqCst);
        }

        fn row_count(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        fn unavailable() -> StudyCalError {
            StudyCalError::Store {
                status: 503,
                message: "Service Unavailable".into(),
            }
        }
    }

    impl RecordStore for FakeStore {
        async fn select_all_ordered_by_date(&self) -> StudyCalResult<Vec<StudyRecord>> {
            if self.reads_fail.load(Ordering::SeqCst) {
                return Err(Self::unavailable());
            }
            Ok(self.rows.lock().unwrap().values().cloned().collect())
        }

        async fn upsert_by_date(&self, record: &StudyRecord) -> StudyCalResult<()> {
            if self.writes_fail.load(Ordering::SeqCst) {
                return Err(Self::unavailable());
            }
            self.rows.lock().unwrap().insert(record.date, record.clone());
            Ok(())
        }

        async fn delete_by_date(&self, date: &DateKey) -> StudyCalResult<()> {
            if self.writes_fail.load(Ordering::SeqCst) {
                return Err(Self::unavailable());
            }
            self.rows.lock().unwrap().remove(date);
            Ok(())
        }
    }

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn march_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn algebra_row() -> StudyRecord {
        StudyRecord::new(key("2024-03-05"), &StudyEntry::new(1, 30, Some("algebra")))
    }

    fn new_store(
        remote: FakeStore,
    ) -> (StudyRecordStore<FakeStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        (StudyRecordStore::new(remote, cache), dir)
    }

    #[tokio::test]
    async fn test_load_from_healthy_store() {
        let (mut store, _dir) = new_store(FakeStore::with_rows(vec![algebra_row()]));

        let outcome = store.load().await;

        assert!(matches!(outcome, LoadOutcome::Remote { records: 1 }));
        assert_eq!(store.ledger().len(), 1);
        assert_eq!(
            store.total_for(&key("2024-03-05")),
            Some(&StudyEntry::new(1, 30, Some("algebra")))
        );
        assert_eq!(store.monthly_total(march_2024()), TimeTotal { hours: 1, minutes: 30 });
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn test_remove_after_load() {
        let remote = FakeStore::with_rows(vec![algebra_row()]);
        let (mut store, _dir) = new_store(remote.clone());
        store.load().await;

        store.remove(&key("2024-03-05")).await.unwrap();

        assert!(store.ledger().is_empty());
        assert_eq!(remote.row_count(), 0);
        assert_eq!(store.monthly_total(march_2024()), TimeTotal::default());
    }

    #[tokio::test]
    async fn test_load_failure_falls_back_to_cache() {
        let remote = FakeStore::default();
        remote.fail_reads();
        let (mut store, dir) = new_store(remote);
        std::fs::write(
            dir.path().join("study-time-data.json"),
            r#"{"2024-01-01":{"hours":2,"minutes":0}}"#,
        )
        .unwrap();

        let outcome = store.load().await;

        assert!(matches!(
            outcome,
            LoadOutcome::Degraded { restored_from_cache: true, .. }
        ));
        let expected: StudyLedger = [(key("2024-01-01"), StudyEntry::new(2, 0, None))]
            .into_iter()
            .collect();
        assert_eq!(store.ledger(), &expected);
        assert!(store.error().unwrap().starts_with("Failed to load data"));
        assert!(store.is_loaded());
    }

    #[tokio::test]
    async fn test_load_failure_without_cache_stays_usable() {
        let remote = FakeStore::default();
        remote.fail_reads();
        let (mut store, _dir) = new_store(remote);

        let outcome = store.load().await;

        assert!(matches!(
            outcome,
            LoadOutcome::Degraded { restored_from_cache: false, .. }
        ));
        assert!(outcome.is_degraded());
        assert!(store.ledger().is_empty());
        assert!(store.error().is_some());

        store.upsert(key("2024-03-05"), StudyEntry::new(0, 20, None)).await.unwrap();
        assert_eq!(store.ledger().len(), 1);
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn test_upsert_round_trip() {
        let (mut store, _dir) = new_store(FakeStore::default());
        store.load().await;
        let entry = StudyEntry::new(2, 45, Some("English vocabulary"));

        store.upsert(key("2024-03-07"), entry.clone()).await.unwrap();

        assert_eq!(store.total_for(&key("2024-03-07")), Some(&entry));
    }

    #[tokio::test]
    async fn test_upsert_twice_keeps_latest() {
        let remote = FakeStore::default();
        let (mut store, _dir) = new_store(remote.clone());
        store.load().await;

        store.upsert(key("2024-03-07"), StudyEntry::new(1, 0, None)).await.unwrap();
        store.upsert(key("2024-03-07"), StudyEntry::new(0, 0, Some("rest day"))).await.unwrap();

        assert_eq!(store.ledger().len(), 1);
        assert_eq!(remote.row_count(), 1);
        assert_eq!(
            store.total_for(&key("2024-03-07")),
            Some(&StudyEntry::new(0, 0, Some("rest day")))
        );
    }

    #[tokio::test]
    async fn test_failed_upsert_keeps_previous_value_and_backs_up() {
        let remote = FakeStore::with_rows(vec![algebra_row()]);
        let (mut store, dir) = new_store(remote.clone());
        store.load().await;
        remote.fail_writes(true);

        let result = store
            .upsert(key("2024-03-05"), StudyEntry::new(9, 0, None))
            .await;
        assert!(result.is_err());
        let result = store
            .upsert(key("2024-03-06"), StudyEntry::new(0, 10, None))
            .await;
        assert!(result.is_err());

        assert_eq!(
            store.total_for(&key("2024-03-05")),
            Some(&StudyEntry::new(1, 30, Some("algebra")))
        );
        assert_eq!(store.total_for(&key("2024-03-06")), None);
        assert!(store.error().unwrap().starts_with("Failed to save data"));

        let backup = LocalCache::new(dir.path()).load().unwrap();
        assert_eq!(backup.len(), 2);
        assert_eq!(
            backup.get(&key("2024-03-06")),
            Some(&StudyEntry::new(0, 10, None))
        );
    }

    #[tokio::test]
    async fn test_failed_remove_keeps_entry() {
        let remote = FakeStore::with_rows(vec![algebra_row()]);
        let (mut store, dir) = new_store(remote.clone());
        store.load().await;
        remote.fail_writes(true);

        let result = store.remove(&key("2024-03-05")).await;

        assert!(result.is_err());
        assert!(store.total_for(&key("2024-03-05")).is_some());
        assert!(store.error().unwrap().starts_with("Failed to delete data"));
        assert!(!dir.path().join("study-time-data.json").exists());
    }

    #[tokio::test]
    async fn test_mutations_wait_for_load() {
        let (mut store, _dir) = new_store(FakeStore::default());

        let result = store.upsert(key("2024-03-05"), StudyEntry::new(1, 0, None)).await;
        assert!(matches!(result, Err(StudyCalError::NotLoaded)));

        let result = store.remove(&key("2024-03-05")).await;
        assert!(matches!(result, Err(StudyCalError::NotLoaded)));
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let remote = FakeStore::default();
        let (mut store, _dir) = new_store(remote.clone());
        let mut changes = store.subscribe();

        store.load().await;
        assert!(changes.has_changed().unwrap());
        changes.borrow_and_update();

        remote.fail_writes(true);
        let _ = store.upsert(key("2024-03-05"), StudyEntry::new(1, 0, None)).await;
        assert!(!changes.has_changed().unwrap());

        remote.fail_writes(false);
        store.upsert(key("2024-03-05"), StudyEntry::new(1, 0, None)).await.unwrap();
        assert!(changes.has_changed().unwrap());
        assert_eq!(*changes.borrow_and_update(), 2);
    }

    #[tokio::test]
    async fn test_totals_follow_reference() {
        let remote = FakeStore::with_rows(vec![
            algebra_row(),
            StudyRecord::new(key("2024-11-02"), &StudyEntry::new(3, 40, None)),
            StudyRecord::new(key("2023-12-31"), &StudyEntry::new(0, 50, None)),
        ]);
        let (mut store, _dir) = new_store(remote);
        store.load().await;

        assert_eq!(store.monthly_total(march_2024()), TimeTotal { hours: 1, minutes: 30 });
        assert_eq!(store.yearly_total(march_2024()), TimeTotal { hours: 5, minutes: 10 });
        assert_eq!(store.all_time_total(), TimeTotal { hours: 6, minutes: 0 });
    }
}
