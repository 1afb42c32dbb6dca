//! Local fallback copy of the ledger.
//!
//! The cache is a single slot holding the whole ledger as JSON. It is only read
//! when the remote store cannot be reached at startup, and only written as a
//! backup when a remote write fails. Nothing here ever returns an error: I/O
//! and decode failures are logged and otherwise ignored.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::StudyCalConfig;
use crate::error::{StudyCalError, StudyCalResult};
use crate::ledger::StudyLedger;

const STORAGE_KEY: &str = "study-time-data";

#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LocalCache { dir: dir.into() }
    }

    pub fn from_config(config: &StudyCalConfig) -> StudyCalResult<Self> {
        Ok(Self::new(config.cache_dir()?))
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{STORAGE_KEY}.json"))
    }

    /// Store `ledger` in the slot, replacing whatever was there.
    pub fn save(&self, ledger: &StudyLedger) {
        match self.write(ledger) {
            Ok(()) => debug!(path = %self.path().display(), entries = ledger.len(), "saved local cache"),
            Err(e) => warn!(path = %self.path().display(), "failed to save local cache: {e}"),
        }
    }

    /// Read the slot. `None` when it is missing or unreadable.
    pub fn load(&self) -> Option<StudyLedger> {
        let path = self.path();

        if !path.exists() {
            debug!(path = %path.display(), "no local cache");
            return None;
        }

        match read(&path) {
            Ok(ledger) => Some(ledger),
            Err(e) => {
                warn!(path = %path.display(), "failed to read local cache: {e}");
                None
            }
        }
    }

    fn write(&self, ledger: &StudyLedger) -> StudyCalResult<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path();
        let temp = self.dir.join(format!("{STORAGE_KEY}.json.tmp"));

        let content = serde_json::to_string(ledger)
            .map_err(|e| StudyCalError::Serialization(e.to_string()))?;

        std::fs::write(&temp, content)?;
        if let Err(e) = std::fs::rename(&temp, &path) {
            let _ = std::fs::remove_file(&temp);
            return Err(e.into());
        }
        Ok(())
    }
}

fn read(path: &Path) -> StudyCalResult<StudyLedger> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| StudyCalError::Serialization(e.to_string()))
}
