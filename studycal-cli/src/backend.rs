//! Picks the remote store the CLI talks to.

use studycal_core::config::StudyCalConfig;
use studycal_core::remote::{RecordStore, RestStore, StudyRecord};
use studycal_core::{DateKey, StudyCalError, StudyCalResult};

/// The configured REST store, or the reason there is none.
///
/// An unconfigured backend fails every call with the underlying config error,
/// so the record store falls back to the local cache the same way it does when
/// the network is down.
pub enum Backend {
    Rest(RestStore),
    Unconfigured(String),
}

impl Backend {
    pub fn from_config(config: &StudyCalConfig) -> Self {
        match RestStore::from_config(config) {
            Ok(store) => Backend::Rest(store),
            Err(StudyCalError::Config(reason)) => Backend::Unconfigured(reason),
            Err(e) => Backend::Unconfigured(e.to_string()),
        }
    }

    fn unconfigured(reason: &str) -> StudyCalError {
        StudyCalError::Config(format!(
            "{reason}. Set it in {} or via STUDYCAL_* environment variables",
            StudyCalConfig::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "the config file".into())
        ))
    }
}

impl RecordStore for Backend {
    async fn select_all_ordered_by_date(&self) -> StudyCalResult<Vec<StudyRecord>> {
        match self {
            Backend::Rest(store) => store.select_all_ordered_by_date().await,
            Backend::Unconfigured(reason) => Err(Self::unconfigured(reason)),
        }
    }

    async fn upsert_by_date(&self, record: &StudyRecord) -> StudyCalResult<()> {
        match self {
            Backend::Rest(store) => store.upsert_by_date(record).await,
            Backend::Unconfigured(reason) => Err(Self::unconfigured(reason)),
        }
    }

    async fn delete_by_date(&self, date: &DateKey) -> StudyCalResult<()> {
        match self {
            Backend::Rest(store) => store.delete_by_date(date).await,
            Backend::Unconfigured(reason) => Err(Self::unconfigured(reason)),
        }
    }
}
