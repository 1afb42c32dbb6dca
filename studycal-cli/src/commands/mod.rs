pub mod config;
pub mod log;
pub mod month;
pub mod remove;
pub mod show;
pub mod totals;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use studycal_core::cache::LocalCache;
use studycal_core::calendar;
use studycal_core::config::StudyCalConfig;
use studycal_core::{LoadOutcome, StudyRecordStore};
use tracing::debug;

use crate::backend::Backend;
pub use crate::utils::tui::with_spinner;

/// Build the record store from config and run the startup load.
///
/// A failed load is reported as an advisory line and the command carries on
/// with whatever the local cache held.
pub async fn open_store() -> Result<StudyRecordStore<Backend>> {
    let config = StudyCalConfig::load()?;
    let cache = LocalCache::from_config(&config)?;
    debug!(cache = %cache.path().display(), table = %config.table, "opening study record store");
    let mut store = StudyRecordStore::new(Backend::from_config(&config), cache);

    let outcome = with_spinner("Loading study records", store.load()).await;

    if outcome.is_degraded() {
        if let Some(error) = store.error() {
            eprintln!("{}", error.red());
        }
        if matches!(
            outcome,
            LoadOutcome::Degraded {
                restored_from_cache: true,
                ..
            }
        ) {
            eprintln!("{}", "Showing locally cached data".dimmed());
        }
    }

    Ok(store)
}

/// Month to show: `--month YYYY-MM` (default: this month), moved by `offset`.
pub fn resolve_month(month: Option<&str>, offset: i32) -> Result<NaiveDate> {
    let reference = match month {
        Some(s) => NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .with_context(|| format!("Invalid month '{s}'. Expected YYYY-MM"))?,
        None => calendar::today(),
    };

    Ok(calendar::shift_month(reference, offset))
}
