//! Core of studycal: a calendar for logging daily study time.
//!
//! - `calendar`: month grid, date keys and totals
//! - `store`: the ledger owner, syncing with a remote table and a local cache
//! - `remote`: the remote table client
//! - `cache`: the local fallback copy

pub mod cache;
pub mod calendar;
pub mod config;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod remote;
pub mod store;

pub use entry::{DateKey, EntryInput, StudyEntry};
pub use error::{StudyCalError, StudyCalResult};
pub use ledger::StudyLedger;
pub use store::{LoadOutcome, StudyRecordStore};
