//! Core ledger and persistence for the calorie tracker.
//! This crate is the single source of truth for the calorie-balance invariant.

pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{ConfigError, TrackerConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{Entry, EntryId, EntryKind, EntryValidationError};
pub use service::tracker::{BudgetStatus, CaloriesTracker, TrackerSnapshot};
pub use store::{
    CorruptDataError, KeyValueBackend, MemoryBackend, PersistenceStore, SqliteBackend,
    StoreError, StoreResult, DEFAULT_CALORIE_LIMIT, MAX_STORED_CALORIES,
    SCHEMA_VERSION,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
