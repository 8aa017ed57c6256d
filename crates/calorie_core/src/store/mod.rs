//! Durable key-value persistence for the tracker.
//!
//! # Responsibility
//! - Define the string-keyed backend contract (`KeyValueBackend`).
//! - Map the tracker's scalars and collections onto backend keys.
//! - Keep parsing of persisted text at the read boundary.
//!
//! # Invariants
//! - Public reads never surface corrupt data; they substitute defaults.
//! - Backend transport failures are reported, not masked.
//! - The calorie limit survives `clear_all`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod persistence;
pub mod sqlite;

pub use memory::MemoryBackend;
pub use persistence::{
    PersistenceStore, CALORIE_LIMIT_KEY, DEFAULT_CALORIE_LIMIT, MAX_STORED_CALORIES,
    TOTAL_CALORIES_KEY,
};
pub use sqlite::{SqliteBackend, SCHEMA_VERSION};

pub type StoreResult<T> = Result<T, StoreError>;

/// Textual key-value medium the store writes through to.
///
/// Semantics follow browser key-value storage: a missing key reads as `None`,
/// `set_item` overwrites, and `remove_item` on a missing key is a no-op.
pub trait KeyValueBackend {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn remove_item(&mut self, key: &str) -> StoreResult<()>;
}

/// A stored value that cannot be read back into its expected shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptDataError {
    pub key: String,
    pub reason: String,
}

impl CorruptDataError {
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl Display for CorruptDataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "corrupt value stored under `{}`: {}", self.key, self.reason)
    }
}

impl Error for CorruptDataError {}

/// Store error for backend access and decoding.
#[derive(Debug)]
pub enum StoreError {
    Backend(String),
    Sqlite(rusqlite::Error),
    Corrupt(CorruptDataError),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(message) => write!(f, "storage backend error: {message}"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Corrupt(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "tracker database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection is not migrated: expected schema version {expected_version}, found {actual_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table is missing: {table}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Corrupt(err) => Some(err),
            Self::Backend(_)
            | Self::UnsupportedSchemaVersion { .. }
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<CorruptDataError> for StoreError {
    fn from(value: CorruptDataError) -> Self {
        Self::Corrupt(value)
    }
}
