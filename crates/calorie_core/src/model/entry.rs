//! Entry domain model.
//!
//! # Responsibility
//! - Define the `{id, name, calories}` record persisted for meals and workouts.
//! - Validate raw form input before an entry reaches the ledger.
//!
//! # Invariants
//! - `id` is stable for the entry lifetime and is the only removal key.
//! - `name` is non-empty after trimming.
//! - `calories` is a non-negative whole count.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identifier of a meal or workout entry.
///
/// Freshly generated ids are random 128-bit values in hex form. Ids read back
/// from storage are accepted as-is, whatever their encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Generates a new collision-resistant id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Which list an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Food intake; adds to the running total.
    Meal,
    /// Exercise; subtracts from the running total.
    Workout,
}

impl EntryKind {
    /// Returns the signed effect of `calories` on the running total.
    pub fn signed(self, calories: u32) -> i64 {
        match self {
            Self::Meal => i64::from(calories),
            Self::Workout => -i64::from(calories),
        }
    }

    /// Storage key of the collection holding entries of this kind.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Meal => "meals",
            Self::Workout => "workouts",
        }
    }

    /// Lowercase name used in log events and CLI output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Meal => "meal",
            Self::Workout => "workout",
        }
    }
}

/// Validation errors for entry construction and form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyId,
    EmptyName,
    InvalidCalories(String),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "entry id cannot be empty"),
            Self::EmptyName => write!(f, "entry name cannot be empty"),
            Self::InvalidCalories(value) => write!(
                f,
                "calories must be a non-negative whole number, got `{value}`"
            ),
        }
    }
}

impl Error for EntryValidationError {}

/// A logged meal or workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable key used for lookup and deletion.
    pub id: EntryId,
    /// Display label.
    pub name: String,
    /// Magnitude only; the owning list decides the sign.
    pub calories: u32,
}

impl Entry {
    /// Creates an entry with a freshly generated id.
    pub fn new(name: impl Into<String>, calories: u32) -> Self {
        Self {
            id: EntryId::generate(),
            name: name.into(),
            calories,
        }
    }

    /// Creates an entry with a caller-provided id.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(id: impl Into<EntryId>, name: impl Into<String>, calories: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            calories,
        }
    }

    /// Builds an entry from raw form fields.
    ///
    /// # Contract
    /// - Both fields are required; surrounding whitespace is ignored.
    /// - `calories` must parse as a non-negative whole number.
    /// - A new id is generated on success.
    pub fn from_input(name: &str, calories: &str) -> Result<Self, EntryValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EntryValidationError::EmptyName);
        }
        let calories_text = calories.trim();
        let calories = calories_text
            .parse::<u32>()
            .map_err(|_| EntryValidationError::InvalidCalories(calories_text.to_string()))?;
        Ok(Self::new(name, calories))
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(EntryValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(EntryValidationError::EmptyName);
        }
        Ok(())
    }
}
