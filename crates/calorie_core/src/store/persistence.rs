//! Tracker persistence over a key-value backend.
//!
//! # Responsibility
//! - Store the calorie limit and running total as decimal text.
//! - Store meal and workout lists as JSON arrays of `{id, name, calories}`.
//! - Treat unreadable values as absent and log the substitution.
//!
//! # Invariants
//! - Empty stored text is treated the same as a missing key.
//! - Collection writes are full read-modify-write cycles of one key.
//! - `clear_all` never touches `calorieLimit`.

use super::{CorruptDataError, KeyValueBackend, StoreError, StoreResult};
use crate::model::entry::{Entry, EntryId, EntryKind};
use log::warn;

pub const CALORIE_LIMIT_KEY: &str = "calorieLimit";
pub const TOTAL_CALORIES_KEY: &str = "totalCalories";
pub const DEFAULT_CALORIE_LIMIT: i64 = 2000;
/// Largest magnitude accepted for a stored limit or total (2^53 - 1, the
/// integer range a browser-written number round-trips exactly).
pub const MAX_STORED_CALORIES: i64 = (1 << 53) - 1;

/// Typed view of the tracker's keys on top of a backend.
#[derive(Debug)]
pub struct PersistenceStore<B: KeyValueBackend> {
    backend: B,
}

impl<B: KeyValueBackend> PersistenceStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Returns the stored limit, or `default` when absent or unreadable.
    pub fn get_calorie_limit(&self, default: i64) -> StoreResult<i64> {
        self.read_number(CALORIE_LIMIT_KEY, default)
    }

    pub fn set_calorie_limit(&mut self, limit: i64) -> StoreResult<()> {
        self.backend.set_item(CALORIE_LIMIT_KEY, &limit.to_string())
    }

    /// Returns the stored running total, or `default` when absent or unreadable.
    pub fn get_total_calories(&self, default: i64) -> StoreResult<i64> {
        self.read_number(TOTAL_CALORIES_KEY, default)
    }

    pub fn update_total_calories(&mut self, total: i64) -> StoreResult<()> {
        self.backend.set_item(TOTAL_CALORIES_KEY, &total.to_string())
    }

    pub fn get_meals(&self) -> StoreResult<Vec<Entry>> {
        self.entries(EntryKind::Meal)
    }

    pub fn get_workouts(&self) -> StoreResult<Vec<Entry>> {
        self.entries(EntryKind::Workout)
    }

    pub fn save_meal(&mut self, meal: &Entry) -> StoreResult<()> {
        self.save_entry(EntryKind::Meal, meal)
    }

    pub fn save_workout(&mut self, workout: &Entry) -> StoreResult<()> {
        self.save_entry(EntryKind::Workout, workout)
    }

    pub fn remove_meal(&mut self, id: &EntryId) -> StoreResult<bool> {
        self.remove_entry(EntryKind::Meal, id)
    }

    pub fn remove_workout(&mut self, id: &EntryId) -> StoreResult<bool> {
        self.remove_entry(EntryKind::Workout, id)
    }

    /// Reads one collection, failing on corrupt content.
    ///
    /// # Errors
    /// - `StoreError::Corrupt` when the stored text is not a JSON array of
    ///   well-formed entries.
    /// - Backend errors unchanged.
    pub fn try_entries(&self, kind: EntryKind) -> StoreResult<Vec<Entry>> {
        let key = kind.storage_key();
        let Some(text) = self.read_text(key)? else {
            return Ok(Vec::new());
        };

        let entries: Vec<Entry> = serde_json::from_str(&text)
            .map_err(|err| CorruptDataError::new(key, err.to_string()))?;
        for entry in &entries {
            entry
                .validate()
                .map_err(|err| CorruptDataError::new(key, err.to_string()))?;
        }
        Ok(entries)
    }

    /// Reads one collection in insertion order; corrupt content reads as empty.
    pub fn entries(&self, kind: EntryKind) -> StoreResult<Vec<Entry>> {
        match self.try_entries(kind) {
            Err(StoreError::Corrupt(err)) => {
                warn!(
                    "event=store_corrupt module=store status=defaulted key={} reason={}",
                    err.key, err.reason
                );
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Appends one entry to the stored collection of `kind`.
    pub fn save_entry(&mut self, kind: EntryKind, entry: &Entry) -> StoreResult<()> {
        let mut entries = self.entries(kind)?;
        entries.push(entry.clone());
        self.write_entries(kind, &entries)
    }

    /// Removes the first stored entry of `kind` whose id matches.
    ///
    /// Returns `false` and leaves the key untouched when nothing matched.
    pub fn remove_entry(&mut self, kind: EntryKind, id: &EntryId) -> StoreResult<bool> {
        let mut entries = self.entries(kind)?;
        let Some(index) = entries.iter().position(|entry| &entry.id == id) else {
            return Ok(false);
        };
        entries.remove(index);
        self.write_entries(kind, &entries)?;
        Ok(true)
    }

    /// Removes the total and both collections; the limit is kept.
    pub fn clear_all(&mut self) -> StoreResult<()> {
        self.backend.remove_item(TOTAL_CALORIES_KEY)?;
        self.backend.remove_item(EntryKind::Meal.storage_key())?;
        self.backend.remove_item(EntryKind::Workout.storage_key())?;
        Ok(())
    }

    fn write_entries(&mut self, kind: EntryKind, entries: &[Entry]) -> StoreResult<()> {
        let key = kind.storage_key();
        let text = serde_json::to_string(entries)
            .map_err(|err| StoreError::Backend(format!("failed to encode `{key}`: {err}")))?;
        self.backend.set_item(key, &text)
    }

    fn read_text(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self
            .backend
            .get_item(key)?
            .filter(|text| !text.trim().is_empty()))
    }

    fn read_number(&self, key: &str, default: i64) -> StoreResult<i64> {
        let Some(text) = self.read_text(key)? else {
            return Ok(default);
        };
        match parse_number(key, &text) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(
                    "event=store_corrupt module=store status=defaulted key={} reason={}",
                    err.key, err.reason
                );
                Ok(default)
            }
        }
    }
}

fn parse_number(key: &str, text: &str) -> Result<i64, CorruptDataError> {
    let trimmed = text.trim();
    let value = trimmed
        .parse::<i64>()
        .map_err(|err| CorruptDataError::new(key, format!("`{trimmed}` is not a number: {err}")))?;
    if !(-MAX_STORED_CALORIES..=MAX_STORED_CALORIES).contains(&value) {
        return Err(CorruptDataError::new(
            key,
            format!("`{trimmed}` is outside the supported calorie range"),
        ));
    }
    Ok(value)
}
