//! Calorie ledger service.
//!
//! # Responsibility
//! - Hold the authoritative in-memory snapshot (limit, total, meals, workouts).
//! - Write every mutation through to the persistence store.
//! - Derive display values for presentation callers.
//!
//! # Invariants
//! - `total_calories == sum(meals) - sum(workouts)` after every operation.
//! - Memory is updated only after all writes of an operation succeeded.
//! - Collection writes precede the total write, so a half-applied operation
//!   leaves the lists authoritative for the next `initialize`.
//! - Balance arithmetic saturates instead of overflowing.
//! - Removal is by id with first-match semantics; unknown ids are a no-op.
//! - `reset` keeps the calorie limit.

use crate::model::entry::{Entry, EntryId, EntryKind};
use crate::store::{KeyValueBackend, PersistenceStore, StoreResult};
use log::{info, warn};
use serde::Serialize;

/// Whether the running total is still below the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    UnderLimit,
    AtOrOverLimit,
}

/// Render-ready view of the tracker after a mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerSnapshot {
    pub calorie_limit: i64,
    pub total_calories: i64,
    pub calories_consumed: i64,
    pub calories_burned: i64,
    pub calories_remaining: i64,
    pub progress_percentage: f64,
    pub status: BudgetStatus,
    pub meals: Vec<Entry>,
    pub workouts: Vec<Entry>,
}

/// In-memory calorie ledger with write-through persistence.
pub struct CaloriesTracker<B: KeyValueBackend> {
    store: PersistenceStore<B>,
    calorie_limit: i64,
    total_calories: i64,
    meals: Vec<Entry>,
    workouts: Vec<Entry>,
}

impl<B: KeyValueBackend> CaloriesTracker<B> {
    /// Seeds a tracker from persisted state.
    ///
    /// Missing or unreadable values fall back to `default_limit`, a zero
    /// total and empty lists. A persisted total that disagrees with the
    /// persisted lists is recomputed from the lists and written back.
    pub fn initialize(store: PersistenceStore<B>, default_limit: i64) -> StoreResult<Self> {
        let calorie_limit = store.get_calorie_limit(default_limit)?;
        let stored_total = store.get_total_calories(0)?;
        let meals = store.get_meals()?;
        let workouts = store.get_workouts()?;

        let mut tracker = Self {
            store,
            calorie_limit,
            total_calories: stored_total,
            meals,
            workouts,
        };

        let expected = tracker.recomputed_total();
        if stored_total != expected {
            warn!(
                "event=total_reconciled module=tracker status=repaired stored_total={} recomputed_total={}",
                stored_total, expected
            );
            tracker.store.update_total_calories(expected)?;
            tracker.total_calories = expected;
        }

        info!(
            "event=tracker_init module=tracker status=ok meals={} workouts={} limit={} total={}",
            tracker.meals.len(),
            tracker.workouts.len(),
            tracker.calorie_limit,
            tracker.total_calories
        );
        Ok(tracker)
    }

    /// Appends a meal and raises the total by its calories.
    pub fn add_meal(&mut self, meal: Entry) -> StoreResult<()> {
        self.add_entry(EntryKind::Meal, meal)
    }

    /// Removes the first meal with `id`; returns whether one was removed.
    pub fn remove_meal(&mut self, id: &EntryId) -> StoreResult<bool> {
        self.remove_entry(EntryKind::Meal, id)
    }

    /// Appends a workout and lowers the total by its calories.
    pub fn add_workout(&mut self, workout: Entry) -> StoreResult<()> {
        self.add_entry(EntryKind::Workout, workout)
    }

    /// Removes the first workout with `id`; returns whether one was removed.
    pub fn remove_workout(&mut self, id: &EntryId) -> StoreResult<bool> {
        self.remove_entry(EntryKind::Workout, id)
    }

    /// Replaces the calorie limit in memory and in the store.
    pub fn set_limit(&mut self, limit: i64) -> StoreResult<()> {
        self.store.set_calorie_limit(limit)?;
        self.calorie_limit = limit;
        info!("event=limit_set module=tracker status=ok limit={limit}");
        Ok(())
    }

    /// Clears the total and both lists; the limit is kept.
    pub fn reset(&mut self) -> StoreResult<()> {
        self.store.clear_all()?;
        self.total_calories = 0;
        self.meals.clear();
        self.workouts.clear();
        info!("event=tracker_reset module=tracker status=ok");
        Ok(())
    }

    pub fn calorie_limit(&self) -> i64 {
        self.calorie_limit
    }

    pub fn total_calories(&self) -> i64 {
        self.total_calories
    }

    pub fn meals(&self) -> &[Entry] {
        &self.meals
    }

    pub fn workouts(&self) -> &[Entry] {
        &self.workouts
    }

    /// Entries of `kind` in insertion order.
    pub fn entries(&self, kind: EntryKind) -> &[Entry] {
        match kind {
            EntryKind::Meal => &self.meals,
            EntryKind::Workout => &self.workouts,
        }
    }

    pub fn store(&self) -> &PersistenceStore<B> {
        &self.store
    }

    pub fn calories_consumed(&self) -> i64 {
        sum_calories(&self.meals)
    }

    pub fn calories_burned(&self) -> i64 {
        sum_calories(&self.workouts)
    }

    /// Limit minus total, saturating at the `i64` bounds.
    pub fn calories_remaining(&self) -> i64 {
        self.calorie_limit.saturating_sub(self.total_calories)
    }

    /// Share of the limit used so far, in `[0, 100]`.
    ///
    /// A limit of zero or below has no meaningful ratio and reports a full bar.
    pub fn progress_percentage(&self) -> f64 {
        if self.calorie_limit <= 0 {
            return 100.0;
        }
        let percentage = self.total_calories as f64 / self.calorie_limit as f64 * 100.0;
        percentage.clamp(0.0, 100.0)
    }

    pub fn budget_status(&self) -> BudgetStatus {
        if self.calories_remaining() <= 0 {
            BudgetStatus::AtOrOverLimit
        } else {
            BudgetStatus::UnderLimit
        }
    }

    /// Balance derived from the lists alone.
    pub fn recomputed_total(&self) -> i64 {
        self.calories_consumed()
            .saturating_sub(self.calories_burned())
    }

    /// Entries of `kind` whose name contains `query`, ignoring case.
    pub fn filter(&self, kind: EntryKind, query: &str) -> Vec<&Entry> {
        let needle = query.trim().to_lowercase();
        self.entries(kind)
            .iter()
            .filter(|entry| needle.is_empty() || entry.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            calorie_limit: self.calorie_limit,
            total_calories: self.total_calories,
            calories_consumed: self.calories_consumed(),
            calories_burned: self.calories_burned(),
            calories_remaining: self.calories_remaining(),
            progress_percentage: self.progress_percentage(),
            status: self.budget_status(),
            meals: self.meals.clone(),
            workouts: self.workouts.clone(),
        }
    }

    fn add_entry(&mut self, kind: EntryKind, entry: Entry) -> StoreResult<()> {
        let total = self.total_calories.saturating_add(kind.signed(entry.calories));
        self.store.save_entry(kind, &entry)?;
        self.store.update_total_calories(total)?;

        info!(
            "event=entry_add module=tracker status=ok kind={} id={} total={}",
            kind.label(),
            entry.id,
            total
        );
        self.total_calories = total;
        self.list_mut(kind).push(entry);
        Ok(())
    }

    fn remove_entry(&mut self, kind: EntryKind, id: &EntryId) -> StoreResult<bool> {
        let Some(index) = self.entries(kind).iter().position(|entry| &entry.id == id) else {
            return Ok(false);
        };
        let calories = self.entries(kind)[index].calories;
        let total = self.total_calories.saturating_sub(kind.signed(calories));
        self.store.remove_entry(kind, id)?;
        self.store.update_total_calories(total)?;

        info!(
            "event=entry_remove module=tracker status=ok kind={} id={} total={}",
            kind.label(),
            id,
            total
        );
        self.total_calories = total;
        self.list_mut(kind).remove(index);
        Ok(true)
    }

    fn list_mut(&mut self, kind: EntryKind) -> &mut Vec<Entry> {
        match kind {
            EntryKind::Meal => &mut self.meals,
            EntryKind::Workout => &mut self.workouts,
        }
    }
}

fn sum_calories(entries: &[Entry]) -> i64 {
    entries.iter().map(|entry| i64::from(entry.calories)).sum()
}
