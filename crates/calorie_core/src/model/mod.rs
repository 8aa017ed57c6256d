//! Domain model for logged meals and workouts.
//!
//! # Responsibility
//! - Define the canonical entry record shared by the meal and workout lists.
//! - Keep the sign of an entry's effect on the balance outside the record.
//!
//! # Invariants
//! - Every entry is identified by a stable, non-empty `EntryId`.
//! - Stored calorie counts are never negative; the owning list decides
//!   whether they add to or subtract from the running total.

pub mod entry;
