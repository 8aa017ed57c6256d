//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory tracker state and keep persistence in step with it.
//! - Keep presentation layers decoupled from storage details.

pub mod tracker;
