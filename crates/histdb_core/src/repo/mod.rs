//! Output persistence.
//!
//! # Responsibility
//! - Isolate SQL details of the `hist` and `axes` tables from extraction.
//!
//! # Invariants
//! - One write call produces both tables atomically.

pub mod hist_repo;
