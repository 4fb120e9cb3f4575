//! Domain model for histogram extraction.
//!
//! # Responsibility
//! - Define the source tree shape consumed by the walker.
//! - Define extracted histogram records and deduplicated axes.
//!
//! # Invariants
//! - Records reference axes by id only; axes are owned by the interner.
//! - Records are immutable once appended to a corpus.

pub mod axis;
pub mod record;
pub mod tree;
