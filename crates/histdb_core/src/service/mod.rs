//! Extraction use-case services.
//!
//! # Responsibility
//! - Drive traversal of every input into one run-scoped corpus.
//! - Hand the finished corpus to the output store exactly once.

pub mod extract_service;
pub mod walker;
