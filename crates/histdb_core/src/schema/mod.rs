//! Label-column schema reconciliation and value serialization.
//!
//! # Responsibility
//! - Size one fixed label-column layout for the whole corpus.
//! - Render bin values and axis edges as comma-joined text.
//!
//! # Invariants
//! - Schema width is at least the longest label vector in the corpus.
//! - Column names are unique and never collide with `axis` or `bins`
//!   (compared case-insensitively, as SQLite does).
//! - Records are padded at row-emission time, never mutated.

mod format;

pub use format::{format_bin_value, format_edge_value, serialize_bins, serialize_edges};

use crate::model::record::HistogramRecord;
use std::collections::HashSet;

/// Column names reserved for non-label columns of the `hist` table.
pub const RESERVED_COLUMNS: &[&str] = &["axis", "bins"];

/// Prefix for generated label-column names.
pub const SYNTHETIC_LABEL_PREFIX: &str = "label";

/// Reconciled label-column layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSchema {
    columns: Vec<String>,
}

impl LabelSchema {
    /// Computes the schema for `records`, seeding it with `caller_names`.
    ///
    /// Width is the larger of the longest label vector and the number of
    /// caller names. Slots past the caller names are named `label<i>` by
    /// slot index; a clashing generated name gets a numeric suffix.
    pub fn reconcile(records: &[HistogramRecord], caller_names: &[String]) -> Self {
        let longest = records
            .iter()
            .map(|record| record.labels.len())
            .max()
            .unwrap_or(0);
        let width = longest.max(caller_names.len());

        let mut taken: HashSet<String> = RESERVED_COLUMNS
            .iter()
            .map(|name| name.to_string())
            .chain(caller_names.iter().map(|name| name.to_ascii_lowercase()))
            .collect();

        let mut columns = caller_names.to_vec();
        for slot in caller_names.len()..width {
            let base = format!("{SYNTHETIC_LABEL_PREFIX}{slot}");
            let mut candidate = base.clone();
            let mut suffix = 1usize;
            while taken.contains(&candidate.to_ascii_lowercase()) {
                candidate = format!("{base}_{suffix}");
                suffix += 1;
            }
            taken.insert(candidate.to_ascii_lowercase());
            columns.push(candidate);
        }

        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Label values for one `hist` row, right-padded with empty strings.
    pub fn row_labels<'a>(&self, record: &'a HistogramRecord) -> Vec<&'a str> {
        (0..self.width())
            .map(|slot| record.labels.get(slot).map_or("", String::as_str))
            .collect()
    }
}
