//! Extracted histogram records.
//!
//! # Invariants
//! - `bins` covers bin indices `0..=N+1` (underflow through overflow).
//! - `bins.len() == (axis edge count + 1) * mode.values_per_bin()`.

use super::axis::AxisId;
use serde::{Deserialize, Serialize};

/// Which per-bin values are captured into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinMode {
    /// One value per bin: the bin content.
    #[default]
    Content,
    /// Two interleaved values per bin: content, then error.
    ContentWithErrors,
}

impl BinMode {
    pub fn values_per_bin(self) -> usize {
        match self {
            Self::Content => 1,
            Self::ContentWithErrors => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::ContentWithErrors => "content_with_errors",
        }
    }
}

/// One leaf histogram after relabeling and axis interning.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramRecord {
    /// Root tokens, then directory tokens, then leaf-name tokens.
    pub labels: Vec<String>,
    pub axis: AxisId,
    pub bins: Vec<f64>,
}
