//! Histogram tree to SQLite extraction engine.
//!
//! Walks trees of named histograms from one or more sources, deduplicates
//! their bin-edge axes, labels each histogram from its path and name, and
//! writes `hist` and `axes` tables with a reconciled label schema.

pub mod config;
pub mod db;
pub mod error;
pub mod label;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod service;
pub mod source;

pub use config::{ConfigError, ExtractConfig, DEFAULT_SKIP_ROOT_HIST};
pub use error::{ExtractError, ExtractResult};
pub use label::tokenizer::{tokenize, TokenRule};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::axis::{Axis, AxisId, AxisInterner};
pub use model::record::{BinMode, HistogramRecord};
pub use model::tree::{LeafHistogram, SourceNode, SourceTree};
pub use repo::hist_repo::{HistStore, SqliteHistStore, WriteSummary};
pub use schema::LabelSchema;
pub use service::extract_service::{run_extraction, ExtractSession};
pub use source::{JsonSourceReader, SourceError, SourceReader};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn core_version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
