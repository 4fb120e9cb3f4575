//! Extraction session: one run from input sources to output tables.
//!
//! # Responsibility
//! - Own the axis interner and corpus shared by all inputs of one run.
//! - Map per-source failures to run-level errors with file context.
//! - Write the reconciled output once, after every input is consumed.
//!
//! # Invariants
//! - Axis ids and label-schema width are computed over the whole batch.
//! - Identical inputs in identical order produce identical output.
//! - Any error aborts before the output file is touched.
//! - A source that fails mid-walk contributes no records and no axes.

use crate::config::{ConfigError, ExtractConfig};
use crate::db::create_output_db;
use crate::error::{ExtractError, ExtractResult};
use crate::label::tokenizer::{tokenize, TokenRule};
use crate::model::axis::AxisInterner;
use crate::model::record::HistogramRecord;
use crate::model::tree::SourceTree;
use crate::repo::hist_repo::{HistStore, SqliteHistStore, WriteSummary};
use crate::schema::LabelSchema;
use crate::service::walker::TreeWalker;
use crate::source::{InputNamePattern, SourceReader};
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// State of one extraction run.
pub struct ExtractSession {
    config: ExtractConfig,
    name_pattern: InputNamePattern,
    interner: AxisInterner,
    corpus: Vec<HistogramRecord>,
}

impl ExtractSession {
    /// Creates an empty session after validating `config`.
    pub fn new(config: ExtractConfig) -> ExtractResult<Self> {
        config.validate()?;
        let name_pattern = InputNamePattern::new(&config.extensions)
            .map_err(|err| ConfigError::InvalidExtension(err.to_string()))?;

        Ok(Self {
            config,
            name_pattern,
            interner: AxisInterner::new(),
            corpus: Vec::new(),
        })
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Opens `path` with `reader` and appends its histograms to the corpus.
    ///
    /// Returns the number of records extracted from this source.
    pub fn ingest_file(&mut self, path: &Path, reader: &dyn SourceReader) -> ExtractResult<usize> {
        let Some(source_name) = self.name_pattern.source_name(path) else {
            error!(
                "event=source_ingest module=service status=error error_code=input_format path={}",
                path.display()
            );
            return Err(ExtractError::InputFormat {
                path: path.to_path_buf(),
            });
        };
        let source_name = source_name.to_string();

        let tree = reader.open(path).map_err(|err| {
            error!(
                "event=source_ingest module=service status=error error_code=source_unavailable error={}",
                err
            );
            ExtractError::SourceUnavailable {
                path: path.to_path_buf(),
                reason: err.to_string(),
            }
        })?;

        self.ingest_source(path, &source_name, &tree)
    }

    /// Appends histograms of an already opened tree named `source_name`.
    ///
    /// `source_name` is tokenized into root labels like a file stem.
    pub fn ingest_tree(&mut self, source_name: &str, tree: &SourceTree) -> ExtractResult<usize> {
        self.ingest_source(Path::new(source_name), source_name, tree)
    }

    fn ingest_source(
        &mut self,
        path: &Path,
        source_name: &str,
        tree: &SourceTree,
    ) -> ExtractResult<usize> {
        let started_at = Instant::now();
        let root_labels = tokenize(source_name, TokenRule::SimpleRun);
        let corpus_len = self.corpus.len();
        let axes_len = self.interner.len();

        let mut walker = TreeWalker::new(
            &mut self.interner,
            &mut self.corpus,
            self.config.bin_mode,
            self.config.skip_root_hist.as_deref(),
        );
        let stats = match walker.walk(tree, &root_labels) {
            Ok(stats) => stats,
            Err(err) => {
                self.corpus.truncate(corpus_len);
                self.interner.truncate(axes_len);
                error!(
                    "event=source_ingest module=service status=error error_code=invalid_tree path={} error={}",
                    path.display(),
                    err
                );
                return Err(ExtractError::SourceUnavailable {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                });
            }
        };

        info!(
            "event=source_ingest module=service status=ok path={} records={} skipped={} axes_total={} duration_ms={}",
            path.display(),
            stats.records,
            stats.skipped,
            self.interner.len(),
            started_at.elapsed().as_millis()
        );
        Ok(stats.records)
    }

    /// Records extracted so far, in insertion order.
    pub fn corpus(&self) -> &[HistogramRecord] {
        &self.corpus
    }

    pub fn interner(&self) -> &AxisInterner {
        &self.interner
    }

    /// Reconciles the label schema over the current corpus.
    pub fn schema(&self) -> LabelSchema {
        LabelSchema::reconcile(&self.corpus, &self.config.label_names)
    }

    /// Writes both output tables through an existing connection.
    pub fn write_to(&self, conn: &Connection) -> ExtractResult<WriteSummary> {
        let schema = self.schema();
        let summary =
            SqliteHistStore::new(conn).write_tables(&schema, self.interner.axes(), &self.corpus)?;
        Ok(summary)
    }

    /// Replaces `output` with a fresh database holding this session's tables.
    pub fn write_output(&self, output: &Path) -> ExtractResult<WriteSummary> {
        let conn = create_output_db(output)?;
        self.write_to(&conn)
    }
}

/// Runs a full extraction: ingest every input, then write `output` once.
///
/// Stops at the first failing input; `output` is left untouched in that case.
pub fn run_extraction(
    config: ExtractConfig,
    inputs: &[PathBuf],
    output: &Path,
    reader: &dyn SourceReader,
) -> ExtractResult<WriteSummary> {
    let started_at = Instant::now();
    let mut session = ExtractSession::new(config)?;

    for input in inputs {
        session.ingest_file(input, reader)?;
    }

    info!(
        "event=extract_run module=service status=ingested sources={} bin_mode={} records={} axes={} label_columns={}",
        inputs.len(),
        session.config().bin_mode.as_str(),
        session.corpus().len(),
        session.interner().len(),
        session.schema().width()
    );

    let summary = session.write_output(output)?;
    info!(
        "event=extract_run module=service status=ok output={} duration_ms={}",
        output.display(),
        started_at.elapsed().as_millis()
    );
    Ok(summary)
}
