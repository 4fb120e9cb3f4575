//! Output tables for extracted histograms.
//!
//! # Responsibility
//! - Create the `axes` and `hist` tables for a reconciled label schema.
//! - Insert all rows of one run inside one transaction.
//!
//! # Invariants
//! - DDL and inserts commit together or not at all.
//! - `hist` rows keep corpus order; `axes` rows follow ascending id.
//! - Bin values are written with 6 significant digits, edges exactly.

use crate::db::{DbError, DbResult, OUTPUT_FORMAT_VERSION};
use crate::model::axis::Axis;
use crate::model::record::HistogramRecord;
use crate::schema::{serialize_bins, serialize_edges, LabelSchema};
use log::{debug, error, info};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Transaction, TransactionBehavior};
use std::time::Instant;

pub const HIST_TABLE: &str = "hist";
pub const AXES_TABLE: &str = "axes";

const PROGRESS_EVERY_ROWS: usize = 10_000;

/// Row counts of one completed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub label_columns: usize,
    pub hist_rows: usize,
    pub axis_rows: usize,
}

/// Persistence contract for one extraction run's output tables.
pub trait HistStore {
    fn write_tables(
        &self,
        schema: &LabelSchema,
        axes: &[Axis],
        records: &[HistogramRecord],
    ) -> DbResult<WriteSummary>;
}

/// SQLite-backed output store.
pub struct SqliteHistStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHistStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl HistStore for SqliteHistStore<'_> {
    fn write_tables(
        &self,
        schema: &LabelSchema,
        axes: &[Axis],
        records: &[HistogramRecord],
    ) -> DbResult<WriteSummary> {
        let started_at = Instant::now();
        info!(
            "event=output_write module=repo status=start label_columns={} hist_rows={} axis_rows={}",
            schema.width(),
            records.len(),
            axes.len()
        );

        match write_in_transaction(self.conn, schema, axes, records) {
            Ok(summary) => {
                info!(
                    "event=output_write module=repo status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(summary)
            }
            Err(err) => {
                error!(
                    "event=output_write module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn write_in_transaction(
    conn: &Connection,
    schema: &LabelSchema,
    axes: &[Axis],
    records: &[HistogramRecord],
) -> DbResult<WriteSummary> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(DbError::statement("BEGIN IMMEDIATE"))?;

    let format_marker = format!("PRAGMA user_version = {OUTPUT_FORMAT_VERSION};");
    tx.execute_batch(&format_marker)
        .map_err(DbError::statement(format_marker.as_str()))?;

    let axes_ddl = create_axes_sql();
    tx.execute_batch(&axes_ddl)
        .map_err(DbError::statement(axes_ddl.as_str()))?;
    let hist_ddl = create_hist_sql(schema);
    tx.execute_batch(&hist_ddl)
        .map_err(DbError::statement(hist_ddl.as_str()))?;

    insert_axes(&tx, axes)?;
    insert_hists(&tx, schema, records)?;

    tx.commit().map_err(DbError::statement("COMMIT"))?;
    Ok(WriteSummary {
        label_columns: schema.width(),
        hist_rows: records.len(),
        axis_rows: axes.len(),
    })
}

fn insert_axes(tx: &Transaction<'_>, axes: &[Axis]) -> DbResult<()> {
    let sql = format!("INSERT INTO {AXES_TABLE} (id, edges) VALUES (?1, ?2);");
    let mut stmt = tx.prepare(&sql).map_err(DbError::statement(sql.as_str()))?;
    for axis in axes {
        stmt.execute(params![i64::from(axis.id), serialize_edges(&axis.edges)])
            .map_err(DbError::statement(sql.as_str()))?;
    }
    Ok(())
}

fn insert_hists(
    tx: &Transaction<'_>,
    schema: &LabelSchema,
    records: &[HistogramRecord],
) -> DbResult<()> {
    let placeholders = vec!["?"; schema.width() + 2].join(", ");
    let sql = format!("INSERT INTO {HIST_TABLE} VALUES ({placeholders});");
    let mut stmt = tx.prepare(&sql).map_err(DbError::statement(sql.as_str()))?;

    for (row, record) in records.iter().enumerate() {
        let mut values: Vec<Value> = schema
            .row_labels(record)
            .into_iter()
            .map(|label| Value::Text(label.to_string()))
            .collect();
        values.push(Value::Integer(i64::from(record.axis)));
        values.push(Value::Text(serialize_bins(&record.bins)));

        stmt.execute(params_from_iter(values))
            .map_err(DbError::statement(sql.as_str()))?;

        if (row + 1) % PROGRESS_EVERY_ROWS == 0 {
            debug!(
                "event=output_write module=repo status=progress hist_rows={}/{}",
                row + 1,
                records.len()
            );
        }
    }
    Ok(())
}

fn create_axes_sql() -> String {
    format!(
        "CREATE TABLE {AXES_TABLE} (
    id INTEGER PRIMARY KEY,
    edges TEXT NOT NULL
);"
    )
}

fn create_hist_sql(schema: &LabelSchema) -> String {
    let mut sql = format!("CREATE TABLE {HIST_TABLE} (");
    for column in schema.columns() {
        sql.push_str(&format!("\n    {} TEXT,", quote_identifier(column)));
    }
    sql.push_str(&format!(
        "\n    axis INTEGER NOT NULL REFERENCES {AXES_TABLE}(id),\n    bins TEXT NOT NULL\n);"
    ));
    sql
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
