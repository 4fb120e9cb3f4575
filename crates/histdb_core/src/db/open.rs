//! Connection bootstrap for output databases.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - `create_output_db` never opens a pre-existing file.

use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

/// Removes `path` if it exists and opens a fresh SQLite database there.
///
/// # Side effects
/// - Deletes any previous file at `path`.
/// - Emits `db_open` logging events with duration and status.
pub fn create_output_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!(
        "event=db_open module=db status=start mode=file path={}",
        path.display()
    );

    let result = remove_previous_output(path)
        .and_then(|()| Connection::open(path).map_err(DbError::from))
        .and_then(|conn| bootstrap_connection(&conn).map(|()| conn));

    match result {
        Ok(conn) => {
            info!(
                "event=db_open module=db status=ok mode=file duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens an in-memory database with the same connection setup.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let conn = Connection::open_in_memory()?;
    bootstrap_connection(&conn)?;
    Ok(conn)
}

fn remove_previous_output(path: &Path) -> DbResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            info!(
                "event=output_replace module=db status=ok path={}",
                path.display()
            );
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(DbError::RemoveOutput {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn bootstrap_connection(conn: &Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(())
}
