//! SQLite output bootstrap.
//!
//! # Responsibility
//! - Create a fresh output database, replacing any previous file.
//! - Surface SQLite failures together with the statement that caused them.
//!
//! # Invariants
//! - Output files are never appended to or merged with prior content.
//! - A written output carries `OUTPUT_FORMAT_VERSION` in `PRAGMA user_version`.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod open;

pub use open::{create_output_db, open_db_in_memory};

/// Layout version of the `hist` + `axes` output tables.
pub const OUTPUT_FORMAT_VERSION: u32 = 1;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// A specific statement failed; `sql` is the statement text.
    Statement {
        sql: String,
        source: rusqlite::Error,
    },
    /// A previous output file exists and could not be removed.
    RemoveOutput {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl DbError {
    pub(crate) fn statement(sql: &str) -> impl FnOnce(rusqlite::Error) -> Self + '_ {
        move |source| Self::Statement {
            sql: sql.to_string(),
            source,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Statement { sql, source } => {
                write!(f, "statement failed: {source}\n  statement: {sql}")
            }
            Self::RemoveOutput { path, source } => write!(
                f,
                "cannot remove existing output `{}`: {source}",
                path.display()
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Statement { source, .. } => Some(source),
            Self::RemoveOutput { source, .. } => Some(source),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
