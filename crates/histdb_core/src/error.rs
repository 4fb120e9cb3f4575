//! Run-level error taxonomy.
//!
//! Every variant is fatal for a batch run: nothing is retried and no partial
//! output is kept.

use crate::config::ConfigError;
use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type ExtractResult<T> = Result<T, ExtractError>;

#[derive(Debug)]
pub enum ExtractError {
    /// Input base name does not match `<name>.<known-extension>`.
    InputFormat { path: PathBuf },
    /// Input cannot be opened or holds a structurally invalid tree.
    SourceUnavailable { path: PathBuf, reason: String },
    /// Output store failure.
    Store(DbError),
    Config(ConfigError),
}

impl Display for ExtractError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputFormat { path } => write!(
                f,
                "file name `{}` did not match required format <name>.<extension>",
                path.display()
            ),
            Self::SourceUnavailable { path, reason } => {
                write!(f, "cannot use source `{}`: {reason}", path.display())
            }
            Self::Store(err) => write!(f, "output store error: {err}"),
            Self::Config(err) => write!(f, "configuration error: {err}"),
        }
    }
}

impl Error for ExtractError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InputFormat { .. } => None,
            Self::SourceUnavailable { .. } => None,
            Self::Store(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<DbError> for ExtractError {
    fn from(value: DbError) -> Self {
        Self::Store(value)
    }
}

impl From<rusqlite::Error> for ExtractError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(DbError::Sqlite(value))
    }
}

impl From<ConfigError> for ExtractError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}
