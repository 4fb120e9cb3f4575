//! Histogram source access.
//!
//! # Responsibility
//! - Define the reader seam through which container files are opened.
//! - Enforce the `<name>.<extension>` input file-name contract.
//!
//! # Invariants
//! - A reader either returns a fully parsed tree or an error; there is no
//!   partially opened source.

use crate::model::tree::SourceTree;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

mod input_name;
mod json_reader;

pub use input_name::InputNamePattern;
pub use json_reader::{JsonSourceReader, JSON_EXTENSION};

pub type SourceResult<T> = Result<T, SourceError>;

/// Failure to open a source or to interpret its content.
#[derive(Debug)]
pub enum SourceError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// File was readable but its content is not a valid source tree.
    Corrupt { path: PathBuf, message: String },
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot open `{}`: {source}", path.display())
            }
            Self::Corrupt { path, message } => {
                write!(f, "invalid source `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Corrupt { .. } => None,
        }
    }
}

/// Opens histogram container files as in-memory trees.
pub trait SourceReader {
    fn open(&self, path: &Path) -> SourceResult<SourceTree>;
}
