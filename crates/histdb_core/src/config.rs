//! Extraction run configuration.
//!
//! # Responsibility
//! - Hold the knobs of one extraction run with stable defaults.
//! - Load overrides from a JSON file and validate them before a run starts.
//!
//! # Invariants
//! - Caller label names are non-blank, unique and avoid reserved columns
//!   (all compared case-insensitively).
//! - At least one input extension is configured.

use crate::model::record::BinMode;
use crate::schema::RESERVED_COLUMNS;
use crate::source::JSON_EXTENSION;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Name of the depth-0 normalization histogram skipped by default.
pub const DEFAULT_SKIP_ROOT_HIST: &str = "N";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Leading label-column names, in order.
    pub label_names: Vec<String>,
    pub bin_mode: BinMode,
    /// Depth-0 histogram name excluded from extraction; `None` keeps all.
    pub skip_root_hist: Option<String>,
    /// Accepted input extensions, without the leading dot.
    pub extensions: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            label_names: Vec::new(),
            bin_mode: BinMode::Content,
            skip_root_hist: Some(DEFAULT_SKIP_ROOT_HIST.to_string()),
            extensions: vec![JSON_EXTENSION.to_string()],
        }
    }
}

impl ExtractConfig {
    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for name in &self.label_names {
            if name.trim().is_empty() {
                return Err(ConfigError::BlankLabelName);
            }
            let folded = name.to_ascii_lowercase();
            if RESERVED_COLUMNS.contains(&folded.as_str()) {
                return Err(ConfigError::ReservedLabelName(name.clone()));
            }
            if !seen.insert(folded) {
                return Err(ConfigError::DuplicateLabelName(name.clone()));
            }
        }

        if self.extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        if let Some(extension) = self
            .extensions
            .iter()
            .find(|extension| extension.trim().is_empty() || extension.starts_with('.'))
        {
            return Err(ConfigError::InvalidExtension(extension.clone()));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        message: String,
    },
    BlankLabelName,
    DuplicateLabelName(String),
    ReservedLabelName(String),
    NoExtensions,
    /// Extension is blank, starts with a dot, or cannot form a name pattern.
    InvalidExtension(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "invalid config `{}`: {message}", path.display())
            }
            Self::BlankLabelName => write!(f, "label names must not be blank"),
            Self::DuplicateLabelName(name) => write!(f, "duplicate label name `{name}`"),
            Self::ReservedLabelName(name) => {
                write!(f, "label name `{name}` is reserved for a non-label column")
            }
            Self::NoExtensions => write!(f, "at least one input extension is required"),
            Self::InvalidExtension(extension) => {
                write!(f, "invalid input extension `{extension}`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
