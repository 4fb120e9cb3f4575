//! Input file-name contract.

use regex::Regex;
use std::path::Path;

/// Matches `<name>.<extension>` base names for a fixed set of extensions.
#[derive(Debug, Clone)]
pub struct InputNamePattern {
    regex: Regex,
}

impl InputNamePattern {
    /// Builds a pattern accepting any of `extensions` (given without dot).
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Result<Self, regex::Error> {
        let alternatives = extensions
            .iter()
            .map(|extension| regex::escape(extension.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&format!(r"^(.+)\.(?:{alternatives})$"))?;
        Ok(Self { regex })
    }

    /// Returns the `<name>` part of the path's base name, ignoring any
    /// leading directories, or `None` when the base name does not match.
    pub fn source_name<'a>(&self, path: &'a Path) -> Option<&'a str> {
        let base_name = path.file_name()?.to_str()?;
        self.regex
            .captures(base_name)
            .and_then(|captures| captures.get(1))
            .map(|name| name.as_str())
    }
}
