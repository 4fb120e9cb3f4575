//! Source namespace tree.
//!
//! # Responsibility
//! - Represent an opened histogram container as sub-trees and leaves.
//! - Validate leaf shape before any record is derived from it.
//!
//! # Invariants
//! - A leaf with `N` bins carries `N + 1` edges and `N + 2` contents.
//! - Errors, when present, have the same length as contents.

use serde::{Deserialize, Serialize};

/// Root of one opened source: its top-level nodes in enumeration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceTree {
    #[serde(default)]
    pub entries: Vec<SourceNode>,
}

impl SourceTree {
    pub fn new(entries: Vec<SourceNode>) -> Self {
        Self { entries }
    }
}

/// One node of a source tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceNode {
    /// Named directory holding child nodes in source enumeration order.
    #[serde(rename = "dir")]
    SubTree {
        name: String,
        #[serde(default)]
        entries: Vec<SourceNode>,
    },
    #[serde(rename = "hist")]
    Leaf(LeafHistogram),
}

impl SourceNode {
    pub fn subtree(name: impl Into<String>, entries: Vec<SourceNode>) -> Self {
        Self::SubTree {
            name: name.into(),
            entries,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::SubTree { name, .. } => name,
            Self::Leaf(leaf) => &leaf.name,
        }
    }
}

/// Histogram payload of a leaf node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafHistogram {
    pub name: String,
    /// Low edges of bins `1..=N+1`.
    pub edges: Vec<f64>,
    /// Contents of bins `0..=N+1`.
    pub contents: Vec<f64>,
    /// Errors of bins `0..=N+1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<f64>>,
}

impl LeafHistogram {
    pub fn new(name: impl Into<String>, edges: Vec<f64>, contents: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            edges,
            contents,
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<f64>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Number of regular bins.
    pub fn bin_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// Checks structural consistency of edges, contents and errors.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.edges.len() < 2 {
            return Err(format!(
                "expected at least 2 edges, got {}",
                self.edges.len()
            ));
        }
        if let Some(edge) = self.edges.iter().find(|edge| !edge.is_finite()) {
            return Err(format!("edge {edge} is not finite"));
        }
        if let Some(pair) = self.edges.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(format!(
                "edges must be strictly ascending, found {} before {}",
                pair[0], pair[1]
            ));
        }

        let expected = self.edges.len() + 1;
        if self.contents.len() != expected {
            return Err(format!(
                "expected {expected} contents for {} bins, got {}",
                self.bin_count(),
                self.contents.len()
            ));
        }
        if let Some(errors) = &self.errors {
            if errors.len() != expected {
                return Err(format!(
                    "expected {expected} errors for {} bins, got {}",
                    self.bin_count(),
                    errors.len()
                ));
            }
        }
        Ok(())
    }
}
