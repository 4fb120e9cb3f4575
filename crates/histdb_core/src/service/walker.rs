//! Recursive source-tree traversal.
//!
//! # Responsibility
//! - Visit every node of one source tree in enumeration order.
//! - Turn each leaf into a labeled record with an interned axis id.
//!
//! # Invariants
//! - Sub-trees extend the label prefix with their simple-run name tokens.
//! - Leaves append their paired-run name tokens to the prefix.
//! - The configured normalization histogram is skipped only at depth 0.
//! - A leaf is validated before its edges reach the interner.

use crate::label::tokenizer::{tokenize, TokenRule};
use crate::model::axis::AxisInterner;
use crate::model::record::{BinMode, HistogramRecord};
use crate::model::tree::{LeafHistogram, SourceNode, SourceTree};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type WalkResult<T> = Result<T, WalkError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkError {
    /// Leaf shape is inconsistent (edge/content/error lengths, edge order).
    InvalidLeaf { node_path: String, reason: String },
    /// Error-aware extraction found a leaf without per-bin errors.
    MissingErrors { node_path: String },
}

impl Display for WalkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLeaf { node_path, reason } => {
                write!(f, "histogram `{node_path}` is invalid: {reason}")
            }
            Self::MissingErrors { node_path } => {
                write!(f, "histogram `{node_path}` has no bin errors")
            }
        }
    }
}

impl Error for WalkError {}

/// Counters for one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub records: usize,
    pub skipped: usize,
}

/// Walks source trees into a shared corpus and axis interner.
pub struct TreeWalker<'a> {
    interner: &'a mut AxisInterner,
    corpus: &'a mut Vec<HistogramRecord>,
    bin_mode: BinMode,
    skip_root_hist: Option<&'a str>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        interner: &'a mut AxisInterner,
        corpus: &'a mut Vec<HistogramRecord>,
        bin_mode: BinMode,
        skip_root_hist: Option<&'a str>,
    ) -> Self {
        Self {
            interner,
            corpus,
            bin_mode,
            skip_root_hist,
        }
    }

    /// Visits `tree`, labeling every record with `root_labels` first.
    pub fn walk(&mut self, tree: &SourceTree, root_labels: &[String]) -> WalkResult<WalkStats> {
        let mut stats = WalkStats::default();
        self.visit(&tree.entries, root_labels, "", 0, &mut stats)?;
        Ok(stats)
    }

    fn visit(
        &mut self,
        nodes: &[SourceNode],
        prefix: &[String],
        parent_path: &str,
        depth: usize,
        stats: &mut WalkStats,
    ) -> WalkResult<()> {
        for node in nodes {
            let node_path = if parent_path.is_empty() {
                node.name().to_string()
            } else {
                format!("{parent_path}/{}", node.name())
            };

            match node {
                SourceNode::SubTree { name, entries } => {
                    let mut child_prefix = prefix.to_vec();
                    child_prefix.extend(tokenize(name, TokenRule::SimpleRun));
                    self.visit(entries, &child_prefix, &node_path, depth + 1, stats)?;
                }
                SourceNode::Leaf(leaf) => {
                    if depth == 0 && self.skip_root_hist == Some(leaf.name.as_str()) {
                        debug!(
                            "event=hist_skip module=walker status=ok name={}",
                            leaf.name
                        );
                        stats.skipped += 1;
                        continue;
                    }
                    let record = self.extract_leaf(leaf, prefix, &node_path)?;
                    self.corpus.push(record);
                    stats.records += 1;
                }
            }
        }
        Ok(())
    }

    fn extract_leaf(
        &mut self,
        leaf: &LeafHistogram,
        prefix: &[String],
        node_path: &str,
    ) -> WalkResult<HistogramRecord> {
        leaf.validate().map_err(|reason| WalkError::InvalidLeaf {
            node_path: node_path.to_string(),
            reason,
        })?;

        let bins = match self.bin_mode {
            BinMode::Content => leaf.contents.clone(),
            BinMode::ContentWithErrors => {
                let errors = leaf
                    .errors
                    .as_ref()
                    .ok_or_else(|| WalkError::MissingErrors {
                        node_path: node_path.to_string(),
                    })?;
                leaf.contents
                    .iter()
                    .zip(errors)
                    .flat_map(|(content, error)| [*content, *error])
                    .collect()
            }
        };

        let name_tokens = tokenize(&leaf.name, TokenRule::PairedRun);
        if name_tokens.is_empty() {
            warn!(
                "event=hist_labels module=walker status=empty_name_tokens path={}",
                node_path
            );
        }
        let mut labels = prefix.to_vec();
        labels.extend(name_tokens);

        Ok(HistogramRecord {
            labels,
            axis: self.interner.intern(&leaf.edges),
            bins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{TreeWalker, WalkError};
    use crate::model::axis::AxisInterner;
    use crate::model::record::BinMode;
    use crate::model::tree::{LeafHistogram, SourceNode, SourceTree};

    fn leaf(name: &str) -> SourceNode {
        SourceNode::Leaf(
            LeafHistogram::new(name, vec![0.0, 1.0, 2.0], vec![0.5, 1.0, 2.0, 0.25])
                .with_errors(vec![0.1, 1.0, 1.4, 0.5]),
        )
    }

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn nested_directories_extend_label_prefix() {
        let tree = SourceTree::new(vec![SourceNode::subtree(
            "photon-cuts",
            vec![SourceNode::subtree("all", vec![leaf("var1_pT_var2_eta")])],
        )]);
        let mut interner = AxisInterner::new();
        let mut corpus = Vec::new();

        let stats = TreeWalker::new(&mut interner, &mut corpus, BinMode::Content, Some("N"))
            .walk(&tree, &labels(&["run1"]))
            .unwrap();

        assert_eq!(stats.records, 1);
        assert_eq!(
            corpus[0].labels,
            labels(&["run1", "photon", "cuts", "all", "var1_pT", "var2_eta"])
        );
        assert_eq!(corpus[0].bins, vec![0.5, 1.0, 2.0, 0.25]);
    }

    #[test]
    fn error_mode_interleaves_content_and_error() {
        let tree = SourceTree::new(vec![leaf("a_b")]);
        let mut interner = AxisInterner::new();
        let mut corpus = Vec::new();

        TreeWalker::new(&mut interner, &mut corpus, BinMode::ContentWithErrors, None)
            .walk(&tree, &[])
            .unwrap();

        assert_eq!(
            corpus[0].bins,
            vec![0.5, 0.1, 1.0, 1.0, 2.0, 1.4, 0.25, 0.5]
        );
        let edges = interner.get(corpus[0].axis).unwrap().edges.len();
        assert_eq!(corpus[0].bins.len(), (edges + 1) * 2);
    }

    #[test]
    fn normalization_hist_skipped_only_at_depth_zero() {
        let tree = SourceTree::new(vec![
            leaf("N"),
            SourceNode::subtree("cat", vec![leaf("N")]),
        ]);
        let mut interner = AxisInterner::new();
        let mut corpus = Vec::new();

        let stats = TreeWalker::new(&mut interner, &mut corpus, BinMode::Content, Some("N"))
            .walk(&tree, &labels(&["run"]))
            .unwrap();

        assert_eq!(stats.skipped, 1);
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].labels, labels(&["run", "cat"]));
    }

    #[test]
    fn invalid_leaf_reports_node_path_and_leaves_interner_untouched() {
        let bad = SourceNode::Leaf(LeafHistogram::new("x_y", vec![0.0, 1.0], vec![1.0]));
        let tree = SourceTree::new(vec![SourceNode::subtree("cat", vec![bad])]);
        let mut interner = AxisInterner::new();
        let mut corpus = Vec::new();

        let err = TreeWalker::new(&mut interner, &mut corpus, BinMode::Content, None)
            .walk(&tree, &[])
            .unwrap_err();

        assert!(matches!(err, WalkError::InvalidLeaf { ref node_path, .. } if node_path == "cat/x_y"));
        assert!(interner.is_empty());
        assert!(corpus.is_empty());
    }

    #[test]
    fn error_mode_requires_errors() {
        let tree = SourceTree::new(vec![SourceNode::Leaf(LeafHistogram::new(
            "a_b",
            vec![0.0, 1.0],
            vec![0.0, 1.0, 0.0],
        ))]);
        let mut interner = AxisInterner::new();
        let mut corpus = Vec::new();

        let err = TreeWalker::new(&mut interner, &mut corpus, BinMode::ContentWithErrors, None)
            .walk(&tree, &[])
            .unwrap_err();
        assert_eq!(
            err,
            WalkError::MissingErrors {
                node_path: "a_b".to_string()
            }
        );
    }
}
