//! Name tokenization rules for histogram labels.
//!
//! # Responsibility
//! - Split source root names and directory names into alphanumeric runs.
//! - Split leaf histogram names into underscore-joined field pairs.
//!
//! # Invariants
//! - Tokens are returned in the order they occur in the input.
//! - Empty or separator-only input yields an empty vector.

use once_cell::sync::Lazy;
use regex::Regex;

static SIMPLE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[[:alnum:]]+").expect("valid simple-run regex"));
static PAIRED_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^_]+_[^_]+").expect("valid paired-run regex"));

/// Token extraction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRule {
    /// Maximal runs of alphanumeric characters; everything else separates.
    SimpleRun,
    /// `field_field` pairs, leftmost first, non-overlapping.
    ///
    /// Leaf names pack two semantic fields per underscore-joined segment, so
    /// `a_b_c_d` yields `a_b` and `c_d`. A trailing unpaired field is dropped.
    PairedRun,
}

impl TokenRule {
    fn regex(self) -> &'static Regex {
        match self {
            Self::SimpleRun => &SIMPLE_RUN_RE,
            Self::PairedRun => &PAIRED_RUN_RE,
        }
    }
}

/// Splits `name` into label tokens according to `rule`.
pub fn tokenize(name: &str, rule: TokenRule) -> Vec<String> {
    rule.regex()
        .find_iter(name)
        .map(|token| token.as_str().to_string())
        .collect()
}
