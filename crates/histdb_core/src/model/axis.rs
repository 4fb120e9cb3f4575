//! Bin-edge axes and content-based axis interning.
//!
//! # Responsibility
//! - Deduplicate bin-edge sequences across a whole extraction run.
//! - Assign contiguous, first-seen-ordered axis ids.
//!
//! # Invariants
//! - Two sequences share an id iff they are element-wise value-equal.
//! - No floating-point tolerance is applied; sequences differing in the last
//!   bit of any element get distinct ids.
//! - Ids are never reassigned for the lifetime of one interner.

use std::collections::HashMap;

/// Integer id of one deduplicated axis, 0-based in first-seen order.
pub type AxisId = u32;

/// Canonical bin-edge sequence for one axis.
///
/// Holds `N + 1` ascending low edges for an `N`-bin histogram (the last one
/// is the overflow boundary).
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub id: AxisId,
    pub edges: Vec<f64>,
}

impl Axis {
    /// Number of regular bins described by this axis.
    pub fn bin_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }
}

/// Hashable key derived from the exact bit pattern of each edge.
///
/// `-0.0` is folded onto `+0.0` so the key follows value equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AxisKey(Vec<u64>);

impl AxisKey {
    fn from_edges(edges: &[f64]) -> Self {
        Self(
            edges
                .iter()
                .map(|&edge| {
                    let canonical = if edge == 0.0 { 0.0f64 } else { edge };
                    canonical.to_bits()
                })
                .collect(),
        )
    }
}

/// Run-scoped axis deduplication table.
#[derive(Debug, Default)]
pub struct AxisInterner {
    index: HashMap<AxisKey, AxisId>,
    axes: Vec<Axis>,
}

impl AxisInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `edges`, registering a new axis on first sight.
    ///
    /// The first-seen sequence becomes the canonical edges stored for the id.
    pub fn intern(&mut self, edges: &[f64]) -> AxisId {
        let key = AxisKey::from_edges(edges);
        if let Some(id) = self.index.get(&key) {
            return *id;
        }

        let id = self.axes.len() as AxisId;
        self.axes.push(Axis {
            id,
            edges: edges.to_vec(),
        });
        self.index.insert(key, id);
        id
    }

    pub fn get(&self, id: AxisId) -> Option<&Axis> {
        self.axes.get(id as usize)
    }

    /// All axes in ascending id order.
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// Forgets every axis with id `>= len`.
    ///
    /// Used to undo the axes registered by a source that failed mid-walk.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.axes.len() {
            return;
        }
        for axis in self.axes.drain(len..) {
            self.index.remove(&AxisKey::from_edges(&axis.edges));
        }
    }
}
