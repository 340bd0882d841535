//! Original node colors recorded before hover tinting

use std::collections::HashMap;

use crate::color::Rgba;
use crate::host::NodeId;

/// Original color per visual node.
///
/// A node maps to `None` when it had no color at the time it was recorded.
/// Entries are never removed; [`store`](Self::store) overwrites and
/// [`record_if_absent`](Self::record_if_absent) keeps the first value.
#[derive(Debug, Clone, Default)]
pub struct OriginalColorTable {
    colors: HashMap<NodeId, Option<Rgba>>,
}

impl OriginalColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record or overwrite the original color of a node
    pub fn store(&mut self, node: NodeId, color: Option<Rgba>) {
        self.colors.insert(node, color);
    }

    /// Record only if nothing is on record yet. Returns true if recorded.
    pub fn record_if_absent(&mut self, node: NodeId, color: Option<Rgba>) -> bool {
        if self.colors.contains_key(&node) {
            return false;
        }
        self.colors.insert(node, color);
        true
    }

    /// Whether anything (including a null color) is on record
    pub fn contains(&self, node: NodeId) -> bool {
        self.colors.contains_key(&node)
    }

    /// Recorded color, `None` if absent or recorded as colorless
    pub fn original(&self, node: NodeId) -> Option<Rgba> {
        self.colors.get(&node).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
