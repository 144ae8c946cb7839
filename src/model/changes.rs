//! Change journal for a [`Model`](super::Model).
//!
//! Every element the graph allocates or frees is recorded here, in order.
//! Import sessions take a [`ChangeMark`] before they start and ask for the
//! elements created since, which is how the drivers report "newly created
//! this session" without the modeller keeping its own copies.

use super::ids::NodeId;

/// Position in the journal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeMark {
    created: usize,
    removed: usize,
}

#[derive(Clone, Debug, Default)]
pub struct ChangeTracker {
    created: Vec<NodeId>,
    removed: Vec<NodeId>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn record_created(&mut self, id: NodeId) {
        self.created.push(id);
    }

    pub(super) fn record_removed(&mut self, id: NodeId) {
        self.removed.push(id);
    }

    pub fn mark(&self) -> ChangeMark {
        ChangeMark {
            created: self.created.len(),
            removed: self.removed.len(),
        }
    }

    /// Elements created since `mark` (including ones removed again).
    pub fn created_since(&self, mark: ChangeMark) -> &[NodeId] {
        &self.created[mark.created.min(self.created.len())..]
    }

    /// Elements removed since `mark`.
    pub fn removed_since(&self, mark: ChangeMark) -> &[NodeId] {
        &self.removed[mark.removed.min(self.removed.len())..]
    }

    pub fn has_changes_since(&self, mark: ChangeMark) -> bool {
        self.created.len() > mark.created || self.removed.len() > mark.removed
    }

    pub fn clear(&mut self) {
        self.created.clear();
        self.removed.clear();
    }
}
