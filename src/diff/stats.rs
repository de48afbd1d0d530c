use serde::{Deserialize, Serialize};
use super::operation::Operation;

/// Counts over the raw operation list.
///
/// `additions` and `deletions` count operations, not rendered lines: a single
/// added operation spanning three lines counts once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
    pub total: usize,
}

impl DiffStats {
    pub fn from_operations(operations: &[Operation]) -> Self {
        Self {
            additions: operations.iter().filter(|op| op.is_added()).count(),
            deletions: operations.iter().filter(|op| op.is_removed()).count(),
            total: operations.len(),
        }
    }

    pub fn total_changes(&self) -> usize {
        self.additions + self.deletions
    }

    pub fn net_change(&self) -> isize {
        self.additions as isize - self.deletions as isize
    }

    pub fn has_changes(&self) -> bool {
        self.total_changes() > 0
    }
}
