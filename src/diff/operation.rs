use serde::{Deserialize, Serialize};
use crate::error::{DiffError, Result};

/// Which side of the comparison an operation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    Added,
    Removed,
    Unchanged,
}

/// Atomic edit unit produced by a diff primitive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub value: String,
    pub kind: ChangeKind,
}

impl Operation {
    pub fn new(value: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    pub fn added(value: impl Into<String>) -> Self {
        Self::new(value, ChangeKind::Added)
    }

    pub fn removed(value: impl Into<String>) -> Self {
        Self::new(value, ChangeKind::Removed)
    }

    pub fn unchanged(value: impl Into<String>) -> Self {
        Self::new(value, ChangeKind::Unchanged)
    }

    /// Build an operation from the `(value, added, removed)` flag triple used
    /// by external diff primitives.
    pub fn from_flags(value: impl Into<String>, added: bool, removed: bool) -> Result<Self> {
        let value = value.into();
        let kind = match (added, removed) {
            (true, true) => return Err(DiffError::InvalidOperation(value)),
            (true, false) => ChangeKind::Added,
            (false, true) => ChangeKind::Removed,
            (false, false) => ChangeKind::Unchanged,
        };
        Ok(Self { value, kind })
    }

    pub fn is_added(&self) -> bool {
        self.kind == ChangeKind::Added
    }

    pub fn is_removed(&self) -> bool {
        self.kind == ChangeKind::Removed
    }
}

/// Operation plus the bookkeeping position assigned by [`annotate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedOperation {
    pub position: usize,
    pub kind: ChangeKind,
    pub value: String,
}

/// Tag every operation with its ordinal in the stream.
pub fn annotate(operations: &[Operation]) -> Vec<AnnotatedOperation> {
    operations
        .iter()
        .enumerate()
        .map(|(position, op)| AnnotatedOperation {
            position,
            kind: op.kind,
            value: op.value.clone(),
        })
        .collect()
}

/// Append `text` to the operation list, extending the last operation when it
/// has the same kind. Empty text is dropped.
pub(crate) fn push_coalesced(operations: &mut Vec<Operation>, kind: ChangeKind, text: &str) {
    if text.is_empty() {
        return;
    }
    match operations.last_mut() {
        Some(last) if last.kind == kind => last.value.push_str(text),
        _ => operations.push(Operation::new(text, kind)),
    }
}

/// Split a value into display lines. A terminal newline does not open a new
/// line; interior blank lines are kept.
pub(crate) fn split_segments(value: &str) -> Vec<&str> {
    if value.is_empty() {
        return Vec::new();
    }
    let mut segments: Vec<&str> = value.split('\n').collect();
    if value.ends_with('\n') {
        segments.pop();
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(Operation::from_flags("a", true, false).unwrap().kind, ChangeKind::Added);
        assert_eq!(Operation::from_flags("a", false, true).unwrap().kind, ChangeKind::Removed);
        assert_eq!(Operation::from_flags("a", false, false).unwrap().kind, ChangeKind::Unchanged);
        assert!(matches!(
            Operation::from_flags("a", true, true),
            Err(DiffError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_annotate_positions() {
        let ops = vec![
            Operation::unchanged("a"),
            Operation::removed("b"),
            Operation::added("c"),
        ];
        let annotated = annotate(&ops);

        assert_eq!(annotated.len(), 3);
        assert_eq!(annotated[1].position, 1);
        assert_eq!(annotated[1].kind, ChangeKind::Removed);
        assert_eq!(annotated[2].value, "c");
    }

    #[test]
    fn test_push_coalesced() {
        let mut ops = Vec::new();
        push_coalesced(&mut ops, ChangeKind::Unchanged, "a");
        push_coalesced(&mut ops, ChangeKind::Unchanged, "b");
        push_coalesced(&mut ops, ChangeKind::Removed, "");
        push_coalesced(&mut ops, ChangeKind::Added, "c");

        assert_eq!(ops, vec![Operation::unchanged("ab"), Operation::added("c")]);
    }

    #[test]
    fn test_split_segments() {
        assert_eq!(split_segments("a\nb\n"), vec!["a", "b"]);
        assert_eq!(split_segments("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(split_segments("\n"), vec![""]);
        assert!(split_segments("").is_empty());
    }
}
