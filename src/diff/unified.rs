use serde::{Deserialize, Serialize};
use super::operation::{split_segments, AnnotatedOperation, ChangeKind};

/// Kind of a unified row. `Context` marks the single run row of a token diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKind {
    Added,
    Removed,
    Unchanged,
    Context,
}

impl From<ChangeKind> for RowKind {
    fn from(kind: ChangeKind) -> Self {
        match kind {
            ChangeKind::Added => Self::Added,
            ChangeKind::Removed => Self::Removed,
            ChangeKind::Unchanged => Self::Unchanged,
        }
    }
}

/// Inline span of a run row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: ChangeKind,
    pub content: String,
}

/// A row of the single-column view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UnifiedRow {
    Line {
        old: Option<usize>,
        new: Option<usize>,
        kind: RowKind,
        content: String,
    },
    Run {
        old: Option<usize>,
        new: Option<usize>,
        kind: RowKind,
        content: String,
        segments: Vec<Segment>,
    },
}

impl UnifiedRow {
    pub fn kind(&self) -> RowKind {
        match self {
            Self::Line { kind, .. } | Self::Run { kind, .. } => *kind,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Line { content, .. } | Self::Run { content, .. } => content,
        }
    }
}

/// Build the unified view, one row per line for line-based diffs or a single
/// run row for token diffs.
pub fn project_unified(operations: &[AnnotatedOperation], line_based: bool) -> Vec<UnifiedRow> {
    if line_based {
        project_lines(operations)
    } else {
        vec![project_run(operations)]
    }
}

fn project_lines(operations: &[AnnotatedOperation]) -> Vec<UnifiedRow> {
    let mut rows = Vec::new();
    let mut old_line = 1;
    let mut new_line = 1;

    for op in operations {
        for segment in split_segments(&op.value) {
            let (old, new) = match op.kind {
                ChangeKind::Added => {
                    new_line += 1;
                    (None, Some(new_line - 1))
                }
                ChangeKind::Removed => {
                    old_line += 1;
                    (Some(old_line - 1), None)
                }
                ChangeKind::Unchanged => {
                    old_line += 1;
                    new_line += 1;
                    (Some(old_line - 1), Some(new_line - 1))
                }
            };
            rows.push(UnifiedRow::Line {
                old,
                new,
                kind: op.kind.into(),
                content: segment.to_string(),
            });
        }
    }

    rows
}

fn project_run(operations: &[AnnotatedOperation]) -> UnifiedRow {
    let content = operations.iter().map(|op| op.value.as_str()).collect();
    let segments = operations
        .iter()
        .map(|op| Segment {
            kind: op.kind,
            content: op.value.clone(),
        })
        .collect();

    UnifiedRow::Run {
        old: Some(1),
        new: Some(1),
        kind: RowKind::Context,
        content,
        segments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::operation::{annotate, Operation};

    #[test]
    fn test_line_numbers() {
        let ops = annotate(&[
            Operation::unchanged("a\n"),
            Operation::removed("b\n"),
            Operation::added("x\ny\n"),
            Operation::unchanged("c"),
        ]);
        let rows = project_unified(&ops, true);

        let numbered: Vec<(Option<usize>, Option<usize>, &str)> = rows
            .iter()
            .map(|row| match row {
                UnifiedRow::Line { old, new, content, .. } => (*old, *new, content.as_str()),
                UnifiedRow::Run { .. } => panic!("Expected line rows"),
            })
            .collect();

        assert_eq!(
            numbered,
            vec![
                (Some(1), Some(1), "a"),
                (Some(2), None, "b"),
                (None, Some(2), "x"),
                (None, Some(3), "y"),
                (Some(3), Some(4), "c"),
            ]
        );
    }

    #[test]
    fn test_interior_blank_lines_render() {
        let ops = annotate(&[Operation::added("a\n\nb\n")]);
        let rows = project_unified(&ops, true);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].content(), "");
        assert_eq!(rows[1].kind(), RowKind::Added);
    }

    #[test]
    fn test_token_mode_single_run() {
        let ops = annotate(&[
            Operation::unchanged("The "),
            Operation::removed("quick"),
            Operation::added("fast"),
            Operation::unchanged(" brown fox"),
        ]);
        let rows = project_unified(&ops, false);

        assert_eq!(rows.len(), 1);
        match &rows[0] {
            UnifiedRow::Run { kind, content, segments, .. } => {
                assert_eq!(*kind, RowKind::Context);
                assert_eq!(content, "The quickfast brown fox");
                assert_eq!(segments.len(), 4);
                assert_eq!(segments[1].kind, ChangeKind::Removed);
            }
            UnifiedRow::Line { .. } => panic!("Expected a run row"),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(project_unified(&[], true).is_empty());
        assert_eq!(project_unified(&[], false).len(), 1);
    }
}
