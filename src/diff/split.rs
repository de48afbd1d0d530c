//! Two-column view construction
//!
//! Line-based diffs first pass through [`RunMerger`] and then emit exactly one
//! left/right pair per line, padding the side that has no content with an
//! [`SplitKind::Empty`] placeholder. Token diffs collapse into one row per
//! side whose changed spans are tracked by [`HighlightCalculator`].

use serde::{Deserialize, Serialize};
use super::operation::{split_segments, AnnotatedOperation, ChangeKind};

/// Half-open byte range of changed text within a split row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRange {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SplitKind {
    Removed,
    Added,
    Unchanged,
    Empty,
}

/// One side of a split row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitLine {
    pub line_number: Option<usize>,
    pub content: String,
    pub kind: SplitKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_ranges: Option<Vec<HighlightRange>>,
}

impl SplitLine {
    fn real(line_number: usize, content: &str, kind: SplitKind) -> Self {
        Self {
            line_number: Some(line_number),
            content: content.to_string(),
            kind,
            highlight_ranges: None,
        }
    }

    fn empty() -> Self {
        Self {
            line_number: None,
            content: String::new(),
            kind: SplitKind::Empty,
            highlight_ranges: None,
        }
    }
}

/// Index-aligned left and right columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitView {
    pub left_lines: Vec<SplitLine>,
    pub right_lines: Vec<SplitLine>,
}

impl SplitView {
    pub fn len(&self) -> usize {
        self.left_lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left_lines.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&SplitLine, &SplitLine)> {
        self.left_lines.iter().zip(self.right_lines.iter())
    }

    fn push(&mut self, left: SplitLine, right: SplitLine) {
        self.left_lines.push(left);
        self.right_lines.push(right);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    None,
    InAddRun,
    InRemoveRun,
}

/// Coalesces consecutive added/added or removed/removed operations.
///
/// A removed operation followed by an added one (or the reverse) is never
/// merged, so a replacement keeps its add/remove boundary.
#[derive(Debug)]
pub struct RunMerger {
    state: RunState,
    merged: Vec<AnnotatedOperation>,
}

impl Default for RunMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl RunMerger {
    pub fn new() -> Self {
        Self {
            state: RunState::None,
            merged: Vec::new(),
        }
    }

    pub fn push(&mut self, op: &AnnotatedOperation) {
        let next = match op.kind {
            ChangeKind::Added => RunState::InAddRun,
            ChangeKind::Removed => RunState::InRemoveRun,
            ChangeKind::Unchanged => RunState::None,
        };

        match (self.state, next) {
            (RunState::InAddRun, RunState::InAddRun) | (RunState::InRemoveRun, RunState::InRemoveRun) => {
                if let Some(last) = self.merged.last_mut() {
                    last.value.push_str(&op.value);
                }
            }
            _ => self.merged.push(op.clone()),
        }

        self.state = next;
    }

    pub fn finish(self) -> Vec<AnnotatedOperation> {
        self.merged
    }

    pub fn merge(operations: &[AnnotatedOperation]) -> Vec<AnnotatedOperation> {
        let mut merger = Self::new();
        for op in operations {
            merger.push(op);
        }
        merger.finish()
    }
}

/// Tracks a growing buffer and the changed spans appended to it
#[derive(Debug, Default)]
pub struct HighlightCalculator {
    content: String,
    ranges: Vec<HighlightRange>,
}

impl HighlightCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text that is identical on both sides.
    pub fn append_plain(&mut self, text: &str) {
        self.content.push_str(text);
    }

    /// Append changed text and record its span. Touching spans coalesce.
    pub fn append_changed(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let start = self.content.len();
        self.content.push_str(text);
        let end = self.content.len();

        match self.ranges.last_mut() {
            Some(last) if last.end == start => last.end = end,
            _ => self.ranges.push(HighlightRange { start, end }),
        }
    }

    pub fn has_highlights(&self) -> bool {
        !self.ranges.is_empty()
    }

    pub fn finish(self) -> (String, Vec<HighlightRange>) {
        (self.content, self.ranges)
    }
}

/// Build the split view for a diff.
pub fn project_split(operations: &[AnnotatedOperation], line_based: bool) -> SplitView {
    if line_based {
        project_lines(operations)
    } else {
        project_tokens(operations)
    }
}

fn project_lines(operations: &[AnnotatedOperation]) -> SplitView {
    let mut view = SplitView::default();
    let mut old_line = 1;
    let mut new_line = 1;

    for op in RunMerger::merge(operations) {
        for segment in split_segments(&op.value) {
            match op.kind {
                ChangeKind::Removed => {
                    view.push(SplitLine::real(old_line, segment, SplitKind::Removed), SplitLine::empty());
                    old_line += 1;
                }
                ChangeKind::Added => {
                    view.push(SplitLine::empty(), SplitLine::real(new_line, segment, SplitKind::Added));
                    new_line += 1;
                }
                ChangeKind::Unchanged => {
                    view.push(
                        SplitLine::real(old_line, segment, SplitKind::Unchanged),
                        SplitLine::real(new_line, segment, SplitKind::Unchanged),
                    );
                    old_line += 1;
                    new_line += 1;
                }
            }
        }
    }

    view
}

fn project_tokens(operations: &[AnnotatedOperation]) -> SplitView {
    let mut left = HighlightCalculator::new();
    let mut right = HighlightCalculator::new();

    for op in operations {
        match op.kind {
            ChangeKind::Removed => left.append_changed(&op.value),
            ChangeKind::Added => right.append_changed(&op.value),
            ChangeKind::Unchanged => {
                left.append_plain(&op.value);
                right.append_plain(&op.value);
            }
        }
    }

    let left_kind = if left.has_highlights() { SplitKind::Removed } else { SplitKind::Unchanged };
    let right_kind = if right.has_highlights() { SplitKind::Added } else { SplitKind::Unchanged };
    let (left_content, left_ranges) = left.finish();
    let (right_content, right_ranges) = right.finish();

    let mut view = SplitView::default();
    view.push(
        SplitLine {
            line_number: Some(1),
            content: left_content,
            kind: left_kind,
            highlight_ranges: Some(left_ranges),
        },
        SplitLine {
            line_number: Some(1),
            content: right_content,
            kind: right_kind,
            highlight_ranges: Some(right_ranges),
        },
    );
    view
}
