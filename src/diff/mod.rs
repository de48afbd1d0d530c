//! Diff computation and projection
//!
//! Primitives turn two strings into an ordered list of [`Operation`]s; the
//! projectors turn that list into the unified and split views, and
//! [`DiffStats`] summarizes it. [`PatchCodec`] works on raw strings and is
//! independent of the rest.

pub mod algorithms;
pub mod formatter;
pub mod operation;
pub mod patch;
pub mod split;
pub mod stats;
pub mod unified;

// Re-export the main types for easier use
pub use algorithms::{
    CharPrimitive, CssPrimitive, DiffAlgorithmType, DiffKind, DiffPrimitive, LinePrimitive,
    PrimitiveOptions, SentencePrimitive, WordPrimitive,
};
pub use formatter::DiffFormatter;
pub use operation::{annotate, AnnotatedOperation, ChangeKind, Operation};
pub use patch::{apply_patch, create_patch, PatchCodec, DEFAULT_CONTEXT_LINES};
pub use split::{project_split, HighlightCalculator, HighlightRange, RunMerger, SplitKind, SplitLine, SplitView};
pub use stats::DiffStats;
pub use unified::{project_unified, RowKind, Segment, UnifiedRow};

/// Both views of one operation list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub unified_view: Vec<UnifiedRow>,
    pub split_view: SplitView,
    pub stats: DiffStats,
}

/// Annotate `operations` and build every view for the given granularity.
pub fn project(operations: &[Operation], kind: DiffKind) -> Projection {
    let annotated = annotate(operations);
    let line_based = kind.is_line_based();

    Projection {
        unified_view: project_unified(&annotated, line_based),
        split_view: project_split(&annotated, line_based),
        stats: DiffStats::from_operations(operations),
    }
}
