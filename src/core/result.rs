use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::diff::{project, DiffKind, DiffStats, Operation, SplitView, UnifiedRow};
use crate::error::Result;
use super::settings::Settings;

pub type ResultId = String;

/// One finished comparison. Built once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub id: ResultId,
    pub title: String,
    pub old_content: String,
    pub new_content: String,
    pub operations: Vec<Operation>,
    pub unified_view: Vec<UnifiedRow>,
    pub split_view: SplitView,
    pub stats: DiffStats,
    pub timestamp: DateTime<Utc>,
    pub diff_kind: DiffKind,
}

impl DiffResult {
    /// Run the primitive for `kind` over the two strings and assemble every
    /// view. Deterministic in `(kind, old, new, settings)`.
    pub fn compute(
        id: ResultId,
        title: String,
        kind: DiffKind,
        old_content: String,
        new_content: String,
        settings: &Settings,
    ) -> Result<Self> {
        let primitive = kind.create();
        let operations = primitive.diff(&old_content, &new_content, &settings.primitive_options())?;
        let projection = project(&operations, kind);

        tracing::debug!(
            "{} ({}) produced {} operations, {} unified rows, {} split rows",
            kind,
            primitive.name(),
            operations.len(),
            projection.unified_view.len(),
            projection.split_view.len()
        );

        Ok(Self {
            id,
            title,
            old_content,
            new_content,
            operations,
            unified_view: projection.unified_view,
            split_view: projection.split_view,
            stats: projection.stats,
            timestamp: Utc::now(),
            diff_kind: kind,
        })
    }

    pub fn has_changes(&self) -> bool {
        self.stats.has_changes()
    }
}
