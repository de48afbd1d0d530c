pub mod cli;
pub mod config;
pub mod core;
pub mod diff;
pub mod error;

pub use crate::core::{
    DiffEngine, DiffResult, ResultId, ResultStore, Settings, SettingsUpdate, StoreEvent, StoreSnapshot, ViewMode,
};
pub use crate::diff::{
    apply_patch, create_patch, ChangeKind, DiffKind, DiffStats, HighlightRange, Operation, SplitKind,
    SplitLine, SplitView, UnifiedRow,
};
pub use crate::error::DiffError;
