//! Core functionality module
//!
//! Contains the comparison session: results, settings, the store and the
//! engine that computes and commits results.

pub mod engine;
pub mod result;
pub mod settings;
pub mod store;

// Re-export main types
pub use engine::DiffEngine;
pub use result::{DiffResult, ResultId};
pub use settings::{Settings, SettingsUpdate, ViewMode};
pub use store::{ResultStore, StoreEvent, StoreSnapshot, DEFAULT_MAX_RESULTS};
