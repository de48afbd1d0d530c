use std::sync::mpsc::Receiver;
use chrono::Utc;
use serde::Serialize;
use crate::config::DiffScopeConfig;
use crate::diff::{DiffKind, PatchCodec};
use crate::error::Result;
use super::result::{DiffResult, ResultId};
use super::settings::SettingsUpdate;
use super::store::{ResultStore, StoreEvent, StoreSnapshot};

/// Owned handle over a comparison session.
///
/// Every mutation takes `&mut self`, so a compute and the commit of its
/// result happen as one step. Wrap in `Arc<Mutex<_>>` to share across threads.
#[derive(Debug, Default)]
pub struct DiffEngine {
    store: ResultStore,
    sequence: u64,
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &DiffScopeConfig) -> Self {
        Self {
            store: ResultStore::new(config.settings.clone()).with_max_results(config.store.max_results),
            sequence: 0,
        }
    }

    pub fn diff_chars(&mut self, old: &str, new: &str, title: Option<&str>) -> Result<ResultId> {
        self.compute(DiffKind::Chars, title, || Ok((old.to_string(), new.to_string())))
    }

    pub fn diff_words(&mut self, old: &str, new: &str, title: Option<&str>) -> Result<ResultId> {
        self.compute(DiffKind::Words, title, || Ok((old.to_string(), new.to_string())))
    }

    pub fn diff_lines(&mut self, old: &str, new: &str, title: Option<&str>) -> Result<ResultId> {
        self.compute(DiffKind::Lines, title, || Ok((old.to_string(), new.to_string())))
    }

    /// Pretty-print both values and diff the text line by line. Key order and
    /// formatting differences show up as changes.
    pub fn diff_json<T: Serialize + ?Sized>(&mut self, old: &T, new: &T, title: Option<&str>) -> Result<ResultId> {
        self.compute(DiffKind::Json, title, || {
            Ok((serde_json::to_string_pretty(old)?, serde_json::to_string_pretty(new)?))
        })
    }

    pub fn diff_css(&mut self, old: &str, new: &str, title: Option<&str>) -> Result<ResultId> {
        self.compute(DiffKind::Css, title, || Ok((old.to_string(), new.to_string())))
    }

    pub fn diff_sentences(&mut self, old: &str, new: &str, title: Option<&str>) -> Result<ResultId> {
        self.compute(DiffKind::Sentences, title, || Ok((old.to_string(), new.to_string())))
    }

    /// Dispatch to the entry point for `kind`. JSON input is parsed first.
    pub fn diff(&mut self, kind: DiffKind, old: &str, new: &str, title: Option<&str>) -> Result<ResultId> {
        match kind {
            DiffKind::Chars => self.diff_chars(old, new, title),
            DiffKind::Words => self.diff_words(old, new, title),
            DiffKind::Lines => self.diff_lines(old, new, title),
            DiffKind::Css => self.diff_css(old, new, title),
            DiffKind::Sentences => self.diff_sentences(old, new, title),
            DiffKind::Json => self.compute(DiffKind::Json, title, || {
                let old: serde_json::Value = serde_json::from_str(old)?;
                let new: serde_json::Value = serde_json::from_str(new)?;
                Ok((serde_json::to_string_pretty(&old)?, serde_json::to_string_pretty(&new)?))
            }),
        }
    }

    fn compute<F>(&mut self, kind: DiffKind, title: Option<&str>, inputs: F) -> Result<ResultId>
    where
        F: FnOnce() -> Result<(String, String)>,
    {
        self.store.begin_compute();

        let id = self.next_id();
        let title = title.map_or_else(|| kind.label().to_string(), str::to_string);
        let settings = self.store.settings().clone();

        let outcome = inputs().and_then(|(old, new)| DiffResult::compute(id, title, kind, old, new, &settings));

        match outcome {
            Ok(result) => {
                tracing::debug!("Computed {} as {} ({} changes)", kind, result.id, result.stats.total_changes());
                let id = self.store.add_result(result);
                self.store.set_loading(false);
                Ok(id)
            }
            Err(err) => {
                let message = format!("{} failed: {}", kind, err);
                tracing::warn!("{}", message);
                self.store.fail_compute(message);
                Err(err)
            }
        }
    }

    fn next_id(&mut self) -> ResultId {
        self.sequence += 1;
        format!("diff-{}-{}", Utc::now().timestamp_millis(), self.sequence)
    }

    pub fn get_result(&self, id: &str) -> Option<&DiffResult> {
        self.store.get_result(id)
    }

    pub fn current_result(&self) -> Option<&DiffResult> {
        self.store.current_result()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }

    pub fn set_current_result(&mut self, id: &str) -> bool {
        self.store.set_current_result(id)
    }

    pub fn remove_result(&mut self, id: &str) -> bool {
        self.store.remove_result(id)
    }

    pub fn clear_results(&mut self) {
        self.store.clear_results()
    }

    pub fn update_settings(&mut self, update: &SettingsUpdate) {
        self.store.update_settings(update)
    }

    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        self.store.subscribe()
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Create a patch using the session's context length.
    pub fn create_patch(
        &self,
        file_name: &str,
        old: &str,
        new: &str,
        old_header: Option<&str>,
        new_header: Option<&str>,
    ) -> String {
        PatchCodec::new(self.store.settings().context_lines).create(file_name, old, new, old_header, new_header)
    }

    pub fn apply_patch(&self, source: &str, patch_text: &str) -> Option<String> {
        PatchCodec::new(self.store.settings().context_lines).apply(source, patch_text)
    }
}
