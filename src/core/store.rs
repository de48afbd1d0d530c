use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use super::result::{DiffResult, ResultId};
use super::settings::{Settings, SettingsUpdate};

pub const DEFAULT_MAX_RESULTS: usize = 1000;

/// Notification sent to subscribers after each store mutation
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    ResultAdded(ResultId),
    ResultRemoved(ResultId),
    CurrentChanged(Option<ResultId>),
    Cleared,
    SettingsChanged(Settings),
    LoadingChanged(bool),
    ErrorChanged(Option<String>),
}

/// Read-only copy of the store at one point in time
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub results: Vec<Arc<DiffResult>>,
    pub current_result: Option<Arc<DiffResult>>,
    pub settings: Settings,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Session of comparison results, newest first.
///
/// `current` always names an element of `results` or is `None`.
#[derive(Debug)]
pub struct ResultStore {
    results: VecDeque<Arc<DiffResult>>,
    current: Option<ResultId>,
    settings: Settings,
    is_loading: bool,
    error: Option<String>,
    max_results: usize,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl ResultStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            results: VecDeque::new(),
            current: None,
            settings,
            is_loading: false,
            error: None,
            max_results: DEFAULT_MAX_RESULTS,
            subscribers: Vec::new(),
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    /// Register for change notifications. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, event: StoreEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Put `result` at the front and make it current.
    pub fn add_result(&mut self, result: DiffResult) -> ResultId {
        let id = result.id.clone();
        self.results.push_front(Arc::new(result));
        self.current = Some(id.clone());

        let mut evicted = Vec::new();
        while self.results.len() > self.max_results {
            if let Some(oldest) = self.results.pop_back() {
                evicted.push(oldest.id.clone());
            }
        }

        self.notify(StoreEvent::ResultAdded(id.clone()));
        for old_id in evicted {
            tracing::debug!("Evicted result {} (history limit {})", old_id, self.max_results);
            self.notify(StoreEvent::ResultRemoved(old_id));
        }
        self.notify(StoreEvent::CurrentChanged(Some(id.clone())));

        id
    }

    /// Remove a result. Removing the current one promotes the newest
    /// remaining result. Returns `false` for unknown ids.
    pub fn remove_result(&mut self, id: &str) -> bool {
        let before = self.results.len();
        self.results.retain(|result| result.id != id);
        if self.results.len() == before {
            return false;
        }

        self.notify(StoreEvent::ResultRemoved(id.to_string()));

        if self.current.as_deref() == Some(id) {
            self.current = self.results.front().map(|result| result.id.clone());
            tracing::info!("Removed current result {}, now {:?}", id, self.current);
            self.notify(StoreEvent::CurrentChanged(self.current.clone()));
        }

        true
    }

    /// Select a result. Returns `false` and changes nothing for unknown ids.
    pub fn set_current_result(&mut self, id: &str) -> bool {
        if !self.results.iter().any(|result| result.id == id) {
            return false;
        }

        if self.current.as_deref() != Some(id) {
            self.current = Some(id.to_string());
            tracing::info!("Selected result {}", id);
            self.notify(StoreEvent::CurrentChanged(self.current.clone()));
        }

        true
    }

    pub fn clear_results(&mut self) {
        self.results.clear();
        self.current = None;
        self.error = None;
        self.notify(StoreEvent::Cleared);
    }

    /// Merge `update` into the settings. Stored results are not touched.
    pub fn update_settings(&mut self, update: &SettingsUpdate) {
        self.settings.apply(update);
        self.notify(StoreEvent::SettingsChanged(self.settings.clone()));
    }

    pub fn get_result(&self, id: &str) -> Option<&DiffResult> {
        self.results
            .iter()
            .find(|result| result.id == id)
            .map(|result| result.as_ref())
    }

    pub fn current_result(&self) -> Option<&DiffResult> {
        self.current.as_deref().and_then(|id| self.get_result(id))
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn results(&self) -> impl Iterator<Item = &DiffResult> {
        self.results.iter().map(|result| result.as_ref())
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            results: self.results.iter().cloned().collect(),
            current_result: self
                .current
                .as_deref()
                .and_then(|id| self.results.iter().find(|result| result.id == id).cloned()),
            settings: self.settings.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
        }
    }

    /// Mark a compute as started: loading on, previous error cleared.
    pub(crate) fn begin_compute(&mut self) {
        self.set_loading(true);
        if self.error.take().is_some() {
            self.notify(StoreEvent::ErrorChanged(None));
        }
    }

    /// Record a failed compute.
    pub(crate) fn fail_compute(&mut self, message: String) {
        self.error = Some(message.clone());
        self.notify(StoreEvent::ErrorChanged(Some(message)));
        self.set_loading(false);
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        if self.is_loading != loading {
            self.is_loading = loading;
            self.notify(StoreEvent::LoadingChanged(loading));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffKind;

    fn result(id: &str) -> DiffResult {
        DiffResult::compute(
            id.to_string(),
            format!("title {}", id),
            DiffKind::Lines,
            "a\nb".to_string(),
            "a\nc".to_string(),
            &Settings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_loading_and_error_slots() {
        let mut store = ResultStore::default();
        assert!(!store.is_loading());

        store.begin_compute();
        assert!(store.is_loading());

        store.fail_compute("Line diff failed: boom".to_string());
        assert!(!store.is_loading());
        assert_eq!(store.error(), Some("Line diff failed: boom"));

        store.begin_compute();
        assert!(store.is_loading());
        assert_eq!(store.error(), None);
    }

    #[test]
    fn test_add_sets_current_newest_first() {
        let mut store = ResultStore::default();
        store.add_result(result("r1"));
        store.add_result(result("r2"));

        let ids: Vec<&str> = store.results().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r2", "r1"]);
        assert_eq!(store.current_id(), Some("r2"));
    }

    #[test]
    fn test_remove_lifecycle() {
        let mut store = ResultStore::default();
        store.add_result(result("r1"));
        store.add_result(result("r2"));

        assert!(store.remove_result("r2"));
        assert_eq!(store.current_id(), Some("r1"));

        assert!(store.remove_result("r1"));
        assert_eq!(store.current_id(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_non_current_keeps_selection() {
        let mut store = ResultStore::default();
        store.add_result(result("r1"));
        store.add_result(result("r2"));

        assert!(store.remove_result("r1"));
        assert_eq!(store.current_id(), Some("r2"));
    }

    #[test]
    fn test_lookup_misses_are_noops() {
        let mut store = ResultStore::default();
        store.add_result(result("r1"));

        assert!(store.get_result("missing").is_none());
        assert!(!store.set_current_result("missing"));
        assert!(!store.remove_result("missing"));
        assert_eq!(store.current_id(), Some("r1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_set_current_result() {
        let mut store = ResultStore::default();
        store.add_result(result("r1"));
        store.add_result(result("r2"));

        assert!(store.set_current_result("r1"));
        assert_eq!(store.current_result().map(|r| r.id.as_str()), Some("r1"));
    }

    #[test]
    fn test_clear_results() {
        let mut store = ResultStore::default();
        store.add_result(result("r1"));
        store.fail_compute("boom".to_string());

        store.clear_results();

        assert!(store.is_empty());
        assert!(store.current_id().is_none());
        assert!(store.error().is_none());
    }

    #[test]
    fn test_update_settings_keeps_results() {
        let mut store = ResultStore::default();
        store.add_result(result("r1"));
        let before = store.get_result("r1").cloned();

        store.update_settings(&SettingsUpdate::default().ignore_case(true));

        assert!(store.settings().ignore_case);
        assert_eq!(store.get_result("r1").cloned(), before);
    }

    #[test]
    fn test_history_limit_evicts_oldest() {
        let mut store = ResultStore::default().with_max_results(2);
        store.add_result(result("r1"));
        store.add_result(result("r2"));
        store.add_result(result("r3"));

        let ids: Vec<&str> = store.results().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r3", "r2"]);
        assert_eq!(store.current_id(), Some("r3"));
    }

    #[test]
    fn test_subscribers_receive_events() {
        let mut store = ResultStore::default();
        let rx = store.subscribe();

        store.add_result(result("r1"));
        store.remove_result("r1");

        let events: Vec<StoreEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                StoreEvent::ResultAdded("r1".to_string()),
                StoreEvent::CurrentChanged(Some("r1".to_string())),
                StoreEvent::ResultRemoved("r1".to_string()),
                StoreEvent::CurrentChanged(None),
            ]
        );
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut store = ResultStore::default();
        let rx = store.subscribe();
        drop(rx);

        store.add_result(result("r1"));
        assert!(store.subscribers.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = ResultStore::default();
        store.add_result(result("r1"));
        let snapshot = store.snapshot();

        store.clear_results();

        assert_eq!(snapshot.results.len(), 1);
        assert_eq!(snapshot.current_result.map(|r| r.id.clone()), Some("r1".to_string()));
    }
}
