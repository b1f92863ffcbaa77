//! Persisted result history
//!
//! Two keys are kept in a [`StateStore`]:
//!
//! - `currentBenchmarkResult`: the result shown when the dashboard opens
//! - `benchmarkHistory`: the last [`HISTORY_CAPACITY`] results, oldest first
//!
//! Reads never fail. A missing, unparseable or wrongly-shaped value reads as
//! empty and is overwritten on the next write. There is no lock between the
//! read and the write halves of [`HistoryStore::append`]; the last writer wins.

use crate::data::{BenchmarkResult, HistoryEntry};
use crate::error::Result;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

pub const CURRENT_RESULT_KEY: &str = "currentBenchmarkResult";
pub const HISTORY_KEY: &str = "benchmarkHistory";

/// Maximum number of entries kept in history
pub const HISTORY_CAPACITY: usize = 10;

/// Keyed storage with single-key atomic overwrite
pub trait StateStore {
    /// Raw value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Replace the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store, used in tests and as a fallback when no device storage exists
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Bounded, insertion-ordered history of results on top of a [`StateStore`]
#[derive(Debug, Clone)]
pub struct HistoryStore<S> {
    store: S,
    capacity: usize,
}

impl<S: StateStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_capacity(store, HISTORY_CAPACITY)
    }

    pub fn with_capacity(store: S, capacity: usize) -> Self {
        Self { store, capacity }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Persisted history, oldest first; empty on missing or corrupt data
    pub fn load(&self) -> Vec<HistoryEntry> {
        let Some(raw) = self.store.get(HISTORY_KEY) else {
            return Vec::new();
        };

        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                warn!("Persisted history is not a list, resetting");
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to parse persisted history, resetting: {}", e);
                return Vec::new();
            }
        };

        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<HistoryEntry>(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Dropping unreadable history entry: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Append an entry, keep the most recent `capacity` entries, write back.
    ///
    /// Returns the entries evicted by the cap. They are not kept anywhere else.
    pub fn append(&mut self, entry: HistoryEntry) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.load();
        entries.push(entry);

        let overflow = entries.len().saturating_sub(self.capacity);
        let evicted: Vec<HistoryEntry> = entries.drain(..overflow).collect();

        let content = serde_json::to_string(&entries)?;
        self.store.set(HISTORY_KEY, &content)?;

        debug!(
            "History now holds {} entries ({} evicted)",
            entries.len(),
            evicted.len()
        );
        Ok(evicted)
    }

    /// Look up a history entry by id
    pub fn select(&self, id: &str) -> Option<HistoryEntry> {
        self.load().into_iter().find(|entry| entry.id == id)
    }

    /// The result persisted as current; `None` on missing or corrupt data
    pub fn current(&self) -> Option<BenchmarkResult> {
        let raw = self.store.get(CURRENT_RESULT_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("Failed to parse current benchmark result: {}", e);
                None
            }
        }
    }

    pub fn set_current(&mut self, result: &BenchmarkResult) -> Result<()> {
        let content = serde_json::to_string(result)?;
        self.store.set(CURRENT_RESULT_KEY, &content)
    }

    /// Persist a completed submission: current result plus a history entry
    pub fn record(&mut self, result: &BenchmarkResult) -> Result<Vec<HistoryEntry>> {
        self.set_current(result)?;
        self.append(HistoryEntry::from_result(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FormData, SubmissionContext};
    use crate::normalize::normalize;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn result_at(offset_secs: i64) -> BenchmarkResult {
        let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(offset_secs);
        let form = FormData {
            repo_url: format!("https://github.com/acme/repo{}", offset_secs),
            entrypoint: "main.py".to_string(),
            ..FormData::default()
        };
        let ctx = SubmissionContext::new(form, None, ts);
        normalize(&json!({"status": "success", "results": {"energy_kwh": 0.001}}), &ctx).unwrap()
    }

    #[test]
    fn test_load_missing_is_empty() {
        let history = HistoryStore::new(MemoryStore::new());
        assert!(history.load().is_empty());
        assert!(history.current().is_none());
    }

    #[test]
    fn test_corrupt_history_resets() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "{not json").unwrap();
        let mut history = HistoryStore::new(store);
        assert!(history.load().is_empty());

        history.append(HistoryEntry::from_result(&result_at(0))).unwrap();
        assert_eq!(history.load().len(), 1);
    }

    #[test]
    fn test_non_list_history_resets() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, r#"{"id": "x"}"#).unwrap();
        let mut history = HistoryStore::new(store);

        history.append(HistoryEntry::from_result(&result_at(0))).unwrap();

        let entries = history.load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, result_at(0).benchmark_id);
    }

    #[test]
    fn test_unreadable_entries_dropped() {
        let good = serde_json::to_value(HistoryEntry::from_result(&result_at(0))).unwrap();
        let mut store = MemoryStore::new();
        store
            .set(HISTORY_KEY, &json!([good, {"id": 5}, "junk"]).to_string())
            .unwrap();

        let history = HistoryStore::new(store);
        assert_eq!(history.load().len(), 1);
    }

    #[test]
    fn test_eleventh_append_evicts_oldest() {
        let mut history = HistoryStore::new(MemoryStore::new());
        for i in 0..10 {
            let evicted = history.append(HistoryEntry::from_result(&result_at(i))).unwrap();
            assert!(evicted.is_empty());
        }

        let evicted = history.append(HistoryEntry::from_result(&result_at(10))).unwrap();

        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].id, result_at(0).benchmark_id);

        let entries = history.load();
        assert_eq!(entries.len(), HISTORY_CAPACITY);
        assert_eq!(entries[0].id, result_at(1).benchmark_id);
        assert_eq!(entries[9].id, result_at(10).benchmark_id);
        assert!(history.select(&result_at(0).benchmark_id).is_none());
    }

    #[test]
    fn test_record_sets_current_and_appends() {
        let mut history = HistoryStore::new(MemoryStore::new());
        let result = result_at(3);

        history.record(&result).unwrap();

        assert_eq!(history.current(), Some(result.clone()));
        let entry = history.select(&result.benchmark_id).unwrap();
        assert_eq!(entry.result, result);
        assert_eq!(entry.repo_url, "https://github.com/acme/repo3");
    }

    #[test]
    fn test_corrupt_current_is_none() {
        let mut store = MemoryStore::new();
        store.set(CURRENT_RESULT_KEY, "[1, 2").unwrap();
        assert!(HistoryStore::new(store).current().is_none());
    }
}
