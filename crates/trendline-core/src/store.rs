// File: crates/trendline-core/src/store.rs
// Summary: Injected source of per-ticker records that charts pull refreshes from.

use std::collections::HashMap;

use crate::series::Record;

/// Anything that can hand out the latest records for a key (e.g. a ticker).
pub trait SeriesStore {
    fn records(&self, key: &str) -> Option<Vec<Record>>;
}

/// Keyed in-memory store fed by whatever live source the host has.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    data: HashMap<String, Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    /// Replace everything held for `key`.
    pub fn put(&mut self, key: impl Into<String>, records: Vec<Record>) {
        self.data.insert(key.into(), records);
    }

    /// Append one record to `key`, creating it if needed.
    pub fn push(&mut self, key: &str, record: Record) {
        self.data.entry(key.to_string()).or_default().push(record);
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<Record>> {
        self.data.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

impl SeriesStore for MemoryStore {
    fn records(&self, key: &str) -> Option<Vec<Record>> {
        self.data.get(key).cloned()
    }
}
