//! Bounded per-calculator history of past calculations
//!
//! Each calculator keeps its most recent [`HISTORY_LIMIT`] records, newest
//! first. The whole store is persisted as one JSON file and each save
//! overwrites the previous contents. Mutation goes through `&mut self`, so a
//! store has exactly one writer at a time.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::path::Path;

use crate::calculator::CalculatorKind;
use crate::error::HistoryError;

/// Records kept per calculator
pub const HISTORY_LIMIT: usize = 20;

/// One saved calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: DateTime<Utc>,
    pub kind: CalculatorKind,
    /// Inputs and headline figures, as the caller chose to record them
    pub summary: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoryStore {
    records: BTreeMap<CalculatorKind, VecDeque<HistoryRecord>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from `path`; a missing file yields an empty store
    pub fn load(path: &Path) -> Result<Self, HistoryError> {
        if !path.exists() {
            debug!("no history at {}, starting empty", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let mut store: Self = serde_json::from_str(&contents)?;
        for list in store.records.values_mut() {
            list.truncate(HISTORY_LIMIT);
        }
        Ok(store)
    }

    /// Write the whole store to `path`, replacing any previous file
    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!("saved {} history records to {}", self.len(), path.display());
        Ok(())
    }

    /// Record a calculation summary stamped with the current time
    pub fn record<T: Serialize>(&mut self, kind: CalculatorKind, summary: &T) -> Result<(), HistoryError> {
        let record = HistoryRecord {
            timestamp: Utc::now(),
            kind,
            summary: serde_json::to_value(summary)?,
        };
        self.push(record);
        Ok(())
    }

    /// Insert a record at the front of its list, dropping the oldest beyond the limit
    pub fn push(&mut self, record: HistoryRecord) {
        let list = self.records.entry(record.kind).or_default();
        list.push_front(record);
        list.truncate(HISTORY_LIMIT);
    }

    /// Records for one calculator, newest first
    pub fn entries(&self, kind: CalculatorKind) -> impl Iterator<Item = &HistoryRecord> {
        self.records.get(&kind).into_iter().flatten()
    }

    pub fn latest(&self, kind: CalculatorKind) -> Option<&HistoryRecord> {
        self.records.get(&kind).and_then(|list| list.front())
    }

    pub fn clear(&mut self, kind: CalculatorKind) {
        self.records.remove(&kind);
    }

    pub fn len(&self) -> usize {
        self.records.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_newest_first_and_bounded() {
        let mut store = HistoryStore::new();
        for i in 0..25 {
            store.record(CalculatorKind::Loan, &json!({ "run": i })).unwrap();
        }

        let runs: Vec<i64> = store
            .entries(CalculatorKind::Loan)
            .map(|r| r.summary["run"].as_i64().unwrap())
            .collect();
        assert_eq!(runs.len(), HISTORY_LIMIT);
        assert_eq!(runs[0], 24);
        assert_eq!(runs[HISTORY_LIMIT - 1], 5);
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut store = HistoryStore::new();
        store.record(CalculatorKind::Tax, &json!({ "annual_tax": 3100 })).unwrap();
        store.record(CalculatorKind::Car, &json!({ "total": 812.5 })).unwrap();

        store.clear(CalculatorKind::Car);
        assert_eq!(store.entries(CalculatorKind::Car).count(), 0);
        assert_eq!(store.entries(CalculatorKind::Tax).count(), 1);
        assert_eq!(store.latest(CalculatorKind::Tax).unwrap().kind, CalculatorKind::Tax);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let mut store = HistoryStore::new();
        store.record(CalculatorKind::Insurance, &json!({ "final_payable": 1586.5, "segment": "B" })).unwrap();
        store.save(&path).unwrap();

        let loaded = HistoryStore::load(&path).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::load(&dir.path().join("none.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(HistoryStore::load(&path), Err(HistoryError::Json(_))));
    }
}
