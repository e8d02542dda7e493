//! Bounded capture storage.

use crate::schema::CaptureRecord;
use camino::{Utf8Path, Utf8PathBuf};
use capture_common::config::CaptureConfig;
use capture_common::debug::log_event;
use capture_common::state::{KvFile, StateError};
use std::sync::Mutex;
use thiserror::Error;

/// Key of the capture sequence in the state document.
pub const CAPTURES_KEY: &str = "captures";

/// Retention cap; the oldest capture is evicted beyond it.
pub const MAX_CAPTURES: usize = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error("capture store lock was poisoned")]
    Poisoned,
}

/// Ordered, bounded persistence of capture records.
pub trait CaptureStore {
    /// Append a record, evicting the oldest beyond the cap. Returns the new length.
    fn append(&self, record: &CaptureRecord) -> Result<usize, StoreError>;

    /// All records, oldest first.
    fn list(&self) -> Result<Vec<CaptureRecord>, StoreError>;

    /// Drop every record.
    fn clear(&self) -> Result<(), StoreError>;

    /// Number of stored records.
    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.list()?.len())
    }
}

/// Push `record` and evict from the front down to `limit`. Returns the number evicted.
fn push_bounded(captures: &mut Vec<CaptureRecord>, record: CaptureRecord, limit: usize) -> usize {
    captures.push(record);
    let excess = captures.len().saturating_sub(limit);
    captures.drain(..excess);
    excess
}

fn log_stored(record: &CaptureRecord, count: usize, evicted: usize) {
    log_event(
        "store",
        "stored",
        Some(record.capture_type().as_str()),
        &format!("count={} evicted={}", count, evicted),
    );
}

/// Captures kept under the `captures` key of a JSON document.
///
/// Every operation reads the document afresh. Appends and clears hold the
/// document's writer lock for the whole read-modify-write.
#[derive(Debug, Clone)]
pub struct FileCaptureStore {
    kv: KvFile,
    limit: usize,
}

impl FileCaptureStore {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            kv: KvFile::new(path),
            limit: MAX_CAPTURES,
        }
    }

    pub fn from_config(config: &CaptureConfig) -> Self {
        Self::new(config.store_path.clone())
    }

    /// Lower the retention cap (never below one record).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn path(&self) -> &Utf8Path {
        self.kv.path()
    }

    fn load(&self) -> Result<Vec<CaptureRecord>, StoreError> {
        Ok(self.kv.get(CAPTURES_KEY)?.unwrap_or_default())
    }
}

impl CaptureStore for FileCaptureStore {
    fn append(&self, record: &CaptureRecord) -> Result<usize, StoreError> {
        let _lock = self.kv.lock()?;

        let mut captures = self.load()?;
        let evicted = push_bounded(&mut captures, record.clone(), self.limit);
        self.kv.set(CAPTURES_KEY, &captures)?;

        log_stored(record, captures.len(), evicted);
        Ok(captures.len())
    }

    fn list(&self) -> Result<Vec<CaptureRecord>, StoreError> {
        self.load()
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _lock = self.kv.lock()?;
        self.kv.set(CAPTURES_KEY, &Vec::<CaptureRecord>::new())?;

        log_event("store", "cleared", None, self.kv.path().as_str());
        Ok(())
    }
}

/// In-process store.
#[derive(Debug)]
pub struct MemoryCaptureStore {
    captures: Mutex<Vec<CaptureRecord>>,
    limit: usize,
}

impl Default for MemoryCaptureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCaptureStore {
    pub fn new() -> Self {
        Self {
            captures: Mutex::new(Vec::new()),
            limit: MAX_CAPTURES,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }
}

impl CaptureStore for MemoryCaptureStore {
    fn append(&self, record: &CaptureRecord) -> Result<usize, StoreError> {
        let mut captures = self.captures.lock().map_err(|_| StoreError::Poisoned)?;
        let evicted = push_bounded(&mut captures, record.clone(), self.limit);

        log_stored(record, captures.len(), evicted);
        Ok(captures.len())
    }

    fn list(&self) -> Result<Vec<CaptureRecord>, StoreError> {
        let captures = self.captures.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(captures.clone())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.captures
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Capture;
    use chrono::{Duration, TimeZone, Utc};
    use std::thread;
    use tempfile::tempdir;

    fn record(n: usize) -> CaptureRecord {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        CaptureRecord::at(
            base + Duration::seconds(n as i64),
            format!("https://example.com/{n}"),
            format!("Page {n}"),
            Capture::text(format!("capture {n}")),
        )
    }

    fn file_store(dir: &tempfile::TempDir) -> FileCaptureStore {
        let path = Utf8PathBuf::from_path_buf(dir.path().join("storage.json")).unwrap();
        FileCaptureStore::new(path)
    }

    fn contents(records: &[CaptureRecord]) -> Vec<String> {
        records.iter().map(|r| r.content().to_string()).collect()
    }

    fn assert_keeps_insertion_order(store: &dyn CaptureStore) {
        for n in 0..MAX_CAPTURES {
            assert_eq!(store.append(&record(n)).unwrap(), n + 1);
        }

        let listed = store.list().unwrap();
        assert_eq!(listed, (0..MAX_CAPTURES).map(record).collect::<Vec<_>>());
    }

    fn assert_evicts_oldest_first(store: &dyn CaptureStore) {
        for n in 0..(MAX_CAPTURES + 37) {
            let len = store.append(&record(n)).unwrap();
            assert!(len <= MAX_CAPTURES);
        }

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), MAX_CAPTURES);
        assert_eq!(listed.first().unwrap(), &record(37));
        assert_eq!(listed.last().unwrap(), &record(MAX_CAPTURES + 36));
        assert_eq!(listed, (37..MAX_CAPTURES + 37).map(record).collect::<Vec<_>>());
    }

    fn assert_clear_empties(store: &dyn CaptureStore) {
        for n in 0..5 {
            store.append(&record(n)).unwrap();
        }
        store.clear().unwrap();
        assert!(store.list().unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);

        // clearing an empty store is fine too
        store.clear().unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_keeps_insertion_order() {
        let dir = tempdir().unwrap();
        assert_keeps_insertion_order(&file_store(&dir));
    }

    #[test]
    fn test_file_store_evicts_oldest_first() {
        let dir = tempdir().unwrap();
        assert_evicts_oldest_first(&file_store(&dir));
    }

    #[test]
    fn test_file_store_clear() {
        let dir = tempdir().unwrap();
        assert_clear_empties(&file_store(&dir));
    }

    #[test]
    fn test_memory_store_keeps_insertion_order() {
        assert_keeps_insertion_order(&MemoryCaptureStore::new());
    }

    #[test]
    fn test_memory_store_evicts_oldest_first() {
        assert_evicts_oldest_first(&MemoryCaptureStore::new());
    }

    #[test]
    fn test_memory_store_clear() {
        assert_clear_empties(&MemoryCaptureStore::new());
    }

    #[test]
    fn test_missing_document_lists_empty() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);
        assert!(store.list().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_document_layout() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);
        store.append(&record(1)).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let captures = value[CAPTURES_KEY].as_array().unwrap();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0]["type"], "text");
        assert_eq!(captures[0]["content"], "capture 1");
    }

    #[test]
    fn test_with_limit() {
        let store = MemoryCaptureStore::new().with_limit(3);
        for n in 0..5 {
            store.append(&record(n)).unwrap();
        }
        assert_eq!(
            contents(&store.list().unwrap()),
            ["capture 2", "capture 3", "capture 4"]
        );
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..10 {
                        store.append(&record(t * 10 + i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut listed = contents(&store.list().unwrap());
        listed.sort();
        let mut expected: Vec<String> = (0..80).map(|n| format!("capture {n}")).collect();
        expected.sort();
        assert_eq!(listed, expected);
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);
        std::fs::write(store.path(), r#"{"captures": "nope"}"#).unwrap();

        assert!(matches!(store.list(), Err(StoreError::State(_))));
        assert!(store.append(&record(1)).is_err());
    }
}
