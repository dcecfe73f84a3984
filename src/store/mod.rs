//! In-memory storage of analysis records.
//!
//! Records are kept most-recent-first and evicted from the tail once the
//! configured capacity is exceeded. All access goes through one mutex.

use crate::models::AnalysisRecord;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// Default number of records retained.
pub const DEFAULT_CAPACITY: usize = 50;

/// Storage for analysis records.
pub trait AnalysisStore: Send + Sync {
    /// Insert a record at the front. Returns any records evicted to stay
    /// within capacity, oldest last.
    fn append(&self, record: AnalysisRecord) -> Vec<AnalysisRecord>;

    /// All records, most recent first.
    fn snapshot(&self) -> Vec<AnalysisRecord>;

    /// Up to `n` most recent records.
    fn recent(&self, n: usize) -> Vec<AnalysisRecord>;

    /// Number of stored records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bounded, mutex-guarded store. Contents are lost on restart.
#[derive(Debug)]
pub struct InMemoryAnalysisStore {
    records: Mutex<VecDeque<AnalysisRecord>>,
    capacity: usize,
}

impl InMemoryAnalysisStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(capacity + 1)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<AnalysisRecord>> {
        // Records are immutable once inserted, so a poisoned guard still
        // holds a consistent list.
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for InMemoryAnalysisStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl AnalysisStore for InMemoryAnalysisStore {
    fn append(&self, record: AnalysisRecord) -> Vec<AnalysisRecord> {
        let mut records = self.lock();
        records.push_front(record);

        let mut evicted = Vec::new();
        while records.len() > self.capacity {
            if let Some(old) = records.pop_back() {
                evicted.push(old);
            }
        }
        evicted
    }

    fn snapshot(&self) -> Vec<AnalysisRecord> {
        self.lock().iter().cloned().collect()
    }

    fn recent(&self, n: usize) -> Vec<AnalysisRecord> {
        self.lock().iter().take(n).cloned().collect()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::heuristics::score_code;
    use std::sync::Arc;

    fn record(n: usize) -> AnalysisRecord {
        let code = format!("value = {}", n);
        AnalysisRecord::new(
            &code,
            "python".to_string(),
            format!("repo-{}", n),
            score_code(&code, "python"),
            None,
            vec![],
        )
    }

    #[test]
    fn test_most_recent_first() {
        let store = InMemoryAnalysisStore::default();
        store.append(record(1));
        store.append(record(2));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].repository, "repo-2");
        assert_eq!(snapshot[1].repository, "repo-1");
    }

    #[test]
    fn test_sixty_inserts_keep_fifty() {
        let store = InMemoryAnalysisStore::default();
        let mut evicted_total = Vec::new();
        for n in 0..60 {
            evicted_total.extend(store.append(record(n)));
        }

        assert_eq!(store.len(), 50);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.first().unwrap().repository, "repo-59");
        assert_eq!(snapshot.last().unwrap().repository, "repo-10");

        let evicted: Vec<_> = evicted_total.iter().map(|r| r.repository.as_str()).collect();
        let expected: Vec<String> = (0..10).map(|n| format!("repo-{}", n)).collect();
        assert_eq!(evicted, expected);
    }

    #[test]
    fn test_recent_limits_count() {
        let store = InMemoryAnalysisStore::new(5);
        for n in 0..4 {
            store.append(record(n));
        }

        let recent = store.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].repository, "repo-3");
        assert_eq!(store.recent(10).len(), 4);
    }

    #[test]
    fn test_empty_store() {
        let store = InMemoryAnalysisStore::default();
        assert!(store.is_empty());
        assert!(store.snapshot().is_empty());
        assert_eq!(store.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_concurrent_appends_respect_capacity() {
        let store = Arc::new(InMemoryAnalysisStore::new(50));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for n in 0..20 {
                        store.append(record(t * 100 + n));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 50);
    }
}
