//! Last-known-good payload cache
//!
//! Shared between the scraper (single writer) and the HTTP handlers (any
//! number of readers). Cloning a [`SnapshotStore`] yields another handle to
//! the same map.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use time::OffsetDateTime;

/// One cached endpoint reply
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub body: Bytes,
    pub updated_at: OffsetDateTime,
}

#[derive(Clone, Default)]
pub struct SnapshotStore {
    /// - key: endpoint path
    /// - value: last successful body
    entries: Arc<RwLock<HashMap<String, Snapshot>>>,

    #[cfg(test)]
    dumps: Arc<std::sync::atomic::AtomicUsize>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for `key` as a whole
    pub fn set(&self, key: impl Into<String>, value: impl Into<Bytes>) {
        let snapshot = Snapshot {
            body: value.into(),
            updated_at: OffsetDateTime::now_utc(),
        };
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.into(), snapshot);
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .map(|s| s.body.clone())
    }

    pub fn snapshot(&self, key: &str) -> Option<Snapshot> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dump every entry at debug level
    pub fn log_contents(&self) {
        #[cfg(test)]
        self.dumps.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        for (key, snapshot) in entries.iter() {
            tracing::debug!(
                "{}={}",
                key,
                String::from_utf8_lossy(&snapshot.body)
            );
        }
    }

    /// Number of `log_contents` calls so far
    #[cfg(test)]
    pub(crate) fn dump_count(&self) -> usize {
        self.dumps.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_get_missing() {
        let store = SnapshotStore::new();
        assert!(store.get("/api/device/signal").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_overwrites() {
        let store = SnapshotStore::new();
        store.set("/api/device/signal", "<response>1</response>");
        store.set("/api/device/signal", "<response>2</response>");
        assert_eq!(
            store.get("/api/device/signal").unwrap(),
            Bytes::from_static(b"<response>2</response>")
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clones_share_entries() {
        let store = SnapshotStore::new();
        let reader = store.clone();
        store.set("/api/net/net-mode", "x");
        assert_eq!(reader.get("/api/net/net-mode").unwrap(), "x".as_bytes());
        assert!(reader.snapshot("/api/net/net-mode").is_some());
    }

    #[test]
    fn test_concurrent_reads_never_torn() {
        let store = SnapshotStore::new();
        let old = "a".repeat(4096);
        let new = "b".repeat(4096);
        store.set("k", old.clone());

        let writer = {
            let store = store.clone();
            let (old, new) = (old.clone(), new.clone());
            thread::spawn(move || {
                for i in 0..500 {
                    let value = if i % 2 == 0 { new.clone() } else { old.clone() };
                    store.set("k", value);
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                let (old, new) = (old.clone(), new.clone());
                thread::spawn(move || {
                    for _ in 0..500 {
                        let value = store.get("k").unwrap();
                        assert!(value == old.as_bytes() || value == new.as_bytes());
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
