//! In-memory ordered backend.

use crate::error::Result;
use crate::storage::{OrderedStore, StorageStats};
use bytes::Bytes;
use std::collections::BTreeMap;

/// Ordered in-memory storage backed by a `BTreeMap`.
///
/// The map's ordering over `Bytes` keys is exactly the lexicographic byte
/// ordering the engine's prefix scans rely on.
#[derive(Default)]
pub struct MemoryBackend {
    data: BTreeMap<Bytes, Bytes>,
    operations: u64,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderedStore for MemoryBackend {
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.data
            .insert(Bytes::copy_from_slice(key), Bytes::copy_from_slice(value));
        self.operations += 1;
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Bytes>> {
        Ok(self.data.get(key).cloned())
    }

    fn seek(&self, from: &[u8]) -> Result<Box<dyn Iterator<Item = (Bytes, Bytes)> + '_>> {
        let start = Bytes::copy_from_slice(from);
        Ok(Box::new(
            self.data
                .range(start..)
                .map(|(k, v)| (k.clone(), v.clone())),
        ))
    }

    fn len(&self) -> Result<usize> {
        Ok(self.data.len())
    }

    fn sync(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.data.clear();
        Ok(())
    }

    fn destroy(&mut self) -> Result<()> {
        self.data.clear();
        Ok(())
    }

    fn stats(&self) -> Result<StorageStats> {
        Ok(StorageStats {
            key_count: self.data.len(),
            size_bytes: self.data.iter().map(|(k, v)| k.len() + v.len()).sum(),
            operations_count: self.operations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_upsert() {
        let mut backend = MemoryBackend::new();
        backend.set(b"key", b"one").unwrap();
        backend.set(b"key", b"two").unwrap();

        assert_eq!(backend.get(b"key").unwrap().unwrap().as_ref(), b"two");
        assert_eq!(backend.len().unwrap(), 1);
        assert!(backend.get(b"missing").unwrap().is_none());
    }

    #[test]
    fn test_seek_is_ordered_and_bounded() {
        let mut backend = MemoryBackend::new();
        for key in [b"b2" as &[u8], b"a1", b"b1", b"c1", b"b3"] {
            backend.set(key, b"").unwrap();
        }

        let keys: Vec<Bytes> = backend
            .seek(b"b")
            .unwrap()
            .map(|(k, _)| k)
            .take_while(|k| k.starts_with(b"b"))
            .collect();
        assert_eq!(keys, vec!["b1", "b2", "b3"]);
    }

    #[test]
    fn test_seek_from_missing_key_starts_at_successor() {
        let mut backend = MemoryBackend::new();
        backend.set(b"a", b"").unwrap();
        backend.set(b"c", b"").unwrap();

        let first = backend.seek(b"b").unwrap().next().unwrap().0;
        assert_eq!(first.as_ref(), b"c");
    }

    #[test]
    fn test_stats() {
        let mut backend = MemoryBackend::new();
        backend.set(b"key", b"value").unwrap();
        let stats = backend.stats().unwrap();
        assert_eq!(stats.key_count, 1);
        assert_eq!(stats.size_bytes, 8);
        assert_eq!(stats.operations_count, 1);
    }
}
