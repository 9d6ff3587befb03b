//! `agentforge-store`
//!
//! Embedded, ordered key/value persistence (spec module C1). Exposes a
//! pluggable [`engine::StorageEngine`] (in-memory for tests, `redb`-backed
//! for the running server) behind an async [`KvStore`] facade, since `redb`
//! transactions are blocking and must not run directly on the Tokio
//! executor (mirrors how the teacher's `engidb` callers wrap engine calls
//! at the edges rather than making the engine itself async).

pub mod engine;
pub mod keys;
pub mod memory;
pub mod redb_engine;

use agentforge_errors::ForgeError;
use engine::{StorageEngine, WriteOp};
use std::path::Path;
use std::sync::Arc;

/// Async facade over a [`StorageEngine`], used by the step library and
/// resource controllers.
#[derive(Clone)]
pub struct KvStore {
    engine: Arc<dyn StorageEngine>,
}

impl KvStore {
    pub fn new(engine: Arc<dyn StorageEngine>) -> Self {
        Self { engine }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(memory::MemoryStorageEngine::new()))
    }

    pub fn open_redb<P: AsRef<Path>>(path: P) -> Result<Self, ForgeError> {
        let engine = redb_engine::RedbStorageEngine::open(path)?;
        Ok(Self::new(Arc::new(engine)))
    }

    pub async fn get(&self, key: Vec<u8>) -> Result<Option<Vec<u8>>, ForgeError> {
        let engine = self.engine.clone();
        run_blocking(move || engine.get(&key)).await
    }

    pub async fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<(), ForgeError> {
        let engine = self.engine.clone();
        run_blocking(move || engine.put(&key, &value)).await
    }

    pub async fn delete(&self, key: Vec<u8>) -> Result<(), ForgeError> {
        let engine = self.engine.clone();
        run_blocking(move || engine.delete(&key)).await
    }

    pub async fn scan_prefix(&self, prefix: Vec<u8>) -> Result<Vec<(Vec<u8>, Vec<u8>)>, ForgeError> {
        let engine = self.engine.clone();
        run_blocking(move || engine.scan_prefix(&prefix)).await
    }

    /// Applies a batch of writes atomically. `PersistStep` and
    /// `DeleteResourceStep` use this for the live-record + audit-snapshot
    /// pair so the two never observably diverge.
    pub async fn apply_batch(&self, ops: Vec<WriteOp>) -> Result<(), ForgeError> {
        let engine = self.engine.clone();
        run_blocking(move || engine.apply_batch(ops)).await
    }
}

async fn run_blocking<F, T>(f: F) -> Result<T, ForgeError>
where
    F: FnOnce() -> Result<T, ForgeError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ForgeError::internal(format!("store task panicked: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn kv_store_put_get_delete_round_trip() {
        let store = KvStore::in_memory();
        store
            .put(b"live/skill/skl-1".to_vec(), b"payload".to_vec())
            .await
            .unwrap();
        assert_eq!(
            store.get(b"live/skill/skl-1".to_vec()).await.unwrap(),
            Some(b"payload".to_vec())
        );
        store.delete(b"live/skill/skl-1".to_vec()).await.unwrap();
        assert_eq!(store.get(b"live/skill/skl-1".to_vec()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn kv_store_scan_prefix_delegates_to_engine() {
        let store = KvStore::in_memory();
        store
            .put(keys::live("skill", "skl-1"), b"1".to_vec())
            .await
            .unwrap();
        store
            .put(keys::live("skill", "skl-2"), b"2".to_vec())
            .await
            .unwrap();
        let results = store.scan_prefix(keys::live_prefix("skill")).await.unwrap();
        assert_eq!(results.len(), 2);
    }
}
