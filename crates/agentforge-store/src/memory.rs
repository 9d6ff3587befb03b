//! In-memory storage engine, completing the teacher's
//! `kotoba-db-engine-memory` stub (which declared the struct but never
//! implemented `StorageEngine`). Used by tests and as the default engine
//! when no on-disk path is configured.

use crate::engine::{StorageEngine, WriteOp};
use agentforge_errors::ForgeError;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Default)]
pub struct MemoryStorageEngine {
    store: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStorageEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageEngine for MemoryStorageEngine {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), ForgeError> {
        self.store.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, ForgeError> {
        Ok(self.store.read().get(key).cloned())
    }

    fn delete(&self, key: &[u8]) -> Result<(), ForgeError> {
        self.store.write().remove(key);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, ForgeError> {
        Ok(self
            .store
            .read()
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn apply_batch(&self, ops: Vec<WriteOp>) -> Result<(), ForgeError> {
        let mut store = self.store.write();
        for op in ops {
            match op {
                WriteOp::Put { key, value } => {
                    store.insert(key, value);
                }
                WriteOp::Delete { key } => {
                    store.remove(&key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_prefix_is_ordered_and_bounded() {
        let engine = MemoryStorageEngine::new();
        engine.put(b"live/skill/a", b"1").unwrap();
        engine.put(b"live/skill/b", b"2").unwrap();
        engine.put(b"live/agent/a", b"3").unwrap();

        let results = engine.scan_prefix(b"live/skill/").unwrap();
        assert_eq!(
            results,
            vec![
                (b"live/skill/a".to_vec(), b"1".to_vec()),
                (b"live/skill/b".to_vec(), b"2".to_vec()),
            ]
        );
    }

    #[test]
    fn apply_batch_is_all_or_nothing_in_effect() {
        let engine = MemoryStorageEngine::new();
        engine
            .apply_batch(vec![
                WriteOp::Put {
                    key: b"live/skill/a".to_vec(),
                    value: b"1".to_vec(),
                },
                WriteOp::Put {
                    key: b"audit/skill/a/1".to_vec(),
                    value: b"1".to_vec(),
                },
            ])
            .unwrap();
        assert!(engine.get(b"live/skill/a").unwrap().is_some());
        assert!(engine.get(b"audit/skill/a/1").unwrap().is_some());
    }
}
