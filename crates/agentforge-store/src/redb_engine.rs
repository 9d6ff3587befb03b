//! Embedded, durable storage engine backed by `redb`.
//!
//! Generalized from the teacher's `engidb` crate, which used a `redb`
//! table of raw bytes (`IPLD_BLOCKS: TableDefinition<&[u8], &[u8]>`) keyed
//! by content id. Here the single table holds every key in the control
//! plane's layout (`live/...`, `slug-index/...`, `audit/...`,
//! `artifact/...`, `artifact-ref/...`) since they are already
//! disambiguated by their own prefixes.

use crate::engine::{prefix_upper_bound, StorageEngine, WriteOp};
use agentforge_errors::ForgeError;
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;

const KV: TableDefinition<&[u8], &[u8]> = TableDefinition::new("agentforge_kv");

pub struct RedbStorageEngine {
    db: Database,
}

impl RedbStorageEngine {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ForgeError> {
        let db = Database::create(path)
            .map_err(|e| ForgeError::internal(format!("failed to open store: {e}")))?;
        // Ensure the table exists even before the first write.
        let txn = db
            .begin_write()
            .map_err(|e| ForgeError::internal(e.to_string()))?;
        {
            txn.open_table(KV)
                .map_err(|e| ForgeError::internal(e.to_string()))?;
        }
        txn.commit()
            .map_err(|e| ForgeError::internal(e.to_string()))?;
        Ok(Self { db })
    }
}

impl StorageEngine for RedbStorageEngine {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), ForgeError> {
        self.apply_batch(vec![WriteOp::Put {
            key: key.to_vec(),
            value: value.to_vec(),
        }])
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, ForgeError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| ForgeError::internal(e.to_string()))?;
        let table = txn
            .open_table(KV)
            .map_err(|e| ForgeError::internal(e.to_string()))?;
        let value = table
            .get(key)
            .map_err(|e| ForgeError::internal(e.to_string()))?
            .map(|v| v.value().to_vec());
        Ok(value)
    }

    fn delete(&self, key: &[u8]) -> Result<(), ForgeError> {
        self.apply_batch(vec![WriteOp::Delete {
            key: key.to_vec(),
        }])
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, ForgeError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| ForgeError::internal(e.to_string()))?;
        let table = txn
            .open_table(KV)
            .map_err(|e| ForgeError::internal(e.to_string()))?;

        let range: Box<dyn Iterator<Item = _>> = match prefix_upper_bound(prefix) {
            Some(upper) => Box::new(
                table
                    .range(prefix..upper.as_slice())
                    .map_err(|e| ForgeError::internal(e.to_string()))?,
            ),
            None => Box::new(
                table
                    .range(prefix..)
                    .map_err(|e| ForgeError::internal(e.to_string()))?,
            ),
        };

        let mut results = Vec::new();
        for entry in range {
            let (k, v) = entry.map_err(|e| ForgeError::internal(e.to_string()))?;
            results.push((k.value().to_vec(), v.value().to_vec()));
        }
        Ok(results)
    }

    fn apply_batch(&self, ops: Vec<WriteOp>) -> Result<(), ForgeError> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| ForgeError::internal(e.to_string()))?;
        {
            let mut table = txn
                .open_table(KV)
                .map_err(|e| ForgeError::internal(e.to_string()))?;
            for op in ops {
                match op {
                    WriteOp::Put { key, value } => {
                        table
                            .insert(key.as_slice(), value.as_slice())
                            .map_err(|e| ForgeError::internal(e.to_string()))?;
                    }
                    WriteOp::Delete { key } => {
                        table
                            .remove(key.as_slice())
                            .map_err(|e| ForgeError::internal(e.to_string()))?;
                    }
                }
            }
        }
        txn.commit()
            .map_err(|e| ForgeError::internal(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let engine = RedbStorageEngine::open(dir.path().join("store.redb")).unwrap();
        engine.put(b"live/skill/skl-1", b"payload").unwrap();
        assert_eq!(
            engine.get(b"live/skill/skl-1").unwrap(),
            Some(b"payload".to_vec())
        );
        engine.delete(b"live/skill/skl-1").unwrap();
        assert_eq!(engine.get(b"live/skill/skl-1").unwrap(), None);
    }

    #[test]
    fn scan_prefix_is_lexicographic() {
        let dir = tempfile::tempdir().unwrap();
        let engine = RedbStorageEngine::open(dir.path().join("store.redb")).unwrap();
        engine.put(b"audit/skill/skl-1/00001", b"a").unwrap();
        engine.put(b"audit/skill/skl-1/00002", b"b").unwrap();
        engine.put(b"audit/skill/skl-2/00001", b"c").unwrap();

        let results = engine.scan_prefix(b"audit/skill/skl-1/").unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].1, b"a");
        assert_eq!(results[1].1, b"b");
    }

    #[test]
    fn apply_batch_writes_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let engine = RedbStorageEngine::open(dir.path().join("store.redb")).unwrap();
        engine
            .apply_batch(vec![
                WriteOp::Put {
                    key: b"live/skill/skl-1".to_vec(),
                    value: b"v1".to_vec(),
                },
                WriteOp::Put {
                    key: b"audit/skill/skl-1/00001".to_vec(),
                    value: b"v1".to_vec(),
                },
            ])
            .unwrap();
        assert!(engine.get(b"live/skill/skl-1").unwrap().is_some());
        assert!(engine.get(b"audit/skill/skl-1/00001").unwrap().is_some());
    }
}
