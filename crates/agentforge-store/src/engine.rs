//! Pluggable storage engine trait.
//!
//! Generalized from the teacher's `kotoba_db_core::engine::StorageEngine`
//! (a single-writer `&mut self` interface) into a `&self` interface backed
//! internally by each engine's own synchronization, since the control
//! plane's store is shared across concurrently-running pipelines (spec §5:
//! "The store is process-wide and mutable; all access goes through C1.").

use agentforge_errors::ForgeError;

/// A single mutation against the store, used by [`StorageEngine::apply_batch`]
/// so a live-record write and its audit snapshot land atomically.
#[derive(Debug, Clone)]
pub enum WriteOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

pub trait StorageEngine: Send + Sync {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), ForgeError>;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, ForgeError>;

    fn delete(&self, key: &[u8]) -> Result<(), ForgeError>;

    /// Lexicographic scan of all keys starting with `prefix`, in key order.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, ForgeError>;

    /// Applies every op in `ops` as a single transaction. Used by
    /// `PersistStep` and `DeleteResourceStep` so the live record and its
    /// audit snapshot never observably diverge.
    fn apply_batch(&self, ops: Vec<WriteOp>) -> Result<(), ForgeError>;
}

/// Computes the exclusive upper bound of a prefix scan by incrementing the
/// last byte that isn't already `0xff`, dropping any trailing `0xff` bytes.
/// `None` means "no upper bound" (prefix is all `0xff` or empty).
pub fn prefix_upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut upper = prefix.to_vec();
    while let Some(&last) = upper.last() {
        if last == 0xff {
            upper.pop();
        } else {
            *upper.last_mut().unwrap() += 1;
            return Some(upper);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_bound_increments_last_byte() {
        assert_eq!(prefix_upper_bound(b"live/"), Some(b"live0".to_vec()));
    }

    #[test]
    fn upper_bound_handles_trailing_0xff() {
        assert_eq!(prefix_upper_bound(&[0x01, 0xff]), Some(vec![0x02]));
        assert_eq!(prefix_upper_bound(&[0xff, 0xff]), None);
    }
}
