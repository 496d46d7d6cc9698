//! LMDB storage backend for the veracity credibility ledger.
//!
//! Implements all storage traits from `veracity-store` using the `heed` LMDB bindings.
//! Each logical store maps to one or more LMDB databases within a single environment.

pub mod entity;
pub mod environment;
pub mod error;
pub mod record;
pub mod score;

pub use entity::LmdbEntityStore;
pub use environment::{LmdbEnvironment, DATABASE_COUNT};
pub use error::LmdbError;
pub use record::LmdbRecordDirectory;
pub use score::LmdbScoreStore;

use std::ops::Bound;

use heed::types::Bytes;
use heed::{Database, RoTxn};

/// Increment a byte prefix to produce the exclusive upper bound of a range scan.
pub(crate) fn increment_prefix(prefix: &mut Vec<u8>) {
    while let Some(last) = prefix.last_mut() {
        if *last < 0xFF {
            *last += 1;
            return;
        }
        prefix.pop();
    }
}

/// Length-prefixed encoding of a variable-length key component, so that
/// one component can never be a prefix of a different one.
pub(crate) fn length_prefixed(component: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + component.len());
    out.extend_from_slice(&(component.len() as u32).to_be_bytes());
    out.extend_from_slice(component);
    out
}

/// Prefix range-scan: collect all `(key, value)` pairs whose key starts with `prefix`.
pub(crate) fn range_scan(
    db: &Database<Bytes, Bytes>,
    txn: &RoTxn,
    prefix: &[u8],
) -> Result<Vec<(Vec<u8>, Vec<u8>)>, LmdbError> {
    let mut upper = prefix.to_vec();
    increment_prefix(&mut upper);
    let lower = Bound::Included(prefix);
    let upper_bound = if upper.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(upper.as_slice())
    };
    let bounds = (lower, upper_bound);
    let mut results = Vec::new();
    for entry in db.range(txn, &bounds)? {
        let (key, val) = entry?;
        results.push((key.to_vec(), val.to_vec()));
    }
    Ok(results)
}
