//! Version lineage: ordinal version numbers for display and audit.

use serde::Serialize;
use std::collections::HashMap;
use veracity_types::VersionHash;

/// Map each hash of a record to its version number.
///
/// The current hash is version 1. `prior_hashes` are given oldest first and
/// numbered in reverse, so the most recent prior version is 2 and the oldest
/// is `prior_hashes.len() + 1`.
pub fn build_version_map(
    current: &VersionHash,
    prior_hashes: &[VersionHash],
) -> HashMap<VersionHash, u32> {
    let total = prior_hashes.len() as u32 + 1;
    let mut map = HashMap::with_capacity(prior_hashes.len() + 1);
    for (idx, hash) in prior_hashes.iter().enumerate() {
        map.insert(hash.clone(), total - idx as u32);
    }
    map.insert(current.clone(), 1);
    map
}

/// A read result annotated with the version number of its record version.
///
/// `version` is `None` when the hash is not part of the record's known lineage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Annotated<T> {
    pub version: Option<u32>,
    pub item: T,
}
