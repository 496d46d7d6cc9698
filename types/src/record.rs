//! Metadata about the records that verifications and disputes target.

use crate::{ActorId, RecordId, VersionHash};
use serde::{Deserialize, Serialize};

/// What the core needs to know about a record: who wrote it and its version lineage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordInfo {
    pub record_id: RecordId,
    /// The record's original author.
    pub author: ActorId,
    pub current_hash: VersionHash,
    /// Earlier version hashes, oldest first.
    pub prior_hashes: Vec<VersionHash>,
}

impl RecordInfo {
    /// Whether `hash` is the current or any prior version of this record.
    pub fn has_version(&self, hash: &VersionHash) -> bool {
        &self.current_hash == hash || self.prior_hashes.contains(hash)
    }
}
