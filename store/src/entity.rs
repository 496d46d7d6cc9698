//! Keyed entity storage with conditional upsert.

use crate::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use veracity_types::{DisputeRecord, EntityKey, ReactionRecord, VerificationRecord};

/// A stored value together with its write revision.
///
/// Revisions start at 1 and increase by one on every successful write to the key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned<T> {
    pub revision: u64,
    pub value: T,
}

/// An entity that lives in its own table and belongs to a query group.
pub trait StoredEntity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Table name, unique per entity type.
    const TABLE: &'static str;

    /// Secondary grouping key for [`EntityStore::list_group`].
    fn group(&self) -> String;
}

impl StoredEntity for VerificationRecord {
    const TABLE: &'static str = "verifications";

    fn group(&self) -> String {
        self.record_id.to_string()
    }
}

impl StoredEntity for DisputeRecord {
    const TABLE: &'static str = "disputes";

    fn group(&self) -> String {
        self.record_id.to_string()
    }
}

impl StoredEntity for ReactionRecord {
    const TABLE: &'static str = "reactions";

    fn group(&self) -> String {
        reaction_group(self.version_hash.as_str(), self.dispute_actor_id.as_str())
    }
}

/// Group of all reactions to one dispute.
///
/// The version hash is length-prefixed so that no split of the same
/// characters between hash and actor yields the same group.
pub fn reaction_group(version_hash: &str, dispute_actor: &str) -> String {
    format!("{}:{version_hash}/{dispute_actor}", version_hash.len())
}

/// Trait for storing one entity type keyed by [`EntityKey`].
pub trait EntityStore<E>: Send + Sync {
    /// Read a row by key.
    fn get(&self, key: &EntityKey) -> Result<Option<Versioned<E>>, StoreError>;

    /// Conditional upsert: write `value` only if the stored revision equals
    /// `expected` (`None` means the key must be absent). Returns the new
    /// revision, or [`StoreError::RevisionMismatch`] without writing.
    ///
    /// Implementations must perform the comparison and the write atomically.
    fn compare_and_put(
        &self,
        key: &EntityKey,
        expected: Option<u64>,
        value: &E,
    ) -> Result<u64, StoreError>;

    /// All rows in a query group (record id, or dispute group for reactions).
    fn list_group(&self, group: &str) -> Result<Vec<Versioned<E>>, StoreError>;
}
