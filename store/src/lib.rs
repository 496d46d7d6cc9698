//! Abstract mutable-store traits.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits, usually
//! through the [`Stores`] bundle of trait objects.

pub mod entity;
pub mod error;
pub mod record;
pub mod score;

use std::sync::Arc;

pub use entity::{reaction_group, EntityStore, StoredEntity, Versioned};
pub use error::StoreError;
pub use record::RecordDirectory;
pub use score::ScoreStore;

use veracity_types::{DisputeRecord, ReactionRecord, VerificationRecord};

/// The full set of stores the credibility core works against.
#[derive(Clone)]
pub struct Stores {
    pub verifications: Arc<dyn EntityStore<VerificationRecord>>,
    pub disputes: Arc<dyn EntityStore<DisputeRecord>>,
    pub reactions: Arc<dyn EntityStore<ReactionRecord>>,
    pub scores: Arc<dyn ScoreStore>,
    pub records: Arc<dyn RecordDirectory>,
}
