//! Score event log and cached score storage.

use crate::StoreError;
use veracity_types::{CachedScore, NewScoreEvent, RecordId, ScoreEvent};

/// Trait for the append-only score event log and the derived score cache.
pub trait ScoreStore: Send + Sync {
    /// Append an event, assigning it the next sequence number.
    fn append_event(&self, event: NewScoreEvent) -> Result<ScoreEvent, StoreError>;

    /// All events for a record, in append order.
    fn events_for_record(&self, record_id: &RecordId) -> Result<Vec<ScoreEvent>, StoreError>;

    fn get_cached_score(&self, record_id: &RecordId) -> Result<Option<CachedScore>, StoreError>;

    /// Overwrite the cached score for a record.
    fn put_cached_score(&self, score: &CachedScore) -> Result<(), StoreError>;
}
