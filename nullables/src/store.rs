//! Nullable store: thread-safe in-memory storage for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use veracity_store::{
    EntityStore, RecordDirectory, ScoreStore, StoreError, StoredEntity, Stores, Versioned,
};
use veracity_types::{
    CachedScore, DisputeRecord, EntityKey, EventId, NewScoreEvent, ReactionRecord, RecordId,
    RecordInfo, ScoreEvent, VerificationRecord,
};

/// An in-memory entity table with the same conditional-write semantics as LMDB.
pub struct NullEntityStore<E> {
    rows: Mutex<HashMap<EntityKey, Versioned<E>>>,
    failing_writes: AtomicUsize,
    /// Writes left until one fails, counting the failing one; zero when unarmed.
    writes_until_failure: AtomicUsize,
}

impl<E: StoredEntity> NullEntityStore<E> {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            failing_writes: AtomicUsize::new(0),
            writes_until_failure: AtomicUsize::new(0),
        }
    }

    /// Make the next `n` writes fail with a backend error.
    pub fn fail_next_writes(&self, n: usize) {
        self.failing_writes.store(n, Ordering::SeqCst);
    }

    /// Let `skip` writes succeed, then fail the one after them.
    pub fn fail_write_after(&self, skip: usize) {
        self.writes_until_failure.store(skip + 1, Ordering::SeqCst);
    }

    fn take_injected_failure(&self) -> bool {
        let countdown = self
            .writes_until_failure
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if countdown == Ok(1) {
            return true;
        }
        self.failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Overwrite a row unconditionally, bumping its revision, as a concurrent writer would.
    pub fn force_put(&self, key: &EntityKey, value: E) {
        let mut rows = self.rows.lock().unwrap();
        let revision = rows.get(key).map(|r| r.revision).unwrap_or(0) + 1;
        rows.insert(*key, Versioned { revision, value });
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: StoredEntity> Default for NullEntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: StoredEntity> EntityStore<E> for NullEntityStore<E> {
    fn get(&self, key: &EntityKey) -> Result<Option<Versioned<E>>, StoreError> {
        Ok(self.rows.lock().unwrap().get(key).cloned())
    }

    fn compare_and_put(
        &self,
        key: &EntityKey,
        expected: Option<u64>,
        value: &E,
    ) -> Result<u64, StoreError> {
        if self.take_injected_failure() {
            return Err(StoreError::Backend(format!("injected {} write failure", E::TABLE)));
        }

        let mut rows = self.rows.lock().unwrap();
        let actual = rows.get(key).map(|r| r.revision);
        if actual != expected {
            return Err(StoreError::RevisionMismatch {
                key: key.to_string(),
                expected,
                actual,
            });
        }
        let revision = actual.unwrap_or(0) + 1;
        rows.insert(
            *key,
            Versioned {
                revision,
                value: value.clone(),
            },
        );
        Ok(revision)
    }

    fn list_group(&self, group: &str) -> Result<Vec<Versioned<E>>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|row| row.value.group() == group)
            .cloned()
            .collect())
    }
}

/// In-memory score event log and cache.
#[derive(Default)]
pub struct NullScoreStore {
    events: Mutex<Vec<ScoreEvent>>,
    cache: Mutex<HashMap<RecordId, CachedScore>>,
    failing_appends: AtomicUsize,
}

impl NullScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` event appends fail with a backend error.
    pub fn fail_next_appends(&self, n: usize) {
        self.failing_appends.store(n, Ordering::SeqCst);
    }

    /// Every event ever appended, in append order.
    pub fn all_events(&self) -> Vec<ScoreEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ScoreStore for NullScoreStore {
    fn append_event(&self, event: NewScoreEvent) -> Result<ScoreEvent, StoreError> {
        let take_failure = self
            .failing_appends
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if take_failure {
            return Err(StoreError::Backend("injected score event append failure".into()));
        }
        let mut events = self.events.lock().unwrap();
        let event = event.into_event(EventId::new(events.len() as u64 + 1));
        events.push(event.clone());
        Ok(event)
    }

    fn events_for_record(&self, record_id: &RecordId) -> Result<Vec<ScoreEvent>, StoreError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| &e.record_id == record_id)
            .cloned()
            .collect())
    }

    fn get_cached_score(&self, record_id: &RecordId) -> Result<Option<CachedScore>, StoreError> {
        Ok(self.cache.lock().unwrap().get(record_id).cloned())
    }

    fn put_cached_score(&self, score: &CachedScore) -> Result<(), StoreError> {
        self.cache
            .lock()
            .unwrap()
            .insert(score.record_id.clone(), score.clone());
        Ok(())
    }
}

/// In-memory record directory.
#[derive(Default)]
pub struct NullRecordDirectory {
    records: Mutex<HashMap<RecordId, RecordInfo>>,
}

impl RecordDirectory for NullRecordDirectory {
    fn get_record(&self, record_id: &RecordId) -> Result<Option<RecordInfo>, StoreError> {
        Ok(self.records.lock().unwrap().get(record_id).cloned())
    }

    fn put_record(&self, info: &RecordInfo) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .insert(info.record_id.clone(), info.clone());
        Ok(())
    }
}

/// The full set of in-memory stores. Tables stay reachable for inspection
/// and fault injection after [`NullStore::stores`] hands them out.
#[derive(Clone, Default)]
pub struct NullStore {
    pub verifications: Arc<NullEntityStore<VerificationRecord>>,
    pub disputes: Arc<NullEntityStore<DisputeRecord>>,
    pub reactions: Arc<NullEntityStore<ReactionRecord>>,
    pub scores: Arc<NullScoreStore>,
    pub records: Arc<NullRecordDirectory>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stores(&self) -> Stores {
        Stores {
            verifications: self.verifications.clone(),
            disputes: self.disputes.clone(),
            reactions: self.reactions.clone(),
            scores: self.scores.clone(),
            records: self.records.clone(),
        }
    }
}
