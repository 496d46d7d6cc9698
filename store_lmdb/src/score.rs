//! LMDB implementation of ScoreStore.
//!
//! Events are keyed `len(record_id) ++ record_id ++ seq_be`, so a prefix scan
//! over one record yields its events in append order. The global sequence
//! counter lives in the meta database and is advanced in the same write
//! transaction as the event.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RwTxn};

use veracity_store::{ScoreStore, StoreError};
use veracity_types::{CachedScore, EventId, NewScoreEvent, RecordId, ScoreEvent};

use crate::{length_prefixed, range_scan, LmdbError};

const EVENT_SEQ_KEY: &[u8] = b"score_event_seq";

pub struct LmdbScoreStore {
    pub(crate) env: Arc<Env>,
    pub(crate) events_db: Database<Bytes, Bytes>,
    pub(crate) scores_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbScoreStore {
    fn next_seq(&self, wtxn: &mut RwTxn) -> Result<u64, LmdbError> {
        let current = match self.meta_db.get(wtxn, EVENT_SEQ_KEY)? {
            Some(bytes) => {
                let arr: [u8; 8] = bytes
                    .try_into()
                    .map_err(|_| LmdbError::Corrupt("score event sequence length".into()))?;
                u64::from_be_bytes(arr)
            }
            None => 0,
        };
        let next = current + 1;
        self.meta_db.put(wtxn, EVENT_SEQ_KEY, &next.to_be_bytes())?;
        Ok(next)
    }
}

fn event_key(record_id: &RecordId, seq: u64) -> Vec<u8> {
    let mut key = length_prefixed(record_id.as_str().as_bytes());
    key.extend_from_slice(&seq.to_be_bytes());
    key
}

impl ScoreStore for LmdbScoreStore {
    fn append_event(&self, event: NewScoreEvent) -> Result<ScoreEvent, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let seq = self.next_seq(&mut wtxn)?;
        let event = event.into_event(EventId::new(seq));
        let bytes = bincode::serialize(&event).map_err(LmdbError::from)?;
        self.events_db
            .put(&mut wtxn, &event_key(&event.record_id, seq), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(event)
    }

    fn events_for_record(&self, record_id: &RecordId) -> Result<Vec<ScoreEvent>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = length_prefixed(record_id.as_str().as_bytes());
        let mut events = Vec::new();
        for (_, val) in range_scan(&self.events_db, &rtxn, &prefix)? {
            events.push(bincode::deserialize(&val).map_err(LmdbError::from)?);
        }
        Ok(events)
    }

    fn get_cached_score(&self, record_id: &RecordId) -> Result<Option<CachedScore>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .scores_db
            .get(&rtxn, record_id.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?)),
            None => Ok(None),
        }
    }

    fn put_cached_score(&self, score: &CachedScore) -> Result<(), StoreError> {
        let bytes = bincode::serialize(score).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.scores_db
            .put(&mut wtxn, score.record_id.as_str().as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
