//! Event-sourced credibility score.
//!
//! Every confirmed, scoring-relevant state transition appends one immutable
//! [`ScoreEvent`]. The cached score is never adjusted incrementally: it is
//! recomputed by replaying the record's whole event log from
//! `initial_score`, so redundant or racing recomputations converge.

use std::sync::Arc;

use serde::Serialize;
use veracity_store::{ScoreStore, StoreError};
use veracity_types::{
    ActorId, CachedScore, Clock, DisputeGrade, LedgerTxRef, NewScoreEvent, RecordId, ScoreEvent,
    ScoreEventType, ScoreMetadata, ScoringParams, VerificationLevel, VersionHash,
};

use crate::observer::ActionObserver;

/// Score delta for one event, a pure function of its type and metadata.
///
/// Values the event type needs but the metadata lacks count as zero weight.
pub fn score_delta(params: &ScoringParams, event_type: ScoreEventType, metadata: &ScoreMetadata) -> i64 {
    match metadata {
        ScoreMetadata::Verification {
            prior_level,
            new_level,
        } => {
            let weight = |level: &Option<VerificationLevel>| {
                level.map(|l| params.verification_weight(l)).unwrap_or(0)
            };
            match event_type {
                ScoreEventType::Verification => weight(new_level),
                ScoreEventType::VerificationRevoked => -weight(prior_level),
                ScoreEventType::VerificationModified => weight(new_level) - weight(prior_level),
                _ => 0,
            }
        }
        ScoreMetadata::Dispute { prior, new } => {
            let penalty = |grade: &Option<DisputeGrade>| {
                grade
                    .map(|g| params.dispute_penalty(g.severity, g.culpability))
                    .unwrap_or(0)
            };
            match event_type {
                ScoreEventType::Dispute => -penalty(new),
                ScoreEventType::DisputeRevoked => penalty(prior),
                ScoreEventType::DisputeModified => penalty(prior) - penalty(new),
                _ => 0,
            }
        }
    }
}

/// Classify a verification transition between the ledger-anchored prior
/// level and the newly confirmed one. Identical states produce no event.
pub fn verification_transition(
    prior: Option<VerificationLevel>,
    new: Option<VerificationLevel>,
) -> Option<(ScoreEventType, ScoreMetadata)> {
    let event_type = match (prior, new) {
        (None, None) => return None,
        (None, Some(_)) => ScoreEventType::Verification,
        (Some(_), None) => ScoreEventType::VerificationRevoked,
        (Some(p), Some(n)) if p == n => return None,
        (Some(_), Some(_)) => ScoreEventType::VerificationModified,
    };
    Some((
        event_type,
        ScoreMetadata::Verification {
            prior_level: prior,
            new_level: new,
        },
    ))
}

/// Dispute counterpart of [`verification_transition`].
pub fn dispute_transition(
    prior: Option<DisputeGrade>,
    new: Option<DisputeGrade>,
) -> Option<(ScoreEventType, ScoreMetadata)> {
    let event_type = match (prior, new) {
        (None, None) => return None,
        (None, Some(_)) => ScoreEventType::Dispute,
        (Some(_), None) => ScoreEventType::DisputeRevoked,
        (Some(p), Some(n)) if p == n => return None,
        (Some(_), Some(_)) => ScoreEventType::DisputeModified,
    };
    Some((event_type, ScoreMetadata::Dispute { prior, new }))
}

/// Replay a record's events from `initial_score`, clamping the sum.
pub fn replay_score(params: &ScoringParams, events: &[ScoreEvent]) -> i64 {
    let total = events
        .iter()
        .fold(params.initial_score, |acc, e| acc.saturating_add(e.score_delta));
    params.clamp(total)
}

/// An appended event and the cache value recomputed right after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoredEvent {
    pub event: ScoreEvent,
    pub score: CachedScore,
}

/// Comparison of the cached score against a fresh replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreAudit {
    pub record_id: RecordId,
    pub cached: Option<i64>,
    pub replayed: i64,
    pub events: usize,
    pub consistent: bool,
}

pub struct ScoreEngine {
    scores: Arc<dyn ScoreStore>,
    params: ScoringParams,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn ActionObserver>,
}

impl ScoreEngine {
    pub fn new(
        scores: Arc<dyn ScoreStore>,
        params: ScoringParams,
        clock: Arc<dyn Clock>,
        observer: Arc<dyn ActionObserver>,
    ) -> Self {
        Self {
            scores,
            params,
            clock,
            observer,
        }
    }

    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    /// Append one event with its computed delta, then recompute the record's score.
    pub fn record_score_event(
        &self,
        record_id: &RecordId,
        version_hash: &VersionHash,
        event_type: ScoreEventType,
        metadata: ScoreMetadata,
        actor_id: &ActorId,
        ledger_tx_ref: Option<LedgerTxRef>,
    ) -> Result<ScoredEvent, StoreError> {
        let event = self.append_event(
            record_id,
            version_hash,
            event_type,
            metadata,
            actor_id,
            ledger_tx_ref,
        )?;
        let score = self.recompute_score(record_id)?;
        Ok(ScoredEvent { event, score })
    }

    /// Append one event with its computed delta. The cache is left untouched.
    pub fn append_event(
        &self,
        record_id: &RecordId,
        version_hash: &VersionHash,
        event_type: ScoreEventType,
        metadata: ScoreMetadata,
        actor_id: &ActorId,
        ledger_tx_ref: Option<LedgerTxRef>,
    ) -> Result<ScoreEvent, StoreError> {
        let score_delta = score_delta(&self.params, event_type, &metadata);
        let event = self.scores.append_event(NewScoreEvent {
            record_id: record_id.clone(),
            version_hash: version_hash.clone(),
            event_type,
            score_delta,
            actor_id: actor_id.clone(),
            created_at: self.clock.now(),
            metadata,
            ledger_tx_ref,
        })?;
        tracing::debug!(
            record = %record_id,
            event = %event.id,
            kind = %event_type,
            delta = score_delta,
            "score event appended"
        );
        Ok(event)
    }

    /// Replay all events for the record and overwrite the cache.
    pub fn recompute_score(&self, record_id: &RecordId) -> Result<CachedScore, StoreError> {
        let events = self.scores.events_for_record(record_id)?;
        let cached = CachedScore {
            record_id: record_id.clone(),
            score: replay_score(&self.params, &events),
            last_updated_at: self.clock.now(),
        };
        self.scores.put_cached_score(&cached)?;
        self.observer.score_recomputed(record_id, cached.score);
        tracing::info!(record = %record_id, score = cached.score, events = events.len(), "score recomputed");
        Ok(cached)
    }

    /// Cached score, or `initial_score` for a record with no events.
    pub fn score(&self, record_id: &RecordId) -> Result<i64, StoreError> {
        match self.scores.get_cached_score(record_id)? {
            Some(cached) => Ok(cached.score),
            None => Ok(self.params.clamp(self.params.initial_score)),
        }
    }

    /// All events for a record, in append order.
    pub fn events(&self, record_id: &RecordId) -> Result<Vec<ScoreEvent>, StoreError> {
        self.scores.events_for_record(record_id)
    }

    /// Events one actor's actions on one version contributed, in append order.
    pub fn owner_history(
        &self,
        record_id: &RecordId,
        version_hash: &VersionHash,
        actor_id: &ActorId,
    ) -> Result<Vec<ScoreEvent>, StoreError> {
        let mut events = self.scores.events_for_record(record_id)?;
        events.retain(|e| &e.version_hash == version_hash && &e.actor_id == actor_id);
        Ok(events)
    }

    /// Replay without writing and compare against the cache.
    ///
    /// A record with no events and no cache entry is consistent.
    pub fn audit(&self, record_id: &RecordId) -> Result<ScoreAudit, StoreError> {
        let events = self.scores.events_for_record(record_id)?;
        let replayed = replay_score(&self.params, &events);
        let cached = self.scores.get_cached_score(record_id)?.map(|c| c.score);
        let consistent = match cached {
            Some(score) => score == replayed,
            None => events.is_empty(),
        };
        if !consistent {
            tracing::warn!(record = %record_id, ?cached, replayed, "cached score diverges from event log");
        }
        Ok(ScoreAudit {
            record_id: record_id.clone(),
            cached,
            replayed,
            events: events.len(),
            consistent,
        })
    }
}
