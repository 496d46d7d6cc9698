//! Fundamental types for the veracity credibility ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! identifiers, digests, timestamps, entity rows, score events, and scoring parameters.

pub mod entity;
pub mod error;
pub mod hash;
pub mod ids;
pub mod params;
pub mod record;
pub mod score;
pub mod state;
pub mod time;

pub use entity::{
    DisputeGrade, DisputeRecord, EntityKind, Lifecycle, ReactionRecord, SealedNotes,
    VerificationRecord,
};
pub use error::TypesError;
pub use hash::{ActorDigest, EntityKey, NotesDigest};
pub use ids::{ActorId, LedgerTxRef, RecordId, VersionHash};
pub use params::ScoringParams;
pub use record::RecordInfo;
pub use score::{CachedScore, EventId, NewScoreEvent, ScoreEvent, ScoreEventType, ScoreMetadata};
pub use state::{Culpability, LedgerStatus, RecordRole, Severity, VerificationLevel};
pub use time::{Clock, SystemClock, Timestamp};
