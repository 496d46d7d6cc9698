//! Credibility ledger core.
//!
//! Third parties attach verifications (endorsements) and disputes (objections)
//! to one content-addressed version of a record, and react to disputes. Every
//! action is a dual write:
//! 1. **Store**: the row is upserted optimistically with `pending` status.
//! 2. **Ledger**: the matching contract call is submitted.
//! 3. **Reconcile**: the row is confirmed, or compensated when the call fails.
//!
//! Each confirmed state transition appends one immutable score event; the
//! cached record score is always a replay of that event log.

pub mod coordinator;
pub mod dispute;
pub mod entity;
pub mod error;
pub mod guard;
pub mod lineage;
pub mod observer;
pub mod reaction;
pub mod reads;
pub mod score;
pub mod service;
pub mod verification;

pub use coordinator::{ActionOutcome, Coordinator, DualWrite};
pub use dispute::Notes;
pub use entity::{ActionKind, Entity};
pub use error::{ConflictReason, CredibilityError, InvalidStateReason};
pub use guard::Guard;
pub use lineage::{build_version_map, Annotated};
pub use observer::{ActionObserver, NoopObserver, ACTION_COUNTERS};
pub use reaction::{ReactionStats, ToggleResult};
pub use score::{replay_score, score_delta, ScoreAudit, ScoreEngine, ScoredEvent};
pub use service::{CredibilityService, ServiceConfig, ServiceDeps};
