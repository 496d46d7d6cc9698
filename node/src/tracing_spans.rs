//! Pre-built [`tracing::Span`] constructors for credibility node operations.
//!
//! Consistent span names and fields make traces easy to filter and correlate.

use tracing::{info_span, Span};

use veracity_credibility::ActionKind;
use veracity_types::{EntityKey, EntityKind, RecordId};

/// Span covering one dual-write action on one entity key.
pub fn action_span(kind: EntityKind, action: ActionKind, key: &EntityKey) -> Span {
    info_span!("action", kind = kind.as_str(), action = action.as_str(), key = %key)
}

/// Span covering a full score replay for one record.
pub fn recompute_span(record_id: &RecordId) -> Span {
    info_span!("recompute", record = %record_id)
}
