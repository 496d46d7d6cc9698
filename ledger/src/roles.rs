use veracity_types::{ActorId, RecordId, RecordRole};

/// Synchronous role predicate over records, backed by the external auth system.
pub trait RoleOracle: Send + Sync {
    /// The actor's role on the record, if they hold one.
    fn record_role(&self, record_id: &RecordId, actor: &ActorId) -> Option<RecordRole>;
}
