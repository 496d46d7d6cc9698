//! Nullable role oracle.

use std::collections::HashMap;
use std::sync::Mutex;

use veracity_ledger::RoleOracle;
use veracity_types::{ActorId, RecordId, RecordRole};

/// Roles granted explicitly by the test; everyone else has none.
#[derive(Default)]
pub struct NullRoles {
    grants: Mutex<HashMap<(RecordId, ActorId), RecordRole>>,
}

impl NullRoles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, record_id: &RecordId, actor: &ActorId, role: RecordRole) {
        self.grants
            .lock()
            .unwrap()
            .insert((record_id.clone(), actor.clone()), role);
    }
}

impl RoleOracle for NullRoles {
    fn record_role(&self, record_id: &RecordId, actor: &ActorId) -> Option<RecordRole> {
        self.grants
            .lock()
            .unwrap()
            .get(&(record_id.clone(), actor.clone()))
            .copied()
    }
}
