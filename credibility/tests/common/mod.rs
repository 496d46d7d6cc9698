#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use veracity_credibility::{CredibilityService, ServiceConfig, ServiceDeps, ACTION_COUNTERS};
use veracity_ledger::{LedgerClient, TimeoutLedger};
use veracity_nullables::{NullClock, NullLedger, NullPreparation, NullRoles, NullStore};
use veracity_store::RecordDirectory;
use veracity_types::{ActorId, RecordId, RecordInfo, VersionHash};
use veracity_utils::StatsCounter;

pub const RECORD: &str = "rec-1";
pub const CURRENT: &str = "h2";
pub const PRIOR: &str = "h1";
pub const AUTHOR: &str = "author";

pub struct Harness {
    pub store: NullStore,
    pub ledger: Arc<NullLedger>,
    pub preparation: Arc<NullPreparation>,
    pub roles: Arc<NullRoles>,
    pub clock: Arc<NullClock>,
    pub stats: Arc<StatsCounter>,
    pub service: CredibilityService,
}

pub fn actor(name: &str) -> ActorId {
    ActorId::new(name)
}

pub fn record() -> RecordId {
    RecordId::new(RECORD)
}

pub fn current() -> VersionHash {
    VersionHash::new(CURRENT)
}

pub fn prior() -> VersionHash {
    VersionHash::new(PRIOR)
}

pub fn harness() -> Harness {
    harness_with(ServiceConfig::default(), None)
}

/// Build a service over nullables. With `timeout`, the ledger is wrapped in a [`TimeoutLedger`].
pub fn harness_with(config: ServiceConfig, timeout: Option<Duration>) -> Harness {
    let store = NullStore::new();
    store
        .records
        .put_record(&RecordInfo {
            record_id: record(),
            author: actor(AUTHOR),
            current_hash: current(),
            prior_hashes: vec![prior()],
        })
        .unwrap();

    let ledger = Arc::new(NullLedger::new());
    let client: Arc<dyn LedgerClient> = match timeout {
        Some(t) => Arc::new(TimeoutLedger::new(ledger.clone(), t)),
        None => ledger.clone(),
    };
    let preparation = Arc::new(NullPreparation::new());
    let roles = Arc::new(NullRoles::new());
    let clock = Arc::new(NullClock::default());
    let stats = Arc::new(StatsCounter::new(ACTION_COUNTERS));

    let deps = ServiceDeps::new(store.stores(), client, preparation.clone(), roles.clone())
        .with_clock(clock.clone())
        .with_observer(stats.clone());
    let service = CredibilityService::new(deps, config).unwrap();

    Harness {
        store,
        ledger,
        preparation,
        roles,
        clock,
        stats,
        service,
    }
}
