//! The credibility service: guards, preconditions and the coordinator wired together.

use std::sync::Arc;
use std::time::Duration;

use veracity_ledger::{ActorPreparation, LedgerClient, LedgerError, RoleOracle};
use veracity_store::Stores;
use veracity_types::{
    ActorId, Clock, EntityKind, RecordId, ScoringParams, SystemClock, TypesError, VersionHash,
};
use veracity_utils::StatsCounter;

use crate::coordinator::Coordinator;
use crate::entity::ActionKind;
use crate::error::CredibilityError;
use crate::guard::Guard;
use crate::observer::{ActionObserver, ACTION_COUNTERS};
use crate::score::ScoreEngine;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub scoring: ScoringParams,
    /// Require the reviewer role for creating and modifying entities.
    pub require_reviewer_role: bool,
    /// A pending row untouched for this long is treated as abandoned: its
    /// action may be reissued. Keep it above the ledger call timeout.
    pub pending_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringParams::default(),
            require_reviewer_role: false,
            pending_timeout: Duration::from_secs(30),
        }
    }
}

/// External collaborators of the service.
pub struct ServiceDeps {
    pub stores: Stores,
    pub ledger: Arc<dyn LedgerClient>,
    pub preparation: Arc<dyn ActorPreparation>,
    pub roles: Arc<dyn RoleOracle>,
    pub clock: Arc<dyn Clock>,
    pub observer: Arc<dyn ActionObserver>,
}

impl ServiceDeps {
    /// Collaborators with the system clock and an in-process [`StatsCounter`] observer.
    pub fn new(
        stores: Stores,
        ledger: Arc<dyn LedgerClient>,
        preparation: Arc<dyn ActorPreparation>,
        roles: Arc<dyn RoleOracle>,
    ) -> Self {
        Self {
            stores,
            ledger,
            preparation,
            roles,
            clock: Arc::new(SystemClock),
            observer: Arc::new(StatsCounter::new(ACTION_COUNTERS)),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ActionObserver>) -> Self {
        self.observer = observer;
        self
    }
}

pub struct CredibilityService {
    pub(crate) stores: Stores,
    pub(crate) guard: Guard,
    pub(crate) coordinator: Coordinator,
    pub(crate) scores: Arc<ScoreEngine>,
    pub(crate) ledger: Arc<dyn LedgerClient>,
    pub(crate) preparation: Arc<dyn ActorPreparation>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) observer: Arc<dyn ActionObserver>,
}

impl CredibilityService {
    pub fn new(deps: ServiceDeps, config: ServiceConfig) -> Result<Self, TypesError> {
        config.scoring.validate()?;
        let ServiceDeps {
            stores,
            ledger,
            preparation,
            roles,
            clock,
            observer,
        } = deps;
        let scores = Arc::new(ScoreEngine::new(
            stores.scores.clone(),
            config.scoring,
            clock.clone(),
            observer.clone(),
        ));
        let coordinator = Coordinator::new(
            ledger.clone(),
            scores.clone(),
            clock.clone(),
            observer.clone(),
        );
        let guard = Guard::new(
            stores.records.clone(),
            roles,
            clock.clone(),
            config.require_reviewer_role,
            config.pending_timeout,
        );
        Ok(Self {
            stores,
            guard,
            coordinator,
            scores,
            ledger,
            preparation,
            clock,
            observer,
        })
    }

    pub fn score_engine(&self) -> &ScoreEngine {
        &self.scores
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Actor setup and record prerequisites, then (for creates) version
    /// anchoring. Runs before any store write, so failures need no compensation.
    pub(crate) async fn preconditions(
        &self,
        actor: &ActorId,
        record_id: &RecordId,
        anchor: Option<&VersionHash>,
    ) -> Result<(), CredibilityError> {
        let address = self.preparation.ensure_actor_ready(actor).await?;
        tracing::debug!(%actor, %address, "actor ready");

        let readiness = self.preparation.verify_prerequisites(record_id).await?;
        if !readiness.ready {
            let reason = readiness
                .reason
                .unwrap_or_else(|| "prerequisites not met".to_string());
            return Err(LedgerError::NotReady(reason).into());
        }

        if let Some(version_hash) = anchor {
            self.ledger.ensure_hash_anchored(record_id, version_hash).await?;
        }
        Ok(())
    }

    /// Report an action's outcome to the observer and pass it through.
    pub(crate) fn observe<T>(
        &self,
        kind: EntityKind,
        action: ActionKind,
        result: Result<T, CredibilityError>,
    ) -> Result<T, CredibilityError> {
        match &result {
            Ok(_) => self.observer.action_confirmed(kind, action),
            Err(err) if err.is_rejection() => {
                tracing::debug!(
                    kind = kind.as_str(),
                    action = action.as_str(),
                    reason = err.reason_code(),
                    "action rejected"
                );
                self.observer.action_rejected(kind, action, err)
            }
            Err(err) => self.observer.action_failed(kind, action, err),
        }
        result
    }
}
