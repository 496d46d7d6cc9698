//! The credibility node: LMDB storage, a bounded ledger client and the
//! credibility service wired together, with every action traced.

use std::sync::Arc;

use tracing::Instrument;

use veracity_credibility::{
    ActionKind, ActionObserver, ActionOutcome, CredibilityError, CredibilityService, Notes,
    NoopObserver, ScoreAudit, ServiceDeps, ToggleResult,
};
use veracity_crypto::{compose_key, compose_reaction_key};
use veracity_ledger::{ActorPreparation, LedgerClient, RoleOracle, TimeoutLedger};
use veracity_store::RecordDirectory;
use veracity_store_lmdb::{LmdbEnvironment, DATABASE_COUNT};
use veracity_types::{
    ActorId, DisputeGrade, DisputeRecord, EntityKind, RecordId, RecordInfo, VerificationLevel,
    VerificationRecord, VersionHash,
};

use crate::config::NodeConfig;
use crate::metrics::NodeMetrics;
use crate::tracing_spans::{action_span, recompute_span};
use crate::NodeError;

/// External ledger-side collaborators supplied by the embedding application.
pub struct LedgerBoundary {
    pub client: Arc<dyn LedgerClient>,
    pub preparation: Arc<dyn ActorPreparation>,
    pub roles: Arc<dyn RoleOracle>,
}

pub struct CredibilityNode {
    config: NodeConfig,
    env: LmdbEnvironment,
    service: CredibilityService,
    metrics: Option<Arc<NodeMetrics>>,
}

impl CredibilityNode {
    /// Open the LMDB environment under `data_dir` and build the service.
    ///
    /// The ledger client is wrapped so that no call outlives `ledger_timeout_ms`.
    pub fn open(config: NodeConfig, boundary: LedgerBoundary) -> Result<Self, NodeError> {
        let env = LmdbEnvironment::open(&config.data_dir, DATABASE_COUNT, config.map_size_bytes())?;
        let stores = env.stores()?;

        let metrics = if config.enable_metrics {
            Some(Arc::new(NodeMetrics::new()?))
        } else {
            None
        };
        let observer: Arc<dyn ActionObserver> = match &metrics {
            Some(m) => m.clone(),
            None => Arc::new(NoopObserver),
        };

        let ledger: Arc<dyn LedgerClient> =
            Arc::new(TimeoutLedger::new(boundary.client, config.ledger_timeout()));
        let deps = ServiceDeps::new(stores, ledger, boundary.preparation, boundary.roles)
            .with_observer(observer);
        let service = CredibilityService::new(deps, config.service_config())?;

        tracing::info!(
            data_dir = %config.data_dir.display(),
            map_size_mb = config.map_size_mb,
            ledger_timeout_ms = config.ledger_timeout_ms,
            metrics = config.enable_metrics,
            "credibility node opened"
        );

        Ok(Self {
            config,
            env,
            service,
            metrics,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn service(&self) -> &CredibilityService {
        &self.service
    }

    pub fn environment(&self) -> &LmdbEnvironment {
        &self.env
    }

    /// Prometheus metrics, when enabled in the config.
    pub fn metrics(&self) -> Option<&NodeMetrics> {
        self.metrics.as_deref()
    }

    /// Register or update a record from the external system of record.
    pub fn register_record(&self, record: &RecordInfo) -> Result<(), NodeError> {
        self.service.stores().records.put_record(record)?;
        tracing::debug!(record = %record.record_id, versions = record.prior_hashes.len() + 1, "record registered");
        Ok(())
    }

    pub async fn create_verification(
        &self,
        actor: &ActorId,
        record_id: &RecordId,
        version_hash: &VersionHash,
        level: VerificationLevel,
    ) -> Result<ActionOutcome<VerificationRecord>, CredibilityError> {
        let span = action_span(
            EntityKind::Verification,
            ActionKind::Create,
            &compose_key(version_hash, actor),
        );
        self.service
            .create_verification(actor, record_id, version_hash, level)
            .instrument(span)
            .await
    }

    pub async fn modify_verification(
        &self,
        actor: &ActorId,
        version_hash: &VersionHash,
        level: VerificationLevel,
    ) -> Result<ActionOutcome<VerificationRecord>, CredibilityError> {
        let span = action_span(
            EntityKind::Verification,
            ActionKind::Modify,
            &compose_key(version_hash, actor),
        );
        self.service
            .modify_verification(actor, version_hash, level)
            .instrument(span)
            .await
    }

    pub async fn retract_verification(
        &self,
        actor: &ActorId,
        version_hash: &VersionHash,
    ) -> Result<ActionOutcome<VerificationRecord>, CredibilityError> {
        let span = action_span(
            EntityKind::Verification,
            ActionKind::Retract,
            &compose_key(version_hash, actor),
        );
        self.service
            .retract_verification(actor, version_hash)
            .instrument(span)
            .await
    }

    pub async fn create_dispute(
        &self,
        actor: &ActorId,
        record_id: &RecordId,
        version_hash: &VersionHash,
        grade: DisputeGrade,
        notes: Option<Notes<'_>>,
    ) -> Result<ActionOutcome<DisputeRecord>, CredibilityError> {
        let span = action_span(
            EntityKind::Dispute,
            ActionKind::Create,
            &compose_key(version_hash, actor),
        );
        self.service
            .create_dispute(actor, record_id, version_hash, grade, notes)
            .instrument(span)
            .await
    }

    pub async fn modify_dispute(
        &self,
        actor: &ActorId,
        version_hash: &VersionHash,
        grade: DisputeGrade,
        notes: Option<Notes<'_>>,
    ) -> Result<ActionOutcome<DisputeRecord>, CredibilityError> {
        let span = action_span(
            EntityKind::Dispute,
            ActionKind::Modify,
            &compose_key(version_hash, actor),
        );
        self.service
            .modify_dispute(actor, version_hash, grade, notes)
            .instrument(span)
            .await
    }

    pub async fn retract_dispute(
        &self,
        actor: &ActorId,
        version_hash: &VersionHash,
    ) -> Result<ActionOutcome<DisputeRecord>, CredibilityError> {
        let span = action_span(
            EntityKind::Dispute,
            ActionKind::Retract,
            &compose_key(version_hash, actor),
        );
        self.service
            .retract_dispute(actor, version_hash)
            .instrument(span)
            .await
    }

    /// Support or oppose a dispute, or undo a previous reaction.
    pub async fn toggle_reaction(
        &self,
        reactor: &ActorId,
        version_hash: &VersionHash,
        dispute_actor: &ActorId,
        supports_dispute: bool,
    ) -> Result<ToggleResult, CredibilityError> {
        let key = compose_reaction_key(version_hash, dispute_actor, reactor);
        let span = tracing::info_span!("reaction_toggle", key = %key, supports = supports_dispute);
        self.service
            .toggle_reaction(reactor, version_hash, dispute_actor, supports_dispute)
            .instrument(span)
            .await
    }

    /// Rebuild a record's cached score from its event log.
    pub fn recompute_score(&self, record_id: &RecordId) -> Result<i64, CredibilityError> {
        let _entered = recompute_span(record_id).entered();
        self.service.recompute_score(record_id)
    }

    pub fn audit_score(&self, record_id: &RecordId) -> Result<ScoreAudit, CredibilityError> {
        let _entered = recompute_span(record_id).entered();
        self.service.audit_score(record_id)
    }
}
