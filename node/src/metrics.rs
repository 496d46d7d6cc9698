//! Prometheus metrics for the credibility node.
//!
//! [`NodeMetrics`] owns a dedicated [`Registry`] and receives action outcomes
//! from the core through [`ActionObserver`].

use std::time::Duration;

use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, Encoder, Histogram, HistogramOpts, IntCounter,
    IntCounterVec, Opts, Registry, TextEncoder,
};

use veracity_credibility::{ActionKind, ActionObserver, CredibilityError};
use veracity_types::{EntityKind, RecordId};

use crate::NodeError;

/// Central collection of all node-level Prometheus metrics.
pub struct NodeMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Actions whose ledger call succeeded and whose row was confirmed, by kind and action.
    pub actions_confirmed: IntCounterVec,
    /// Actions that failed after the guards passed, by kind, action and reason code.
    pub actions_failed: IntCounterVec,
    /// Actions refused by a guard before any write, by kind, action and reason code.
    pub actions_rejected: IntCounterVec,
    /// Compensating writes after a failed ledger call, by kind.
    pub compensations: IntCounterVec,
    /// Compensating writes that themselves failed, leaving a row pending.
    pub compensation_failures: IntCounter,
    pub score_recomputations: IntCounter,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Wall time of a single ledger call, in milliseconds.
    pub ledger_call_ms: Histogram,
}

impl NodeMetrics {
    /// Create a fresh set of metrics, all registered under a new [`Registry`].
    pub fn new() -> Result<Self, NodeError> {
        let registry = Registry::new();

        let actions_confirmed = register_int_counter_vec_with_registry!(
            Opts::new(
                "veracity_actions_confirmed_total",
                "Actions confirmed on the ledger and in the store"
            ),
            &["kind", "action"],
            registry
        )?;

        let actions_failed = register_int_counter_vec_with_registry!(
            Opts::new(
                "veracity_actions_failed_total",
                "Actions that failed after passing the guards"
            ),
            &["kind", "action", "reason"],
            registry
        )?;

        let actions_rejected = register_int_counter_vec_with_registry!(
            Opts::new(
                "veracity_actions_rejected_total",
                "Actions rejected before any write"
            ),
            &["kind", "action", "reason"],
            registry
        )?;

        let compensations = register_int_counter_vec_with_registry!(
            Opts::new(
                "veracity_compensations_total",
                "Compensating writes after a failed ledger call"
            ),
            &["kind"],
            registry
        )?;

        let compensation_failures = register_int_counter_with_registry!(
            Opts::new(
                "veracity_compensation_failures_total",
                "Compensating writes that failed and left a row pending"
            ),
            registry
        )?;

        let score_recomputations = register_int_counter_with_registry!(
            Opts::new(
                "veracity_score_recomputations_total",
                "Full score replays written to the cache"
            ),
            registry
        )?;

        // Exponential buckets covering 1 ms to ~16 s.
        let ledger_call_ms = register_histogram_with_registry!(
            HistogramOpts::new("veracity_ledger_call_ms", "Ledger call latency in milliseconds")
                .buckets(prometheus::exponential_buckets(1.0, 2.0, 15)?),
            registry
        )?;

        Ok(Self {
            registry,
            actions_confirmed,
            actions_failed,
            actions_rejected,
            compensations,
            compensation_failures,
            score_recomputations,
            ledger_call_ms,
        })
    }

    /// Render every metric in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, NodeError> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl ActionObserver for NodeMetrics {
    fn ledger_call(&self, _method: &'static str, elapsed: Duration) {
        self.ledger_call_ms.observe(elapsed.as_secs_f64() * 1000.0);
    }

    fn action_confirmed(&self, kind: EntityKind, action: ActionKind) {
        self.actions_confirmed
            .with_label_values(&[kind.as_str(), action.as_str()])
            .inc();
    }

    fn action_failed(&self, kind: EntityKind, action: ActionKind, error: &CredibilityError) {
        self.actions_failed
            .with_label_values(&[kind.as_str(), action.as_str(), error.reason_code()])
            .inc();
    }

    fn action_rejected(&self, kind: EntityKind, action: ActionKind, error: &CredibilityError) {
        self.actions_rejected
            .with_label_values(&[kind.as_str(), action.as_str(), error.reason_code()])
            .inc();
    }

    fn compensated(&self, kind: EntityKind) {
        self.compensations.with_label_values(&[kind.as_str()]).inc();
    }

    fn compensation_failed(&self, _kind: EntityKind) {
        self.compensation_failures.inc();
    }

    fn score_recomputed(&self, _record_id: &RecordId, _score: i64) {
        self.score_recomputations.inc();
    }
}
