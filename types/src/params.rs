//! Scoring parameters: starting score, bounds, and the weight tables that turn
//! verification levels and dispute grades into score deltas.

use crate::{Culpability, Severity, TypesError, VerificationLevel};
use serde::{Deserialize, Serialize};

/// Basis-point denominator for culpability multipliers (10_000 = 1.0x).
pub const BPS_DENOMINATOR: i64 = 10_000;

/// All tunables of the score engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringParams {
    /// Score of a record with no events.
    #[serde(default = "default_initial_score")]
    pub initial_score: i64,

    #[serde(default)]
    pub min_score: i64,

    #[serde(default = "default_max_score")]
    pub max_score: i64,

    #[serde(default)]
    pub verification_weights: VerificationWeights,

    #[serde(default)]
    pub severity_penalties: SeverityPenalties,

    #[serde(default)]
    pub culpability_multipliers_bps: CulpabilityMultipliers,
}

/// Score added by an active verification, per level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationWeights {
    pub provenance: i64,
    pub content: i64,
    pub full: i64,
}

/// Base score removed by an active dispute, per severity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityPenalties {
    pub negligible: i64,
    pub moderate: i64,
    pub major: i64,
}

/// Scaling applied to a severity penalty, per culpability, in basis points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CulpabilityMultipliers {
    pub unknown: u32,
    pub no_fault: u32,
    pub systemic: u32,
    pub preventable: u32,
    pub reckless: u32,
    pub intentional: u32,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_initial_score() -> i64 {
    500
}

fn default_max_score() -> i64 {
    1000
}

impl Default for VerificationWeights {
    fn default() -> Self {
        Self {
            provenance: 25,
            content: 50,
            full: 100,
        }
    }
}

impl Default for SeverityPenalties {
    fn default() -> Self {
        Self {
            negligible: 25,
            moderate: 75,
            major: 150,
        }
    }
}

impl Default for CulpabilityMultipliers {
    fn default() -> Self {
        Self {
            unknown: 10_000,
            no_fault: 2_500,
            systemic: 5_000,
            preventable: 10_000,
            reckless: 15_000,
            intentional: 20_000,
        }
    }
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            initial_score: default_initial_score(),
            min_score: 0,
            max_score: default_max_score(),
            verification_weights: VerificationWeights::default(),
            severity_penalties: SeverityPenalties::default(),
            culpability_multipliers_bps: CulpabilityMultipliers::default(),
        }
    }
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ScoringParams {
    pub fn verification_weight(&self, level: VerificationLevel) -> i64 {
        let w = &self.verification_weights;
        match level {
            VerificationLevel::Provenance => w.provenance,
            VerificationLevel::Content => w.content,
            VerificationLevel::Full => w.full,
        }
    }

    pub fn severity_penalty(&self, severity: Severity) -> i64 {
        let p = &self.severity_penalties;
        match severity {
            Severity::Negligible => p.negligible,
            Severity::Moderate => p.moderate,
            Severity::Major => p.major,
        }
    }

    pub fn culpability_multiplier_bps(&self, culpability: Culpability) -> u32 {
        let m = &self.culpability_multipliers_bps;
        match culpability {
            Culpability::Unknown => m.unknown,
            Culpability::NoFault => m.no_fault,
            Culpability::Systemic => m.systemic,
            Culpability::Preventable => m.preventable,
            Culpability::Reckless => m.reckless,
            Culpability::Intentional => m.intentional,
        }
    }

    /// Penalty of a dispute: severity penalty scaled by the culpability
    /// multiplier, rounded half away from zero. Always non-negative.
    pub fn dispute_penalty(&self, severity: Severity, culpability: Culpability) -> i64 {
        let scaled = self.severity_penalty(severity)
            * i64::from(self.culpability_multiplier_bps(culpability));
        (scaled + BPS_DENOMINATOR / 2).div_euclid(BPS_DENOMINATOR)
    }

    /// Clamp a raw score into `[min_score, max_score]`.
    pub fn clamp(&self, raw: i64) -> i64 {
        raw.clamp(self.min_score, self.max_score)
    }

    /// Check internal consistency.
    ///
    /// Verification weights must be positive and strictly increasing with
    /// level, penalties non-negative, and the score bounds ordered with the
    /// initial score inside them.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.min_score > self.max_score {
            return Err(TypesError::InvalidParams(format!(
                "min_score {} exceeds max_score {}",
                self.min_score, self.max_score
            )));
        }
        if self.initial_score < self.min_score || self.initial_score > self.max_score {
            return Err(TypesError::InvalidParams(format!(
                "initial_score {} outside [{}, {}]",
                self.initial_score, self.min_score, self.max_score
            )));
        }
        let w = &self.verification_weights;
        if !(0 < w.provenance && w.provenance < w.content && w.content < w.full) {
            return Err(TypesError::InvalidParams(
                "verification weights must be positive and strictly increasing".into(),
            ));
        }
        let p = &self.severity_penalties;
        if p.negligible < 0 || p.moderate < 0 || p.major < 0 {
            return Err(TypesError::InvalidParams(
                "severity penalties must be non-negative".into(),
            ));
        }
        Ok(())
    }
}
