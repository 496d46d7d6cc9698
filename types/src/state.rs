//! Lifecycle and classification enums for verifications, disputes, and roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reconciliation state of a store row against the immutable ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerStatus {
    /// Written to the store; the ledger call is in flight.
    Pending,
    /// The ledger accepted the call.
    Confirmed,
    /// The ledger call failed and the row was compensated.
    Failed,
}

impl LedgerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much of a record version a verifier vouches for.
///
/// Ordered: `Provenance < Content < Full`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VerificationLevel {
    /// The source and origin of the record are genuine.
    Provenance,
    /// The content is accurate.
    Content,
    /// Provenance and content both check out.
    Full,
}

impl VerificationLevel {
    pub const ALL: [Self; 3] = [Self::Provenance, Self::Content, Self::Full];

    /// Numeric code used in ledger calls.
    pub fn code(&self) -> u8 {
        match self {
            Self::Provenance => 1,
            Self::Content => 2,
            Self::Full => 3,
        }
    }
}

/// How serious the problem raised by a dispute is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Negligible,
    Moderate,
    Major,
}

impl Severity {
    pub const ALL: [Self; 3] = [Self::Negligible, Self::Moderate, Self::Major];

    pub fn code(&self) -> u8 {
        match self {
            Self::Negligible => 1,
            Self::Moderate => 2,
            Self::Major => 3,
        }
    }
}

/// How responsible the record's author is judged to be for a disputed problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Culpability {
    Unknown,
    NoFault,
    Systemic,
    Preventable,
    Reckless,
    Intentional,
}

impl Culpability {
    pub const ALL: [Self; 6] = [
        Self::Unknown,
        Self::NoFault,
        Self::Systemic,
        Self::Preventable,
        Self::Reckless,
        Self::Intentional,
    ];

    pub fn code(&self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::NoFault => 1,
            Self::Systemic => 2,
            Self::Preventable => 3,
            Self::Reckless => 4,
            Self::Intentional => 5,
        }
    }
}

/// Role an actor holds on a record, as reported by the external permission system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordRole {
    Author,
    Editor,
    Reviewer,
    Reader,
}

impl RecordRole {
    /// Whether holding this role makes reviewing the record a conflict of interest.
    pub fn is_conflicted(&self) -> bool {
        matches!(self, Self::Author | Self::Editor)
    }
}
