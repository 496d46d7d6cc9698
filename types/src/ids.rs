//! String identifiers for records, actors, and record versions.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Return the raw identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a record whose versions can be verified or disputed.
    RecordId
);

string_id!(
    /// An actor's stable off-chain identifier.
    ///
    /// Never sent to the ledger; the ledger only sees the [`ActorDigest`](crate::ActorDigest).
    ActorId
);

string_id!(
    /// Content-addressed identifier of one specific version of a record.
    VersionHash
);

string_id!(
    /// Transaction reference returned by the ledger for a confirmed call.
    LedgerTxRef
);
