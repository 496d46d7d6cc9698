//! Fixed-size digest types: actor digests, entity keys, and notes digests.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! digest_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name([u8; 32]);

        impl $name {
            pub const ZERO: Self = Self([0u8; 32]);

            pub fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode(&self.0[..4]))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode(&self.0))
            }
        }
    };
}

digest_type!(
    /// One-way digest of an [`ActorId`](crate::ActorId), the only actor
    /// reference that is ever handed to the ledger.
    ActorDigest
);

digest_type!(
    /// Row identity in the mutable store, derived deterministically from
    /// the version hash and the participating actor ids.
    EntityKey
);

digest_type!(
    /// Content digest of dispute notes, anchored on the ledger instead of the text.
    NotesDigest
);
