//! Cryptographic primitives for the veracity credibility ledger.
//!
//! - **Blake2b** for actor digests and deterministic row identity keys
//! - **ChaCha20-Poly1305** for client-side encryption of dispute notes
//! - **SHA-256** content digests that anchor notes on the ledger without revealing them

pub mod encryption;
pub mod error;
pub mod hash;
pub mod identity;

pub use encryption::{decrypt_notes, encrypt_notes, notes_digest, NotesKey};
pub use error::CryptoError;
pub use hash::{blake2b_256, blake2b_256_multi};
pub use identity::{actor_digest, compose_key, compose_reaction_key};
