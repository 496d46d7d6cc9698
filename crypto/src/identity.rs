//! Deterministic identifiers.
//!
//! Row identity in the mutable store is a pure function of the version hash
//! and the actors involved, so "one verification per actor per version" is
//! enforced by key collision rather than by a query. Each input is length
//! prefixed and each key family carries its own domain tag, so distinct
//! inputs never collide by concatenation.

use crate::hash::blake2b_256_multi;
use veracity_types::{ActorDigest, ActorId, EntityKey, VersionHash};

const ACTOR_DOMAIN: &[u8] = b"veracity/actor";
const ENTITY_DOMAIN: &[u8] = b"veracity/entity";
const REACTION_DOMAIN: &[u8] = b"veracity/reaction";

/// One-way digest of an actor id. This is the only actor reference the ledger sees.
pub fn actor_digest(actor: &ActorId) -> ActorDigest {
    ActorDigest::new(blake2b_256_multi(&[ACTOR_DOMAIN, actor.as_str().as_bytes()]))
}

/// Identity key of a verification or dispute row: `(version_hash, actor)`.
pub fn compose_key(version_hash: &VersionHash, actor: &ActorId) -> EntityKey {
    let vh = version_hash.as_str().as_bytes();
    let a = actor.as_str().as_bytes();
    EntityKey::new(blake2b_256_multi(&[
        ENTITY_DOMAIN,
        &(vh.len() as u64).to_be_bytes(),
        vh,
        &(a.len() as u64).to_be_bytes(),
        a,
    ]))
}

/// Identity key of a reaction row: `(version_hash, dispute_actor, reactor)`.
pub fn compose_reaction_key(
    version_hash: &VersionHash,
    dispute_actor: &ActorId,
    reactor: &ActorId,
) -> EntityKey {
    let vh = version_hash.as_str().as_bytes();
    let d = dispute_actor.as_str().as_bytes();
    let r = reactor.as_str().as_bytes();
    EntityKey::new(blake2b_256_multi(&[
        REACTION_DOMAIN,
        &(vh.len() as u64).to_be_bytes(),
        vh,
        &(d.len() as u64).to_be_bytes(),
        d,
        &(r.len() as u64).to_be_bytes(),
        r,
    ]))
}
