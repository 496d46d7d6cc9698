//! Nullable infrastructure for deterministic testing.
//!
//! All external collaborators (clock, ledger, storage, roles, actor
//! preparation) are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (scripted failures, hangs)
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod ledger;
pub mod preparation;
pub mod roles;
pub mod store;

pub use clock::NullClock;
pub use ledger::NullLedger;
pub use preparation::NullPreparation;
pub use roles::NullRoles;
pub use store::{NullEntityStore, NullRecordDirectory, NullScoreStore, NullStore};
