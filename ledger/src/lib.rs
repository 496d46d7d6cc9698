//! Boundary to the immutable ledger.
//!
//! The ledger network itself is external. This crate describes the calls the
//! credibility core makes against it ([`LedgerCall`]), the client trait a
//! network adapter implements ([`LedgerClient`]), a timeout wrapper that turns
//! a call that never returns into an ordinary failure ([`TimeoutLedger`]), and
//! the precondition collaborators consulted before any write.

pub mod call;
pub mod client;
pub mod error;
pub mod preparation;
pub mod roles;
pub mod timeout;

pub use call::LedgerCall;
pub use client::LedgerClient;
pub use error::LedgerError;
pub use preparation::{ActorAddress, ActorPreparation, Readiness};
pub use roles::RoleOracle;
pub use timeout::TimeoutLedger;
