//! Credibility node: composition root over LMDB storage and a ledger client.
//!
//! Loads [`NodeConfig`], opens the LMDB environment, bounds every ledger call
//! with a timeout, exports Prometheus metrics and wraps actions in tracing spans.

pub mod config;
pub mod error;
pub mod metrics;
pub mod node;
pub mod tracing_spans;

pub use config::NodeConfig;
pub use error::NodeError;
pub use metrics::NodeMetrics;
pub use node::{CredibilityNode, LedgerBoundary};
pub use veracity_utils::{init_logging, try_init_logging, LogFormat};
