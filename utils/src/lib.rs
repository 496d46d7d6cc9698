//! Shared utilities for the veracity workspace.

pub mod logging;
pub mod stats;

pub use logging::{init_logging, try_init_logging, LogFormat};
pub use stats::StatsCounter;
