//! Errors raised while building or validating shared types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid scoring parameters: {0}")]
    InvalidParams(String),
}
