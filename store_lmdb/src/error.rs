use thiserror::Error;

use veracity_store::StoreError;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupt entry: {0}")]
    Corrupt(String),
}

impl From<bincode::Error> for LmdbError {
    fn from(e: bincode::Error) -> Self {
        LmdbError::Serialization(e.to_string())
    }
}

impl From<LmdbError> for StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::Heed(inner) => StoreError::Backend(inner.to_string()),
            LmdbError::Serialization(msg) => StoreError::Serialization(msg),
            LmdbError::Corrupt(msg) => StoreError::Corruption(msg),
        }
    }
}
