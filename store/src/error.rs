use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional write lost the race: the stored revision is not the one the caller read.
    #[error("revision mismatch on {key}: expected {expected:?}, found {actual:?}")]
    RevisionMismatch {
        key: String,
        expected: Option<u64>,
        actual: Option<u64>,
    },

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),
}
