use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("credibility error: {0}")]
    Credibility(#[from] veracity_credibility::CredibilityError),

    #[error("store error: {0}")]
    Store(#[from] veracity_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] veracity_store_lmdb::LmdbError),

    #[error(transparent)]
    Params(#[from] veracity_types::TypesError),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("config error: {0}")]
    Config(String),
}
