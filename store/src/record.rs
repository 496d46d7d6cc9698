//! Record metadata lookup.

use crate::StoreError;
use veracity_types::{RecordId, RecordInfo};

/// Trait for the directory of records that can be verified or disputed.
pub trait RecordDirectory: Send + Sync {
    fn get_record(&self, record_id: &RecordId) -> Result<Option<RecordInfo>, StoreError>;

    /// Register or replace a record's metadata (new versions extend `prior_hashes`).
    fn put_record(&self, info: &RecordInfo) -> Result<(), StoreError>;
}
