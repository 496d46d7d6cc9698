//! LMDB implementation of RecordDirectory.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use veracity_store::{RecordDirectory, StoreError};
use veracity_types::{RecordId, RecordInfo};

use crate::LmdbError;

pub struct LmdbRecordDirectory {
    pub(crate) env: Arc<Env>,
    pub(crate) records_db: Database<Bytes, Bytes>,
}

impl RecordDirectory for LmdbRecordDirectory {
    fn get_record(&self, record_id: &RecordId) -> Result<Option<RecordInfo>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .records_db
            .get(&rtxn, record_id.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?)),
            None => Ok(None),
        }
    }

    fn put_record(&self, info: &RecordInfo) -> Result<(), StoreError> {
        let bytes = bincode::serialize(info).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.records_db
            .put(&mut wtxn, info.record_id.as_str().as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;
    use veracity_types::{ActorId, VersionHash};

    #[test]
    fn put_and_get_record() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 16, 1 << 20).unwrap();
        let dirs = env.record_directory();
        let info = RecordInfo {
            record_id: RecordId::new("rec-1"),
            author: ActorId::new("author"),
            current_hash: VersionHash::new("h3"),
            prior_hashes: vec![VersionHash::new("h1"), VersionHash::new("h2")],
        };

        assert_eq!(dirs.get_record(&info.record_id).unwrap(), None);
        dirs.put_record(&info).unwrap();
        assert_eq!(dirs.get_record(&info.record_id).unwrap(), Some(info));
    }
}
