//! LMDB implementation of EntityStore.
//!
//! Rows are keyed by the 32-byte entity key; the value is the big-endian
//! revision followed by the bincode-encoded entity. A secondary database
//! holds `len(group) ++ group ++ entity_key` with empty values so that
//! listing a group is a prefix range-scan.

use std::marker::PhantomData;
use std::sync::Arc;

use heed::{Env, RoTxn};

use veracity_store::{EntityStore, StoreError, StoredEntity, Versioned};
use veracity_types::EntityKey;

use crate::environment::EntityTables;
use crate::{length_prefixed, range_scan, LmdbError};

const REVISION_LEN: usize = 8;
const KEY_LEN: usize = 32;

pub struct LmdbEntityStore<E> {
    env: Arc<Env>,
    tables: EntityTables,
    _entity: PhantomData<fn() -> E>,
}

impl<E: StoredEntity> LmdbEntityStore<E> {
    pub(crate) fn new(env: Arc<Env>, tables: EntityTables) -> Self {
        Self {
            env,
            tables,
            _entity: PhantomData,
        }
    }

    fn read_row(&self, txn: &RoTxn, key: &[u8]) -> Result<Option<Versioned<E>>, LmdbError> {
        match self.tables.rows.get(txn, key)? {
            Some(bytes) => decode_row(bytes).map(Some),
            None => Ok(None),
        }
    }
}

fn group_key(group: &str, key: &EntityKey) -> Vec<u8> {
    let mut out = length_prefixed(group.as_bytes());
    out.extend_from_slice(key.as_bytes());
    out
}

fn encode_row<E: StoredEntity>(revision: u64, value: &E) -> Result<Vec<u8>, LmdbError> {
    let body = bincode::serialize(value)?;
    let mut out = Vec::with_capacity(REVISION_LEN + body.len());
    out.extend_from_slice(&revision.to_be_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

fn decode_row<E: StoredEntity>(bytes: &[u8]) -> Result<Versioned<E>, LmdbError> {
    if bytes.len() < REVISION_LEN {
        return Err(LmdbError::Corrupt(format!(
            "{} row shorter than its revision header",
            E::TABLE
        )));
    }
    let (rev, body) = bytes.split_at(REVISION_LEN);
    let mut buf = [0u8; REVISION_LEN];
    buf.copy_from_slice(rev);
    Ok(Versioned {
        revision: u64::from_be_bytes(buf),
        value: bincode::deserialize(body)?,
    })
}

impl<E: StoredEntity> EntityStore<E> for LmdbEntityStore<E> {
    fn get(&self, key: &EntityKey) -> Result<Option<Versioned<E>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.read_row(&rtxn, key.as_bytes())?)
    }

    fn compare_and_put(
        &self,
        key: &EntityKey,
        expected: Option<u64>,
        value: &E,
    ) -> Result<u64, StoreError> {
        // LMDB allows a single writer, so the check and the write below are atomic.
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let existing = self.read_row(&wtxn, key.as_bytes())?;
        let actual = existing.as_ref().map(|row| row.revision);
        if actual != expected {
            return Err(StoreError::RevisionMismatch {
                key: key.to_string(),
                expected,
                actual,
            });
        }

        if let Some(old) = &existing {
            let old_group = old.value.group();
            if old_group != value.group() {
                self.tables
                    .groups
                    .delete(&mut wtxn, &group_key(&old_group, key))
                    .map_err(LmdbError::from)?;
            }
        }

        let revision = actual.unwrap_or(0) + 1;
        let row = encode_row(revision, value)?;
        self.tables
            .rows
            .put(&mut wtxn, key.as_bytes(), &row)
            .map_err(LmdbError::from)?;
        self.tables
            .groups
            .put(&mut wtxn, &group_key(&value.group(), key), b"")
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(revision)
    }

    fn list_group(&self, group: &str) -> Result<Vec<Versioned<E>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = length_prefixed(group.as_bytes());
        let mut rows = Vec::new();
        for (index_key, _) in range_scan(&self.tables.groups, &rtxn, &prefix)? {
            if index_key.len() != prefix.len() + KEY_LEN {
                return Err(LmdbError::Corrupt(format!("{} group index entry", E::TABLE)).into());
            }
            let entity_key = &index_key[prefix.len()..];
            match self.read_row(&rtxn, entity_key)? {
                Some(row) => rows.push(row),
                None => {
                    return Err(
                        LmdbError::Corrupt(format!("{} index points at missing row", E::TABLE))
                            .into(),
                    )
                }
            }
        }
        Ok(rows)
    }
}
