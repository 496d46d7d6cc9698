//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use veracity_store::{StoredEntity, Stores};
use veracity_types::{DisputeRecord, ReactionRecord, VerificationRecord};

use crate::{LmdbEntityStore, LmdbError, LmdbRecordDirectory, LmdbScoreStore};

/// Databases backing one entity table.
#[derive(Clone, Copy)]
pub(crate) struct EntityTables {
    pub rows: Database<Bytes, Bytes>,
    pub groups: Database<Bytes, Bytes>,
}

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    verifications: EntityTables,
    disputes: EntityTables,
    reactions: EntityTables,
    score_events_db: Database<Bytes, Bytes>,
    scores_db: Database<Bytes, Bytes>,
    records_db: Database<Bytes, Bytes>,
    meta_db: Database<Bytes, Bytes>,
}

/// Number of named databases the environment creates.
pub const DATABASE_COUNT: u32 = 10;

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)
            .map_err(|e| LmdbError::Corrupt(format!("cannot create {}: {e}", path.display())))?;

        // SAFETY: the environment directory is owned by this process; no other
        // handle to it is opened with conflicting flags.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs.max(DATABASE_COUNT))
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let mut entity_tables = |name: &str| -> Result<EntityTables, LmdbError> {
            let rows = env.create_database(&mut wtxn, Some(name))?;
            let groups = env.create_database(&mut wtxn, Some(&format!("{name}_by_group")))?;
            Ok(EntityTables { rows, groups })
        };
        let verifications = entity_tables(VerificationRecord::TABLE)?;
        let disputes = entity_tables(DisputeRecord::TABLE)?;
        let reactions = entity_tables(ReactionRecord::TABLE)?;
        let score_events_db = env.create_database(&mut wtxn, Some("score_events"))?;
        let scores_db = env.create_database(&mut wtxn, Some("scores"))?;
        let records_db = env.create_database(&mut wtxn, Some("records"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            verifications,
            disputes,
            reactions,
            score_events_db,
            scores_db,
            records_db,
            meta_db,
        })
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    fn entity_tables(&self, table: &str) -> Result<EntityTables, LmdbError> {
        match table {
            t if t == VerificationRecord::TABLE => Ok(self.verifications),
            t if t == DisputeRecord::TABLE => Ok(self.disputes),
            t if t == ReactionRecord::TABLE => Ok(self.reactions),
            other => Err(LmdbError::Corrupt(format!("unknown entity table '{other}'"))),
        }
    }

    pub fn entity_store<E: StoredEntity>(&self) -> Result<LmdbEntityStore<E>, LmdbError> {
        let tables = self.entity_tables(E::TABLE)?;
        Ok(LmdbEntityStore::new(Arc::clone(&self.env), tables))
    }

    pub fn score_store(&self) -> LmdbScoreStore {
        LmdbScoreStore {
            env: Arc::clone(&self.env),
            events_db: self.score_events_db,
            scores_db: self.scores_db,
            meta_db: self.meta_db,
        }
    }

    pub fn record_directory(&self) -> LmdbRecordDirectory {
        LmdbRecordDirectory {
            env: Arc::clone(&self.env),
            records_db: self.records_db,
        }
    }

    /// All stores as one bundle of trait objects.
    pub fn stores(&self) -> Result<Stores, LmdbError> {
        Ok(Stores {
            verifications: Arc::new(self.entity_store::<VerificationRecord>()?),
            disputes: Arc::new(self.entity_store::<DisputeRecord>()?),
            reactions: Arc::new(self.entity_store::<ReactionRecord>()?),
            scores: Arc::new(self.score_store()),
            records: Arc::new(self.record_directory()),
        })
    }
}
