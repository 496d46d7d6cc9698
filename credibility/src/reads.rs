//! Read paths: rows annotated with version numbers, scores, and audits.

use std::collections::HashMap;

use veracity_store::{EntityStore, RecordDirectory, Versioned};
use veracity_types::{DisputeRecord, RecordId, ScoreEvent, VerificationRecord, VersionHash};

use crate::entity::Entity;
use crate::error::CredibilityError;
use crate::lineage::{build_version_map, Annotated};
use crate::score::ScoreAudit;
use crate::service::CredibilityService;

impl CredibilityService {
    fn version_map(&self, record_id: &RecordId) -> Result<HashMap<VersionHash, u32>, CredibilityError> {
        Ok(match self.stores.records.get_record(record_id)? {
            Some(info) => build_version_map(&info.current_hash, &info.prior_hashes),
            None => HashMap::new(),
        })
    }

    fn annotated<E: Entity>(
        &self,
        store: &dyn EntityStore<E>,
        record_id: &RecordId,
    ) -> Result<Vec<Annotated<E>>, CredibilityError> {
        let versions = self.version_map(record_id)?;
        let mut rows: Vec<Annotated<E>> = store
            .list_group(record_id.as_str())?
            .into_iter()
            .map(|Versioned { value, .. }| Annotated {
                version: versions.get(value.version_hash()).copied(),
                item: value,
            })
            .collect();
        rows.sort_by_key(|a| (a.version.unwrap_or(u32::MAX), a.item.lifecycle().created_at));
        Ok(rows)
    }

    /// All verification rows for a record, ordered by version number (the
    /// current version is 1) and then by creation time.
    pub fn verifications_for_record(
        &self,
        record_id: &RecordId,
    ) -> Result<Vec<Annotated<VerificationRecord>>, CredibilityError> {
        self.annotated(self.stores.verifications.as_ref(), record_id)
    }

    /// All dispute rows for a record, in the same order as
    /// [`Self::verifications_for_record`].
    pub fn disputes_for_record(
        &self,
        record_id: &RecordId,
    ) -> Result<Vec<Annotated<DisputeRecord>>, CredibilityError> {
        self.annotated(self.stores.disputes.as_ref(), record_id)
    }

    pub fn score(&self, record_id: &RecordId) -> Result<i64, CredibilityError> {
        Ok(self.scores.score(record_id)?)
    }

    pub fn score_events(&self, record_id: &RecordId) -> Result<Vec<ScoreEvent>, CredibilityError> {
        Ok(self.scores.events(record_id)?)
    }

    /// Rebuild the cached score from the event log.
    pub fn recompute_score(&self, record_id: &RecordId) -> Result<i64, CredibilityError> {
        Ok(self.scores.recompute_score(record_id)?.score)
    }

    pub fn audit_score(&self, record_id: &RecordId) -> Result<ScoreAudit, CredibilityError> {
        Ok(self.scores.audit(record_id)?)
    }
}
