//! Sample repository
//!
//! One logical sample lives in one of two physical partitions: the Sample
//! Store (`samples`) while it is a plain submission, and the Reviewed Sample
//! Store (`reviewed_samples`) for its review outcome. Every lookup or mutation
//! that addresses "a sample by identity" goes through [`SampleRepository`],
//! which walks the partitions in [`Partition::SEARCH_ORDER`] and reports which
//! one matched.

pub mod reviewed;
pub mod samples;

use crate::db::Database;
use lab_common::db::{Partition, SampleStatus, StoredRecord};
use lab_common::{Error, Result};
use tracing::debug;

pub use samples::NewSample;

/// Which rows of a partition a lookup or mutation may match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Any,
    Live,
    Deleted,
}

impl Visibility {
    fn clause(&self) -> &'static str {
        match self {
            Visibility::Any => "",
            Visibility::Live => " AND is_deleted = 0",
            Visibility::Deleted => " AND is_deleted = 1",
        }
    }
}

/// Cross-partition state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    SoftDelete,
    Restore,
    SetStatus(SampleStatus),
}

impl Mutation {
    /// Rows of `partition` this mutation may touch
    pub fn visibility(&self, partition: Partition) -> Visibility {
        match (self, partition) {
            (Mutation::SoftDelete, _) => Visibility::Live,
            (Mutation::Restore, _) => Visibility::Deleted,
            // Sample rows take a verdict in any state; review rows only while live.
            (Mutation::SetStatus(_), Partition::Samples) => Visibility::Any,
            (Mutation::SetStatus(_), Partition::ReviewedSamples) => Visibility::Live,
        }
    }

    fn assignment(&self) -> &'static str {
        match self {
            Mutation::SoftDelete => "is_deleted = 1",
            Mutation::Restore => "is_deleted = 0",
            Mutation::SetStatus(_) => "status = ?",
        }
    }
}

/// Logical repository over both sample partitions
#[derive(Clone, Debug)]
pub struct SampleRepository {
    db: Database,
}

impl SampleRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Find the record for an identity, trying partitions in search order
    pub async fn resolve(&self, id: &str, visibility: Visibility) -> Result<Option<StoredRecord>> {
        for partition in Partition::SEARCH_ORDER {
            let record = match partition {
                Partition::Samples => samples::find(self.db.pool(), id)
                    .await?
                    .map(StoredRecord::Samples),
                Partition::ReviewedSamples => reviewed::find(self.db.pool(), id)
                    .await?
                    .map(StoredRecord::ReviewedSamples),
            };

            if let Some(record) = record {
                let visible = match visibility {
                    Visibility::Any => true,
                    Visibility::Live => !record.is_deleted(),
                    Visibility::Deleted => record.is_deleted(),
                };
                if visible {
                    return Ok(Some(record));
                }
            }
        }

        Ok(None)
    }

    /// Apply a mutation to the first partition holding a matching row
    ///
    /// Each attempt is a single UPDATE, so the match and the write are atomic
    /// per partition. Returns the partition that changed, or `None` when no
    /// partition had a matching row.
    pub async fn apply(&self, id: &str, mutation: Mutation) -> Result<Option<Partition>> {
        for partition in Partition::SEARCH_ORDER {
            let sql = format!(
                "UPDATE {} SET {} WHERE id = ?{}",
                partition.table(),
                mutation.assignment(),
                mutation.visibility(partition).clause()
            );

            let mut query = sqlx::query(&sql);
            if let Mutation::SetStatus(status) = mutation {
                query = query.bind(status);
            }

            let result = query.bind(id).execute(self.db.pool()).await?;

            if result.rows_affected() > 0 {
                debug!(id, %partition, ?mutation, "Mutation applied");
                return Ok(Some(partition));
            }
        }

        Ok(None)
    }

    /// Soft-deleted rows from both partitions, samples first
    pub async fn recycle_bin(&self) -> Result<Vec<StoredRecord>> {
        let deleted_samples = samples::list_deleted(self.db.pool()).await?;
        let deleted_reviews = reviewed::list_deleted(self.db.pool()).await?;

        Ok(deleted_samples
            .into_iter()
            .map(StoredRecord::Samples)
            .chain(deleted_reviews.into_iter().map(StoredRecord::ReviewedSamples))
            .collect())
    }

    /// Remove a sample and its review in one transaction
    ///
    /// The identity must exist in the Sample Store. The review row goes first
    /// so the foreign key never sees an orphan.
    pub async fn purge(&self, id: &str) -> Result<()> {
        let mut tx = self.db.begin_write("SampleRepository::purge").await?;

        if samples::find(&mut *tx, id).await?.is_none() {
            tx.rollback().await?;
            return Err(Error::NotFound(format!("Sample {} does not exist", id)));
        }

        let reviews_removed = reviewed::delete_by_sample(&mut *tx, id).await?;
        samples::delete(&mut *tx, id).await?;

        tx.commit().await?;

        debug!(id, reviews_removed, "Sample purged");
        Ok(())
    }
}
