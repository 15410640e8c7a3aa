//! Lifecycle controller
//!
//! Moves a sample between active, deleted, restored and purged states, and
//! records approve/reject verdicts. All cross-store fallback goes through
//! [`SampleRepository`]; this layer validates input and turns "no partition
//! matched" into `NotFound`.

use crate::store::{samples, Mutation, NewSample, SampleRepository, Visibility};
use lab_common::db::{Partition, Sample, SampleStatus, StoredRecord};
use lab_common::{Error, Result};
use tracing::{debug, info, warn};

/// Raw submission fields; any may be missing
#[derive(Debug, Clone, Default)]
pub struct SampleSubmission {
    pub name: Option<String>,
    pub time: Option<String>,
    pub person: Option<String>,
    pub phone: Option<String>,
}

impl SampleSubmission {
    /// Require every field to be present and non-blank
    pub fn validate(self) -> Result<NewSample> {
        fn required(value: Option<String>, field: &str) -> Result<String> {
            match value {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(Error::Validation(format!("Missing required field: {}", field))),
            }
        }

        Ok(NewSample {
            name: required(self.name, "name")?,
            time: required(self.time, "time")?,
            person: required(self.person, "person")?,
            phone: required(self.phone, "phone")?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct LifecycleController {
    repo: SampleRepository,
}

impl LifecycleController {
    pub fn new(repo: SampleRepository) -> Self {
        Self { repo }
    }

    /// Live samples (or every sample when `include_deleted`)
    pub async fn list(&self, include_deleted: bool) -> Result<Vec<Sample>> {
        samples::list(self.repo.database().pool(), include_deleted).await
    }

    /// Create a pending sample
    pub async fn submit(&self, submission: SampleSubmission) -> Result<Sample> {
        let new = submission.validate()?;
        let sample = samples::insert(self.repo.database().pool(), &new).await?;
        info!(id = %sample.id, name = %sample.name, "Sample submitted");
        Ok(sample)
    }

    /// Sample detail; deleted samples are still returned
    pub async fn get(&self, id: &str) -> Result<Sample> {
        samples::find(self.repo.database().pool(), id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Record from whichever partition holds the identity
    pub async fn locate(&self, id: &str) -> Result<StoredRecord> {
        let record = self
            .repo
            .resolve(id, Visibility::Any)
            .await?
            .ok_or_else(|| not_found(id))?;
        debug!(id, partition = %record.partition(), "Record located");
        Ok(record)
    }

    pub async fn soft_delete(&self, id: &str) -> Result<Partition> {
        let partition = self.apply(id, Mutation::SoftDelete).await?;
        info!(id, %partition, "Moved to recycle bin");
        Ok(partition)
    }

    pub async fn restore(&self, id: &str) -> Result<Partition> {
        let partition = self.apply(id, Mutation::Restore).await?;
        info!(id, %partition, "Restored from recycle bin");
        Ok(partition)
    }

    /// Soft-deleted rows of both stores, tagged by origin
    pub async fn recycle_bin(&self) -> Result<Vec<StoredRecord>> {
        self.repo.recycle_bin().await
    }

    /// Permanently remove a sample and its review
    pub async fn purge(&self, id: &str) -> Result<()> {
        match self.repo.purge(id).await {
            Ok(()) => {
                info!(id, "Sample permanently deleted");
                Ok(())
            }
            Err(Error::NotFound(msg)) => {
                warn!(id, "Purge target not found");
                Err(Error::NotFound(msg))
            }
            Err(e) => Err(e),
        }
    }

    /// Record an approve/reject verdict
    ///
    /// The value is validated before any store access. A sample may be
    /// approved before any review content exists.
    pub async fn set_status(&self, id: &str, status: &str) -> Result<Partition> {
        let status = SampleStatus::parse_verdict(status)?;
        let partition = self.apply(id, Mutation::SetStatus(status)).await?;
        info!(id, %status, %partition, "Status updated");
        Ok(partition)
    }

    async fn apply(&self, id: &str, mutation: Mutation) -> Result<Partition> {
        match self.repo.apply(id, mutation).await? {
            Some(partition) => Ok(partition),
            None => {
                warn!(id, ?mutation, "No matching row in either store");
                Err(not_found(id))
            }
        }
    }
}

fn not_found(id: &str) -> Error {
    Error::NotFound(format!("Sample {} does not exist", id))
}
