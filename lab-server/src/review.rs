//! Review upsert engine
//!
//! Creates or updates the single review row attached to a sample. The whole
//! read-check-write sequence runs inside one write-locked transaction, so two
//! submissions for the same sample serialize: the later one sees the earlier
//! one's row and updates it instead of inserting a duplicate.

use crate::db::Database;
use crate::store::{reviewed, samples};
use lab_common::db::ReviewedSample;
use lab_common::{time, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

/// Longest accepted value for any review field, in characters
pub const MAX_FIELD_CHARS: usize = 100;

const MISSING_SAMPLE: &str = "Referenced sample does not exist";

/// Review content as submitted (camelCase on the wire)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFields {
    pub test_item: String,
    pub test_result: String,
    pub standard: String,
    pub detection_limit: String,
    pub department: String,
    pub responsible_person: String,
    pub notification: String,
}

impl ReviewFields {
    /// Every field required, each at most [`MAX_FIELD_CHARS`] characters
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("testItem", &self.test_item),
            ("testResult", &self.test_result),
            ("standard", &self.standard),
            ("detectionLimit", &self.detection_limit),
            ("department", &self.department),
            ("responsiblePerson", &self.responsible_person),
            ("notification", &self.notification),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(Error::Validation(format!("Missing required field: {}", name)));
            }
            if value.chars().count() > MAX_FIELD_CHARS {
                return Err(Error::Validation(format!(
                    "Field {} exceeds {} characters",
                    name, MAX_FIELD_CHARS
                )));
            }
        }

        Ok(())
    }
}

/// Whether a submission inserted a new row or overwrote an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertKind {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub kind: UpsertKind,
    pub review: ReviewedSample,
}

#[derive(Clone, Debug)]
pub struct ReviewEngine {
    db: Database,
}

impl ReviewEngine {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create or update the review for `sample_id`
    ///
    /// Fields are expected to be validated by the caller. On any failure the
    /// transaction rolls back and nothing is written.
    pub async fn submit(&self, sample_id: &str, fields: ReviewFields) -> Result<ReviewOutcome> {
        let mut tx = self.db.begin_write("ReviewEngine::submit").await?;

        let found = samples::find(&mut *tx, sample_id).await?;
        let Some(sample) = found else {
            tx.rollback().await?;
            return Err(Error::NotFound(MISSING_SAMPLE.to_string()));
        };

        let now = time::now();

        let outcome = match reviewed::find_by_sample(&mut *tx, sample_id).await? {
            Some(existing) => {
                let review = ReviewedSample {
                    test_item: fields.test_item,
                    test_result: fields.test_result,
                    standard: fields.standard,
                    detection_limit: fields.detection_limit,
                    department: fields.department,
                    responsible_person: fields.responsible_person,
                    notification: fields.notification,
                    updated_at: now,
                    ..existing
                };
                reviewed::update_fields(&mut *tx, &review).await?;
                ReviewOutcome {
                    kind: UpsertKind::Updated,
                    review,
                }
            }
            None => {
                let review = ReviewedSample {
                    id: Uuid::new_v4().to_string(),
                    sample_id: sample.id,
                    time: sample.time,
                    test_item: fields.test_item,
                    test_result: fields.test_result,
                    standard: fields.standard,
                    detection_limit: fields.detection_limit,
                    department: fields.department,
                    responsible_person: fields.responsible_person,
                    notification: fields.notification,
                    status: None,
                    is_deleted: false,
                    created_at: now,
                    updated_at: now,
                };
                reviewed::insert(&mut *tx, &review)
                    .await
                    .map_err(|e| Error::from_write(e, MISSING_SAMPLE))?;
                ReviewOutcome {
                    kind: UpsertKind::Created,
                    review,
                }
            }
        };

        if let Err(e) = tx.commit().await {
            error!(sample_id, "Failed to commit review: {}", e);
            return Err(e.into());
        }

        info!(
            sample_id,
            review_id = %outcome.review.id,
            kind = ?outcome.kind,
            "Review saved"
        );
        Ok(outcome)
    }

    /// Review attached to a sample, or `None` if it has not been reviewed
    pub async fn get(&self, sample_id: &str) -> Result<Option<ReviewedSample>> {
        reviewed::find_by_sample(self.db.pool(), sample_id).await
    }
}
