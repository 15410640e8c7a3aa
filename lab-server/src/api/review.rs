//! Review endpoints
//!
//! - POST /api/review              create or update a sample's review
//! - GET  /api/review?sample_id=   fetch it (null when not yet reviewed)

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use lab_common::db::ReviewedSample;
use lab_common::Error;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::review::{ReviewFields, UpsertKind};
use crate::AppState;

/// Review submission body
///
/// Fields are optional here so a missing one is reported by validation
/// rather than as a deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[serde(rename = "sample_id", default)]
    pub sample_id: Option<String>,
    #[serde(default)]
    pub test_item: Option<String>,
    #[serde(default)]
    pub test_result: Option<String>,
    #[serde(default)]
    pub standard: Option<String>,
    #[serde(default)]
    pub detection_limit: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub responsible_person: Option<String>,
    #[serde(default)]
    pub notification: Option<String>,
}

impl ReviewRequest {
    /// Split into the sample identity and validated review fields
    pub fn into_parts(self) -> Result<(String, ReviewFields), Error> {
        let sample_id = self
            .sample_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| Error::Validation("Missing required field: sample_id".to_string()))?;

        let fields = ReviewFields {
            test_item: self.test_item.unwrap_or_default(),
            test_result: self.test_result.unwrap_or_default(),
            standard: self.standard.unwrap_or_default(),
            detection_limit: self.detection_limit.unwrap_or_default(),
            department: self.department.unwrap_or_default(),
            responsible_person: self.responsible_person.unwrap_or_default(),
            notification: self.notification.unwrap_or_default(),
        };
        fields.validate()?;

        Ok((sample_id, fields))
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub success: bool,
    pub message: String,
    pub review_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewQuery {
    #[serde(default)]
    pub sample_id: Option<String>,
}

/// POST /api/review
pub async fn submit_review(
    State(state): State<AppState>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let Json(req) = payload?;
    let (sample_id, fields) = req.into_parts()?;

    let outcome = state.reviews.submit(&sample_id, fields).await?;

    let message = match outcome.kind {
        UpsertKind::Created => "Review record created",
        UpsertKind::Updated => "Review record updated",
    };

    Ok(Json(ReviewResponse {
        success: true,
        message: message.to_string(),
        review_id: outcome.review.id,
    }))
}

/// GET /api/review?sample_id=
pub async fn get_review(
    State(state): State<AppState>,
    query: Result<Query<ReviewQuery>, QueryRejection>,
) -> Result<Json<Option<ReviewedSample>>, ApiError> {
    let Query(query) = query?;
    let review = match query.sample_id {
        Some(sample_id) => state.reviews.get(&sample_id).await?,
        None => None,
    };
    Ok(Json(review))
}
