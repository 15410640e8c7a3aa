//! Sample lifecycle endpoints
//!
//! - GET    /api/samples                 list active (or all) samples
//! - POST   /api/samples                 submit a sample
//! - GET    /api/samples/:id             sample detail
//! - DELETE /api/samples/:id             soft delete
//! - DELETE /api/samples/:id/permanent   purge with its review
//! - PATCH  /api/samples/:id/restore     restore from recycle bin
//! - PATCH  /api/samples/:id/status      approve or reject

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use lab_common::db::Sample;
use lab_common::Error;
use serde::Deserialize;

use super::{ApiError, SuccessResponse};
use crate::lifecycle::SampleSubmission;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "includeDeleted", default)]
    pub include_deleted: bool,
}

/// Submission body; missing fields are reported as validation errors
#[derive(Debug, Default, Deserialize)]
pub struct CreateSampleRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

/// GET /api/samples
pub async fn list_samples(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Sample>>, ApiError> {
    let Query(query) = query?;
    let samples = state.lifecycle.list(query.include_deleted).await?;
    Ok(Json(samples))
}

/// POST /api/samples
pub async fn create_sample(
    State(state): State<AppState>,
    payload: Result<Json<CreateSampleRequest>, JsonRejection>,
) -> Result<Json<Sample>, ApiError> {
    let Json(req) = payload?;
    let sample = state
        .lifecycle
        .submit(SampleSubmission {
            name: req.name,
            time: req.time,
            person: req.person,
            phone: req.phone,
        })
        .await?;
    Ok(Json(sample))
}

/// GET /api/samples/:id
pub async fn get_sample(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Sample>, ApiError> {
    Ok(Json(state.lifecycle.get(&id).await?))
}

/// DELETE /api/samples/:id
pub async fn delete_sample(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.lifecycle.soft_delete(&id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /api/samples/:id/permanent
pub async fn purge_sample(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.lifecycle.purge(&id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// PATCH /api/samples/:id/restore
pub async fn restore_sample(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.lifecycle.restore(&id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// PATCH /api/samples/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(req) = payload?;
    let status = req
        .status
        .ok_or_else(|| Error::Validation("Missing required field: status".to_string()))?;

    state.lifecycle.set_status(&id, &status).await?;
    Ok(Json(SuccessResponse::ok()))
}
