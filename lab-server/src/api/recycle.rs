//! Recycle bin and cross-store record lookup

use axum::{
    extract::{Path, State},
    Json,
};
use lab_common::db::StoredRecord;

use super::ApiError;
use crate::AppState;

/// GET /api/recycle-bin
///
/// Soft-deleted rows from both stores, each carrying `source_table`.
pub async fn list_recycle_bin(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    Ok(Json(state.lifecycle.recycle_bin().await?))
}

/// GET /api/records/:id
///
/// Record for an identity from whichever store holds it, deleted or not.
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredRecord>, ApiError> {
    Ok(Json(state.lifecycle.locate(&id).await?))
}
