//! Integration tests for lab-server API endpoints
//!
//! Tests cover:
//! - Sample submission, listing and detail
//! - Soft delete, recycle bin, restore and purge
//! - Status verdicts
//! - Review upsert and lookup
//! - Health endpoint

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use lab_server::db::Database;
use lab_server::{build_router, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: app over a fresh in-memory database
async fn setup_app() -> (Router, Database) {
    let db = Database::in_memory().await.expect("Should open in-memory database");
    let app = build_router(AppState::new(db.clone()));
    (app, db)
}

/// Test helper: send a request, return status and parsed JSON body
async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Should parse JSON")
    };
    (status, json)
}

fn water_sample() -> Value {
    json!({
        "name": "water",
        "time": "2024-01-01T10:00",
        "person": "Li",
        "phone": "13800000000"
    })
}

fn review_body(sample_id: &str, result: &str) -> Value {
    json!({
        "sample_id": sample_id,
        "testItem": "pH",
        "testResult": result,
        "standard": "GB 5749",
        "detectionLimit": "0.1",
        "department": "Water Lab",
        "responsiblePerson": "Wang",
        "notification": "Within limits"
    })
}

/// Test helper: submit the standard sample and return its id
async fn create_sample(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/api/samples", Some(water_sample())).await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().expect("id should be a string").to_string()
}

async fn review_count(db: &Database) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM reviewed_samples")
        .fetch_one(db.pool())
        .await
        .unwrap()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _db) = setup_app().await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "lab-server");
    assert!(body["version"].is_string());
}

// =============================================================================
// Submission and listing
// =============================================================================

#[tokio::test]
async fn test_submit_returns_pending_record() {
    let (app, _db) = setup_app().await;

    let (status, body) = send(&app, "POST", "/api/samples", Some(water_sample())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["is_deleted"], false);
    assert_eq!(body["name"], "water");
    assert_eq!(body["phone"], "13800000000");
    assert!(body["id"].is_string());

    let (status, list) = send(&app, "GET", "/api/samples", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], body["id"]);
}

#[tokio::test]
async fn test_submit_missing_field_is_400() {
    let (app, db) = setup_app().await;

    for missing in ["name", "time", "person", "phone"] {
        let mut body = water_sample();
        body.as_object_mut().unwrap().remove(missing);

        let (status, err) = send(&app, "POST", "/api/samples", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "missing {}", missing);
        assert!(err["error"].as_str().unwrap().contains(missing));
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM samples")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_submit_malformed_json_is_400() {
    let (app, _db) = setup_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/samples")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_sample_detail_and_404() {
    let (app, _db) = setup_app().await;
    let id = create_sample(&app).await;

    let (status, body) = send(&app, "GET", &format!("/api/samples/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());

    let (status, body) = send(&app, "GET", "/api/samples/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

// =============================================================================
// Recycle bin
// =============================================================================

#[tokio::test]
async fn test_soft_delete_restore_cycle() {
    let (app, _db) = setup_app().await;
    let id = create_sample(&app).await;

    let (status, body) = send(&app, "DELETE", &format!("/api/samples/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (_, active) = send(&app, "GET", "/api/samples", None).await;
    assert!(active.as_array().unwrap().is_empty());

    let (_, all) = send(&app, "GET", "/api/samples?includeDeleted=true", None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, bin) = send(&app, "GET", "/api/recycle-bin", None).await;
    assert_eq!(status, StatusCode::OK);
    let bin = bin.as_array().unwrap();
    assert_eq!(bin.len(), 1);
    assert_eq!(bin[0]["id"], id.as_str());
    assert_eq!(bin[0]["source_table"], "samples");

    // Deleting again: no live row in either store
    let (status, _) = send(&app, "DELETE", &format!("/api/samples/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "PATCH", &format!("/api/samples/{}/restore", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, bin) = send(&app, "GET", "/api/recycle-bin", None).await;
    assert!(bin.as_array().unwrap().is_empty());
    let (_, active) = send(&app, "GET", "/api/samples", None).await;
    assert_eq!(active.as_array().unwrap().len(), 1);

    // Second restore finds no deleted row
    let (status, _) = send(&app, "PATCH", &format!("/api/samples/{}/restore", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reviewed_row_deleted_and_restored_by_its_own_id() {
    let (app, _db) = setup_app().await;
    let sample_id = create_sample(&app).await;

    let (status, _) = send(&app, "POST", "/api/review", Some(review_body(&sample_id, "7.0"))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, review) = send(&app, "GET", &format!("/api/review?sample_id={}", sample_id), None).await;
    let review_id = review["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, "DELETE", &format!("/api/samples/{}", review_id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, bin) = send(&app, "GET", "/api/recycle-bin", None).await;
    let bin = bin.as_array().unwrap();
    assert_eq!(bin.len(), 1);
    assert_eq!(bin[0]["source_table"], "reviewed_samples");
    assert_eq!(bin[0]["sample_id"], sample_id.as_str());

    let (status, record) = send(&app, "GET", &format!("/api/records/{}", review_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["source_table"], "reviewed_samples");
    assert_eq!(record["is_deleted"], true);

    // Status updates skip deleted review rows
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/samples/{}/status", review_id),
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "PATCH", &format!("/api/samples/{}/restore", review_id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/samples/{}/status", review_id),
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, review) = send(&app, "GET", &format!("/api/review?sample_id={}", sample_id), None).await;
    assert_eq!(review["status"], "approved");

    // The sample row itself was never touched
    let (_, sample) = send(&app, "GET", &format!("/api/samples/{}", sample_id), None).await;
    assert_eq!(sample["status"], "pending");
    assert_eq!(sample["is_deleted"], false);
}

#[tokio::test]
async fn test_purge_removes_sample_and_review() {
    let (app, db) = setup_app().await;
    let id = create_sample(&app).await;

    let (status, _) = send(&app, "POST", "/api/review", Some(review_body(&id, "7.0"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(review_count(&db).await, 1);

    let (status, body) = send(&app, "DELETE", &format!("/api/samples/{}/permanent", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    assert_eq!(review_count(&db).await, 0);
    let (status, _) = send(&app, "GET", &format!("/api/samples/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/api/samples/{}/permanent", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Status
// =============================================================================

#[tokio::test]
async fn test_status_update() {
    let (app, _db) = setup_app().await;
    let id = create_sample(&app).await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/samples/{}/status", id),
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, sample) = send(&app, "GET", &format!("/api/samples/{}", id), None).await;
    assert_eq!(sample["status"], "approved");
}

#[tokio::test]
async fn test_invalid_status_is_400_without_mutation() {
    let (app, _db) = setup_app().await;
    let id = create_sample(&app).await;

    for body in [json!({ "status": "pending" }), json!({ "status": "done" }), json!({})] {
        let (status, err) = send(&app, "PATCH", &format!("/api/samples/{}/status", id), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(err["error"].is_string());
    }

    // Validation comes before lookup: unknown ids still get 400
    let (status, _) = send(
        &app,
        "PATCH",
        "/api/samples/unknown/status",
        Some(json!({ "status": "bogus" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, sample) = send(&app, "GET", &format!("/api/samples/{}", id), None).await;
    assert_eq!(sample["status"], "pending");
}

#[tokio::test]
async fn test_status_unknown_id_is_404() {
    let (app, _db) = setup_app().await;

    let (status, _) = send(
        &app,
        "PATCH",
        "/api/samples/unknown/status",
        Some(json!({ "status": "rejected" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Review
// =============================================================================

#[tokio::test]
async fn test_review_create_then_update() {
    let (app, db) = setup_app().await;
    let id = create_sample(&app).await;

    let (status, body) = send(&app, "POST", "/api/review", Some(review_body(&id, "7.0"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Review record created");

    let (_, first) = send(&app, "GET", &format!("/api/review?sample_id={}", id), None).await;
    assert_eq!(first["test_result"], "7.0");
    assert_eq!(first["time"], "2024-01-01T10:00");

    let (status, body) = send(&app, "POST", "/api/review", Some(review_body(&id, "6.8"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Review record updated");

    assert_eq!(review_count(&db).await, 1);

    let (_, second) = send(&app, "GET", &format!("/api/review?sample_id={}", id), None).await;
    assert_eq!(second["test_result"], "6.8");
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["time"], first["time"]);
    assert_eq!(second["created_at"], first["created_at"]);
}

#[tokio::test]
async fn test_review_for_missing_sample_is_404() {
    let (app, db) = setup_app().await;

    let (status, body) = send(&app, "POST", "/api/review", Some(review_body("nope", "7.0"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
    assert_eq!(review_count(&db).await, 0);
}

#[tokio::test]
async fn test_review_field_validation() {
    let (app, db) = setup_app().await;
    let id = create_sample(&app).await;

    let mut missing = review_body(&id, "7.0");
    missing.as_object_mut().unwrap().remove("department");
    let (status, _) = send(&app, "POST", "/api/review", Some(missing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let too_long = review_body(&id, &"9".repeat(101));
    let (status, _) = send(&app, "POST", "/api/review", Some(too_long)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(review_count(&db).await, 0);
}

#[tokio::test]
async fn test_get_review_absent_is_null() {
    let (app, _db) = setup_app().await;
    let id = create_sample(&app).await;

    let (status, body) = send(&app, "GET", &format!("/api/review?sample_id={}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    let (status, body) = send(&app, "GET", "/api/review", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}
