//! lab-server library - sample lifecycle and review service
//!
//! Tracks laboratory samples from submission through review, with a
//! recycle bin spanning the sample and reviewed-sample stores.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod lifecycle;
pub mod review;
pub mod store;

use db::Database;
use lifecycle::LifecycleController;
use review::ReviewEngine;
use store::SampleRepository;

/// Largest accepted request body; every payload is a handful of short strings
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<LifecycleController>,
    pub reviews: Arc<ReviewEngine>,
}

impl AppState {
    /// Wire the lifecycle controller and review engine to one database handle
    pub fn new(db: Database) -> Self {
        Self {
            lifecycle: Arc::new(LifecycleController::new(SampleRepository::new(db.clone()))),
            reviews: Arc::new(ReviewEngine::new(db)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, patch};

    let routes = Router::new()
        .route("/samples", get(api::list_samples).post(api::create_sample))
        .route("/samples/:id", get(api::get_sample).delete(api::delete_sample))
        .route("/samples/:id/permanent", delete(api::purge_sample))
        .route("/samples/:id/restore", patch(api::restore_sample))
        .route("/samples/:id/status", patch(api::update_status))
        .route("/recycle-bin", get(api::list_recycle_bin))
        .route("/records/:id", get(api::get_record))
        .route("/review", get(api::get_review).post(api::submit_review));

    Router::new()
        .nest("/api", routes)
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
