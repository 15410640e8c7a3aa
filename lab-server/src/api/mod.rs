//! HTTP API handlers for lab-server

pub mod error;
pub mod health;
pub mod recycle;
pub mod review;
pub mod samples;

pub use error::ApiError;
pub use health::health_routes;
pub use recycle::{get_record, list_recycle_bin};
pub use review::{get_review, submit_review};
pub use samples::{
    create_sample, delete_sample, get_sample, list_samples, purge_sample, restore_sample,
    update_status,
};

use serde::Serialize;

/// Body returned by mutations that only report success
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
