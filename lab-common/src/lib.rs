//! # Lab Tracker Common Library
//!
//! Shared code for the lab sample tracker:
//! - Error type and result alias
//! - Configuration resolution (CLI, environment, TOML, defaults)
//! - Database initialization and schema
//! - Record models for both sample stores
//! - Timestamp helpers

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
