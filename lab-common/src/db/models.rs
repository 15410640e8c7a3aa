//! Database models

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SampleStatus {
    Pending,
    Approved,
    Rejected,
}

impl SampleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleStatus::Pending => "pending",
            SampleStatus::Approved => "approved",
            SampleStatus::Rejected => "rejected",
        }
    }

    /// Parse a review verdict; only `approved` and `rejected` are accepted
    pub fn parse_verdict(value: &str) -> Result<Self> {
        match value.parse::<SampleStatus>() {
            Ok(status) if status != SampleStatus::Pending => Ok(status),
            _ => Err(Error::Validation(format!("Invalid status value: {:?}", value))),
        }
    }
}

impl fmt::Display for SampleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(SampleStatus::Pending),
            "approved" => Ok(SampleStatus::Approved),
            "rejected" => Ok(SampleStatus::Rejected),
            other => Err(Error::Validation(format!("Unknown status: {:?}", other))),
        }
    }
}

/// Row of the `samples` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sample {
    pub id: String,
    pub name: String,
    /// Scheduled submission time, as supplied by the submitter
    pub time: String,
    pub person: String,
    pub phone: String,
    pub status: SampleStatus,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Row of the `reviewed_samples` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReviewedSample {
    pub id: String,
    pub sample_id: String,
    /// Scheduled time copied from the sample at first review; never rewritten
    pub time: String,
    pub test_item: String,
    pub test_result: String,
    pub standard: String,
    pub detection_limit: String,
    pub department: String,
    pub responsible_person: String,
    pub notification: String,
    pub status: Option<SampleStatus>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Physical table holding a sample identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    Samples,
    ReviewedSamples,
}

impl Partition {
    /// Lookup order for mutations that fall back across stores
    pub const SEARCH_ORDER: [Partition; 2] = [Partition::Samples, Partition::ReviewedSamples];

    pub fn table(&self) -> &'static str {
        match self {
            Partition::Samples => "samples",
            Partition::ReviewedSamples => "reviewed_samples",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// A row from either store, tagged with its origin table
///
/// Serializes flat with a `source_table` field, the shape recycle-bin
/// consumers expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source_table", rename_all = "snake_case")]
pub enum StoredRecord {
    Samples(Sample),
    ReviewedSamples(ReviewedSample),
}

impl StoredRecord {
    pub fn partition(&self) -> Partition {
        match self {
            StoredRecord::Samples(_) => Partition::Samples,
            StoredRecord::ReviewedSamples(_) => Partition::ReviewedSamples,
        }
    }

    pub fn is_deleted(&self) -> bool {
        match self {
            StoredRecord::Samples(sample) => sample.is_deleted,
            StoredRecord::ReviewedSamples(reviewed) => reviewed.is_deleted,
        }
    }
}
