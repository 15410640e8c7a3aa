//! Sample Store queries (`samples` table)

use lab_common::db::{Sample, SampleStatus};
use lab_common::{time, Result};
use sqlx::{Executor, Sqlite};
use uuid::Uuid;

/// Validated input for a new submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSample {
    pub name: String,
    pub time: String,
    pub person: String,
    pub phone: String,
}

/// Insert a pending, live sample under a fresh identity
pub async fn insert<'e, E>(executor: E, new: &NewSample) -> Result<Sample>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sample = Sample {
        id: Uuid::new_v4().to_string(),
        name: new.name.clone(),
        time: new.time.clone(),
        person: new.person.clone(),
        phone: new.phone.clone(),
        status: SampleStatus::Pending,
        is_deleted: false,
        created_at: time::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO samples (id, name, time, person, phone, status, is_deleted, created_at)
        VALUES (?, ?, ?, ?, ?, ?, 0, ?)
        "#,
    )
    .bind(&sample.id)
    .bind(&sample.name)
    .bind(&sample.time)
    .bind(&sample.person)
    .bind(&sample.phone)
    .bind(sample.status)
    .bind(sample.created_at)
    .execute(executor)
    .await?;

    Ok(sample)
}

/// Fetch a sample regardless of its deleted flag
pub async fn find<'e, E>(executor: E, id: &str) -> Result<Option<Sample>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sample = sqlx::query_as::<_, Sample>("SELECT * FROM samples WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(sample)
}

/// List samples in submission order, optionally including soft-deleted rows
pub async fn list<'e, E>(executor: E, include_deleted: bool) -> Result<Vec<Sample>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = if include_deleted {
        "SELECT * FROM samples ORDER BY created_at ASC"
    } else {
        "SELECT * FROM samples WHERE is_deleted = 0 ORDER BY created_at ASC"
    };

    let samples = sqlx::query_as::<_, Sample>(sql).fetch_all(executor).await?;
    Ok(samples)
}

/// Soft-deleted samples, for the recycle bin
pub async fn list_deleted<'e, E>(executor: E) -> Result<Vec<Sample>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let samples = sqlx::query_as::<_, Sample>(
        "SELECT * FROM samples WHERE is_deleted = 1 ORDER BY created_at ASC",
    )
    .fetch_all(executor)
    .await?;
    Ok(samples)
}

/// Physically remove a sample row; returns rows removed
pub async fn delete<'e, E>(executor: E, id: &str) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM samples WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
