//! Reviewed Sample Store queries (`reviewed_samples` table)

use lab_common::db::ReviewedSample;
use lab_common::Result;
use sqlx::{Executor, Sqlite};

/// Fetch a reviewed row by its own identity
pub async fn find<'e, E>(executor: E, id: &str) -> Result<Option<ReviewedSample>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let reviewed = sqlx::query_as::<_, ReviewedSample>("SELECT * FROM reviewed_samples WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(reviewed)
}

/// Fetch the review attached to a sample, if one exists
pub async fn find_by_sample<'e, E>(executor: E, sample_id: &str) -> Result<Option<ReviewedSample>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let reviewed = sqlx::query_as::<_, ReviewedSample>(
        "SELECT * FROM reviewed_samples WHERE sample_id = ?",
    )
    .bind(sample_id)
    .fetch_optional(executor)
    .await?;
    Ok(reviewed)
}

/// Soft-deleted reviewed rows, for the recycle bin
pub async fn list_deleted<'e, E>(executor: E) -> Result<Vec<ReviewedSample>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let reviewed = sqlx::query_as::<_, ReviewedSample>(
        "SELECT * FROM reviewed_samples WHERE is_deleted = 1 ORDER BY created_at ASC",
    )
    .fetch_all(executor)
    .await?;
    Ok(reviewed)
}

/// Insert a new review row
pub async fn insert<'e, E>(executor: E, reviewed: &ReviewedSample) -> std::result::Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO reviewed_samples (
            id, sample_id, time, test_item, test_result, standard,
            detection_limit, department, responsible_person, notification,
            status, is_deleted, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&reviewed.id)
    .bind(&reviewed.sample_id)
    .bind(&reviewed.time)
    .bind(&reviewed.test_item)
    .bind(&reviewed.test_result)
    .bind(&reviewed.standard)
    .bind(&reviewed.detection_limit)
    .bind(&reviewed.department)
    .bind(&reviewed.responsible_person)
    .bind(&reviewed.notification)
    .bind(reviewed.status)
    .bind(reviewed.is_deleted)
    .bind(reviewed.created_at)
    .bind(reviewed.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Overwrite the review fields and `updated_at` of the sample's review row
///
/// `time` and `created_at` are left as captured on first review.
pub async fn update_fields<'e, E>(executor: E, reviewed: &ReviewedSample) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE reviewed_samples SET
            test_item = ?, test_result = ?, standard = ?,
            detection_limit = ?, department = ?,
            responsible_person = ?, notification = ?, updated_at = ?
        WHERE sample_id = ?
        "#,
    )
    .bind(&reviewed.test_item)
    .bind(&reviewed.test_result)
    .bind(&reviewed.standard)
    .bind(&reviewed.detection_limit)
    .bind(&reviewed.department)
    .bind(&reviewed.responsible_person)
    .bind(&reviewed.notification)
    .bind(reviewed.updated_at)
    .bind(&reviewed.sample_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Physically remove the review attached to a sample; returns rows removed
pub async fn delete_by_sample<'e, E>(executor: E, sample_id: &str) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM reviewed_samples WHERE sample_id = ?")
        .bind(sample_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
