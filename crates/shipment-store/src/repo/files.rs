use chrono::{DateTime, Utc};
use shipment_models::{ShipmentFile, ShipmentId};
use sqlx::{PgExecutor, PgPool};

use crate::error::StoreError;
use crate::repo::shipments::canonicalize;

const FILE_COLUMNS: &str = "file_id, shipment_id, company_id, file_name, file_location, \
    file_tags, file_size_kb, visibility, uploaded_by_uid, uploaded_by_email, trash, \
    created_at, updated_at";

/// Takes a generic executor (a pool or a transaction) so a caller like
/// the BL-update flow can insert the file record in the same unit of
/// work as its other writes.
#[allow(clippy::too_many_arguments)]
pub async fn insert<'c, E>(
    executor: E,
    shipment_id: &ShipmentId,
    company_id: &str,
    file_name: &str,
    file_location: &str,
    tags: &[String],
    file_size_kb: Option<f64>,
    uploaded_by_uid: Option<&str>,
    uploaded_by_email: Option<&str>,
    now: DateTime<Utc>,
) -> Result<ShipmentFile, StoreError>
where
    E: PgExecutor<'c>,
{
    let canonical = canonicalize(shipment_id);
    let sql = format!(
        "INSERT INTO shipment_files (shipment_id, company_id, file_name, file_location, \
         file_tags, file_size_kb, visibility, uploaded_by_uid, uploaded_by_email, trash, \
         created_at, updated_at) VALUES ($1,$2,$3,$4,$5,$6,TRUE,$7,$8,FALSE,$9,$9) \
         RETURNING {FILE_COLUMNS}"
    );
    let file: ShipmentFile = sqlx::query_as(&sql)
        .bind(canonical.as_str())
        .bind(company_id)
        .bind(file_name)
        .bind(file_location)
        .bind(tags)
        .bind(file_size_kb)
        .bind(uploaded_by_uid)
        .bind(uploaded_by_email)
        .bind(now)
        .fetch_one(executor)
        .await?;
    Ok(file)
}

pub async fn list(
    pool: &PgPool,
    shipment_id: &ShipmentId,
    visible_only: bool,
) -> Result<Vec<ShipmentFile>, sqlx::Error> {
    let canonical = canonicalize(shipment_id);
    let sql = format!(
        "SELECT {FILE_COLUMNS} FROM shipment_files WHERE shipment_id = $1 AND trash = FALSE \
         AND ($2 = FALSE OR visibility = TRUE) ORDER BY created_at DESC"
    );
    sqlx::query_as(&sql)
        .bind(canonical.as_str())
        .bind(visible_only)
        .fetch_all(pool)
        .await
}

pub async fn set_tags(
    pool: &PgPool,
    file_id: i64,
    tags: &[String],
    now: DateTime<Utc>,
) -> Result<ShipmentFile, StoreError> {
    let sql = format!(
        "UPDATE shipment_files SET file_tags = $1, updated_at = $2 WHERE file_id = $3 \
         RETURNING {FILE_COLUMNS}"
    );
    let file: Option<ShipmentFile> = sqlx::query_as(&sql)
        .bind(tags)
        .bind(now)
        .bind(file_id)
        .fetch_optional(pool)
        .await?;
    file.ok_or(StoreError::FileNotFound(file_id))
}

pub async fn set_visibility(
    pool: &PgPool,
    file_id: i64,
    visibility: bool,
    now: DateTime<Utc>,
) -> Result<ShipmentFile, StoreError> {
    let sql = format!(
        "UPDATE shipment_files SET visibility = $1, updated_at = $2 WHERE file_id = $3 \
         RETURNING {FILE_COLUMNS}"
    );
    let file: Option<ShipmentFile> = sqlx::query_as(&sql)
        .bind(visibility)
        .bind(now)
        .bind(file_id)
        .fetch_optional(pool)
        .await?;
    file.ok_or(StoreError::FileNotFound(file_id))
}

pub async fn soft_delete(pool: &PgPool, file_id: i64, now: DateTime<Utc>) -> Result<(), StoreError> {
    let result = sqlx::query(
        "UPDATE shipment_files SET trash = TRUE, updated_at = $1 WHERE file_id = $2 AND trash = FALSE",
    )
    .bind(now)
    .bind(file_id)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::FileNotFound(file_id));
    }
    Ok(())
}

pub async fn get(pool: &PgPool, file_id: i64) -> Result<ShipmentFile, StoreError> {
    let sql = format!("SELECT {FILE_COLUMNS} FROM shipment_files WHERE file_id = $1 AND trash = FALSE");
    let file: Option<ShipmentFile> = sqlx::query_as(&sql).bind(file_id).fetch_optional(pool).await?;
    file.ok_or(StoreError::FileNotFound(file_id))
}
