//! Legacy (V1 -> V2) migrator (C7). Re-keys `AFCQ-` quotations into
//! canonical `AF-` shipments, preserving the legacy numeric suffix as the
//! new `countid`. Runs in dry-run mode unless told otherwise; a dry run
//! computes and reports the same plan as a commit but issues no writes.

pub mod assemble;
pub mod legacy;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use shipment_models::ShipmentId;
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use assemble::assemble;
use legacy::{LegacyBundle, LegacyFile, LegacyFreight, LegacyQuotation, LegacyShipmentOrder, LegacyWorkflow};

/// Records written per transaction; mirrors the batch size the legacy
/// migration used for its Datastore commits.
const WRITE_CHUNK_SIZE: usize = 500;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(
        "numeric id collision between {collisions} existing canonical shipment(s) and \
         pending legacy record(s): {sample:?}"
    )]
    Collision {
        collisions: usize,
        sample: Vec<String>,
    },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Outcome of one migration run, whether `dry_run` or committed.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct MigrationReport {
    pub dry_run: bool,
    pub scanned: usize,
    pub already_migrated: usize,
    pub skipped_no_shipment_order: usize,
    pub migrated: usize,
    pub workflows_rekeyed: usize,
    pub files_rekeyed: usize,
    pub errors: Vec<(String, String)>,
}

/// Step 1 of the original migration: abort outright if any legacy
/// numeric suffix would collide with an already-live canonical shipment.
/// A collision means the same number was independently assigned on both
/// sides of the cutover and re-keying would silently merge two distinct
/// shipments.
async fn preflight_collision_check(pool: &PgPool) -> Result<(), MigrateError> {
    let canonical_ids: Vec<String> = sqlx::query_scalar("SELECT id FROM shipments")
        .fetch_all(pool)
        .await?;
    let legacy_ids: Vec<String> = sqlx::query_scalar(
        "SELECT id FROM legacy_quotations WHERE superseded = FALSE",
    )
    .fetch_all(pool)
    .await?;

    let canonical_nums: HashSet<&str> = canonical_ids
        .iter()
        .filter_map(|id| id.strip_prefix(ShipmentId::CANONICAL_PREFIX))
        .collect();
    let legacy_nums: HashSet<&str> = legacy_ids
        .iter()
        .filter_map(|id| id.strip_prefix(ShipmentId::LEGACY_PREFIX))
        .collect();

    let collisions: Vec<String> = legacy_nums
        .intersection(&canonical_nums)
        .map(|s| s.to_string())
        .collect();

    if !collisions.is_empty() {
        let mut sample = collisions.clone();
        sample.sort();
        sample.truncate(10);
        return Err(MigrateError::Collision {
            collisions: collisions.len(),
            sample,
        });
    }
    Ok(())
}

fn afcq_to_af(afcq_id: &str) -> String {
    let suffix = afcq_id.strip_prefix(ShipmentId::LEGACY_PREFIX).unwrap_or(afcq_id);
    format!("{}{}", ShipmentId::CANONICAL_PREFIX, suffix)
}

async fn fetch_pending_quotations(pool: &PgPool) -> Result<Vec<LegacyQuotation>, sqlx::Error> {
    sqlx::query_as::<_, LegacyQuotation>(
        "SELECT id, data_version, company_id, transaction_type, incoterm_code, status, \
         issued_invoice, status_history, bl_document, cargo_ready_date, etd, eta, parties, \
         shipper_name, shipper_address, consignee_name, consignee_address, trash, superseded \
         FROM legacy_quotations WHERE superseded = FALSE ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

async fn already_migrated(pool: &PgPool, af_ids: &[String]) -> Result<HashSet<String>, sqlx::Error> {
    if af_ids.is_empty() {
        return Ok(HashSet::new());
    }
    let existing: Vec<String> = sqlx::query_scalar(
        "SELECT id FROM shipments WHERE id = ANY($1) AND migrated_from_v1 = TRUE",
    )
    .bind(af_ids)
    .fetch_all(pool)
    .await?;
    Ok(existing.into_iter().collect())
}

async fn fetch_freight(pool: &PgPool, quotation_id: &str) -> Result<Option<LegacyFreight>, sqlx::Error> {
    sqlx::query_as::<_, LegacyFreight>(
        "SELECT quotation_id, freight_type, container_load, commodity, hs_code, cargo_type \
         FROM legacy_quotation_freight WHERE quotation_id = $1",
    )
    .bind(quotation_id)
    .fetch_optional(pool)
    .await
}

async fn fetch_shipment_order(
    pool: &PgPool,
    quotation_id: &str,
) -> Result<Option<LegacyShipmentOrder>, sqlx::Error> {
    sqlx::query_as::<_, LegacyShipmentOrder>(
        "SELECT quotation_id, company_id, status, issued_invoice, shipper, consignee, \
         notify_party, origin_port_un_code, destination_port_un_code, vessel_name, \
         voyage_number, booking_reference, carrier FROM legacy_shipment_orders \
         WHERE quotation_id = $1",
    )
    .bind(quotation_id)
    .fetch_optional(pool)
    .await
}

async fn fetch_workflow(pool: &PgPool, quotation_id: &str) -> Result<Option<LegacyWorkflow>, sqlx::Error> {
    sqlx::query_as::<_, LegacyWorkflow>(
        "SELECT quotation_id, status_history, tasks FROM legacy_workflows WHERE quotation_id = $1",
    )
    .bind(quotation_id)
    .fetch_optional(pool)
    .await
}

async fn fetch_files(pool: &PgPool, quotation_id: &str) -> Result<Vec<LegacyFile>, sqlx::Error> {
    sqlx::query_as::<_, LegacyFile>(
        "SELECT file_id, shipment_order_id, file_name, file_location, file_tags, visibility, \
         uploaded_by_uid, uploaded_by_email, created_at FROM legacy_files \
         WHERE shipment_order_id = $1",
    )
    .bind(quotation_id)
    .fetch_all(pool)
    .await
}

struct PreparedRecord {
    afcq_id: String,
    af_id: String,
    countid: i64,
    assembled: assemble::AssembledShipment,
    files: Vec<LegacyFile>,
}

/// Runs one migration pass end to end: preflight, fetch, assemble,
/// (optionally) write, re-key, and report. Both `dry_run` and commit
/// share every step through assembly; only the final write phase is
/// skipped in dry-run mode.
pub async fn run(pool: &PgPool, dry_run: bool, now: DateTime<Utc>) -> Result<MigrationReport, MigrateError> {
    preflight_collision_check(pool).await?;

    let quotations = fetch_pending_quotations(pool).await?;
    let scanned = quotations.len();

    let af_ids: Vec<String> = quotations.iter().map(|q| afcq_to_af(&q.id)).collect();
    let migrated_ids = already_migrated(pool, &af_ids).await?;

    let mut report = MigrationReport {
        dry_run,
        scanned,
        ..Default::default()
    };

    let mut prepared = Vec::new();
    for quotation in quotations {
        let af_id = afcq_to_af(&quotation.id);
        if migrated_ids.contains(&af_id) {
            report.already_migrated += 1;
            continue;
        }

        let shipment_order = fetch_shipment_order(pool, &quotation.id).await?;
        if shipment_order.is_none() {
            report.skipped_no_shipment_order += 1;
            continue;
        }

        let countid: i64 = match quotation
            .id
            .strip_prefix(ShipmentId::LEGACY_PREFIX)
            .map(|s| s.parse::<i64>())
        {
            Some(Ok(n)) => n,
            _ => {
                report
                    .errors
                    .push((quotation.id.clone(), "non-numeric legacy suffix".to_string()));
                continue;
            }
        };

        let freight = fetch_freight(pool, &quotation.id).await?;
        let workflow = fetch_workflow(pool, &quotation.id).await?;
        let files = fetch_files(pool, &quotation.id).await?;

        let bundle = LegacyBundle {
            quotation,
            freight,
            shipment_order,
            workflow,
        };
        let assembled = assemble(&bundle, now);

        prepared.push(PreparedRecord {
            afcq_id: bundle.quotation.id.clone(),
            af_id,
            countid,
            assembled,
            files,
        });
    }

    info!(
        scanned,
        to_migrate = prepared.len(),
        skipped_no_so = report.skipped_no_shipment_order,
        already_migrated = report.already_migrated,
        dry_run,
        "legacy migration plan assembled"
    );

    if dry_run || prepared.is_empty() {
        report.migrated = prepared.len();
        return Ok(report);
    }

    let mut max_countid = 0i64;
    for chunk in prepared.chunks(WRITE_CHUNK_SIZE) {
        let mut tx = pool.begin().await?;
        for record in chunk {
            if let Err(err) = write_record(&mut tx, record).await {
                warn!(afcq_id = %record.afcq_id, error = %err, "failed to write migrated record");
                report.errors.push((record.afcq_id.clone(), err.to_string()));
                continue;
            }
            report.migrated += 1;
            report.files_rekeyed += record.files.len();
            if !record.assembled.workflow_tasks.is_empty() {
                report.workflows_rekeyed += 1;
            }
            max_countid = max_countid.max(record.countid);

            sqlx::query("UPDATE legacy_quotations SET superseded = TRUE WHERE id = $1")
                .bind(&record.afcq_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
    }

    if max_countid > 0 {
        bump_countid_sequence(pool, max_countid).await?;
    }

    Ok(report)
}

async fn write_record(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    record: &PreparedRecord,
) -> Result<(), sqlx::Error> {
    let a = &record.assembled;

    sqlx::query(
        "INSERT INTO shipments (id, countid, company_id, order_type, transaction_type, \
         incoterm_code, status, issued_invoice, migrated_from_v1, trash, origin_port, dest_port, \
         parties, status_history, cargo, booking, type_details, exception_data, route_nodes, \
         created_at, updated_at) \
         VALUES ($1,$2,$3,$4,$5,$6,$7,$8,TRUE,FALSE,$9,$10,$11,$12,'{}','{}','{}','{}','[]',$13,$13)",
    )
    .bind(&record.af_id)
    .bind(record.countid)
    .bind(&a.company_id)
    .bind(a.order_type)
    .bind(a.transaction_type)
    .bind(&a.incoterm_code)
    .bind(a.status)
    .bind(a.issued_invoice)
    .bind(&a.origin_port)
    .bind(&a.dest_port)
    .bind(Json(&a.parties))
    .bind(Json(&a.status_history))
    .bind(a.created_at)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        "INSERT INTO shipment_workflows (shipment_id, company_id, workflow_tasks, \
         status_history, completed, trash, created_at, updated_at) \
         VALUES ($1,$2,$3,$4,FALSE,FALSE,$5,$5)",
    )
    .bind(&record.af_id)
    .bind(&a.company_id)
    .bind(Json(&a.workflow_tasks))
    .bind(Json(&a.status_history))
    .bind(a.created_at)
    .execute(&mut **tx)
    .await?;

    for file in &record.files {
        sqlx::query(
            "INSERT INTO shipment_files (shipment_id, company_id, file_name, file_location, \
             file_tags, visibility, uploaded_by_uid, uploaded_by_email, trash, created_at, \
             updated_at) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,FALSE,$9,$9)",
        )
        .bind(&record.af_id)
        .bind(&a.company_id)
        .bind(&file.file_name)
        .bind(&file.file_location)
        .bind(&file.file_tags)
        .bind(file.visibility)
        .bind(&file.uploaded_by_uid)
        .bind(&file.uploaded_by_email)
        .bind(file.created_at)
        .execute(&mut **tx)
        .await?;
    }

    sqlx::query(
        "INSERT INTO system_logs (action, entity_id, actor_email, created_at) \
         VALUES ('legacy_migration', $1, 'legacy-migration', $2)",
    )
    .bind(&record.af_id)
    .bind(a.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Advances `shipment_countid_seq` past the highest migrated countid so a
/// subsequent live `create()` can never collide with a migrated record —
/// the Datastore original had no analogous integer sequence to protect.
async fn bump_countid_sequence(pool: &PgPool, max_countid: i64) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT setval('shipment_countid_seq', GREATEST($1, (SELECT last_value FROM shipment_countid_seq)))")
        .bind(max_countid)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn afcq_to_af_preserves_numeric_suffix() {
        assert_eq!(afcq_to_af("AFCQ-003862"), "AF-003862");
    }
}
