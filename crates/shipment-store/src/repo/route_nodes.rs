use chrono::{DateTime, Utc};
use shipment_models::{RouteNode, ShipmentId};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::repo::shipments::canonicalize;

pub async fn list(pool: &PgPool, id: &ShipmentId) -> Result<Vec<RouteNode>, StoreError> {
    Ok(super::shipments::get(pool, id).await?.route_nodes)
}

/// Replaces the entire route-node sequence, the shape the PUT endpoint
/// exposes. Rejects a set without exactly one `ORIGIN` and one
/// `DESTINATION`, renumbers `sequence` to a contiguous `1..=N` range, and
/// mirrors the ORIGIN's `scheduled_etd`/DESTINATION's `scheduled_eta`
/// onto the shipment's own `etd`/`eta` columns in the same statement.
pub async fn replace_all(
    pool: &PgPool,
    id: &ShipmentId,
    mut nodes: Vec<RouteNode>,
    now: DateTime<Utc>,
) -> Result<Vec<RouteNode>, StoreError> {
    let canonical = canonicalize(id);
    let timing = RouteNode::normalize_sequence(&mut nodes)?;
    sqlx::query(
        "UPDATE shipments SET route_nodes = $1, etd = $2, eta = $3, updated_at = $4 \
         WHERE id = $5 AND trash = FALSE",
    )
    .bind(Json(&nodes))
    .bind(timing.etd)
    .bind(timing.eta)
    .bind(now)
    .bind(canonical.as_str())
    .execute(pool)
    .await?;
    Ok(nodes)
}

/// Patches the eta/etd fields of a single node identified by `sequence`,
/// the shape the PATCH-by-sequence endpoint exposes. Re-mirrors the
/// shipment's `etd`/`eta` afterward since the patched node may be the
/// ORIGIN or DESTINATION.
pub async fn patch_one(
    pool: &PgPool,
    id: &ShipmentId,
    sequence: i16,
    scheduled_eta: Option<Option<DateTime<Utc>>>,
    actual_eta: Option<Option<DateTime<Utc>>>,
    scheduled_etd: Option<Option<DateTime<Utc>>>,
    actual_etd: Option<Option<DateTime<Utc>>>,
    now: DateTime<Utc>,
) -> Result<RouteNode, StoreError> {
    let canonical = canonicalize(id);
    let mut shipment = super::shipments::get(pool, &canonical).await?;
    let node = shipment
        .route_nodes
        .iter_mut()
        .find(|n| n.sequence == sequence)
        .ok_or_else(|| StoreError::RouteNodeNotFound(sequence))?;

    if let Some(v) = scheduled_eta {
        node.scheduled_eta = v;
    }
    if let Some(v) = actual_eta {
        node.actual_eta = v;
    }
    if let Some(v) = scheduled_etd {
        node.scheduled_etd = v;
    }
    if let Some(v) = actual_etd {
        node.actual_etd = v;
    }
    let updated = node.clone();

    let timing = RouteNode::normalize_sequence(&mut shipment.route_nodes)?;

    sqlx::query("UPDATE shipments SET route_nodes = $1, etd = $2, eta = $3, updated_at = $4 WHERE id = $5")
        .bind(Json(&shipment.route_nodes))
        .bind(timing.etd)
        .bind(timing.eta)
        .bind(now)
        .bind(canonical.as_str())
        .execute(pool)
        .await?;
    Ok(updated)
}
