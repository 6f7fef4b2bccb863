use chrono::{DateTime, Utc};
use shipment_models::{BlDocument, Booking, Parties, Shipment, ShipmentId, TypeDetails};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::repo::{files, shipments::canonicalize};

/// Incoming, partially-populated values parsed off a bill of lading,
/// merged into the shipment's existing payloads rather than replacing
/// them.
pub struct BlUpdate {
    pub booking: Booking,
    pub parties: Parties,
    pub type_details: TypeDetails,
    pub bl_document: BlDocument,
    pub force_update: bool,
}

fn merge_booking(current: &mut Booking, incoming: &Booking, force: bool) {
    macro_rules! merge_field {
        ($field:ident) => {
            if incoming.$field.is_some() && (current.$field.is_none() || force) {
                current.$field = incoming.$field.clone();
            }
        };
    }
    merge_field!(booking_reference);
    merge_field!(carrier);
    merge_field!(vessel_name);
    merge_field!(voyage_number);
    merge_field!(booked_at);
}

fn merge_type_details(current: &mut TypeDetails, incoming: &TypeDetails, force: bool) {
    if !incoming.containers.is_empty() && (current.containers.is_empty() || force) {
        current.containers = incoming.containers.clone();
    }
    if !incoming.cargo_items.is_empty() && (current.cargo_items.is_empty() || force) {
        current.cargo_items = incoming.cargo_items.clone();
    }
}

/// Merges `update` into the shipment's `booking`/`parties`/`bl_document`/
/// `type_details` columns and, in the same unit of work, attaches the
/// uploaded BL PDF as a file record tagged `"bl"`.
#[allow(clippy::too_many_arguments)]
pub async fn update_from_bl(
    pool: &PgPool,
    id: &ShipmentId,
    update: BlUpdate,
    file_name: &str,
    file_location: &str,
    file_size_kb: Option<f64>,
    uploaded_by_uid: Option<&str>,
    uploaded_by_email: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Shipment, StoreError> {
    let canonical = canonicalize(id);
    let mut shipment = super::shipments::get(pool, &canonical).await?;

    merge_booking(&mut shipment.booking, &update.booking, update.force_update);
    shipment
        .parties
        .merge_from(&update.parties, update.force_update);
    merge_type_details(
        &mut shipment.type_details,
        &update.type_details,
        update.force_update,
    );
    // Raw parsed values are always mirrored into bl_document as an audit
    // copy, independent of the merge-not-replace rule above.
    shipment.bl_document = Some(update.bl_document);

    let mut tx = pool.begin().await?;
    sqlx::query(
        "UPDATE shipments SET booking = $1, parties = $2, type_details = $3, bl_document = $4, \
         updated_at = $5 WHERE id = $6",
    )
    .bind(Json(&shipment.booking))
    .bind(Json(&shipment.parties))
    .bind(Json(&shipment.type_details))
    .bind(Json(&shipment.bl_document))
    .bind(now)
    .bind(canonical.as_str())
    .execute(&mut *tx)
    .await?;

    files::insert(
        &mut *tx,
        &canonical,
        &shipment.company_id,
        file_name,
        file_location,
        &["bl".to_string()],
        file_size_kb,
        uploaded_by_uid,
        uploaded_by_email,
        now,
    )
    .await?;

    tx.commit().await?;
    super::shipments::get(pool, &canonical).await
}
