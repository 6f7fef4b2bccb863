use axum::extract::{Multipart, Path, Query, State};
use chrono::Utc;
use shipment_auth::{effective_company_scope, Action};
use shipment_models::Parties;
use shipment_store::repo::shipments::{self, NewShipment, Tab};

use crate::auth::AuthenticatedUser;
use crate::dto::{
    CompanyPatchBody, CreateFromBlBody, CreateShipmentBody, DeleteQuery, ExceptionPatchBody,
    InvoicedPatchBody, ListQuery, PartiesPatchBody, SearchQuery, StatsQuery, StatusPatchBody,
};
use crate::envelope::{Created, Ok as Envelope};
use crate::error::ApiError;
use crate::objects::upload_key;
use crate::scope_guard;
use crate::state::SharedState;

use super::parse_id;

fn parse_tab(raw: &str) -> Result<Tab, ApiError> {
    match raw {
        "active" => Ok(Tab::Active),
        "completed" => Ok(Tab::Completed),
        "to_invoice" => Ok(Tab::ToInvoice),
        "draft" => Ok(Tab::Draft),
        "cancelled" => Ok(Tab::Cancelled),
        other => Err(ApiError::Validation(format!("unknown tab {other:?}"))),
    }
}

pub async fn stats(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<StatsQuery>,
) -> Result<Envelope<shipment_store::ShipmentStats>, ApiError> {
    let company_id = effective_company_scope(&claims, query.company_id.as_deref());
    let stats = shipments::stats(state.store.pool(), company_id)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(Envelope(stats))
}

pub async fn list(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<Envelope<Vec<shipment_models::Shipment>>, ApiError> {
    let tab = parse_tab(&query.tab)?;
    let company_id = effective_company_scope(&claims, query.company_id.as_deref());
    let offset = query.offset.unwrap_or(0).max(0);
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let rows = shipments::list(state.store.pool(), &tab, company_id, offset, limit)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(Envelope(rows))
}

pub async fn search(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<SearchQuery>,
) -> Result<Envelope<Vec<shipment_models::Shipment>>, ApiError> {
    let company_id = effective_company_scope(&claims, query.company_id.as_deref());
    let limit = query.limit.unwrap_or(25).clamp(1, 100);
    let rows = shipments::search(state.store.pool(), &query.q, company_id, limit)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(Envelope(rows))
}

pub async fn get(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Envelope<shipment_models::Shipment>, ApiError> {
    let id = parse_id(&id)?;
    let shipment = shipments::get(state.store.pool(), &id).await?;
    scope_guard::guard(&claims, &shipment)?;
    Ok(Envelope(shipment))
}

pub async fn create(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    axum::Json(body): axum::Json<CreateShipmentBody>,
) -> Result<Created<shipment_models::Shipment>, ApiError> {
    let new = NewShipment {
        company_id: body.company_id,
        order_type: body.order_type,
        transaction_type: body.transaction_type,
        incoterm_code: body.incoterm_code,
        initial_status: shipment_state::CONFIRMED,
        origin_port: body.origin_port,
        dest_port: body.dest_port,
        cargo_ready_date: body.cargo_ready_date,
        etd: body.etd,
        eta: body.eta,
        parties: body.parties,
        changed_by: claims.email.clone(),
        audit_action: "SHIPMENT_CREATED_MANUAL",
    };
    let shipment = shipments::create(state.store.pool(), new, Utc::now()).await?;
    Ok(Created(shipment))
}

pub async fn parse_bl(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<Envelope<shipment_bl::ParsedBl>, ApiError> {
    shipment_auth::require(&claims, Action::BlUpdateOrParse)?;

    let mut bytes: Option<bytes::Bytes> = None;
    let mut content_type: Option<String> = None;
    let mut filename: Option<String> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        if field.name() == Some("file") {
            content_type = field.content_type().map(|s| s.to_string());
            filename = field.file_name().map(|s| s.to_string());
            bytes = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?,
            );
        }
    }
    let bytes = bytes.ok_or_else(|| ApiError::Validation("missing file field".to_string()))?;

    let ports = state
        .store
        .ports()
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    let companies = state
        .store
        .companies()
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    let parsed = shipment_bl::parse_bl(
        state.extractor.as_ref(),
        &bytes,
        content_type.as_deref(),
        filename.as_deref(),
        &ports,
        &companies,
    )
    .await?;
    Ok(Envelope(parsed))
}

pub async fn create_from_bl(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    axum::Json(body): axum::Json<CreateFromBlBody>,
) -> Result<Created<shipment_models::Shipment>, ApiError> {
    shipment_auth::require(&claims, Action::BlUpdateOrParse)?;

    let new = NewShipment {
        company_id: body.company_id,
        order_type: body.order_type,
        transaction_type: body.transaction_type,
        incoterm_code: body.incoterm_code,
        initial_status: body.initial_status,
        origin_port: body.origin_un_code,
        dest_port: body.destination_un_code,
        cargo_ready_date: body.cargo_ready_date,
        etd: None,
        eta: None,
        parties: Parties {
            consignee: shipment_models::Party {
                name: body.consignee_name,
                address: body.consignee_address,
                ..Default::default()
            },
            shipper: shipment_models::Party {
                name: body.shipper_name,
                address: body.shipper_address,
                ..Default::default()
            },
            notify_party: shipment_models::Party {
                name: body.notify_party_name,
                ..Default::default()
            },
        },
        changed_by: claims.email.clone(),
        audit_action: "SHIPMENT_CREATED_FROM_BL",
    };
    let shipment = shipments::create(state.store.pool(), new, Utc::now()).await?;

    sqlx::query(
        "UPDATE shipments SET bl_document = $1, updated_at = $2 WHERE id = $3",
    )
    .bind(sqlx::types::Json(shipment_models::BlDocument {
        bl_number: body.waybill_number,
        port_of_loading_label: body.port_of_loading_label,
        port_of_discharge_label: body.port_of_discharge_label,
        on_board_date: body.cargo_ready_date,
        raw_extraction: Some(body.raw_extraction),
        file_id: None,
    }))
    .bind(Utc::now())
    .bind(shipment.id.as_str())
    .execute(state.store.pool())
    .await
    .map_err(|e| ApiError::Internal(e.into()))?;

    let shipment = shipments::get(state.store.pool(), &shipment.id).await?;
    Ok(Created(shipment))
}

pub async fn update_status(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    axum::Json(body): axum::Json<StatusPatchBody>,
) -> Result<Envelope<shipment_models::Shipment>, ApiError> {
    shipment_auth::require(&claims, Action::StatusUpdate)?;
    let id = parse_id(&id)?;
    let existing = shipments::get(state.store.pool(), &id).await?;
    scope_guard::guard(&claims, &existing)?;

    let shipment = shipments::update_status(
        state.store.pool(),
        &id,
        body.status,
        body.allow_jump,
        body.reverted,
        &claims.email,
        body.note.as_deref(),
        Utc::now(),
    )
    .await?;
    Ok(Envelope(shipment))
}

pub async fn update_invoiced(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    axum::Json(body): axum::Json<InvoicedPatchBody>,
) -> Result<Envelope<shipment_models::Shipment>, ApiError> {
    let id = parse_id(&id)?;
    let existing = shipments::get(state.store.pool(), &id).await?;
    scope_guard::guard(&claims, &existing)?;
    shipment_auth::require(
        &claims,
        Action::InvoicedToggle {
            shipment_status: existing.status,
        },
    )?;

    let shipment =
        shipments::set_invoiced(state.store.pool(), &id, body.issued_invoice, Utc::now()).await?;
    Ok(Envelope(shipment))
}

pub async fn update_exception(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    axum::Json(body): axum::Json<ExceptionPatchBody>,
) -> Result<Envelope<shipment_models::Shipment>, ApiError> {
    shipment_auth::require(&claims, Action::ExceptionFlag)?;
    let id = parse_id(&id)?;
    let existing = shipments::get(state.store.pool(), &id).await?;
    scope_guard::guard(&claims, &existing)?;

    let shipment = shipments::set_exception(
        state.store.pool(),
        &id,
        body.flagged,
        body.notes.as_deref(),
        &claims.email,
        Utc::now(),
    )
    .await?;
    Ok(Envelope(shipment))
}

pub async fn update_company(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    axum::Json(body): axum::Json<CompanyPatchBody>,
) -> Result<Envelope<shipment_models::Shipment>, ApiError> {
    if !claims.is_afu() {
        return Err(ApiError::Forbidden("insufficient role for this action".to_string()));
    }
    let id = parse_id(&id)?;
    let existing = shipments::get(state.store.pool(), &id).await?;
    scope_guard::guard(&claims, &existing)?;

    let shipment =
        shipments::reassign_company(state.store.pool(), &id, &body.company_id, Utc::now()).await?;
    Ok(Envelope(shipment))
}

pub async fn update_parties(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    axum::Json(body): axum::Json<PartiesPatchBody>,
) -> Result<Envelope<shipment_models::Shipment>, ApiError> {
    let id = parse_id(&id)?;
    let existing = shipments::get(state.store.pool(), &id).await?;
    scope_guard::guard(&claims, &existing)?;

    let shipment = shipments::merge_parties(
        state.store.pool(),
        &id,
        &body.parties,
        body.force_update,
        Utc::now(),
    )
    .await?;
    Ok(Envelope(shipment))
}

/// Multipart BL update: a `file` field (the BL PDF) plus a `payload`
/// field carrying the JSON-encoded merge body.
pub async fn update_bl(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Envelope<shipment_models::Shipment>, ApiError> {
    shipment_auth::require(&claims, Action::BlUpdateOrParse)?;
    let id = parse_id(&id)?;
    let existing = shipments::get(state.store.pool(), &id).await?;
    scope_guard::guard(&claims, &existing)?;

    let mut file_bytes: Option<bytes::Bytes> = None;
    let mut file_name = "bill-of-lading.pdf".to_string();
    let mut payload: Option<BlUpdatePayload> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                if let Some(name) = field.file_name() {
                    file_name = name.to_string();
                }
                file_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::Validation(e.to_string()))?,
                );
            }
            Some("payload") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
                payload = Some(
                    serde_json::from_str(&text)
                        .map_err(|e| ApiError::Validation(format!("invalid payload: {e}")))?,
                );
            }
            _ => {}
        }
    }
    let file_bytes = file_bytes.ok_or_else(|| ApiError::Validation("missing file field".to_string()))?;
    let payload = payload.ok_or_else(|| ApiError::Validation("missing payload field".to_string()))?;

    let key = upload_key(&existing.company_id, id.as_str(), &file_name);
    state
        .objects
        .put(&key, &file_bytes)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;

    let update = shipment_store::repo::bl::BlUpdate {
        booking: payload.booking,
        parties: payload.parties,
        type_details: payload.type_details,
        bl_document: payload.bl_document,
        force_update: payload.force_update,
    };
    let shipment = shipment_store::repo::bl::update_from_bl(
        state.store.pool(),
        &id,
        update,
        &file_name,
        &key,
        Some(file_bytes.len() as f64 / 1024.0),
        Some(claims.uid.as_str()),
        Some(claims.email.as_str()),
        Utc::now(),
    )
    .await?;
    Ok(Envelope(shipment))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlUpdatePayload {
    #[serde(default)]
    booking: shipment_models::Booking,
    #[serde(default)]
    parties: shipment_models::Parties,
    #[serde(default)]
    type_details: shipment_models::TypeDetails,
    #[serde(default)]
    bl_document: shipment_models::BlDocument,
    #[serde(default)]
    force_update: bool,
}

pub async fn delete(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Envelope<()>, ApiError> {
    if !claims.is_afu() {
        return Err(ApiError::Forbidden("insufficient role for this action".to_string()));
    }
    let id = parse_id(&id)?;
    let existing = shipments::get(state.store.pool(), &id).await?;
    scope_guard::guard(&claims, &existing)?;

    if query.hard {
        if !state.allows_hard_delete() {
            return Err(shipment_store::StoreError::HardDeleteDisabled.into());
        }
        shipments::hard_delete(state.store.pool(), &id).await?;
    } else {
        shipments::soft_delete(state.store.pool(), &id, Utc::now()).await?;
    }
    Ok(Envelope(()))
}
