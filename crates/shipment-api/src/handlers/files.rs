use axum::extract::{Multipart, Path, State};
use chrono::Utc;
use shipment_auth::Action;

use crate::auth::AuthenticatedUser;
use crate::dto::{FilePatchBody, SignedUrlResponse};
use crate::envelope::{Created, Ok as Envelope};
use crate::error::ApiError;
use crate::objects::upload_key;
use crate::scope_guard;
use crate::state::SharedState;

use super::parse_id;

/// AFC regular users only ever see files marked visible; every other
/// role sees the full list.
pub async fn list(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Envelope<Vec<shipment_models::ShipmentFile>>, ApiError> {
    let id = parse_id(&id)?;
    let shipment = shipment_store::repo::shipments::get(state.store.pool(), &id).await?;
    scope_guard::guard(&claims, &shipment)?;

    let visible_only = !claims.is_afu() && claims.role == shipment_models::Role::AfcRegular;
    let files = shipment_store::repo::files::list(state.store.pool(), &id, visible_only).await?;
    Ok(Envelope(files))
}

pub async fn upload(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Created<shipment_models::ShipmentFile>, ApiError> {
    shipment_auth::require(&claims, Action::FileUpload)?;

    let id = parse_id(&id)?;
    let shipment = shipment_store::repo::shipments::get(state.store.pool(), &id).await?;
    scope_guard::guard(&claims, &shipment)?;

    let mut file_bytes: Option<bytes::Bytes> = None;
    let mut file_name = String::from("upload.bin");
    let mut tags: Vec<String> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        match field.name().unwrap_or_default() {
            "file" => {
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
            "fileTags" | "file_tags" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
                tags = text
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            _ => {}
        }
    }

    let file_bytes =
        file_bytes.ok_or_else(|| ApiError::Validation("missing file field".to_string()))?;
    let size_kb = file_bytes.len() as f64 / 1024.0;
    let key = upload_key(&shipment.company_id, id.as_str(), &file_name);
    let location = state
        .objects
        .put(&key, &file_bytes)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;

    let file = shipment_store::repo::files::insert(
        state.store.pool(),
        &id,
        &shipment.company_id,
        &file_name,
        &location,
        &tags,
        Some(size_kb),
        Some(&claims.uid),
        Some(&claims.email),
        Utc::now(),
    )
    .await?;
    Ok(Created(file))
}

pub async fn download(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, file_id)): Path<(String, i64)>,
) -> Result<Envelope<SignedUrlResponse>, ApiError> {
    let id = parse_id(&id)?;
    let shipment = shipment_store::repo::shipments::get(state.store.pool(), &id).await?;
    scope_guard::guard(&claims, &shipment)?;

    let file = shipment_store::repo::files::get(state.store.pool(), file_id).await?;
    if !claims.is_afu() && claims.role == shipment_models::Role::AfcRegular && !file.visibility {
        return Err(ApiError::NotFound(format!("file {file_id} not found")));
    }

    const EXPIRES_IN_SECS: u64 = 900;
    let url = state
        .objects
        .signed_url(&file.file_location, EXPIRES_IN_SECS)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(Envelope(SignedUrlResponse {
        url,
        expires_in_secs: EXPIRES_IN_SECS,
    }))
}

pub async fn patch(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, file_id)): Path<(String, i64)>,
    axum::Json(body): axum::Json<FilePatchBody>,
) -> Result<Envelope<shipment_models::ShipmentFile>, ApiError> {
    shipment_auth::require(&claims, Action::FileUpload)?;

    let id = parse_id(&id)?;
    let shipment = shipment_store::repo::shipments::get(state.store.pool(), &id).await?;
    scope_guard::guard(&claims, &shipment)?;

    let now = Utc::now();
    let mut file = shipment_store::repo::files::get(state.store.pool(), file_id).await?;
    if let Some(tags) = body.file_tags {
        file = shipment_store::repo::files::set_tags(state.store.pool(), file_id, &tags, now).await?;
    }
    if let Some(visibility) = body.visibility {
        file =
            shipment_store::repo::files::set_visibility(state.store.pool(), file_id, visibility, now)
                .await?;
    }
    Ok(Envelope(file))
}

pub async fn delete(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, file_id)): Path<(String, i64)>,
) -> Result<Envelope<()>, ApiError> {
    shipment_auth::require(&claims, Action::FileDelete)?;

    let id = parse_id(&id)?;
    let shipment = shipment_store::repo::shipments::get(state.store.pool(), &id).await?;
    scope_guard::guard(&claims, &shipment)?;

    shipment_store::repo::files::soft_delete(state.store.pool(), file_id, Utc::now()).await?;
    Ok(Envelope(()))
}
