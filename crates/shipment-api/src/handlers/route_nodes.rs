use axum::extract::{Path, State};
use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::dto::{RouteNodePatchBody, RouteNodesPutBody};
use crate::envelope::Ok as Envelope;
use crate::error::ApiError;
use crate::scope_guard;
use crate::state::SharedState;

use super::parse_id;

async fn load_scoped(
    state: &SharedState,
    claims: &shipment_auth::Claims,
    raw_id: &str,
) -> Result<shipment_models::ShipmentId, ApiError> {
    let id = parse_id(raw_id)?;
    let shipment = shipment_store::repo::shipments::get(state.store.pool(), &id).await?;
    scope_guard::guard(claims, &shipment)?;
    Ok(id)
}

pub async fn list(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Envelope<Vec<shipment_models::RouteNode>>, ApiError> {
    let id = load_scoped(&state, &claims, &id).await?;
    let nodes = shipment_store::repo::route_nodes::list(state.store.pool(), &id).await?;
    Ok(Envelope(nodes))
}

pub async fn replace(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    axum::Json(body): axum::Json<RouteNodesPutBody>,
) -> Result<Envelope<Vec<shipment_models::RouteNode>>, ApiError> {
    if !claims.is_afu() {
        return Err(ApiError::Forbidden(
            "only AFU users may replace route nodes".to_string(),
        ));
    }
    let id = load_scoped(&state, &claims, &id).await?;
    let nodes =
        shipment_store::repo::route_nodes::replace_all(state.store.pool(), &id, body.nodes, Utc::now())
            .await?;
    Ok(Envelope(nodes))
}

pub async fn patch_one(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, sequence)): Path<(String, i16)>,
    axum::Json(body): axum::Json<RouteNodePatchBody>,
) -> Result<Envelope<shipment_models::RouteNode>, ApiError> {
    let id = load_scoped(&state, &claims, &id).await?;
    let node = shipment_store::repo::route_nodes::patch_one(
        state.store.pool(),
        &id,
        sequence,
        body.scheduled_eta,
        body.actual_eta,
        body.scheduled_etd,
        body.actual_etd,
        Utc::now(),
    )
    .await?;
    Ok(Envelope(node))
}
