use axum::extract::{Path, State};
use chrono::Utc;
use shipment_auth::Action;
use shipment_workflow::TaskPatch;

use crate::auth::AuthenticatedUser;
use crate::dto::{TaskPatchBody, TaskPatchResponse};
use crate::envelope::Ok as Envelope;
use crate::error::ApiError;
use crate::scope_guard;
use crate::state::SharedState;

use super::parse_id;

pub async fn list(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Envelope<Vec<shipment_models::Task>>, ApiError> {
    let id = parse_id(&id)?;
    let shipment = shipment_store::repo::shipments::get(state.store.pool(), &id).await?;
    scope_guard::guard(&claims, &shipment)?;

    let workflow = shipment_store::repo::workflows::get_or_materialize(state.store.pool(), &shipment)
        .await?;
    Ok(Envelope(workflow.workflow_tasks))
}

pub async fn update(
    State(state): State<SharedState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, task_id)): Path<(String, String)>,
    axum::Json(body): axum::Json<TaskPatchBody>,
) -> Result<Envelope<TaskPatchResponse>, ApiError> {
    let id = parse_id(&id)?;
    let shipment = shipment_store::repo::shipments::get(state.store.pool(), &id).await?;
    scope_guard::guard(&claims, &shipment)?;

    let touches_visibility = body.visibility.is_some();
    shipment_auth::require(&claims, Action::TaskUpdate { touches_visibility })?;

    let patch = TaskPatch {
        status: body.status,
        mode: body.mode,
        assigned_to: body.assigned_to,
        visibility: body.visibility,
        third_party_name: body.third_party_name,
        due_date: body.due_date,
        due_date_override: body.due_date_override,
        notes: body.notes,
    };

    let (task, warnings) = shipment_store::repo::workflows::update_task(
        state.store.pool(),
        &id,
        &task_id,
        &patch,
        &claims.email,
        Utc::now(),
    )
    .await?;
    Ok(Envelope(TaskPatchResponse { task, warnings }))
}
