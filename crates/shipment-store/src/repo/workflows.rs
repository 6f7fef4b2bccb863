use chrono::{DateTime, Utc};
use shipment_models::{Shipment, ShipmentId, ShipmentWorkflow, Task};
use shipment_rules::ScheduleInputs;
use shipment_workflow::TaskPatch;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::repo::shipments::canonicalize;
use crate::row::ShipmentWorkflowRow;

/// Reads a shipment's workflow, lazily materializing its task list (via
/// C1) the first time it's read on a shipment that has classifiers set
/// but no tasks yet, persisting the result in the same call.
pub async fn get_or_materialize(
    pool: &PgPool,
    shipment: &Shipment,
) -> Result<ShipmentWorkflow, StoreError> {
    let canonical = canonicalize(&shipment.id);
    let mut workflow = super::shipments::get_workflow(pool, &canonical).await?;

    if shipment_workflow::needs_materialization(
        workflow.workflow_tasks.is_empty(),
        &shipment.incoterm_code,
        Some(shipment.transaction_type),
    ) {
        let now = Utc::now();
        let tasks: Vec<Task> = shipment_rules::generate_tasks(
            shipment.countid.0,
            &shipment.incoterm_code,
            shipment.transaction_type,
            ScheduleInputs {
                cargo_ready_date: shipment.cargo_ready_date,
                etd: shipment.etd,
                eta: shipment.eta,
            },
            "system",
            now,
        );
        sqlx::query(
            "UPDATE shipment_workflows SET workflow_tasks = $1, updated_at = $2 \
             WHERE shipment_id = $3",
        )
        .bind(Json(&tasks))
        .bind(now)
        .bind(canonical.as_str())
        .execute(pool)
        .await?;
        workflow.workflow_tasks = tasks;
        workflow.updated_at = now;
    }

    Ok(workflow)
}

/// Applies a task patch within one unit of work: loads the shipment and
/// workflow, mutates the in-memory task list through C3, runs unblock
/// propagation, and persists the whole list back.
pub async fn update_task(
    pool: &PgPool,
    shipment_id: &ShipmentId,
    task_id: &str,
    patch: &TaskPatch,
    updated_by: &str,
    now: DateTime<Utc>,
) -> Result<(Task, Vec<String>), StoreError> {
    let canonical = canonicalize(shipment_id);
    let mut tx = pool.begin().await?;

    let shipment_row: Option<crate::row::ShipmentRow> = sqlx::query_as(&format!(
        "SELECT {} FROM shipments WHERE id = $1 AND trash = FALSE FOR UPDATE",
        crate::repo::shipments::SHIPMENT_COLUMNS
    ))
    .bind(canonical.as_str())
    .fetch_optional(&mut *tx)
    .await?;
    let shipment: Shipment = shipment_row
        .map(Shipment::from)
        .ok_or_else(|| StoreError::ShipmentNotFound(shipment_id.as_str().to_string()))?;

    let workflow_row: Option<ShipmentWorkflowRow> = sqlx::query_as(
        "SELECT shipment_id, company_id, workflow_tasks, status_history, completed, trash, \
         created_at, updated_at FROM shipment_workflows WHERE shipment_id = $1 FOR UPDATE",
    )
    .bind(canonical.as_str())
    .fetch_optional(&mut *tx)
    .await?;
    let mut workflow: ShipmentWorkflow = workflow_row
        .map(ShipmentWorkflow::from)
        .ok_or_else(|| StoreError::ShipmentNotFound(shipment_id.as_str().to_string()))?;

    let (task, warnings) = shipment_workflow::update_task(
        &mut workflow.workflow_tasks,
        task_id,
        patch,
        shipment.booking.booking_reference.as_deref(),
        updated_by,
        now,
    )?;

    sqlx::query("UPDATE shipment_workflows SET workflow_tasks = $1, updated_at = $2 WHERE shipment_id = $3")
        .bind(Json(&workflow.workflow_tasks))
        .bind(now)
        .bind(canonical.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok((task, warnings))
}
