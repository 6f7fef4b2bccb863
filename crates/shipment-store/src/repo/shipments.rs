use chrono::{DateTime, Utc};
use shipment_models::{
    CountId, Parties, Shipment, ShipmentId, ShipmentWorkflow, StatusHistoryEntry, Task,
    TransactionType,
};
use shipment_rules::ScheduleInputs;
use shipment_state::{status_label, TransitionContext};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::StoreError;
use crate::row::{ShipmentRow, ShipmentStats, ShipmentWorkflowRow};

/// Legacy `AFCQ-` ids resolve to their canonical `AF-` counterpart before
/// any lookup — post-migration, only canonical rows exist in `shipments`.
pub fn canonicalize(id: &ShipmentId) -> ShipmentId {
    if id.is_legacy() {
        let suffix = id.numeric_suffix().unwrap_or_default();
        ShipmentId::parse(format!("{}{}", ShipmentId::CANONICAL_PREFIX, suffix))
            .unwrap_or_else(|_| id.clone())
    } else {
        id.clone()
    }
}

async fn next_countid(tx: &mut Transaction<'_, Postgres>) -> Result<CountId, sqlx::Error> {
    let (value,): (i64,) = sqlx::query_as("SELECT nextval('shipment_countid_seq')")
        .fetch_one(&mut **tx)
        .await?;
    Ok(CountId::new(value))
}

pub(crate) const SHIPMENT_COLUMNS: &str = "id, countid, company_id, order_type, transaction_type, \
    incoterm_code, status, issued_invoice, migrated_from_v1, trash, origin_port, \
    origin_terminal, dest_port, dest_terminal, cargo_ready_date, etd, eta, cargo, booking, \
    parties, bl_document, type_details, exception_data, route_nodes, status_history, creator, \
    created_at, updated_at";

pub async fn get(pool: &PgPool, id: &ShipmentId) -> Result<Shipment, StoreError> {
    let canonical = canonicalize(id);
    let sql = format!("SELECT {SHIPMENT_COLUMNS} FROM shipments WHERE id = $1 AND trash = FALSE");
    let row: Option<ShipmentRow> = sqlx::query_as(&sql)
        .bind(canonical.as_str())
        .fetch_optional(pool)
        .await?;
    row.map(Shipment::from)
        .ok_or_else(|| StoreError::ShipmentNotFound(id.as_str().to_string()))
}

pub async fn get_workflow(pool: &PgPool, id: &ShipmentId) -> Result<ShipmentWorkflow, StoreError> {
    let canonical = canonicalize(id);
    let row: Option<ShipmentWorkflowRow> = sqlx::query_as(
        "SELECT shipment_id, company_id, workflow_tasks, status_history, completed, trash, \
         created_at, updated_at FROM shipment_workflows WHERE shipment_id = $1 AND trash = FALSE",
    )
    .bind(canonical.as_str())
    .fetch_optional(pool)
    .await?;
    row.map(ShipmentWorkflow::from)
        .ok_or_else(|| StoreError::ShipmentNotFound(id.as_str().to_string()))
}

/// Inputs shared by manual create and create-from-BL; the two flows only
/// differ in their classifiers and initial status.
pub struct NewShipment {
    pub company_id: String,
    pub order_type: shipment_models::OrderType,
    pub transaction_type: TransactionType,
    pub incoterm_code: String,
    pub initial_status: i32,
    pub origin_port: Option<String>,
    pub dest_port: Option<String>,
    pub cargo_ready_date: Option<chrono::NaiveDate>,
    pub etd: Option<DateTime<Utc>>,
    pub eta: Option<DateTime<Utc>>,
    pub parties: Parties,
    pub changed_by: String,
    pub audit_action: &'static str,
}

/// Creates a shipment and its 1:1 workflow row atomically: allocates
/// `countid`, generates the task list via C1, writes a one-entry history
/// on both channels, and emits the audit log entry — all inside one
/// transaction.
pub async fn create(pool: &PgPool, new: NewShipment, now: DateTime<Utc>) -> Result<Shipment, StoreError> {
    let mut tx = pool.begin().await?;
    let countid = next_countid(&mut tx).await?;
    let id = countid.canonical_id();

    let tasks: Vec<Task> = shipment_rules::generate_tasks(
        countid.0,
        &new.incoterm_code,
        new.transaction_type,
        ScheduleInputs {
            cargo_ready_date: new.cargo_ready_date,
            etd: new.etd,
            eta: new.eta,
        },
        &new.changed_by,
        now,
    );

    let history = vec![StatusHistoryEntry {
        status: new.initial_status,
        label: Some(status_label(new.initial_status)),
        status_label: None,
        timestamp: now,
        changed_by: new.changed_by.clone(),
        note: None,
        reverted: false,
        reverted_from: None,
    }];
    let workflow_history = vec![StatusHistoryEntry {
        status: new.initial_status,
        label: None,
        status_label: Some(status_label(new.initial_status)),
        timestamp: now,
        changed_by: new.changed_by.clone(),
        note: None,
        reverted: false,
        reverted_from: None,
    }];

    sqlx::query(
        "INSERT INTO shipments (id, countid, company_id, order_type, transaction_type, \
         incoterm_code, status, issued_invoice, migrated_from_v1, trash, origin_port, dest_port, \
         cargo_ready_date, etd, eta, cargo, booking, parties, type_details, exception_data, \
         route_nodes, status_history, created_at, updated_at) \
         VALUES ($1,$2,$3,$4,$5,$6,$7,FALSE,FALSE,FALSE,$8,$9,$10,$11,$12,'{}','{}',$13,'{}','{}', \
         '[]',$14,$15,$15)",
    )
    .bind(id.as_str())
    .bind(countid)
    .bind(&new.company_id)
    .bind(new.order_type)
    .bind(new.transaction_type)
    .bind(&new.incoterm_code)
    .bind(new.initial_status)
    .bind(&new.origin_port)
    .bind(&new.dest_port)
    .bind(new.cargo_ready_date)
    .bind(new.etd)
    .bind(new.eta)
    .bind(Json(&new.parties))
    .bind(Json(&history))
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO shipment_workflows (shipment_id, company_id, workflow_tasks, \
         status_history, completed, trash, created_at, updated_at) \
         VALUES ($1,$2,$3,$4,FALSE,FALSE,$5,$5)",
    )
    .bind(id.as_str())
    .bind(&new.company_id)
    .bind(Json(&tasks))
    .bind(Json(&workflow_history))
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO system_logs (action, entity_id, actor_email, created_at) \
         VALUES ($1,$2,$3,$4)",
    )
    .bind(new.audit_action)
    .bind(id.as_str())
    .bind(&new.changed_by)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    get(pool, &id).await
}

/// Runs the C2 decision and, if accepted, writes the new status plus a
/// history entry on both channels within one transaction.
pub async fn update_status(
    pool: &PgPool,
    id: &ShipmentId,
    target: i32,
    allow_jump: bool,
    reverted: bool,
    changed_by: &str,
    note: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Shipment, StoreError> {
    let canonical = canonicalize(id);
    let mut tx = pool.begin().await?;

    let sql = format!("SELECT {SHIPMENT_COLUMNS} FROM shipments WHERE id = $1 AND trash = FALSE FOR UPDATE");
    let row: Option<ShipmentRow> = sqlx::query_as(&sql)
        .bind(canonical.as_str())
        .fetch_optional(&mut *tx)
        .await?;
    let shipment: Shipment = row
        .map(Shipment::from)
        .ok_or_else(|| StoreError::ShipmentNotFound(id.as_str().to_string()))?;

    let incoterm = if shipment.has_classifiers() {
        Some(shipment.incoterm_code.as_str())
    } else {
        None
    };
    let decision = shipment_state::update_status(
        shipment.status,
        target,
        TransitionContext {
            incoterm,
            transaction_type: incoterm.map(|_| shipment.transaction_type),
            allow_jump,
            reverted,
        },
    )?;

    let mut shipment_history = shipment.status_history.clone();
    shipment_history.push(StatusHistoryEntry {
        status: target,
        label: Some(status_label(target)),
        status_label: None,
        timestamp: now,
        changed_by: changed_by.to_string(),
        note: note.map(|s| s.to_string()),
        reverted,
        reverted_from: reverted.then_some(shipment.status),
    });

    sqlx::query(
        "UPDATE shipments SET status = $1, status_history = $2, updated_at = $3 WHERE id = $4",
    )
    .bind(target)
    .bind(Json(&shipment_history))
    .bind(now)
    .bind(canonical.as_str())
    .execute(&mut *tx)
    .await?;

    let workflow_row: Option<ShipmentWorkflowRow> = sqlx::query_as(
        "SELECT shipment_id, company_id, workflow_tasks, status_history, completed, trash, \
         created_at, updated_at FROM shipment_workflows WHERE shipment_id = $1 FOR UPDATE",
    )
    .bind(canonical.as_str())
    .fetch_optional(&mut *tx)
    .await?;
    if let Some(workflow_row) = workflow_row {
        let mut workflow: ShipmentWorkflow = workflow_row.into();
        workflow.status_history.push(StatusHistoryEntry {
            status: target,
            label: None,
            status_label: Some(status_label(target)),
            timestamp: now,
            changed_by: changed_by.to_string(),
            note: None,
            reverted,
            reverted_from: reverted.then_some(shipment.status),
        });
        let completed = target == shipment_state::COMPLETED;
        let reopened_from_completed = target == shipment_state::CANCELLED;

        sqlx::query(
            "UPDATE shipment_workflows SET status_history = $1, completed = $2, updated_at = $3 \
             WHERE shipment_id = $4",
        )
        .bind(Json(&workflow.status_history))
        .bind(if reopened_from_completed {
            false
        } else {
            completed || workflow.completed
        })
        .bind(now)
        .bind(canonical.as_str())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    let _ = decision;
    get(pool, &canonical).await
}

pub async fn set_invoiced(
    pool: &PgPool,
    id: &ShipmentId,
    issued_invoice: bool,
    now: DateTime<Utc>,
) -> Result<Shipment, StoreError> {
    let canonical = canonicalize(id);
    sqlx::query("UPDATE shipments SET issued_invoice = $1, updated_at = $2 WHERE id = $3 AND trash = FALSE")
        .bind(issued_invoice)
        .bind(now)
        .bind(canonical.as_str())
        .execute(pool)
        .await?;
    get(pool, &canonical).await
}

pub async fn set_exception(
    pool: &PgPool,
    id: &ShipmentId,
    flagged: bool,
    notes: Option<&str>,
    flagged_by: &str,
    now: DateTime<Utc>,
) -> Result<Shipment, StoreError> {
    let canonical = canonicalize(id);
    let mut shipment = get(pool, &canonical).await?;
    shipment.exception_data.flagged = flagged;
    shipment.exception_data.notes = notes.map(|s| s.to_string());
    shipment.exception_data.flagged_by = Some(flagged_by.to_string());
    shipment.exception_data.flagged_at = Some(now);

    sqlx::query("UPDATE shipments SET exception_data = $1, updated_at = $2 WHERE id = $3")
        .bind(Json(&shipment.exception_data))
        .bind(now)
        .bind(canonical.as_str())
        .execute(pool)
        .await?;
    get(pool, &canonical).await
}

pub async fn reassign_company(
    pool: &PgPool,
    id: &ShipmentId,
    company_id: &str,
    now: DateTime<Utc>,
) -> Result<Shipment, StoreError> {
    let canonical = canonicalize(id);
    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE shipments SET company_id = $1, updated_at = $2 WHERE id = $3")
        .bind(company_id)
        .bind(now)
        .bind(canonical.as_str())
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE shipment_workflows SET company_id = $1, updated_at = $2 WHERE shipment_id = $3")
        .bind(company_id)
        .bind(now)
        .bind(canonical.as_str())
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    get(pool, &canonical).await
}

pub async fn merge_parties(
    pool: &PgPool,
    id: &ShipmentId,
    incoming: &Parties,
    force_update: bool,
    now: DateTime<Utc>,
) -> Result<Shipment, StoreError> {
    let canonical = canonicalize(id);
    let mut shipment = get(pool, &canonical).await?;
    shipment.parties.merge_from(incoming, force_update);

    sqlx::query("UPDATE shipments SET parties = $1, updated_at = $2 WHERE id = $3")
        .bind(Json(&shipment.parties))
        .bind(now)
        .bind(canonical.as_str())
        .execute(pool)
        .await?;
    get(pool, &canonical).await
}

pub async fn soft_delete(pool: &PgPool, id: &ShipmentId, now: DateTime<Utc>) -> Result<(), StoreError> {
    let canonical = canonicalize(id);
    let mut tx = pool.begin().await?;
    let result = sqlx::query(
        "UPDATE shipments SET trash = TRUE, updated_at = $1 WHERE id = $2 AND trash = FALSE",
    )
    .bind(now)
    .bind(canonical.as_str())
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::AlreadyDeleted(id.as_str().to_string()));
    }
    sqlx::query("UPDATE shipment_workflows SET trash = TRUE, updated_at = $1 WHERE shipment_id = $2")
        .bind(now)
        .bind(canonical.as_str())
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

/// Hard delete cascades to `shipment_files` and `shipment_workflows`
/// through `ON DELETE CASCADE`; callers must only invoke this outside
/// production (enforced by `shipment-api`, not here).
pub async fn hard_delete(pool: &PgPool, id: &ShipmentId) -> Result<(), StoreError> {
    let canonical = canonicalize(id);
    let result = sqlx::query("DELETE FROM shipments WHERE id = $1")
        .bind(canonical.as_str())
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::ShipmentNotFound(id.as_str().to_string()));
    }
    Ok(())
}

pub async fn stats(pool: &PgPool, company_id: Option<&str>) -> Result<ShipmentStats, sqlx::Error> {
    let sql = "SELECT \
        COUNT(*) FILTER (WHERE status IN (3001,3002,4001,4002) OR (status = 2001 AND NOT migrated_from_v1)) AS active, \
        COUNT(*) FILTER (WHERE status = 5001 OR (status = 2001 AND migrated_from_v1)) AS completed, \
        COUNT(*) FILTER (WHERE status = 5001 AND issued_invoice = FALSE) AS to_invoice, \
        COUNT(*) FILTER (WHERE status IN (1001,1002)) AS draft, \
        COUNT(*) FILTER (WHERE status = -1) AS cancelled \
        FROM shipments WHERE trash = FALSE AND ($1::text IS NULL OR company_id = $1)";
    sqlx::query_as(sql).bind(company_id).fetch_one(pool).await
}

pub enum Tab {
    Active,
    Completed,
    ToInvoice,
    Draft,
    Cancelled,
}

fn tab_predicate(tab: &Tab) -> &'static str {
    match tab {
        Tab::Active => "(status IN (3001,3002,4001,4002) OR (status = 2001 AND NOT migrated_from_v1))",
        Tab::Completed => "(status = 5001 OR (status = 2001 AND migrated_from_v1))",
        Tab::ToInvoice => "(status = 5001 AND issued_invoice = FALSE)",
        Tab::Draft => "(status IN (1001,1002))",
        Tab::Cancelled => "(status = -1)",
    }
}

pub async fn list(
    pool: &PgPool,
    tab: &Tab,
    company_id: Option<&str>,
    offset: i64,
    limit: i64,
) -> Result<Vec<Shipment>, sqlx::Error> {
    let sql = format!(
        "SELECT {SHIPMENT_COLUMNS} FROM shipments WHERE trash = FALSE AND {} \
         AND ($1::text IS NULL OR company_id = $1) \
         ORDER BY updated_at DESC OFFSET $2 LIMIT $3",
        tab_predicate(tab)
    );
    let rows: Vec<ShipmentRow> = sqlx::query_as(&sql)
        .bind(company_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Shipment::from).collect())
}

/// ID / company / port substring match, case-insensitive, scoped by
/// `company_id` for AFC callers. The company match is against the
/// company's name, joined in from `companies` — `company_id` itself is
/// an opaque key, not something a user would type into a search box.
pub async fn search(
    pool: &PgPool,
    query: &str,
    company_id: Option<&str>,
    limit: i64,
) -> Result<Vec<Shipment>, sqlx::Error> {
    let pattern = format!("%{}%", query.to_uppercase());
    let qualified_columns: Vec<String> = SHIPMENT_COLUMNS
        .split(", ")
        .map(|c| format!("s.{c}"))
        .collect();
    let sql = format!(
        "SELECT {cols} FROM shipments s LEFT JOIN companies c ON c.id = s.company_id \
         WHERE s.trash = FALSE \
         AND ($1::text IS NULL OR s.company_id = $1) \
         AND (UPPER(s.id) LIKE $2 OR UPPER(s.origin_port) LIKE $2 OR UPPER(s.dest_port) LIKE $2 \
              OR UPPER(c.name) LIKE $2) \
         ORDER BY s.updated_at DESC LIMIT $3",
        cols = qualified_columns.join(", "),
    );
    let rows: Vec<ShipmentRow> = sqlx::query_as(&sql)
        .bind(company_id)
        .bind(pattern)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Shipment::from).collect())
}
