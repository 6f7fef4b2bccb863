//! Row shapes that mirror the relational schema exactly, each paired with
//! a conversion into/out of the plain domain type from `shipment-models`.
//! Kept separate from the domain types themselves so `shipment-models`
//! never needs to know a column's nullability or its `Json<T>` wrapper.

use chrono::{DateTime, NaiveDate, Utc};
use shipment_models::{
    BlDocument, Booking, Cargo, Creator, ExceptionData, OrderType, Parties, RouteNode, ShipmentId,
    ShipmentWorkflow, StatusHistoryEntry, Task, TransactionType, TypeDetails,
};
use shipment_models::{CountId, Shipment};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(FromRow)]
pub struct ShipmentRow {
    pub id: ShipmentId,
    pub countid: CountId,
    pub company_id: String,
    pub order_type: OrderType,
    pub transaction_type: TransactionType,
    pub incoterm_code: Option<String>,
    pub status: i32,
    pub issued_invoice: bool,
    pub migrated_from_v1: bool,
    pub trash: bool,
    pub origin_port: Option<String>,
    pub origin_terminal: Option<String>,
    pub dest_port: Option<String>,
    pub dest_terminal: Option<String>,
    pub cargo_ready_date: Option<NaiveDate>,
    pub etd: Option<DateTime<Utc>>,
    pub eta: Option<DateTime<Utc>>,
    pub cargo: Json<Cargo>,
    pub booking: Json<Booking>,
    pub parties: Json<Parties>,
    pub bl_document: Option<Json<BlDocument>>,
    pub type_details: Json<TypeDetails>,
    pub exception_data: Json<ExceptionData>,
    pub route_nodes: Json<Vec<RouteNode>>,
    pub status_history: Json<Vec<StatusHistoryEntry>>,
    pub creator: Option<Json<Creator>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShipmentRow> for Shipment {
    fn from(row: ShipmentRow) -> Self {
        Shipment {
            id: row.id,
            countid: row.countid,
            company_id: row.company_id,
            order_type: row.order_type,
            transaction_type: row.transaction_type,
            incoterm_code: row.incoterm_code.unwrap_or_default(),
            status: row.status,
            issued_invoice: row.issued_invoice,
            trash: row.trash,
            migrated_from_v1: row.migrated_from_v1,
            origin_port: row.origin_port,
            origin_terminal: row.origin_terminal,
            dest_port: row.dest_port,
            dest_terminal: row.dest_terminal,
            cargo_ready_date: row.cargo_ready_date,
            etd: row.etd,
            eta: row.eta,
            created_at: row.created_at,
            updated_at: row.updated_at,
            cargo: row.cargo.0,
            booking: row.booking.0,
            parties: row.parties.0,
            bl_document: row.bl_document.map(|j| j.0),
            type_details: row.type_details.0,
            exception_data: row.exception_data.0,
            route_nodes: row.route_nodes.0,
            status_history: row.status_history.0,
            creator: row.creator.map(|j| j.0),
        }
    }
}

#[derive(FromRow)]
pub struct ShipmentWorkflowRow {
    pub shipment_id: ShipmentId,
    pub company_id: String,
    pub workflow_tasks: Json<Vec<Task>>,
    pub status_history: Json<Vec<StatusHistoryEntry>>,
    pub completed: bool,
    pub trash: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShipmentWorkflowRow> for ShipmentWorkflow {
    fn from(row: ShipmentWorkflowRow) -> Self {
        ShipmentWorkflow {
            shipment_id: row.shipment_id,
            company_id: row.company_id,
            workflow_tasks: row.workflow_tasks.0,
            status_history: row.status_history.0,
            completed: row.completed,
            trash: row.trash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Five-way tab counter row for `GET /shipments/stats`.
#[derive(FromRow, Debug, Clone, Copy, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentStats {
    pub active: i64,
    pub completed: i64,
    pub to_invoice: i64,
    pub draft: i64,
    pub cancelled: i64,
}
