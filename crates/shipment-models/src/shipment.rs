use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{OrderType, TransactionType};
use crate::id::{CountId, ShipmentId};
use crate::payloads::{
    BlDocument, Booking, Cargo, Creator, ExceptionData, Parties, StatusHistoryEntry, TypeDetails,
};
use crate::route_node::RouteNode;
use crate::task::Task;

/// The lifecycle ownership root. This type only carries the shape, not
/// the rules — those live in `shipment-state` and `shipment-workflow`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: ShipmentId,
    pub countid: CountId,
    pub company_id: String,

    pub order_type: OrderType,
    pub transaction_type: TransactionType,
    pub incoterm_code: String,

    pub status: i32,
    pub issued_invoice: bool,
    pub trash: bool,
    pub migrated_from_v1: bool,

    pub origin_port: Option<String>,
    pub origin_terminal: Option<String>,
    pub dest_port: Option<String>,
    pub dest_terminal: Option<String>,

    pub cargo_ready_date: Option<NaiveDate>,
    pub etd: Option<DateTime<Utc>>,
    pub eta: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub cargo: Cargo,
    #[serde(default)]
    pub booking: Booking,
    #[serde(default)]
    pub parties: Parties,
    #[serde(default)]
    pub bl_document: Option<BlDocument>,
    #[serde(default)]
    pub type_details: TypeDetails,
    #[serde(default)]
    pub exception_data: ExceptionData,
    #[serde(default)]
    pub route_nodes: Vec<RouteNode>,
    #[serde(default)]
    pub status_history: Vec<StatusHistoryEntry>,
    pub creator: Option<Creator>,
}

impl Shipment {
    /// Whether this shipment's incoterm/transaction classification is
    /// set, the precondition for lazily materializing a workflow task
    /// list.
    pub fn has_classifiers(&self) -> bool {
        !self.incoterm_code.trim().is_empty()
    }
}

/// 1:1 companion record tracking the task graph and a parallel
/// status-history channel used by the workflow view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentWorkflow {
    pub shipment_id: ShipmentId,
    pub company_id: String,
    #[serde(default)]
    pub workflow_tasks: Vec<Task>,
    #[serde(default)]
    pub status_history: Vec<StatusHistoryEntry>,
    pub completed: bool,
    pub trash: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
