//! Request/response shapes for the `/api/v2` surface. Kept separate from
//! the domain types in `shipment-models` — these are wire shapes, not
//! storage shapes, and the two are free to diverge.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shipment_models::{Parties, TransactionType};

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub company_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub tab: String,
    pub company_id: Option<String>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub company_id: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentBody {
    pub company_id: String,
    #[serde(default = "default_order_type")]
    pub order_type: shipment_models::OrderType,
    pub incoterm_code: String,
    pub transaction_type: TransactionType,
    pub origin_port: Option<String>,
    pub dest_port: Option<String>,
    pub cargo_ready_date: Option<NaiveDate>,
    pub etd: Option<DateTime<Utc>>,
    pub eta: Option<DateTime<Utc>>,
    #[serde(default)]
    pub parties: Parties,
}

fn default_order_type() -> shipment_models::OrderType {
    shipment_models::OrderType::SeaFcl
}

/// Flattened replay of a `parse-bl` result plus whatever the caller
/// edited before confirming creation — mirrors the shape the legacy
/// `create-from-bl` endpoint accepted rather than re-embedding the full
/// extractor payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFromBlBody {
    pub company_id: String,
    #[serde(default = "default_order_type")]
    pub order_type: shipment_models::OrderType,
    pub incoterm_code: String,
    pub transaction_type: TransactionType,
    pub initial_status: i32,
    pub origin_un_code: Option<String>,
    pub destination_un_code: Option<String>,
    pub cargo_ready_date: Option<NaiveDate>,
    pub waybill_number: Option<String>,
    pub port_of_loading_label: Option<String>,
    pub port_of_discharge_label: Option<String>,
    pub shipper_name: Option<String>,
    pub shipper_address: Option<String>,
    pub consignee_name: Option<String>,
    pub consignee_address: Option<String>,
    pub notify_party_name: Option<String>,
    pub raw_extraction: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPatchBody {
    pub status: i32,
    #[serde(default)]
    pub allow_jump: bool,
    #[serde(default)]
    pub reverted: bool,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicedPatchBody {
    pub issued_invoice: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionPatchBody {
    pub flagged: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPatchBody {
    pub company_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartiesPatchBody {
    #[serde(default)]
    pub parties: Parties,
    #[serde(default)]
    pub force_update: bool,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub hard: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatchBody {
    pub status: Option<shipment_models::TaskStatus>,
    pub mode: Option<shipment_models::TaskMode>,
    pub assigned_to: Option<shipment_models::AssignedTo>,
    pub visibility: Option<shipment_models::Visibility>,
    #[serde(default)]
    pub third_party_name: Option<Option<String>>,
    #[serde(default)]
    pub due_date: Option<Option<NaiveDate>>,
    pub due_date_override: Option<bool>,
    #[serde(default)]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatchResponse {
    pub task: shipment_models::Task,
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteNodePatchBody {
    #[serde(default)]
    pub scheduled_eta: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub actual_eta: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub scheduled_etd: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub actual_etd: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteNodesPutBody {
    pub nodes: Vec<shipment_models::RouteNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePatchBody {
    pub file_tags: Option<Vec<String>>,
    pub visibility: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlResponse {
    pub url: String,
    pub expires_in_secs: u64,
}
