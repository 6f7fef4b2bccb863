//! Row shapes for the four V1 kinds this job reads: `Quotation`,
//! `QuotationFreight`, `ShipmentOrder`, `ShipmentWorkFlow`, plus `Files`.
//! Mirrors `legacy_*` tables (`migrations/0002_legacy.sql`), never the
//! live `shipments`/`shipment_workflows` schema.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use shipment_models::{Parties, Party};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct LegacyQuotation {
    pub id: String,
    pub data_version: i32,
    pub company_id: Option<String>,
    pub transaction_type: Option<String>,
    pub incoterm_code: Option<String>,
    pub status: i32,
    pub issued_invoice: bool,
    pub status_history: serde_json::Value,
    pub bl_document: Option<serde_json::Value>,
    pub cargo_ready_date: Option<NaiveDate>,
    pub etd: Option<DateTime<Utc>>,
    pub eta: Option<DateTime<Utc>>,
    pub parties: Option<Json<Parties>>,
    pub shipper_name: Option<String>,
    pub shipper_address: Option<String>,
    pub consignee_name: Option<String>,
    pub consignee_address: Option<String>,
    pub trash: bool,
    pub superseded: bool,
}

#[derive(Debug, Clone, Default, FromRow)]
pub struct LegacyFreight {
    pub quotation_id: String,
    pub freight_type: Option<String>,
    pub container_load: Option<String>,
    pub commodity: Option<String>,
    pub hs_code: Option<String>,
    pub cargo_type: Option<serde_json::Value>,
}

#[derive(Debug, Clone, FromRow)]
pub struct LegacyShipmentOrder {
    pub quotation_id: String,
    pub company_id: Option<String>,
    pub status: i32,
    pub issued_invoice: bool,
    pub shipper: Option<Json<Party>>,
    pub consignee: Option<Json<Party>>,
    pub notify_party: Option<Json<Party>>,
    pub origin_port_un_code: Option<String>,
    pub destination_port_un_code: Option<String>,
    pub vessel_name: Option<String>,
    pub voyage_number: Option<String>,
    pub booking_reference: Option<String>,
    pub carrier: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct LegacyWorkflow {
    pub quotation_id: String,
    pub status_history: serde_json::Value,
    pub tasks: serde_json::Value,
}

#[derive(Debug, Clone, FromRow)]
pub struct LegacyFile {
    pub file_id: i64,
    pub shipment_order_id: String,
    pub file_name: String,
    pub file_location: String,
    pub file_tags: Vec<String>,
    pub visibility: bool,
    pub uploaded_by_uid: Option<String>,
    pub uploaded_by_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One assembled legacy record plus whatever sub-entities were found for
/// it, the unit `assemble` works over.
#[derive(Debug, Clone)]
pub struct LegacyBundle {
    pub quotation: LegacyQuotation,
    pub freight: Option<LegacyFreight>,
    pub shipment_order: Option<LegacyShipmentOrder>,
    pub workflow: Option<LegacyWorkflow>,
}

/// The subset of legacy `status_history`/`tasks` JSON this job actually
/// reads; the legacy shape is close enough to the canonical one that a
/// plain `serde_json::Value` round-trip through these types is lossless
/// for the fields that matter.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LegacyStatusEntry {
    pub status: i32,
    #[serde(default)]
    pub label: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub changed_by: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}
