//! Tagged records for the semi-structured JSON-column payloads carried on a
//! [`crate::Shipment`]. Each is persisted as a single `json`/`jsonb` column
//! and parsed on read through `serde`; the store never hands callers a raw
//! `serde_json::Value` for these.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cargo {
    pub description: Option<String>,
    pub total_weight_kg: Option<f64>,
    pub total_volume_cbm: Option<f64>,
    pub total_packages: Option<String>,
    pub dangerous_goods: bool,
    pub chargeable_weight_kg: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_reference: Option<String>,
    pub carrier: Option<String>,
    pub vessel_name: Option<String>,
    pub voyage_number: Option<String>,
    pub booked_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Whether the booking reference is present and non-blank, the
    /// condition that gates freight-booking unblock propagation (C3).
    pub fn has_reference(&self) -> bool {
        self.booking_reference
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

impl Party {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.contact_name.is_none()
            && self.contact_email.is_none()
            && self.contact_phone.is_none()
    }

    /// Merges `other` into `self` field-by-field: an empty field is
    /// filled, a populated field is overwritten only when `force` is set.
    pub fn merge_from(&mut self, other: &Party, force: bool) {
        macro_rules! merge_field {
            ($field:ident) => {
                if other.$field.is_some() && (self.$field.is_none() || force) {
                    self.$field = other.$field.clone();
                }
            };
        }
        merge_field!(name);
        merge_field!(address);
        merge_field!(contact_name);
        merge_field!(contact_email);
        merge_field!(contact_phone);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parties {
    #[serde(default)]
    pub shipper: Party,
    #[serde(default)]
    pub consignee: Party,
    #[serde(default)]
    pub notify_party: Party,
}

impl Parties {
    pub fn merge_from(&mut self, other: &Parties, force: bool) {
        self.shipper.merge_from(&other.shipper, force);
        self.consignee.merge_from(&other.consignee, force);
        self.notify_party.merge_from(&other.notify_party, force);
    }
}

/// A single container row parsed off a bill of lading (SEA_FCL shipments).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub container_number: Option<String>,
    pub container_type: Option<String>,
    pub seal_number: Option<String>,
    pub packages: Option<String>,
    pub weight_kg: Option<f64>,
}

/// A single cargo-item row, used for LCL/air shipments without discrete
/// containers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoItem {
    pub description: Option<String>,
    pub packages: Option<String>,
    pub weight_kg: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDetails {
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default)]
    pub cargo_items: Vec<CargoItem>,
}

/// Audit copy of whatever the LLM extractor returned for a bill of
/// lading, mirrored verbatim alongside the normalized fields so the raw
/// extraction is never lost.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlDocument {
    pub bl_number: Option<String>,
    pub port_of_loading_label: Option<String>,
    pub port_of_discharge_label: Option<String>,
    pub on_board_date: Option<NaiveDate>,
    pub raw_extraction: Option<serde_json::Value>,
    pub file_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionData {
    pub flagged: bool,
    pub notes: Option<String>,
    pub flagged_by: Option<String>,
    pub flagged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub uid: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// One append-only entry in a shipment's (or workflow's) status history.
/// The shipment channel and workflow channel carry slightly different
/// label fields (see `4.4`); both reuse this shape with the unused field
/// left `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    pub status: i32,
    pub label: Option<String>,
    pub status_label: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub changed_by: String,
    pub note: Option<String>,
    #[serde(default)]
    pub reverted: bool,
    pub reverted_from: Option<i32>,
}
