//! Translates a legacy bundle (quotation + optional freight/shipment
//! order/workflow) into the fields needed to insert a canonical shipment.
//! Pure, no I/O — kept isolated so the derivation rules can be unit
//! tested without a database.

use chrono::{DateTime, Utc};
use shipment_models::{OrderType, Parties, Party, StatusHistoryEntry, Task, TransactionType};

use crate::legacy::{LegacyBundle, LegacyStatusEntry};

/// Everything `lib.rs` needs to write one canonical `shipments` +
/// `shipment_workflows` row pair.
#[derive(Debug, Clone)]
pub struct AssembledShipment {
    pub order_type: OrderType,
    pub transaction_type: TransactionType,
    pub incoterm_code: String,
    pub status: i32,
    pub issued_invoice: bool,
    pub company_id: String,
    pub origin_port: Option<String>,
    pub dest_port: Option<String>,
    pub parties: Parties,
    pub status_history: Vec<StatusHistoryEntry>,
    pub workflow_tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
}

/// `freight_type == AIR` wins outright; otherwise FCL/LCL container load
/// decides, defaulting to LCL when neither is set.
fn derive_order_type(freight: Option<&crate::legacy::LegacyFreight>) -> OrderType {
    let freight_type = freight
        .and_then(|f| f.freight_type.as_deref())
        .unwrap_or_default()
        .to_uppercase();
    let container_load = freight
        .and_then(|f| f.container_load.as_deref())
        .unwrap_or_default()
        .to_uppercase();

    if freight_type == "AIR" {
        OrderType::Air
    } else if container_load == "FCL" {
        OrderType::SeaFcl
    } else {
        OrderType::SeaLcl
    }
}

/// A `ShipmentOrder`'s status is the source of truth when one exists;
/// absent a `ShipmentOrder` the record defaults to CONFIRMED (2001), the
/// same fallback the original migration used for a quotation with no
/// downstream order.
fn derive_status(quotation_status: i32, shipment_order: Option<&crate::legacy::LegacyShipmentOrder>) -> i32 {
    match shipment_order {
        Some(so) if shipment_state::is_known_status(so.status) => so.status,
        Some(_) => shipment_state::CONFIRMED,
        None => {
            if shipment_state::is_known_status(quotation_status) {
                quotation_status
            } else {
                shipment_state::CONFIRMED
            }
        }
    }
}

fn party_from_flat(name: Option<&str>, address: Option<&str>) -> Party {
    Party {
        name: name.map(str::to_string),
        address: address.map(str::to_string),
        contact_name: None,
        contact_email: None,
        contact_phone: None,
    }
}

/// Priority order, mirroring the legacy assembly: (1) the quotation's own
/// `parties` JSON if any of its three slots are populated, (2) the
/// shipment order's structured shipper/consignee/notify_party, (3) the
/// shipment order's flat shipper/consignee name+address fields, (4) the
/// quotation's own flat fields. First match wins outright; there is no
/// field-by-field merge across tiers.
fn build_parties(bundle: &LegacyBundle) -> Parties {
    if let Some(parties) = bundle.quotation.parties.as_ref().map(|j| &j.0) {
        if !parties.shipper.is_empty() || !parties.consignee.is_empty() || !parties.notify_party.is_empty() {
            return parties.clone();
        }
    }

    if let Some(so) = &bundle.shipment_order {
        if so.shipper.is_some() || so.consignee.is_some() {
            return Parties {
                shipper: so.shipper.clone().map(|j| j.0).unwrap_or_default(),
                consignee: so.consignee.clone().map(|j| j.0).unwrap_or_default(),
                notify_party: so.notify_party.clone().map(|j| j.0).unwrap_or_default(),
            };
        }
    }

    // ShipmentOrder in this schema only carries structured party objects,
    // no flat name/address columns — priority 3 of the original migration
    // collapses into priority 2 here, so it's skipped.

    let q = &bundle.quotation;
    if q.shipper_name.is_some() || q.consignee_name.is_some() {
        return Parties {
            shipper: party_from_flat(q.shipper_name.as_deref(), q.shipper_address.as_deref()),
            consignee: party_from_flat(q.consignee_name.as_deref(), q.consignee_address.as_deref()),
            notify_party: Party::default(),
        };
    }

    Parties::default()
}

fn parse_status_history(raw: &serde_json::Value) -> Vec<StatusHistoryEntry> {
    let entries: Vec<LegacyStatusEntry> = serde_json::from_value(raw.clone()).unwrap_or_default();
    entries
        .into_iter()
        .map(|e| StatusHistoryEntry {
            status: e.status,
            label: e.label,
            status_label: None,
            timestamp: e.timestamp,
            changed_by: e.changed_by.unwrap_or_else(|| "legacy-migration".to_string()),
            note: e.note,
            reverted: false,
            reverted_from: None,
        })
        .collect()
}

fn parse_tasks(raw: &serde_json::Value, now: DateTime<Utc>) -> Vec<Task> {
    let entries: Vec<serde_json::Value> = match raw {
        serde_json::Value::Array(items) => items.clone(),
        _ => Vec::new(),
    };
    entries
        .into_iter()
        .filter_map(|entry| shipment_rules::migrate_task_on_read(entry, now))
        .collect()
}

pub fn assemble(bundle: &LegacyBundle, now: DateTime<Utc>) -> AssembledShipment {
    let order_type = derive_order_type(bundle.freight.as_ref());
    let status = derive_status(bundle.quotation.status, bundle.shipment_order.as_ref());
    let parties = build_parties(bundle);

    // OR-merge per the original migration's inline step: a record counts as
    // invoiced if *either* source says so.
    let issued_invoice = bundle.quotation.issued_invoice
        || bundle
            .shipment_order
            .as_ref()
            .map(|so| so.issued_invoice)
            .unwrap_or(false);

    let company_id = bundle
        .shipment_order
        .as_ref()
        .and_then(|so| so.company_id.clone())
        .or_else(|| bundle.quotation.company_id.clone())
        .unwrap_or_default();

    let transaction_type = bundle
        .quotation
        .transaction_type
        .as_deref()
        .and_then(|s| s.to_uppercase().parse::<TransactionType>().ok())
        .unwrap_or(TransactionType::Export);

    let (origin_port, dest_port) = bundle
        .shipment_order
        .as_ref()
        .map(|so| {
            (
                so.origin_port_un_code.clone(),
                so.destination_port_un_code.clone(),
            )
        })
        .unwrap_or((None, None));

    let status_history = parse_status_history(&bundle.quotation.status_history);
    let workflow_tasks = bundle
        .workflow
        .as_ref()
        .map(|wf| parse_tasks(&wf.tasks, now))
        .unwrap_or_default();

    AssembledShipment {
        order_type,
        transaction_type,
        incoterm_code: bundle.quotation.incoterm_code.clone().unwrap_or_default(),
        status,
        issued_invoice,
        company_id,
        origin_port,
        dest_port,
        parties,
        status_history,
        workflow_tasks,
        created_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::{LegacyFreight, LegacyQuotation, LegacyShipmentOrder};

    fn base_quotation() -> LegacyQuotation {
        LegacyQuotation {
            id: "AFCQ-000123".to_string(),
            data_version: 1,
            company_id: Some("acme".to_string()),
            transaction_type: Some("EXPORT".to_string()),
            incoterm_code: Some("FOB".to_string()),
            status: 0,
            issued_invoice: false,
            status_history: serde_json::json!([]),
            bl_document: None,
            cargo_ready_date: None,
            etd: None,
            eta: None,
            parties: None,
            shipper_name: None,
            shipper_address: None,
            consignee_name: None,
            consignee_address: None,
            trash: false,
            superseded: false,
        }
    }

    #[test]
    fn air_freight_wins_over_container_load() {
        let freight = LegacyFreight {
            quotation_id: "AFCQ-000123".to_string(),
            freight_type: Some("air".to_string()),
            container_load: Some("fcl".to_string()),
            ..Default::default()
        };
        assert_eq!(derive_order_type(Some(&freight)), OrderType::Air);
    }

    #[test]
    fn missing_container_load_defaults_to_lcl() {
        assert_eq!(derive_order_type(None), OrderType::SeaLcl);
    }

    #[test]
    fn issued_invoice_is_or_merged_across_sources() {
        let mut quotation = base_quotation();
        quotation.issued_invoice = false;
        let bundle = LegacyBundle {
            quotation,
            freight: None,
            shipment_order: Some(LegacyShipmentOrder {
                quotation_id: "AFCQ-000123".to_string(),
                company_id: Some("acme".to_string()),
                status: 0,
                issued_invoice: true,
                shipper: None,
                consignee: None,
                notify_party: None,
                origin_port_un_code: None,
                destination_port_un_code: None,
                vessel_name: None,
                voyage_number: None,
                booking_reference: None,
                carrier: None,
            }),
            workflow: None,
        };
        let assembled = assemble(&bundle, Utc::now());
        assert!(assembled.issued_invoice);
    }

    #[test]
    fn flat_quotation_fields_are_last_resort_parties() {
        let mut quotation = base_quotation();
        quotation.shipper_name = Some("Acme Exports".to_string());
        quotation.shipper_address = Some("1 Dock Rd".to_string());
        let bundle = LegacyBundle {
            quotation,
            freight: None,
            shipment_order: None,
            workflow: None,
        };
        let parties = build_parties(&bundle);
        assert_eq!(parties.shipper.name.as_deref(), Some("Acme Exports"));
        assert!(parties.consignee.is_empty());
    }
}
