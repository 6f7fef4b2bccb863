use shipment_models::{TaskType, TransactionType};

use TaskType::*;

/// Canonical `(incoterm, transaction_type) -> task types` matrix. Shipped
/// as data, not computed, per the glossary's "Task matrix (canonical)"
/// entry. Every incoterm in [`INCOTERMS`] has both an EXPORT and IMPORT
/// row, even when one of them is the empty set (no AF-side obligation).
///
/// Ported from the legacy `_INCOTERM_RULES` table, with `DAT` filled in
/// to close the gap the legacy table left open (see `DESIGN.md`): `DAT`
/// groups with `CFR`/`CIF`/`CNF`/`CPT`/`CIP`, matching the shared
/// `(1, 5)`/`(3, 7)` process-level range the legacy `INCOTERM_LEVELS`
/// table already assigned it.
pub const INCOTERMS: &[&str] = &[
    "EXW", "FCA", "FOB", "CFR", "CIF", "CNF", "CPT", "CIP", "DAP", "DAT", "DPU", "DDP",
];

/// Task types for a pair, **excluding** the POL/POD milestone pair that
/// every non-empty, non-domestic row carries in addition to whatever is
/// listed here (see [`task_types_for`]).
fn responsibility_tasks(incoterm: &str, transaction_type: TransactionType) -> &'static [TaskType] {
    use TransactionType::*;

    match (incoterm, transaction_type) {
        ("EXW", Export) => &[],
        ("EXW", Import) => &[OriginHaulage, FreightBooking, ExportClearance, ImportClearance, DestinationHaulage],
        ("FCA", Export) => &[FreightBooking, ExportClearance],
        ("FCA", Import) => &[OriginHaulage, FreightBooking, ExportClearance, ImportClearance, DestinationHaulage],
        ("FOB", Export) => &[OriginHaulage, FreightBooking, ExportClearance],
        ("FOB", Import) => &[FreightBooking, ImportClearance, DestinationHaulage],
        ("CFR", Export) | ("CIF", Export) | ("CNF", Export) | ("CPT", Export)
        | ("CIP", Export) | ("DAT", Export) => &[OriginHaulage, FreightBooking, ExportClearance],
        ("CFR", Import) | ("CIF", Import) | ("CNF", Import) | ("CPT", Import)
        | ("CIP", Import) | ("DAT", Import) => &[ImportClearance, DestinationHaulage],
        ("DAP", Export) | ("DPU", Export) | ("DDP", Export) => {
            &[OriginHaulage, FreightBooking, ExportClearance, ImportClearance, DestinationHaulage]
        }
        ("DAP", Import) | ("DPU", Import) | ("DDP", Import) => &[ImportClearance, DestinationHaulage],
        // DOMESTIC transactions and any incoterm not named above carry no
        // AF-side freight obligations in this matrix.
        _ => &[],
    }
}

/// Full canonical task-type sequence for a pair, in leg order. Empty when
/// the pair is unknown to the matrix (EXW export included — it legitimately
/// carries no AF-side task, responsibility or milestone).
pub fn task_types_for(incoterm: &str, transaction_type: TransactionType) -> Vec<TaskType> {
    let resp = responsibility_tasks(incoterm, transaction_type);
    if resp.is_empty() && !INCOTERMS.contains(&incoterm) {
        return Vec::new();
    }
    if matches!(transaction_type, TransactionType::Domestic) {
        return Vec::new();
    }

    let mut before = Vec::new();
    let mut after = Vec::new();
    for &t in resp {
        if t.leg_level() < TaskType::Pol.leg_level() {
            before.push(t);
        } else {
            after.push(t);
        }
    }
    before.push(TaskType::Pol);
    before.push(TaskType::Pod);
    before.extend(after);
    before
}
