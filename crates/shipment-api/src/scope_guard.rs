//! Shared "is this caller allowed to see this shipment" check. AFC scope
//! misses surface as 404, not 403 — a caller outside a shipment's
//! company must not learn the shipment exists at all.

use shipment_auth::{can_access_company, Claims};
use shipment_models::Shipment;

use crate::error::ApiError;

pub fn guard(claims: &Claims, shipment: &Shipment) -> Result<(), ApiError> {
    if can_access_company(claims, &shipment.company_id) {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!(
            "shipment {} not found",
            shipment.id
        )))
    }
}
