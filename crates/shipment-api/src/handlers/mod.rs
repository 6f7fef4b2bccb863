pub mod files;
pub mod route_nodes;
pub mod shipments;
pub mod tasks;

use shipment_models::ShipmentId;

use crate::error::ApiError;

pub(crate) fn parse_id(raw: &str) -> Result<ShipmentId, ApiError> {
    ShipmentId::parse(raw).map_err(|e| ApiError::Validation(e.to_string()))
}
