use thiserror::Error;

/// Typed failures surfaced by the store layer. `shipment-api` maps these
/// onto the envelope/HTTP-status taxonomy; nothing in here knows about
/// HTTP.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("shipment {0} not found")]
    ShipmentNotFound(String),
    #[error("file {0} not found")]
    FileNotFound(i64),
    #[error("company {0} not found")]
    CompanyNotFound(String),
    #[error("route node with sequence {0} not found")]
    RouteNodeNotFound(i16),
    #[error("invalid route node set: {0}")]
    InvalidRouteNodeSet(#[from] shipment_models::InvalidRouteNodeSet),
    #[error("shipment {0} is already soft-deleted")]
    AlreadyDeleted(String),
    #[error("hard delete is disabled outside non-production environments")]
    HardDeleteDisabled,
    #[error("lifecycle transition rejected: {0}")]
    TransitionRejected(#[from] shipment_state::RejectReason),
    #[error("workflow error: {0}")]
    Workflow(#[from] shipment_workflow::WorkflowError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
