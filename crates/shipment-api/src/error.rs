//! Maps typed failures from every lower crate onto the HTTP error
//! taxonomy. Lifecycle validation rejections are the one deliberate
//! exception: they carry HTTP 200 with an `ERROR`-shaped envelope,
//! because the front end renders them inline rather than as transport
//! failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use shipment_auth::AuthError;
use shipment_bl::ExtractError;
use shipment_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    /// A rejected lifecycle transition. Not a transport error: see the
    /// module doc comment.
    #[error("{0}")]
    LifecycleRejected(String),
    #[error("{0}")]
    UpstreamFailure(String),
    #[error("{0}")]
    Gone(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status: &'static str,
    msg: String,
    data: Option<()>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, status, msg) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::LifecycleRejected(msg) => (StatusCode::OK, "ERROR", msg),
            ApiError::UpstreamFailure(msg) => (StatusCode::BAD_GATEWAY, "ERROR", msg),
            ApiError::Gone(msg) => (StatusCode::GONE, "ERROR", msg),
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "unhandled internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ERROR",
                    "internal error".to_string(),
                )
            }
        };
        (
            code,
            axum::Json(ErrorBody {
                status,
                msg,
                data: None,
            }),
        )
            .into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ShipmentNotFound(id) => {
                ApiError::NotFound(format!("shipment {id} not found"))
            }
            StoreError::FileNotFound(id) => ApiError::NotFound(format!("file {id} not found")),
            StoreError::CompanyNotFound(id) => {
                ApiError::NotFound(format!("company {id} not found"))
            }
            StoreError::RouteNodeNotFound(seq) => {
                ApiError::NotFound(format!("route node {seq} not found"))
            }
            StoreError::InvalidRouteNodeSet(reason) => ApiError::Validation(reason.to_string()),
            StoreError::AlreadyDeleted(id) => {
                ApiError::Conflict(format!("shipment {id} is already soft-deleted"))
            }
            StoreError::HardDeleteDisabled => ApiError::Forbidden(err.to_string()),
            StoreError::TransitionRejected(reason) => {
                ApiError::LifecycleRejected(reason.to_string())
            }
            StoreError::Workflow(workflow_err) => ApiError::Validation(workflow_err.to_string()),
            StoreError::Database(db_err) => ApiError::Internal(db_err.into()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(_) => ApiError::Forbidden("invalid or expired token".into()),
            AuthError::AccessRevoked => {
                ApiError::Forbidden("user account not found or access revoked".into())
            }
            AuthError::Forbidden => ApiError::Forbidden("insufficient role for this action".into()),
        }
    }
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Backend(msg) => ApiError::UpstreamFailure(msg),
            ExtractError::InvalidJson(e) => {
                ApiError::UpstreamFailure(format!("extractor returned invalid JSON: {e}"))
            }
        }
    }
}
