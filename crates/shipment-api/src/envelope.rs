//! `{status, data, msg}` response envelope. Every handler returns
//! `Result<Json<T>, ApiError>`; this module wraps the success side,
//! `error.rs` wraps the failure side.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub status: &'static str,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

/// Wraps `data` as a `200 OK` success envelope.
pub struct Ok<T>(pub T);

impl<T: Serialize> IntoResponse for Ok<T> {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            axum::Json(Envelope {
                status: "OK",
                data: self.0,
                msg: None,
            }),
        )
            .into_response()
    }
}

/// Wraps `data` with an explicit status code, for the one shape that
/// isn't a plain `200`.
pub struct Created<T>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (
            StatusCode::CREATED,
            axum::Json(Envelope {
                status: "OK",
                data: self.0,
                msg: None,
            }),
        )
            .into_response()
    }
}
