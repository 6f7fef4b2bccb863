//! HTTP surface for the shipment lifecycle engine (C6): axum handlers
//! wired against the lower crates, speaking the `{status, data, msg}`
//! envelope over `/api/v2`.

pub mod auth;
pub mod dto;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod objects;
pub mod routes;
pub mod scope_guard;
pub mod state;

pub use routes::build_router;
pub use state::{AppState, SharedState};
