use std::sync::Arc;

use jsonwebtoken::{DecodingKey, Validation};
use shipment_bl::BlExtractor;
use shipment_store::Store;

use crate::objects::ObjectStore;

/// Shared application state, handed to every handler through axum's
/// `State` extractor.
pub struct AppState {
    pub store: Store,
    pub jwt_key: DecodingKey,
    pub jwt_validation: Validation,
    pub extractor: Arc<dyn BlExtractor>,
    pub objects: Arc<dyn ObjectStore>,
    /// `development` unlocks hard delete.
    pub environment: String,
}

impl AppState {
    pub fn allows_hard_delete(&self) -> bool {
        self.environment == "development"
    }
}

pub type SharedState = Arc<AppState>;
