//! The one concrete `BlExtractor`: posts the document to whatever
//! document-understanding endpoint is configured and returns its raw text
//! response untouched. The backend is an opaque "document -> JSON"
//! service; this is just the wire to it.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use shipment_bl::extractor::{BlExtractor, ExtractError, EXTRACTION_PROMPT};
use shipment_bl::media::MediaType;

use crate::config::BlExtractorSettings;

pub struct HttpBlExtractor {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpBlExtractor {
    pub fn new(settings: &BlExtractorSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
        }
    }
}

#[async_trait]
impl BlExtractor for HttpBlExtractor {
    async fn extract(&self, bytes: &[u8], media_type: MediaType) -> Result<String, ExtractError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "prompt": EXTRACTION_PROMPT,
                "media_type": media_type.as_mime(),
                "document_base64": BASE64.encode(bytes),
            }))
            .send()
            .await
            .map_err(|e| ExtractError::Backend(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ExtractError::Backend(format!(
                "extractor returned {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| ExtractError::Backend(e.to_string()))
    }
}
