//! The document-understanding boundary. The extractor itself is a
//! black box: no model client lives in this crate. This module only
//! defines the trait callers implement against a real LLM backend, plus
//! the response shape and the fence-tolerant parser.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::media::MediaType;

/// Schema-mandating prompt sent alongside the document bytes. The
/// backend is instructed to return bare JSON; `strip_fences` below
/// tolerates the common ways models ignore that instruction anyway.
pub const EXTRACTION_PROMPT: &str = r#"You are extracting structured data from a bill of lading \
or sea waybill. Return ONLY a JSON object matching this shape, using null for any field not \
present, with no surrounding prose or code fences:

{
  "waybill_number": string | null,
  "booking_number": string | null,
  "carrier": string | null,
  "vessel_name": string | null,
  "voyage_number": string | null,
  "port_of_loading": string | null,
  "port_of_discharge": string | null,
  "on_board_date": string | null,
  "freight_terms": string | null,
  "shipper_name": string | null,
  "shipper_address": string | null,
  "consignee_name": string | null,
  "consignee_address": string | null,
  "notify_party_name": string | null,
  "cargo_description": string | null,
  "total_weight_kg": number | null,
  "total_packages": string | null,
  "delivery_status": string | null,
  "containers": [{
    "container_number": string | null,
    "container_type": string | null,
    "seal_number": string | null,
    "packages": string | null,
    "weight_kg": number | null
  }]
}"#;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("document extraction failed: {0}")]
    Backend(String),
    #[error("extractor returned invalid JSON")]
    InvalidJson(#[from] serde_json::Error),
}

/// One parsed bill-of-lading container row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExtractedContainer {
    pub container_number: Option<String>,
    pub container_type: Option<String>,
    pub seal_number: Option<String>,
    pub packages: Option<String>,
    pub weight_kg: Option<f64>,
}

/// The raw extracted object, shaped after the extraction prompt's
/// schema. Kept distinct from `shipment_models::payloads` types: this is
/// the extractor's vocabulary, not the shipment's.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExtractedBl {
    pub waybill_number: Option<String>,
    pub booking_number: Option<String>,
    pub carrier: Option<String>,
    pub vessel_name: Option<String>,
    pub voyage_number: Option<String>,
    pub port_of_loading: Option<String>,
    pub port_of_discharge: Option<String>,
    pub on_board_date: Option<String>,
    pub freight_terms: Option<String>,
    pub shipper_name: Option<String>,
    pub shipper_address: Option<String>,
    pub consignee_name: Option<String>,
    pub consignee_address: Option<String>,
    pub notify_party_name: Option<String>,
    pub cargo_description: Option<String>,
    pub total_weight_kg: Option<f64>,
    pub total_packages: Option<String>,
    pub delivery_status: Option<String>,
    #[serde(default)]
    pub containers: Vec<ExtractedContainer>,
}

/// Implemented against whatever document-understanding backend is
/// wired up at runtime; this crate never talks to one directly.
#[async_trait]
pub trait BlExtractor: Send + Sync {
    async fn extract(&self, bytes: &[u8], media_type: MediaType) -> Result<String, ExtractError>;
}

/// Strips a leading/trailing ``` fence and a leading `json` language
/// token before JSON parsing, tolerating the common ways a model ignores
/// "no fences" in its instructions.
pub fn strip_fences(raw: &str) -> &str {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("```") {
        s = match rest.split_once('\n') {
            Some((_, tail)) => tail,
            None => rest,
        };
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest.trim_end();
    }
    if let Some(rest) = s.strip_prefix("json") {
        s = rest.trim_start();
    }
    s.trim()
}

/// Strips fences then parses into both the raw `serde_json::Value`
/// (mirrored into `bl_document.raw_extraction` for audit) and the typed
/// `ExtractedBl`.
pub fn parse_response(raw: &str) -> Result<(ExtractedBl, serde_json::Value), ExtractError> {
    let cleaned = strip_fences(raw);
    let value: serde_json::Value = serde_json::from_str(cleaned)?;
    let extracted: ExtractedBl = serde_json::from_value(value.clone())?;
    Ok((extracted, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fence_and_json_token() {
        let raw = "```json\n{\"carrier\": \"Maersk\"}\n```";
        let (parsed, _) = parse_response(raw).unwrap();
        assert_eq!(parsed.carrier.as_deref(), Some("Maersk"));
    }

    #[test]
    fn tolerates_bare_json() {
        let raw = "{\"carrier\": \"CMA CGM\"}";
        let (parsed, _) = parse_response(raw).unwrap();
        assert_eq!(parsed.carrier.as_deref(), Some("CMA CGM"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_response("not json").is_err());
    }
}
