//! Bill-of-lading ingestion: opaque document bytes in, a normalized
//! draft payload plus port/company match candidates out. Creation is a
//! separate, explicit call that replays this result into the shipment
//! store's create-from-BL flow — nothing in here writes to the
//! database.

pub mod company_match;
pub mod derive;
pub mod extractor;
pub mod media;
pub mod port_match;

use serde::Serialize;
use shipment_models::{Company, OrderType, Port};

pub use extractor::{BlExtractor, ExtractError, ExtractedBl};
pub use media::{detect as detect_media_type, MediaType};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedBl {
    pub parsed: ExtractedBl,
    pub raw_extraction: serde_json::Value,
    pub order_type: OrderType,
    pub origin_un_code: Option<String>,
    pub origin_parsed_label: Option<String>,
    pub destination_un_code: Option<String>,
    pub destination_parsed_label: Option<String>,
    pub initial_status: i32,
    pub company_matches: Vec<company_match::CompanyMatch>,
}

/// Runs the full ingestion pipeline over bytes already fetched from the
/// request: extraction, fence-tolerant parsing, field derivation, and
/// port/company matching against the caller-supplied catalogs (the
/// TTL-cached reads `shipment-store` exposes).
pub async fn parse_bl(
    extractor: &dyn BlExtractor,
    bytes: &[u8],
    content_type: Option<&str>,
    filename: Option<&str>,
    ports: &[Port],
    companies: &[Company],
) -> Result<ParsedBl, ExtractError> {
    let media_type = detect_media_type(content_type, filename);
    let raw = extractor.extract(bytes, media_type).await?;
    let (parsed, raw_extraction) = extractor::parse_response(&raw)?;

    let origin_label = parsed.port_of_loading.clone().unwrap_or_default();
    let destination_label = parsed.port_of_discharge.clone().unwrap_or_default();
    let origin_un_code = port_match::match_port(origin_label.trim(), ports);
    let destination_un_code = port_match::match_port(destination_label.trim(), ports);

    let order_type = derive::order_type(&parsed);
    let initial_status = derive::initial_status(parsed.on_board_date.as_deref());
    let company_matches =
        company_match::match_company(parsed.consignee_name.as_deref().unwrap_or(""), companies);

    Ok(ParsedBl {
        parsed,
        raw_extraction,
        order_type,
        origin_un_code,
        origin_parsed_label: (!origin_label.trim().is_empty()).then(|| origin_label.trim().to_string()),
        destination_un_code,
        destination_parsed_label: (!destination_label.trim().is_empty())
            .then(|| destination_label.trim().to_string()),
        initial_status,
        company_matches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;

    struct FakeExtractor(&'static str);

    #[async_trait]
    impl BlExtractor for FakeExtractor {
        async fn extract(&self, _bytes: &[u8], _media_type: MediaType) -> Result<String, ExtractError> {
            Ok(self.0.to_string())
        }
    }

    fn ports() -> Vec<Port> {
        vec![
            Port {
                un_code: "MYPKG".into(),
                name: "Port Klang".into(),
                country: None,
                country_code: None,
                port_type: "SEA".into(),
                terminals: vec![],
            },
            Port {
                un_code: "SGSIN".into(),
                name: "Singapore".into(),
                country: None,
                country_code: None,
                port_type: "SEA".into(),
                terminals: vec![],
            },
        ]
    }

    fn companies() -> Vec<Company> {
        vec![Company {
            id: "co-1".into(),
            name: "Acme Logistics Sdn Bhd".into(),
            short_name: None,
            account_type: "AFC".into(),
            email: None,
            phone: None,
            approved: true,
            has_platform_access: true,
            trash: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }]
    }

    #[tokio::test]
    async fn s4_bl_ingest_end_to_end() {
        let raw = r#"{
            "port_of_loading": "PORT KELANG",
            "port_of_discharge": "SINGAPORE",
            "on_board_date": "2099-01-01",
            "consignee_name": "Acme Logistics Sdn Bhd",
            "containers": [{"container_number": "MSCU1234567"}]
        }"#;
        let extractor = FakeExtractor(raw);
        let result = parse_bl(&extractor, b"", Some("application/pdf"), None, &ports(), &companies())
            .await
            .unwrap();

        assert_eq!(result.origin_un_code.as_deref(), Some("MYPKG"));
        assert_eq!(result.destination_un_code.as_deref(), Some("SGSIN"));
        assert_eq!(result.order_type, OrderType::SeaFcl);
        assert_eq!(result.initial_status, 3002);
        assert!(result.company_matches[0].score >= 0.5);
    }
}
