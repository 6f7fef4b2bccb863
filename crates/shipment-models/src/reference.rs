use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Customer/client company. Immutable from the lifecycle engine's
/// perspective except through its own CRUD surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub short_name: Option<String>,
    pub account_type: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub approved: bool,
    pub has_platform_access: bool,
    pub trash: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortTerminal {
    pub name: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub un_code: String,
    pub name: String,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub port_type: String,
    #[serde(default)]
    pub terminals: Vec<PortTerminal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTag {
    pub id: String,
    pub label: String,
    pub color: Option<String>,
}

/// A file attached to a shipment. Hard-deleting the owning shipment
/// cascades to these rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ShipmentFile {
    pub file_id: i64,
    pub shipment_id: String,
    pub company_id: String,
    pub file_name: String,
    pub file_location: String,
    #[serde(default)]
    pub file_tags: Vec<String>,
    pub file_size_kb: Option<f64>,
    pub visibility: bool,
    pub uploaded_by_uid: Option<String>,
    pub uploaded_by_email: Option<String>,
    pub trash: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The database-side half of a caller's identity: role, company scope,
/// and the access-revocation gate, keyed by the verified token's `uid`.
/// Joined with the bearer token's bare claims to produce a fully
/// resolved `Claims` in `shipment-auth`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct UserIam {
    pub uid: String,
    pub email: String,
    pub role: String,
    pub company_id: Option<String>,
    pub valid_access: bool,
    pub name: Option<String>,
}

/// Append-only audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub action: String,
    pub entity_id: Option<String>,
    pub actor_uid: Option<String>,
    pub actor_email: Option<String>,
    pub created_at: DateTime<Utc>,
}
