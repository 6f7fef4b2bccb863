use shipment_models::{Company, Port, PortTerminal};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

#[derive(FromRow)]
struct PortRow {
    un_code: String,
    name: String,
    country: Option<String>,
    country_code: Option<String>,
    port_type: String,
    terminals: Json<Vec<PortTerminal>>,
}

impl From<PortRow> for Port {
    fn from(row: PortRow) -> Self {
        Port {
            un_code: row.un_code,
            name: row.name,
            country: row.country,
            country_code: row.country_code,
            port_type: row.port_type,
            terminals: row.terminals.0,
        }
    }
}

/// Full ports catalog, backing the 10-minute TTL cache the BL pipeline
/// reads through.
pub async fn list_ports(pool: &PgPool) -> Result<Vec<Port>, sqlx::Error> {
    let rows: Vec<PortRow> = sqlx::query_as(
        "SELECT un_code, name, country, country_code, port_type, terminals FROM ports",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Port::from).collect())
}

/// Non-trashed companies, backing the 5-minute TTL cache the BL pipeline's
/// fuzzy matcher scans.
pub async fn list_companies(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, short_name, account_type, email, phone, approved, \
         has_platform_access, trash, created_at, updated_at FROM companies WHERE trash = FALSE",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_company(pool: &PgPool, id: &str) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, short_name, account_type, email, phone, approved, \
         has_platform_access, trash, created_at, updated_at FROM companies WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
