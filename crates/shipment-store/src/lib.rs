//! Postgres persistence for shipments, their workflows, files, and
//! reference data. Pairs the pure `shipment-rules`/`shipment-state`/
//! `shipment-workflow` crates with `sqlx`, translating their decisions
//! into transactional row writes.

pub mod cache;
pub mod error;
pub mod repo;
pub mod row;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use cache::{CompanyCache, PortsCache};
pub use error::StoreError;
pub use row::ShipmentStats;

/// Connects a bounded pool against `database_url`, matching the pool
/// sizing knobs the rest of the fleet exposes through its own startup
/// config.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Owns the pool plus the two process-local reference-data caches.
/// Cheap to clone: `PgPool` and the caches are themselves
/// reference-counted/lock-guarded internally, but `Store` itself holds
/// them directly since one instance is expected per process.
pub struct Store {
    pool: PgPool,
    ports: PortsCache,
    companies: CompanyCache,
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            ports: PortsCache::new(),
            companies: CompanyCache::new(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ports(&self) -> Result<Vec<shipment_models::Port>, sqlx::Error> {
        self.ports.get(&self.pool).await
    }

    pub async fn companies(&self) -> Result<Vec<shipment_models::Company>, sqlx::Error> {
        self.companies.get(&self.pool).await
    }
}
