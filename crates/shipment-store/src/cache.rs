//! Two process-local, best-effort TTL caches: the ports catalog (10
//! minutes) and the company-name map (5 minutes). Writes to companies do
//! not invalidate the cache; staleness is bounded purely by TTL. Neither
//! cache requires cross-instance coordination.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use shipment_models::{Company, Port};
use sqlx::PgPool;

use crate::repo::reference;

struct Slot<T> {
    value: T,
    fetched_at: Instant,
}

pub struct TtlCache<T> {
    ttl: Duration,
    slot: Mutex<Option<Slot<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached value if still fresh, otherwise `None`.
    fn fresh(&self) -> Option<T> {
        let guard = self.slot.lock().expect("cache lock poisoned");
        guard.as_ref().and_then(|slot| {
            if slot.fetched_at.elapsed() < self.ttl {
                Some(slot.value.clone())
            } else {
                None
            }
        })
    }

    fn store(&self, value: T) {
        let mut guard = self.slot.lock().expect("cache lock poisoned");
        *guard = Some(Slot {
            value,
            fetched_at: Instant::now(),
        });
    }
}

pub struct PortsCache(TtlCache<Vec<Port>>);

impl PortsCache {
    pub fn new() -> Self {
        Self(TtlCache::new(Duration::from_secs(10 * 60)))
    }

    pub async fn get(&self, pool: &PgPool) -> Result<Vec<Port>, sqlx::Error> {
        if let Some(ports) = self.0.fresh() {
            return Ok(ports);
        }
        let ports = reference::list_ports(pool).await?;
        self.0.store(ports.clone());
        Ok(ports)
    }
}

impl Default for PortsCache {
    fn default() -> Self {
        Self::new()
    }
}

pub struct CompanyCache(TtlCache<Vec<Company>>);

impl CompanyCache {
    pub fn new() -> Self {
        Self(TtlCache::new(Duration::from_secs(5 * 60)))
    }

    pub async fn get(&self, pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
        if let Some(companies) = self.0.fresh() {
            return Ok(companies);
        }
        let companies = reference::list_companies(pool).await?;
        self.0.store(companies.clone());
        Ok(companies)
    }
}

impl Default for CompanyCache {
    fn default() -> Self {
        Self::new()
    }
}
