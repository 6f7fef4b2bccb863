//! Object storage is an external collaborator: opaque blob put/get plus
//! time-limited signed URL issuance. `ObjectStore` defines the seam;
//! `LocalObjectStore` is a filesystem-backed stand-in for development.

use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ObjectStoreError {
    #[error("object storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes `bytes` under `key` (the opaque storage key recorded on
    /// `shipment_files.file_location`) and returns that same key.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, ObjectStoreError>;

    /// Issues a time-limited signed URL for `key`, valid for
    /// `expires_in_secs` seconds.
    async fn signed_url(
        &self,
        key: &str,
        expires_in_secs: u64,
    ) -> Result<String, ObjectStoreError>;
}

#[derive(Debug)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, ObjectStoreError> {
        let dest = self.root.join(key);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, bytes).await?;
        Ok(key.to_string())
    }

    async fn signed_url(
        &self,
        key: &str,
        expires_in_secs: u64,
    ) -> Result<String, ObjectStoreError> {
        Ok(format!(
            "{}/{}?expires_in={}",
            self.public_base.trim_end_matches('/'),
            key,
            expires_in_secs
        ))
    }
}

/// Builds the opaque storage key for a shipment file upload:
/// `company/{company_id}/shipments/{shipment_id}/{filename}`.
pub fn upload_key(company_id: &str, shipment_id: &str, file_name: &str) -> String {
    format!("company/{company_id}/shipments/{shipment_id}/{file_name}")
}
