//! Configuration loading: database connection, object-storage bucket,
//! LLM API key, project identifier, environment tag. Layered
//! `config::Config::builder()` sources: a base file, an
//! environment-specific override, then `SHIPMENT_*` env vars on top.

use std::path::Path;

use once_cell::sync::OnceCell;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub object_storage: ObjectStorageSettings,
    pub bl_extractor: BlExtractorSettings,
    pub auth: AuthSettings,
    pub project_id: String,
    /// `development` unlocks hard delete.
    pub environment: String,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database_name: String,
    pub max_connections: u32,
}

impl DatabaseSettings {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }
}

/// Stands in for a real bucket; the filesystem root backs
/// `shipment_api::objects::LocalObjectStore` the same way `LocalBuildsRoot`
/// stands in for GCS in development.
#[derive(Debug, Deserialize)]
pub struct ObjectStorageSettings {
    pub root: String,
    pub public_base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct BlExtractorSettings {
    pub endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    pub jwt_public_key_path: String,
    pub jwt_audience: String,
    pub jwt_issuer: String,
}

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Loads settings from `path` (a base file) plus an environment-named
/// override sitting alongside it, then `SHIPMENT_`-prefixed env vars.
/// Safe to call more than once; only the first call's path takes effect.
pub fn load_settings(path: impl AsRef<Path>) -> Result<&'static Settings, config::ConfigError> {
    SETTINGS.get_or_try_init(|| build_settings(path.as_ref()))
}

pub fn settings() -> &'static Settings {
    SETTINGS.get().expect("settings loaded before use")
}

fn build_settings(path: &Path) -> Result<Settings, config::ConfigError> {
    let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
    let env_path = path.with_file_name(format!("{app_env}.toml"));

    let config = config::Config::builder()
        .add_source(config::File::from(path).required(true))
        .add_source(config::File::from(env_path).required(false))
        .add_source(config::Environment::with_prefix("SHIPMENT").separator("__"))
        .build()?;

    config.try_deserialize()
}
