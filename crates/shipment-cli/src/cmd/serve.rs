use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use shipment_api::objects::LocalObjectStore;
use shipment_api::{AppState, SharedState};
use shipment_store::Store;
use sqlx::postgres::PgPoolOptions;

use crate::cmd::{async_runtime, ConfigArgs};
use crate::config::{self, Settings};
use crate::extractor::HttpBlExtractor;

#[derive(clap::Args, Debug)]
pub struct Args {
    #[clap(flatten)]
    config: ConfigArgs,
}

/// Runs the shipment lifecycle API server.
pub fn run(args: Args) -> anyhow::Result<()> {
    config::load_settings(args.config.config_path)?;
    let runtime = async_runtime()?;
    runtime.block_on(serve())
}

async fn serve() -> anyhow::Result<()> {
    let settings = config::settings();
    let listener = tokio::net::TcpListener::bind(settings.application.address()).await?;
    let state = build_state(settings).await?;
    let app = shipment_api::build_router(state);

    tracing::info!(addr = %settings.application.address(), "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn build_state(settings: &Settings) -> anyhow::Result<SharedState> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url())
        .await?;

    let jwt_key_pem = tokio::fs::read(&settings.auth.jwt_public_key_path).await?;
    let jwt_key = DecodingKey::from_rsa_pem(&jwt_key_pem)?;
    let mut jwt_validation = Validation::new(Algorithm::RS256);
    jwt_validation.set_audience(&[&settings.auth.jwt_audience]);
    jwt_validation.set_issuer(&[&settings.auth.jwt_issuer]);

    Ok(Arc::new(AppState {
        store: Store::new(pool),
        jwt_key,
        jwt_validation,
        extractor: Arc::new(HttpBlExtractor::new(&settings.bl_extractor)),
        objects: Arc::new(LocalObjectStore::new(
            settings.object_storage.root.clone(),
            settings.object_storage.public_base_url.clone(),
        )),
        environment: settings.environment.clone(),
    }))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("caught shutdown signal, stopping"),
        Err(err) => tracing::error!(?err, "error subscribing to shutdown signal"),
    }
}
