use chrono::Utc;
use sqlx::postgres::PgPoolOptions;

use crate::cmd::{async_runtime, ConfigArgs};
use crate::config;

#[derive(clap::Args, Debug)]
pub struct Args {
    #[clap(flatten)]
    config: ConfigArgs,

    /// Write the migrated records. Without this flag the job only reports
    /// the plan it would execute; dry-run is the default.
    #[clap(long)]
    commit: bool,
}

/// Re-keys legacy (`AFCQ-`) quotations into canonical shipments.
pub fn run(args: Args) -> anyhow::Result<()> {
    config::load_settings(args.config.config_path)?;
    let dry_run = !args.commit;
    let runtime = async_runtime()?;
    runtime.block_on(run_migration(dry_run))
}

async fn run_migration(dry_run: bool) -> anyhow::Result<()> {
    let settings = config::settings();
    let pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url())
        .await?;

    let report = shipment_migrate::run(&pool, dry_run, Utc::now()).await?;
    tracing::info!(report = %serde_json::to_string(&report)?, "migration finished");
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.errors.is_empty() {
        anyhow::bail!("{} record(s) failed to migrate", report.errors.len());
    }

    Ok(())
}
