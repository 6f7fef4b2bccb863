//! Creates the database (if it doesn't exist yet) and runs pending schema
//! migrations. A one-off tool for provisioning a fresh environment.

use sqlx::migrate::MigrateDatabase;
use sqlx::{Connection, PgConnection, Postgres};

use crate::cmd::{async_runtime, ConfigArgs};
use crate::config;

#[derive(clap::Args, Debug)]
pub struct Args {
    #[clap(flatten)]
    config: ConfigArgs,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let settings = config::load_settings(args.config.config_path)?;
    let runtime = async_runtime()?;
    runtime.block_on(setup_database(&settings.database.url()))
}

async fn setup_database(url: &str) -> anyhow::Result<()> {
    if !Postgres::database_exists(url).await? {
        Postgres::create_database(url).await?;
    }

    let mut conn = PgConnection::connect(url).await?;

    // Migration source is embedded at compile time, so this binary can
    // migrate any database it's pointed at without a local checkout.
    sqlx::migrate!("../../migrations").run(&mut conn).await?;

    Ok(())
}
