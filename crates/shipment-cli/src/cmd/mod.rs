use std::path::PathBuf;

use tokio::runtime::Runtime;

pub mod migrate;
pub mod serve;
pub mod setup;

#[derive(clap::Args, Debug)]
pub struct ConfigArgs {
    /// Base configuration file. An `{APP_ENV}.toml` sitting alongside it
    /// is merged on top when present; `SHIPMENT_`-prefixed env vars win
    /// over both.
    #[clap(short, long = "config", default_value = "config/base.toml")]
    pub config_path: PathBuf,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Runs the shipment lifecycle API server.
    Serve(serve::Args),
    /// Migrates legacy (V1) quotations into canonical shipments.
    Migrate(migrate::Args),
    /// Creates the database (if needed) and runs pending schema migrations.
    Setup(setup::Args),
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Serve(args) => serve::run(args),
        Command::Migrate(args) => migrate::run(args),
        Command::Setup(args) => setup::run(args),
    }
}

pub fn async_runtime() -> std::io::Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread().enable_all().build()
}
