//! Single entry point for the shipment lifecycle engine: serving the API,
//! running the legacy migrator, and provisioning a database all live
//! behind one `clap` subcommand dispatch rather than separate binaries.

mod cmd;
mod config;
mod extractor;
mod logging;

use clap::Parser;

use logging::LogArgs;

#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: cmd::Command,

    #[clap(flatten)]
    log_args: LogArgs,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_logging(&args.log_args);
    cmd::run(args.command)
}
