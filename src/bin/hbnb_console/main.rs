mod app;
mod context;
mod formatter;
mod repl;

use anyhow::Result;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    let cli = app::Cli::parse();

    // Initialiser le logger (RUST_LOG a priorité sur -v)
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level()),
    )
    .init();

    info!("Starting HBnB console");

    // Exécuter l'application
    let result = app::run(cli);

    info!("HBnB console stopped");

    result
}
