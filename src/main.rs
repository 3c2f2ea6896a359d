use std::path::Path;

use anyhow::Result;
use clap::Parser;
use setlist::{
    backend::Backend,
    cli::{Cli, Commands},
    commands,
    composer::WorkoutComposer,
    types::{Config, OutputFmt},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let fmt = OutputFmt::from_flag(cli.json);

    let config_path = Config::default_path()?;

    match cli.cmd {
        Commands::Config(cmd) => commands::config::handle(cmd, &config_path).await?,
        Commands::Compose { name } => {
            let (cfg, backend) = open(&config_path).await?;
            commands::compose::handle(name, backend, cfg.owner_id(), cfg.composer_options()?, fmt).await?
        }
        Commands::Import { file } => {
            let (cfg, backend) = open(&config_path).await?;
            let composer = WorkoutComposer::with_options(backend, cfg.owner_id(), cfg.composer_options()?);
            commands::import::handle(&file, composer, fmt).await?
        }
        Commands::Workout(cmd) => {
            let (_, backend) = open(&config_path).await?;
            commands::workout::handle(cmd, &backend, fmt).await?
        }
        Commands::Exercise(cmd) => {
            let (_, backend) = open(&config_path).await?;
            commands::exercise::handle(cmd, &backend, fmt).await?
        }
    }

    Ok(())
}

async fn open(config_path: &Path) -> Result<(Config, Backend)> {
    let cfg = Config::load(config_path)?;
    let backend = commands::connect(&cfg).await?;
    Ok((cfg, backend))
}

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
