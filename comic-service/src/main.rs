use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use comic_service::{
    config::Config,
    handlers,
    observability::{init_tracing, shutdown_tracing},
    repository::SeedData,
    server::Server,
    state::AppState,
};

/// comic-service - comic collection backend
#[derive(Parser)]
#[command(name = "comic-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Load configuration from this file instead of the default search path
    #[arg(short, long, env = "COMIC_CONFIG")]
    config: Option<PathBuf>,

    /// JSON file with characters, series and comics to load at startup
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Override the configured port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load().context("loading config")?,
    };
    if let Some(port) = args.port {
        config.service.port = port;
    }

    init_tracing(&config)?;

    let mut state = AppState::builder().config(config.clone());
    if let Some(path) = &args.seed {
        let seed = SeedData::from_path(path)
            .await
            .with_context(|| format!("reading seed data from {}", path.display()))?;
        state = state.seed(seed);
    }
    let state = state.build().await.context("seeding store")?;

    Server::new(config).serve(handlers::router(state)).await?;

    shutdown_tracing();
    Ok(())
}
