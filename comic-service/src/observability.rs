//! Structured logging setup

use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    error::{Error, Result},
};

/// Build the log filter from `RUST_LOG`, falling back to the configured level
fn env_filter(config: &Config) -> EnvFilter {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    build_filter(from_env.as_deref(), &config.service.log_level)
}

/// First directive that parses wins; `info` otherwise
fn build_filter(from_env: Option<&str>, configured: &str) -> EnvFilter {
    from_env
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(configured).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Install the global JSON subscriber
///
/// # Errors
///
/// Fails when a global subscriber has already been installed.
pub fn init_tracing(config: &Config) -> Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(config))
        .with_current_span(true)
        .try_init()
        .map_err(|e| Error::Tracing(e.to_string()))?;

    tracing::info!(
        environment = %config.service.environment,
        "Tracing initialized for service: {}",
        config.service.name
    );

    Ok(())
}

/// Flush logs before exit
pub fn shutdown_tracing() {
    tracing::info!("Tracing shutdown complete");
}
