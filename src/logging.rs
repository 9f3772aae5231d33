use anyhow::Result;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Log to stderr; stdout carries the menu listing. `RUST_LOG` overrides the level.
pub fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    debug!("logging initialized");
    Ok(())
}
