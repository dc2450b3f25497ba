use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Installs the process-wide subscriber. `LOG_LEVEL` overrides the INFO default.
pub fn init_logging() -> Result<()> {
    let level = match env::var("LOG_LEVEL") {
        Ok(value) => value
            .parse::<Level>()
            .with_context(|| format!("invalid LOG_LEVEL '{value}'"))?,
        Err(_) => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_line_number(true)
        .with_file(true)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
