use anyhow::Result;
use gamer_profile_store::{command_line, config::Config, lifecycle::TableLifecycleManager, logging};
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;

    let config = Config::from_env()?;
    let manager = TableLifecycleManager::new(config.connect_backend().await);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, no longer waiting for the table");
            on_interrupt.cancel();
        }
    });

    command_line::create_table(&manager, &config, &cancel).await?;
    println!("Table created successfully!");
    Ok(())
}
