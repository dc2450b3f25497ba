use anyhow::Result;
use gamer_profile_store::{command_line, config::Config, lifecycle::TableLifecycleManager, logging};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;

    let config = Config::from_env()?;
    let manager = TableLifecycleManager::new(config.connect_backend().await);

    command_line::delete_table(&manager, &config).await?;
    println!("Table deleted successfully!");
    Ok(())
}
