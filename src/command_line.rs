//! The two operator utilities behind the `create-table` and `delete-table` binaries.
//!
//! Both take no arguments: everything comes from [`Config`]. Returning `Err` makes the
//! binary exit non-zero with the error printed.

use anyhow::{anyhow, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{Error, ErrorKind};
use crate::lifecycle::{EnsureOutcome, TableLifecycleManager};

/// Creates the gamer profile table if needed and waits for it to become active.
///
/// An existing table counts as success.
///
/// # Arguments
///
/// * `manager` - Lifecycle manager bound to the backend to provision
/// * `config` - Table name, capacity and wait settings
/// * `cancel` - Aborts the wait, e.g. on Ctrl-C
///
/// # Returns
///
/// Returns `Ok(())` once the table is active, or an error describing what failed.
pub async fn create_table(
    manager: &TableLifecycleManager,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<()> {
    let table = config.table_descriptor();
    info!(
        table = table.name(),
        read = table.capacity().read,
        write = table.capacity().write,
        "Attempting to create table"
    );

    match manager.ensure_table(&table).await {
        Ok(EnsureOutcome::Created) => info!("Waiting for table creation"),
        Ok(EnsureOutcome::AlreadyExists) => {
            info!("Table '{}' already exists", table.name());
        }
        Err(e) => {
            error!("Failed to create table: {e}");
            return Err(describe(e, table.name()));
        }
    }

    manager
        .await_ready(
            table.name(),
            config.poll_interval,
            config.ready_timeout,
            cancel,
        )
        .await
        .map_err(|e| describe(e, table.name()))?;

    info!("Table '{}' is ready", table.name());
    Ok(())
}

/// Deletes the gamer profile table. A missing table is an error.
pub async fn delete_table(manager: &TableLifecycleManager, config: &Config) -> Result<()> {
    info!(table = %config.table_name, "Attempting to delete table");
    manager
        .delete_table(&config.table_name)
        .await
        .map_err(|e| describe(e, &config.table_name))?;
    info!("Table '{}' deleted", config.table_name);
    Ok(())
}

/// Operator-facing wording for a lifecycle failure.
fn describe(err: Error, table_name: &str) -> anyhow::Error {
    match err.kind() {
        Some(ErrorKind::NotFound) => anyhow!("table '{table_name}' not found: {err}"),
        Some(ErrorKind::AlreadyExists) => anyhow!("table '{table_name}' is in use: {err}"),
        Some(ErrorKind::ConnectivityFailure) => anyhow!(
            "could not reach the store; check your network connection or AWS endpoint configuration: {err}"
        ),
        _ => anyhow!(err),
    }
}
