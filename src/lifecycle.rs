use std::sync::Arc;
use tokio::time::{sleep, timeout_at, Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::dynamodb::{Backend, TableDescriptor};
use crate::error::{classify, Error, ErrorKind, Result, StoreError};

/// Default interval between describe calls while waiting for a table.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// What [`TableLifecycleManager::ensure_table`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    Created,
    AlreadyExists,
}

/// Declarative table provisioning.
///
/// Creation is idempotent: asking for a table that already exists is a no-op.
/// Deletion is not: deleting a missing table is reported as `NotFound`, so callers
/// learn the table was never there.
pub struct TableLifecycleManager {
    backend: Arc<dyn Backend>,
}

impl TableLifecycleManager {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Issues a create request for `table`. Does not wait for it to become active;
    /// see [`await_ready`](Self::await_ready).
    #[instrument(skip(self, table), fields(table = table.name()))]
    pub async fn ensure_table(&self, table: &TableDescriptor) -> Result<EnsureOutcome> {
        match self.backend.create_table(table).await {
            Ok(()) => {
                info!("table creation started");
                Ok(EnsureOutcome::Created)
            }
            Err(err) if classify(&err) == ErrorKind::AlreadyExists => {
                info!("table already exists");
                Ok(EnsureOutcome::AlreadyExists)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Polls the table status every `poll_interval` until it is `ACTIVE`.
    ///
    /// Stops early with [`Error::Timeout`] once `timeout` has elapsed, with
    /// [`Error::Cancelled`] when `cancel` fires, or with the classified error of a
    /// failed describe call.
    #[instrument(skip(self, cancel))]
    pub async fn await_ready(
        &self,
        table_name: &str,
        poll_interval: Duration,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let started = Instant::now();
        let deadline = started + timeout;
        let timed_out = || Error::Timeout {
            table: table_name.to_string(),
            waited: started.elapsed(),
        };
        let cancelled = || Error::Cancelled {
            table: table_name.to_string(),
        };

        loop {
            let status = tokio::select! {
                _ = cancel.cancelled() => return Err(cancelled()),
                described = timeout_at(deadline, self.backend.table_status(table_name)) => {
                    described.map_err(|_| timed_out())??
                }
            };

            if status.is_active() {
                info!(waited = ?started.elapsed(), "table is active");
                return Ok(());
            }
            debug!(%status, "table not active yet");

            let now = Instant::now();
            if now >= deadline {
                return Err(timed_out());
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(cancelled()),
                _ = sleep(poll_interval.min(deadline - now)) => {}
            }
        }
    }

    /// Deletes a table. A missing table is an error, not a no-op.
    #[instrument(skip(self))]
    pub async fn delete_table(&self, table_name: &str) -> Result<()> {
        self.backend
            .delete_table(table_name)
            .await
            .map_err(StoreError::from)?;
        info!("table deletion started");
        Ok(())
    }
}
