use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use tokio::time::Duration;

use crate::dynamodb::{Backend, Capacity, DynamoDb, InMemoryBackend, TableDescriptor};
use crate::lifecycle::DEFAULT_POLL_INTERVAL;
use crate::store::RecordStore;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_TABLE_NAME: &str = "gamerDetails";
const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(300);

/// Which [`Backend`] the process talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    DynamoDb,
    /// Process-local; nothing survives a restart.
    Memory,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dynamodb" => Ok(BackendKind::DynamoDb),
            "memory" => Ok(BackendKind::Memory),
            other => bail!("unknown store backend '{other}' (expected 'dynamodb' or 'memory')"),
        }
    }
}

/// Process configuration, read once at startup and handed to every component.
///
/// | Variable                   | Default        |
/// |----------------------------|----------------|
/// | `AWS_REGION`               | `us-east-1`    |
/// | `TABLE_NAME`               | `gamerDetails` |
/// | `READ_CAPACITY`            | `2`            |
/// | `WRITE_CAPACITY`           | `2`            |
/// | `AWS_ENDPOINT_URL`         | unset          |
/// | `TABLE_POLL_INTERVAL_SECS` | `5`            |
/// | `TABLE_READY_TIMEOUT_SECS` | `300`          |
/// | `STORE_BACKEND`            | `dynamodb`     |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub region: String,
    pub table_name: String,
    pub capacity: Capacity,
    pub endpoint_url: Option<String>,
    pub poll_interval: Duration,
    pub ready_timeout: Duration,
    pub backend: BackendKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            capacity: TableDescriptor::DEFAULT_CAPACITY,
            endpoint_url: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            ready_timeout: DEFAULT_READY_TIMEOUT,
            backend: BackendKind::DynamoDb,
        }
    }
}

impl Config {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from any key lookup, falling back to defaults for
    /// missing or empty values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let capacity = Capacity {
            read: parse_positive(&get, "READ_CAPACITY", defaults.capacity.read)?,
            write: parse_positive(&get, "WRITE_CAPACITY", defaults.capacity.write)?,
        };
        let poll_interval = Duration::from_secs(parse_positive(
            &get,
            "TABLE_POLL_INTERVAL_SECS",
            defaults.poll_interval.as_secs(),
        )?);
        let ready_timeout = Duration::from_secs(parse_positive(
            &get,
            "TABLE_READY_TIMEOUT_SECS",
            defaults.ready_timeout.as_secs(),
        )?);
        let backend = match get("STORE_BACKEND") {
            Some(value) => value.parse()?,
            None => defaults.backend,
        };

        Ok(Self {
            region: get("AWS_REGION").unwrap_or(defaults.region),
            table_name: get("TABLE_NAME").unwrap_or(defaults.table_name),
            capacity,
            endpoint_url: get("AWS_ENDPOINT_URL"),
            poll_interval,
            ready_timeout,
            backend,
        })
    }

    /// The gamer profile table as configured.
    pub fn table_descriptor(&self) -> TableDescriptor {
        RecordStore::table_descriptor(&self.table_name).with_capacity(self.capacity)
    }

    /// Connects the configured backend. One handle is built per process and shared.
    pub async fn connect_backend(&self) -> Arc<dyn Backend> {
        match self.backend {
            BackendKind::DynamoDb => Arc::new(DynamoDb::connect(self).await),
            BackendKind::Memory => Arc::new(InMemoryBackend::with_table(&self.table_descriptor())),
        }
    }
}

fn parse_positive<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr + PartialOrd + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(raw) = get(key) else {
        return Ok(default);
    };
    let value: T = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a positive integer, got '{raw}'"))?;
    if value <= T::default() {
        bail!("{key} must be a positive integer, got '{raw}'");
    }
    Ok(value)
}
