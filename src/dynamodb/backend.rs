use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use std::fmt;

use crate::dynamodb::{Item, TableDescriptor};

/// An error exactly as the backing store reported it.
///
/// `code` carries the service error code (for DynamoDB, the exception name such as
/// `ResourceNotFoundException`) when the failure came back from the service. Transport
/// failures (DNS, refused connections, timeouts) never reach the service and therefore
/// only carry a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawError {
    pub code: Option<String>,
    pub message: String,
}

impl RawError {
    /// A service error with a structured code.
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// A failure that never produced a service response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for RawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Lifecycle state of a table as reported by a describe call.
///
/// A table that does not exist is not a status: describing it fails with a
/// not-found error instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    Creating,
    Active,
    Updating,
    Deleting,
    /// Any other status the service reports, kept verbatim.
    Other(String),
}

impl TableStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, TableStatus::Active)
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableStatus::Creating => f.write_str("CREATING"),
            TableStatus::Active => f.write_str("ACTIVE"),
            TableStatus::Updating => f.write_str("UPDATING"),
            TableStatus::Deleting => f.write_str("DELETING"),
            TableStatus::Other(status) => f.write_str(status),
        }
    }
}

/// The handful of administrative and data-plane calls the record store needs.
///
/// [`DynamoDb`](crate::dynamodb::DynamoDb) talks to the real service;
/// [`InMemoryBackend`](crate::dynamodb::InMemoryBackend) mimics it in process.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Issues a create-table request. Does not wait for the table to become active.
    async fn create_table(&self, table: &TableDescriptor) -> Result<(), RawError>;

    /// Describes a table and returns its current status.
    async fn table_status(&self, table_name: &str) -> Result<TableStatus, RawError>;

    /// Issues a delete-table request.
    async fn delete_table(&self, table_name: &str) -> Result<(), RawError>;

    /// Writes an item unconditionally, replacing any item with the same key.
    async fn put_item(&self, table_name: &str, item: Item) -> Result<(), RawError>;

    /// Returns every item whose partition key equals the given value, in ascending
    /// sort key order. The read is strongly consistent: a `put_item` that has
    /// returned is always visible.
    async fn query_items(
        &self,
        table_name: &str,
        partition_key: (&str, AttributeValue),
    ) -> Result<Vec<Item>, RawError>;
}
