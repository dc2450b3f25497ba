use aws_sdk_dynamodb::types::AttributeValue;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dynamodb::{Backend, Item, KeyAttribute, TableDescriptor};
use crate::error::{Result, StoreError};
use crate::model::{Record, RecordInput, CREATED_AT, ID};

/// Typed create and read access to the gamer profile table.
///
/// Holds no mutable state of its own: every call is one round trip to the backend,
/// which is trusted to make single-item writes and reads atomic.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn Backend>,
    table_name: String,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn Backend>, table_name: impl Into<String>) -> Self {
        Self {
            backend,
            table_name: table_name.into(),
        }
    }

    /// The table layout records are written with: partition key `id` (string), sort
    /// key `createdAt` (number).
    pub fn table_descriptor(table_name: impl Into<String>) -> TableDescriptor {
        TableDescriptor::new(table_name, KeyAttribute::string(ID))
            .with_sort_key(KeyAttribute::number(CREATED_AT))
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Stores a new record with a generated id and the current time as `createdAt`.
    ///
    /// The write is unconditional: a colliding id would overwrite silently, which
    /// random v4 ids make practically impossible.
    #[instrument(skip(self, input), fields(table = %self.table_name))]
    pub async fn create(&self, input: RecordInput) -> Result<Record> {
        let record = input.into_record(
            Uuid::new_v4().to_string(),
            chrono::Utc::now().timestamp(),
        );
        let item = Item::from_value(&record).map_err(StoreError::from)?;

        self.backend.put_item(&self.table_name, item).await?;

        info!(id = %record.id, created_at = record.created_at, "record created");
        Ok(record)
    }

    /// Parses a JSON payload and creates a record from it. Malformed payloads are
    /// rejected without touching the backend.
    pub async fn create_from_json(&self, body: &str) -> Result<Record> {
        let input = RecordInput::from_json(body)?;
        self.create(input).await
    }

    /// Looks a record up by id alone.
    ///
    /// Each id is written exactly once, so its partition holds a single item. Should
    /// a partition ever hold more, the earliest one is returned.
    #[instrument(skip(self), fields(table = %self.table_name))]
    pub async fn get(&self, id: &str) -> Result<Option<Record>> {
        let items = self
            .backend
            .query_items(&self.table_name, (ID, AttributeValue::S(id.to_string())))
            .await?;

        if items.len() > 1 {
            warn!(count = items.len(), "several records share one id, returning the earliest");
        }

        match items.first() {
            Some(item) => Ok(Some(item.to_value().map_err(StoreError::from)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamodb::{InMemoryBackend, RawError};
    use crate::error::{Error, ErrorKind};

    const TABLE: &str = "profiles";

    async fn store() -> (Arc<InMemoryBackend>, RecordStore) {
        let backend = Arc::new(InMemoryBackend::new());
        backend
            .create_table(&RecordStore::table_descriptor(TABLE))
            .await
            .unwrap();
        let store = RecordStore::new(backend.clone(), TABLE);
        (backend, store)
    }

    #[tokio::test]
    async fn create_assigns_identity() {
        let (_, store) = store().await;
        let before = chrono::Utc::now().timestamp();

        let record = store
            .create(RecordInput {
                name: Some("Ada".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(Uuid::parse_str(&record.id).is_ok());
        assert!(record.created_at >= before);
        assert!(record.created_at <= chrono::Utc::now().timestamp());
        assert_eq!(record.name, "Ada");
        assert_eq!(record.phone_number, "");
    }

    #[tokio::test]
    async fn created_ids_are_distinct() {
        let (backend, store) = store().await;
        let a = store.create(RecordInput::default()).await.unwrap();
        let b = store.create(RecordInput::default()).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(backend.item_count(TABLE).await, 2);
    }

    #[tokio::test]
    async fn malformed_json_never_reaches_backend() {
        let (backend, store) = store().await;
        backend
            .fail_next(RawError::service("InternalServerError", "should not be hit"))
            .await;

        let err = store.create_from_json("{name:").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // The queued failure is still there, so no call was made.
        let err = store.create(RecordInput::default()).await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Internal));
        assert_eq!(backend.item_count(TABLE).await, 0);
    }

    #[tokio::test]
    async fn get_returns_earliest_when_partition_has_several() {
        let (backend, store) = store().await;
        for (created_at, name) in [(20, "later"), (10, "earlier")] {
            let item = Item::new()
                .set_string(ID, "dup")
                .set_number(CREATED_AT, created_at)
                .set_string("name", name);
            backend.put_item(TABLE, item).await.unwrap();
        }

        let record = store.get("dup").await.unwrap().unwrap();
        assert_eq!(record.name, "earlier");
    }

    #[tokio::test]
    async fn malformed_item_is_internal() {
        let (backend, store) = store().await;
        let item = Item::new()
            .set_string(ID, "broken")
            .set_string(CREATED_AT, "yesterday");
        backend.put_item(TABLE, item).await.unwrap();

        let err = store.get("broken").await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Internal));
    }

    #[tokio::test]
    async fn missing_table_is_not_found_error() {
        let backend = Arc::new(InMemoryBackend::new());
        let store = RecordStore::new(backend, "absent");

        let err = store.get("any").await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    }
}
