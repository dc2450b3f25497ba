use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;
use tracing::debug;

use crate::dynamodb::{Backend, Item, RawError, TableDescriptor, TableStatus};

/// In-process stand-in for DynamoDB.
///
/// Answers with the same error codes the service uses for the situations the record
/// store cares about (`ResourceInUseException` on a duplicate create,
/// `ResourceNotFoundException` on a missing table), so code built on [`Backend`]
/// behaves the same against either.
///
/// New tables report `CREATING` for a configurable number of describe calls before
/// turning `ACTIVE`, and failures can be queued up front to make the next call fail.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: Mutex<State>,
    activation_polls: u32,
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, MemoryTable>,
    failures: VecDeque<RawError>,
}

#[derive(Debug)]
struct MemoryTable {
    descriptor: TableDescriptor,
    creating_polls_left: u32,
    items: Vec<Item>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that already holds an active, empty `table`.
    pub fn with_table(table: &TableDescriptor) -> Self {
        let mut state = State::default();
        state.tables.insert(
            table.name().to_string(),
            MemoryTable {
                descriptor: table.clone(),
                creating_polls_left: 0,
                items: Vec::new(),
            },
        );
        Self {
            state: Mutex::new(state),
            activation_polls: 0,
        }
    }

    /// New tables stay `CREATING` for this many describe calls.
    pub fn with_activation_polls(mut self, polls: u32) -> Self {
        self.activation_polls = polls;
        self
    }

    /// Makes the next backend call fail with `err`. Queued failures are consumed in
    /// order, one per call.
    pub async fn fail_next(&self, err: RawError) {
        self.state.lock().await.failures.push_back(err);
    }

    pub async fn has_table(&self, table_name: &str) -> bool {
        self.state.lock().await.tables.contains_key(table_name)
    }

    pub async fn item_count(&self, table_name: &str) -> usize {
        self.state
            .lock()
            .await
            .tables
            .get(table_name)
            .map_or(0, |table| table.items.len())
    }
}

impl State {
    fn take_failure(&mut self) -> Result<(), RawError> {
        match self.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn table_mut(&mut self, table_name: &str) -> Result<&mut MemoryTable, RawError> {
        self.tables
            .get_mut(table_name)
            .ok_or_else(|| not_found(table_name))
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn create_table(&self, table: &TableDescriptor) -> Result<(), RawError> {
        let mut state = self.state.lock().await;
        state.take_failure()?;

        if state.tables.contains_key(table.name()) {
            return Err(RawError::service(
                "ResourceInUseException",
                format!("Table already exists: {}", table.name()),
            ));
        }

        state.tables.insert(
            table.name().to_string(),
            MemoryTable {
                descriptor: table.clone(),
                creating_polls_left: self.activation_polls,
                items: Vec::new(),
            },
        );
        debug!(table = table.name(), "in-memory table created");
        Ok(())
    }

    async fn table_status(&self, table_name: &str) -> Result<TableStatus, RawError> {
        let mut state = self.state.lock().await;
        state.take_failure()?;

        let table = state.table_mut(table_name)?;
        if table.creating_polls_left > 0 {
            table.creating_polls_left -= 1;
            return Ok(TableStatus::Creating);
        }
        Ok(TableStatus::Active)
    }

    async fn delete_table(&self, table_name: &str) -> Result<(), RawError> {
        let mut state = self.state.lock().await;
        state.take_failure()?;

        state
            .tables
            .remove(table_name)
            .map(|_| ())
            .ok_or_else(|| not_found(table_name))
    }

    async fn put_item(&self, table_name: &str, item: Item) -> Result<(), RawError> {
        let mut state = self.state.lock().await;
        state.take_failure()?;

        let table = state.table_mut(table_name)?;
        let key_names: Vec<String> = std::iter::once(table.descriptor.partition_key())
            .chain(table.descriptor.sort_key())
            .map(|key| key.name().to_string())
            .collect();

        if let Some(missing) = key_names.iter().find(|name| item.get(name).is_none()) {
            return Err(RawError::service(
                "ValidationException",
                format!("One or more parameter values were invalid: Missing the key {missing} in the item"),
            ));
        }

        let same_key = |existing: &Item| {
            key_names
                .iter()
                .all(|name| existing.get(name) == item.get(name))
        };
        match table.items.iter().position(same_key) {
            Some(index) => table.items[index] = item,
            None => table.items.push(item),
        }
        Ok(())
    }

    async fn query_items(
        &self,
        table_name: &str,
        partition_key: (&str, AttributeValue),
    ) -> Result<Vec<Item>, RawError> {
        let mut state = self.state.lock().await;
        state.take_failure()?;

        let table = state.table_mut(table_name)?;
        let (name, value) = partition_key;
        let mut items: Vec<Item> = table
            .items
            .iter()
            .filter(|item| item.get(name) == Some(&value))
            .cloned()
            .collect();

        if let Some(sort_key) = table.descriptor.sort_key() {
            let sort_name = sort_key.name();
            items.sort_by(|a, b| compare_attributes(a.get(sort_name), b.get(sort_name)));
        }
        Ok(items)
    }
}

fn not_found(table_name: &str) -> RawError {
    RawError::service(
        "ResourceNotFoundException",
        format!("Requested resource not found: Table: {table_name} not found"),
    )
}

fn compare_attributes(a: Option<&AttributeValue>, b: Option<&AttributeValue>) -> Ordering {
    match (a, b) {
        (Some(AttributeValue::N(a)), Some(AttributeValue::N(b))) => {
            match (a.parse::<f64>(), b.parse::<f64>()) {
                (Ok(a), Ok(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                _ => a.cmp(b),
            }
        }
        (Some(AttributeValue::S(a)), Some(AttributeValue::S(b))) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
