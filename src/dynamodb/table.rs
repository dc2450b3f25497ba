use crate::dynamodb::KeyAttribute;

/// Provisioned throughput of a table.
///
/// DynamoDB tables can be created in one of two capacity modes:
/// - **Provisioned**: You specify the number of reads and writes per second.
/// - **On-Demand**: DynamoDB instantly accommodates workloads as they ramp up or down.
///
/// Tables created through this crate are always provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub read: i64,
    pub write: i64,
}

/// Everything needed to create a DynamoDB table.
///
/// # Table Structure
///
/// - **Table Name**: A unique identifier for the table within your AWS account and region.
/// - **Primary Key**: Consists of a partition key and an optional sort key.
///   - **Partition Key**: Determines the partition where the item is stored.
///   - **Sort Key**: Optional. Used to sort items with the same partition key.
/// - **Capacity**: Provisioned read and write units.
///
/// # Example
///
/// ```
/// use gamer_profile_store::dynamodb::{Capacity, KeyAttribute, TableDescriptor};
///
/// let table = TableDescriptor::new("user_messages", KeyAttribute::string("user_id"))
///     .with_sort_key(KeyAttribute::number("timestamp"))
///     .with_capacity(Capacity { read: 5, write: 5 });
///
/// assert_eq!(table.sort_key().map(|k| k.name()), Some("timestamp"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    name: String,
    partition_key: KeyAttribute,
    sort_key: Option<KeyAttribute>,
    capacity: Capacity,
}

impl TableDescriptor {
    /// Default provisioned throughput when none is given.
    pub const DEFAULT_CAPACITY: Capacity = Capacity { read: 2, write: 2 };

    /// Creates a new `TableDescriptor` with a simple primary key.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the DynamoDB table.
    /// * `partition_key` - The partition key attribute.
    pub fn new(name: impl Into<String>, partition_key: KeyAttribute) -> Self {
        Self {
            name: name.into(),
            partition_key,
            sort_key: None,
            capacity: Self::DEFAULT_CAPACITY,
        }
    }

    /// Adds a sort key, making the primary key composite.
    pub fn with_sort_key(mut self, sort_key: KeyAttribute) -> Self {
        self.sort_key = Some(sort_key);
        self
    }

    pub fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Returns the name of the table.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the partition key of the table.
    pub fn partition_key(&self) -> &KeyAttribute {
        &self.partition_key
    }

    /// Returns the sort key of the table, if any.
    pub fn sort_key(&self) -> Option<&KeyAttribute> {
        self.sort_key.as_ref()
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }
}
