use async_trait::async_trait;
use aws_sdk_dynamodb::{
    error::{BuildError, DisplayErrorContext, ProvideErrorMetadata, SdkError},
    types::{
        AttributeDefinition, AttributeValue, KeySchemaElement, KeyType, ProvisionedThroughput,
        TableStatus as SdkTableStatus,
    },
    Client,
};
use std::fmt::Debug;
use tracing::{debug, info};

use crate::config::Config;
use crate::dynamodb::{Backend, Item, RawError, TableDescriptor, TableStatus};

/// DynamoDB client wrapper implementing [`Backend`].
///
/// This struct owns one `aws_sdk_dynamodb::Client` and translates each backend
/// call into a single SDK request. It never retries on its own: failures are turned
/// into a [`RawError`] carrying the service error code (when the service answered)
/// and handed back to the caller.
///
/// The client is cheap to clone and safe to share between concurrent requests, so
/// one `DynamoDb` is built per process and passed to whatever needs it.
///
/// # Example
///
/// ```no_run
/// use gamer_profile_store::{config::Config, dynamodb::DynamoDb};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let ddb = DynamoDb::connect(&config).await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DynamoDb {
    client: Client,
}

impl DynamoDb {
    /// Creates a new `DynamoDb` instance from an already loaded SDK configuration.
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }

    /// Loads the SDK configuration for the configured region (and endpoint, when
    /// pointing at DynamoDB Local) and builds a client from it.
    pub async fn connect(config: &Config) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));
        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        let sdk_config = loader.load().await;
        info!(region = %config.region, "DynamoDB client configured");
        Self::new(&sdk_config)
    }
}

#[async_trait]
impl Backend for DynamoDb {
    async fn create_table(&self, table: &TableDescriptor) -> Result<(), RawError> {
        let partition_key = table.partition_key();

        let mut attribute_definitions = vec![AttributeDefinition::builder()
            .attribute_name(partition_key.name())
            .attribute_type(partition_key.field_type().scalar_type())
            .build()
            .map_err(invalid_request)?];

        let mut key_schema = vec![KeySchemaElement::builder()
            .attribute_name(partition_key.name())
            .key_type(KeyType::Hash)
            .build()
            .map_err(invalid_request)?];

        if let Some(sort_key) = table.sort_key() {
            attribute_definitions.push(
                AttributeDefinition::builder()
                    .attribute_name(sort_key.name())
                    .attribute_type(sort_key.field_type().scalar_type())
                    .build()
                    .map_err(invalid_request)?,
            );
            key_schema.push(
                KeySchemaElement::builder()
                    .attribute_name(sort_key.name())
                    .key_type(KeyType::Range)
                    .build()
                    .map_err(invalid_request)?,
            );
        }

        let capacity = table.capacity();
        let throughput = ProvisionedThroughput::builder()
            .read_capacity_units(capacity.read)
            .write_capacity_units(capacity.write)
            .build()
            .map_err(invalid_request)?;

        self.client
            .create_table()
            .table_name(table.name())
            .set_attribute_definitions(Some(attribute_definitions))
            .set_key_schema(Some(key_schema))
            .provisioned_throughput(throughput)
            .send()
            .await
            .map_err(raw_error)?;

        debug!(table = table.name(), "CreateTable accepted");
        Ok(())
    }

    async fn table_status(&self, table_name: &str) -> Result<TableStatus, RawError> {
        let output = self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(raw_error)?;

        let status = output
            .table()
            .and_then(|description| description.table_status())
            .ok_or_else(|| {
                RawError::transport(format!("DescribeTable returned no status for '{table_name}'"))
            })?;

        Ok(match status {
            SdkTableStatus::Creating => TableStatus::Creating,
            SdkTableStatus::Active => TableStatus::Active,
            SdkTableStatus::Updating => TableStatus::Updating,
            SdkTableStatus::Deleting => TableStatus::Deleting,
            other => TableStatus::Other(other.as_str().to_string()),
        })
    }

    async fn delete_table(&self, table_name: &str) -> Result<(), RawError> {
        self.client
            .delete_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(raw_error)?;

        debug!(table = table_name, "DeleteTable accepted");
        Ok(())
    }

    async fn put_item(&self, table_name: &str, item: Item) -> Result<(), RawError> {
        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(item.into_attributes()))
            .send()
            .await
            .map_err(raw_error)?;

        Ok(())
    }

    async fn query_items(
        &self,
        table_name: &str,
        partition_key: (&str, AttributeValue),
    ) -> Result<Vec<Item>, RawError> {
        let response = self
            .client
            .query()
            .table_name(table_name)
            .key_condition_expression("#pk = :pkval")
            .expression_attribute_names("#pk", partition_key.0)
            .expression_attribute_values(":pkval", partition_key.1)
            .consistent_read(true)
            .scan_index_forward(true)
            .send()
            .await
            .map_err(raw_error)?;

        Ok(response
            .items
            .unwrap_or_default()
            .into_iter()
            .map(Item::from)
            .collect())
    }
}

/// Keeps the service error code when there is one; otherwise the full error chain,
/// which is where DNS and connection failures show up.
fn raw_error<E, R>(err: SdkError<E, R>) -> RawError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: Debug,
{
    match err.code() {
        Some(code) => {
            let message = err
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
            RawError::service(code, message)
        }
        None => RawError::transport(DisplayErrorContext(&err).to_string()),
    }
}

fn invalid_request(err: BuildError) -> RawError {
    RawError::transport(format!("invalid request: {err}"))
}
