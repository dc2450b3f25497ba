//! # DynamoDB Module
//!
//! Low-level access to the backing store: the [`Backend`] trait and its two
//! implementations, plus the small value types they exchange.
//!
//! ## Components
//!
//! - `Backend`: The administrative and data-plane calls the rest of the crate relies on.
//! - `DynamoDb`: `Backend` over the AWS SDK client.
//! - `InMemoryBackend`: `Backend` held in process, with DynamoDB's error codes.
//! - `Item`: Represents a DynamoDB item with various attribute types.
//! - `KeyAttribute` / `FieldType`: Declares one half of a primary key.
//! - `TableDescriptor`: Name, key schema and provisioned capacity of a table.
//!
//! ## Usage
//!
//! `DynamoDb::connect` uses the standard AWS credential chain. Set the following
//! environment variables (or put them in a `.env` file):
//!
//! - `AWS_ACCESS_KEY_ID`: Your AWS access key ID.
//! - `AWS_SECRET_ACCESS_KEY`: Your AWS secret access key.
//!
//! Optionally, you can also set:
//! - `AWS_SESSION_TOKEN`: If you're using temporary credentials.
//! - `AWS_ENDPOINT_URL`: For using a custom endpoint (e.g., DynamoDB Local).

mod backend;
mod client;
mod item;
mod memory;
mod schema;
mod table;

pub use backend::{Backend, RawError, TableStatus};
pub use client::DynamoDb;
pub use item::Item;
pub use memory::InMemoryBackend;
pub use schema::{FieldType, KeyAttribute};
pub use table::{Capacity, TableDescriptor};
