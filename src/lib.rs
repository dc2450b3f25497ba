//! Create and read gamer profiles stored in DynamoDB.
//!
//! - [`store::RecordStore`] writes and looks up records.
//! - [`lifecycle::TableLifecycleManager`] provisions and tears down the table.
//! - [`router::route`] maps HTTP-shaped requests onto the store.
//!
//! Every component receives its [`dynamodb::Backend`] handle at construction; nothing
//! is held in globals.

pub mod command_line;
pub mod config;
pub mod dynamodb;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod router;
pub mod store;

#[cfg(test)]
mod tests;
