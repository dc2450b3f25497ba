use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Attribute names as stored in the table and sent over HTTP.
pub const ID: &str = "id";
pub const CREATED_AT: &str = "createdAt";

/// A gamer profile.
///
/// `(id, created_at)` is the table's composite key. Both are assigned by the store on
/// creation and never change; records are never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    /// Seconds since the Unix epoch.
    pub created_at: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
    /// Free-form label, typically the game the profile plays.
    #[serde(default)]
    pub attribute: String,
}

/// Caller-supplied fields of a new record.
///
/// Any `id` or `createdAt` in the payload is ignored; the store assigns both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub attribute: Option<String>,
}

impl RecordInput {
    /// Parses a JSON request body.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| Error::Validation(e.to_string()))
    }

    pub(crate) fn into_record(self, id: String, created_at: i64) -> Record {
        Record {
            id,
            created_at,
            name: self.name.unwrap_or_default(),
            phone_number: self.phone_number.unwrap_or_default(),
            attribute: self.attribute.unwrap_or_default(),
        }
    }
}
