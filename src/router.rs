//! Maps HTTP-shaped requests onto [`RecordStore`] operations.
//!
//! Store failures are logged here and answered with a generic message; no backend
//! detail reaches the client.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, warn};

use crate::error::Error;
use crate::store::RecordStore;

/// Path parameter carrying the record id on GET.
pub const ID_PARAMETER: &str = "id";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    pub method: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub path_parameters: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub body: String,
}

impl ApiResponse {
    fn json<T: Serialize>(status_code: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status_code, body },
            Err(e) => {
                error!("Failed to encode response body: {e}");
                Self::error(500, "Internal server error")
            }
        }
    }

    /// `{"error": message}`
    fn error(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }
}

/// Dispatches on the request method: POST creates, GET reads, anything else is a
/// bad request. Method names are matched exactly, so `post` is rejected.
pub async fn route(store: &RecordStore, request: &ApiRequest) -> ApiResponse {
    match request.method.as_str() {
        "POST" => create(store, &request.body).await,
        "GET" => get(store, &request.path_parameters).await,
        other => {
            warn!(method = other, "Unsupported method");
            ApiResponse::error(400, "Invalid HTTP method")
        }
    }
}

async fn create(store: &RecordStore, body: &str) -> ApiResponse {
    match store.create_from_json(body).await {
        Ok(record) => ApiResponse::json(201, &record),
        Err(Error::Validation(reason)) => {
            warn!("Rejected request body: {reason}");
            ApiResponse::error(400, "Invalid request body")
        }
        Err(e) => {
            error!("Failed to create record: {e}");
            ApiResponse::error(500, "Failed to create record")
        }
    }
}

async fn get(store: &RecordStore, path_parameters: &HashMap<String, String>) -> ApiResponse {
    let Some(id) = path_parameters
        .get(ID_PARAMETER)
        .filter(|id| !id.is_empty())
    else {
        return ApiResponse::error(400, "Missing record id");
    };

    match store.get(id).await {
        Ok(Some(record)) => ApiResponse::json(200, &record),
        Ok(None) => ApiResponse::error(404, "Record not found"),
        Err(e) => {
            error!(id = %id, "Failed to get record: {e}");
            ApiResponse::error(500, "Failed to get record")
        }
    }
}
