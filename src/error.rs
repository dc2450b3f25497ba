//! Error taxonomy shared by the record store and the table lifecycle manager.
//!
//! Backend failures arrive as a [`RawError`] and are sorted into a small closed set of
//! [`ErrorKind`]s by [`classify`]. Callers decide what to do with each kind; nothing in
//! this crate retries.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::dynamodb::RawError;

/// Semantic outcome of a failed backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The resource already exists, or is busy being created or changed.
    AlreadyExists,
    NotFound,
    /// Account or request level limits, e.g. too many concurrent table operations.
    LimitExceeded,
    /// Provisioned throughput or request rate exceeded.
    Throttled,
    Internal,
    /// The request never reached the service (DNS, refused connection, ...).
    ConnectivityFailure,
    ConditionFailed,
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::AlreadyExists => "resource already exists",
            ErrorKind::NotFound => "resource not found",
            ErrorKind::LimitExceeded => "limit exceeded",
            ErrorKind::Throttled => "provisioned throughput exceeded",
            ErrorKind::Internal => "internal server error",
            ErrorKind::ConnectivityFailure => "connectivity failure",
            ErrorKind::ConditionFailed => "conditional check failed",
            ErrorKind::Unknown => "unknown error",
        };
        f.write_str(text)
    }
}

/// Service error codes and the kind each one maps to. Every code appears once.
const KNOWN_CODES: &[(&str, ErrorKind)] = &[
    ("ResourceInUseException", ErrorKind::AlreadyExists),
    ("TableAlreadyExistsException", ErrorKind::AlreadyExists),
    ("TableInUseException", ErrorKind::AlreadyExists),
    ("ResourceNotFoundException", ErrorKind::NotFound),
    ("TableNotFoundException", ErrorKind::NotFound),
    ("LimitExceededException", ErrorKind::LimitExceeded),
    ("RequestLimitExceeded", ErrorKind::LimitExceeded),
    ("ProvisionedThroughputExceededException", ErrorKind::Throttled),
    ("ThrottlingException", ErrorKind::Throttled),
    ("InternalServerError", ErrorKind::Internal),
    ("ServiceUnavailable", ErrorKind::Internal),
    ("ConditionalCheckFailedException", ErrorKind::ConditionFailed),
];

/// Message fragments that identify a request which never reached the service.
const CONNECTIVITY_MARKERS: &[&str] = &[
    "no such host",
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "connection refused",
];

/// Sorts a backend failure into an [`ErrorKind`].
///
/// A structured code wins when present. Without one, the message is searched for
/// the usual transport failure wording; anything else is `Unknown`.
pub fn classify(err: &RawError) -> ErrorKind {
    if let Some(code) = err.code.as_deref() {
        return KNOWN_CODES
            .iter()
            .find(|(known, _)| *known == code)
            .map_or(ErrorKind::Unknown, |(_, kind)| *kind);
    }

    let message = err.message.to_lowercase();
    if CONNECTIVITY_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
    {
        ErrorKind::ConnectivityFailure
    } else {
        ErrorKind::Unknown
    }
}

/// A classified backend failure. The backend's own text is kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct StoreError {
    pub kind: ErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<RawError> for StoreError {
    fn from(err: RawError) -> Self {
        Self {
            kind: classify(&err),
            message: err.to_string(),
        }
    }
}

impl From<serde_dynamo::Error> for StoreError {
    fn from(err: serde_dynamo::Error) -> Self {
        Self::new(ErrorKind::Internal, format!("malformed item: {err}"))
    }
}

/// Errors returned by [`RecordStore`](crate::store::RecordStore) and
/// [`TableLifecycleManager`](crate::lifecycle::TableLifecycleManager).
#[derive(Debug, Error)]
pub enum Error {
    /// The input was rejected before any backend call was made.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("table '{table}' not active after {waited:?}")]
    Timeout { table: String, waited: Duration },

    #[error("wait for table '{table}' cancelled")]
    Cancelled { table: String },
}

impl Error {
    /// The classified backend kind, if this error came from the backend.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Store(err) => Some(err.kind),
            _ => None,
        }
    }
}

impl From<RawError> for Error {
    fn from(err: RawError) -> Self {
        Error::Store(err.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
