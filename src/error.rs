use std::fmt;

use thiserror::Error;

/// Opaque failure reported by a [`Backend`](crate::store::Backend).
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

/// A domain rule an entity failed before any I/O took place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn required(field: &'static str) -> Self {
        Self::new(field, format!("{field} is required"))
    }
}

/// The store call an [`Error::Store`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    PutItem,
    GetItem,
    Query,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::PutItem => f.write_str("PutItem"),
            Operation::GetItem => f.write_str("GetItem"),
            Operation::Query => f.write_str("Query"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Item not found: PK={pk}, SK={sk}")]
    NotFound { pk: String, sk: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("{operation} on table {table} failed: {source}")]
    Store {
        operation: Operation,
        table: String,
        #[source]
        source: BackendError,
    },
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
