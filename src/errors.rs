//! Unified error type for every catalog operation.
//!
//! Validation, not-found and conflict conditions are detected before any write.
//! Storage errors only surface for failed blob saves; failed blob deletions are
//! logged by the file store and never reach this type.

use thiserror::Error;

/// Errors returned by catalog, storage and configuration operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// A required field is missing or malformed
    #[error("Validation failed: {message}")]
    Validation {
        /// Human-readable description of the problem
        message: String,
    },

    /// A plan price is negative or not a finite number
    #[error("Invalid price: {amount}")]
    InvalidPrice {
        /// The rejected amount
        amount: f64,
    },

    /// The referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up
        entity: &'static str,
        /// Identifier that was looked up
        id: i32,
    },

    /// A referential guard refused the operation
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable description of the conflict
        message: String,
    },

    /// Writing an uploaded file failed
    #[error("Storage error: {message}")]
    Storage {
        /// Human-readable description of the failure
        message: String,
    },

    /// The database rejected a query or a commit
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Translation key describing this error to an end user.
    #[must_use]
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::Config { .. } => "error_config",
            Self::Validation { .. } | Self::InvalidPrice { .. } => "error_validation",
            Self::NotFound { .. } => "error_not_found",
            Self::Conflict { .. } => "error_conflict",
            Self::Storage { .. } => "error_storage",
            Self::Database(_) => "error_save",
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
