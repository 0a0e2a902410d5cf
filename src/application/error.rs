//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::ParseError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Load/save failure reported by the tree store; the message is passed on unchanged.
    #[error("store error: {message}")]
    Store { message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
