use std::time::Duration;

use thiserror::Error;

/// Error type for dbengine operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DbEngineError {
    #[error("No database connection established.")]
    NotConnected,

    #[error("Unable to connect to database. [ {0} ]")]
    ConnectionFailed(String),

    #[error("Prepare failed: {0}")]
    Prepare(String),

    #[error("Statement has {placeholders} placeholder(s) but {parameters} parameter(s) were bound")]
    BindArity {
        placeholders: usize,
        parameters: usize,
    },

    #[error("Execution failed: {0}")]
    Execution(String),

    #[error("Query timed out after {0:?}")]
    Timeout(Duration),

    #[error("Expected {expected} row(s), got {actual}")]
    UnexpectedRowCount { expected: usize, actual: usize },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for dbengine operations
pub type Result<T> = std::result::Result<T, DbEngineError>;
