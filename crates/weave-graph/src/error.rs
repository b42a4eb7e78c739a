//! Graph layer error types.

use std::time::Duration;
use thiserror::Error;

use crate::model::MAX_TRAVERSAL_DEPTH;

/// Errors raised by the graph adapter and the sync layer.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Graph store unavailable: {0}")]
    Unavailable(String),

    #[error("Graph query syntax error: {0}")]
    QuerySyntax(String),

    #[error("Graph store rejected the statement: {0}")]
    Rejected(String),

    #[error("Graph call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to decode graph record: {0}")]
    Decode(String),

    #[error("Decision {0} is not mirrored; cannot link event")]
    MissingParent(i64),

    #[error("Primary store read failed: {0}")]
    Primary(String),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

impl From<neo4rs::Error> for GraphError {
    fn from(e: neo4rs::Error) -> Self {
        match e {
            neo4rs::Error::ConnectionError | neo4rs::Error::IOError { .. } => {
                GraphError::Unavailable(e.to_string())
            }
            other => {
                let message = other.to_string();
                if message.contains("SyntaxError") || message.contains("Invalid input") {
                    GraphError::QuerySyntax(message)
                } else {
                    GraphError::Rejected(message)
                }
            }
        }
    }
}

impl From<neo4rs::DeError> for GraphError {
    fn from(e: neo4rs::DeError) -> Self {
        GraphError::Decode(e.to_string())
    }
}

/// A traversal depth that cannot be used in a query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepthError {
    #[error("Traversal depth must be an integer, got '{0}'")]
    NotAnInteger(String),

    #[error("Traversal depth must be between 1 and {max}, got {0}", max = MAX_TRAVERSAL_DEPTH)]
    OutOfRange(i64),
}
