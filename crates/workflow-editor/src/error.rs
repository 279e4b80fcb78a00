//! Error types for the editor core

use thiserror::Error;

use crate::validation::ConnectionRejection;

/// Result type alias using EditorError
pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors that can occur in the editor core
///
/// None of these are fatal: callers recover by dropping the operation and
/// keeping the current snapshot. No error path leaves a workflow with
/// dangling connection endpoints.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Operation referenced a workflow that no longer exists
    #[error("Workflow not found: {0}")]
    WorkflowNotFound(String),

    /// Operation referenced a node that no longer exists
    #[error("Node '{node_id}' not found in workflow '{workflow_id}'")]
    NodeNotFound {
        workflow_id: String,
        node_id: String,
    },

    /// Operation referenced a connection that no longer exists
    #[error("Connection '{connection_id}' not found in workflow '{workflow_id}'")]
    ConnectionNotFound {
        workflow_id: String,
        connection_id: String,
    },

    /// The requested connection was rejected by validation
    #[error("Invalid connection: {0}")]
    InvalidConnection(#[from] ConnectionRejection),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
