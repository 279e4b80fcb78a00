//! Change notification for committed mutations
//!
//! The store fires exactly one event per committed mutation so the renderer
//! can redraw without polling. The sink trait abstracts over the transport
//! (Tauri emit, mpsc, in-process callback).

use serde::{Deserialize, Serialize};

/// Trait for receiving editor change notifications
pub trait EditorEventSink: Send + Sync {
    /// Deliver an event
    ///
    /// Returns an error if the event could not be delivered (e.g., channel
    /// closed). Delivery failure never rolls back the mutation.
    fn send(&self, event: EditorEvent) -> Result<(), EventError>;
}

/// Error when delivering events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

/// Events emitted once per committed store mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    /// A workflow was created
    #[serde(rename_all = "camelCase")]
    WorkflowCreated { workflow_id: String },

    /// A workflow was deleted along with its nodes and connections
    #[serde(rename_all = "camelCase")]
    WorkflowDeleted { workflow_id: String },

    /// A workflow was renamed
    #[serde(rename_all = "camelCase")]
    WorkflowRenamed { workflow_id: String },

    /// A node was added to a workflow
    #[serde(rename_all = "camelCase")]
    NodeAdded {
        workflow_id: String,
        node_id: String,
    },

    /// A node was moved
    #[serde(rename_all = "camelCase")]
    NodeMoved {
        workflow_id: String,
        node_id: String,
    },

    /// A node was removed, cascading to its connections
    #[serde(rename_all = "camelCase")]
    NodeRemoved {
        workflow_id: String,
        node_id: String,
    },

    /// A connection was added
    #[serde(rename_all = "camelCase")]
    ConnectionAdded {
        workflow_id: String,
        connection_id: String,
    },

    /// A connection was removed
    #[serde(rename_all = "camelCase")]
    ConnectionRemoved {
        workflow_id: String,
        connection_id: String,
    },
}

/// A no-op event sink that discards all events
///
/// Useful for testing or when change notifications aren't needed.
pub struct NullEventSink;

impl EditorEventSink for NullEventSink {
    fn send(&self, _event: EditorEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: std::sync::Mutex<Vec<EditorEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorEventSink for VecEventSink {
    fn send(&self, event: EditorEvent) -> Result<(), EventError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
