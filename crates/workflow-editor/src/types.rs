//! Core types for workflow graphs
//!
//! Defines node kinds, port polarity, canvas geometry, and the workflow
//! graph structure owned by the graph store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a workflow
pub type WorkflowId = String;

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for a connection
pub type ConnectionId = String;

/// Rendered width of a node card, in canvas units
pub const NODE_WIDTH: f64 = 180.0;

/// Rendered height of a node card, in canvas units
pub const NODE_HEIGHT: f64 = 50.0;

/// Position on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Component-wise offset from another position
    pub fn offset_from(&self, other: Position) -> Position {
        Position::new(self.x - other.x, self.y - other.y)
    }

    /// Component-wise translation by an offset
    pub fn translated_by(&self, offset: Position) -> Position {
        Position::new(self.x + offset.x, self.y + offset.y)
    }
}

/// The kind of a pipeline node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Source nodes (sample upload, hash lookup, etc.)
    Input,
    /// Analysis nodes (static analysis, deobfuscation, scanning)
    Analysis,
    /// Branching nodes (verdict gates, thresholds)
    Condition,
    /// Sink nodes (report, export)
    Output,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Input => write!(f, "input"),
            NodeKind::Analysis => write!(f, "analysis"),
            NodeKind::Condition => write!(f, "condition"),
            NodeKind::Output => write!(f, "output"),
        }
    }
}

/// Direction of a port on a node
///
/// Connections always run from an output port to an input port, regardless
/// of which end the user grabbed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortPolarity {
    /// Accepts incoming connections
    Input,
    /// Originates outgoing connections
    Output,
}

impl PortPolarity {
    /// The polarity a connection endpoint of this polarity can attach to
    pub fn opposite(&self) -> PortPolarity {
        match self {
            PortPolarity::Input => PortPolarity::Output,
            PortPolarity::Output => PortPolarity::Input,
        }
    }
}

/// A node instance in a workflow graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    /// Unique instance ID within the workflow
    pub id: NodeId,
    /// Kind of pipeline step this node represents
    pub kind: NodeKind,
    /// Human-readable label from the node catalog
    pub label: String,
    /// Opaque icon reference owned by the external catalog
    pub icon: String,
    /// Position on canvas
    pub position: Position,
    /// Node-specific configuration, opaque to the editor core
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl WorkflowNode {
    /// Anchor coordinates of the node's port with the given polarity
    ///
    /// Nodes render as fixed-size cards. The input anchor sits at the
    /// left-edge midpoint, the output anchor at the right-edge midpoint.
    pub fn port_anchor(&self, polarity: PortPolarity) -> Position {
        match polarity {
            PortPolarity::Input => {
                Position::new(self.position.x, self.position.y + NODE_HEIGHT / 2.0)
            }
            PortPolarity::Output => Position::new(
                self.position.x + NODE_WIDTH,
                self.position.y + NODE_HEIGHT / 2.0,
            ),
        }
    }
}

/// A directional connection between two nodes
///
/// `from_node_id` always owns the output port and `to_node_id` the input
/// port; normalization happens before a connection is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConnection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Node owning the output port
    pub from_node_id: NodeId,
    /// Node owning the input port
    pub to_node_id: NodeId,
}

/// A named directed graph of pipeline nodes and connections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Unique workflow ID
    pub id: WorkflowId,
    /// Display name
    pub name: String,
    /// Optional free-form description
    pub description: String,
    /// Nodes in insertion order (snap tie-breaking depends on this order)
    pub nodes: Vec<WorkflowNode>,
    /// Connections between nodes
    pub connections: Vec<WorkflowConnection>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last committed mutation
    pub modified_at: DateTime<Utc>,
}

impl Workflow {
    /// Create a new empty workflow
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            nodes: Vec::new(),
            connections: Vec::new(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a node by ID (mutable)
    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut WorkflowNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Find a connection by ID
    pub fn find_connection(&self, id: &str) -> Option<&WorkflowConnection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Check whether a connection with this exact direction already exists
    pub fn has_connection(&self, from_node_id: &str, to_node_id: &str) -> bool {
        self.connections
            .iter()
            .any(|c| c.from_node_id == from_node_id && c.to_node_id == to_node_id)
    }

    /// Get all connections touching a node, in either direction
    pub fn connections_touching<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a WorkflowConnection> + 'a {
        self.connections
            .iter()
            .filter(move |c| c.from_node_id == node_id || c.to_node_id == node_id)
    }
}
