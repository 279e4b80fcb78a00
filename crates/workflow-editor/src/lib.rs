//! Workflow Editor - interactive node-link graph editing for the dashboard
//!
//! This crate is the self-contained core behind the dashboard's pipeline
//! editor: typed nodes placed on a canvas and wired together with
//! directional connections, with drag-to-move, click-to-connect, and
//! magnetic port snapping. It owns state and interaction only; rendering,
//! persistence, and pipeline execution live outside.
//!
//! # Architecture
//!
//! - `GraphStore`: owns every workflow in a by-id map and performs all
//!   mutations atomically, firing one change event per commit
//! - `InteractionController`: tagged-state machine over raw pointer events
//! - `snap`: pure geometry resolving the nearest compatible port in range
//! - `validation`: pure predicates deciding whether two ports may be joined
//!
//! # Example
//!
//! ```
//! use workflow_editor::{GraphStore, InteractionController, HitTarget};
//! use workflow_editor::{NodeKind, PortPolarity};
//!
//! let mut store = GraphStore::new();
//! let workflow = store.create_workflow("Triage", "Initial sample triage");
//! let input = store
//!     .add_node(&workflow.id, NodeKind::Input, "File Input", "upload")
//!     .unwrap();
//! let scan = store
//!     .add_node(&workflow.id, NodeKind::Analysis, "YARA Scan", "radar")
//!     .unwrap();
//!
//! let mut controller = InteractionController::new();
//! controller.pointer_down(
//!     &mut store,
//!     HitTarget::Port(input.id.clone(), PortPolarity::Output),
//!     input.port_anchor(PortPolarity::Output),
//! );
//! controller.pointer_down(
//!     &mut store,
//!     HitTarget::Port(scan.id.clone(), PortPolarity::Input),
//!     scan.port_anchor(PortPolarity::Input),
//! );
//!
//! assert_eq!(store.selected_workflow().unwrap().connections.len(), 1);
//! ```

pub mod catalog;
pub mod controller;
pub mod error;
pub mod events;
pub mod snap;
pub mod store;
pub mod types;
pub mod validation;

// Re-export key types
pub use catalog::{default_catalog, CatalogEntry};
pub use controller::{HitTarget, Interaction, InteractionController};
pub use error::{EditorError, Result};
pub use events::{EditorEvent, EditorEventSink, NullEventSink, VecEventSink};
pub use snap::{PortRef, SnapResult, SNAP_RADIUS};
pub use store::{CanvasBounds, GraphStore};
pub use types::{
    NodeKind, PortPolarity, Position, Workflow, WorkflowConnection, WorkflowNode,
};
pub use validation::{validate_connection, ConnectionRejection};
