//! Canonical workflow state and atomic mutations
//!
//! The store owns every workflow in a single by-id map; the "selected"
//! workflow is a derived lookup, never a second copy, so the two can't
//! drift apart. All mutations validate first and commit second, fire one
//! change event, and hand back an immutable snapshot for rendering.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;

use crate::error::{EditorError, Result};
use crate::events::{EditorEvent, EditorEventSink, NullEventSink};
use crate::types::{
    NodeKind, PortPolarity, Position, Workflow, WorkflowConnection, WorkflowId, WorkflowNode,
    NODE_HEIGHT, NODE_WIDTH,
};
use crate::validation::validate_connection;

/// Keeps freshly placed nodes clear of the canvas edges
const PLACEMENT_MARGIN: f64 = 40.0;

/// Canvas region used for randomized initial node placement
#[derive(Debug, Clone, Copy)]
pub struct CanvasBounds {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasBounds {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 900.0,
        }
    }
}

/// Owner of all workflow graphs
///
/// Single-threaded by design: every operation runs to completion within the
/// handling of one input event, so mutations never interleave. Nothing
/// outside this store mutates a workflow.
pub struct GraphStore {
    workflows: HashMap<WorkflowId, Workflow>,
    selected: Option<WorkflowId>,
    bounds: CanvasBounds,
    events: Arc<dyn EditorEventSink>,
}

impl GraphStore {
    /// Create an empty store with default canvas bounds and no event sink
    pub fn new() -> Self {
        Self {
            workflows: HashMap::new(),
            selected: None,
            bounds: CanvasBounds::default(),
            events: Arc::new(NullEventSink),
        }
    }

    /// Replace the change-notification sink
    pub fn with_event_sink(mut self, sink: Arc<dyn EditorEventSink>) -> Self {
        self.events = sink;
        self
    }

    /// Replace the canvas region used for node placement
    pub fn with_canvas_bounds(mut self, bounds: CanvasBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Create a new empty workflow and select it
    pub fn create_workflow(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Workflow {
        let id = uuid::Uuid::new_v4().to_string();
        let workflow = Workflow::new(id.clone(), name, description);
        let snapshot = workflow.clone();

        self.workflows.insert(id.clone(), workflow);
        self.selected = Some(id.clone());

        log::debug!("Created workflow '{}' ({})", snapshot.name, id);
        self.emit(EditorEvent::WorkflowCreated { workflow_id: id });
        snapshot
    }

    /// Delete a workflow, discarding its nodes and connections
    pub fn delete_workflow(&mut self, workflow_id: &str) -> Result<()> {
        if self.workflows.remove(workflow_id).is_none() {
            return Err(EditorError::WorkflowNotFound(workflow_id.to_string()));
        }
        if self.selected.as_deref() == Some(workflow_id) {
            self.selected = None;
        }

        log::debug!("Deleted workflow {}", workflow_id);
        self.emit(EditorEvent::WorkflowDeleted {
            workflow_id: workflow_id.to_string(),
        });
        Ok(())
    }

    /// Rename a workflow and update its description
    pub fn rename_workflow(
        &mut self,
        workflow_id: &str,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Workflow> {
        let workflow = self.workflow_mut(workflow_id)?;
        workflow.name = name.into();
        workflow.description = description.into();
        workflow.modified_at = Utc::now();
        let snapshot = workflow.clone();

        self.emit(EditorEvent::WorkflowRenamed {
            workflow_id: workflow_id.to_string(),
        });
        Ok(snapshot)
    }

    /// Get a workflow by ID
    pub fn workflow(&self, workflow_id: &str) -> Option<&Workflow> {
        self.workflows.get(workflow_id)
    }

    /// All workflows, oldest first (for the workflow-list chrome)
    pub fn list_workflows(&self) -> Vec<&Workflow> {
        let mut workflows: Vec<&Workflow> = self.workflows.values().collect();
        workflows.sort_by_key(|w| w.created_at);
        workflows
    }

    /// Mark a workflow as the one being edited
    pub fn select(&mut self, workflow_id: &str) -> Result<()> {
        if !self.workflows.contains_key(workflow_id) {
            return Err(EditorError::WorkflowNotFound(workflow_id.to_string()));
        }
        self.selected = Some(workflow_id.to_string());
        Ok(())
    }

    /// The currently selected workflow, derived from the by-id map
    pub fn selected_workflow(&self) -> Option<&Workflow> {
        self.selected.as_ref().and_then(|id| self.workflows.get(id))
    }

    /// Add a node at a randomized position inside the canvas bounds
    pub fn add_node(
        &mut self,
        workflow_id: &str,
        kind: NodeKind,
        label: impl Into<String>,
        icon: impl Into<String>,
    ) -> Result<WorkflowNode> {
        let position = self.random_position();
        let workflow = self.workflow_mut(workflow_id)?;

        let node = WorkflowNode {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            label: label.into(),
            icon: icon.into(),
            position,
            config: None,
        };
        let snapshot = node.clone();

        workflow.nodes.push(node);
        workflow.modified_at = Utc::now();

        log::debug!(
            "Added {} node '{}' ({}) to workflow {}",
            kind,
            snapshot.label,
            snapshot.id,
            workflow_id
        );
        self.emit(EditorEvent::NodeAdded {
            workflow_id: workflow_id.to_string(),
            node_id: snapshot.id.clone(),
        });
        Ok(snapshot)
    }

    /// Move a node to a new position
    ///
    /// Called once per pointer-move event while dragging. A node deleted
    /// out from under an in-flight drag yields `NodeNotFound`, which the
    /// controller treats as a no-op.
    pub fn move_node(
        &mut self,
        workflow_id: &str,
        node_id: &str,
        position: Position,
    ) -> Result<Workflow> {
        let workflow = self.workflow_mut(workflow_id)?;
        let node = workflow
            .find_node_mut(node_id)
            .ok_or_else(|| EditorError::NodeNotFound {
                workflow_id: workflow_id.to_string(),
                node_id: node_id.to_string(),
            })?;

        node.position = position;
        workflow.modified_at = Utc::now();
        let snapshot = workflow.clone();

        self.emit(EditorEvent::NodeMoved {
            workflow_id: workflow_id.to_string(),
            node_id: node_id.to_string(),
        });
        Ok(snapshot)
    }

    /// Delete a node and every connection referencing it
    pub fn delete_node(&mut self, workflow_id: &str, node_id: &str) -> Result<Workflow> {
        let workflow = self.workflow_mut(workflow_id)?;
        let index = workflow
            .nodes
            .iter()
            .position(|n| n.id == node_id)
            .ok_or_else(|| EditorError::NodeNotFound {
                workflow_id: workflow_id.to_string(),
                node_id: node_id.to_string(),
            })?;

        workflow.nodes.remove(index);
        let before = workflow.connections.len();
        workflow
            .connections
            .retain(|c| c.from_node_id != node_id && c.to_node_id != node_id);
        let cascaded = before - workflow.connections.len();
        workflow.modified_at = Utc::now();
        let snapshot = workflow.clone();

        log::debug!(
            "Removed node {} from workflow {} ({} connections cascaded)",
            node_id,
            workflow_id,
            cascaded
        );
        self.emit(EditorEvent::NodeRemoved {
            workflow_id: workflow_id.to_string(),
            node_id: node_id.to_string(),
        });
        Ok(snapshot)
    }

    /// Connect two ports, normalizing direction to output->input
    ///
    /// The endpoints arrive in click order; validation and normalization
    /// decide the stored direction. Nothing is appended unless validation
    /// accepts, so the operation is atomic.
    pub fn add_connection(
        &mut self,
        workflow_id: &str,
        origin_node: &str,
        origin_polarity: PortPolarity,
        target_node: &str,
        target_polarity: PortPolarity,
    ) -> Result<WorkflowConnection> {
        let workflow = self.workflow_mut(workflow_id)?;

        for endpoint in [origin_node, target_node] {
            if workflow.find_node(endpoint).is_none() {
                return Err(EditorError::NodeNotFound {
                    workflow_id: workflow_id.to_string(),
                    node_id: endpoint.to_string(),
                });
            }
        }

        let (from, to) = validate_connection(
            workflow,
            origin_node,
            origin_polarity,
            target_node,
            target_polarity,
        )?;

        let connection = WorkflowConnection {
            id: uuid::Uuid::new_v4().to_string(),
            from_node_id: from,
            to_node_id: to,
        };
        let snapshot = connection.clone();

        workflow.connections.push(connection);
        workflow.modified_at = Utc::now();

        log::debug!(
            "Connected {} -> {} in workflow {}",
            snapshot.from_node_id,
            snapshot.to_node_id,
            workflow_id
        );
        self.emit(EditorEvent::ConnectionAdded {
            workflow_id: workflow_id.to_string(),
            connection_id: snapshot.id.clone(),
        });
        Ok(snapshot)
    }

    /// Remove a single connection by ID
    pub fn remove_connection(
        &mut self,
        workflow_id: &str,
        connection_id: &str,
    ) -> Result<Workflow> {
        let workflow = self.workflow_mut(workflow_id)?;
        let index = workflow
            .connections
            .iter()
            .position(|c| c.id == connection_id)
            .ok_or_else(|| EditorError::ConnectionNotFound {
                workflow_id: workflow_id.to_string(),
                connection_id: connection_id.to_string(),
            })?;

        workflow.connections.remove(index);
        workflow.modified_at = Utc::now();
        let snapshot = workflow.clone();

        self.emit(EditorEvent::ConnectionRemoved {
            workflow_id: workflow_id.to_string(),
            connection_id: connection_id.to_string(),
        });
        Ok(snapshot)
    }

    fn workflow_mut(&mut self, workflow_id: &str) -> Result<&mut Workflow> {
        self.workflows
            .get_mut(workflow_id)
            .ok_or_else(|| EditorError::WorkflowNotFound(workflow_id.to_string()))
    }

    fn random_position(&self) -> Position {
        let mut rng = rand::thread_rng();
        let max_x = (self.bounds.width - NODE_WIDTH - PLACEMENT_MARGIN).max(PLACEMENT_MARGIN);
        let max_y = (self.bounds.height - NODE_HEIGHT - PLACEMENT_MARGIN).max(PLACEMENT_MARGIN);
        Position::new(
            rng.gen_range(PLACEMENT_MARGIN..=max_x),
            rng.gen_range(PLACEMENT_MARGIN..=max_y),
        )
    }

    fn emit(&self, event: EditorEvent) {
        if let Err(e) = self.events.send(event) {
            log::warn!("Failed to deliver editor event: {}", e);
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::VecEventSink;
    use crate::types::NodeId;
    use crate::validation::ConnectionRejection;

    fn store_with_two_nodes() -> (GraphStore, WorkflowId, NodeId, NodeId) {
        let mut store = GraphStore::new();
        let workflow = store.create_workflow("Triage", "");
        let n1 = store
            .add_node(&workflow.id, NodeKind::Input, "File Input", "upload")
            .unwrap();
        let n2 = store
            .add_node(&workflow.id, NodeKind::Analysis, "Static Analysis", "microscope")
            .unwrap();
        (store, workflow.id, n1.id, n2.id)
    }

    #[test]
    fn test_create_workflow_selects_it() {
        let mut store = GraphStore::new();
        let workflow = store.create_workflow("Triage", "Initial sample triage");

        assert_eq!(workflow.name, "Triage");
        assert!(workflow.nodes.is_empty());
        assert!(workflow.connections.is_empty());
        assert_eq!(store.selected_workflow().map(|w| w.id.clone()), Some(workflow.id));
    }

    #[test]
    fn test_delete_workflow_clears_selection() {
        let mut store = GraphStore::new();
        let workflow = store.create_workflow("Triage", "");

        store.delete_workflow(&workflow.id).unwrap();
        assert!(store.selected_workflow().is_none());
        assert!(store.workflow(&workflow.id).is_none());

        assert!(matches!(
            store.delete_workflow(&workflow.id),
            Err(EditorError::WorkflowNotFound(_))
        ));
    }

    #[test]
    fn test_rename_workflow() {
        let mut store = GraphStore::new();
        let workflow = store.create_workflow("Triage", "");

        let renamed = store
            .rename_workflow(&workflow.id, "Deep Dive", "Full unpack and report")
            .unwrap();
        assert_eq!(renamed.name, "Deep Dive");
        assert_eq!(renamed.description, "Full unpack and report");
    }

    #[test]
    fn test_list_workflows_oldest_first() {
        let mut store = GraphStore::new();
        let first = store.create_workflow("First", "");
        let second = store.create_workflow("Second", "");

        let listed: Vec<_> = store.list_workflows().iter().map(|w| w.id.clone()).collect();
        assert_eq!(listed, vec![first.id, second.id]);
    }

    #[test]
    fn test_add_node_places_inside_bounds() {
        let mut store = GraphStore::new().with_canvas_bounds(CanvasBounds {
            width: 800.0,
            height: 600.0,
        });
        let workflow = store.create_workflow("Triage", "");

        for _ in 0..50 {
            let node = store
                .add_node(&workflow.id, NodeKind::Analysis, "YARA Scan", "radar")
                .unwrap();
            assert!(node.position.x >= PLACEMENT_MARGIN);
            assert!(node.position.x <= 800.0 - NODE_WIDTH - PLACEMENT_MARGIN);
            assert!(node.position.y >= PLACEMENT_MARGIN);
            assert!(node.position.y <= 600.0 - NODE_HEIGHT - PLACEMENT_MARGIN);
        }
    }

    #[test]
    fn test_nodes_keep_insertion_order() {
        let (store, wf, n1, n2) = store_with_two_nodes();
        let ids: Vec<_> = store
            .workflow(&wf)
            .unwrap()
            .nodes
            .iter()
            .map(|n| n.id.clone())
            .collect();
        assert_eq!(ids, vec![n1, n2]);
    }

    #[test]
    fn test_move_node_last_write_wins() {
        let (mut store, wf, n1, _) = store_with_two_nodes();

        for (x, y) in [(10.0, 20.0), (55.0, 60.0), (100.0, 100.0)] {
            store.move_node(&wf, &n1, Position::new(x, y)).unwrap();
        }

        let node = store.workflow(&wf).unwrap().find_node(&n1).unwrap();
        assert_eq!(node.position, Position::new(100.0, 100.0));
    }

    #[test]
    fn test_move_missing_node_is_node_not_found() {
        let (mut store, wf, _, _) = store_with_two_nodes();
        let result = store.move_node(&wf, "ghost", Position::new(0.0, 0.0));
        assert!(matches!(result, Err(EditorError::NodeNotFound { .. })));
    }

    #[test]
    fn test_add_connection_normalizes_direction() {
        let (mut store, wf, n1, n2) = store_with_two_nodes();

        // Clicked the input end first; stored direction must still be n1 -> n2
        let connection = store
            .add_connection(&wf, &n2, PortPolarity::Input, &n1, PortPolarity::Output)
            .unwrap();
        assert_eq!(connection.from_node_id, n1);
        assert_eq!(connection.to_node_id, n2);
    }

    #[test]
    fn test_duplicate_connection_rejected_idempotently() {
        let (mut store, wf, n1, n2) = store_with_two_nodes();

        store
            .add_connection(&wf, &n1, PortPolarity::Output, &n2, PortPolarity::Input)
            .unwrap();
        let result =
            store.add_connection(&wf, &n1, PortPolarity::Output, &n2, PortPolarity::Input);

        assert!(matches!(
            result,
            Err(EditorError::InvalidConnection(
                ConnectionRejection::DuplicateConnection
            ))
        ));
        assert_eq!(store.workflow(&wf).unwrap().connections.len(), 1);
    }

    #[test]
    fn test_self_loop_rejected_regardless_of_polarity() {
        let (mut store, wf, n1, _) = store_with_two_nodes();

        for (origin, target) in [
            (PortPolarity::Output, PortPolarity::Input),
            (PortPolarity::Input, PortPolarity::Output),
            (PortPolarity::Output, PortPolarity::Output),
            (PortPolarity::Input, PortPolarity::Input),
        ] {
            let result = store.add_connection(&wf, &n1, origin, &n1, target);
            assert!(matches!(
                result,
                Err(EditorError::InvalidConnection(ConnectionRejection::SelfLoop))
            ));
        }
        assert!(store.workflow(&wf).unwrap().connections.is_empty());
    }

    #[test]
    fn test_connection_to_missing_node_rejected() {
        let (mut store, wf, n1, _) = store_with_two_nodes();
        let result =
            store.add_connection(&wf, &n1, PortPolarity::Output, "ghost", PortPolarity::Input);
        assert!(matches!(result, Err(EditorError::NodeNotFound { .. })));
        assert!(store.workflow(&wf).unwrap().connections.is_empty());
    }

    #[test]
    fn test_delete_node_cascades_exactly_its_connections() {
        let (mut store, wf, n1, n2) = store_with_two_nodes();
        let n3 = store
            .add_node(&wf, NodeKind::Output, "Report Output", "file-text")
            .unwrap();

        store
            .add_connection(&wf, &n1, PortPolarity::Output, &n2, PortPolarity::Input)
            .unwrap();
        let surviving = store
            .add_connection(&wf, &n2, PortPolarity::Output, &n3.id, PortPolarity::Input)
            .unwrap();

        let snapshot = store.delete_node(&wf, &n1).unwrap();

        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.connections.len(), 1);
        assert_eq!(snapshot.connections[0].id, surviving.id);
    }

    #[test]
    fn test_remove_connection() {
        let (mut store, wf, n1, n2) = store_with_two_nodes();
        let connection = store
            .add_connection(&wf, &n1, PortPolarity::Output, &n2, PortPolarity::Input)
            .unwrap();

        let snapshot = store.remove_connection(&wf, &connection.id).unwrap();
        assert!(snapshot.connections.is_empty());

        assert!(matches!(
            store.remove_connection(&wf, &connection.id),
            Err(EditorError::ConnectionNotFound { .. })
        ));
    }

    #[test]
    fn test_one_event_per_committed_mutation() {
        let sink = Arc::new(VecEventSink::new());
        let mut store = GraphStore::new().with_event_sink(sink.clone());

        let workflow = store.create_workflow("Triage", "");
        let n1 = store
            .add_node(&workflow.id, NodeKind::Input, "File Input", "upload")
            .unwrap();
        let n2 = store
            .add_node(&workflow.id, NodeKind::Analysis, "Static Analysis", "microscope")
            .unwrap();
        store
            .move_node(&workflow.id, &n1.id, Position::new(100.0, 100.0))
            .unwrap();
        store
            .add_connection(
                &workflow.id,
                &n1.id,
                PortPolarity::Output,
                &n2.id,
                PortPolarity::Input,
            )
            .unwrap();
        store.delete_node(&workflow.id, &n1.id).unwrap();

        // Rejected mutations must not emit
        let _ = store.add_connection(
            &workflow.id,
            &n2.id,
            PortPolarity::Output,
            &n2.id,
            PortPolarity::Input,
        );

        let events = sink.events();
        assert_eq!(events.len(), 6);
        assert!(matches!(events[0], EditorEvent::WorkflowCreated { .. }));
        assert!(matches!(events[1], EditorEvent::NodeAdded { .. }));
        assert!(matches!(events[2], EditorEvent::NodeAdded { .. }));
        assert!(matches!(events[3], EditorEvent::NodeMoved { .. }));
        assert!(matches!(events[4], EditorEvent::ConnectionAdded { .. }));
        assert!(matches!(events[5], EditorEvent::NodeRemoved { .. }));
    }

    #[test]
    fn test_build_and_tear_down_pipeline() {
        // The end-to-end scenario: wire two nodes, then delete the origin
        let (mut store, wf, n1, n2) = store_with_two_nodes();
        store.move_node(&wf, &n1, Position::new(100.0, 100.0)).unwrap();
        store.move_node(&wf, &n2, Position::new(300.0, 100.0)).unwrap();

        let connection = store
            .add_connection(&wf, &n1, PortPolarity::Output, &n2, PortPolarity::Input)
            .unwrap();
        assert_eq!(connection.from_node_id, n1);
        assert_eq!(connection.to_node_id, n2);
        assert_eq!(store.workflow(&wf).unwrap().connections.len(), 1);

        let snapshot = store.delete_node(&wf, &n1).unwrap();
        assert!(snapshot.connections.is_empty());
    }
}
