//! Pointer-driven interaction state machine
//!
//! Consumes raw pointer events and drives the store, the validator, and the
//! snap resolver. The state is a tagged enum, so "dragging a node" and
//! "drawing a connection" are mutually exclusive by construction; no
//! combination of flags can represent both at once.
//!
//! Hit-testing belongs to the renderer: it translates a raw pointer position
//! into a [`HitTarget`] before handing the event to the controller.

use crate::snap::{self, SnapResult};
use crate::store::GraphStore;
use crate::types::{NodeId, PortPolarity, Position, WorkflowId};
use crate::EditorError;

/// What the pointer landed on, as resolved by the renderer's hit-testing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// The body of a node (not one of its ports)
    NodeBody(NodeId),
    /// A port on a node
    Port(NodeId, PortPolarity),
    /// Empty canvas
    Canvas,
}

/// Current interaction state
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// No gesture in progress
    Idle,
    /// A node is being dragged
    DraggingNode {
        node_id: NodeId,
        /// Pointer position minus node position at grab time, so the node
        /// doesn't jump under the cursor
        grab_offset: Position,
    },
    /// A connection is being drawn from a port, awaiting its second endpoint
    DrawingConnection {
        origin_node_id: NodeId,
        origin_polarity: PortPolarity,
        /// Live endpoint for the renderer's dashed preview path
        preview: SnapResult,
    },
}

/// Finite-state machine consuming pointer events for the selected workflow
///
/// Drag positions are committed to the store incrementally on every move
/// event; a connection draft touches the store only when it completes.
pub struct InteractionController {
    state: Interaction,
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            state: Interaction::Idle,
        }
    }

    /// Current interaction state
    pub fn state(&self) -> &Interaction {
        &self.state
    }

    /// Live preview endpoint while drawing a connection, for the renderer
    pub fn connection_preview(&self) -> Option<&SnapResult> {
        match &self.state {
            Interaction::DrawingConnection { preview, .. } => Some(preview),
            _ => None,
        }
    }

    /// Handle a pointer-down event on the given hit target
    pub fn pointer_down(&mut self, store: &mut GraphStore, hit: HitTarget, pos: Position) {
        let state = std::mem::replace(&mut self.state, Interaction::Idle);
        self.state = match (state, hit) {
            (Interaction::Idle, HitTarget::NodeBody(node_id)) => {
                Self::begin_drag(store, node_id, pos)
            }
            (Interaction::Idle, HitTarget::Port(node_id, polarity)) => {
                Self::begin_connection(store, node_id, polarity)
            }
            (Interaction::Idle, HitTarget::Canvas) => Interaction::Idle,
            (
                Interaction::DrawingConnection {
                    origin_node_id,
                    origin_polarity,
                    preview,
                },
                HitTarget::Port(target_node, target_polarity),
            ) => Self::complete_connection(
                store,
                origin_node_id,
                origin_polarity,
                preview,
                target_node,
                target_polarity,
            ),
            (Interaction::DrawingConnection { .. }, HitTarget::Canvas) => {
                log::debug!("Connection draft discarded on canvas click");
                Interaction::Idle
            }
            // Clicking a node body while drawing neither completes nor
            // cancels the draft
            (drawing @ Interaction::DrawingConnection { .. }, HitTarget::NodeBody(_)) => drawing,
            // The pointer is already down while dragging
            (dragging @ Interaction::DraggingNode { .. }, _) => dragging,
        };
    }

    /// Handle a pointer-move event
    pub fn pointer_move(&mut self, store: &mut GraphStore, pos: Position) {
        match &self.state {
            Interaction::Idle => {}
            Interaction::DraggingNode {
                node_id,
                grab_offset,
            } => {
                let node_id = node_id.clone();
                let grab_offset = *grab_offset;

                let Some(workflow_id) = selected_id(store) else {
                    self.state = Interaction::Idle;
                    return;
                };
                let target = pos.offset_from(grab_offset);
                match store.move_node(&workflow_id, &node_id, target) {
                    Ok(_) => {}
                    Err(EditorError::NodeNotFound { .. }) => {
                        // Node deleted mid-drag; drop the gesture
                        log::debug!("Dragged node vanished, ending drag");
                        self.state = Interaction::Idle;
                    }
                    Err(e) => {
                        log::warn!("Move failed, ending drag: {}", e);
                        self.state = Interaction::Idle;
                    }
                }
            }
            Interaction::DrawingConnection {
                origin_node_id,
                origin_polarity,
                ..
            } => {
                let origin_node_id = origin_node_id.clone();
                let origin_polarity = *origin_polarity;

                let Some(workflow) = store.selected_workflow() else {
                    self.state = Interaction::Idle;
                    return;
                };
                let preview = snap::resolve(workflow, &origin_node_id, origin_polarity, pos);
                if let Interaction::DrawingConnection { preview: slot, .. } = &mut self.state {
                    *slot = preview;
                }
            }
        }
    }

    /// Handle pointer release or loss of pointer capture
    ///
    /// Ends a drag (positions were already committed incrementally). A
    /// connection draft survives release: the protocol is click-to-start,
    /// click-to-complete.
    pub fn pointer_up(&mut self) {
        if matches!(self.state, Interaction::DraggingNode { .. }) {
            self.state = Interaction::Idle;
        }
    }

    /// Explicit cancel (Escape key or equivalent)
    ///
    /// Returns to idle from any state, discarding an uncommitted draft.
    pub fn cancel(&mut self) {
        self.state = Interaction::Idle;
    }

    fn begin_drag(store: &GraphStore, node_id: NodeId, pos: Position) -> Interaction {
        let Some(workflow) = store.selected_workflow() else {
            return Interaction::Idle;
        };
        let Some(node) = workflow.find_node(&node_id) else {
            return Interaction::Idle;
        };
        Interaction::DraggingNode {
            grab_offset: pos.offset_from(node.position),
            node_id,
        }
    }

    fn begin_connection(store: &GraphStore, node_id: NodeId, polarity: PortPolarity) -> Interaction {
        let Some(workflow) = store.selected_workflow() else {
            return Interaction::Idle;
        };
        let Some(node) = workflow.find_node(&node_id) else {
            return Interaction::Idle;
        };
        Interaction::DrawingConnection {
            preview: SnapResult::free(node.port_anchor(polarity)),
            origin_node_id: node_id,
            origin_polarity: polarity,
        }
    }

    fn complete_connection(
        store: &mut GraphStore,
        origin_node_id: NodeId,
        origin_polarity: PortPolarity,
        preview: SnapResult,
        target_node: NodeId,
        target_polarity: PortPolarity,
    ) -> Interaction {
        let Some(workflow_id) = selected_id(store) else {
            return Interaction::Idle;
        };

        match store.add_connection(
            &workflow_id,
            &origin_node_id,
            origin_polarity,
            &target_node,
            target_polarity,
        ) {
            Ok(_) => Interaction::Idle,
            Err(EditorError::InvalidConnection(reason)) => {
                // Stay in the draft so the user can pick another port
                log::debug!("Connection rejected ({}), still drawing", reason);
                Interaction::DrawingConnection {
                    origin_node_id,
                    origin_polarity,
                    preview,
                }
            }
            Err(e) => {
                // Origin or target vanished; nothing left to connect to
                log::debug!("Connection draft discarded: {}", e);
                Interaction::Idle
            }
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

fn selected_id(store: &GraphStore) -> Option<WorkflowId> {
    store.selected_workflow().map(|w| w.id.clone())
}
