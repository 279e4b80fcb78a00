//! Magnetic port snapping
//!
//! While a connection is being drawn, the free endpoint is attracted to the
//! nearest compatible port within a fixed radius. Resolution is a pure
//! query over the workflow snapshot; nothing here mutates state.

use serde::{Deserialize, Serialize};

use crate::types::{NodeId, PortPolarity, Position, Workflow};

/// Maximum distance at which a free endpoint attaches to a port, in canvas
/// units
pub const SNAP_RADIUS: f64 = 30.0;

/// A port identified as a snap candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortRef {
    /// Node owning the port
    pub node_id: NodeId,
    /// Polarity of the port
    pub polarity: PortPolarity,
}

/// Resolved endpoint for the live connection preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapResult {
    /// Where the renderer should draw the free endpoint
    pub endpoint: Position,
    /// The candidate port, if one was within the snap radius
    pub target: Option<PortRef>,
}

impl SnapResult {
    /// An unsnapped result at the raw cursor position
    pub fn free(cursor: Position) -> Self {
        Self {
            endpoint: cursor,
            target: None,
        }
    }
}

/// Find the nearest compatible port within the snap radius
///
/// Scans ports of the polarity opposite to `origin_polarity` on every node
/// except the origin node, in workflow insertion order. A port wins only if
/// its distance is strictly below the current best (initially `SNAP_RADIUS`),
/// so on an exact tie the first port in insertion order is kept. Returns the
/// raw cursor position when nothing is in range.
///
/// The linear scan is fine for hand-built pipelines; a spatial index would
/// only matter at graph sizes this editor never sees.
pub fn resolve(
    workflow: &Workflow,
    origin_node: &str,
    origin_polarity: PortPolarity,
    cursor: Position,
) -> SnapResult {
    let wanted = origin_polarity.opposite();

    let mut best_distance = SNAP_RADIUS;
    let mut best: Option<(Position, PortRef)> = None;

    for node in &workflow.nodes {
        if node.id == origin_node {
            continue;
        }
        let anchor = node.port_anchor(wanted);
        let distance = cursor.distance_to(anchor);
        if distance < best_distance {
            best_distance = distance;
            best = Some((
                anchor,
                PortRef {
                    node_id: node.id.clone(),
                    polarity: wanted,
                },
            ));
        }
    }

    match best {
        Some((anchor, port)) => SnapResult {
            endpoint: anchor,
            target: Some(port),
        },
        None => SnapResult::free(cursor),
    }
}
