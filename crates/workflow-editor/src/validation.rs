//! Connection validation
//!
//! Pure predicate layer deciding whether two ports may be joined. The store
//! calls this before committing any connection, so no reachable sequence of
//! gestures can produce a self-loop, a same-polarity edge, or a duplicate.

use thiserror::Error;

use crate::types::{NodeId, PortPolarity, Workflow};

/// Why a requested connection was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConnectionRejection {
    /// Both endpoints are on the same node
    #[error("a node cannot connect to itself")]
    SelfLoop,

    /// Both endpoints have the same polarity
    #[error("connections require one output port and one input port")]
    SamePolarity,

    /// An identical output->input connection already exists
    #[error("these nodes are already connected in this direction")]
    DuplicateConnection,
}

/// Normalize two clicked endpoints into (from, to) direction
///
/// The stored direction is always output->input regardless of which port the
/// user clicked first. Callers must have already ruled out same-polarity
/// pairs.
pub fn normalize_endpoints(
    origin_node: &str,
    origin_polarity: PortPolarity,
    target_node: &str,
) -> (NodeId, NodeId) {
    match origin_polarity {
        PortPolarity::Output => (origin_node.to_string(), target_node.to_string()),
        PortPolarity::Input => (target_node.to_string(), origin_node.to_string()),
    }
}

/// Decide whether the two clicked ports may be joined
///
/// Returns the normalized `(from, to)` pair on acceptance, or the reason for
/// rejection. Order of checks: self-loop, polarity, duplicate.
pub fn validate_connection(
    workflow: &Workflow,
    origin_node: &str,
    origin_polarity: PortPolarity,
    target_node: &str,
    target_polarity: PortPolarity,
) -> Result<(NodeId, NodeId), ConnectionRejection> {
    if origin_node == target_node {
        return Err(ConnectionRejection::SelfLoop);
    }

    if origin_polarity == target_polarity {
        return Err(ConnectionRejection::SamePolarity);
    }

    let (from, to) = normalize_endpoints(origin_node, origin_polarity, target_node);

    if workflow.has_connection(&from, &to) {
        return Err(ConnectionRejection::DuplicateConnection);
    }

    Ok((from, to))
}
