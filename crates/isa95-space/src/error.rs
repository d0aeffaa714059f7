//! Error types for address-space operations.

use crate::node::NodeId;

/// Errors raised while building or mutating the address space.
#[derive(Debug, thiserror::Error)]
pub enum SpaceError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("node already exists: {0}")]
    DuplicateNode(NodeId),

    #[error("unknown namespace: {0}")]
    UnknownNamespace(String),

    #[error("invalid node id: {0:?}")]
    InvalidNodeId(String),

    #[error("invalid version: {0:?}")]
    InvalidVersion(String),

    #[error("reference type expected, {0} is not one")]
    NotAReferenceType(NodeId),

    /// A node-set document is malformed or inconsistent.
    #[error("node-set error: {0}")]
    NodeSet(String),
}
