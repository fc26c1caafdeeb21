use thiserror::Error;

use crate::graph::{NodeId, OpeningId, WallId};

/// Top-level error type for the wallplan engine.
#[derive(Debug, Error)]
pub enum WallplanError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Errors related to graph references and invariants.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("wall not found: {0}")]
    WallNotFound(WallId),

    #[error("opening not found: {0}")]
    OpeningNotFound(OpeningId),

    #[error("node {node} lists wall {wall} which does not reference it")]
    DanglingConnection { node: NodeId, wall: WallId },

    #[error("wall {wall} references node {node} which does not list it")]
    UnregisteredWall { node: NodeId, wall: WallId },

    #[error("node {0} has no connected walls")]
    OrphanNode(NodeId),

    #[error("opening {opening} on wall {wall} is outside the wall bounds")]
    OpeningOutOfBounds { wall: WallId, opening: OpeningId },
}

/// Errors raised when an edit is declined.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("segment too short: {length:.3}px < {min}px")]
    SegmentTooShort { length: f64, min: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("no intersection: {0}")]
    NoIntersection(String),
}

/// Errors from loading or saving graphs and configuration.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for results using [`WallplanError`].
pub type Result<T> = std::result::Result<T, WallplanError>;
