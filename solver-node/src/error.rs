//! Error types for node processing.

use thiserror::Error;

use crate::process::BcpFlags;
use crate::tree::{NodeIndex, NodeStatus};

/// Errors that can occur while processing a node.
#[derive(Error, Debug)]
pub enum NodeError {
    /// Problem description is inconsistent.
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    /// An operation was invoked on a node in a status it does not accept.
    #[error("Node {node}: unexpected status {status:?} in {operation}")]
    UnexpectedStatus {
        /// Node the operation was invoked on.
        node: NodeIndex,
        /// Status found at entry.
        status: NodeStatus,
        /// Operation that rejected the node.
        operation: &'static str,
    },

    /// The branch/constrain/price decision produced an unreachable combination.
    #[error("Node {node}: inconsistent bounding decision {flags:?}")]
    InconsistentDecision {
        /// Node being bounded.
        node: NodeIndex,
        /// Offending flag combination.
        flags: BcpFlags,
    },

    /// Node index is not present in the arena.
    #[error("Unknown node {0}")]
    UnknownNode(NodeIndex),

    /// A node description cannot be replayed against its ancestors.
    #[error("Node {node}: invalid description diff: {reason}")]
    InvalidDiff {
        /// Node whose diff is broken.
        node: NodeIndex,
        /// What went wrong.
        reason: String,
    },

    /// Allocation of working storage failed.
    #[error("Out of memory allocating {what} ({requested} entries)")]
    OutOfMemory {
        /// Buffer being sized.
        what: &'static str,
        /// Number of entries requested.
        requested: usize,
    },

    /// Relaxation solver refused bounds, rows or a basis.
    #[error("Relaxation solver rejected request: {0}")]
    SolverRejected(String),

    /// Operation is part of the interface but not provided by this core.
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    /// Encoding or decoding a node failed.
    #[error("Node codec failed: {0}")]
    Codec(#[from] serde_cbor::Error),

    /// Encoded node was produced by an incompatible wire format.
    #[error("Wire format version {found} does not match expected {expected}")]
    WireVersion {
        /// Version found in the payload.
        found: u16,
        /// Version this build reads.
        expected: u16,
    },
}

/// Result type for node operations.
pub type NodeResult<T> = Result<T, NodeError>;

/// Reserve a vector of exactly `len` entries, reporting allocation failure.
pub(crate) fn try_vec<T>(len: usize, what: &'static str) -> NodeResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| NodeError::OutOfMemory { what, requested: len })?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NodeError::UnexpectedStatus {
            node: 7,
            status: NodeStatus::Fathomed,
            operation: "process",
        };
        let msg = err.to_string();
        assert!(msg.contains("Node 7"));
        assert!(msg.contains("Fathomed"));
        assert!(msg.contains("process"));

        let err = NodeError::Unsupported("variable generation");
        assert!(err.to_string().contains("variable generation"));
    }

    #[test]
    fn test_try_vec() {
        let v: Vec<f64> = try_vec(16, "test buffer").unwrap();
        assert!(v.capacity() >= 16);
        assert!(v.is_empty());

        let err = try_vec::<f64>(usize::MAX, "huge buffer").unwrap_err();
        assert!(matches!(err, NodeError::OutOfMemory { what: "huge buffer", .. }));
    }
}
