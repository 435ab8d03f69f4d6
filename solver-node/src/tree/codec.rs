//! Encoding nodes for transfer between workers.
//!
//! A node travels with its own description only. Differential nodes stay
//! relative to their parent index, so the receiving arena must already hold
//! the ancestor chain up to an explicit node.

use serde::{Deserialize, Serialize};

use crate::error::{NodeError, NodeResult};

use super::arena::NodeArena;
use super::node::{NodeIndex, TreeNode};

/// Version of the node wire format.
pub const WIRE_VERSION: u16 = 1;

#[derive(Serialize)]
struct EncodedRef<'a> {
    version: u16,
    node: &'a TreeNode,
}

#[derive(Deserialize)]
struct Encoded {
    version: u16,
    node: TreeNode,
}

/// Pack a node into bytes.
pub fn encode(node: &TreeNode) -> NodeResult<Vec<u8>> {
    let bytes = serde_cbor::to_vec(&EncodedRef {
        version: WIRE_VERSION,
        node,
    })?;
    log::debug!(
        target: "solver_node::codec",
        "Node {} encoded ({} bytes)",
        node.index,
        bytes.len()
    );
    Ok(bytes)
}

/// Unpack a node from bytes.
pub fn decode(bytes: &[u8]) -> NodeResult<TreeNode> {
    let encoded: Encoded = serde_cbor::from_slice(bytes)?;
    if encoded.version != WIRE_VERSION {
        return Err(NodeError::WireVersion {
            found: encoded.version,
            expected: WIRE_VERSION,
        });
    }
    log::debug!(target: "solver_node::codec", "Node {} decoded", encoded.node.index);
    Ok(encoded.node)
}

impl NodeArena {
    /// Encode the node at `index`.
    pub fn encode_node(&self, index: NodeIndex) -> NodeResult<Vec<u8>> {
        encode(self.get(index)?)
    }

    /// Decode a node and store it under its original index, replacing any occupant.
    pub fn insert_decoded(&mut self, bytes: &[u8]) -> NodeResult<NodeIndex> {
        let node = decode(bytes)?;
        Ok(self.place(node))
    }
}
