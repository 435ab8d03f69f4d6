//! Tree node representation and status lifecycle.

use serde::{Deserialize, Serialize};

use crate::collab::BranchObject;
use crate::desc::NodeDesc;
use crate::error::{NodeError, NodeResult};

/// Position of a node in the arena.
pub type NodeIndex = usize;

/// Status of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    /// Created, never bounded.
    Candidate,

    /// Bounded at least once, waiting in the pool.
    Evaluated,

    /// Committed to branching, children not yet created.
    Pregnant,

    /// Children created.
    Branched,

    /// Pruned: infeasible, bound exceeded, or integer feasible.
    Fathomed,

    /// Dropped by the runtime.
    Discarded,
}

impl NodeStatus {
    /// True if no further processing is possible.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            NodeStatus::Branched | NodeStatus::Fathomed | NodeStatus::Discarded
        )
    }

    /// Check whether this core may move a node from `self` to `next`.
    pub fn can_transition_to(self, next: NodeStatus) -> bool {
        use NodeStatus::*;
        match (self, next) {
            (Candidate, Evaluated | Pregnant | Fathomed | Discarded) => true,
            (Evaluated, Evaluated | Pregnant | Fathomed | Discarded) => true,
            (Pregnant, Branched | Fathomed | Discarded) => true,
            _ => false,
        }
    }
}

/// A node of the search tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Arena index.
    pub index: NodeIndex,

    /// Parent index (None for the root).
    pub parent: Option<NodeIndex>,

    /// Depth in the tree (0 for root).
    pub depth: usize,

    /// Lifecycle status.
    pub status: NodeStatus,

    /// Sense-adjusted relaxation bound; inherited hint until the first solve.
    pub quality: f64,

    /// Estimate of the best solution in the subtree.
    pub sol_estimate: f64,

    /// Set by the runtime while diving.
    pub diving: bool,

    /// Branching decision selected while bounding.
    pub branch_object: Option<BranchObject>,

    /// Node description.
    pub desc: NodeDesc,
}

impl TreeNode {
    /// Create the root node.
    pub fn root(desc: NodeDesc) -> Self {
        Self {
            index: 0,
            parent: None,
            depth: 0,
            status: NodeStatus::Candidate,
            quality: f64::NEG_INFINITY,
            sol_estimate: f64::NEG_INFINITY,
            diving: false,
            branch_object: None,
            desc,
        }
    }

    /// Move to `status`, rejecting transitions the lifecycle does not allow.
    pub fn set_status(&mut self, status: NodeStatus) -> NodeResult<()> {
        if !self.status.can_transition_to(status) {
            return Err(NodeError::UnexpectedStatus {
                node: self.index,
                status: self.status,
                operation: "status transition",
            });
        }
        self.status = status;
        Ok(())
    }

    /// Parent index for trace output, -1 for the root.
    pub fn parent_tag(&self) -> i64 {
        self.parent.map_or(-1, |p| p as i64)
    }
}
