//! Node descriptions: bound diffs, constraint diffs, branching record and basis.
//!
//! A description is either *explicit* (it holds the full bounds and the full
//! active constraint list) or *differential* (it holds only what changed
//! relative to its parent). Differential descriptions are resolved by walking
//! the ancestor chain, see [`crate::tree::NodeArena::materialize`].

mod basis;
mod bounds;
mod constraint;

pub use basis::{BasisStatus, WarmStartBasis};
pub use bounds::{BoundDiff, FullBounds, MaterializedBounds, VarBounds};
pub use constraint::{ConstraintDiff, LinearConstraint};

use serde::{Deserialize, Serialize};

/// Direction of the branch that created a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchDirection {
    /// Upper bound tightened.
    Down,

    /// Lower bound tightened.
    Up,
}

impl BranchDirection {
    /// One-letter tag used in trace output.
    pub fn symbol(self) -> char {
        match self {
            BranchDirection::Down => 'D',
            BranchDirection::Up => 'U',
        }
    }
}

/// Branching decision that created a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BranchInfo {
    /// Branched column.
    pub index: usize,

    /// Relaxation value of the column in the parent.
    pub value: f64,

    /// Which child this is.
    pub direction: BranchDirection,
}

/// Per-node description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDesc {
    /// Column bound records.
    pub vars: VarBounds,

    /// Non-core constraint records.
    pub cons: ConstraintDiff,

    /// How this node was created (None for the root).
    pub branch: Option<BranchInfo>,

    /// Warm-start basis owned by this node.
    pub basis: Option<WarmStartBasis>,

    /// True if `vars` and `cons` are complete rather than relative to the parent.
    pub explicit: bool,
}

impl NodeDesc {
    /// Explicit description with the given full bounds.
    pub fn explicit(vars: VarBounds) -> Self {
        Self {
            vars,
            explicit: true,
            ..Default::default()
        }
    }

    /// Differential description with the given bound changes.
    pub fn differential(vars: VarBounds) -> Self {
        Self {
            vars,
            explicit: false,
            ..Default::default()
        }
    }

    /// Trace tag: 'D' or 'U' for branched children, 'R' otherwise.
    pub fn direction_symbol(&self) -> char {
        self.branch.map_or('R', |b| b.direction.symbol())
    }
}
