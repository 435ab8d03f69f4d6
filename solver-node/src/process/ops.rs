//! Per-problem-family node operations.

use crate::collab::{ConstraintPool, VariablePool};
use crate::error::{NodeError, NodeResult};
use crate::tree::{ChildNode, NodeArena, NodeIndex, TreeNode};

use super::install::InstallSummary;
use super::processor::ProcessContext;
use super::status::SubproblemStatus;

/// Operations the bounding loop is built from.
///
/// One implementation per problem family; [`crate::NodeProcessor`] is the
/// implementation for mixed-integer conic problems.
pub trait NodeOps {
    /// Load node `index` into the relaxation solver.
    fn install_subproblem(
        &mut self,
        arena: &NodeArena,
        index: NodeIndex,
        rampup: bool,
    ) -> NodeResult<InstallSummary>;

    /// Solve the installed relaxation and update the node's quality.
    fn bound(&mut self, node: &mut TreeNode) -> NodeResult<SubproblemStatus>;

    /// Run the active generators; returns the number of constraints added to `pool`.
    fn generate_constraints(
        &mut self,
        node: &TreeNode,
        solution: &[f64],
        pool: &mut ConstraintPool,
    ) -> NodeResult<usize>;

    /// Run column generation; returns the number of columns added to `pool`.
    fn generate_variables(
        &mut self,
        _node: &TreeNode,
        _pool: &mut VariablePool,
    ) -> NodeResult<usize> {
        Err(NodeError::Unsupported("variable generation"))
    }

    /// Pick the branching object on the node itself instead of via a strategy.
    fn choose_branching_object(&mut self, _node: &mut TreeNode) -> NodeResult<()> {
        Err(NodeError::Unsupported("choose branching object"))
    }

    /// Create the children of a pregnant node.
    ///
    /// Returns None if the node was fathomed instead.
    fn branch(
        &mut self,
        arena: &mut NodeArena,
        index: NodeIndex,
        ctx: &ProcessContext<'_>,
    ) -> NodeResult<Option<[ChildNode; 2]>>;
}
