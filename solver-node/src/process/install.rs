//! Loading a node's subproblem into the relaxation solver.

use crate::collab::{RelaxationSolver, RowCut};
use crate::desc::LinearConstraint;
use crate::error::NodeResult;
use crate::model::ProblemInfo;
use crate::tree::{NodeArena, NodeIndex};

/// What an installation did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallSummary {
    /// Non-core rows deleted from the previous node.
    pub rows_deleted: usize,

    /// Cuts installed for this node.
    pub cuts_installed: usize,

    /// A stored basis was accepted by the solver.
    pub basis_restored: bool,
}

/// Reset `solver` to the subproblem of node `index`.
///
/// Afterwards the solver holds exactly the core rows, this node's active
/// cuts, this node's column bounds and (if stored) this node's basis.
pub fn install_subproblem<S: RelaxationSolver + ?Sized>(
    solver: &mut S,
    problem: &ProblemInfo,
    arena: &NodeArena,
    index: NodeIndex,
    rampup: bool,
) -> NodeResult<InstallSummary> {
    let mut summary = InstallSummary::default();

    // Drop cuts left by the previous node
    let num_rows = solver.num_rows();
    if num_rows > problem.num_core_rows {
        let rows: Vec<usize> = (problem.num_core_rows..num_rows).collect();
        solver.delete_rows(&rows)?;
        summary.rows_deleted = rows.len();
    }

    let sub = arena.materialize(index, problem.num_cols, rampup)?;
    let bounds = sub.bounds.effective();
    solver.set_col_lower(&bounds.lower)?;
    solver.set_col_upper(&bounds.upper)?;

    if !sub.constraints.is_empty() {
        let cuts: Vec<RowCut> = sub
            .constraints
            .iter()
            .map(LinearConstraint::to_row_cut)
            .collect();
        solver.apply_row_cuts(&cuts)?;
        summary.cuts_installed = cuts.len();
    }

    if let Some(basis) = &arena.get(index)?.desc.basis {
        summary.basis_restored = solver.set_warm_start(basis);
        if !summary.basis_restored {
            log::warn!(
                target: "solver_node::process",
                "Node {}: stored basis refused, solving cold",
                index
            );
        }
    }

    log::debug!(
        target: "solver_node::process",
        "Node {}: installed ({} rows deleted, {} cuts)",
        index,
        summary.rows_deleted,
        summary.cuts_installed
    );
    Ok(summary)
}
