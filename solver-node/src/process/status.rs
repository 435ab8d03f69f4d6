//! Classification of a relaxation solve.

use crate::collab::RelaxationSolver;

/// Outcome of solving a node's relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubproblemStatus {
    /// Solved to optimality.
    Optimal,

    /// Proven primal infeasible (or flagged by the objective sentinel).
    PrimalInfeasible,

    /// Proven dual infeasible.
    DualInfeasible,

    /// Primal objective limit reached.
    PrimalObjLimit,

    /// Dual objective limit reached.
    DualObjLimit,

    /// Iteration limit reached.
    IterationLimit,

    /// Solver gave up.
    Abandoned,

    /// Solver reported nothing recognizable.
    Unknown,
}

impl SubproblemStatus {
    /// Read the status flags of a solver after `resolve`, in priority order.
    pub fn from_solver<S: RelaxationSolver + ?Sized>(solver: &S) -> Self {
        if solver.is_abandoned() {
            SubproblemStatus::Abandoned
        } else if solver.is_proven_optimal() {
            SubproblemStatus::Optimal
        } else if solver.is_proven_primal_infeasible() {
            SubproblemStatus::PrimalInfeasible
        } else if solver.is_proven_dual_infeasible() {
            SubproblemStatus::DualInfeasible
        } else if solver.is_primal_objective_limit_reached() {
            SubproblemStatus::PrimalObjLimit
        } else if solver.is_dual_objective_limit_reached() {
            SubproblemStatus::DualObjLimit
        } else if solver.is_iteration_limit_reached() {
            SubproblemStatus::IterationLimit
        } else {
            SubproblemStatus::Unknown
        }
    }

    /// Relaxation proven infeasible in either sense.
    pub fn is_infeasible(self) -> bool {
        matches!(
            self,
            SubproblemStatus::PrimalInfeasible | SubproblemStatus::DualInfeasible
        )
    }

    /// Anything other than a clean optimal or infeasible result.
    pub fn is_failure(self) -> bool {
        !matches!(self, SubproblemStatus::Optimal) && !self.is_infeasible()
    }
}
