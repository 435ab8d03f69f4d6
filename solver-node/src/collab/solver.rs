//! Relaxation solver interface.

use sprs::CsVec;

use crate::desc::WarmStartBasis;
use crate::error::NodeResult;

/// A row cut in solver-native form: `lb <= row^T x <= ub`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowCut {
    /// Row coefficients.
    pub row: CsVec<f64>,

    /// Lower side.
    pub lb: f64,

    /// Upper side.
    pub ub: f64,
}

/// Trait for the LP or conic solver holding a node's continuous relaxation.
///
/// One instance is owned per worker and reused across nodes. The installer
/// resets it for each node by:
/// - Deleting all non-core rows
/// - Loading the node's column bounds
/// - Applying the node's active cuts
/// - Restoring the node's warm-start basis
pub trait RelaxationSolver {
    /// Re-optimize the current relaxation.
    fn resolve(&mut self);

    /// Solve was abandoned due to numerical trouble.
    fn is_abandoned(&self) -> bool;

    /// Relaxation solved to optimality.
    fn is_proven_optimal(&self) -> bool;

    /// Relaxation proven primal infeasible.
    fn is_proven_primal_infeasible(&self) -> bool;

    /// Relaxation proven dual infeasible.
    fn is_proven_dual_infeasible(&self) -> bool;

    /// Primal objective limit reached.
    fn is_primal_objective_limit_reached(&self) -> bool;

    /// Dual objective limit reached.
    fn is_dual_objective_limit_reached(&self) -> bool;

    /// Iteration limit reached.
    fn is_iteration_limit_reached(&self) -> bool;

    /// Objective value of the last solve (raw, not sense-adjusted).
    fn obj_value(&self) -> f64;

    /// Column values of the last solve.
    fn col_solution(&self) -> &[f64];

    /// Number of columns.
    fn num_cols(&self) -> usize;

    /// Number of rows, core and cuts.
    fn num_rows(&self) -> usize;

    /// Replace all column lower bounds.
    fn set_col_lower(&mut self, lower: &[f64]) -> NodeResult<()>;

    /// Replace all column upper bounds.
    fn set_col_upper(&mut self, upper: &[f64]) -> NodeResult<()>;

    /// Snapshot of the current basis, if the solver has one.
    fn warm_start(&self) -> Option<WarmStartBasis>;

    /// Install a basis. Returns false if the solver refuses it.
    fn set_warm_start(&mut self, basis: &WarmStartBasis) -> bool;

    /// Append rows.
    fn apply_row_cuts(&mut self, cuts: &[RowCut]) -> NodeResult<()>;

    /// Delete rows by index.
    fn delete_rows(&mut self, rows: &[usize]) -> NodeResult<()>;
}
