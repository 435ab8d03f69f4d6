//! Cut admission filter.
//!
//! Screens generated constraints before they reach the solver:
//! - Empty rows
//! - Rows whose coefficients are all exactly zero
//! - Cuts violated by less than the tail-off tolerance
//! - Optionally, dense or badly scaled rows
//!
//! Admitted cuts go to the solver in one batch and the warm-start basis is
//! extended with the new rows marked basic.

use crate::collab::{RelaxationSolver, RowCut};
use crate::desc::{BasisStatus, LinearConstraint};
use crate::error::{NodeError, NodeResult};
use crate::settings::NodeSettings;
use crate::tree::TreeNode;

/// Reason a cut was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No coefficients.
    Empty,

    /// More nonzeros than allowed.
    Dense,

    /// Every coefficient is exactly zero.
    AllZero,

    /// Largest/smallest coefficient ratio above the limit.
    BadlyScaled,

    /// Violation below tail-off.
    Weak,
}

/// Admission thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutFilter {
    /// Minimum violation.
    pub tail_off: f64,

    /// Maximum nonzeros (None = unlimited).
    pub dense_limit: Option<usize>,

    /// Maximum coefficient ratio (None = unchecked).
    pub scale_limit: Option<f64>,
}

impl CutFilter {
    /// Build a filter from settings.
    pub fn from_settings(settings: &NodeSettings) -> Self {
        Self {
            tail_off: settings.tail_off,
            dense_limit: settings.dense_con_limit,
            scale_limit: settings
                .reject_badly_scaled
                .then_some(settings.scale_con_factor),
        }
    }

    /// Decide whether `con` may be added against the solution `x`.
    pub fn screen(&self, con: &LinearConstraint, x: &[f64]) -> Result<(), Rejection> {
        if con.is_empty() {
            return Err(Rejection::Empty);
        }
        if self.dense_limit.is_some_and(|limit| con.len() > limit) {
            return Err(Rejection::Dense);
        }
        let (min_elem, max_elem) = con.magnitude_range().ok_or(Rejection::AllZero)?;
        if self.scale_limit.is_some_and(|limit| max_elem / min_elem > limit) {
            return Err(Rejection::BadlyScaled);
        }
        if con.violation(x) < self.tail_off {
            return Err(Rejection::Weak);
        }
        Ok(())
    }
}

/// Counts from one admission round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdmissionSummary {
    /// Constraints offered.
    pub generated: usize,

    /// Constraints installed.
    pub admitted: usize,

    /// Rejected as too weak.
    pub weak: usize,
}

/// Filter `constraints`, install the survivors and repair the basis.
///
/// Admitted constraints are recorded in the node's description so that
/// descendants inherit them.
pub fn apply_constraints<S: RelaxationSolver + ?Sized>(
    solver: &mut S,
    node: &mut TreeNode,
    constraints: Vec<LinearConstraint>,
    x: &[f64],
    filter: &CutFilter,
) -> NodeResult<AdmissionSummary> {
    let mut summary = AdmissionSummary {
        generated: constraints.len(),
        ..Default::default()
    };

    let mut admitted = Vec::with_capacity(constraints.len());
    for con in constraints {
        match filter.screen(&con, x) {
            Ok(()) => admitted.push(con),
            Err(Rejection::Weak) => {
                summary.weak += 1;
                log::debug!(
                    target: "solver_node::cut",
                    "Cut ignored, violation {:.3e} below tail-off",
                    con.violation(x)
                );
            }
            Err(reason) => {
                log::debug!(target: "solver_node::cut", "Cut rejected: {:?}", reason);
            }
        }
    }
    summary.admitted = admitted.len();

    if !admitted.is_empty() {
        let basis = solver.warm_start();
        let num_rows = solver.num_rows();
        let num_cols = solver.num_cols();

        let cuts: Vec<RowCut> = admitted.iter().map(LinearConstraint::to_row_cut).collect();
        solver.apply_row_cuts(&cuts)?;

        if let Some(mut ws) = basis {
            ws.resize(num_rows + cuts.len(), num_cols);
            for row in num_rows..num_rows + cuts.len() {
                ws.set_artif_status(row, BasisStatus::Basic);
            }
            if !solver.set_warm_start(&ws) {
                log::warn!(
                    target: "solver_node::cut",
                    "Node {}: solver refused basis after adding {} cuts",
                    node.index,
                    cuts.len()
                );
                return Err(NodeError::SolverRejected(
                    "warm start refused after cut installation".to_string(),
                ));
            }
        }
        node.desc.cons.added.extend(admitted);
    }

    log::debug!(
        target: "solver_node::cut",
        "Node {}: {} out of {} cuts added to the solver",
        node.index,
        summary.admitted,
        summary.generated
    );
    Ok(summary)
}
