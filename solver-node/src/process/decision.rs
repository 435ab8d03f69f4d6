//! Branch/constrain/price decision.
//!
//! A pure function of the solve outcome, the node's latest quality, the best
//! known incumbent quality and the infeasibility counts of the relaxation
//! solution. The bounding loop turns the verdict into the four loop flags and
//! dispatches on them.

use crate::error::{NodeError, NodeResult};
use crate::model::Feasibility;
use crate::tree::NodeIndex;

use super::status::SubproblemStatus;

/// Why a node is fathomed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FathomReason {
    /// Relaxation infeasible.
    Infeasible,

    /// Relaxation bound is worse than the incumbent.
    BoundExceeded,

    /// Relaxation solution is integer and conic feasible.
    Feasible,
}

/// What to do with a node after a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Prune the node.
    Fathom(FathomReason),

    /// Split on a fractional column.
    Branch,

    /// Tighten with another round of cuts.
    GenerateConstraints,

    /// No usable solution; put the node back into the pool.
    ReturnToPool,
}

/// The four bounding-loop flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BcpFlags {
    /// Solve again at this node.
    pub keep_bounding: bool,

    /// Branch at this node.
    pub branch: bool,

    /// Run constraint generators.
    pub gen_constraints: bool,

    /// Run column generation.
    pub gen_variables: bool,
}

/// Next step of the bounding loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Generate, filter and install cuts, then solve again.
    GenerateConstraints,

    /// Generate columns, then solve again.
    GenerateVariables,

    /// Stop and hand the node back as evaluated.
    ReturnToPool,

    /// Select a branching object and become pregnant.
    Branch,
}

impl BcpFlags {
    /// Map flags to the next loop step.
    pub fn step(self, node: NodeIndex) -> NodeResult<Step> {
        match self {
            BcpFlags {
                keep_bounding: true,
                gen_constraints: true,
                ..
            } => Ok(Step::GenerateConstraints),
            BcpFlags {
                keep_bounding: true,
                gen_variables: true,
                ..
            } => Ok(Step::GenerateVariables),
            BcpFlags {
                keep_bounding: false,
                branch: false,
                ..
            } => Ok(Step::ReturnToPool),
            BcpFlags {
                keep_bounding: false,
                branch: true,
                ..
            } => Ok(Step::Branch),
            flags => Err(NodeError::InconsistentDecision { node, flags }),
        }
    }
}

/// Result of the decision function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Selected action.
    pub verdict: Verdict,

    /// The solve ended in neither an optimal nor an infeasible status.
    pub solver_failure: bool,
}

impl Decision {
    /// Loop flags for this decision.
    pub fn flags(&self) -> BcpFlags {
        match self.verdict {
            Verdict::Fathom(_) | Verdict::ReturnToPool => BcpFlags::default(),
            Verdict::Branch => BcpFlags {
                branch: true,
                ..Default::default()
            },
            Verdict::GenerateConstraints => BcpFlags {
                keep_bounding: true,
                gen_constraints: true,
                ..Default::default()
            },
        }
    }

    /// The relaxation solution should be submitted to the incumbent store.
    pub fn record_solution(&self) -> bool {
        self.verdict == Verdict::Fathom(FathomReason::Feasible)
    }
}

/// Inputs of the decision function.
#[derive(Debug, Clone, Copy)]
pub struct DecisionInput {
    /// Solve outcome.
    pub status: SubproblemStatus,

    /// Node quality after the solve.
    pub quality: f64,

    /// Best known incumbent quality.
    pub best_quality: f64,

    /// Infeasibility counts; None if the solver returned no usable solution.
    pub feasibility: Option<Feasibility>,
}

/// Decide between fathoming, branching and generating constraints.
pub fn branch_constrain_or_price(input: DecisionInput) -> Decision {
    if input.status.is_infeasible() {
        return Decision {
            verdict: Verdict::Fathom(FathomReason::Infeasible),
            solver_failure: false,
        };
    }
    let solver_failure = input.status.is_failure();

    let verdict = match input.feasibility {
        None => Verdict::ReturnToPool,
        Some(f) if f.cols_infeasible > 0 => Verdict::Branch,
        // Quality of a failed solve is not a bound: neither prune nor accept on it
        Some(_) if solver_failure => Verdict::ReturnToPool,
        Some(f) if f.rows_infeasible > 0 => {
            if input.quality > input.best_quality {
                Verdict::Fathom(FathomReason::BoundExceeded)
            } else {
                Verdict::GenerateConstraints
            }
        }
        Some(_) => Verdict::Fathom(FathomReason::Feasible),
    };
    Decision {
        verdict,
        solver_failure,
    }
}
