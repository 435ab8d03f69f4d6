//! Branching strategy interface and the most-fractional rule.

use serde::{Deserialize, Serialize};

use crate::error::NodeResult;
use crate::model::ProblemInfo;
use crate::tree::NodeIndex;

/// A candidate branching decision on one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BranchObject {
    /// Column to branch on.
    pub index: usize,

    /// Current relaxation value.
    pub value: f64,

    /// Upper bound imposed in the down child.
    pub ub_down_branch: f64,

    /// Lower bound imposed in the up child.
    pub lb_up_branch: f64,

    /// Strategy score (higher is better).
    pub score: f64,
}

impl BranchObject {
    /// Integer split at `value`: x <= floor(value) and x >= ceil(value).
    pub fn new(index: usize, value: f64) -> Self {
        Self {
            index,
            value,
            ub_down_branch: value.floor(),
            lb_up_branch: value.ceil(),
            score: 0.0,
        }
    }

    /// Set the score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }
}

/// What a branching strategy sees of the node being bounded.
#[derive(Debug, Clone, Copy)]
pub struct BranchContext<'a> {
    /// Problem structure.
    pub problem: &'a ProblemInfo,

    /// Current relaxation solution.
    pub solution: &'a [f64],

    /// Node index.
    pub node: NodeIndex,

    /// Node depth.
    pub depth: usize,

    /// Integrality tolerance.
    pub integer_tol: f64,
}

/// Trait for branching strategies.
pub trait BranchStrategy {
    /// Candidate branch objects, best first.
    fn create_cand_branch_objects(&mut self, ctx: &BranchContext<'_>) -> NodeResult<Vec<BranchObject>>;
}

/// Branch on the relaxed column whose value is farthest from integral.
#[derive(Debug, Clone, Copy, Default)]
pub struct MostFractionalStrategy;

impl BranchStrategy for MostFractionalStrategy {
    fn create_cand_branch_objects(&mut self, ctx: &BranchContext<'_>) -> NodeResult<Vec<BranchObject>> {
        let mut candidates: Vec<BranchObject> = ctx
            .problem
            .fractional_cols(ctx.solution, ctx.integer_tol)
            .into_iter()
            .map(|(j, value, frac)| BranchObject::new(j, value).with_score(frac))
            .collect();
        // Ties keep column order
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(candidates)
    }
}
