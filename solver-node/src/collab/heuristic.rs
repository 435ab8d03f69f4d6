//! Primal heuristic interface.

use crate::model::{ProblemInfo, Solution};
use crate::tree::NodeIndex;

/// What a heuristic sees of the node being bounded.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicContext<'a> {
    /// Problem structure.
    pub problem: &'a ProblemInfo,

    /// Current relaxation solution.
    pub solution: &'a [f64],

    /// Sense-adjusted relaxation bound.
    pub quality: f64,

    /// Node index.
    pub node: NodeIndex,

    /// Node depth.
    pub depth: usize,
}

/// Trait for heuristics searching for feasible solutions.
pub trait Heuristic {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Try to find a feasible solution near the current relaxation.
    fn search_solution(&mut self, ctx: &HeuristicContext<'_>) -> Option<Solution>;
}
