//! Constraint generator interface, activation policy and statistics.

use std::time::Duration;

use crate::error::NodeResult;
use crate::model::ProblemInfo;
use crate::settings::CutStrategy;
use crate::tree::NodeIndex;

use super::pool::ConstraintPool;

/// What a generator sees of the node being bounded.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorContext<'a> {
    /// Problem structure.
    pub problem: &'a ProblemInfo,

    /// Current relaxation solution.
    pub solution: &'a [f64],

    /// Node index.
    pub node: NodeIndex,

    /// Node depth.
    pub depth: usize,
}

/// Trait for cut generators.
pub trait ConstraintGenerator {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Add cuts separating the current solution to `pool`.
    ///
    /// Returns true if the relaxation may need to be re-solved.
    fn generate_constraints(
        &mut self,
        ctx: &GeneratorContext<'_>,
        pool: &mut ConstraintPool,
    ) -> NodeResult<bool>;
}

/// Per-generator counters, for reporting only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeneratorStats {
    /// Total time spent generating.
    pub time: Duration,

    /// Number of calls.
    pub calls: u64,

    /// Number of calls that produced nothing.
    pub no_cons_calls: u64,

    /// Total constraints produced.
    pub cons_generated: u64,
}

impl GeneratorStats {
    /// Account for one call.
    pub fn record(&mut self, elapsed: Duration, generated: usize) {
        self.time += elapsed;
        self.calls += 1;
        if generated == 0 {
            self.no_cons_calls += 1;
        } else {
            self.cons_generated += generated as u64;
        }
    }
}

/// Node attributes the activation policy depends on.
#[derive(Debug, Clone, Copy)]
pub struct ActivationInput {
    /// Node index.
    pub index: NodeIndex,

    /// Node depth.
    pub depth: usize,

    /// Runtime is diving.
    pub diving: bool,

    /// Depth limit for `CutStrategy::Auto`.
    pub max_depth: usize,
}

/// Decide whether a generator with `strategy` runs at a node.
pub fn decide_using_generator(strategy: CutStrategy, node: ActivationInput) -> bool {
    match strategy {
        CutStrategy::Disabled => false,
        CutStrategy::Root => node.depth == 0,
        CutStrategy::Auto => node.depth < node.max_depth && (!node.diving || node.depth == 0),
        CutStrategy::Periodic { frequency } => {
            frequency != 0 && (node.index as u64) % frequency == 0
        }
    }
}

/// A registered generator with its strategy and statistics.
pub struct GeneratorSlot {
    /// The generator.
    pub generator: Box<dyn ConstraintGenerator>,

    /// Own strategy; None falls back to the processor default.
    pub strategy: Option<CutStrategy>,

    /// Accumulated statistics.
    pub stats: GeneratorStats,
}

impl GeneratorSlot {
    /// Wrap a generator.
    pub fn new(generator: Box<dyn ConstraintGenerator>) -> Self {
        Self {
            generator,
            strategy: None,
            stats: GeneratorStats::default(),
        }
    }

    /// Give the generator its own activation strategy.
    pub fn with_strategy(mut self, strategy: CutStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// True once the generator has come up empty more than `limit` times.
    pub fn exhausted(&self, limit: Option<u64>) -> bool {
        limit.is_some_and(|limit| self.stats.no_cons_calls > limit)
    }
}
