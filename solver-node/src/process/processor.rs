//! Node processor: bounding loop and branch operator.

use std::time::Instant;

use crate::collab::{
    decide_using_generator, ActivationInput, BranchContext, BranchStrategy, ConstraintGenerator,
    ConstraintPool, GeneratorContext, GeneratorSlot, GeneratorStats, Heuristic, HeuristicContext,
    IncumbentStore, MostFractionalStrategy, RelaxationSolver, VariablePool,
};
use crate::desc::{BranchDirection, BranchInfo, NodeDesc, VarBounds};
use crate::error::{NodeError, NodeResult};
use crate::model::{ProblemInfo, Solution};
use crate::settings::NodeSettings;
use crate::tree::{ChildNode, NodeArena, NodeIndex, NodeStatus, TreeNode};

use super::decision::{branch_constrain_or_price, DecisionInput, FathomReason, Step, Verdict};
use super::filter::{apply_constraints, CutFilter};
use super::install::{install_subproblem, InstallSummary};
use super::ops::NodeOps;
use super::status::SubproblemStatus;
use super::trace::{trace, TraceEvent};

/// Per-call context supplied by the tree runtime.
#[derive(Clone, Copy)]
pub struct ProcessContext<'a> {
    /// Node is the root of the search.
    pub is_root: bool,

    /// Search is in its initial ramp-up phase.
    pub rampup: bool,

    /// Shared incumbent, read at each pruning check.
    pub incumbent: &'a dyn IncumbentStore,
}

impl<'a> ProcessContext<'a> {
    /// Context for regular (non ramp-up) processing.
    pub fn new(incumbent: &'a dyn IncumbentStore) -> Self {
        Self {
            is_root: false,
            rampup: false,
            incumbent,
        }
    }

    /// Mark the node as the root.
    pub fn root(mut self) -> Self {
        self.is_root = true;
        self
    }

    /// Mark the ramp-up phase.
    pub fn rampup(mut self) -> Self {
        self.rampup = true;
        self
    }
}

/// Summary of one `process` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Node status on return.
    pub status: NodeStatus,

    /// Why the node was fathomed, if it was.
    pub fathom_reason: Option<FathomReason>,

    /// Some solve ended abnormally.
    pub solver_failure: bool,

    /// Relaxation solves performed.
    pub rounds: usize,

    /// Cuts admitted into the relaxation.
    pub cuts_added: usize,
}

impl ProcessOutcome {
    fn new(status: NodeStatus) -> Self {
        Self {
            status,
            fathom_reason: None,
            solver_failure: false,
            rounds: 0,
            cuts_added: 0,
        }
    }
}

/// Node processor for mixed-integer conic problems.
///
/// Owns the worker's relaxation solver and the registered generators,
/// heuristics and branching strategy. Nodes live in a [`NodeArena`] owned by
/// the runtime and are passed in by index.
pub struct NodeProcessor<S> {
    /// Problem structure.
    problem: ProblemInfo,

    /// Settings.
    settings: NodeSettings,

    /// Relaxation solver.
    solver: S,

    /// Constraint generators with their strategies and statistics.
    generators: Vec<GeneratorSlot>,

    /// Primal heuristics.
    heuristics: Vec<Box<dyn Heuristic>>,

    /// Branching strategy.
    strategy: Box<dyn BranchStrategy>,
}

impl<S: RelaxationSolver> NodeProcessor<S> {
    /// Create a processor with the most-fractional branching strategy.
    pub fn new(problem: ProblemInfo, settings: NodeSettings, solver: S) -> Self {
        Self {
            problem,
            settings,
            solver,
            generators: Vec::new(),
            heuristics: Vec::new(),
            strategy: Box::new(MostFractionalStrategy),
        }
    }

    /// Register a generator using the default cut strategy.
    pub fn add_generator(&mut self, generator: Box<dyn ConstraintGenerator>) {
        self.generators.push(GeneratorSlot::new(generator));
    }

    /// Register a generator slot with its own strategy.
    pub fn add_generator_slot(&mut self, slot: GeneratorSlot) {
        self.generators.push(slot);
    }

    /// Register a heuristic.
    pub fn add_heuristic(&mut self, heuristic: Box<dyn Heuristic>) {
        self.heuristics.push(heuristic);
    }

    /// Replace the branching strategy.
    pub fn set_branch_strategy(&mut self, strategy: Box<dyn BranchStrategy>) {
        self.strategy = strategy;
    }

    /// Problem structure.
    pub fn problem(&self) -> &ProblemInfo {
        &self.problem
    }

    /// Settings.
    pub fn settings(&self) -> &NodeSettings {
        &self.settings
    }

    /// Relaxation solver.
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Mutable relaxation solver.
    pub fn solver_mut(&mut self) -> &mut S {
        &mut self.solver
    }

    /// Statistics of each generator by name.
    pub fn generator_stats(&self) -> Vec<(&str, GeneratorStats)> {
        self.generators
            .iter()
            .map(|slot| (slot.generator.name(), slot.stats))
            .collect()
    }

    /// Process a node taken from the pool.
    ///
    /// Fathoms immediately if the node's quality is within tail-off of the
    /// incumbent, otherwise installs the subproblem and runs the bounding loop.
    /// A pregnant node is left for [`NodeOps::branch`].
    pub fn process(
        &mut self,
        arena: &mut NodeArena,
        index: NodeIndex,
        ctx: &ProcessContext<'_>,
    ) -> NodeResult<ProcessOutcome> {
        let node = arena.get_mut(index)?;
        log::debug!(
            target: "solver_node::process",
            "Processing node {} parent {} depth {}{}",
            index,
            node.parent_tag(),
            node.depth,
            if ctx.is_root { " (root)" } else { "" }
        );

        match node.status {
            status if status.is_terminal() => {
                log::error!(
                    target: "solver_node::process",
                    "Node {}: process called with status {:?}",
                    index,
                    status
                );
                return Err(NodeError::UnexpectedStatus {
                    node: index,
                    status,
                    operation: "process",
                });
            }
            NodeStatus::Pregnant => return Ok(ProcessOutcome::new(NodeStatus::Pregnant)),
            _ => {}
        }

        // Quality is the parent's hint before the first solve, the node's own bound after
        if node.quality > ctx.incumbent.best_quality() - self.settings.tail_off {
            log::debug!(
                target: "solver_node::process",
                "Node {} fathomed due to parent quality",
                index
            );
            node.set_status(NodeStatus::Fathomed)?;
            trace(TraceEvent::Fathomed, node, self.settings.obj_sense.factor(), None);
            let mut outcome = ProcessOutcome::new(NodeStatus::Fathomed);
            outcome.fathom_reason = Some(FathomReason::BoundExceeded);
            return Ok(outcome);
        }

        self.bounding_loop(arena, index, ctx)
    }

    fn bounding_loop(
        &mut self,
        arena: &mut NodeArena,
        index: NodeIndex,
        ctx: &ProcessContext<'_>,
    ) -> NodeResult<ProcessOutcome> {
        self.install_subproblem(arena, index, ctx.rampup)?;

        let sense = self.settings.obj_sense.factor();
        let filter = CutFilter::from_settings(&self.settings);
        let mut outcome = ProcessOutcome::new(arena.get(index)?.status);
        let mut cons_pool = ConstraintPool::new();
        let mut var_pool = VariablePool::new();

        loop {
            let node = arena.get_mut(index)?;
            let status = self.bound(node)?;
            outcome.rounds += 1;
            let x = self.solver.col_solution().to_vec();
            log::debug!(
                target: "solver_node::process",
                "Subproblem solved. status {:?} quality {} estimate {}",
                status,
                node.quality,
                node.sol_estimate
            );
            if status == SubproblemStatus::Optimal {
                trace(TraceEvent::Candidate, node, sense, None);
            }

            self.call_heuristics(node, &x, ctx.incumbent);

            let feasibility = if status.is_infeasible()
                || (status.is_failure() && x.len() < self.problem.num_cols)
            {
                None
            } else {
                Some(self.problem.feasibility(
                    &x,
                    self.settings.integer_tol,
                    self.settings.cone_tol,
                )?)
            };
            let decision = branch_constrain_or_price(DecisionInput {
                status,
                quality: node.quality,
                best_quality: ctx.incumbent.best_quality(),
                feasibility,
            });
            if decision.solver_failure {
                log::warn!(
                    target: "solver_node::process",
                    "Node {}: relaxation solver ended with status {:?}",
                    index,
                    status
                );
                outcome.solver_failure = true;
            }

            if let Verdict::Fathom(reason) = decision.verdict {
                match reason {
                    FathomReason::Infeasible => {
                        log::debug!(
                            target: "solver_node::process",
                            "Subproblem is infeasible. Status set to fathom"
                        );
                        trace(TraceEvent::Infeasible, node, sense, None);
                    }
                    FathomReason::BoundExceeded => {
                        log::debug!(
                            target: "solver_node::process",
                            "Subproblem objective is worse than the incumbent, fathoming"
                        );
                        trace(TraceEvent::Fathomed, node, sense, None);
                    }
                    FathomReason::Feasible => {
                        let solution = Solution::new(x.clone(), node.quality)
                            .stamped(node.depth, ctx.incumbent.num_solutions());
                        ctx.incumbent.store_solution(solution);
                        node.sol_estimate = node.quality;
                        log::debug!(
                            target: "solver_node::process",
                            "Node {} is feasible, fathoming",
                            index
                        );
                        trace(TraceEvent::Integer, node, sense, None);
                    }
                }
                node.set_status(NodeStatus::Fathomed)?;
                outcome.fathom_reason = Some(reason);
                break;
            }

            let flags = decision.flags();
            log::debug!(
                target: "solver_node::process",
                "Decision: keep bounding {} branch {} generate cons {}",
                flags.keep_bounding,
                flags.branch,
                flags.gen_constraints
            );

            match flags.step(index)? {
                Step::GenerateConstraints => {
                    self.generate_constraints(node, &x, &mut cons_pool)?;
                    let summary = apply_constraints(
                        &mut self.solver,
                        node,
                        cons_pool.drain(),
                        &x,
                        &filter,
                    )?;
                    node.set_status(NodeStatus::Evaluated)?;
                    outcome.cuts_added += summary.admitted;
                    if summary.admitted == 0 {
                        log::debug!(
                            target: "solver_node::process",
                            "Node {}: no cut admitted, returning to pool",
                            index
                        );
                        break;
                    }
                }
                Step::GenerateVariables => {
                    let added = self.generate_variables(node, &mut var_pool)?;
                    var_pool.clear();
                    node.set_status(NodeStatus::Evaluated)?;
                    if added == 0 {
                        break;
                    }
                }
                Step::ReturnToPool => {
                    node.set_status(NodeStatus::Evaluated)?;
                    break;
                }
                Step::Branch => {
                    let candidates = self.strategy.create_cand_branch_objects(&BranchContext {
                        problem: &self.problem,
                        solution: &x,
                        node: index,
                        depth: node.depth,
                        integer_tol: self.settings.integer_tol,
                    })?;
                    let sum_inf: f64 = candidates.iter().map(|c| c.score).sum();
                    node.branch_object = candidates.first().copied();
                    node.desc.basis = self.solver.warm_start();
                    node.set_status(NodeStatus::Pregnant)?;
                    trace(
                        TraceEvent::Pregnant,
                        node,
                        sense,
                        Some((sum_inf, candidates.len())),
                    );
                    break;
                }
            }
        }

        outcome.status = arena.get(index)?.status;
        Ok(outcome)
    }

    fn call_heuristics(&mut self, node: &TreeNode, x: &[f64], incumbent: &dyn IncumbentStore) {
        let ctx = HeuristicContext {
            problem: &self.problem,
            solution: x,
            quality: node.quality,
            node: node.index,
            depth: node.depth,
        };
        for heuristic in &mut self.heuristics {
            match heuristic.search_solution(&ctx) {
                Some(solution) => {
                    log::info!(
                        target: "solver_node::process",
                        "Heuristic {} found a solution with quality {}",
                        heuristic.name(),
                        solution.quality
                    );
                    incumbent.store_solution(solution.stamped(node.depth, node.index));
                }
                None => log::debug!(
                    target: "solver_node::process",
                    "Heuristic {} found no solution",
                    heuristic.name()
                ),
            }
        }
    }
}

impl<S: RelaxationSolver> NodeOps for NodeProcessor<S> {
    fn install_subproblem(
        &mut self,
        arena: &NodeArena,
        index: NodeIndex,
        rampup: bool,
    ) -> NodeResult<InstallSummary> {
        install_subproblem(&mut self.solver, &self.problem, arena, index, rampup)
    }

    fn bound(&mut self, node: &mut TreeNode) -> NodeResult<SubproblemStatus> {
        if !matches!(node.status, NodeStatus::Candidate | NodeStatus::Evaluated) {
            return Err(NodeError::UnexpectedStatus {
                node: node.index,
                status: node.status,
                operation: "bound",
            });
        }

        self.solver.resolve();
        let mut status = SubproblemStatus::from_solver(&self.solver);
        match status {
            SubproblemStatus::Optimal => {
                let obj = self.solver.obj_value();
                if self
                    .settings
                    .infeasible_obj_sentinel
                    .is_some_and(|sentinel| obj >= sentinel)
                {
                    log::warn!(
                        target: "solver_node::process",
                        "Node {}: optimal objective {:e} at or above the infeasibility sentinel",
                        node.index,
                        obj
                    );
                    status = SubproblemStatus::PrimalInfeasible;
                    node.quality = f64::INFINITY;
                    node.sol_estimate = f64::INFINITY;
                } else {
                    let quality = self.settings.quality(obj);
                    node.quality = quality;
                    node.sol_estimate = quality;
                }
            }
            SubproblemStatus::Unknown => log::warn!(
                target: "solver_node::process",
                "Node {}: relaxation solver returned an unknown status",
                node.index
            ),
            _ => {}
        }
        Ok(status)
    }

    fn generate_constraints(
        &mut self,
        node: &TreeNode,
        solution: &[f64],
        pool: &mut ConstraintPool,
    ) -> NodeResult<usize> {
        let ctx = GeneratorContext {
            problem: &self.problem,
            solution,
            node: node.index,
            depth: node.depth,
        };
        let activation = ActivationInput {
            index: node.index,
            depth: node.depth,
            diving: node.diving,
            max_depth: self.settings.max_constraint_depth,
        };

        let mut total = 0;
        for slot in &mut self.generators {
            let strategy = slot.strategy.unwrap_or(self.settings.cut_strategy);
            if !decide_using_generator(strategy, activation) {
                continue;
            }
            if slot.exhausted(self.settings.cut_disable) {
                log::debug!(
                    target: "solver_node::cut",
                    "Skipping {} after {} empty calls",
                    slot.generator.name(),
                    slot.stats.no_cons_calls
                );
                continue;
            }

            let before = pool.len();
            let start = Instant::now();
            let must_resolve = slot.generator.generate_constraints(&ctx, pool)?;
            let elapsed = start.elapsed();
            let generated = pool.len() - before;
            slot.stats.record(elapsed, generated);
            total += generated;

            log::debug!(
                target: "solver_node::cut",
                "Called {}, generated {} cuts in {:?} (resolve {})",
                slot.generator.name(),
                generated,
                elapsed,
                must_resolve
            );
        }
        Ok(total)
    }

    fn branch(
        &mut self,
        arena: &mut NodeArena,
        index: NodeIndex,
        ctx: &ProcessContext<'_>,
    ) -> NodeResult<Option<[ChildNode; 2]>> {
        let sense = self.settings.obj_sense.factor();
        let node = arena.get(index)?;
        if node.status != NodeStatus::Pregnant {
            return Err(NodeError::UnexpectedStatus {
                node: index,
                status: node.status,
                operation: "branch",
            });
        }

        if node.quality > ctx.incumbent.best_quality() {
            log::debug!(
                target: "solver_node::branch",
                "Node {}: bad quality, fathoming instead of branching",
                index
            );
            let node = arena.get_mut(index)?;
            node.set_status(NodeStatus::Fathomed)?;
            trace(TraceEvent::Fathomed, node, sense, None);
            return Ok(None);
        }

        let Some(object) = node.branch_object else {
            log::debug!(
                target: "solver_node::branch",
                "Node {}: no branch objects found, fathoming",
                index
            );
            let node = arena.get_mut(index)?;
            node.set_status(NodeStatus::Fathomed)?;
            trace(TraceEvent::Fathomed, node, sense, None);
            return Ok(None);
        };

        let var = object.index;
        if var >= self.problem.num_cols {
            return Err(NodeError::InvalidProblem(format!(
                "branching column {} but only {} columns",
                var, self.problem.num_cols
            )));
        }
        if self.problem.fractionality(object.value) < self.settings.integer_tol {
            log::warn!(
                target: "solver_node::branch",
                "Node {}: branching on column {} with integral value {}",
                index,
                var,
                object.value
            );
        }
        log::debug!(
            target: "solver_node::branch",
            "Branching node {} on column {} value {}",
            index,
            var,
            object.value
        );

        let quality = match node.parent.and_then(|p| arena.get(p).ok()) {
            Some(parent) => parent.quality,
            None => node.quality,
        };

        let (mut down, mut up) = if ctx.rampup {
            let sub = arena.materialize(index, self.problem.num_cols, false)?;
            let mut full = NodeDesc::explicit(sub.bounds.into_var_bounds());
            full.cons.added = sub.constraints;
            let mut down = full.clone();
            let mut up = full;
            down.vars.ub_hard.set(var, object.ub_down_branch);
            up.vars.lb_hard.set(var, object.lb_up_branch);
            (down, up)
        } else {
            let mut down_vars = VarBounds::default();
            down_vars.record_hard_bound(
                var,
                Some(self.problem.col_lb[var]),
                Some(object.ub_down_branch),
            );
            let mut up_vars = VarBounds::default();
            up_vars.record_hard_bound(
                var,
                Some(object.lb_up_branch),
                Some(self.problem.col_ub[var]),
            );
            (
                NodeDesc::differential(down_vars),
                NodeDesc::differential(up_vars),
            )
        };

        for (desc, direction) in [(&mut down, BranchDirection::Down), (&mut up, BranchDirection::Up)] {
            desc.branch = Some(BranchInfo {
                index: var,
                value: object.value,
                direction,
            });
            desc.basis = node.desc.basis.clone();
        }

        let node = arena.get_mut(index)?;
        node.set_status(NodeStatus::Branched)?;
        trace(TraceEvent::Branched, node, sense, Some((object.score, 1)));

        Ok(Some([
            ChildNode {
                desc: down,
                status: NodeStatus::Candidate,
                quality,
            },
            ChildNode {
                desc: up,
                status: NodeStatus::Candidate,
                quality,
            },
        ]))
    }
}
