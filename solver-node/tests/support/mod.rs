//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::rc::Rc;

use solver_node::collab::{
    ConstraintGenerator, ConstraintPool, GeneratorContext, Heuristic, HeuristicContext,
    RelaxationSolver, RowCut,
};
use solver_node::desc::{LinearConstraint, WarmStartBasis};
use solver_node::model::{ConeKind, Solution};
use solver_node::{
    NodeArena, NodeError, NodeIndex, NodeOps, NodeProcessor, NodeResult, NodeStatus,
    ProblemInfo, ProcessContext, SharedIncumbent,
};

/// How a scripted solve ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Optimal,
    Infeasible,
    IterationLimit,
    Abandoned,
}

/// One scripted solve result.
#[derive(Debug, Clone)]
pub struct Response {
    pub outcome: Outcome,
    pub obj: f64,
    pub x: Vec<f64>,
}

impl Response {
    pub fn optimal(obj: f64, x: Vec<f64>) -> Self {
        Self {
            outcome: Outcome::Optimal,
            obj,
            x,
        }
    }

    pub fn infeasible() -> Self {
        Self {
            outcome: Outcome::Infeasible,
            obj: 0.0,
            x: Vec::new(),
        }
    }

    pub fn failed(outcome: Outcome) -> Self {
        Self {
            outcome,
            obj: 0.0,
            x: Vec::new(),
        }
    }
}

/// Solver that replays a fixed list of results and records what it was told.
#[derive(Debug)]
pub struct ScriptedSolver {
    responses: VecDeque<Response>,
    current: Option<Response>,
    pub num_cols: usize,
    pub num_core_rows: usize,
    pub cuts: Vec<RowCut>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub basis: Option<WarmStartBasis>,
    pub accept_basis: bool,
    pub resolves: usize,
    pub rows_deleted: usize,
}

impl ScriptedSolver {
    pub fn new(num_cols: usize, num_core_rows: usize, responses: Vec<Response>) -> Self {
        Self {
            responses: responses.into(),
            current: None,
            num_cols,
            num_core_rows,
            cuts: Vec::new(),
            lower: Vec::new(),
            upper: Vec::new(),
            basis: None,
            accept_basis: true,
            resolves: 0,
            rows_deleted: 0,
        }
    }

    fn outcome(&self) -> Option<Outcome> {
        self.current.as_ref().map(|r| r.outcome)
    }
}

impl RelaxationSolver for ScriptedSolver {
    fn resolve(&mut self) {
        self.resolves += 1;
        self.current = self.responses.pop_front();
    }

    fn is_abandoned(&self) -> bool {
        matches!(self.outcome(), None | Some(Outcome::Abandoned))
    }

    fn is_proven_optimal(&self) -> bool {
        self.outcome() == Some(Outcome::Optimal)
    }

    fn is_proven_primal_infeasible(&self) -> bool {
        self.outcome() == Some(Outcome::Infeasible)
    }

    fn is_proven_dual_infeasible(&self) -> bool {
        false
    }

    fn is_primal_objective_limit_reached(&self) -> bool {
        false
    }

    fn is_dual_objective_limit_reached(&self) -> bool {
        false
    }

    fn is_iteration_limit_reached(&self) -> bool {
        self.outcome() == Some(Outcome::IterationLimit)
    }

    fn obj_value(&self) -> f64 {
        self.current.as_ref().map_or(0.0, |r| r.obj)
    }

    fn col_solution(&self) -> &[f64] {
        self.current.as_ref().map_or(&[], |r| r.x.as_slice())
    }

    fn num_cols(&self) -> usize {
        self.num_cols
    }

    fn num_rows(&self) -> usize {
        self.num_core_rows + self.cuts.len()
    }

    fn set_col_lower(&mut self, lower: &[f64]) -> NodeResult<()> {
        self.lower = lower.to_vec();
        Ok(())
    }

    fn set_col_upper(&mut self, upper: &[f64]) -> NodeResult<()> {
        self.upper = upper.to_vec();
        Ok(())
    }

    fn warm_start(&self) -> Option<WarmStartBasis> {
        Some(
            self.basis
                .clone()
                .unwrap_or_else(|| WarmStartBasis::slack(self.num_cols, self.num_rows())),
        )
    }

    fn set_warm_start(&mut self, basis: &WarmStartBasis) -> bool {
        if self.accept_basis {
            self.basis = Some(basis.clone());
        }
        self.accept_basis
    }

    fn apply_row_cuts(&mut self, cuts: &[RowCut]) -> NodeResult<()> {
        self.cuts.extend_from_slice(cuts);
        Ok(())
    }

    fn delete_rows(&mut self, rows: &[usize]) -> NodeResult<()> {
        let mut rows = rows.to_vec();
        rows.sort_unstable_by(|a, b| b.cmp(a));
        for row in rows {
            if row < self.num_core_rows || row >= self.num_rows() {
                return Err(NodeError::SolverRejected(format!("cannot delete row {}", row)));
            }
            self.cuts.remove(row - self.num_core_rows);
            self.rows_deleted += 1;
        }
        Ok(())
    }
}

/// Continuous relaxation of a 0-1 knapsack, solved greedily by value density.
///
/// Reports the raw (maximized) objective.
#[derive(Debug)]
pub struct KnapsackRelaxation {
    pub values: Vec<f64>,
    pub weights: Vec<f64>,
    pub capacity: f64,
    lower: Vec<f64>,
    upper: Vec<f64>,
    cuts: Vec<RowCut>,
    x: Vec<f64>,
    obj: f64,
    infeasible: bool,
    pub resolves: usize,
}

impl KnapsackRelaxation {
    pub fn new(values: Vec<f64>, weights: Vec<f64>, capacity: f64) -> Self {
        let n = values.len();
        Self {
            values,
            weights,
            capacity,
            lower: vec![0.0; n],
            upper: vec![1.0; n],
            cuts: Vec::new(),
            x: vec![0.0; n],
            obj: 0.0,
            infeasible: false,
            resolves: 0,
        }
    }

    /// Four items; the best packing takes items 0 and 1 for a value of 23.
    pub fn small() -> Self {
        Self::new(vec![10.0, 13.0, 7.0, 8.0], vec![4.0, 6.0, 3.0, 5.0], 10.0)
    }

    pub fn problem(&self) -> ProblemInfo {
        let n = self.values.len();
        ProblemInfo::new(vec![0.0; n], vec![1.0; n], 1)
            .and_then(|p| p.with_relaxed_cols((0..n).collect()))
            .unwrap()
    }
}

impl RelaxationSolver for KnapsackRelaxation {
    fn resolve(&mut self) {
        self.resolves += 1;
        let n = self.values.len();
        self.x = self.lower.clone();
        let mut cap = self.capacity - (0..n).map(|j| self.weights[j] * self.x[j]).sum::<f64>();
        self.infeasible = cap < -1e-9 || (0..n).any(|j| self.lower[j] > self.upper[j]);
        if self.infeasible {
            return;
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            (self.values[b] / self.weights[b]).total_cmp(&(self.values[a] / self.weights[a]))
        });
        for j in order {
            let take = (self.upper[j] - self.x[j]).min(cap / self.weights[j]).max(0.0);
            self.x[j] += take;
            cap -= take * self.weights[j];
        }
        self.obj = (0..n).map(|j| self.values[j] * self.x[j]).sum();
    }

    fn is_abandoned(&self) -> bool {
        false
    }

    fn is_proven_optimal(&self) -> bool {
        !self.infeasible
    }

    fn is_proven_primal_infeasible(&self) -> bool {
        self.infeasible
    }

    fn is_proven_dual_infeasible(&self) -> bool {
        false
    }

    fn is_primal_objective_limit_reached(&self) -> bool {
        false
    }

    fn is_dual_objective_limit_reached(&self) -> bool {
        false
    }

    fn is_iteration_limit_reached(&self) -> bool {
        false
    }

    fn obj_value(&self) -> f64 {
        self.obj
    }

    fn col_solution(&self) -> &[f64] {
        &self.x
    }

    fn num_cols(&self) -> usize {
        self.values.len()
    }

    fn num_rows(&self) -> usize {
        1 + self.cuts.len()
    }

    fn set_col_lower(&mut self, lower: &[f64]) -> NodeResult<()> {
        self.lower = lower.to_vec();
        Ok(())
    }

    fn set_col_upper(&mut self, upper: &[f64]) -> NodeResult<()> {
        self.upper = upper.to_vec();
        Ok(())
    }

    fn warm_start(&self) -> Option<WarmStartBasis> {
        None
    }

    fn set_warm_start(&mut self, _basis: &WarmStartBasis) -> bool {
        false
    }

    fn apply_row_cuts(&mut self, cuts: &[RowCut]) -> NodeResult<()> {
        self.cuts.extend_from_slice(cuts);
        Ok(())
    }

    fn delete_rows(&mut self, rows: &[usize]) -> NodeResult<()> {
        self.cuts.truncate(self.cuts.len().saturating_sub(rows.len()));
        Ok(())
    }
}

/// Outer approximation of Lorentz cones: one tangent cut per violated cone.
///
/// For `t >= ||y||` violated at a point with `y != 0` the cut is
/// `(y_bar / ||y_bar||)^T y - t <= 0`.
#[derive(Debug, Default)]
pub struct TangentCutGenerator {
    pub calls: usize,
    pub scale: f64,
}

impl TangentCutGenerator {
    pub fn new() -> Self {
        Self {
            calls: 0,
            scale: 1.0,
        }
    }

    /// Produce cuts shrunk by `scale`, so a small scale yields weak cuts.
    pub fn scaled(scale: f64) -> Self {
        Self { calls: 0, scale }
    }
}

impl ConstraintGenerator for TangentCutGenerator {
    fn name(&self) -> &str {
        "tangent"
    }

    fn generate_constraints(
        &mut self,
        ctx: &GeneratorContext<'_>,
        pool: &mut ConstraintPool,
    ) -> NodeResult<bool> {
        self.calls += 1;
        let x = ctx.solution;
        for cone in &ctx.problem.cones {
            if cone.kind != ConeKind::Lorentz || cone.violation(x) <= 0.0 {
                continue;
            }
            let head = cone.members[0];
            let tail = &cone.members[1..];
            let norm = tail.iter().map(|&j| x[j] * x[j]).sum::<f64>().sqrt();
            if norm == 0.0 {
                continue;
            }
            let mut indices = vec![head];
            let mut values = vec![-self.scale];
            for &j in tail {
                indices.push(j);
                values.push(self.scale * x[j] / norm);
            }
            pool.add(LinearConstraint::le(ctx.problem.num_cols, indices, values, 0.0)?);
        }
        Ok(true)
    }
}

/// Heuristic that returns a fixed solution on its first call.
#[derive(Debug)]
pub struct OneShotHeuristic {
    pub solution: Option<Solution>,
    pub calls: Rc<Cell<usize>>,
}

impl OneShotHeuristic {
    pub fn new(values: Vec<f64>, quality: f64) -> Self {
        Self {
            solution: Some(Solution::new(values, quality)),
            calls: Rc::new(Cell::new(0)),
        }
    }
}

impl Heuristic for OneShotHeuristic {
    fn name(&self) -> &str {
        "one-shot"
    }

    fn search_solution(&mut self, _ctx: &HeuristicContext<'_>) -> Option<Solution> {
        self.calls.set(self.calls.get() + 1);
        self.solution.take()
    }
}

/// Entry in the best-first queue.
struct QueuedNode {
    index: NodeIndex,
    priority: f64, // Higher = selected first
}

impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.total_cmp(&other.priority)
    }
}

/// Serial best-first tree search on top of a node processor.
pub struct SerialSearch<S> {
    pub processor: NodeProcessor<S>,
    pub arena: NodeArena,
    pub incumbent: SharedIncumbent,
    queue: BinaryHeap<QueuedNode>,
    pub processed: usize,
    pub branched: usize,
}

impl<S: RelaxationSolver> SerialSearch<S> {
    pub fn new(processor: NodeProcessor<S>) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.insert_root(processor.problem().root_desc());
        let mut queue = BinaryHeap::new();
        queue.push(QueuedNode {
            index: root,
            priority: f64::INFINITY,
        });
        Self {
            processor,
            arena,
            incumbent: SharedIncumbent::new(),
            queue,
            processed: 0,
            branched: 0,
        }
    }

    /// Process nodes until the queue empties or `max_nodes` have been processed.
    pub fn run(&mut self, max_nodes: usize) -> NodeResult<()> {
        while let Some(QueuedNode { index, .. }) = self.queue.pop() {
            if self.processed >= max_nodes {
                break;
            }
            self.processed += 1;

            let mut ctx = ProcessContext::new(&self.incumbent);
            if index == 0 {
                ctx = ctx.root();
            }
            let outcome = self.processor.process(&mut self.arena, index, &ctx)?;
            match outcome.status {
                NodeStatus::Pregnant => {
                    if let Some(children) = self.processor.branch(&mut self.arena, index, &ctx)? {
                        self.branched += 1;
                        for child in children {
                            let priority = -child.quality;
                            let child = self.arena.add_child(index, child)?;
                            self.queue.push(QueuedNode { index: child, priority });
                        }
                    }
                }
                NodeStatus::Evaluated => {
                    let priority = -self.arena.get(index)?.quality;
                    self.queue.push(QueuedNode { index, priority });
                }
                _ => {}
            }
        }
        Ok(())
    }
}
