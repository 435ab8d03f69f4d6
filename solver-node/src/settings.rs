//! Configuration settings for node processing.

use serde::{Deserialize, Serialize};

/// Objective sense of the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjSense {
    /// Minimize the objective.
    #[default]
    Minimize,

    /// Maximize the objective.
    Maximize,
}

impl ObjSense {
    /// Multiplier turning a raw objective into a quality (smaller is better).
    pub fn factor(self) -> f64 {
        match self {
            ObjSense::Minimize => 1.0,
            ObjSense::Maximize => -1.0,
        }
    }
}

/// When a constraint generator is allowed to run at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CutStrategy {
    /// Never generate.
    Disabled,

    /// Generate only at the root node.
    Root,

    /// Generate while shallow, and not while diving below the root.
    #[default]
    Auto,

    /// Generate at nodes whose index is a multiple of `frequency`.
    Periodic {
        /// Node index period. Zero disables the generator.
        frequency: u64,
    },
}

/// Node processing settings.
#[derive(Debug, Clone)]
pub struct NodeSettings {
    // === Tolerances ===
    /// Integer feasibility tolerance.
    /// A relaxed column is integral if |x - round(x)| <= integer_tol.
    pub integer_tol: f64,

    /// Conic feasibility tolerance.
    pub cone_tol: f64,

    /// Margin for the entry fathom check and the minimum violation of an admitted cut.
    pub tail_off: f64,

    /// Objective sense; quality is objective times `obj_sense.factor()`.
    pub obj_sense: ObjSense,

    // === Cut admission ===
    /// Largest allowed ratio between the biggest and smallest cut coefficient.
    pub scale_con_factor: f64,

    /// Largest allowed number of nonzeros in a cut (None = unlimited).
    pub dense_con_limit: Option<usize>,

    /// Reject cuts whose coefficient ratio exceeds `scale_con_factor`.
    pub reject_badly_scaled: bool,

    // === Constraint generation ===
    /// Activation strategy for generators registered without their own.
    pub cut_strategy: CutStrategy,

    /// Depth limit for `CutStrategy::Auto`.
    pub max_constraint_depth: usize,

    /// Skip a generator once its zero-yield calls exceed this count (None = never).
    pub cut_disable: Option<u64>,

    // === Status classification ===
    /// An optimal objective at or above this value is read as primal infeasible.
    /// Some cut schemes signal infeasibility this way; legitimate objectives near
    /// the sentinel will be misclassified.
    pub infeasible_obj_sentinel: Option<f64>,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            // Tolerances
            integer_tol: 1e-5,
            cone_tol: 1e-5,
            tail_off: 1e-6,
            obj_sense: ObjSense::default(),

            // Cut admission
            scale_con_factor: 1e9,
            dense_con_limit: None,
            reject_badly_scaled: false,

            // Generation
            cut_strategy: CutStrategy::default(),
            max_constraint_depth: 20,
            cut_disable: None,

            // Status
            infeasible_obj_sentinel: Some(1e30),
        }
    }
}

impl NodeSettings {
    /// Set the integrality tolerance.
    pub fn with_integer_tol(mut self, tol: f64) -> Self {
        self.integer_tol = tol;
        self
    }

    /// Set the conic feasibility tolerance.
    pub fn with_cone_tol(mut self, tol: f64) -> Self {
        self.cone_tol = tol;
        self
    }

    /// Set the tail-off tolerance.
    pub fn with_tail_off(mut self, tol: f64) -> Self {
        self.tail_off = tol;
        self
    }

    /// Set the objective sense.
    pub fn with_obj_sense(mut self, sense: ObjSense) -> Self {
        self.obj_sense = sense;
        self
    }

    /// Set the default generator activation strategy.
    pub fn with_cut_strategy(mut self, strategy: CutStrategy) -> Self {
        self.cut_strategy = strategy;
        self
    }

    /// Disable generators after `calls` zero-yield calls.
    pub fn with_cut_disable(mut self, calls: u64) -> Self {
        self.cut_disable = Some(calls);
        self
    }

    /// Limit the number of nonzeros in admitted cuts.
    pub fn with_dense_con_limit(mut self, limit: usize) -> Self {
        self.dense_con_limit = Some(limit);
        self
    }

    /// Enable the coefficient scaling check with the given ratio.
    pub fn with_badly_scaled_rejection(mut self, factor: f64) -> Self {
        self.reject_badly_scaled = true;
        self.scale_con_factor = factor;
        self
    }

    /// Set or clear the infeasibility objective sentinel.
    pub fn with_infeasible_obj_sentinel(mut self, sentinel: Option<f64>) -> Self {
        self.infeasible_obj_sentinel = sentinel;
        self
    }

    /// Turn a raw objective value into a sense-adjusted quality.
    pub fn quality(&self, objective: f64) -> f64 {
        objective * self.obj_sense.factor()
    }
}
