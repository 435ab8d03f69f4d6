//! Feasible solution types.

use serde::{Deserialize, Serialize};

/// An integer- and conic-feasible point found at a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Column values.
    pub values: Vec<f64>,

    /// Sense-adjusted objective (smaller is better).
    pub quality: f64,

    /// Depth of the node that produced the solution.
    pub depth: usize,

    /// Stamp assigned when the solution is handed to the incumbent store.
    pub index: usize,
}

impl Solution {
    /// Create an unstamped solution.
    pub fn new(values: Vec<f64>, quality: f64) -> Self {
        Self {
            values,
            quality,
            depth: 0,
            index: 0,
        }
    }

    /// Stamp the solution with the producing node's depth and an index.
    pub fn stamped(mut self, depth: usize, index: usize) -> Self {
        self.depth = depth;
        self.index = index;
        self
    }
}

/// Tracks the best known feasible solution (incumbent).
#[derive(Debug, Clone)]
pub struct IncumbentTracker {
    /// Current best solution (if any).
    pub best: Option<Solution>,

    /// Quality of the incumbent.
    /// Initialized to +inf.
    pub quality: f64,

    /// Number of solutions ever stored, improving or not.
    pub num_stored: usize,

    /// Number of times the incumbent was improved.
    pub update_count: u64,
}

impl Default for IncumbentTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl IncumbentTracker {
    /// Create a new incumbent tracker.
    pub fn new() -> Self {
        Self {
            best: None,
            quality: f64::INFINITY,
            num_stored: 0,
            update_count: 0,
        }
    }

    /// Check if we have an incumbent.
    pub fn has_incumbent(&self) -> bool {
        self.best.is_some()
    }

    /// Record a solution.
    ///
    /// Returns true if the incumbent was improved.
    pub fn update(&mut self, solution: Solution) -> bool {
        self.num_stored += 1;
        if solution.quality < self.quality - 1e-9 {
            self.quality = solution.quality;
            self.best = Some(solution);
            self.update_count += 1;
            true
        } else {
            false
        }
    }
}
