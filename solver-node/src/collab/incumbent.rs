//! Incumbent store interface and a thread-safe implementation.

use std::sync::{Arc, PoisonError, RwLock};

use crate::model::{IncumbentTracker, Solution};

/// Global pool of feasible solutions, shared across workers.
///
/// Implementations synchronize internally; the node processor reads the
/// best quality at each pruning check and tolerates it changing in between.
pub trait IncumbentStore {
    /// Submit a feasible solution.
    fn store_solution(&self, solution: Solution);

    /// Quality of the best known solution (+inf if none).
    fn best_quality(&self) -> f64;

    /// Number of solutions stored so far.
    fn num_solutions(&self) -> usize;
}

/// Cloneable handle to a shared incumbent.
#[derive(Debug, Clone, Default)]
pub struct SharedIncumbent {
    inner: Arc<RwLock<IncumbentTracker>>,
}

impl SharedIncumbent {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the best solution.
    pub fn best(&self) -> Option<Solution> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .best
            .clone()
    }

    /// Number of improving updates.
    pub fn update_count(&self) -> u64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .update_count
    }
}

impl IncumbentStore for SharedIncumbent {
    fn store_solution(&self, solution: Solution) {
        let quality = solution.quality;
        let mut tracker = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if tracker.update(solution) {
            log::info!(
                target: "solver_node::process",
                "New incumbent with quality {:.6e} ({} updates)",
                quality,
                tracker.update_count
            );
        }
    }

    fn best_quality(&self) -> f64 {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).quality
    }

    fn num_solutions(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .num_stored
    }
}
