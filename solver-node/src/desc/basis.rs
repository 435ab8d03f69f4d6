//! Warm-start basis snapshots.

use serde::{Deserialize, Serialize};

/// Status of a structural or artificial (row) variable in a basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasisStatus {
    /// Nonbasic free.
    Free,

    /// Basic.
    Basic,

    /// Nonbasic at upper bound.
    AtUpper,

    /// Nonbasic at lower bound.
    AtLower,
}

/// Solver-independent warm-start basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmStartBasis {
    /// Column statuses.
    pub structural: Vec<BasisStatus>,

    /// Row statuses.
    pub artificial: Vec<BasisStatus>,
}

impl WarmStartBasis {
    /// Slack basis: every row basic, every column at its lower bound.
    pub fn slack(num_cols: usize, num_rows: usize) -> Self {
        Self {
            structural: vec![BasisStatus::AtLower; num_cols],
            artificial: vec![BasisStatus::Basic; num_rows],
        }
    }

    /// Number of columns.
    pub fn num_structural(&self) -> usize {
        self.structural.len()
    }

    /// Number of rows.
    pub fn num_artificial(&self) -> usize {
        self.artificial.len()
    }

    /// Resize; new rows are basic, new columns at lower bound.
    pub fn resize(&mut self, num_rows: usize, num_cols: usize) {
        self.artificial.resize(num_rows, BasisStatus::Basic);
        self.structural.resize(num_cols, BasisStatus::AtLower);
    }

    /// Set the status of one row.
    pub fn set_artif_status(&mut self, row: usize, status: BasisStatus) {
        if let Some(slot) = self.artificial.get_mut(row) {
            *slot = status;
        }
    }

    /// Number of basic variables, structural and artificial.
    pub fn num_basic(&self) -> usize {
        self.structural
            .iter()
            .chain(&self.artificial)
            .filter(|s| **s == BasisStatus::Basic)
            .count()
    }
}
