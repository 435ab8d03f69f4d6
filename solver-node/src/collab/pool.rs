//! Per-iteration pools of generated constraints and columns.
//!
//! Pools are owned by one bounding-loop iteration and emptied when it ends.

use sprs::CsVec;

use crate::desc::LinearConstraint;

/// Constraints generated during one bounding iteration.
#[derive(Debug, Clone, Default)]
pub struct ConstraintPool {
    constraints: Vec<LinearConstraint>,
}

impl ConstraintPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint.
    pub fn add(&mut self, con: LinearConstraint) {
        self.constraints.push(con);
    }

    /// Number of constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// True if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Iterate over constraints.
    pub fn iter(&self) -> impl Iterator<Item = &LinearConstraint> {
        self.constraints.iter()
    }

    /// Remove and return all constraints.
    pub fn drain(&mut self) -> Vec<LinearConstraint> {
        std::mem::take(&mut self.constraints)
    }

    /// Drop all constraints.
    pub fn clear(&mut self) {
        self.constraints.clear();
    }
}

/// A column produced by a pricing routine.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedColumn {
    /// Objective coefficient.
    pub obj: f64,

    /// Coefficients over the rows.
    pub coefs: CsVec<f64>,

    /// Lower bound.
    pub lb: f64,

    /// Upper bound.
    pub ub: f64,
}

/// Columns generated during one bounding iteration.
#[derive(Debug, Clone, Default)]
pub struct VariablePool {
    columns: Vec<GeneratedColumn>,
}

impl VariablePool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column.
    pub fn add(&mut self, col: GeneratedColumn) {
        self.columns.push(col);
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Drop all columns.
    pub fn clear(&mut self) {
        self.columns.clear();
    }
}
