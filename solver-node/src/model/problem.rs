//! Problem structure seen by the node processor.

use serde::{Deserialize, Serialize};

use crate::desc::{NodeDesc, VarBounds};
use crate::error::{NodeError, NodeResult};

/// Kind of a conic row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConeKind {
    /// x0 >= ||(x1, ..., xk)||.
    Lorentz,

    /// 2 x0 x1 >= ||(x2, ..., xk)||^2 with x0, x1 >= 0.
    RotatedLorentz,
}

/// A conic constraint over a subset of columns, relaxed in the node LP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConeRow {
    /// Cone type.
    pub kind: ConeKind,

    /// Column indices; the leading one (or two) are the cone heads.
    pub members: Vec<usize>,
}

impl ConeRow {
    /// Create a Lorentz cone row.
    pub fn lorentz(members: Vec<usize>) -> Self {
        Self {
            kind: ConeKind::Lorentz,
            members,
        }
    }

    /// Create a rotated Lorentz cone row.
    pub fn rotated(members: Vec<usize>) -> Self {
        Self {
            kind: ConeKind::RotatedLorentz,
            members,
        }
    }

    /// Amount by which `x` violates the cone (<= 0 when inside).
    pub fn violation(&self, x: &[f64]) -> f64 {
        match self.kind {
            ConeKind::Lorentz => {
                let t = x[self.members[0]];
                let norm = self.members[1..]
                    .iter()
                    .map(|&j| x[j] * x[j])
                    .sum::<f64>()
                    .sqrt();
                norm - t
            }
            ConeKind::RotatedLorentz => {
                let u = x[self.members[0]];
                let v = x[self.members[1]];
                let sq: f64 = self.members[2..].iter().map(|&j| x[j] * x[j]).sum();
                (sq - 2.0 * u * v).max(-u).max(-v)
            }
        }
    }
}

/// Infeasibility counts of a relaxation solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Feasibility {
    /// Relaxed integer columns with a fractional value.
    pub cols_infeasible: usize,

    /// Conic rows violated beyond tolerance.
    pub rows_infeasible: usize,
}

impl Feasibility {
    /// Integer and conic feasible.
    pub fn is_feasible(&self) -> bool {
        self.cols_infeasible == 0 && self.rows_infeasible == 0
    }
}

/// Core problem dimensions and structure.
///
/// The relaxation solver owns the numeric data; the node processor only needs
/// sizes, the integrality pattern, the conic rows and the original column bounds.
#[derive(Debug, Clone)]
pub struct ProblemInfo {
    /// Number of structural columns.
    pub num_cols: usize,

    /// Number of rows belonging to the core model (never deleted).
    pub num_core_rows: usize,

    /// Columns whose integrality is relaxed in the node subproblem.
    pub relaxed_cols: Vec<usize>,

    /// Conic rows relaxed in the node subproblem.
    pub cones: Vec<ConeRow>,

    /// Original lower bounds.
    pub col_lb: Vec<f64>,

    /// Original upper bounds.
    pub col_ub: Vec<f64>,
}

impl ProblemInfo {
    /// Create a problem with the given bounds and core row count.
    pub fn new(col_lb: Vec<f64>, col_ub: Vec<f64>, num_core_rows: usize) -> NodeResult<Self> {
        if col_lb.len() != col_ub.len() {
            return Err(NodeError::InvalidProblem(format!(
                "{} lower bounds but {} upper bounds",
                col_lb.len(),
                col_ub.len()
            )));
        }
        for (j, (lb, ub)) in col_lb.iter().zip(&col_ub).enumerate() {
            if lb > ub {
                return Err(NodeError::InvalidProblem(format!(
                    "Column {} has lower bound {} above upper bound {}",
                    j, lb, ub
                )));
            }
        }
        Ok(Self {
            num_cols: col_lb.len(),
            num_core_rows,
            relaxed_cols: Vec::new(),
            cones: Vec::new(),
            col_lb,
            col_ub,
        })
    }

    /// Declare integer columns.
    pub fn with_relaxed_cols(mut self, cols: Vec<usize>) -> NodeResult<Self> {
        if let Some(&j) = cols.iter().find(|&&j| j >= self.num_cols) {
            return Err(NodeError::InvalidProblem(format!(
                "Integer column {} but only {} columns",
                j, self.num_cols
            )));
        }
        self.relaxed_cols = cols;
        Ok(self)
    }

    /// Declare conic rows.
    pub fn with_cones(mut self, cones: Vec<ConeRow>) -> NodeResult<Self> {
        for (k, cone) in cones.iter().enumerate() {
            let heads = match cone.kind {
                ConeKind::Lorentz => 1,
                ConeKind::RotatedLorentz => 2,
            };
            if cone.members.len() < heads {
                return Err(NodeError::InvalidProblem(format!(
                    "Cone {} has {} members, needs at least {}",
                    k,
                    cone.members.len(),
                    heads
                )));
            }
            if cone.members.iter().any(|&j| j >= self.num_cols) {
                return Err(NodeError::InvalidProblem(format!(
                    "Cone {} references a column out of range",
                    k
                )));
            }
        }
        self.cones = cones;
        Ok(self)
    }

    /// Explicit description of the root node: the original bounds as hard bounds.
    pub fn root_desc(&self) -> NodeDesc {
        let mut vars = VarBounds::default();
        for j in 0..self.num_cols {
            vars.record_hard_bound(j, Some(self.col_lb[j]), Some(self.col_ub[j]));
        }
        NodeDesc::explicit(vars)
    }

    /// Distance of a value to the nearest integer.
    pub fn fractionality(&self, val: f64) -> f64 {
        let frac = val.fract().abs();
        frac.min(1.0 - frac)
    }

    /// Fractional relaxed columns as (column, value, fractionality).
    pub fn fractional_cols(&self, x: &[f64], tol: f64) -> Vec<(usize, f64, f64)> {
        self.relaxed_cols
            .iter()
            .filter_map(|&j| {
                let val = x[j];
                let frac = self.fractionality(val);
                (frac >= tol).then_some((j, val, frac))
            })
            .collect()
    }

    /// Count integer and conic infeasibilities of a relaxation solution.
    pub fn feasibility(&self, x: &[f64], integer_tol: f64, cone_tol: f64) -> NodeResult<Feasibility> {
        if x.len() < self.num_cols {
            return Err(NodeError::InvalidProblem(format!(
                "Solution has {} values but problem has {} columns",
                x.len(),
                self.num_cols
            )));
        }
        Ok(Feasibility {
            cols_infeasible: self.fractional_cols(x, integer_tol).len(),
            rows_infeasible: self
                .cones
                .iter()
                .filter(|cone| cone.violation(x) > cone_tol)
                .count(),
        })
    }
}
