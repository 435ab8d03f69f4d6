//! Non-core linear constraints (cuts) and their per-node diffs.

use serde::{Deserialize, Serialize};
use sprs::CsVec;

use crate::collab::RowCut;
use crate::error::{NodeError, NodeResult};

/// A sparse linear row `lb <= a^T x <= ub` with hard and soft sides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ConstraintRepr", into = "ConstraintRepr")]
pub struct LinearConstraint {
    /// Row coefficients.
    pub row: CsVec<f64>,

    /// Hard lower side.
    pub lb_hard: f64,

    /// Hard upper side.
    pub ub_hard: f64,

    /// Soft lower side.
    pub lb_soft: f64,

    /// Soft upper side.
    pub ub_soft: f64,
}

impl LinearConstraint {
    /// Build a constraint from unsorted coefficients.
    pub fn new(
        dim: usize,
        indices: Vec<usize>,
        values: Vec<f64>,
        lower: f64,
        upper: f64,
    ) -> NodeResult<Self> {
        let row = CsVec::new_from_unsorted(dim, indices, values).map_err(|(_, _, e)| {
            NodeError::InvalidProblem(format!("malformed constraint row: {}", e))
        })?;
        Ok(Self {
            row,
            lb_hard: lower,
            ub_hard: upper,
            lb_soft: f64::NEG_INFINITY,
            ub_soft: f64::INFINITY,
        })
    }

    /// `a^T x <= rhs`.
    pub fn le(dim: usize, indices: Vec<usize>, values: Vec<f64>, rhs: f64) -> NodeResult<Self> {
        Self::new(dim, indices, values, f64::NEG_INFINITY, rhs)
    }

    /// `a^T x >= rhs`.
    pub fn ge(dim: usize, indices: Vec<usize>, values: Vec<f64>, rhs: f64) -> NodeResult<Self> {
        Self::new(dim, indices, values, rhs, f64::INFINITY)
    }

    /// Number of stored coefficients.
    pub fn len(&self) -> usize {
        self.row.nnz()
    }

    /// True if no coefficient is stored.
    pub fn is_empty(&self) -> bool {
        self.row.nnz() == 0
    }

    /// Effective lower side.
    pub fn lower(&self) -> f64 {
        self.lb_hard.max(self.lb_soft)
    }

    /// Effective upper side.
    pub fn upper(&self) -> f64 {
        self.ub_hard.min(self.ub_soft)
    }

    /// Row activity at `x`; exactly-zero coefficients are skipped.
    pub fn activity(&self, x: &[f64]) -> f64 {
        self.row
            .iter()
            .filter(|(_, a)| **a != 0.0)
            .map(|(j, &a)| a * x.get(j).copied().unwrap_or(0.0))
            .sum()
    }

    /// How far `x` is cut off: positive when the row separates `x`, -1 for a free row.
    pub fn violation(&self, x: &[f64]) -> f64 {
        let activity = self.activity(x);
        let mut violation = -1.0;
        let lower = self.lower();
        let upper = self.upper();
        if lower > f64::NEG_INFINITY {
            violation = lower - activity;
        }
        if upper < f64::INFINITY {
            violation = f64::max(violation, activity - upper);
        }
        violation
    }

    /// Smallest and largest nonzero coefficient magnitudes, None if all are zero.
    pub fn magnitude_range(&self) -> Option<(f64, f64)> {
        self.row
            .data()
            .iter()
            .filter(|a| **a != 0.0)
            .map(|a| a.abs())
            .fold(None, |acc, a| match acc {
                None => Some((a, a)),
                Some((lo, hi)) => Some((lo.min(a), hi.max(a))),
            })
    }

    /// Solver-native row cut with the effective sides.
    pub fn to_row_cut(&self) -> RowCut {
        RowCut {
            row: self.row.clone(),
            lb: self.lower(),
            ub: self.upper(),
        }
    }
}

impl PartialEq for LinearConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.row.dim() == other.row.dim()
            && self.row.indices() == other.row.indices()
            && self.row.data() == other.row.data()
            && self.lb_hard == other.lb_hard
            && self.ub_hard == other.ub_hard
            && self.lb_soft == other.lb_soft
            && self.ub_soft == other.ub_soft
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct ConstraintRepr {
    dim: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
    lb_hard: f64,
    ub_hard: f64,
    lb_soft: f64,
    ub_soft: f64,
}

impl From<LinearConstraint> for ConstraintRepr {
    fn from(con: LinearConstraint) -> Self {
        Self {
            dim: con.row.dim(),
            indices: con.row.indices().to_vec(),
            values: con.row.data().to_vec(),
            lb_hard: con.lb_hard,
            ub_hard: con.ub_hard,
            lb_soft: con.lb_soft,
            ub_soft: con.ub_soft,
        }
    }
}

impl TryFrom<ConstraintRepr> for LinearConstraint {
    type Error = NodeError;

    fn try_from(repr: ConstraintRepr) -> NodeResult<Self> {
        let mut con = Self::new(repr.dim, repr.indices, repr.values, repr.lb_hard, repr.ub_hard)?;
        con.lb_soft = repr.lb_soft;
        con.ub_soft = repr.ub_soft;
        Ok(con)
    }
}

/// Non-core constraints added and removed at a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDiff {
    /// Constraints added at this node.
    pub added: Vec<LinearConstraint>,

    /// Positions removed from the parent's active list.
    pub removed: Vec<usize>,
}

impl ConstraintDiff {
    /// True if the node neither adds nor removes constraints.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
