//! Column bound records and their materialized form.

use serde::{Deserialize, Serialize};

use crate::error::{try_vec, NodeError, NodeResult};
use crate::tree::NodeIndex;

/// Sparse list of (column, value) bound entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundDiff {
    /// Column indices.
    pub indices: Vec<usize>,

    /// Bound values, parallel to `indices`.
    pub values: Vec<f64>,
}

impl BoundDiff {
    /// Dense diff covering columns `0..values.len()`.
    pub fn full(values: Vec<f64>) -> Self {
        Self {
            indices: (0..values.len()).collect(),
            values,
        }
    }

    /// Append an entry.
    pub fn push(&mut self, index: usize, value: f64) {
        self.indices.push(index);
        self.values.push(value);
    }

    /// Overwrite the entry for `index`, appending if absent.
    pub fn set(&mut self, index: usize, value: f64) {
        match self.indices.iter().position(|&j| j == index) {
            Some(k) => self.values[k] = value,
            None => self.push(index, value),
        }
    }

    /// Iterate over (column, value) entries.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Hard and soft bound changes recorded at one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VarBounds {
    /// Hard lower bounds.
    pub lb_hard: BoundDiff,

    /// Hard upper bounds.
    pub ub_hard: BoundDiff,

    /// Soft lower bounds.
    pub lb_soft: BoundDiff,

    /// Soft upper bounds.
    pub ub_soft: BoundDiff,
}

impl VarBounds {
    /// Record a hard bound change on a column.
    pub fn record_hard_bound(&mut self, index: usize, lower: Option<f64>, upper: Option<f64>) {
        if let Some(lb) = lower {
            self.lb_hard.push(index, lb);
        }
        if let Some(ub) = upper {
            self.ub_hard.push(index, ub);
        }
    }

    /// Record a soft bound change on a column.
    pub fn record_soft_bound(&mut self, index: usize, lower: Option<f64>, upper: Option<f64>) {
        if let Some(lb) = lower {
            self.lb_soft.push(index, lb);
        }
        if let Some(ub) = upper {
            self.ub_soft.push(index, ub);
        }
    }

    /// Number of recorded entries of any kind.
    pub fn num_entries(&self) -> usize {
        self.lb_hard.len() + self.ub_hard.len() + self.lb_soft.len() + self.ub_soft.len()
    }
}

/// Dense lower and upper bounds over all columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FullBounds {
    /// Lower bounds.
    pub lower: Vec<f64>,

    /// Upper bounds.
    pub upper: Vec<f64>,
}

impl FullBounds {
    /// All columns free.
    pub fn unbounded(num_cols: usize) -> NodeResult<Self> {
        let mut lower = try_vec(num_cols, "column lower bounds")?;
        let mut upper = try_vec(num_cols, "column upper bounds")?;
        lower.resize(num_cols, f64::NEG_INFINITY);
        upper.resize(num_cols, f64::INFINITY);
        Ok(Self { lower, upper })
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// True if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Tighten with a node's diff: lower bounds take the max, upper bounds the min.
    pub fn tighten(&mut self, node: NodeIndex, lower: &BoundDiff, upper: &BoundDiff) -> NodeResult<()> {
        for (j, v) in lower.iter() {
            let slot = self.lower.get_mut(j).ok_or_else(|| out_of_range(node, j))?;
            *slot = slot.max(v);
        }
        for (j, v) in upper.iter() {
            let slot = self.upper.get_mut(j).ok_or_else(|| out_of_range(node, j))?;
            *slot = slot.min(v);
        }
        Ok(())
    }
}

fn out_of_range(node: NodeIndex, column: usize) -> NodeError {
    NodeError::InvalidDiff {
        node,
        reason: format!("bound on column {} out of range", column),
    }
}

/// Hard and soft bounds reconstructed for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedBounds {
    /// Accumulated hard bounds.
    pub hard: FullBounds,

    /// Accumulated soft bounds.
    pub soft: FullBounds,
}

impl MaterializedBounds {
    /// Free bounds over `num_cols` columns.
    pub fn unbounded(num_cols: usize) -> NodeResult<Self> {
        Ok(Self {
            hard: FullBounds::unbounded(num_cols)?,
            soft: FullBounds::unbounded(num_cols)?,
        })
    }

    /// Bounds to load into the solver: the tighter of hard and soft per column.
    pub fn effective(&self) -> FullBounds {
        let lower = self
            .hard
            .lower
            .iter()
            .zip(&self.soft.lower)
            .map(|(h, s)| h.max(*s))
            .collect();
        let upper = self
            .hard
            .upper
            .iter()
            .zip(&self.soft.upper)
            .map(|(h, s)| h.min(*s))
            .collect();
        FullBounds { lower, upper }
    }

    /// Full description of these bounds: every hard bound, finite soft bounds only.
    pub fn into_var_bounds(self) -> VarBounds {
        let mut vars = VarBounds {
            lb_hard: BoundDiff::full(self.hard.lower),
            ub_hard: BoundDiff::full(self.hard.upper),
            ..Default::default()
        };
        for (j, (lb, ub)) in self.soft.lower.into_iter().zip(self.soft.upper).enumerate() {
            vars.record_soft_bound(j, lb.is_finite().then_some(lb), ub.is_finite().then_some(ub));
        }
        vars
    }
}
