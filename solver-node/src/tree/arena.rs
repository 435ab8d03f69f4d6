//! Flat node table with parent indices.
//!
//! Differential descriptions are resolved by following parent indices back to
//! the nearest explicit node and replaying the recorded diffs root-to-leaf.

use crate::desc::{LinearConstraint, MaterializedBounds, NodeDesc};
use crate::error::{try_vec, NodeError, NodeResult};

use super::node::{NodeIndex, NodeStatus, TreeNode};

/// A child description produced by branching, ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildNode {
    /// Child description.
    pub desc: NodeDesc,

    /// Initial status.
    pub status: NodeStatus,

    /// Quality hint for ordering.
    pub quality: f64,
}

/// Full state of a node reconstructed from its ancestor chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Subproblem {
    /// Hard and soft column bounds.
    pub bounds: MaterializedBounds,

    /// Active non-core constraints in installation order.
    pub constraints: Vec<LinearConstraint>,
}

/// Arena of tree nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Option<TreeNode>>,
}

impl NodeArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a root node.
    pub fn insert_root(&mut self, desc: NodeDesc) -> NodeIndex {
        let mut node = TreeNode::root(desc);
        node.index = self.nodes.len();
        self.place(node)
    }

    /// Insert a child of `parent`.
    pub fn add_child(&mut self, parent: NodeIndex, child: ChildNode) -> NodeResult<NodeIndex> {
        let depth = self.get(parent)?.depth + 1;
        let index = self.nodes.len();
        let node = TreeNode {
            index,
            parent: Some(parent),
            depth,
            status: child.status,
            quality: child.quality,
            sol_estimate: child.quality,
            diving: false,
            branch_object: None,
            desc: child.desc,
        };
        Ok(self.place(node))
    }

    /// Put a node at its own index, growing the table as needed.
    pub(crate) fn place(&mut self, node: TreeNode) -> NodeIndex {
        let index = node.index;
        if index >= self.nodes.len() {
            self.nodes.resize_with(index + 1, || None);
        }
        self.nodes[index] = Some(node);
        index
    }

    /// Borrow a node.
    pub fn get(&self, index: NodeIndex) -> NodeResult<&TreeNode> {
        self.nodes
            .get(index)
            .and_then(Option::as_ref)
            .ok_or(NodeError::UnknownNode(index))
    }

    /// Mutably borrow a node.
    pub fn get_mut(&mut self, index: NodeIndex) -> NodeResult<&mut TreeNode> {
        self.nodes
            .get_mut(index)
            .and_then(Option::as_mut)
            .ok_or(NodeError::UnknownNode(index))
    }

    /// Remove a node; differential descendants can no longer be materialized.
    pub fn remove(&mut self, index: NodeIndex) -> NodeResult<TreeNode> {
        self.nodes
            .get_mut(index)
            .and_then(Option::take)
            .ok_or(NodeError::UnknownNode(index))
    }

    /// True if `index` holds a node.
    pub fn contains(&self, index: NodeIndex) -> bool {
        self.get(index).is_ok()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// True if the arena holds no node.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over live nodes.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter_map(Option::as_ref)
    }

    /// Indices from `index` up to its nearest explicit ancestor (or the root), leaf first.
    ///
    /// During ramp-up every node carries a full description and the path is the node alone;
    /// a differential non-root node is rejected there.
    pub fn path_to_explicit(&self, index: NodeIndex, rampup: bool) -> NodeResult<Vec<NodeIndex>> {
        let mut path = vec![index];
        let mut node = self.get(index)?;
        if rampup {
            if !node.desc.explicit && node.parent.is_some() {
                return Err(NodeError::InvalidDiff {
                    node: index,
                    reason: "differential node installed during ramp-up".to_string(),
                });
            }
            return Ok(path);
        }
        while !node.desc.explicit {
            let Some(parent) = node.parent else { break };
            let orphan = node.index;
            node = self
                .nodes
                .get(parent)
                .and_then(Option::as_ref)
                .ok_or_else(|| NodeError::InvalidDiff {
                    node: orphan,
                    reason: format!("parent {} is not in the arena", parent),
                })?;
            path.push(parent);
        }
        Ok(path)
    }

    /// Reconstruct bounds and active constraints of a node.
    pub fn materialize(&self, index: NodeIndex, num_cols: usize, rampup: bool) -> NodeResult<Subproblem> {
        let path = self.path_to_explicit(index, rampup)?;
        let mut bounds = MaterializedBounds::unbounded(num_cols)?;
        let mut constraints: Vec<LinearConstraint> = Vec::new();

        for &k in path.iter().rev() {
            let node = self.get(k)?;
            let vars = &node.desc.vars;
            bounds.hard.tighten(k, &vars.lb_hard, &vars.ub_hard)?;
            bounds.soft.tighten(k, &vars.lb_soft, &vars.ub_soft)?;

            let cons = &node.desc.cons;
            if !cons.removed.is_empty() {
                let mut survivors = try_vec(constraints.len(), "constraint survivor mask")?;
                survivors.resize(constraints.len(), true);
                for &pos in &cons.removed {
                    let slot = survivors.get_mut(pos).ok_or_else(|| NodeError::InvalidDiff {
                        node: k,
                        reason: format!(
                            "removes position {} but only {} constraints are active",
                            pos,
                            constraints.len()
                        ),
                    })?;
                    *slot = false;
                }
                let mut mask = survivors.into_iter();
                constraints.retain(|_| mask.next().unwrap_or(true));
            }
            constraints.extend(cons.added.iter().cloned());
        }

        log::debug!(
            target: "solver_node::process",
            "Node {}: materialized over {} nodes, {} active constraints",
            index,
            path.len(),
            constraints.len()
        );
        Ok(Subproblem { bounds, constraints })
    }

    /// Full hard and soft bounds of a node.
    pub fn materialize_full_bounds(&self, index: NodeIndex, num_cols: usize) -> NodeResult<MaterializedBounds> {
        Ok(self.materialize(index, num_cols, false)?.bounds)
    }

    /// Replace a node's diff with its full description.
    ///
    /// Hard bounds are stored for every column, soft bounds only where finite,
    /// and the whole active constraint list becomes the node's additions.
    pub fn convert_to_explicit(&mut self, index: NodeIndex, num_cols: usize) -> NodeResult<()> {
        if self.get(index)?.desc.explicit {
            return Ok(());
        }
        let Subproblem {
            bounds,
            constraints,
        } = self.materialize(index, num_cols, false)?;

        let node = self.get_mut(index)?;
        node.desc.vars = bounds.into_var_bounds();
        node.desc.cons.added = constraints;
        node.desc.cons.removed.clear();
        node.desc.explicit = true;
        log::debug!(target: "solver_node::process", "Node {}: converted to explicit", index);
        Ok(())
    }

    /// Turn an explicit node back into a diff against its parent.
    pub fn convert_to_relative(&mut self, index: NodeIndex) -> NodeResult<()> {
        self.get(index)?;
        Err(NodeError::Unsupported("convert to relative"))
    }
}
