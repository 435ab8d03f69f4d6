//! Search tree nodes, the node arena and the node codec.

mod arena;
pub mod codec;
mod node;

pub use arena::{ChildNode, NodeArena, Subproblem};
pub use node::{NodeIndex, NodeStatus, TreeNode};
