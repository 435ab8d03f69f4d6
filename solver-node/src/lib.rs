//! Node processing for a branch-and-cut solver of mixed-integer conic programs.
//!
//! A search tree is kept in a [`NodeArena`]. Each node stores a description of
//! its subproblem, either explicit or as a diff against its parent. A
//! [`NodeProcessor`] takes one node at a time:
//!
//! - Installs its subproblem into the relaxation solver
//! - Solves the relaxation and classifies the result
//! - Fathoms, adds cuts, returns the node to the pool or marks it for branching
//! - Creates the two children of a node marked for branching
//!
//! The relaxation solver, cut generators, heuristics, branching strategy and
//! incumbent store are collaborators behind the traits in [`collab`].

#![warn(missing_docs)]

pub mod collab;
pub mod desc;
pub mod error;
pub mod model;
pub mod process;
pub mod settings;
pub mod tree;

pub use collab::{IncumbentStore, RelaxationSolver, SharedIncumbent};
pub use desc::{LinearConstraint, NodeDesc};
pub use error::{NodeError, NodeResult};
pub use model::{ProblemInfo, Solution};
pub use process::{NodeOps, NodeProcessor, ProcessContext, ProcessOutcome};
pub use settings::{CutStrategy, NodeSettings, ObjSense};
pub use tree::{NodeArena, NodeIndex, NodeStatus, TreeNode};
