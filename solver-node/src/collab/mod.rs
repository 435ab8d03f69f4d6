//! Interfaces to the collaborators a node calls out to.
//!
//! The relaxation solver, cut generators, heuristics, branching strategy and
//! incumbent store live outside this crate; the node processor only depends
//! on the traits below. Two small concrete implementations are provided:
//! [`MostFractionalStrategy`] and [`SharedIncumbent`].

mod branching;
mod generator;
mod heuristic;
mod incumbent;
mod pool;
mod solver;

pub use branching::{BranchContext, BranchObject, BranchStrategy, MostFractionalStrategy};
pub use generator::{
    decide_using_generator, ActivationInput, ConstraintGenerator, GeneratorContext, GeneratorSlot,
    GeneratorStats,
};
pub use heuristic::{Heuristic, HeuristicContext};
pub use incumbent::{IncumbentStore, SharedIncumbent};
pub use pool::{ConstraintPool, GeneratedColumn, VariablePool};
pub use solver::{RelaxationSolver, RowCut};
