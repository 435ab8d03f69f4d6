//! Problem and solution types.

mod problem;
mod solution;

pub use problem::{ConeKind, ConeRow, Feasibility, ProblemInfo};
pub use solution::{IncumbentTracker, Solution};
