//! Node processing: installation, bounding, the branch-constrain-or-price
//! decision, cut admission and branching.

mod decision;
mod filter;
mod install;
mod ops;
mod processor;
mod status;
mod trace;

pub use decision::{
    branch_constrain_or_price, BcpFlags, Decision, DecisionInput, FathomReason, Step, Verdict,
};
pub use filter::{apply_constraints, AdmissionSummary, CutFilter, Rejection};
pub use install::{install_subproblem, InstallSummary};
pub use ops::NodeOps;
pub use processor::{NodeProcessor, ProcessContext, ProcessOutcome};
pub use status::SubproblemStatus;
