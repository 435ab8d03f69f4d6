//! One-line node life events.

use crate::tree::TreeNode;

/// Node life event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TraceEvent {
    Candidate,
    Fathomed,
    Infeasible,
    Integer,
    Pregnant,
    Branched,
}

impl TraceEvent {
    fn label(self) -> &'static str {
        match self {
            TraceEvent::Candidate => "candidate",
            TraceEvent::Fathomed => "fathomed",
            TraceEvent::Infeasible => "infeasible",
            TraceEvent::Integer => "integer",
            TraceEvent::Pregnant => "pregnant",
            TraceEvent::Branched => "branched",
        }
    }
}

/// Emit a trace line; `objects` carries (sum of infeasibility, number of branch objects).
pub(crate) fn trace(event: TraceEvent, node: &TreeNode, sense: f64, objects: Option<(f64, usize)>) {
    let objective = sense * node.quality;
    match objects {
        Some((sum_inf, count)) => log::info!(
            target: "solver_node::trace",
            "{:<10} node {:>6} parent {:>6} {} obj {:>14.6e} inf {:.4} objects {}",
            event.label(),
            node.index,
            node.parent_tag(),
            node.desc.direction_symbol(),
            objective,
            sum_inf,
            count
        ),
        None => log::info!(
            target: "solver_node::trace",
            "{:<10} node {:>6} parent {:>6} {} obj {:>14.6e}",
            event.label(),
            node.index,
            node.parent_tag(),
            node.desc.direction_symbol(),
            objective
        ),
    }
}
