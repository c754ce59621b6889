// src/graph/report.rs

//! Human-readable cycle traces.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::graph::node::{DependencyGraph, NodeId};
use crate::graph::sorter::SortOutcome;
use crate::units::Unit;

/// Marker appended to a node where a trace loops back.
pub const CYCLE_MARKER: &str = "<-- cycle";

/// Deepest level that still gets its own indentation. Lines below it keep
/// this indent and carry their depth as a `[n]` prefix.
pub const MAX_INDENT_DEPTH: usize = 32;

/// Render every unresolved node and its dependents as an indented tree.
///
/// A visited set is shared across all roots. Revisiting a node below the top
/// level prints it once more with [`CYCLE_MARKER`] and stops there; a root
/// that was already printed under an earlier root is skipped.
///
/// Returns an empty string when the sort succeeded.
pub fn describe_cycles<U: Unit>(graph: &DependencyGraph<U>, outcome: &SortOutcome) -> String {
    if outcome.success() {
        return String::new();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} of {} nodes could not be ordered because of dependency cycles:",
        outcome.unresolved().len(),
        graph.len()
    );

    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut stack: Vec<(NodeId, usize)> = Vec::new();
    for &root in outcome.unresolved() {
        stack.push((root, 0));
        while let Some((id, depth)) = stack.pop() {
            let name = graph.node(id).name();
            let revisit = !visited.insert(id);
            if revisit && depth == 0 {
                continue;
            }

            write_line(&mut out, depth, name, revisit);
            if revisit {
                continue;
            }
            // Reversed so the first successor is popped first.
            for &next in graph.node(id).outgoing().iter().rev() {
                stack.push((next, depth + 1));
            }
        }
    }
    out
}

fn write_line(out: &mut String, depth: usize, name: &str, revisit: bool) {
    let indent = "  ".repeat(depth.min(MAX_INDENT_DEPTH) + 1);
    let _ = write!(out, "{indent}");
    if depth > MAX_INDENT_DEPTH {
        let _ = write!(out, "[{depth}] ");
    }
    if revisit {
        let _ = writeln!(out, "{name}  {CYCLE_MARKER}");
    } else {
        let _ = writeln!(out, "{name}");
    }
}
