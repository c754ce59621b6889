// src/graph/dot.rs

//! Graphviz export for debugging dependency graphs.
//!
//! Styling:
//! - every node is a box; unresolved (cyclic) nodes are filled pink,
//! - dependency edges are blue,
//! - the resolved order is drawn as a dashed green chain that does not
//!   affect layout.

use std::fmt::Write as _;

use crate::graph::node::DependencyGraph;
use crate::graph::sorter::SortOutcome;
use crate::units::Unit;

pub const CYCLE_FILL: &str = "pink";
pub const DEPENDENCY_COLOR: &str = "blue";
pub const ORDER_COLOR: &str = "green";

/// Render `graph` (and the order found for it) as a `digraph`.
pub fn to_dot<U: Unit>(graph: &DependencyGraph<U>, outcome: &SortOutcome) -> String {
    let mut dot = String::from("digraph dependencies {\n");
    dot.push_str("  rankdir=TB;\n");
    dot.push_str("  node [shape=box];\n\n");

    for node in graph.nodes() {
        let name = quote(node.name());
        if outcome.is_unresolved(node.id()) {
            let _ = writeln!(dot, "  {name} [style=filled, fillcolor={CYCLE_FILL}];");
        } else {
            let _ = writeln!(dot, "  {name};");
        }
    }
    dot.push('\n');

    for (before, after) in graph.edges() {
        let _ = writeln!(
            dot,
            "  {} -> {} [color={DEPENDENCY_COLOR}];",
            quote(graph.node(before).name()),
            quote(graph.node(after).name())
        );
    }

    if outcome.order().len() > 1 {
        dot.push('\n');
        for pair in outcome.order().windows(2) {
            let _ = writeln!(
                dot,
                "  {} -> {} [color={ORDER_COLOR}, style=dashed, constraint=false];",
                quote(graph.node(pair[0]).name()),
                quote(graph.node(pair[1]).name())
            );
        }
    }

    dot.push_str("}\n");
    dot
}

fn quote(id: &str) -> String {
    let mut s = String::with_capacity(id.len() + 2);
    s.push('"');
    for c in id.chars() {
        match c {
            '"' => s.push_str("\\\""),
            '\\' => s.push_str("\\\\"),
            '\n' => s.push_str("\\n"),
            other => s.push(other),
        }
    }
    s.push('"');
    s
}
