// src/graph/acyclic.rs

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{OrderError, Result};
use crate::graph::node::{DependencyGraph, NodeId};
use crate::graph::report::describe_cycles;
use crate::graph::sorter::SortOutcome;
use crate::units::Unit;

/// Groups of nodes that depend on each other, one group per cycle.
///
/// Nodes that are merely stuck behind a cycle are not included. Groups are
/// sorted internally and by their first node.
pub fn cycles<U: Unit>(graph: &DependencyGraph<U>) -> Vec<Vec<NodeId>> {
    // Edge direction: prerequisite -> dependent.
    let mut g: DiGraphMap<usize, ()> = DiGraphMap::new();
    for node in graph.nodes() {
        g.add_node(node.id().index());
    }
    for (before, after) in graph.edges() {
        g.add_edge(before.index(), after.index(), ());
    }

    let mut groups: Vec<Vec<NodeId>> = tarjan_scc(&g)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|scc| {
            let mut ids: Vec<NodeId> = scc.into_iter().map(NodeId).collect();
            ids.sort();
            ids
        })
        .collect();
    groups.sort();
    groups
}

/// Strict-mode check: fail if `outcome` left anything unresolved.
///
/// The error names every cycle and carries the full trace from
/// [`describe_cycles`].
pub fn ensure_acyclic<U: Unit>(graph: &DependencyGraph<U>, outcome: &SortOutcome) -> Result<()> {
    if outcome.success() {
        return Ok(());
    }

    let groups: Vec<String> = cycles(graph)
        .iter()
        .map(|group| {
            let names: Vec<&str> = group.iter().map(|id| graph.node(*id).name()).collect();
            format!("[{}]", names.join(", "))
        })
        .collect();

    Err(OrderError::DagCycle(format!(
        "{} cycle(s) between {}\n{}",
        groups.len(),
        groups.join(", "),
        describe_cycles(graph, outcome)
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{sort, GraphBuilder};
    use crate::units::{AssemblyUnit, CallbackUnit, OrderingRule};

    fn after(ty: &str, dep: &str) -> CallbackUnit {
        CallbackUnit::new(ty, "Run", "X").with_rule(OrderingRule::RunAfterClass(dep.into()))
    }

    #[test]
    fn acyclic_graph_passes() {
        let g = GraphBuilder::new()
            .build(vec![
                AssemblyUnit::new("Engine"),
                AssemblyUnit::new("Game").with_references(["Engine"]),
            ])
            .unwrap();
        assert!(cycles(&g).is_empty());
        assert!(ensure_acyclic(&g, &sort(&g)).is_ok());
    }

    #[test]
    fn reference_cycle_is_reported() {
        let g = GraphBuilder::new()
            .build(vec![
                AssemblyUnit::new("A").with_references(["B"]),
                AssemblyUnit::new("B").with_references(["A"]),
            ])
            .unwrap();
        match ensure_acyclic(&g, &sort(&g)) {
            Err(OrderError::DagCycle(msg)) => {
                assert!(msg.starts_with("1 cycle(s) between [A, B]"));
            }
            other => panic!("expected DagCycle, got {other:?}"),
        }
    }

    #[test]
    fn every_cycle_and_stuck_node_is_named() {
        let g = GraphBuilder::new()
            .build(vec![
                after("A", "B"),
                after("B", "A"),
                after("C", "D"),
                after("D", "C"),
                after("E", "D"),
                CallbackUnit::new("F", "Run", "X"),
            ])
            .unwrap();

        let groups = cycles(&g);
        assert_eq!(groups.len(), 2);

        let Err(OrderError::DagCycle(msg)) = ensure_acyclic(&g, &sort(&g)) else {
            panic!("expected DagCycle");
        };
        assert!(msg.starts_with("2 cycle(s) between [A.Run, B.Run], [C.Run, D.Run]"));
        for name in ["A.Run", "B.Run", "C.Run", "D.Run", "E.Run"] {
            assert!(msg.contains(name), "{name} missing from {msg}");
        }
        assert!(!msg.contains("F.Run"));
    }
}
