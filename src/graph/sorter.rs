// src/graph/sorter.rs

use std::collections::{BTreeSet, VecDeque};

use tracing::debug;

use crate::graph::node::{DependencyGraph, NodeId};
use crate::units::Unit;

/// Result of a topological sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOutcome {
    /// Nodes that could be ordered, prerequisites first.
    pub(crate) order: Vec<NodeId>,
    /// Nodes that were never released: members of a cycle, or stuck behind
    /// one. In node order.
    pub(crate) unresolved: Vec<NodeId>,
}

impl SortOutcome {
    /// `true` iff every node was ordered.
    pub fn success(&self) -> bool {
        self.unresolved.is_empty()
    }

    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Unresolved nodes, sorted by id.
    pub fn unresolved(&self) -> &[NodeId] {
        &self.unresolved
    }

    pub fn is_unresolved(&self, id: NodeId) -> bool {
        self.unresolved.binary_search(&id).is_ok()
    }
}

/// Kahn's algorithm.
///
/// Works on a private copy of the edge sets; `graph` is left untouched. The
/// queue is FIFO and seeded in node order, so nodes that become ready at the
/// same time come out in the order they were released. A cycle does not
/// abort the sort: everything that can be ordered is, and the rest is
/// returned in [`SortOutcome::unresolved`].
pub fn sort<U: Unit>(graph: &DependencyGraph<U>) -> SortOutcome {
    let mut incoming: Vec<BTreeSet<NodeId>> =
        graph.nodes().iter().map(|n| n.incoming().clone()).collect();
    let mut outgoing: Vec<BTreeSet<NodeId>> =
        graph.nodes().iter().map(|n| n.outgoing().clone()).collect();

    let mut queue: VecDeque<NodeId> = graph
        .nodes()
        .iter()
        .filter(|n| n.incoming().is_empty())
        .map(|n| n.id())
        .collect();

    let mut order = Vec::with_capacity(graph.len());

    while let Some(id) = queue.pop_front() {
        order.push(id);

        let successors = std::mem::take(&mut outgoing[id.index()]);
        for succ in successors {
            let pending = &mut incoming[succ.index()];
            pending.remove(&id);
            if pending.is_empty() {
                queue.push_back(succ);
            }
        }
    }

    let unresolved: Vec<NodeId> = incoming
        .iter()
        .enumerate()
        .filter(|(_, pending)| !pending.is_empty())
        .map(|(i, _)| NodeId(i))
        .collect();

    debug!(
        ordered = order.len(),
        unresolved = unresolved.len(),
        "topological sort finished"
    );

    SortOutcome { order, unresolved }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::units::{CallbackUnit, OrderingRule};

    fn names<U: Unit>(g: &DependencyGraph<U>, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|id| g.node(*id).name().to_string()).collect()
    }

    fn after(ty: &str, dep: &str) -> CallbackUnit {
        CallbackUnit::new(ty, "Run", "X").with_rule(OrderingRule::RunAfterClass(dep.into()))
    }

    fn plain(ty: &str) -> CallbackUnit {
        CallbackUnit::new(ty, "Run", "X")
    }

    #[test]
    fn chain_sorts_in_dependency_order() {
        let g = GraphBuilder::new()
            .build(vec![after("C", "B"), plain("A"), after("B", "A")])
            .unwrap();
        let out = sort(&g);
        assert!(out.success());
        assert_eq!(names(&g, out.order()), vec!["A.Run", "B.Run", "C.Run"]);
    }

    #[test]
    fn mutual_dependency_orders_nothing() {
        let g = GraphBuilder::new()
            .build(vec![after("A", "B"), after("B", "A")])
            .unwrap();
        let out = sort(&g);
        assert!(!out.success());
        assert!(out.order().is_empty());
        assert_eq!(names(&g, out.unresolved()), vec!["A.Run", "B.Run"]);
    }

    #[test]
    fn cycle_does_not_block_independent_nodes() {
        let g = GraphBuilder::new()
            .build(vec![
                after("A", "B"),
                after("B", "A"),
                plain("C"),
                plain("D"),
                plain("E"),
            ])
            .unwrap();
        let out = sort(&g);
        assert!(!out.success());
        assert_eq!(names(&g, out.order()), vec!["C.Run", "D.Run", "E.Run"]);
        assert_eq!(names(&g, out.unresolved()), vec!["A.Run", "B.Run"]);
    }

    #[test]
    fn nodes_behind_a_cycle_stay_unresolved() {
        let g = GraphBuilder::new()
            .build(vec![after("A", "B"), after("B", "A"), after("C", "A"), plain("D")])
            .unwrap();
        let out = sort(&g);
        assert_eq!(names(&g, out.order()), vec!["D.Run"]);
        assert_eq!(names(&g, out.unresolved()), vec!["A.Run", "B.Run", "C.Run"]);
        assert!(out.is_unresolved(g.find("C.Run").unwrap()));
    }

    #[test]
    fn sort_does_not_mutate_graph() {
        let g = GraphBuilder::new()
            .build(vec![plain("A"), after("B", "A")])
            .unwrap();
        let edges_before = g.edge_count();
        let first = sort(&g);
        let second = sort(&g);
        assert_eq!(g.edge_count(), edges_before);
        assert_eq!(first, second);
    }

    #[test]
    fn unrelated_nodes_follow_identity_order() {
        let g = GraphBuilder::new()
            .build(vec![plain("Z"), plain("M"), plain("A")])
            .unwrap();
        let out = sort(&g);
        assert_eq!(names(&g, out.order()), vec!["A.Run", "M.Run", "Z.Run"]);
    }
}
