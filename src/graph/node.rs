// src/graph/node.rs

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::units::Unit;

/// Index of a node inside its [`DependencyGraph`]. Only the graph hands
/// these out.
///
/// Ids follow the deterministic (identity-sorted) node order, so iterating a
/// set of ids visits nodes in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One unit plus its dependency edges.
#[derive(Debug, Clone)]
pub struct GraphNode<U> {
    id: NodeId,
    unit: U,
    /// Owning package of the unit's assembly, empty if none.
    package: String,
    /// Nodes that must come before this one.
    incoming: BTreeSet<NodeId>,
    /// Nodes that must come after this one.
    outgoing: BTreeSet<NodeId>,
}

impl<U: Unit> GraphNode<U> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn unit(&self) -> &U {
        &self.unit
    }

    pub fn name(&self) -> &str {
        self.unit.identity()
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn incoming(&self) -> &BTreeSet<NodeId> {
        &self.incoming
    }

    pub fn outgoing(&self) -> &BTreeSet<NodeId> {
        &self.outgoing
    }
}

/// Node arena with symmetric edge bookkeeping.
///
/// Every edge `before -> after` is stored twice: in `before.outgoing` and in
/// `after.incoming`. [`DependencyGraph::add_edge`] is the only way to create
/// one, which keeps both sides in sync.
#[derive(Debug, Clone)]
pub struct DependencyGraph<U> {
    nodes: Vec<GraphNode<U>>,
}

impl<U: Unit> DependencyGraph<U> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append a node and return its id.
    pub fn add_node(&mut self, unit: U, package: String) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(GraphNode {
            id,
            unit,
            package,
            incoming: BTreeSet::new(),
            outgoing: BTreeSet::new(),
        });
        id
    }

    /// Record that `before` must be ordered ahead of `after`.
    ///
    /// Returns `false` when the edge already existed or is a self-edge.
    /// Self-edges are dropped: a unit that depends on its own class,
    /// assembly or package has nothing to wait for.
    pub fn add_edge(&mut self, before: NodeId, after: NodeId) -> bool {
        if before == after {
            debug!(node = self.nodes[before.0].name(), "dropping self-dependency");
            return false;
        }
        let inserted = self.nodes[before.0].outgoing.insert(after);
        self.nodes[after.0].incoming.insert(before);
        inserted
    }

    pub fn node(&self, id: NodeId) -> &GraphNode<U> {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[GraphNode<U>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.outgoing.len()).sum()
    }

    /// Look up a node by its unit identity (linear scan; for diagnostics and
    /// tests, the builder uses its own indices).
    pub fn find(&self, identity: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.name() == identity)
            .map(|n| n.id)
    }

    /// Iterate all edges as `(before, after)` pairs in node order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes
            .iter()
            .flat_map(|n| n.outgoing.iter().map(move |succ| (n.id, *succ)))
    }

    /// Whether every outgoing edge has a matching incoming entry and vice
    /// versa.
    pub fn is_symmetric(&self) -> bool {
        self.nodes.iter().all(|n| {
            n.outgoing
                .iter()
                .all(|succ| self.nodes[succ.0].incoming.contains(&n.id))
                && n.incoming
                    .iter()
                    .all(|pred| self.nodes[pred.0].outgoing.contains(&n.id))
        })
    }

}

impl<U: Unit> Default for DependencyGraph<U> {
    fn default() -> Self {
        Self::new()
    }
}
