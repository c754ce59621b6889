// src/graph/builder.rs

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::errors::{OrderError, Result};
use crate::graph::node::{DependencyGraph, NodeId};
use crate::units::{
    OrderingRule, PackageResolver, PluginExceptions, RuleDirection, RuleScope, Unit, UnitFilter,
};

/// Builds a [`DependencyGraph`] from units and their declared dependencies.
///
/// Construction happens in two phases: the node set and lookup indices are
/// built first, then every unit's rules and references are resolved into
/// edges in identity order. Indices are dropped once the edges are wired.
#[derive(Default, Clone, Copy)]
pub struct GraphBuilder<'a> {
    packages: Option<&'a dyn PackageResolver>,
    filter: Option<&'a dyn UnitFilter>,
    exceptions: Option<&'a PluginExceptions>,
}

/// Ephemeral lookup tables used while wiring edges.
#[derive(Default)]
struct Indices<'g> {
    by_identity: HashMap<&'g str, NodeId>,
    by_type: HashMap<&'g str, Vec<NodeId>>,
    by_assembly: HashMap<&'g str, Vec<NodeId>>,
    by_package: HashMap<&'g str, Vec<NodeId>>,
}

impl<'g> Indices<'g> {
    fn resolve(&self, scope: RuleScope, target: &str) -> &[NodeId] {
        let map = match scope {
            RuleScope::Class => &self.by_type,
            RuleScope::Assembly => &self.by_assembly,
            RuleScope::Package => &self.by_package,
        };
        map.get(target).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<'a> GraphBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver used for `RunAfterPackage` / `RunBeforePackage` rules.
    pub fn with_packages(mut self, packages: &'a dyn PackageResolver) -> Self {
        self.packages = Some(packages);
        self
    }

    /// Ignore predicate; ignored units never enter the graph.
    pub fn with_filter(mut self, filter: &'a dyn UnitFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Units whose unresolved hard references are tolerated.
    pub fn with_exceptions(mut self, exceptions: &'a PluginExceptions) -> Self {
        self.exceptions = Some(exceptions);
        self
    }

    /// Build the graph.
    ///
    /// Fails on duplicate identities and on hard references to assemblies
    /// that were not supplied at all (unless excused). Soft rules whose target
    /// is unknown are skipped.
    pub fn build<U, I>(&self, units: I) -> Result<DependencyGraph<U>>
    where
        U: Unit,
        I: IntoIterator<Item = U>,
    {
        let supplied: Vec<U> = units.into_iter().collect();

        // Everything supplied counts as "found" for hard references, even when
        // the filter later drops it.
        let known: HashSet<String> = supplied.iter().map(|u| u.identity().to_string()).collect();

        let mut kept: Vec<U> = Vec::with_capacity(supplied.len());
        let mut ignored = 0usize;
        for unit in supplied {
            if self.filter.is_some_and(|f| f.is_ignored(&unit)) {
                trace!(unit = unit.identity(), "unit ignored by filter");
                ignored += 1;
            } else {
                kept.push(unit);
            }
        }

        kept.sort_by(|a, b| a.identity().cmp(b.identity()));
        if let Some(dup) = kept.windows(2).find(|w| w[0].identity() == w[1].identity()) {
            return Err(OrderError::DuplicateUnit(dup[0].identity().to_string()));
        }

        let mut graph = DependencyGraph::new();
        let mut package_cache: HashMap<String, String> = HashMap::new();
        for unit in kept {
            let package = self.package_for(unit.assembly_name(), &mut package_cache);
            graph.add_node(unit, package);
        }

        let edges = self.collect_edges(&graph, &known)?;
        let mut added = 0usize;
        for (before, after) in edges {
            if graph.add_edge(before, after) {
                added += 1;
            }
        }

        debug!(
            nodes = graph.len(),
            edges = added,
            ignored,
            "dependency graph built"
        );
        Ok(graph)
    }

    fn package_for(&self, assembly: &str, cache: &mut HashMap<String, String>) -> String {
        let Some(resolver) = self.packages else {
            return String::new();
        };
        if let Some(hit) = cache.get(assembly) {
            return hit.clone();
        }
        let package = resolver.package_of(assembly).unwrap_or_default();
        cache.insert(assembly.to_string(), package.clone());
        package
    }

    fn index<'g, U: Unit>(graph: &'g DependencyGraph<U>) -> Indices<'g> {
        let mut idx = Indices::default();
        for node in graph.nodes() {
            let unit = node.unit();
            idx.by_identity.insert(unit.identity(), node.id());
            idx.by_type
                .entry(unit.declaring_type())
                .or_default()
                .push(node.id());
            idx.by_assembly
                .entry(unit.assembly_name())
                .or_default()
                .push(node.id());
            if !node.package().is_empty() {
                idx.by_package
                    .entry(node.package())
                    .or_default()
                    .push(node.id());
            }
        }
        idx
    }

    /// Resolve every rule and reference into `(before, after)` pairs.
    fn collect_edges<U: Unit>(
        &self,
        graph: &DependencyGraph<U>,
        known: &HashSet<String>,
    ) -> Result<Vec<(NodeId, NodeId)>> {
        let idx = Self::index(graph);
        let mut edges = Vec::new();

        for node in graph.nodes() {
            let unit = node.unit();
            let this = node.id();

            for rule in unit.rules() {
                let targets = idx.resolve(rule.scope(), rule.target());
                if targets.is_empty() {
                    trace!(unit = unit.identity(), %rule, "rule target not present, skipping");
                    continue;
                }
                edges.extend(targets.iter().map(|&other| orient(rule, this, other)));
            }

            for reference in unit.references() {
                if let Some(&dep) = idx.by_identity.get(reference.as_str()) {
                    edges.push((dep, this));
                } else if known.contains(reference) {
                    trace!(
                        unit = unit.identity(),
                        reference = %reference,
                        "reference points at an ignored unit"
                    );
                } else if self.exceptions.is_some_and(|ex| ex.excuses(unit)) {
                    debug!(
                        unit = unit.identity(),
                        reference = %reference,
                        "missing reference excused for architecture-specific plugin"
                    );
                } else {
                    return Err(OrderError::UnresolvedReference {
                        reference: reference.clone(),
                        referenced_by: unit.identity().to_string(),
                    });
                }
            }
        }

        Ok(edges)
    }
}

/// `RunAfter*(x)`: x comes first. `RunBefore*(x)`: this node comes first.
fn orient(rule: &OrderingRule, this: NodeId, other: NodeId) -> (NodeId, NodeId) {
    match rule.direction() {
        RuleDirection::After => (other, this),
        RuleDirection::Before => (this, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{AssemblyUnit, CallbackUnit, PackageMap, PlatformFilter};

    fn cb(ty: &str, assembly: &str) -> CallbackUnit {
        CallbackUnit::new(ty, "Run", assembly)
    }

    fn id_of<U: Unit>(g: &DependencyGraph<U>, name: &str) -> NodeId {
        g.find(name).unwrap_or_else(|| panic!("node {name} missing"))
    }

    #[test]
    fn nodes_are_sorted_by_identity() {
        let g = GraphBuilder::new()
            .build(vec![cb("C", "X"), cb("A", "X"), cb("B", "X")])
            .unwrap();
        let names: Vec<&str> = g.nodes().iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["A.Run", "B.Run", "C.Run"]);
    }

    #[test]
    fn run_after_and_before_class_create_edges() {
        let units = vec![
            cb("A", "X"),
            cb("B", "X").with_rule(OrderingRule::RunAfterClass("A".into())),
            cb("C", "X").with_rule(OrderingRule::RunBeforeClass("A".into())),
        ];
        let g = GraphBuilder::new().build(units).unwrap();
        let (a, b, c) = (id_of(&g, "A.Run"), id_of(&g, "B.Run"), id_of(&g, "C.Run"));

        assert!(g.node(a).outgoing().contains(&b));
        assert!(g.node(c).outgoing().contains(&a));
        assert!(g.is_symmetric());
    }

    #[test]
    fn assembly_and_package_rules_fan_out() {
        let mut packages = PackageMap::new();
        packages.insert("Pkg.Runtime", "com.example.pkg");
        packages.insert("Pkg.Editor", "com.example.pkg");

        let units = vec![
            cb("P1", "Pkg.Runtime"),
            cb("P2", "Pkg.Editor"),
            cb("U", "User").with_rule(OrderingRule::RunAfterPackage("com.example.pkg".into())),
            cb("V", "User").with_rule(OrderingRule::RunBeforeAssembly("Pkg.Editor".into())),
        ];
        let g = GraphBuilder::new().with_packages(&packages).build(units).unwrap();
        let (p1, p2, u, v) = (
            id_of(&g, "P1.Run"),
            id_of(&g, "P2.Run"),
            id_of(&g, "U.Run"),
            id_of(&g, "V.Run"),
        );

        assert_eq!(g.node(p1).package(), "com.example.pkg");
        assert_eq!(g.node(u).package(), "");
        assert!(g.node(u).incoming().contains(&p1));
        assert!(g.node(u).incoming().contains(&p2));
        assert!(g.node(v).outgoing().contains(&p2));
        assert!(!g.node(v).outgoing().contains(&p1));
    }

    #[test]
    fn unknown_soft_targets_are_skipped() {
        let units = vec![
            cb("A", "X").with_rule(OrderingRule::RunAfterClass("Missing".into())),
            cb("B", "X").with_rule(OrderingRule::RunBeforePackage("nope".into())),
        ];
        let g = GraphBuilder::new().build(units).unwrap();
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn references_place_dependency_first() {
        let units = vec![
            AssemblyUnit::new("Game").with_references(["Engine"]),
            AssemblyUnit::new("Engine"),
        ];
        let g = GraphBuilder::new().build(units).unwrap();
        let (engine, game) = (id_of(&g, "Engine"), id_of(&g, "Game"));
        assert!(g.node(engine).outgoing().contains(&game));
    }

    #[test]
    fn missing_reference_is_an_error() {
        let units = vec![AssemblyUnit::new("Game").with_references(["Engine"])];
        let err = GraphBuilder::new().build(units).unwrap_err();
        match err {
            OrderError::UnresolvedReference {
                reference,
                referenced_by,
            } => {
                assert_eq!(reference, "Engine");
                assert_eq!(referenced_by, "Game");
            }
            other => panic!("expected UnresolvedReference, got {other:?}"),
        }
    }

    #[test]
    fn missing_reference_excused_for_plugins() {
        let ex = PluginExceptions::new(&["/Plugins/x86_64/"]).unwrap();
        let units = vec![
            AssemblyUnit::new("Native")
                .with_path("Assets/Plugins/x86_64/Native.dll")
                .with_references(["msvcrt"]),
        ];
        let g = GraphBuilder::new().with_exceptions(&ex).build(units).unwrap();
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn ignored_units_vanish_but_still_satisfy_references() {
        let filter = PlatformFilter::new::<&str>(Some("Linux".into()), &[]).unwrap();
        let units = vec![
            AssemblyUnit::new("Game").with_references(["Native.Win"]),
            AssemblyUnit::new("Native.Win").with_platforms(["Windows"]),
        ];
        let g = GraphBuilder::new().with_filter(&filter).build(units).unwrap();
        assert_eq!(g.len(), 1);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn closure_filters_are_accepted() {
        let skip_b = |u: &dyn Unit| u.identity() == "B.Run";
        let units = vec![
            cb("A", "X").with_rule(OrderingRule::RunAfterClass("B".into())),
            cb("B", "X"),
        ];
        let g = GraphBuilder::new().with_filter(&skip_b).build(units).unwrap();
        assert_eq!(g.len(), 1);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn duplicate_identity_is_rejected() {
        let err = GraphBuilder::new()
            .build(vec![cb("A", "X"), cb("A", "Y")])
            .unwrap_err();
        assert!(matches!(err, OrderError::DuplicateUnit(name) if name == "A.Run"));
    }

    #[test]
    fn duplicate_is_detected_on_type_and_method() {
        let err = GraphBuilder::new()
            .build(vec![
                CallbackUnit::new("A", "Run", "X"),
                CallbackUnit::new("A", "Other", "X"),
                CallbackUnit::new("A", "Other", "Y"),
            ])
            .unwrap_err();
        assert!(matches!(err, OrderError::DuplicateUnit(name) if name == "A.Other"));
    }
}
