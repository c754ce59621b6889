// src/ordering/assemblies.rs

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{OrderError, Result};
use crate::graph::GraphBuilder;
use crate::ordering::cache::{fingerprint, SortCache};
use crate::ordering::{resolve, Ordered};
use crate::types::OnCycle;
use crate::units::{AssemblyUnit, PlatformFilter, PluginExceptions, UnitFilter};

/// The current assembly set and its memoized load order.
///
/// Referenced assemblies are ordered before the assemblies referencing them.
/// Call [`LoadedAssemblies::replace`] (or [`LoadedAssemblies::invalidate`])
/// when assemblies are reloaded.
#[derive(Debug)]
pub struct LoadedAssemblies {
    units: Vec<AssemblyUnit>,
    filter: PlatformFilter,
    exceptions: PluginExceptions,
    on_cycle: OnCycle,
    cache: SortCache<Ordered<AssemblyUnit>>,
}

impl LoadedAssemblies {
    pub fn new(
        units: Vec<AssemblyUnit>,
        filter: PlatformFilter,
        exceptions: PluginExceptions,
        on_cycle: OnCycle,
    ) -> Self {
        Self {
            units,
            filter,
            exceptions,
            on_cycle,
            cache: SortCache::new(),
        }
    }

    pub fn units(&self) -> &[AssemblyUnit] {
        &self.units
    }

    /// Swap in a new assembly set and drop the memoized order.
    pub fn replace(&mut self, units: Vec<AssemblyUnit>) {
        self.units = units;
        self.cache.invalidate();
    }

    /// Change how assemblies are filtered; drops the memoized order.
    pub fn reconfigure(
        &mut self,
        filter: PlatformFilter,
        exceptions: PluginExceptions,
        on_cycle: OnCycle,
    ) {
        self.filter = filter;
        self.exceptions = exceptions;
        self.on_cycle = on_cycle;
        self.cache.invalidate();
    }

    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// The load order, computed on first use and reused until the set
    /// changes.
    pub fn sorted(&mut self) -> Result<Arc<Ordered<AssemblyUnit>>> {
        let fp = fingerprint(&self.units);
        let units = &self.units;
        let builder = GraphBuilder::new()
            .with_filter(&self.filter)
            .with_exceptions(&self.exceptions);
        let on_cycle = self.on_cycle;

        self.cache.get_or_compute(&fp, || {
            let ordered = resolve(&builder, units.iter().cloned(), on_cycle, "assemblies")?;
            info!(
                assemblies = ordered.graph().len(),
                success = ordered.success(),
                "assembly order resolved"
            );
            Ok(ordered)
        })
    }

    /// Transitive references of `root`, see [`collect_referenced`].
    pub fn referenced_by(&self, root: &str) -> Result<Vec<String>> {
        collect_referenced(root, &self.units, &self.filter, &self.exceptions)
    }
}

/// Collect every assembly `root` transitively references.
///
/// Dependencies come before the assemblies that reference them; `root`
/// itself is not included. Ignored assemblies are neither returned nor
/// followed. The walk stops at the first reference that cannot be found
/// anywhere in `units`, unless the referencing assembly is excused by
/// `exceptions`.
pub fn collect_referenced(
    root: &str,
    units: &[AssemblyUnit],
    filter: &dyn UnitFilter,
    exceptions: &PluginExceptions,
) -> Result<Vec<String>> {
    let by_name: HashMap<&str, &AssemblyUnit> =
        units.iter().map(|u| (u.name.as_str(), u)).collect();

    let Some(start) = by_name.get(root) else {
        return Err(OrderError::ConfigError(format!("unknown assembly '{root}'")));
    };

    let mut walk = ReferenceWalk {
        by_name: &by_name,
        filter,
        exceptions,
        visited: HashSet::from([root]),
        found: Vec::new(),
    };
    walk.visit(start)?;

    debug!(root, count = walk.found.len(), "collected referenced assemblies");
    Ok(walk.found)
}

struct ReferenceWalk<'a> {
    by_name: &'a HashMap<&'a str, &'a AssemblyUnit>,
    filter: &'a dyn UnitFilter,
    exceptions: &'a PluginExceptions,
    visited: HashSet<&'a str>,
    found: Vec<String>,
}

impl<'a> ReferenceWalk<'a> {
    fn visit(&mut self, unit: &'a AssemblyUnit) -> Result<()> {
        for reference in &unit.references {
            let Some(&dep) = self.by_name.get(reference.as_str()) else {
                if self.exceptions.excuses(unit) {
                    debug!(
                        assembly = %unit.name,
                        reference = %reference,
                        "missing reference excused for architecture-specific plugin"
                    );
                    continue;
                }
                return Err(OrderError::UnresolvedReference {
                    reference: reference.clone(),
                    referenced_by: unit.name.clone(),
                });
            };

            if !self.visited.insert(dep.name.as_str()) {
                continue;
            }
            if self.filter.is_ignored(dep) {
                continue;
            }

            self.visit(dep)?;
            self.found.push(dep.name.clone());
        }
        Ok(())
    }
}
