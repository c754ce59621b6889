// src/units/package.rs

use std::collections::{BTreeMap, HashMap};

/// Resolves the package owning an assembly.
pub trait PackageResolver {
    /// Package name for `assembly`, or `None` if it does not belong to one.
    fn package_of(&self, assembly: &str) -> Option<String>;
}

/// Static assembly -> package table, typically loaded from `[packages]` in
/// the manifest.
#[derive(Debug, Clone, Default)]
pub struct PackageMap {
    by_assembly: HashMap<String, String>,
}

impl PackageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a `package -> [assembly, ...]` table.
    pub fn from_packages(packages: &BTreeMap<String, Vec<String>>) -> Self {
        let mut map = Self::new();
        for (package, assemblies) in packages {
            for assembly in assemblies {
                map.insert(assembly.clone(), package.clone());
            }
        }
        map
    }

    pub fn insert(&mut self, assembly: impl Into<String>, package: impl Into<String>) {
        self.by_assembly.insert(assembly.into(), package.into());
    }

}

impl PackageResolver for PackageMap {
    fn package_of(&self, assembly: &str) -> Option<String> {
        self.by_assembly.get(assembly).cloned()
    }
}

impl<F> PackageResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn package_of(&self, assembly: &str) -> Option<String> {
        self(assembly)
    }
}
