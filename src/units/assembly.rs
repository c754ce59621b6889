// src/units/assembly.rs

use std::path::{Path, PathBuf};

use crate::units::{OrderingRule, Unit};

/// An assembly identified by its short name.
///
/// Referenced assemblies are placed before the assembly referencing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyUnit {
    pub name: String,
    pub path: Option<PathBuf>,
    /// Platforms the assembly is compatible with (empty = any).
    pub platforms: Vec<String>,
    /// Short names of referenced assemblies.
    pub references: Vec<String>,
    /// Extra ordering rules (rare for assemblies, but allowed).
    pub rules: Vec<OrderingRule>,
}

impl AssemblyUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            platforms: Vec::new(),
            references: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn with_references<I, S>(mut self, refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references.extend(refs.into_iter().map(Into::into));
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platforms.extend(platforms.into_iter().map(Into::into));
        self
    }
}

impl Unit for AssemblyUnit {
    fn identity(&self) -> &str {
        &self.name
    }

    fn declaring_type(&self) -> &str {
        &self.name
    }

    fn assembly_name(&self) -> &str {
        &self.name
    }

    fn rules(&self) -> &[OrderingRule] {
        &self.rules
    }

    fn references(&self) -> &[String] {
        &self.references
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn platforms(&self) -> &[String] {
        &self.platforms
    }
}
