// src/session.rs

//! Ordering state for one manifest.
//!
//! A [`Session`] owns the memoized assembly and callback orders. Reapplying
//! a manifest (e.g. after it changed on disk) swaps the unit sets and
//! invalidates both memos; nothing else is cached.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::debug;

use crate::config::model::ConfigFile;
use crate::errors::Result;
use crate::ordering::{LoadedAssemblies, Ordered, OrderedCallbackCollection};
use crate::types::SortTarget;
use crate::units::{AssemblyUnit, CallbackUnit, PackageMap, Unit};

#[derive(Debug)]
pub struct Session {
    assemblies: LoadedAssemblies,
    callbacks: OrderedCallbackCollection<PackageMap>,
}

impl Session {
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let assemblies = LoadedAssemblies::new(
            cfg.assembly_units(),
            cfg.platform_filter()?,
            cfg.plugin_exceptions()?,
            cfg.config.on_cycle,
        );
        let callbacks = OrderedCallbackCollection::new(cfg.callback_units(), cfg.package_map())
            .with_on_cycle(cfg.config.on_cycle);
        Ok(Self {
            assemblies,
            callbacks,
        })
    }

    /// Swap in the units and settings from `cfg`, dropping memoized orders.
    pub fn apply(&mut self, cfg: &ConfigFile) -> Result<()> {
        let filter = cfg.platform_filter()?;
        let exceptions = cfg.plugin_exceptions()?;

        self.assemblies
            .reconfigure(filter, exceptions, cfg.config.on_cycle);
        self.assemblies.replace(cfg.assembly_units());

        self.callbacks.set_packages(cfg.package_map());
        self.callbacks.set_on_cycle(cfg.config.on_cycle);
        self.callbacks.replace_candidates(cfg.callback_units());

        debug!(
            assemblies = self.assemblies.units().len(),
            callbacks = self.callbacks.candidates().len(),
            "session reloaded"
        );
        Ok(())
    }

    pub fn assemblies(&mut self) -> Result<Arc<Ordered<AssemblyUnit>>> {
        self.assemblies.sorted()
    }

    pub fn callbacks(&mut self) -> Result<Arc<Ordered<CallbackUnit>>> {
        self.callbacks.sorted()
    }

    pub fn references_of(&self, assembly: &str) -> Result<Vec<String>> {
        self.assemblies.referenced_by(assembly)
    }

    /// Plain-text listing of the resolved order(s) for `target`.
    pub fn render(&mut self, target: SortTarget) -> Result<String> {
        let mut out = String::new();
        if target.includes_assemblies() {
            let ordered = self.assemblies()?;
            render_section(&mut out, "assemblies", &ordered);
        }
        if target.includes_callbacks() {
            let ordered = self.callbacks()?;
            render_section(&mut out, "callbacks", &ordered);
        }
        Ok(out)
    }
}

fn render_section<U: Unit>(out: &mut String, title: &str, ordered: &Ordered<U>) {
    let names = ordered.order_names();
    let _ = writeln!(out, "{title} ({}):", names.len());
    for (i, name) in names.iter().enumerate() {
        let _ = writeln!(out, "  {}. {name}", i + 1);
    }

    let unresolved = ordered.unresolved_names();
    if !unresolved.is_empty() {
        let _ = writeln!(
            out,
            "unresolved {title} ({}): {}",
            unresolved.len(),
            unresolved.join(", ")
        );
    }
}
