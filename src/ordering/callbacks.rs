// src/ordering/callbacks.rs

use std::sync::Arc;

use tracing::debug;

use crate::errors::Result;
use crate::graph::GraphBuilder;
use crate::ordering::cache::{fingerprint, SortCache};
use crate::ordering::{resolve, Ordered};
use crate::types::OnCycle;
use crate::units::{CallbackUnit, PackageResolver};

/// Attributed callbacks, kept in dependency order.
///
/// The order is computed the first time it is asked for and reused until
/// the candidate set changes or [`invalidate`](Self::invalidate) is called
/// (e.g. after an assembly reload).
#[derive(Debug)]
pub struct OrderedCallbackCollection<R> {
    candidates: Vec<CallbackUnit>,
    packages: R,
    on_cycle: OnCycle,
    cache: SortCache<Ordered<CallbackUnit>>,
}

impl<R: PackageResolver> OrderedCallbackCollection<R> {
    pub fn new(candidates: Vec<CallbackUnit>, packages: R) -> Self {
        Self {
            candidates,
            packages,
            on_cycle: OnCycle::Warn,
            cache: SortCache::new(),
        }
    }

    pub fn with_on_cycle(mut self, on_cycle: OnCycle) -> Self {
        self.on_cycle = on_cycle;
        self.cache.invalidate();
        self
    }

    pub fn candidates(&self) -> &[CallbackUnit] {
        &self.candidates
    }

    pub fn replace_candidates(&mut self, candidates: Vec<CallbackUnit>) {
        self.candidates = candidates;
        self.cache.invalidate();
    }

    pub fn set_packages(&mut self, packages: R) {
        self.packages = packages;
        self.cache.invalidate();
    }

    pub fn set_on_cycle(&mut self, on_cycle: OnCycle) {
        self.on_cycle = on_cycle;
        self.cache.invalidate();
    }

    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Callbacks in the order they should be invoked.
    pub fn sorted(&mut self) -> Result<Arc<Ordered<CallbackUnit>>> {
        let fp = fingerprint(&self.candidates);
        let candidates = &self.candidates;
        let builder = GraphBuilder::new().with_packages(&self.packages);
        let on_cycle = self.on_cycle;

        self.cache.get_or_compute(&fp, || {
            let ordered = resolve(&builder, candidates.iter().cloned(), on_cycle, "callbacks")?;
            debug!(
                callbacks = ordered.graph().len(),
                success = ordered.success(),
                "callback order resolved"
            );
            Ok(ordered)
        })
    }
}
