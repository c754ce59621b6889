// src/ordering/mod.rs

//! Front-ends that put the graph engine to work.
//!
//! - [`assemblies`] orders assemblies by their references and walks
//!   reference closures.
//! - [`callbacks`] keeps a memoized order of attributed callbacks.
//! - [`cache`] is the memo both of them use.

pub mod assemblies;
pub mod cache;
pub mod callbacks;

use tracing::{error, warn};

use crate::errors::Result;
use crate::graph::{
    describe_cycles, ensure_acyclic, sort, to_dot, DependencyGraph, GraphBuilder, SortOutcome,
};
use crate::types::OnCycle;
use crate::units::Unit;

pub use assemblies::{collect_referenced, LoadedAssemblies};
pub use cache::{fingerprint, SortCache};
pub use callbacks::OrderedCallbackCollection;

/// A graph together with the order found for it.
#[derive(Debug, Clone)]
pub struct Ordered<U> {
    graph: DependencyGraph<U>,
    outcome: SortOutcome,
}

impl<U: Unit> Ordered<U> {
    pub fn success(&self) -> bool {
        self.outcome.success()
    }

    /// Units in resolved order.
    pub fn order(&self) -> impl Iterator<Item = &U> + '_ {
        self.outcome
            .order()
            .iter()
            .map(move |id| self.graph.node(*id).unit())
    }

    /// Units left out of the order because of cycles.
    pub fn unresolved(&self) -> impl Iterator<Item = &U> + '_ {
        self.outcome
            .unresolved()
            .iter()
            .map(move |id| self.graph.node(*id).unit())
    }

    pub fn order_names(&self) -> Vec<String> {
        self.order().map(|u| u.identity().to_string()).collect()
    }

    pub fn unresolved_names(&self) -> Vec<String> {
        self.unresolved().map(|u| u.identity().to_string()).collect()
    }

    pub fn graph(&self) -> &DependencyGraph<U> {
        &self.graph
    }

    pub fn outcome(&self) -> &SortOutcome {
        &self.outcome
    }

    pub fn cycle_report(&self) -> String {
        describe_cycles(&self.graph, &self.outcome)
    }

    pub fn to_dot(&self) -> String {
        to_dot(&self.graph, &self.outcome)
    }
}

/// Build and sort `units`.
///
/// A cycle is logged once with the aggregated trace. With [`OnCycle::Warn`]
/// the partial order is returned; with [`OnCycle::Error`] the same trace is
/// returned as [`crate::errors::OrderError::DagCycle`].
pub fn resolve<U, I>(
    builder: &GraphBuilder<'_>,
    units: I,
    on_cycle: OnCycle,
    what: &str,
) -> Result<Ordered<U>>
where
    U: Unit,
    I: IntoIterator<Item = U>,
{
    let graph = builder.build(units)?;
    let outcome = sort(&graph);

    if !outcome.success() {
        match on_cycle {
            OnCycle::Warn => warn!(
                what,
                unresolved = outcome.unresolved().len(),
                "dependency cycle detected, continuing with partial order\n{}",
                describe_cycles(&graph, &outcome)
            ),
            OnCycle::Error => {
                if let Err(err) = ensure_acyclic(&graph, &outcome) {
                    error!(what, unresolved = outcome.unresolved().len(), "{err}");
                    return Err(err);
                }
            }
        }
    }

    Ok(Ordered { graph, outcome })
}
