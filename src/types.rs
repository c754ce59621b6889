// src/types.rs

use serde::Deserialize;

/// What to do when the dependency graph contains a cycle.
///
/// - `Warn`: order what can be ordered, log the cycle trace once and carry on
///   (default behaviour).
/// - `Error`: reject the graph with [`crate::errors::OrderError::DagCycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnCycle {
    Warn,
    Error,
}

impl Default for OnCycle {
    fn default() -> Self {
        OnCycle::Warn
    }
}

/// Which unit kinds the CLI should order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortTarget {
    Assemblies,
    Callbacks,
    #[default]
    All,
}

impl SortTarget {
    pub fn includes_assemblies(self) -> bool {
        matches!(self, SortTarget::Assemblies | SortTarget::All)
    }

    pub fn includes_callbacks(self) -> bool {
        matches!(self, SortTarget::Callbacks | SortTarget::All)
    }
}
