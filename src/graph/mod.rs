// src/graph/mod.rs

//! Dependency graph construction and ordering.
//!
//! - [`node`] holds the node arena with symmetric edge sets.
//! - [`builder`] turns units plus their rules/references into a graph.
//! - [`sorter`] orders a graph with Kahn's algorithm, tolerating cycles.
//! - [`report`] renders unresolved nodes as an indented cycle trace.
//! - [`dot`] exports a graph and its order for Graphviz.
//! - [`acyclic`] groups cyclic nodes and builds the strict-mode error.

pub mod acyclic;
pub mod builder;
pub mod dot;
pub mod node;
pub mod report;
pub mod sorter;

pub use acyclic::{cycles, ensure_acyclic};
pub use builder::GraphBuilder;
pub use dot::to_dot;
pub use node::{DependencyGraph, GraphNode, NodeId};
pub use report::describe_cycles;
pub use sorter::{sort, SortOutcome};
