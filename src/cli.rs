// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_manifest_path;
use crate::types::SortTarget;

/// Command-line arguments for `orderdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "orderdag",
    version,
    about = "Order assemblies and callbacks by their declared dependencies.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the manifest (TOML).
    ///
    /// Default: `Orderdag.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value_os_t = default_manifest_path())]
    pub manifest: PathBuf,

    /// Which units to order.
    #[arg(long, value_enum, default_value_t = SortTarget::All)]
    pub target: SortTarget,

    /// Print the transitive references of this assembly instead of an order.
    #[arg(long, value_name = "ASSEMBLY")]
    pub references: Option<String>,

    /// Write a Graphviz diagram of the graph and its order to this file.
    ///
    /// With `--target all` the callback graph is written next to it with a
    /// `.callbacks` suffix.
    #[arg(long, value_name = "PATH")]
    pub dot: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ORDERDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate the manifest and print a summary, without sorting.
    #[arg(long)]
    pub dry_run: bool,

    /// Keep running and re-sort whenever the manifest changes.
    #[arg(long)]
    pub watch: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
