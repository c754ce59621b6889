// src/config/mod.rs

//! Manifest loading and validation for orderdag.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a manifest from disk (`loader.rs`).
//! - Validate it before any graph is built (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_manifest_path, load_and_validate, load_from_path};
pub use model::{
    AssemblyConfig, CallbackConfig, ConfigFile, ConfigSection, FilterSection, RawConfigFile,
};
