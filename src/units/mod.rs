// src/units/mod.rs

//! Units are the things being ordered.
//!
//! - [`assembly`] describes a loaded assembly and the assemblies it references.
//! - [`callback`] describes an attributed callback method.
//! - [`rule`] holds the normalized ordering constraints both kinds can carry.
//! - [`package`] maps assemblies to the package that owns them.
//! - [`filter`] decides which units are ignored and which missing references
//!   are excused.
//!
//! The graph code only ever sees the [`Unit`] trait, so hosts can plug in
//! their own unit types.

pub mod assembly;
pub mod callback;
pub mod filter;
pub mod package;
pub mod rule;

use std::path::Path;

pub use assembly::AssemblyUnit;
pub use callback::CallbackUnit;
pub use filter::{PlatformFilter, PluginExceptions, UnitFilter};
pub use package::{PackageMap, PackageResolver};
pub use rule::{OrderingRule, RuleDirection, RuleScope};

/// Something that can be placed in a dependency graph.
pub trait Unit {
    /// Unique, fully-qualified display name. Also the sort key that makes
    /// graph construction deterministic.
    fn identity(&self) -> &str;

    /// Class identity used to resolve `RunAfterClass` / `RunBeforeClass`.
    fn declaring_type(&self) -> &str;

    /// Short name of the assembly declaring this unit.
    fn assembly_name(&self) -> &str;

    fn rules(&self) -> &[OrderingRule] {
        &[]
    }

    /// Hard references by assembly short name. A reference that cannot be
    /// found in the supplied unit set is an error.
    fn references(&self) -> &[String] {
        &[]
    }

    /// On-disk location, if known. Used by path-based filters.
    fn path(&self) -> Option<&Path> {
        None
    }

    /// Platforms this unit is restricted to; empty means all of them.
    fn platforms(&self) -> &[String] {
        &[]
    }
}

impl<T: Unit + ?Sized> Unit for &T {
    fn identity(&self) -> &str {
        (**self).identity()
    }

    fn declaring_type(&self) -> &str {
        (**self).declaring_type()
    }

    fn assembly_name(&self) -> &str {
        (**self).assembly_name()
    }

    fn rules(&self) -> &[OrderingRule] {
        (**self).rules()
    }

    fn references(&self) -> &[String] {
        (**self).references()
    }

    fn path(&self) -> Option<&Path> {
        (**self).path()
    }

    fn platforms(&self) -> &[String] {
        (**self).platforms()
    }
}
