// src/units/filter.rs

//! Ignore predicates and reference exceptions.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::RegexSet;
use tracing::debug;

use crate::errors::Result;
use crate::units::Unit;

/// Decides whether a unit is left out of the graph entirely.
pub trait UnitFilter {
    fn is_ignored(&self, unit: &dyn Unit) -> bool;
}

impl<F> UnitFilter for F
where
    F: Fn(&dyn Unit) -> bool,
{
    fn is_ignored(&self, unit: &dyn Unit) -> bool {
        self(unit)
    }
}

/// Platform-specific exclusion rules.
///
/// A unit is ignored when
/// - its path matches one of the `exclude` globs, or
/// - it is restricted to a set of platforms that does not contain the
///   target platform.
///
/// Without a target platform the platform restriction is not applied.
#[derive(Debug, Clone)]
pub struct PlatformFilter {
    target: Option<String>,
    exclude: GlobSet,
}

impl PlatformFilter {
    pub fn new<S: AsRef<str>>(target: Option<String>, exclude_patterns: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pat in exclude_patterns {
            builder.add(Glob::new(pat.as_ref())?);
        }
        Ok(Self {
            target,
            exclude: builder.build()?,
        })
    }

    /// Filter that ignores nothing.
    pub fn allow_all() -> Self {
        Self {
            target: None,
            exclude: GlobSet::empty(),
        }
    }

    fn supports_target(&self, unit: &dyn Unit) -> bool {
        let Some(target) = self.target.as_deref() else {
            return true;
        };
        let platforms = unit.platforms();
        platforms.is_empty() || platforms.iter().any(|p| p.eq_ignore_ascii_case(target))
    }
}

impl UnitFilter for PlatformFilter {
    fn is_ignored(&self, unit: &dyn Unit) -> bool {
        if let Some(path) = unit.path() {
            if self.exclude.is_match(normalized(path)) {
                debug!(unit = unit.identity(), ?path, "ignored by exclude pattern");
                return true;
            }
        }
        if !self.supports_target(unit) {
            debug!(
                unit = unit.identity(),
                target = ?self.target,
                "ignored: not compatible with target platform"
            );
            return true;
        }
        false
    }
}

/// Path as matched by globs and regexes: `/` separators on every host.
fn normalized(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Architecture-specific plugins whose missing references are tolerated.
///
/// Patterns are regular expressions matched against the referencing unit's
/// path, or its identity when it has no path.
#[derive(Debug, Clone)]
pub struct PluginExceptions {
    patterns: RegexSet,
}

impl PluginExceptions {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = RegexSet::new(patterns.iter().map(|p| p.as_ref()))?;
        Ok(Self { patterns })
    }

    pub fn none() -> Self {
        Self {
            patterns: RegexSet::empty(),
        }
    }

    /// Whether a missing reference from `unit` should be excused.
    pub fn excuses(&self, unit: &dyn Unit) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        match unit.path() {
            Some(path) => self.patterns.is_match(&normalized(path)),
            None => self.patterns.is_match(unit.identity()),
        }
    }
}

impl Default for PluginExceptions {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::AssemblyUnit;

    #[test]
    fn exclude_glob_ignores_matching_paths() {
        let filter = PlatformFilter::new(None, &["**/Editor/**"]).unwrap();
        let editor = AssemblyUnit::new("Tools.Editor").with_path("Assets/Editor/Tools.Editor.dll");
        let runtime = AssemblyUnit::new("Tools").with_path("Assets/Runtime/Tools.dll");

        assert!(filter.is_ignored(&editor));
        assert!(!filter.is_ignored(&runtime));
    }

    #[test]
    fn platform_restriction_only_applies_with_target() {
        let win_only = AssemblyUnit::new("Native.Win").with_platforms(["Windows"]);

        assert!(!PlatformFilter::allow_all().is_ignored(&win_only));

        let linux = PlatformFilter::new::<&str>(Some("Linux".into()), &[]).unwrap();
        assert!(linux.is_ignored(&win_only));

        let windows = PlatformFilter::new::<&str>(Some("windows".into()), &[]).unwrap();
        assert!(!windows.is_ignored(&win_only));
    }

    #[test]
    fn plugin_exceptions_match_on_path_or_identity() {
        let ex = PluginExceptions::new(&["(?i)/plugins/(x86|x86_64|arm64)/"]).unwrap();
        let plugin = AssemblyUnit::new("Native").with_path("Assets/Plugins/x86_64/Native.dll");
        let plain = AssemblyUnit::new("Plain").with_path("Assets/Plain.dll");

        assert!(ex.excuses(&plugin));
        assert!(!ex.excuses(&plain));
        assert!(!PluginExceptions::none().excuses(&plugin));
    }

    #[test]
    fn backslash_paths_are_excluded_and_excused_alike() {
        let filter = PlatformFilter::new(None, &["**/Editor/**"]).unwrap();
        let ex = PluginExceptions::new(&["/Plugins/x86_64/"]).unwrap();

        let editor = AssemblyUnit::new("Tools.Editor").with_path(r"Assets\Editor\Tools.Editor.dll");
        let plugin = AssemblyUnit::new("Native").with_path(r"Assets\Plugins\x86_64\Native.dll");

        assert!(filter.is_ignored(&editor));
        assert!(ex.excuses(&plugin));
    }
}
