// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::errors::Result;
use crate::types::OnCycle;
use crate::units::{
    AssemblyUnit, CallbackUnit, OrderingRule, PackageMap, PlatformFilter, PluginExceptions,
};

/// Manifest as read from TOML, before validation.
///
/// ```toml
/// [config]
/// on_cycle = "warn"
/// platform = "StandaloneLinux64"
///
/// [filter]
/// exclude = ["**/Editor/**"]
/// plugin_exceptions = ["(?i)/plugins/(x86|x86_64|arm64)/"]
///
/// [packages]
/// "com.example.tools" = ["Example.Tools", "Example.Tools.Editor"]
///
/// [assembly.Example.Tools]
/// references = ["UnityEngine"]
///
/// [[callback]]
/// type = "Example.Importer"
/// method = "OnPostprocessAllAssets"
/// assembly = "Example.Tools.Editor"
/// run_after_class = ["Example.Base"]
/// ```
///
/// Every section is optional, but validation requires at least one
/// assembly or callback.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub filter: FilterSection,

    /// `package -> [assembly, ...]`.
    #[serde(default)]
    pub packages: BTreeMap<String, Vec<String>>,

    /// Assemblies keyed by short name.
    #[serde(default)]
    pub assembly: BTreeMap<String, AssemblyConfig>,

    #[serde(default)]
    pub callback: Vec<CallbackConfig>,
}

/// Validated manifest. Obtain one through `ConfigFile::try_from(raw)` or
/// [`crate::config::load_and_validate`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub filter: FilterSection,
    pub packages: BTreeMap<String, Vec<String>>,
    pub assembly: BTreeMap<String, AssemblyConfig>,
    pub callback: Vec<CallbackConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            config: raw.config,
            filter: raw.filter,
            packages: raw.packages,
            assembly: raw.assembly,
            callback: raw.callback,
        }
    }

    pub fn assembly_units(&self) -> Vec<AssemblyUnit> {
        self.assembly
            .iter()
            .map(|(name, cfg)| cfg.to_unit(name))
            .collect()
    }

    pub fn callback_units(&self) -> Vec<CallbackUnit> {
        self.callback.iter().map(CallbackConfig::to_unit).collect()
    }

    pub fn package_map(&self) -> PackageMap {
        PackageMap::from_packages(&self.packages)
    }

    pub fn platform_filter(&self) -> Result<PlatformFilter> {
        PlatformFilter::new(self.config.platform.clone(), &self.filter.exclude)
    }

    pub fn plugin_exceptions(&self) -> Result<PluginExceptions> {
        PluginExceptions::new(&self.filter.plugin_exceptions)
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// `"warn"` (default) or `"error"`.
    #[serde(default)]
    pub on_cycle: OnCycle,

    /// Target platform; assemblies restricted to other platforms are
    /// ignored. If unset, platform restrictions are not applied.
    #[serde(default)]
    pub platform: Option<String>,
}

/// `[filter]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterSection {
    /// Glob patterns; assemblies whose `path` matches are ignored.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Regexes on assembly paths whose missing references are tolerated.
    #[serde(default)]
    pub plugin_exceptions: Vec<String>,
}

/// `[assembly.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssemblyConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Compatible platforms; empty means all.
    #[serde(default)]
    pub platforms: Vec<String>,

    /// Short names of referenced assemblies.
    #[serde(default)]
    pub references: Vec<String>,
}

impl AssemblyConfig {
    pub fn to_unit(&self, name: &str) -> AssemblyUnit {
        AssemblyUnit {
            name: name.to_string(),
            path: self.path.clone(),
            platforms: self.platforms.clone(),
            references: self.references.clone(),
            rules: Vec::new(),
        }
    }
}

/// One `[[callback]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackConfig {
    #[serde(rename = "type")]
    pub declaring_type: String,

    pub method: String,

    pub assembly: String,

    #[serde(default)]
    pub run_after_class: Vec<String>,
    #[serde(default)]
    pub run_before_class: Vec<String>,
    #[serde(default)]
    pub run_after_assembly: Vec<String>,
    #[serde(default)]
    pub run_before_assembly: Vec<String>,
    #[serde(default)]
    pub run_after_package: Vec<String>,
    #[serde(default)]
    pub run_before_package: Vec<String>,
}

impl CallbackConfig {
    pub fn identity(&self) -> String {
        format!("{}.{}", self.declaring_type, self.method)
    }

    pub fn rules(&self) -> Vec<OrderingRule> {
        let groups: [(&Vec<String>, fn(String) -> OrderingRule); 6] = [
            (&self.run_after_class, OrderingRule::RunAfterClass),
            (&self.run_before_class, OrderingRule::RunBeforeClass),
            (&self.run_after_assembly, OrderingRule::RunAfterAssembly),
            (&self.run_before_assembly, OrderingRule::RunBeforeAssembly),
            (&self.run_after_package, OrderingRule::RunAfterPackage),
            (&self.run_before_package, OrderingRule::RunBeforePackage),
        ];
        groups
            .into_iter()
            .flat_map(|(targets, make)| targets.iter().cloned().map(make))
            .collect()
    }

    pub fn to_unit(&self) -> CallbackUnit {
        CallbackUnit::new(&self.declaring_type, &self.method, &self.assembly)
            .with_rules(self.rules())
    }
}
