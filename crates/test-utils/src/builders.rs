#![allow(dead_code)]

use std::collections::BTreeMap;
use orderdag::config::{
    AssemblyConfig, CallbackConfig, ConfigFile, ConfigSection, FilterSection, RawConfigFile,
};
use orderdag::types::OnCycle;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ManifestBuilder {
    config: RawConfigFile,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                filter: FilterSection::default(),
                packages: BTreeMap::new(),
                assembly: BTreeMap::new(),
                callback: Vec::new(),
            },
        }
    }

    pub fn with_assembly(mut self, name: &str, references: &[&str]) -> Self {
        self.config.assembly.insert(
            name.to_string(),
            AssemblyConfig {
                references: references.iter().map(|r| r.to_string()).collect(),
                ..AssemblyConfig::default()
            },
        );
        self
    }

    pub fn with_assembly_config(mut self, name: &str, assembly: AssemblyConfig) -> Self {
        self.config.assembly.insert(name.to_string(), assembly);
        self
    }

    pub fn with_callback(mut self, callback: CallbackConfig) -> Self {
        self.config.callback.push(callback);
        self
    }

    pub fn with_package(mut self, package: &str, assemblies: &[&str]) -> Self {
        self.config.packages.insert(
            package.to_string(),
            assemblies.iter().map(|a| a.to_string()).collect(),
        );
        self
    }

    pub fn with_platform(mut self, platform: &str) -> Self {
        self.config.config.platform = Some(platform.to_string());
        self
    }

    pub fn with_exclude(mut self, pattern: &str) -> Self {
        self.config.filter.exclude.push(pattern.to_string());
        self
    }

    pub fn with_plugin_exception(mut self, pattern: &str) -> Self {
        self.config.filter.plugin_exceptions.push(pattern.to_string());
        self
    }

    pub fn on_cycle(mut self, on_cycle: OnCycle) -> Self {
        self.config.config.on_cycle = on_cycle;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid manifest from builder")
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `CallbackConfig`.
pub struct CallbackBuilder {
    callback: CallbackConfig,
}

impl CallbackBuilder {
    pub fn new(declaring_type: &str, method: &str, assembly: &str) -> Self {
        Self {
            callback: CallbackConfig {
                declaring_type: declaring_type.to_string(),
                method: method.to_string(),
                assembly: assembly.to_string(),
                run_after_class: vec![],
                run_before_class: vec![],
                run_after_assembly: vec![],
                run_before_assembly: vec![],
                run_after_package: vec![],
                run_before_package: vec![],
            },
        }
    }

    pub fn after_class(mut self, ty: &str) -> Self {
        self.callback.run_after_class.push(ty.to_string());
        self
    }

    pub fn before_class(mut self, ty: &str) -> Self {
        self.callback.run_before_class.push(ty.to_string());
        self
    }

    pub fn after_assembly(mut self, assembly: &str) -> Self {
        self.callback.run_after_assembly.push(assembly.to_string());
        self
    }

    pub fn before_assembly(mut self, assembly: &str) -> Self {
        self.callback.run_before_assembly.push(assembly.to_string());
        self
    }

    pub fn after_package(mut self, package: &str) -> Self {
        self.callback.run_after_package.push(package.to_string());
        self
    }

    pub fn before_package(mut self, package: &str) -> Self {
        self.callback.run_before_package.push(package.to_string());
        self
    }

    pub fn build(self) -> CallbackConfig {
        self.callback
    }
}
