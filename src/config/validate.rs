// src/config/validate.rs

use std::collections::{HashMap, HashSet};

use globset::Glob;
use regex::Regex;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{OrderError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::OrderError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_units(cfg)?;
    validate_filters(cfg)?;
    validate_assemblies(cfg)?;
    validate_callbacks(cfg)?;
    validate_packages(cfg)?;
    Ok(())
}

fn ensure_has_units(cfg: &RawConfigFile) -> Result<()> {
    if cfg.assembly.is_empty() && cfg.callback.is_empty() {
        return Err(OrderError::ConfigError(
            "manifest must contain at least one [assembly.<name>] or [[callback]] entry"
                .to_string(),
        ));
    }
    Ok(())
}

/// Compile patterns up front so a typo is reported at load time rather than
/// on first sort.
fn validate_filters(cfg: &RawConfigFile) -> Result<()> {
    for pat in cfg.filter.exclude.iter() {
        Glob::new(pat)?;
    }
    for pat in cfg.filter.plugin_exceptions.iter() {
        Regex::new(pat)?;
    }
    Ok(())
}

fn validate_assemblies(cfg: &RawConfigFile) -> Result<()> {
    for (name, assembly) in cfg.assembly.iter() {
        if name.trim().is_empty() {
            return Err(OrderError::ConfigError(
                "assembly names must not be empty".to_string(),
            ));
        }
        if assembly.references.iter().any(|r| r == name) {
            return Err(OrderError::ConfigError(format!(
                "assembly '{}' cannot reference itself",
                name
            )));
        }
    }
    Ok(())
}

fn validate_callbacks(cfg: &RawConfigFile) -> Result<()> {
    let mut seen: HashSet<String> = HashSet::new();
    for cb in cfg.callback.iter() {
        if cb.declaring_type.trim().is_empty() || cb.method.trim().is_empty() {
            return Err(OrderError::ConfigError(format!(
                "callback entries need a non-empty `type` and `method` (got '{}')",
                cb.identity()
            )));
        }
        if cb.assembly.trim().is_empty() {
            return Err(OrderError::ConfigError(format!(
                "callback '{}' has an empty `assembly`",
                cb.identity()
            )));
        }
        if !seen.insert(cb.identity()) {
            return Err(OrderError::DuplicateUnit(cb.identity()));
        }
    }
    Ok(())
}

fn validate_packages(cfg: &RawConfigFile) -> Result<()> {
    let mut owner: HashMap<&str, &str> = HashMap::new();
    for (package, assemblies) in cfg.packages.iter() {
        for assembly in assemblies {
            if let Some(prev) = owner.insert(assembly.as_str(), package.as_str()) {
                if prev != package {
                    return Err(OrderError::ConfigError(format!(
                        "assembly '{}' is listed in packages '{}' and '{}'",
                        assembly, prev, package
                    )));
                }
            }
        }
    }
    Ok(())
}
