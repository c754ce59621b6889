// src/units/rule.rs

use std::fmt;

/// Which identity granularity a rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleScope {
    Class,
    Assembly,
    Package,
}

/// Whether the declaring unit runs before or after the rule's target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleDirection {
    After,
    Before,
}

/// A declared ordering constraint attached to a unit.
///
/// Rules are soft: a rule naming a class, assembly or package that is not
/// part of the unit set is dropped without error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrderingRule {
    RunAfterClass(String),
    RunBeforeClass(String),
    RunAfterAssembly(String),
    RunBeforeAssembly(String),
    RunAfterPackage(String),
    RunBeforePackage(String),
}

impl OrderingRule {
    pub fn scope(&self) -> RuleScope {
        match self {
            OrderingRule::RunAfterClass(_) | OrderingRule::RunBeforeClass(_) => RuleScope::Class,
            OrderingRule::RunAfterAssembly(_) | OrderingRule::RunBeforeAssembly(_) => {
                RuleScope::Assembly
            }
            OrderingRule::RunAfterPackage(_) | OrderingRule::RunBeforePackage(_) => {
                RuleScope::Package
            }
        }
    }

    pub fn direction(&self) -> RuleDirection {
        match self {
            OrderingRule::RunAfterClass(_)
            | OrderingRule::RunAfterAssembly(_)
            | OrderingRule::RunAfterPackage(_) => RuleDirection::After,
            OrderingRule::RunBeforeClass(_)
            | OrderingRule::RunBeforeAssembly(_)
            | OrderingRule::RunBeforePackage(_) => RuleDirection::Before,
        }
    }

    /// Name of the class, assembly or package the rule points at.
    pub fn target(&self) -> &str {
        match self {
            OrderingRule::RunAfterClass(t)
            | OrderingRule::RunBeforeClass(t)
            | OrderingRule::RunAfterAssembly(t)
            | OrderingRule::RunBeforeAssembly(t)
            | OrderingRule::RunAfterPackage(t)
            | OrderingRule::RunBeforePackage(t) => t,
        }
    }
}

impl fmt::Display for OrderingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            OrderingRule::RunAfterClass(_) => "run_after_class",
            OrderingRule::RunBeforeClass(_) => "run_before_class",
            OrderingRule::RunAfterAssembly(_) => "run_after_assembly",
            OrderingRule::RunBeforeAssembly(_) => "run_before_assembly",
            OrderingRule::RunAfterPackage(_) => "run_after_package",
            OrderingRule::RunBeforePackage(_) => "run_before_package",
        };
        write!(f, "{kind}({})", self.target())
    }
}
