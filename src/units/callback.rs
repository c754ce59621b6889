// src/units/callback.rs

use crate::units::{OrderingRule, Unit};

/// A callback method discovered on some type, with its declared ordering
/// rules.
///
/// The identity is `Type.method`; class rules resolve against the declaring
/// type, so every callback declared on a type is affected by a rule naming
/// that type.
///
/// Type, method and assembly are fixed at construction so the identity
/// always matches them; only the rules can be edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackUnit {
    declaring_type: String,
    method: String,
    assembly: String,
    pub rules: Vec<OrderingRule>,
    identity: String,
}

impl CallbackUnit {
    pub fn new(
        declaring_type: impl Into<String>,
        method: impl Into<String>,
        assembly: impl Into<String>,
    ) -> Self {
        let declaring_type = declaring_type.into();
        let method = method.into();
        let identity = format!("{declaring_type}.{method}");
        Self {
            declaring_type,
            method,
            assembly: assembly.into(),
            rules: Vec::new(),
            identity,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn with_rule(mut self, rule: OrderingRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = OrderingRule>) -> Self {
        self.rules.extend(rules);
        self
    }
}

impl Unit for CallbackUnit {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    fn assembly_name(&self) -> &str {
        &self.assembly
    }

    fn rules(&self) -> &[OrderingRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_joins_type_and_method() {
        let cb = CallbackUnit::new("Example.Importer", "OnPostprocess", "Example.Editor");
        assert_eq!(cb.identity(), "Example.Importer.OnPostprocess");
        assert_eq!(cb.declaring_type(), "Example.Importer");
        assert_eq!(cb.assembly_name(), "Example.Editor");
        assert!(cb.references().is_empty());
        assert_eq!(cb.method(), "OnPostprocess");
    }

    #[test]
    fn renamed_method_is_a_different_unit() {
        let a = CallbackUnit::new("A", "Run", "X");
        let b = CallbackUnit::new("A", "Other", "X").with_rules(a.rules.clone());
        assert_ne!(a.identity(), b.identity());
        assert_eq!(b.identity(), format!("{}.{}", b.declaring_type(), b.method()));
    }
}
