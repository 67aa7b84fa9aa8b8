use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Type names every workflow may reference without an import.
pub const DEFAULT_BUILTIN_TYPES: [&str; 6] = ["String", "int", "double", "bool", "void", "dynamic"];

/// What to do when a lookup collaborator returns an error instead of a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupErrorPolicy {
    /// Report the error as the same failure a genuine miss produces.
    #[default]
    Collapse,
    /// Surface it as a distinct `LookupFailed` failure carrying the cause.
    Propagate,
}

/// Shared configuration for the resolver and the conformance checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemaConfig {
    pub builtin_types: Vec<String>,
    pub lookup_errors: LookupErrorPolicy,
}

impl Default for SemaConfig {
    fn default() -> Self {
        Self {
            builtin_types: DEFAULT_BUILTIN_TYPES.iter().map(|s| s.to_string()).collect(),
            lookup_errors: LookupErrorPolicy::default(),
        }
    }
}

impl SemaConfig {
    /// Parse a YAML document; absent keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: SemaConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn is_builtin(&self, type_name: &str) -> bool {
        self.builtin_types.iter().any(|b| b == type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_primitives() {
        let config = SemaConfig::default();
        for name in DEFAULT_BUILTIN_TYPES {
            assert!(config.is_builtin(name), "{} should be builtin", name);
        }
        assert!(!config.is_builtin("Order"));
        assert_eq!(config.lookup_errors, LookupErrorPolicy::Collapse);
    }

    #[test]
    fn yaml_overrides_policy_only() {
        let config = SemaConfig::from_yaml_str("lookup_errors: propagate\n").unwrap();
        assert_eq!(config.lookup_errors, LookupErrorPolicy::Propagate);
        assert!(config.is_builtin("String"));
    }

    #[test]
    fn yaml_replaces_builtins() {
        let yaml = r#"
builtin_types:
  - String
  - Money
"#;
        let config = SemaConfig::from_yaml_str(yaml).unwrap();
        assert!(config.is_builtin("Money"));
        assert!(!config.is_builtin("int"));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(SemaConfig::from_yaml_str("lookup_errors: retry\n").is_err());
    }
}
