//! Validator configuration

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Settings applied when compiling plans.
///
/// ```
/// use nebula_rules::config::ValidatorConfig;
///
/// let config: ValidatorConfig = serde_json::from_str(
///     r#"{ "aliases": { "username": "alphanum,min=3,max=32" } }"#,
/// ).unwrap();
/// assert!(config.recurse_nested);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Rule names standing for a rule string. Bodies are not expanded again;
    /// a body that is one alternative group may also be used as a `|` branch.
    pub aliases: BTreeMap<String, String>,
    /// Evaluate the plans of nested record fields.
    pub recurse_nested: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            aliases: BTreeMap::new(),
            recurse_nested: true,
        }
    }
}

impl ValidatorConfig {
    /// Adds an alias, replacing an existing one with the same name.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_alias(mut self, name: impl Into<String>, rules: impl Into<String>) -> Self {
        self.aliases.insert(name.into(), rules.into());
        self
    }

    /// Enables or disables nested evaluation.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_recurse_nested(mut self, recurse: bool) -> Self {
        self.recurse_nested = recurse;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config: ValidatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ValidatorConfig::default());
        assert!(config.recurse_nested);
    }

    #[test]
    fn test_round_trip() {
        let config = ValidatorConfig::default()
            .with_alias("slug", "lowercase,alphanum")
            .with_recurse_nested(false);
        let json = serde_json::to_string(&config).unwrap();
        let back: ValidatorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
