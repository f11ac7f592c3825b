use serde::{Deserialize, Serialize};

use crate::GedcomError;

/// Knobs threaded explicitly into one parse. There is no process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserConfig {
    /// Warn when an unrecognised tag lacks the `_` user-defined prefix. The tag is
    /// preserved as a custom fact either way.
    pub strict_custom_tags: bool,
    /// Fold a line without a leading level into the previous node as a continuation
    /// instead of discarding it.
    pub lenient_line_breaks: bool,
    pub warn_on_unknown_enum_values: bool,
    /// Deepest level accepted by the tokenizer.
    pub max_level: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict_custom_tags: false,
            lenient_line_breaks: false,
            warn_on_unknown_enum_values: true,
            max_level: 99,
        }
    }
}

impl ParserConfig {
    /// Loads a config from JSON. Missing keys keep their defaults.
    pub fn from_json_str(input: &str) -> Result<Self, GedcomError> {
        serde_json::from_str(input).map_err(|err| GedcomError::InvalidConfig {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ParserConfig;
    use crate::GedcomError;

    #[test]
    fn defaults_are_lenient_about_tags() {
        let config = ParserConfig::default();
        assert!(!config.strict_custom_tags);
        assert!(!config.lenient_line_breaks);
        assert!(config.warn_on_unknown_enum_values);
        assert_eq!(config.max_level, 99);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ParserConfig::from_json_str(r#"{"strictCustomTags": true}"#)
            .expect("valid config");
        assert!(config.strict_custom_tags);
        assert_eq!(config.max_level, 99);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = ParserConfig::from_json_str("{\"maxLevel\": \"deep\"}")
            .expect_err("wrong type must fail");
        assert!(matches!(err, GedcomError::InvalidConfig { .. }));
    }
}
