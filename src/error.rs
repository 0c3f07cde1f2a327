//! Error types for a3s-rules

use crate::types::RuleKind;
use thiserror::Error;

/// A single strict-mode validation failure
///
/// Carries the human-readable message of the first violated check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Create a validation error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The violated check's message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that can occur while registering, assembling, or loading rules
#[derive(Debug, Error)]
pub enum RuleError {
    /// A rule in a registration batch was rejected by the active validator
    #[error("Validation failed for {kind} '{name}': {source}")]
    Validation {
        kind: RuleKind,
        name: String,
        #[source]
        source: ValidationError,
    },

    /// The registry state could not be reached (poisoned lock)
    #[error("Registry error: {0}")]
    Registry(String),

    /// Artifact assembly failure
    #[error("Assembly error: {0}")]
    Assembly(String),

    /// Declarative rule file could not be read or parsed
    #[error("Failed to load '{path}': {reason}")]
    Load { path: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Documentation template error
    #[error("Template error: {0}")]
    Template(String),

    /// JSON serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML serialization/deserialization failure
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl RuleError {
    /// The validator message, if this is a validation failure
    pub fn validation_message(&self) -> Option<&str> {
        match self {
            RuleError::Validation { source, .. } => Some(source.message()),
            _ => None,
        }
    }
}

impl From<minijinja::Error> for RuleError {
    fn from(e: minijinja::Error) -> Self {
        RuleError::Template(e.to_string())
    }
}

/// Result type alias for rule operations
pub type Result<T> = std::result::Result<T, RuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_includes_message() {
        let err = RuleError::Validation {
            kind: RuleKind::Alert,
            name: "example_alert".to_string(),
            source: ValidationError::new("alert must have a name in PascalCase format"),
        };
        let msg = err.to_string();
        assert!(msg.contains("alert 'example_alert'"), "{}", msg);
        assert!(msg.contains("PascalCase"), "{}", msg);
        assert_eq!(
            err.validation_message(),
            Some("alert must have a name in PascalCase format")
        );
    }

    #[test]
    fn test_non_validation_error_has_no_message() {
        let err = RuleError::Registry("lock poisoned".to_string());
        assert!(err.validation_message().is_none());
    }
}
