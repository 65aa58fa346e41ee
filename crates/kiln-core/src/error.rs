//! Error types for Kiln

use thiserror::Error;

/// The main error type for Kiln operations
#[derive(Debug, Error)]
pub enum KilnError {
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Duplicate entity name: {0}")]
    DuplicateEntityName(String),

    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("Component in slot '{slot}' does not expose attributes")]
    CapabilityMissing { slot: String },

    #[error("Attribute '{key}' not found in {target}")]
    AttributeNotFound { target: String, key: String },

    #[error("Attribute '{0}' is read-only")]
    ReadOnlyAttribute(String),

    #[error("Invalid attribute type for '{key}': expected {expected}, got {got}")]
    TypeMismatch {
        key: String,
        expected: String,
        got: String,
    },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Animation error: {0}")]
    AnimationError(String),

    #[error("Scene error: {0}")]
    SceneError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

impl KilnError {
    /// Shorthand for an unknown attribute on `target`
    pub fn attribute_not_found(target: impl Into<String>, key: impl Into<String>) -> Self {
        KilnError::AttributeNotFound {
            target: target.into(),
            key: key.into(),
        }
    }

    /// Whether this error is a recoverable attribute bus failure, as opposed
    /// to malformed static content or I/O.
    pub fn is_attribute_error(&self) -> bool {
        matches!(
            self,
            KilnError::ComponentNotFound(_)
                | KilnError::CapabilityMissing { .. }
                | KilnError::AttributeNotFound { .. }
                | KilnError::ReadOnlyAttribute(_)
                | KilnError::TypeMismatch { .. }
        )
    }
}

/// Result type alias for Kiln operations
pub type Result<T> = std::result::Result<T, KilnError>;

impl From<toml::de::Error> for KilnError {
    fn from(err: toml::de::Error) -> Self {
        KilnError::TomlParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_errors_are_recoverable() {
        assert!(KilnError::ComponentNotFound("render".into()).is_attribute_error());
        assert!(KilnError::attribute_not_found("entity", "bogus").is_attribute_error());
        assert!(!KilnError::ConfigurationError("fps = 0".into()).is_attribute_error());
    }

    #[test]
    fn test_display() {
        let err = KilnError::TypeMismatch {
            key: "play".into(),
            expected: "bool".into(),
            got: "string".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid attribute type for 'play': expected bool, got string"
        );
    }
}
