//! Error types for ordinal-config.

use std::fmt;

/// Result type alias for ordinal-config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when building or querying configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required property has no value in any source.
    #[error("Property '{name}' is not defined in any configuration source")]
    NoSuchElement {
        /// The property name that was looked up
        name: String,
    },

    /// A raw value could not be converted into the requested type.
    #[error("Failed to convert property '{name}' value '{value}' to {type_name}: {reason}")]
    Conversion {
        /// The property name
        name: String,
        /// Name of the target type
        type_name: &'static str,
        /// The raw value that failed to convert
        value: String,
        /// Why the converter rejected it
        reason: String,
    },

    /// No converter is registered for the requested type.
    #[error("No converter registered for type {type_name}")]
    NoConverter {
        /// Name of the target type
        type_name: &'static str,
    },

    /// A configuration source could not be constructed.
    #[error("Configuration source '{source_name}' failed: {message}")]
    Source {
        /// Name of the failing source
        source_name: String,
        /// Description of the failure
        message: String,
    },

    /// A configuration source factory failed while producing its sources.
    #[error("Configuration source factory '{factory}' failed: {message}")]
    Factory {
        /// Name of the failing factory
        factory: String,
        /// Description of the failure
        message: String,
    },

    /// A property expression could not be expanded.
    #[error("Failed to expand expression in property '{name}': {message}")]
    Expression {
        /// The property whose value holds the expression
        name: String,
        /// Description of the failure
        message: String,
    },

    /// Failed to load configuration data.
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    /// Failed to deserialize configuration into a mapped type.
    #[error("Failed to deserialize configuration: {0}")]
    DeserializationError(String),

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// An extension manifest names an extension missing from the catalog.
    #[error("Unknown configuration extension '{0}'")]
    UnknownExtension(String),

    /// No process-wide configuration has been installed.
    #[error("No configuration installed for this process")]
    NotInstalled,

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error for other cases.
    #[error("Configuration error: {0}")]
    Other(String),
}

impl ConfigError {
    /// Create a `NoSuchElement` error for the given property.
    pub fn no_such_element(name: impl Into<String>) -> Self {
        Self::NoSuchElement { name: name.into() }
    }

    /// Create a `Source` error.
    pub fn source_failed(source_name: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Source {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    /// Create a `Factory` error.
    pub fn factory(factory: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Factory {
            factory: factory.into(),
            message: message.to_string(),
        }
    }

    /// Create an `Expression` error.
    pub fn expression(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Expression {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Error returned by a [`Converter`](crate::converters::Converter) that rejects a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    reason: String,
}

impl ConversionError {
    /// Create a conversion error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The reason the value was rejected.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for ConversionError {}

/// Validation error for mapped configuration types.
#[derive(Debug)]
pub enum ValidationError {
    /// Custom validation error with a message.
    Custom(String),

    /// A specific field has an invalid value.
    InvalidField {
        /// The field name/path
        field: String,
        /// The reason why it's invalid
        reason: String,
    },

    /// Multiple validation errors occurred.
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Create a custom validation error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(msg) => write!(f, "{}", msg),
            Self::InvalidField { field, reason } => {
                write!(f, "Field '{}' is invalid: {}", field, reason)
            }
            Self::Multiple(errors) => {
                writeln!(f, "Multiple validation errors:")?;
                for (i, err) in errors.iter().enumerate() {
                    writeln!(f, "  {}. {}", i + 1, err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_such_element_message() {
        let err = ConfigError::no_such_element("server.port");
        assert_eq!(
            err.to_string(),
            "Property 'server.port' is not defined in any configuration source"
        );
    }

    #[test]
    fn test_factory_error_message() {
        let err = ConfigError::factory("locations", "file not found");
        assert!(err.to_string().contains("'locations'"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: ConfigError = ValidationError::invalid_field("port", "must be >= 1024").into();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("Field 'port' is invalid"));
    }
}
