//! Resolved configuration values carrying provenance.

use std::fmt;

/// A resolved configuration property together with where it came from.
///
/// Interceptors receive and return `ConfigValue`s, so they can inspect the
/// originating source or rewrite the value while keeping its provenance.
///
/// # Examples
///
/// ```rust
/// use ordinal_config::core::ConfigValue;
///
/// let value = ConfigValue::new("server.port", "8080")
///     .with_source("file:application.yaml", 100);
///
/// assert_eq!(value.value(), "8080");
/// assert_eq!(value.source_ordinal(), 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValue {
    name: String,
    value: String,
    raw_value: String,
    profile: Option<String>,
    source_name: String,
    source_ordinal: i32,
    source_position: usize,
    location: Option<String>,
}

impl ConfigValue {
    /// Create a value with no source information attached.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            raw_value: value.clone(),
            value,
            profile: None,
            source_name: String::new(),
            source_ordinal: 0,
            source_position: 0,
            location: None,
        }
    }

    /// The property name this value was requested under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The (possibly expanded) value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The value as the source returned it, before any expansion.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// The profile under which the value was found, if any.
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Name of the source that provided the value.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Ordinal of the source that provided the value.
    pub fn source_ordinal(&self) -> i32 {
        self.source_ordinal
    }

    /// Position of the providing source in the sorted source list.
    pub fn source_position(&self) -> usize {
        self.source_position
    }

    /// Where inside the source the value was defined (file path, URL, ...).
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns a copy with a different name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns a copy with a different value. The raw value is kept.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Returns a copy tagged with the profile it was resolved under.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Returns a copy attributed to the given source.
    pub fn with_source(mut self, source_name: impl Into<String>, ordinal: i32) -> Self {
        self.source_name = source_name.into();
        self.source_ordinal = ordinal;
        self
    }

    /// Returns a copy with the given source position.
    pub fn with_source_position(mut self, position: usize) -> Self {
        self.source_position = position;
        self
    }

    /// Returns a copy with the given location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={} ({}:{})",
            self.name, self.value, self.source_name, self.source_ordinal
        )
    }
}
