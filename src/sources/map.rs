//! In-memory configuration sources.

use super::config_source::ordinal_override;
use super::{ConfigSource, DEFAULT_ORDINAL};
use crate::error::Result;
use std::collections::{BTreeMap, BTreeSet};

/// A configuration source backed by an in-memory map.
///
/// Useful for programmatic overrides, tests, and as the target of factories
/// that fetch data from elsewhere.
///
/// # Examples
///
/// ```rust
/// use ordinal_config::sources::{ConfigSource, MapSource};
///
/// let source = MapSource::new("overrides")
///     .with_property("server.port", "9090")
///     .with_ordinal(250);
///
/// assert_eq!(source.get_value("server.port").as_deref(), Some("9090"));
/// assert_eq!(source.ordinal(), 250);
/// ```
#[derive(Debug, Clone)]
pub struct MapSource {
    name: String,
    ordinal: i32,
    properties: BTreeMap<String, String>,
    static_init_safe: bool,
    location: Option<String>,
}

impl MapSource {
    /// Create an empty map source with the default ordinal.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ordinal: DEFAULT_ORDINAL,
            properties: BTreeMap::new(),
            static_init_safe: false,
            location: None,
        }
    }

    /// Create a map source from existing properties.
    ///
    /// If the properties contain `config_ordinal`, it becomes the source ordinal.
    ///
    /// # Errors
    ///
    /// Returns an error if `config_ordinal` is present but not an integer.
    pub fn from_properties<I, K, V>(name: impl Into<String>, properties: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let properties: BTreeMap<String, String> = properties
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let ordinal = ordinal_override(&name, &properties)?.unwrap_or(DEFAULT_ORDINAL);

        Ok(Self {
            name,
            ordinal,
            properties,
            static_init_safe: false,
            location: None,
        })
    }

    /// Add a single property.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Set the ordinal for this source.
    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = ordinal;
        self
    }

    /// Mark this source as usable during static initialization.
    pub fn static_init_safe(mut self, safe: bool) -> Self {
        self.static_init_safe = safe;
        self
    }

    /// Attach a location reported with every value of this source.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Number of properties held by this source.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether this source holds no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl ConfigSource for MapSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn ordinal(&self) -> i32 {
        self.ordinal
    }

    fn property_names(&self) -> BTreeSet<String> {
        self.properties.keys().cloned().collect()
    }

    fn get_value(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }

    fn get_config_value(&self, name: &str) -> Option<crate::core::ConfigValue> {
        let value = crate::core::ConfigValue::new(name, self.properties.get(name)?.clone())
            .with_source(self.name.clone(), self.ordinal);
        Some(match &self.location {
            Some(location) => value.with_location(location.clone()),
            None => value,
        })
    }

    fn is_static_init_safe(&self) -> bool {
        self.static_init_safe
    }
}

/// Source holding fallback values with the lowest possible ordinal.
///
/// Every other source overrides these.
#[derive(Debug, Clone)]
pub struct DefaultValuesSource {
    inner: MapSource,
}

impl DefaultValuesSource {
    /// Name reported by the defaults source.
    pub const NAME: &'static str = "defaults";

    /// Create a defaults source from the given properties.
    pub fn new<I, K, V>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let inner = defaults.into_iter().fold(
            MapSource::new(Self::NAME)
                .with_ordinal(i32::MIN)
                .static_init_safe(true),
            |source, (k, v)| source.with_property(k, v),
        );
        Self { inner }
    }
}

impl ConfigSource for DefaultValuesSource {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn ordinal(&self) -> i32 {
        self.inner.ordinal()
    }

    fn property_names(&self) -> BTreeSet<String> {
        self.inner.property_names()
    }

    fn get_value(&self, name: &str) -> Option<String> {
        self.inner.get_value(name)
    }

    fn is_static_init_safe(&self) -> bool {
        true
    }
}
