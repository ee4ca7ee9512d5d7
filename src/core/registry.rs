//! Ordinal-sorted collection of configuration sources.

use crate::core::ConfigValue;
use crate::sources::ConfigSource;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Holds configuration sources sorted by precedence and answers raw lookups.
///
/// Sources are ordered by ordinal (highest first), then by name, then by
/// registration order, so the order is total and deterministic. A lookup
/// returns the value of the first source that defines the property.
pub struct SourceRegistry {
    sources: Vec<Arc<dyn ConfigSource>>,
}

impl SourceRegistry {
    /// Create a registry, sorting the sources by precedence.
    pub fn new(sources: Vec<Arc<dyn ConfigSource>>) -> Self {
        let mut keyed: Vec<_> = sources
            .into_iter()
            .enumerate()
            .map(|(index, source)| ((Reverse(source.ordinal()), source.name(), index), source))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| a.cmp(b));

        let sources: Vec<_> = keyed.into_iter().map(|(_, source)| source).collect();
        tracing::debug!(
            sources = ?sources.iter().map(|s| format!("{}:{}", s.name(), s.ordinal())).collect::<Vec<_>>(),
            "ordered configuration sources"
        );
        Self { sources }
    }

    /// A new registry with additional sources merged in.
    pub fn with_added(&self, more: Vec<Arc<dyn ConfigSource>>) -> Self {
        let mut all = self.sources.clone();
        all.extend(more);
        Self::new(all)
    }

    /// Look a property up in precedence order.
    pub fn lookup(&self, name: &str) -> Option<ConfigValue> {
        self.sources
            .iter()
            .enumerate()
            .find_map(|(position, source)| {
                let value = source.get_config_value(name)?;
                tracing::trace!(property = name, source = %source.name(), "property found");
                Some(value.with_source_position(position))
            })
    }

    /// Union of all property names.
    pub fn property_names(&self) -> BTreeSet<String> {
        self.sources
            .iter()
            .flat_map(|source| source.property_names())
            .collect()
    }

    /// Sources in precedence order.
    pub fn sources(&self) -> &[Arc<dyn ConfigSource>] {
        &self.sources
    }

    /// Source names in precedence order.
    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the registry holds no sources.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
