//! Configuration source trait.

use crate::core::ConfigValue;
use crate::error::{ConfigError, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Ordinal used by sources that do not declare one.
pub const DEFAULT_ORDINAL: i32 = 100;

/// Property a source may define to override its own ordinal.
pub const CONFIG_ORDINAL: &str = "config_ordinal";

/// Trait for configuration sources.
///
/// Implement this trait to create custom configuration sources (e.g., remote APIs,
/// databases, key-value stores). A source is constructed once and is immutable
/// afterwards; every lookup must be answerable from the data captured at
/// construction.
///
/// Default ordinals:
/// - Defaults: `i32::MIN`
/// - Files: 100
/// - Environment variables: 300
///
/// # Examples
///
/// ```rust
/// use ordinal_config::sources::ConfigSource;
/// use std::collections::BTreeSet;
///
/// struct Fixed;
///
/// impl ConfigSource for Fixed {
///     fn name(&self) -> String {
///         "fixed".to_string()
///     }
///
///     fn ordinal(&self) -> i32 {
///         275
///     }
///
///     fn property_names(&self) -> BTreeSet<String> {
///         BTreeSet::from(["greeting".to_string()])
///     }
///
///     fn get_value(&self, name: &str) -> Option<String> {
///         (name == "greeting").then(|| "hello".to_string())
///     }
/// }
/// ```
pub trait ConfigSource: Send + Sync {
    /// Get a human-readable name for this source (for logging/debugging).
    fn name(&self) -> String;

    /// Get the ordinal of this source (higher = takes precedence).
    fn ordinal(&self) -> i32 {
        DEFAULT_ORDINAL
    }

    /// The set of property names this source knows about.
    fn property_names(&self) -> BTreeSet<String>;

    /// Look up a single property.
    fn get_value(&self, name: &str) -> Option<String>;

    /// Look up a property together with its provenance.
    ///
    /// Sources that know more about where a value came from (a file and line,
    /// a URL) override this to attach a location.
    fn get_config_value(&self, name: &str) -> Option<ConfigValue> {
        self.get_value(name)
            .map(|value| ConfigValue::new(name, value).with_source(self.name(), self.ordinal()))
    }

    /// Whether this source may be used during static initialization.
    fn is_static_init_safe(&self) -> bool {
        false
    }
}

/// Read the `config_ordinal` override from a source's own properties.
pub(crate) fn ordinal_override(
    source_name: &str,
    properties: &BTreeMap<String, String>,
) -> Result<Option<i32>> {
    match properties.get(CONFIG_ORDINAL) {
        Some(raw) => raw.trim().parse::<i32>().map(Some).map_err(|e| {
            ConfigError::source_failed(
                source_name,
                format!("invalid {} '{}': {}", CONFIG_ORDINAL, raw, e),
            )
        }),
        None => Ok(None),
    }
}
