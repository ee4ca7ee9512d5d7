//! File sources listed in configuration.

use super::factory::{ConfigSourceContext, ConfigSourceFactory};
use super::{ConfigSource, DEFAULT_ORDINAL, FileSource};
use crate::converters::split_values;
use crate::error::{ConfigError, Result};

/// Property listing additional configuration files.
pub const LOCATIONS_KEY: &str = "config.locations";

const OPTIONAL_PREFIX: &str = "optional:";

/// Loads the files listed in `config.locations`.
///
/// The property is a comma-separated list of paths. Each file becomes a
/// [`FileSource`] whose ordinal is the base ordinal plus its position in the
/// list, so files listed later override earlier ones. A file that sets
/// `config_ordinal` keeps its own ordinal.
///
/// A missing file aborts the build unless its path is prefixed with
/// `optional:`.
///
/// # Examples
///
/// ```rust,no_run
/// use ordinal_config::prelude::*;
/// use ordinal_config::sources::LocationsSourceFactory;
///
/// # fn example() -> Result<()> {
/// // CONFIG_LOCATIONS=/etc/app/base.yaml,optional:/etc/app/local.yaml
/// let config = Config::builder()
///     .with_env()
///     .with_source_factory(LocationsSourceFactory::new())
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LocationsSourceFactory {
    key: String,
    base_ordinal: i32,
}

impl LocationsSourceFactory {
    /// Read locations from `config.locations` with base ordinal 100.
    pub fn new() -> Self {
        Self {
            key: LOCATIONS_KEY.to_string(),
            base_ordinal: DEFAULT_ORDINAL,
        }
    }

    /// Read locations from a different property.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Set the ordinal of the first listed file.
    pub fn with_base_ordinal(mut self, ordinal: i32) -> Self {
        self.base_ordinal = ordinal;
        self
    }
}

impl Default for LocationsSourceFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSourceFactory for LocationsSourceFactory {
    fn name(&self) -> String {
        format!("locations:{}", self.key)
    }

    fn config_sources(
        &self,
        context: &ConfigSourceContext<'_>,
    ) -> Result<Vec<Box<dyn ConfigSource>>> {
        let Some(locations) = context.get_value(&self.key)? else {
            return Ok(Vec::new());
        };

        let mut sources: Vec<Box<dyn ConfigSource>> = Vec::new();
        for (index, location) in split_values(locations.value()).iter().enumerate() {
            let location = location.trim();
            let (optional, path) = match location.strip_prefix(OPTIONAL_PREFIX) {
                Some(path) => (true, path),
                None => (false, location),
            };

            if optional && !std::path::Path::new(path).exists() {
                tracing::warn!(location = path, "optional configuration file not found, skipping");
                continue;
            }

            let source = FileSource::load(path).map_err(|e| ConfigError::factory(self.name(), e))?;
            let source = if source.has_declared_ordinal() {
                source
            } else {
                source.with_ordinal(self.base_ordinal + index as i32)
            };
            tracing::debug!(source = %source.name(), ordinal = source.ordinal(), "loaded listed location");
            sources.push(Box::new(source));
        }
        Ok(sources)
    }

    fn is_static_init_safe(&self) -> bool {
        true
    }
}
