//! Pluggable registration of sources, converters and interceptors.
//!
//! An extension bundles everything a library contributes to a configuration.
//! Extensions are listed by name in an [`ExtensionCatalog`]; a
//! [`ServiceManifest`] selects which of them a configuration uses.
//!
//! # Examples
//!
//! ```rust
//! use ordinal_config::prelude::*;
//! use ordinal_config::extensions::{ConfigExtension, ExtensionCatalog, ServiceManifest};
//! use ordinal_config::sources::MapSource;
//!
//! struct Tracing;
//!
//! impl ConfigExtension for Tracing {
//!     fn name(&self) -> &str {
//!         "tracing"
//!     }
//!
//!     fn register(&self, builder: ConfigBuilder) -> ConfigBuilder {
//!         builder.with_defaults([("tracing.sample-rate", "0.1")])
//!     }
//! }
//!
//! # fn example() -> Result<()> {
//! let catalog = ExtensionCatalog::new().with("tracing", || Box::new(Tracing));
//! let manifest = ServiceManifest::parse("# enabled extensions\ntracing\n");
//!
//! let config = Config::builder()
//!     .with_extensions_from(&manifest, &catalog)?
//!     .build()?;
//! assert_eq!(config.get_value::<f64>("tracing.sample-rate")?, 0.1);
//! # Ok(())
//! # }
//! ```

mod manifest;

pub use manifest::ServiceManifest;

use crate::core::ConfigBuilder;
use crate::error::{ConfigError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Contributes sources, factories, converters and interceptors to a builder.
pub trait ConfigExtension: Send + Sync {
    /// Name used in manifests and logs.
    fn name(&self) -> &str;

    /// Add this extension's contributions.
    fn register(&self, builder: ConfigBuilder) -> ConfigBuilder;
}

type Constructor = Arc<dyn Fn() -> Box<dyn ConfigExtension> + Send + Sync>;

/// Known extensions by name.
#[derive(Clone, Default)]
pub struct ExtensionCatalog {
    constructors: BTreeMap<String, Constructor>,
}

impl ExtensionCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extension constructor. A later entry with the same name replaces
    /// the earlier one.
    pub fn with<F>(mut self, name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> Box<dyn ConfigExtension> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(constructor));
        self
    }

    /// Create the named extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownExtension` if the name is not in the catalog.
    pub fn create(&self, name: &str) -> Result<Box<dyn ConfigExtension>> {
        self.constructors
            .get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| ConfigError::UnknownExtension(name.to_string()))
    }

    /// Names of all known extensions, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    /// Whether the catalog knows `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }
}

impl std::fmt::Debug for ExtensionCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionCatalog")
            .field("names", &self.names())
            .finish()
    }
}
