//! Configuration source factories.

use super::ConfigSource;
use crate::core::ConfigValue;
use crate::error::Result;
use crate::interceptors::chain::InterceptorChain;
use std::collections::BTreeSet;

/// Priority of factories that do not declare one.
pub const DEFAULT_FACTORY_PRIORITY: i32 = 100;

/// Produces configuration sources from configuration that is already known.
///
/// A factory is the way to build a source whose location or credentials are
/// themselves configuration: read a URL from the environment, then fetch the
/// properties it points to.
///
/// Factories run in descending [`priority`](Self::priority) order. Each one
/// sees the sources registered directly plus the sources produced by the
/// factories that ran before it. The priority only orders factories; it has no
/// effect on the ordinals of the sources produced.
///
/// # Examples
///
/// ```rust
/// use ordinal_config::prelude::*;
/// use ordinal_config::sources::{ConfigSource, ConfigSourceContext, ConfigSourceFactory, MapSource};
///
/// struct TenantFactory;
///
/// impl ConfigSourceFactory for TenantFactory {
///     fn name(&self) -> String {
///         "tenant".to_string()
///     }
///
///     fn config_sources(&self, context: &ConfigSourceContext<'_>) -> Result<Vec<Box<dyn ConfigSource>>> {
///         let Some(tenant) = context.get_value("tenant.id")? else {
///             return Ok(Vec::new());
///         };
///         let source = MapSource::new(format!("tenant:{}", tenant.value()))
///             .with_property("tenant.display", format!("Tenant {}", tenant.value()))
///             .with_ordinal(150);
///         Ok(vec![Box::new(source)])
///     }
/// }
///
/// # fn example() -> Result<()> {
/// let config = Config::builder()
///     .with_source(MapSource::new("app").with_property("tenant.id", "acme"))
///     .with_source_factory(TenantFactory)
///     .build()?;
///
/// assert_eq!(config.get_value::<String>("tenant.display")?, "Tenant acme");
/// # Ok(())
/// # }
/// ```
pub trait ConfigSourceFactory: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> String;

    /// Order in which factories run (higher first).
    fn priority(&self) -> i32 {
        DEFAULT_FACTORY_PRIORITY
    }

    /// Build the sources.
    ///
    /// # Errors
    ///
    /// Any error aborts building the configuration.
    fn config_sources(&self, context: &ConfigSourceContext<'_>)
    -> Result<Vec<Box<dyn ConfigSource>>>;

    /// Whether this factory may run during static initialization.
    fn is_static_init_safe(&self) -> bool {
        false
    }
}

/// Read access to the configuration resolved so far, handed to factories.
pub struct ConfigSourceContext<'a> {
    chain: &'a InterceptorChain,
    profiles: &'a [String],
}

impl<'a> ConfigSourceContext<'a> {
    pub(crate) fn new(chain: &'a InterceptorChain, profiles: &'a [String]) -> Self {
        Self { chain, profiles }
    }

    /// Resolve a property through the interceptor chain.
    ///
    /// # Errors
    ///
    /// Returns any error raised by an interceptor.
    pub fn get_value(&self, name: &str) -> Result<Option<ConfigValue>> {
        self.chain.get_value(name)
    }

    /// Property names known so far.
    pub fn property_names(&self) -> BTreeSet<String> {
        self.chain.iterate_names()
    }

    /// The active profiles.
    pub fn profiles(&self) -> &[String] {
        self.profiles
    }
}
