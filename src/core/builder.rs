//! Builder for constructing Config instances.

use crate::converters::{Converter, ConverterRegistry, split_values};
use crate::core::{Config, InitStage, PROFILE_KEY, SourceRegistry};
use crate::error::{ConfigError, Result};
use crate::extensions::{ConfigExtension, ExtensionCatalog, ServiceManifest};
use crate::interceptors::chain::{
    InterceptorChain, InterceptorEntry, InterceptorKind, assemble, insert_ranked,
};
use crate::interceptors::{
    CachingInterceptor, ConfigSourceInterceptor, ConfigSourceInterceptorFactory,
    ExpressionInterceptor, FallbackInterceptor, LoggingInterceptor, ProfileInterceptor,
    RelocateInterceptor, priorities,
};
use crate::sources::{
    ConfigSource, ConfigSourceContext, ConfigSourceFactory, DEFAULT_ORDINAL, DefaultValuesSource,
    EnvSource, FileSource,
};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(feature = "metrics")]
use crate::metrics::ConfigMetrics;

/// Property that turns on resolution logging when set to `true`.
pub const LOG_VALUES_KEY: &str = "config.log.values";

const PROFILE_PRIORITY: i32 = priorities::LIBRARY + 200;
const EXPRESSION_PRIORITY: i32 = priorities::LIBRARY + 300;
const RELOCATE_PRIORITY: i32 = priorities::LIBRARY + 250;
const FALLBACK_PRIORITY: i32 = priorities::LIBRARY + 100;
const LOGGING_PRIORITY: i32 = priorities::PLATFORM;
const CACHING_PRIORITY: i32 = priorities::APPLICATION + 1000;

/// Builder for constructing a [`Config`].
///
/// Provides a fluent interface for registering sources, source factories,
/// interceptors and converters. Nothing is read until [`build`](Self::build).
///
/// # Examples
///
/// ```rust,no_run
/// use ordinal_config::prelude::*;
///
/// # fn example() -> Result<()> {
/// let config = Config::builder()
///     .with_defaults([("server.port", "8080")])
///     .with_file("config/application.yaml")
///     .with_env()
///     .with_profile("dev")
///     .build()?;
///
/// let port: u16 = config.get_value("server.port")?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigBuilder {
    sources: Vec<Arc<dyn ConfigSource>>,
    file_paths: Vec<PathBuf>,
    env: Option<Option<String>>,
    factories: Vec<Box<dyn ConfigSourceFactory>>,
    interceptors: Vec<InterceptorEntry>,
    converters: ConverterRegistry,
    profiles: Option<Vec<String>>,
    relocations: HashMap<String, String>,
    fallbacks: HashMap<String, String>,
    secret_keys: Vec<String>,
    logging: bool,
    caching: bool,
    expressions: bool,
    stage: InitStage,
    #[cfg(feature = "metrics")]
    metrics: Option<ConfigMetrics>,
}

impl ConfigBuilder {
    /// Create a new builder with the built-in converters and expression
    /// expansion enabled.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            file_paths: Vec::new(),
            env: None,
            factories: Vec::new(),
            interceptors: Vec::new(),
            converters: ConverterRegistry::with_builtins(),
            profiles: None,
            relocations: HashMap::new(),
            fallbacks: HashMap::new(),
            secret_keys: Vec::new(),
            logging: false,
            caching: false,
            expressions: true,
            stage: InitStage::default(),
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Add a configuration source.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordinal_config::prelude::*;
    /// use ordinal_config::sources::MapSource;
    ///
    /// let builder = Config::builder()
    ///     .with_source(MapSource::new("overrides").with_property("a", "1").with_ordinal(400));
    /// ```
    pub fn with_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Add a source that is shared with other configurations.
    pub fn with_shared_source(mut self, source: Arc<dyn ConfigSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Add several shared sources at once.
    pub fn with_sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ConfigSource>>,
    {
        self.sources.extend(sources);
        self
    }

    /// Add default values, consulted after every other source.
    pub fn with_defaults<I, K, V>(self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.with_source(DefaultValuesSource::new(defaults))
    }

    /// Add the process environment as a source (ordinal 300).
    ///
    /// Variables are read when the configuration is built.
    pub fn with_env(mut self) -> Self {
        self.env = Some(None);
        self
    }

    /// Add the process environment, restricted to variables starting with
    /// `{prefix}_`.
    ///
    /// ```rust,no_run
    /// use ordinal_config::prelude::*;
    ///
    /// // APP_SERVER_PORT=8080 -> server.port = 8080
    /// let builder = Config::builder().with_env_prefix("APP");
    /// ```
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env = Some(Some(prefix.into()));
        self
    }

    /// Add a file source with automatic format detection.
    ///
    /// Supported formats: YAML (.yaml, .yml), TOML (.toml), JSON (.json)
    ///
    /// Files get ordinals 100, 110, 120... in the order they are added, so
    /// later files override earlier ones. A file that sets `config_ordinal`
    /// keeps its own ordinal.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    /// Add a source factory, run once the static sources are known.
    pub fn with_source_factory<F: ConfigSourceFactory + 'static>(mut self, factory: F) -> Self {
        self.factories.push(Box::new(factory));
        self
    }

    /// Add an interceptor with the given priority. Higher priorities run first.
    pub fn with_interceptor<I: ConfigSourceInterceptor + 'static>(
        mut self,
        priority: i32,
        interceptor: I,
    ) -> Self {
        self.interceptors.push(InterceptorEntry {
            priority,
            kind: InterceptorKind::Instance(Arc::new(interceptor)),
        });
        self
    }

    /// Add an interceptor factory. Its interceptor takes the factory's priority.
    pub fn with_interceptor_factory<F: ConfigSourceInterceptorFactory + 'static>(
        mut self,
        factory: F,
    ) -> Self {
        self.interceptors.push(InterceptorEntry {
            priority: factory.priority(),
            kind: InterceptorKind::Factory(Arc::new(factory)),
        });
        self
    }

    /// Register a converter for `T`.
    ///
    /// The converter with the highest priority wins; on equal priority the one
    /// registered last wins. Built-in converters have priority 1.
    pub fn with_converter<T, C>(mut self, priority: i32, converter: C) -> Self
    where
        T: 'static,
        C: Converter<T> + 'static,
    {
        self.converters.register(priority, converter);
        self
    }

    /// Activate a profile. Profiles activated later take precedence.
    ///
    /// Activating any profile here ignores `config.profile` in the sources.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profiles.get_or_insert_with(Vec::new).push(profile.into());
        self
    }

    /// Keys whose values are masked in resolution logs.
    pub fn with_secret_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secret_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Log every resolution at debug level.
    pub fn with_logging(mut self) -> Self {
        self.logging = true;
        self
    }

    /// Cache resolved lookups for the lifetime of the configuration.
    pub fn with_caching(mut self) -> Self {
        self.caching = true;
        self
    }

    /// Enable or disable `${...}` expansion. Enabled by default.
    pub fn with_expressions(mut self, enabled: bool) -> Self {
        self.expressions = enabled;
        self
    }

    /// Serve old property names from new ones (old name to new name).
    pub fn with_relocations(mut self, relocations: HashMap<String, String>) -> Self {
        self.relocations.extend(relocations);
        self
    }

    /// Fall back to another name when a property is missing (name to fallback).
    pub fn with_fallbacks(mut self, fallbacks: HashMap<String, String>) -> Self {
        self.fallbacks.extend(fallbacks);
        self
    }

    /// Build for a startup phase. [`InitStage::Static`] keeps only static-init
    /// safe sources and factories.
    pub fn for_stage(mut self, stage: InitStage) -> Self {
        self.stage = stage;
        self
    }

    /// Let an extension register its sources, factories, interceptors and
    /// converters.
    pub fn with_extension<E: ConfigExtension + ?Sized>(self, extension: &E) -> Self {
        tracing::debug!(extension = extension.name(), "registering configuration extension");
        extension.register(self)
    }

    /// Register every extension named in a manifest.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownExtension` if the manifest names an
    /// extension missing from the catalog.
    pub fn with_extensions_from(
        self,
        manifest: &ServiceManifest,
        catalog: &ExtensionCatalog,
    ) -> Result<Self> {
        let extensions = manifest.instantiate(catalog)?;
        Ok(extensions
            .iter()
            .fold(self, |builder, extension| builder.with_extension(extension.as_ref())))
    }

    /// Read a manifest file and register every extension it names.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or names an unknown
    /// extension.
    pub fn with_manifest(self, path: impl AsRef<Path>, catalog: &ExtensionCatalog) -> Result<Self> {
        let manifest = ServiceManifest::from_file(path)?;
        self.with_extensions_from(&manifest, catalog)
    }

    /// Record lookup metrics with an OpenTelemetry meter.
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, meter: opentelemetry::metrics::Meter) -> Self {
        self.metrics = Some(ConfigMetrics::new(meter));
        self
    }

    /// Build the configuration.
    ///
    /// Loads files and the environment, orders the sources, determines the
    /// active profiles, assembles the interceptor chain and runs the source
    /// factories.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A file cannot be loaded or parsed
    /// - A `config_ordinal` value is not an integer
    /// - An interceptor factory fails
    /// - A source factory fails (`ConfigError::Factory`)
    pub fn build(self) -> Result<Config> {
        let mut sources = self.sources;

        for (index, path) in self.file_paths.iter().enumerate() {
            let file = FileSource::load(path)?;
            let file = if file.has_declared_ordinal() {
                file
            } else {
                file.with_ordinal(DEFAULT_ORDINAL + index as i32 * 10) // 100, 110, 120, etc.
            };
            sources.push(Arc::new(file));
        }

        if let Some(prefix) = self.env {
            let env = EnvSource::new()?;
            let env = match prefix {
                Some(prefix) => env.with_prefix(prefix),
                None => env,
            };
            sources.push(Arc::new(env));
        }

        if self.stage == InitStage::Static {
            sources.retain(|source| {
                let safe = source.is_static_init_safe();
                if !safe {
                    tracing::debug!(source = %source.name(), "skipping source during static init");
                }
                safe
            });
        }

        let registry = Arc::new(SourceRegistry::new(sources));

        let profiles = match self.profiles {
            Some(profiles) => profiles,
            None => registry
                .lookup(PROFILE_KEY)
                .map(|value| {
                    split_values(value.value())
                        .into_iter()
                        .map(|p| p.trim().to_string())
                        .filter(|p| !p.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        };

        // Relocated and fallback targets of a secret key carry the same secret.
        let mut secret_keys = self.secret_keys;
        let aliases: Vec<String> = secret_keys
            .iter()
            .flat_map(|key| [self.relocations.get(key), self.fallbacks.get(key)])
            .flatten()
            .cloned()
            .collect();
        secret_keys.extend(aliases);

        // Installed even with no active profile, to hide `%profile.*` names.
        let mut entries = vec![builtin(
            PROFILE_PRIORITY,
            ProfileInterceptor::new(profiles.clone()),
        )];
        if self.expressions {
            entries.push(builtin(EXPRESSION_PRIORITY, ExpressionInterceptor::new()));
        }
        if !self.relocations.is_empty() {
            entries.push(builtin(
                RELOCATE_PRIORITY,
                RelocateInterceptor::from_map(self.relocations),
            ));
        }
        if !self.fallbacks.is_empty() {
            entries.push(builtin(
                FALLBACK_PRIORITY,
                FallbackInterceptor::from_map(self.fallbacks),
            ));
        }
        let log_values = registry
            .lookup(LOG_VALUES_KEY)
            .is_some_and(|v| v.value().trim().eq_ignore_ascii_case("true"));
        if self.logging || log_values {
            entries.push(builtin(
                LOGGING_PRIORITY,
                LoggingInterceptor::new()
                    .with_secret_keys(secret_keys)
                    .with_profiles(profiles.clone()),
            ));
        }
        entries.extend(self.interceptors);

        let mut chain = InterceptorChain::new(assemble(entries, &registry)?, registry);

        let mut factories = self.factories;
        factories.sort_by_key(|factory| Reverse(factory.priority()));
        for factory in factories {
            let name = factory.name();
            if self.stage == InitStage::Static && !factory.is_static_init_safe() {
                tracing::debug!(factory = %name, "skipping source factory during static init");
                continue;
            }

            let produced = {
                let context = ConfigSourceContext::new(&chain, &profiles);
                factory.config_sources(&context).map_err(|e| match e {
                    e @ ConfigError::Factory { .. } => e,
                    other => ConfigError::factory(name.clone(), other),
                })?
            };
            tracing::debug!(factory = %name, sources = produced.len(), "source factory produced sources");

            let produced: Vec<Arc<dyn ConfigSource>> = produced.into_iter().map(Arc::from).collect();
            let registry = Arc::new(chain.sources().with_added(produced));
            chain = chain.with_sources(registry);
        }

        if self.caching {
            let cache: Arc<dyn ConfigSourceInterceptor> = Arc::new(CachingInterceptor::new());
            let mut interceptors = chain.interceptors().to_vec();
            insert_ranked(&mut interceptors, (CACHING_PRIORITY, cache));
            chain = InterceptorChain::new(interceptors, Arc::clone(chain.sources()));
        }

        tracing::debug!(
            sources = ?chain.sources().source_names(),
            profiles = ?profiles,
            stage = ?self.stage,
            "configuration built"
        );

        #[cfg(feature = "metrics")]
        let config = Config::from_parts(chain, self.converters, profiles, self.stage, self.metrics);
        #[cfg(not(feature = "metrics"))]
        let config = Config::from_parts(chain, self.converters, profiles, self.stage);

        Ok(config)
    }
}

fn builtin<I: ConfigSourceInterceptor + 'static>(priority: i32, interceptor: I) -> InterceptorEntry {
    InterceptorEntry {
        priority,
        kind: InterceptorKind::Instance(Arc::new(interceptor)),
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigValue;
    use crate::interceptors::{InterceptorContext, from_fn};
    use crate::sources::MapSource;
    use parking_lot::Mutex;
    use std::fs;
    use tempfile::TempDir;

    struct Recording {
        name: &'static str,
        priority: i32,
        seen: Arc<Mutex<Vec<(&'static str, Option<String>)>>>,
        produces: Option<(&'static str, &'static str)>,
    }

    impl ConfigSourceFactory for Recording {
        fn name(&self) -> String {
            self.name.to_string()
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn config_sources(
            &self,
            context: &ConfigSourceContext<'_>,
        ) -> Result<Vec<Box<dyn ConfigSource>>> {
            let marker = context.get_value("marker")?.map(|v| v.value().to_string());
            self.seen.lock().push((self.name, marker));
            Ok(self
                .produces
                .map(|(k, v)| {
                    Box::new(MapSource::new(self.name).with_property(k, v).with_ordinal(5))
                        as Box<dyn ConfigSource>
                })
                .into_iter()
                .collect())
        }
    }

    #[test]
    fn test_builder_accumulates_files() {
        let builder = ConfigBuilder::new()
            .with_file("config1.yaml")
            .with_file("config2.yaml")
            .with_file("config3.yaml");

        assert_eq!(builder.file_paths.len(), 3);
    }

    #[test]
    fn test_later_files_override_earlier() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("base.yaml");
        let prod = temp_dir.path().join("prod.yaml");
        fs::write(&base, "port: 8080\nhost: localhost\n").unwrap();
        fs::write(&prod, "port: 9090\n").unwrap();

        let config = ConfigBuilder::new()
            .with_file(&base)
            .with_file(&prod)
            .build()
            .unwrap();

        assert_eq!(config.get_value::<u16>("port").unwrap(), 9090);
        assert_eq!(config.get_value::<String>("host").unwrap(), "localhost");
        let ordinals: Vec<i32> = config.config_sources().iter().map(|s| s.ordinal()).collect();
        assert_eq!(ordinals, vec![110, 100]);
    }

    #[test]
    fn test_profiles_from_sources() {
        let config = ConfigBuilder::new()
            .with_source(
                MapSource::new("app")
                    .with_property(PROFILE_KEY, "dev, test")
                    .with_property("port", "80")
                    .with_property("%dev.port", "8080")
                    .with_property("%test.port", "9090"),
            )
            .build()
            .unwrap();

        assert_eq!(config.profiles(), ["dev".to_string(), "test".to_string()]);
        assert_eq!(config.get_value::<u16>("port").unwrap(), 9090);
    }

    #[test]
    fn test_explicit_profile_ignores_property() {
        let config = ConfigBuilder::new()
            .with_source(
                MapSource::new("app")
                    .with_property(PROFILE_KEY, "test")
                    .with_property("port", "80")
                    .with_property("%dev.port", "8080")
                    .with_property("%test.port", "9090"),
            )
            .with_profile("dev")
            .build()
            .unwrap();

        assert_eq!(config.get_value::<u16>("port").unwrap(), 8080);
    }

    #[test]
    fn test_static_stage_filters_sources_and_factories() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let config = ConfigBuilder::new()
            .with_source(MapSource::new("runtime-only").with_property("a", "1"))
            .with_source(
                MapSource::new("early")
                    .with_property("b", "2")
                    .static_init_safe(true),
            )
            .with_source_factory(Recording {
                name: "late",
                priority: 100,
                seen: Arc::clone(&seen),
                produces: None,
            })
            .for_stage(InitStage::Static)
            .build()
            .unwrap();

        assert_eq!(config.stage(), InitStage::Static);
        assert_eq!(config.get_raw_value("a").unwrap(), None);
        assert_eq!(config.get_raw_value("b").unwrap().as_deref(), Some("2"));
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_factories_run_by_priority_and_see_earlier_output() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let config = ConfigBuilder::new()
            .with_source_factory(Recording {
                name: "second",
                priority: 10,
                seen: Arc::clone(&seen),
                produces: None,
            })
            .with_source_factory(Recording {
                name: "first",
                priority: 500,
                seen: Arc::clone(&seen),
                produces: Some(("marker", "from-first")),
            })
            .build()
            .unwrap();

        assert_eq!(
            *seen.lock(),
            vec![("first", None), ("second", Some("from-first".to_string()))]
        );
        // Factory priority does not leak into the ordinal.
        assert_eq!(config.config_sources()[0].ordinal(), 5);
    }

    #[test]
    fn test_factory_error_is_wrapped() {
        struct Failing;
        impl ConfigSourceFactory for Failing {
            fn name(&self) -> String {
                "failing".to_string()
            }
            fn config_sources(
                &self,
                _: &ConfigSourceContext<'_>,
            ) -> Result<Vec<Box<dyn ConfigSource>>> {
                Err(ConfigError::Other("boom".to_string()))
            }
        }

        let err = ConfigBuilder::new()
            .with_source_factory(Failing)
            .build()
            .unwrap_err();
        match err {
            ConfigError::Factory { factory, message } => {
                assert_eq!(factory, "failing");
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_interceptor_priorities() {
        let config = ConfigBuilder::new()
            .with_interceptor(7000, from_fn(|ctx, name| ctx.proceed(name)))
            .with_logging()
            .with_caching()
            .build()
            .unwrap();

        assert_eq!(
            config.interceptor_priorities(),
            vec![
                7000,
                CACHING_PRIORITY,
                EXPRESSION_PRIORITY,
                PROFILE_PRIORITY,
                LOGGING_PRIORITY
            ]
        );
    }

    #[test]
    fn test_logging_enabled_by_property() {
        let config = ConfigBuilder::new()
            .with_source(MapSource::new("app").with_property(LOG_VALUES_KEY, "true"))
            .with_expressions(false)
            .build()
            .unwrap();
        assert_eq!(
            config.interceptor_priorities(),
            vec![PROFILE_PRIORITY, LOGGING_PRIORITY]
        );
    }

    #[test]
    fn test_interceptor_factory_sees_lower_priorities() {
        struct Suffix;
        impl ConfigSourceInterceptorFactory for Suffix {
            fn priority(&self) -> i32 {
                priorities::APPLICATION
            }

            fn interceptor(
                &self,
                context: &dyn InterceptorContext,
            ) -> Result<Arc<dyn ConfigSourceInterceptor>> {
                let suffix = context
                    .proceed("suffix")?
                    .map(|v| v.value().to_string())
                    .unwrap_or_default();
                Ok(Arc::new(from_fn(move |ctx, name| {
                    Ok(ctx
                        .proceed(name)?
                        .map(|v| {
                            let value = format!("{}{}", v.value(), suffix);
                            v.with_value(value)
                        }))
                })))
            }
        }

        let config = ConfigBuilder::new()
            .with_source(
                MapSource::new("app")
                    .with_property("greeting", "hello")
                    .with_property("suffix", "${mark}")
                    .with_property("mark", "!"),
            )
            .with_interceptor_factory(Suffix)
            .build()
            .unwrap();

        assert_eq!(config.get_value::<String>("greeting").unwrap(), "hello!");
    }

    #[test]
    fn test_interceptor_factory_default_priority() {
        struct Passthrough;
        impl ConfigSourceInterceptorFactory for Passthrough {
            fn interceptor(
                &self,
                _context: &dyn InterceptorContext,
            ) -> Result<Arc<dyn ConfigSourceInterceptor>> {
                Ok(Arc::new(from_fn(|ctx, name| ctx.proceed(name))))
            }
        }

        assert_eq!(Passthrough.priority(), 100);
        let config = ConfigBuilder::new()
            .with_interceptor_factory(Passthrough)
            .with_logging()
            .build()
            .unwrap();
        assert_eq!(
            config.interceptor_priorities(),
            vec![EXPRESSION_PRIORITY, PROFILE_PRIORITY, LOGGING_PRIORITY, 100]
        );
    }

    #[test]
    fn test_relocations_and_fallbacks() {
        let config = ConfigBuilder::new()
            .with_source(
                MapSource::new("app")
                    .with_property("datasource.url", "new")
                    .with_property("db.url", "old")
                    .with_property("pool.default", "4"),
            )
            .with_relocations(HashMap::from([(
                "db.url".to_string(),
                "datasource.url".to_string(),
            )]))
            .with_fallbacks(HashMap::from([(
                "pool.size".to_string(),
                "pool.default".to_string(),
            )]))
            .build()
            .unwrap();

        assert_eq!(config.get_value::<String>("db.url").unwrap(), "new");
        assert_eq!(config.get_value::<u32>("pool.size").unwrap(), 4);
    }

    #[test]
    fn test_expressions_see_relocated_names() {
        let config = ConfigBuilder::new()
            .with_source(
                MapSource::new("app")
                    .with_property("datasource.url", "postgres://new")
                    .with_property("banner", "using ${db.url}"),
            )
            .with_relocations(HashMap::from([(
                "db.url".to_string(),
                "datasource.url".to_string(),
            )]))
            .build()
            .unwrap();

        assert_eq!(
            config.get_value::<String>("banner").unwrap(),
            "using postgres://new"
        );
        assert_eq!(config.get_value::<String>("db.url").unwrap(), "postgres://new");
    }

    #[test]
    fn test_converter_overrides_builtin() {
        let config = ConfigBuilder::new()
            .with_source(MapSource::new("app").with_property("flag", "on"))
            .with_converter(100, |v: &str| -> std::result::Result<bool, _> {
                match v {
                    "on" => Ok(true),
                    "off" => Ok(false),
                    other => Err(crate::error::ConversionError::new(format!("bad flag {}", other))),
                }
            })
            .build()
            .unwrap();
        assert!(config.get_value::<bool>("flag").unwrap());
    }

    #[test]
    fn test_empty_build() {
        let config = ConfigBuilder::default().build().unwrap();
        assert!(config.config_sources().is_empty());
        assert_eq!(config.get_config_value("anything").unwrap(), None::<ConfigValue>);
    }
}
