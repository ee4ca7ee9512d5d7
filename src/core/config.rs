//! The resolved configuration.

use crate::converters::{self, Converter, ConverterRegistry, split_values};
use crate::core::mapping::MappedValue;
use crate::core::{ConfigBuilder, ConfigValue, InitStage};
use crate::error::{ConfigError, Result};
use crate::interceptors::chain::InterceptorChain;
use crate::sources::ConfigSource;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::sync::Arc;

#[cfg(feature = "validation")]
use crate::core::Validate;

#[cfg(feature = "metrics")]
use crate::metrics::ConfigMetrics;

/// A built configuration: sources, interceptor chain and converters.
///
/// `Config` is immutable and `Send + Sync`; share it with `Arc<Config>`. Every
/// lookup runs through the interceptor chain, ends at the ordinal-sorted
/// sources, and typed lookups then pass through the converter selected for the
/// requested type.
///
/// # Examples
///
/// ```rust
/// use ordinal_config::prelude::*;
/// use ordinal_config::sources::MapSource;
///
/// # fn example() -> Result<()> {
/// let config = Config::builder()
///     .with_source(MapSource::new("app").with_property("server.port", "8080"))
///     .build()?;
///
/// let port: u16 = config.get_value("server.port")?;
/// assert_eq!(port, 8080);
/// # Ok(())
/// # }
/// ```
pub struct Config {
    chain: InterceptorChain,
    converters: ConverterRegistry,
    profiles: Vec<String>,
    stage: InitStage,
    #[cfg(feature = "metrics")]
    metrics: Option<ConfigMetrics>,
}

impl Config {
    /// Create a new builder for constructing a configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub(crate) fn from_parts(
        chain: InterceptorChain,
        converters: ConverterRegistry,
        profiles: Vec<String>,
        stage: InitStage,
        #[cfg(feature = "metrics")] metrics: Option<ConfigMetrics>,
    ) -> Self {
        Self {
            chain,
            converters,
            profiles,
            stage,
            #[cfg(feature = "metrics")]
            metrics,
        }
    }

    /// Resolve a property through the interceptor chain, with provenance.
    ///
    /// # Errors
    ///
    /// Returns any error raised by an interceptor (for example an expression
    /// referencing an undefined property).
    pub fn get_config_value(&self, name: &str) -> Result<Option<ConfigValue>> {
        #[cfg(feature = "metrics")]
        let timer = self.metrics.as_ref().map(|m| m.start_lookup());

        let resolved = self.chain.get_value(name);

        #[cfg(feature = "metrics")]
        if let (Some(metrics), Some(timer)) = (&self.metrics, timer) {
            metrics.record_lookup(timer, matches!(resolved, Ok(Some(_))));
        }

        resolved
    }

    /// Resolve a property's string value.
    ///
    /// # Errors
    ///
    /// Returns any error raised by an interceptor.
    pub fn get_raw_value(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .get_config_value(name)?
            .map(|value| value.value().to_string()))
    }

    /// Resolve and convert a required property.
    ///
    /// An empty value counts as missing.
    ///
    /// # Errors
    ///
    /// - `ConfigError::NoConverter` if no converter exists for `T`
    /// - `ConfigError::NoSuchElement` if the property is missing or empty
    /// - `ConfigError::Conversion` if the value cannot be converted
    pub fn get_value<T: 'static>(&self, name: &str) -> Result<T> {
        self.get_optional_value(name)?
            .ok_or_else(|| ConfigError::no_such_element(name))
    }

    /// Resolve and convert an optional property.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConverter` or `ConfigError::Conversion`; a
    /// missing or empty property is `Ok(None)`.
    pub fn get_optional_value<T: 'static>(&self, name: &str) -> Result<Option<T>> {
        let converter = self.converters.require::<T>()?;
        let Some(value) = self.get_config_value(name)? else {
            return Ok(None);
        };
        if value.value().is_empty() {
            return Ok(None);
        }
        self.convert(converter.as_ref(), name, value.value()).map(Some)
    }

    /// Resolve a comma-separated property and convert every element.
    ///
    /// Commas escaped as `\,` stay inside their element; empty elements are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoSuchElement` if the property is missing or has no
    /// non-empty element, and the errors of [`get_value`](Self::get_value)
    /// otherwise.
    pub fn get_values<T: 'static>(&self, name: &str) -> Result<Vec<T>> {
        self.get_optional_values(name)?
            .ok_or_else(|| ConfigError::no_such_element(name))
    }

    /// Like [`get_values`](Self::get_values), returning `Ok(None)` when missing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConverter` or `ConfigError::Conversion`.
    pub fn get_optional_values<T: 'static>(&self, name: &str) -> Result<Option<Vec<T>>> {
        let converter = self.converters.require::<T>()?;
        let Some(value) = self.get_config_value(name)? else {
            return Ok(None);
        };

        let elements = split_values(value.value());
        if elements.is_empty() {
            return Ok(None);
        }
        elements
            .iter()
            .map(|element| self.convert(converter.as_ref(), name, element))
            .collect::<Result<Vec<T>>>()
            .map(Some)
    }

    fn convert<T>(&self, converter: &dyn Converter<T>, name: &str, value: &str) -> Result<T> {
        let converted = converters::apply(converter, name, value);
        #[cfg(feature = "metrics")]
        if converted.is_err() {
            if let Some(metrics) = &self.metrics {
                metrics.record_conversion_failure();
            }
        }
        converted
    }

    /// All property names visible through the interceptor chain.
    pub fn property_names(&self) -> BTreeSet<String> {
        self.chain.iterate_names()
    }

    /// The configuration sources in precedence order.
    pub fn config_sources(&self) -> &[Arc<dyn ConfigSource>] {
        self.chain.sources().sources()
    }

    /// Priorities of the assembled interceptors in execution order.
    pub fn interceptor_priorities(&self) -> Vec<i32> {
        self.chain
            .interceptors()
            .iter()
            .map(|(priority, _)| *priority)
            .collect()
    }

    /// The selected converter for `T`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConverter` if nothing is registered for `T`.
    pub fn converter<T: 'static>(&self) -> Result<Arc<dyn Converter<T>>> {
        self.converters.require::<T>()
    }

    /// The active profiles, in activation order.
    pub fn profiles(&self) -> &[String] {
        &self.profiles
    }

    /// The startup phase this configuration was built for.
    pub fn stage(&self) -> InitStage {
        self.stage
    }

    /// Deserialize every property under `prefix` into `T`.
    ///
    /// Property names are taken relative to `prefix` (`server.port` becomes
    /// `port` for prefix `server`). Values are resolved through the interceptor
    /// chain, then converted by the `config` crate's deserializer. A
    /// comma-joined value maps onto a sequence field element by element. An
    /// empty prefix maps every property.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DeserializationError` if the properties do not form
    /// a valid `T`, and any lookup error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordinal_config::prelude::*;
    /// use ordinal_config::sources::MapSource;
    /// use serde::Deserialize;
    ///
    /// #[derive(Debug, Deserialize)]
    /// struct Server {
    ///     host: String,
    ///     port: u16,
    /// }
    ///
    /// # fn example() -> Result<()> {
    /// let config = Config::builder()
    ///     .with_source(
    ///         MapSource::new("app")
    ///             .with_property("server.host", "localhost")
    ///             .with_property("server.port", "8080"),
    ///     )
    ///     .build()?;
    ///
    /// let server: Server = config.mapping("server")?;
    /// assert_eq!(server.port, 8080);
    /// # Ok(())
    /// # }
    /// ```
    pub fn mapping<T: DeserializeOwned>(&self, prefix: &str) -> Result<T> {
        let marker = format!("{}.", prefix);
        let mut builder = config::Config::builder();

        for name in self.property_names() {
            let relative = if prefix.is_empty() {
                name.as_str()
            } else {
                match name.strip_prefix(&marker) {
                    Some(relative) => relative,
                    None => continue,
                }
            };
            let Some(value) = self.get_config_value(&name)? else {
                continue;
            };
            builder = builder
                .set_override(relative, value.value().to_string())
                .map_err(|e| {
                    ConfigError::DeserializationError(format!(
                        "Invalid property name '{}': {}",
                        name, e
                    ))
                })?;
        }

        let tree = builder
            .build()
            .and_then(|assembled| assembled.try_deserialize::<config::Value>())
            .map_err(|e| {
                ConfigError::DeserializationError(format!("Failed to assemble '{}': {}", prefix, e))
            })?;
        T::deserialize(MappedValue::new(tree)).map_err(|e| {
            ConfigError::DeserializationError(format!("Failed to deserialize '{}': {}", prefix, e))
        })
    }

    /// Like [`mapping`](Self::mapping), then run the type's validation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if validation fails, and the
    /// errors of `mapping` otherwise.
    #[cfg(feature = "validation")]
    pub fn validated_mapping<T: DeserializeOwned + Validate>(&self, prefix: &str) -> Result<T> {
        let mapped: T = self.mapping(prefix)?;
        mapped.validate()?;
        Ok(mapped)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("sources", &self.chain.sources().source_names())
            .field("interceptors", &self.interceptor_priorities())
            .field("converters", &self.converters.type_names())
            .field("profiles", &self.profiles)
            .field("stage", &self.stage)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionError;
    use crate::sources::MapSource;
    use serde::Deserialize;
    use std::time::Duration;

    fn config(properties: &[(&str, &str)]) -> Config {
        let source = properties
            .iter()
            .fold(MapSource::new("app"), |s, (k, v)| s.with_property(*k, *v));
        Config::builder().with_source(source).build().unwrap()
    }

    #[test]
    fn test_typed_lookups() {
        let config = config(&[("port", "8080"), ("debug", "yes"), ("timeout", "5s")]);
        assert_eq!(config.get_value::<u16>("port").unwrap(), 8080);
        assert!(config.get_value::<bool>("debug").unwrap());
        assert_eq!(
            config.get_value::<Duration>("timeout").unwrap(),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_missing_and_empty_values() {
        let config = config(&[("empty", "")]);
        assert!(matches!(
            config.get_value::<String>("missing"),
            Err(ConfigError::NoSuchElement { .. })
        ));
        assert!(matches!(
            config.get_value::<String>("empty"),
            Err(ConfigError::NoSuchElement { .. })
        ));
        assert_eq!(config.get_optional_value::<String>("empty").unwrap(), None);
        assert_eq!(config.get_raw_value("empty").unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_no_converter_even_when_missing() {
        struct Unregistered;
        let config = config(&[]);
        assert!(matches!(
            config.get_optional_value::<Unregistered>("anything"),
            Err(ConfigError::NoConverter { .. })
        ));
    }

    #[test]
    fn test_list_values() {
        let config = config(&[("hosts", "a,b\\,c,,d"), ("ports", "80,x"), ("blank", ",")]);
        assert_eq!(
            config.get_values::<String>("hosts").unwrap(),
            vec!["a", "b,c", "d"]
        );
        assert!(matches!(
            config.get_values::<u16>("ports"),
            Err(ConfigError::Conversion { .. })
        ));
        assert!(matches!(
            config.get_values::<String>("blank"),
            Err(ConfigError::NoSuchElement { .. })
        ));
    }

    #[test]
    fn test_custom_converter_through_config() {
        #[derive(Debug, PartialEq)]
        struct Level(u8);

        let config = Config::builder()
            .with_source(MapSource::new("app").with_property("level", "high"))
            .with_converter(100, |v: &str| -> std::result::Result<Level, ConversionError> {
                match v {
                    "low" => Ok(Level(1)),
                    "high" => Ok(Level(9)),
                    _ => Err(ConversionError::new("unknown level")),
                }
            })
            .build()
            .unwrap();

        assert_eq!(config.get_value::<Level>("level").unwrap(), Level(9));
        assert!(config.converter::<Level>().is_ok());
    }

    #[test]
    fn test_mapping_nested_struct() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Database {
            url: String,
            pool: Pool,
        }

        #[derive(Debug, Deserialize, PartialEq)]
        struct Pool {
            max: u32,
        }

        let config = config(&[
            ("db.url", "postgres://localhost/app"),
            ("db.pool.max", "16"),
            ("other.key", "ignored"),
        ]);

        let db: Database = config.mapping("db").unwrap();
        assert_eq!(db.url, "postgres://localhost/app");
        assert_eq!(db.pool.max, 16);
    }

    #[test]
    fn test_mapping_list_fields() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Server {
            hosts: Vec<String>,
            ports: Vec<u16>,
            banner: String,
        }

        let config = config(&[
            ("server.hosts", "a,b\\,c"),
            ("server.ports", "80,443"),
            ("server.banner", "hello, world"),
        ]);

        let server: Server = config.mapping("server").unwrap();
        assert_eq!(server.hosts, vec!["a", "b,c"]);
        assert_eq!(server.ports, vec![80, 443]);
        assert_eq!(server.banner, "hello, world");
    }

    #[test]
    fn test_mapping_root_skips_inactive_profiles() {
        #[derive(Debug, Deserialize)]
        struct Root {
            a: String,
        }

        let config = config(&[("a", "plain"), ("%dev.a", "dev")]);
        assert!(!config.property_names().contains("%dev.a"));
        assert_eq!(config.mapping::<Root>("").unwrap().a, "plain");
    }

    #[test]
    fn test_mapping_missing_field() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Needs {
            required: String,
        }

        let config = config(&[("needs.other", "x")]);
        assert!(matches!(
            config.mapping::<Needs>("needs"),
            Err(ConfigError::DeserializationError(_))
        ));
    }

    #[cfg(feature = "validation")]
    #[test]
    fn test_validated_mapping() {
        use crate::error::ValidationError;

        #[derive(Debug, Deserialize)]
        struct Server {
            port: u16,
        }

        impl Validate for Server {
            fn validate(&self) -> std::result::Result<(), ValidationError> {
                if self.port < 1024 {
                    return Err(ValidationError::invalid_field("port", "must be >= 1024"));
                }
                Ok(())
            }
        }

        let config = config(&[("ok.port", "8080"), ("bad.port", "80")]);
        assert_eq!(config.validated_mapping::<Server>("ok").unwrap().port, 8080);
        assert!(matches!(
            config.validated_mapping::<Server>("bad"),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_debug_lists_sources() {
        let config = config(&[("a", "1")]);
        let debug = format!("{:?}", config);
        assert!(debug.contains("app"));
        assert!(debug.contains("Runtime"));
    }
}
