//! Converting raw string values into typed values.
//!
//! A [`ConverterRegistry`] holds at most one converter per target type: the one
//! registered with the highest priority. Built-in converters are registered with
//! priority [`BUILTIN_PRIORITY`], so any converter registered with the default
//! priority replaces them.

mod builtin;
mod list;

pub use builtin::parse_duration;
pub use list::{escape_element, split_values};

use crate::error::{ConfigError, ConversionError, Result};
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

/// Priority of converters that do not specify one.
pub const DEFAULT_PRIORITY: i32 = 100;

/// Priority of the converters shipped with this crate.
pub const BUILTIN_PRIORITY: i32 = 1;

/// Converts a raw configuration value into `T`.
///
/// Converters must be pure: the same input always yields the same output.
/// Closures with the right signature are converters.
///
/// # Examples
///
/// ```rust
/// use ordinal_config::converters::Converter;
/// use ordinal_config::error::ConversionError;
///
/// #[derive(Debug, PartialEq)]
/// struct Port(u16);
///
/// let converter = |value: &str| -> Result<Port, ConversionError> {
///     value
///         .parse()
///         .map(Port)
///         .map_err(|e| ConversionError::new(format!("bad port: {}", e)))
/// };
///
/// assert_eq!(converter.convert("8080"), Ok(Port(8080)));
/// ```
pub trait Converter<T>: Send + Sync {
    /// Convert `value`.
    ///
    /// # Errors
    ///
    /// Returns a `ConversionError` describing why the value is not a valid `T`.
    fn convert(&self, value: &str) -> std::result::Result<T, ConversionError>;
}

impl<T, F> Converter<T> for F
where
    F: Fn(&str) -> std::result::Result<T, ConversionError> + Send + Sync,
{
    fn convert(&self, value: &str) -> std::result::Result<T, ConversionError> {
        self(value)
    }
}

/// Converter for any type implementing `FromStr`. The input is trimmed.
pub struct FromStrConverter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> FromStrConverter<T> {
    /// Create a `FromStr`-based converter.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for FromStrConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Converter<T> for FromStrConverter<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn convert(&self, value: &str) -> std::result::Result<T, ConversionError> {
        value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConversionError::new(e.to_string()))
    }
}

struct Entry {
    priority: i32,
    type_name: &'static str,
    // Holds an `Arc<dyn Converter<T>>` for the `T` of the map key.
    converter: Arc<dyn Any + Send + Sync>,
}

/// Maps target types to their selected converter.
///
/// # Examples
///
/// ```rust
/// use ordinal_config::converters::ConverterRegistry;
///
/// let registry = ConverterRegistry::with_builtins();
/// let port: u16 = registry.convert("server.port", "8080").unwrap();
/// assert_eq!(port, 8080);
/// ```
#[derive(Default)]
pub struct ConverterRegistry {
    entries: HashMap<TypeId, Entry>,
}

impl ConverterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in converters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Register a converter for `T`.
    ///
    /// The converter is selected if no converter for `T` exists yet or if its
    /// priority is at least that of the current one. Returns whether it was
    /// selected.
    pub fn register<T, C>(&mut self, priority: i32, converter: C) -> bool
    where
        T: 'static,
        C: Converter<T> + 'static,
    {
        let key = TypeId::of::<T>();
        if let Some(existing) = self.entries.get(&key) {
            if existing.priority > priority {
                tracing::trace!(
                    target_type = type_name::<T>(),
                    priority,
                    kept = existing.priority,
                    "converter ignored, higher priority already registered"
                );
                return false;
            }
        }

        let converter: Arc<dyn Converter<T>> = Arc::new(converter);
        self.entries.insert(
            key,
            Entry {
                priority,
                type_name: type_name::<T>(),
                converter: Arc::new(converter),
            },
        );
        true
    }

    /// The selected converter for `T`.
    pub fn get<T: 'static>(&self) -> Option<Arc<dyn Converter<T>>> {
        self.entries
            .get(&TypeId::of::<T>())?
            .converter
            .downcast_ref::<Arc<dyn Converter<T>>>()
            .cloned()
    }

    /// Priority of the selected converter for `T`.
    pub fn priority_of<T: 'static>(&self) -> Option<i32> {
        self.entries.get(&TypeId::of::<T>()).map(|e| e.priority)
    }

    /// Names of all types with a converter, sorted.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.values().map(|e| e.type_name).collect();
        names.sort_unstable();
        names
    }

    /// The selected converter for `T`, or a `NoConverter` error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConverter` if nothing is registered for `T`.
    pub fn require<T: 'static>(&self) -> Result<Arc<dyn Converter<T>>> {
        self.get::<T>().ok_or(ConfigError::NoConverter {
            type_name: type_name::<T>(),
        })
    }

    /// Convert the value of property `name` into `T`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConverter` if nothing is registered for `T`, or
    /// `ConfigError::Conversion` if the converter rejects the value.
    pub fn convert<T: 'static>(&self, name: &str, value: &str) -> Result<T> {
        let converter = self.require::<T>()?;
        apply(converter.as_ref(), name, value)
    }
}

/// Run a converter and attach the property name to any failure.
pub(crate) fn apply<T>(converter: &dyn Converter<T>, name: &str, value: &str) -> Result<T> {
    converter.convert(value).map_err(|e| ConfigError::Conversion {
        name: name.to_string(),
        type_name: type_name::<T>(),
        value: value.to_string(),
        reason: e.reason().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Celsius(f64);

    fn celsius(value: &str) -> std::result::Result<Celsius, ConversionError> {
        value
            .trim_end_matches('C')
            .parse()
            .map(Celsius)
            .map_err(|_| ConversionError::new("expected a temperature like 21C"))
    }

    #[test]
    fn test_custom_converter() {
        let mut registry = ConverterRegistry::new();
        assert!(registry.register(DEFAULT_PRIORITY, celsius));

        let value: Celsius = registry.convert("temp", "21C").unwrap();
        assert_eq!(value, Celsius(21.0));
    }

    #[test]
    fn test_highest_priority_wins() {
        let mut registry = ConverterRegistry::new();
        registry.register(200, |_: &str| -> std::result::Result<u8, ConversionError> {
            Ok(2)
        });
        let replaced = registry.register(100, |_: &str| -> std::result::Result<u8, ConversionError> {
            Ok(1)
        });

        assert!(!replaced);
        assert_eq!(registry.convert::<u8>("k", "x").unwrap(), 2);
        assert_eq!(registry.priority_of::<u8>(), Some(200));
    }

    #[test]
    fn test_equal_priority_replaces() {
        let mut registry = ConverterRegistry::new();
        registry.register(100, |_: &str| -> std::result::Result<u8, ConversionError> {
            Ok(1)
        });
        registry.register(100, |_: &str| -> std::result::Result<u8, ConversionError> {
            Ok(2)
        });
        assert_eq!(registry.convert::<u8>("k", "x").unwrap(), 2);
    }

    #[test]
    fn test_user_converter_overrides_builtin() {
        let mut registry = ConverterRegistry::with_builtins();
        assert_eq!(registry.priority_of::<bool>(), Some(BUILTIN_PRIORITY));

        registry.register(DEFAULT_PRIORITY, |v: &str| -> std::result::Result<bool, ConversionError> {
            match v {
                "enabled" => Ok(true),
                "disabled" => Ok(false),
                other => Err(ConversionError::new(format!("unknown switch '{}'", other))),
            }
        });

        assert!(registry.convert::<bool>("k", "enabled").unwrap());
        assert!(registry.convert::<bool>("k", "true").is_err());
    }

    #[test]
    fn test_missing_converter() {
        let registry = ConverterRegistry::new();
        let err = registry.convert::<Celsius>("temp", "1C").unwrap_err();
        assert!(matches!(err, ConfigError::NoConverter { .. }));
    }

    #[test]
    fn test_conversion_error_carries_context() {
        let registry = ConverterRegistry::with_builtins();
        let err = registry.convert::<u16>("server.port", "eighty").unwrap_err();
        match err {
            ConfigError::Conversion {
                name,
                value,
                type_name,
                ..
            } => {
                assert_eq!(name, "server.port");
                assert_eq!(value, "eighty");
                assert_eq!(type_name, "u16");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_str_converter() {
        let converter = FromStrConverter::<std::net::IpAddr>::new();
        assert!(converter.convert(" 127.0.0.1 ").is_ok());
        assert!(converter.convert("localhost").is_err());
    }
}
