//! File-based configuration source.

use super::config_source::ordinal_override;
use super::{ConfigSource, DEFAULT_ORDINAL};
use crate::converters::escape_element;
use crate::core::ConfigValue;
use crate::error::{ConfigError, Result};
use config::{File, Source, Value, ValueKind};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// File-based configuration source.
///
/// Loads configuration from YAML, TOML, or JSON files with automatic format detection
/// based on file extension. Nested tables are flattened into dotted property names
/// (`server: { port: 8080 }` becomes `server.port`). Arrays of scalars are joined
/// with commas, arrays of tables are indexed (`servers[0].host`).
///
/// The file is read once, when the source is created.
///
/// # Examples
///
/// ```rust,no_run
/// use ordinal_config::sources::FileSource;
///
/// # fn example() -> ordinal_config::error::Result<()> {
/// let source = FileSource::load("config/application.yaml")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    ordinal: i32,
    declared_ordinal: bool,
    properties: BTreeMap<String, String>,
}

impl FileSource {
    /// Load a file source with automatic format detection.
    ///
    /// The format is detected from the file extension:
    /// - `.yaml`, `.yml` -> YAML
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    ///
    /// If the file defines `config_ordinal`, it becomes the source ordinal.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is unsupported, the file does not
    /// exist, or its content cannot be parsed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        validate_extension(&path)?;

        if !path.exists() {
            return Err(ConfigError::LoadError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        // Build a config using the config crate (auto-detects format from extension)
        let parsed = config::Config::builder()
            .add_source(File::from(path.clone()).required(true))
            .build()
            .map_err(|e| ConfigError::LoadError(format!("Failed to load file: {}", e)))?;

        let table = parsed.collect().map_err(|e| {
            ConfigError::DeserializationError(format!("Failed to parse file: {}", e))
        })?;

        let mut properties = BTreeMap::new();
        for (key, value) in table {
            flatten(&key, value, &mut properties)?;
        }

        let name = format!("file:{}", path.display());
        let declared = ordinal_override(&name, &properties)?;
        tracing::debug!(source = %name, properties = properties.len(), "loaded configuration file");

        Ok(Self {
            path,
            ordinal: declared.unwrap_or(DEFAULT_ORDINAL),
            declared_ordinal: declared.is_some(),
            properties,
        })
    }

    /// Set the ordinal for this source.
    ///
    /// Higher ordinal sources override lower ordinal ones.
    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = ordinal;
        self
    }

    /// Whether the file sets its own ordinal through `config_ordinal`.
    pub fn has_declared_ordinal(&self) -> bool {
        self.declared_ordinal
    }

    /// Path of the loaded file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Validate that the file extension is supported.
fn validate_extension(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| {
            ConfigError::LoadError(format!(
                "Unable to determine file format for: {}",
                path.display()
            ))
        })?;

    match extension {
        "yaml" | "yml" | "toml" | "json" => Ok(()),
        _ => Err(ConfigError::LoadError(format!(
            "Unsupported file extension: {}. Supported: .yaml, .yml, .toml, .json",
            extension
        ))),
    }
}

fn flatten(key: &str, value: Value, out: &mut BTreeMap<String, String>) -> Result<()> {
    match value.kind {
        ValueKind::Nil => Ok(()),
        ValueKind::Table(table) => {
            for (child, value) in table {
                flatten(&format!("{}.{}", key, child), value, out)?;
            }
            Ok(())
        }
        ValueKind::Array(items) => {
            let nested = items
                .iter()
                .any(|item| matches!(item.kind, ValueKind::Table(_) | ValueKind::Array(_)));
            if nested {
                for (index, item) in items.into_iter().enumerate() {
                    flatten(&format!("{}[{}]", key, index), item, out)?;
                }
            } else {
                let joined = items
                    .into_iter()
                    .map(|item| scalar(key, item).map(|s| escape_element(&s)))
                    .collect::<Result<Vec<_>>>()?
                    .join(",");
                out.insert(key.to_string(), joined);
            }
            Ok(())
        }
        kind => {
            out.insert(key.to_string(), scalar(key, Value::new(None, kind))?);
            Ok(())
        }
    }
}

fn scalar(key: &str, value: Value) -> Result<String> {
    value.into_string().map_err(|e| {
        ConfigError::DeserializationError(format!("Unsupported value for '{}': {}", key, e))
    })
}

impl ConfigSource for FileSource {
    fn name(&self) -> String {
        format!("file:{}", self.path.display())
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

    fn get_config_value(&self, name: &str) -> Option<ConfigValue> {
        let value = self.properties.get(name)?;
        Some(
            ConfigValue::new(name, value.clone())
                .with_source(self.name(), self.ordinal)
                .with_location(self.path.display().to_string()),
        )
    }

    fn is_static_init_safe(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_extension_yaml() {
        assert!(validate_extension(Path::new("config.yaml")).is_ok());
        assert!(validate_extension(Path::new("config.yml")).is_ok());
    }

    #[test]
    fn test_validate_extension_toml_and_json() {
        assert!(validate_extension(Path::new("config.toml")).is_ok());
        assert!(validate_extension(Path::new("config.json")).is_ok());
    }

    #[test]
    fn test_validate_extension_unknown() {
        assert!(validate_extension(Path::new("config.txt")).is_err());
        assert!(validate_extension(Path::new("config")).is_err());
    }

    #[test]
    fn test_load_yaml_file_flattens_tables() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        fs::write(
            &config_path,
            r#"
server:
  port: 8080
  host: localhost
  tags:
    - a
    - "b,c"
"#,
        )
        .unwrap();

        let source = FileSource::load(&config_path).unwrap();
        assert_eq!(source.get_value("server.port").as_deref(), Some("8080"));
        assert_eq!(source.get_value("server.host").as_deref(), Some("localhost"));
        assert_eq!(source.get_value("server.tags").as_deref(), Some("a,b\\,c"));
        assert_eq!(source.ordinal(), 100);

        let value = source.get_config_value("server.port").unwrap();
        assert_eq!(value.location(), Some(config_path.display().to_string().as_str()));
    }

    #[test]
    fn test_load_json_array_of_tables() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        fs::write(
            &config_path,
            r#"{ "servers": [ { "host": "a" }, { "host": "b" } ], "config_ordinal": 260 }"#,
        )
        .unwrap();

        let source = FileSource::load(&config_path).unwrap();
        assert_eq!(source.get_value("servers[0].host").as_deref(), Some("a"));
        assert_eq!(source.get_value("servers[1].host").as_deref(), Some("b"));
        assert_eq!(source.ordinal(), 260);
        assert!(source.has_declared_ordinal());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = FileSource::load("/nonexistent/config.yaml");
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_with_ordinal_and_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "port = 1\n").unwrap();

        let source = FileSource::load(&config_path).unwrap().with_ordinal(200);
        assert_eq!(source.ordinal(), 200);
        assert!(source.name().contains("config.toml"));
    }
}
