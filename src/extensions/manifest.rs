//! Text manifests naming the extensions to load.

use super::{ConfigExtension, ExtensionCatalog};
use crate::error::Result;
use std::path::Path;

/// An ordered list of extension names.
///
/// The format is one name per line. `#` starts a comment, surrounding
/// whitespace and blank lines are ignored, and a name listed twice is kept at
/// its first position.
///
/// # Examples
///
/// ```rust
/// use ordinal_config::extensions::ServiceManifest;
///
/// let manifest = ServiceManifest::parse("
///     ## core
///     profiles
///     metrics   # optional
///     profiles
/// ");
/// assert_eq!(manifest.names(), ["profiles", "metrics"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceManifest {
    names: Vec<String>,
}

impl ServiceManifest {
    /// Parse a manifest.
    pub fn parse(content: &str) -> Self {
        let mut names: Vec<String> = Vec::new();
        for line in content.lines() {
            let entry = match line.split_once('#') {
                Some((before, _)) => before,
                None => line,
            }
            .trim();
            if entry.is_empty() || names.iter().any(|n| n == entry) {
                continue;
            }
            names.push(entry.to_string());
        }
        Self { names }
    }

    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::IoError` if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let manifest = Self::parse(&content);
        tracing::debug!(
            manifest = %path.as_ref().display(),
            extensions = ?manifest.names,
            "read extension manifest"
        );
        Ok(manifest)
    }

    /// The listed names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Create every listed extension from `catalog`, in manifest order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownExtension` for the first name missing from
    /// the catalog.
    pub fn instantiate(&self, catalog: &ExtensionCatalog) -> Result<Vec<Box<dyn ConfigExtension>>> {
        self.names
            .iter()
            .map(|name| {
                catalog.create(name).inspect_err(|_| {
                    tracing::debug!(extension = %name, known = ?catalog.names(), "unknown extension");
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, ConfigBuilder};
    use crate::error::ConfigError;
    use std::fs;
    use tempfile::TempDir;

    struct Named(&'static str);

    impl ConfigExtension for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn register(&self, builder: ConfigBuilder) -> ConfigBuilder {
            builder.with_defaults([(format!("ext.{}", self.0), "on")])
        }
    }

    fn catalog() -> ExtensionCatalog {
        ExtensionCatalog::new()
            .with("alpha", || Box::new(Named("alpha")))
            .with("beta", || Box::new(Named("beta")))
    }

    #[test]
    fn test_parse_comments_blanks_and_duplicates() {
        let manifest = ServiceManifest::parse("alpha\n\n  # comment only\nbeta # trailing\nalpha\n");
        assert_eq!(manifest.names(), ["alpha".to_string(), "beta".to_string()]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(ServiceManifest::parse("# nothing\n\n").names().is_empty());
    }

    #[test]
    fn test_instantiate_unknown_name() {
        let manifest = ServiceManifest::parse("alpha\ngamma\n");
        assert!(matches!(
            manifest.instantiate(&catalog()),
            Err(ConfigError::UnknownExtension(name)) if name == "gamma"
        ));
    }

    #[test]
    fn test_manifest_file_registers_extensions() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("extensions");
        fs::write(&path, "beta\nalpha\n").unwrap();

        let config = Config::builder()
            .with_manifest(&path, &catalog())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.get_value::<String>("ext.alpha").unwrap(), "on");
        assert_eq!(config.get_value::<String>("ext.beta").unwrap(), "on");
    }

    #[test]
    fn test_missing_manifest_file() {
        let result = Config::builder().with_manifest("/nonexistent/extensions", &catalog());
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
