//! Environment variable configuration source.

use super::ConfigSource;
use super::config_source::{CONFIG_ORDINAL, ordinal_override};
use crate::error::Result;
use std::collections::{BTreeMap, BTreeSet};

/// Environment variable configuration source.
///
/// Captures the process environment when constructed. A property name is
/// matched against the environment in three steps:
///
/// 1. the exact name (`server.port`)
/// 2. every non-alphanumeric character replaced by `_` (`server_port`)
/// 3. the same, upper-cased (`SERVER_PORT`)
///
/// With a prefix, the prefix and a `_` are prepended before matching, so
/// `server.port` with prefix `APP` resolves `APP_SERVER_PORT`.
///
/// # Examples
///
/// ```rust
/// use ordinal_config::sources::{ConfigSource, EnvSource};
///
/// let source = EnvSource::from_vars([("SERVER_PORT", "8080")]).unwrap();
/// assert_eq!(source.get_value("server.port").as_deref(), Some("8080"));
/// ```
#[derive(Debug, Clone)]
pub struct EnvSource {
    vars: BTreeMap<String, String>,
    prefix: Option<String>,
    ordinal: i32,
}

impl EnvSource {
    /// Ordinal of environment variables unless overridden.
    pub const DEFAULT_ORDINAL: i32 = 300;

    /// Create a source from the current process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `CONFIG_ORDINAL` is set but is not an integer.
    pub fn new() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Create a source from an explicit set of variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `CONFIG_ORDINAL` (or `config_ordinal`) is present but
    /// is not an integer.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: BTreeMap<String, String> =
            vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();

        let mut ordinal = ordinal_override("env", &vars)?;
        if ordinal.is_none() {
            if let Some(raw) = vars.get(&CONFIG_ORDINAL.to_uppercase()) {
                let upper = BTreeMap::from([(CONFIG_ORDINAL.to_string(), raw.clone())]);
                ordinal = ordinal_override("env", &upper)?;
            }
        }

        Ok(Self {
            vars,
            prefix: None,
            ordinal: ordinal.unwrap_or(Self::DEFAULT_ORDINAL),
        })
    }

    /// Only match variables starting with `{prefix}_`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordinal_config::sources::{ConfigSource, EnvSource};
    ///
    /// // APP_SERVER_PORT=8080 -> server.port = 8080
    /// let source = EnvSource::from_vars([("APP_SERVER_PORT", "8080")])
    ///     .unwrap()
    ///     .with_prefix("APP");
    /// assert_eq!(source.get_value("server.port").as_deref(), Some("8080"));
    /// ```
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the ordinal for this source.
    ///
    /// Higher ordinal sources override lower ordinal ones.
    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = ordinal;
        self
    }

    fn candidates(&self, name: &str) -> [String; 3] {
        let base = match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, name),
            None => name.to_string(),
        };
        let sanitized: String = base
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let upper = sanitized.to_ascii_uppercase();
        [base, sanitized, upper]
    }
}

impl ConfigSource for EnvSource {
    fn name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("env:{}_*", prefix),
            None => "env".to_string(),
        }
    }

    fn ordinal(&self) -> i32 {
        self.ordinal
    }

    fn property_names(&self) -> BTreeSet<String> {
        match &self.prefix {
            Some(prefix) => {
                let marker = format!("{}_", prefix);
                self.vars
                    .keys()
                    .filter_map(|k| k.strip_prefix(&marker).map(str::to_string))
                    .collect()
            }
            None => self.vars.keys().cloned().collect(),
        }
    }

    fn get_value(&self, name: &str) -> Option<String> {
        self.candidates(name)
            .iter()
            .find_map(|candidate| self.vars.get(candidate).cloned())
    }

    fn is_static_init_safe(&self) -> bool {
        true
    }
}
