//! Remote HTTP/HTTPS configuration built from a URL found in other sources.

use super::factory::{ConfigSourceContext, ConfigSourceFactory};
use super::{CONFIG_ORDINAL, ConfigSource, MapSource};
use crate::converters::escape_element;
use crate::error::{ConfigError, Result};
use reqwest::blocking::Client;
use reqwest::header::HeaderValue;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::time::Duration;

/// Property holding the URL to fetch.
pub const REMOTE_URL_KEY: &str = "config.remote.url";

/// Property holding an optional bearer token.
pub const REMOTE_TOKEN_KEY: &str = "config.remote.token";

const DEFAULT_REMOTE_ORDINAL: i32 = 250;

/// Fetches a JSON document from a URL configured in another source.
///
/// The URL is read from `config.remote.url` (and an optional bearer token from
/// `config.remote.token`) through the configuration resolved so far. The JSON
/// object is flattened into dotted property names and served by a single
/// source named `http:<url>`. Without a URL the factory produces no source. A
/// failed request aborts the build.
///
/// # Examples
///
/// ```rust,no_run
/// use ordinal_config::prelude::*;
/// use ordinal_config::sources::HttpSourceFactory;
///
/// # fn example() -> Result<()> {
/// // CONFIG_REMOTE_URL=https://config.example.com/api/config
/// let config = Config::builder()
///     .with_env()
///     .with_source_factory(HttpSourceFactory::new())
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpSourceFactory {
    url_key: String,
    timeout: Duration,
    ordinal: i32,
}

impl HttpSourceFactory {
    /// Create a factory reading `config.remote.url`.
    ///
    /// The fetched source gets ordinal 250: above files, below environment
    /// variables.
    pub fn new() -> Self {
        Self {
            url_key: REMOTE_URL_KEY.to_string(),
            timeout: Duration::from_secs(10),
            ordinal: DEFAULT_REMOTE_ORDINAL,
        }
    }

    /// Read the URL from a different property.
    pub fn with_url_key(mut self, key: impl Into<String>) -> Self {
        self.url_key = key.into();
        self
    }

    /// Set the request timeout. Default is 10 seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the ordinal of the fetched source, used when the document does not
    /// set `config_ordinal` itself.
    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = ordinal;
        self
    }

    fn fetch(&self, url: &str, token: Option<&str>) -> Result<JsonValue> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ConfigError::LoadError(format!("Failed to create HTTP client: {}", e)))?;

        let mut request = client.get(url);
        if let Some(token) = token {
            let header_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ConfigError::LoadError(format!("Invalid bearer token: {}", e)))?;
            request = request.header("Authorization", header_value);
        }

        let response = request
            .send()
            .map_err(|e| ConfigError::LoadError(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConfigError::LoadError(format!(
                "HTTP request failed with status {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json()
            .map_err(|e| ConfigError::DeserializationError(format!("Failed to parse JSON: {}", e)))
    }
}

impl Default for HttpSourceFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSourceFactory for HttpSourceFactory {
    fn name(&self) -> String {
        format!("http:{}", self.url_key)
    }

    fn config_sources(
        &self,
        context: &ConfigSourceContext<'_>,
    ) -> Result<Vec<Box<dyn ConfigSource>>> {
        let Some(url) = context.get_value(&self.url_key)? else {
            return Ok(Vec::new());
        };
        let token = context.get_value(REMOTE_TOKEN_KEY)?;

        let json = self
            .fetch(url.value(), token.as_ref().map(|t| t.value()))
            .map_err(|e| ConfigError::factory(self.name(), e))?;
        let properties = json_to_properties(json).map_err(|e| ConfigError::factory(self.name(), e))?;

        tracing::debug!(url = url.value(), properties = properties.len(), "fetched remote configuration");
        let source = remote_source(url.value(), properties, self.ordinal)?;
        Ok(vec![Box::new(source)])
    }
}

/// Wrap fetched properties in a source. A document that sets `config_ordinal`
/// keeps its own ordinal; otherwise `ordinal` applies.
fn remote_source(
    url: &str,
    properties: BTreeMap<String, String>,
    ordinal: i32,
) -> Result<MapSource> {
    let declared = properties.contains_key(CONFIG_ORDINAL);
    let source = MapSource::from_properties(format!("http:{}", url), properties)?
        .with_location(url.to_string());
    Ok(if declared {
        source
    } else {
        source.with_ordinal(ordinal)
    })
}

/// Flatten a JSON object into dotted property names.
pub(crate) fn json_to_properties(json: JsonValue) -> Result<BTreeMap<String, String>> {
    match json {
        JsonValue::Object(map) => {
            let mut properties = BTreeMap::new();
            for (key, value) in map {
                flatten(&key, value, &mut properties);
            }
            Ok(properties)
        }
        _ => Err(ConfigError::DeserializationError(
            "Expected JSON object at root level".to_string(),
        )),
    }
}

fn flatten(key: &str, value: JsonValue, out: &mut BTreeMap<String, String>) {
    match value {
        JsonValue::Null => {}
        JsonValue::Bool(b) => {
            out.insert(key.to_string(), b.to_string());
        }
        JsonValue::Number(n) => {
            out.insert(key.to_string(), n.to_string());
        }
        JsonValue::String(s) => {
            out.insert(key.to_string(), s);
        }
        JsonValue::Array(items) if items.iter().all(|i| !i.is_object() && !i.is_array()) => {
            let joined = items
                .into_iter()
                .filter_map(|item| match item {
                    JsonValue::Null => None,
                    JsonValue::String(s) => Some(escape_element(&s)),
                    other => Some(other.to_string()),
                })
                .collect::<Vec<_>>()
                .join(",");
            out.insert(key.to_string(), joined);
        }
        JsonValue::Array(items) => {
            for (index, item) in items.into_iter().enumerate() {
                flatten(&format!("{}[{}]", key, index), item, out);
            }
        }
        JsonValue::Object(map) => {
            for (child, value) in map {
                flatten(&format!("{}.{}", key, child), value, out);
            }
        }
    }
}
