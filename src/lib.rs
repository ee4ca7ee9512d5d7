//! # ordinal-config
//!
//! Layered configuration resolution: ordinal-ranked sources, source factories,
//! an interceptor chain and typed converters.
//!
//! ## Overview
//!
//! `ordinal-config` answers "what is the value of property `x`?" by consulting
//! a set of configuration sources:
//! - Sources are ranked by ordinal; the highest ordinal that defines a property wins
//! - Source factories build further sources from configuration already known
//! - Interceptors wrap every lookup (profiles, `${...}` expressions, relocation)
//! - Converters turn raw strings into typed values, selected by priority
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ordinal_config::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct DatabaseConfig {
//!     url: String,
//!     pool_size: u32,
//! }
//!
//! # fn example() -> ordinal_config::error::Result<()> {
//! // Defaults < files < environment variables
//! let config = Config::builder()
//!     .with_defaults([("database.pool_size", "8")])
//!     .with_file("config/application.yaml")
//!     .with_env()
//!     .build()?;
//!
//! let port: u16 = config.get_value("server.port")?;
//! let hosts: Vec<String> = config.get_values("server.hosts")?;
//! let database: DatabaseConfig = config.mapping("database")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Default ordinals
//!
//! | Source                 | Ordinal         |
//! |------------------------|-----------------|
//! | Default values         | `i32::MIN`      |
//! | Files                  | 100, 110, 120.. |
//! | Remote HTTP            | 250             |
//! | Environment variables  | 300             |
//!
//! Any source can declare its own ordinal with the `config_ordinal` property.
//!
//! ## Feature Flags
//!
//! - `validation` (default): the [`Validate`](core::Validate) trait and
//!   `Config::validated_mapping`
//! - `remote`: [`HttpSourceFactory`](sources::HttpSourceFactory) fetching JSON over HTTP
//! - `metrics`: OpenTelemetry lookup metrics
//!
//! ```toml
//! [dependencies]
//! ordinal-config = { version = "0.1", features = ["remote"] }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod converters;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interceptors;
pub mod sources;

#[cfg(feature = "metrics")]
pub mod metrics;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{Config, ConfigBuilder, ConfigValue, InitStage};
    pub use crate::error::{ConfigError, ConversionError, Result, ValidationError};

    #[cfg(feature = "validation")]
    pub use crate::core::Validate;
}
