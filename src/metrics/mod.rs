//! Built-in metrics for configuration lookups.
//!
//! Provides OpenTelemetry metrics tracking:
//! - Lookups and misses
//! - Lookup duration
//! - Conversion failures
//!
//! # Examples
//!
//! ```rust,no_run
//! use ordinal_config::prelude::*;
//! use opentelemetry::global;
//!
//! # fn example() -> Result<()> {
//! let meter = global::meter("my-app");
//!
//! let config = Config::builder()
//!     .with_file("config.yaml")
//!     .with_metrics(meter)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod config_metrics;

pub use config_metrics::ConfigMetrics;
