//! Core configuration types.

mod builder;
mod config;
mod mapping;
mod provider;
mod registry;
mod value;

#[cfg(feature = "validation")]
mod validation;

pub use builder::{ConfigBuilder, LOG_VALUES_KEY};
pub use config::Config;
pub use provider::{current, install, release};
pub use registry::SourceRegistry;
pub use value::ConfigValue;

#[cfg(feature = "validation")]
pub use validation::Validate;

/// Property naming the active profiles (comma-separated).
pub const PROFILE_KEY: &str = "config.profile";

/// Startup phase a configuration is built for.
///
/// Sources and factories that are not static-init safe are left out of a
/// configuration built for [`InitStage::Static`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitStage {
    /// Early initialization: only static-init safe sources.
    Static,
    /// Full initialization: every source.
    #[default]
    Runtime,
}
