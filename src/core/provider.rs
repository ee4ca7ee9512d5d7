//! Process-wide configuration slot.

use crate::core::Config;
use crate::error::{ConfigError, Result};
use arc_swap::ArcSwapOption;
use std::sync::Arc;

static CURRENT: ArcSwapOption<Config> = ArcSwapOption::const_empty();

/// Install `config` as the process-wide configuration.
///
/// Readers holding the previous configuration keep using it; new calls to
/// [`current`] see the new one. Returns the configuration that was replaced.
///
/// # Examples
///
/// ```rust
/// use ordinal_config::prelude::*;
/// use ordinal_config::core::{current, install, release};
///
/// # fn example() -> Result<()> {
/// install(Config::builder().build()?);
/// let config = current()?;
/// assert!(config.config_sources().is_empty());
/// release();
/// # Ok(())
/// # }
/// ```
pub fn install(config: Config) -> Option<Arc<Config>> {
    let previous = CURRENT.swap(Some(Arc::new(config)));
    tracing::debug!(replaced = previous.is_some(), "installed process-wide configuration");
    previous
}

/// The process-wide configuration.
///
/// # Errors
///
/// Returns `ConfigError::NotInstalled` if nothing has been installed.
pub fn current() -> Result<Arc<Config>> {
    CURRENT.load_full().ok_or(ConfigError::NotInstalled)
}

/// Remove the process-wide configuration, returning it.
pub fn release() -> Option<Arc<Config>> {
    CURRENT.swap(None)
}
