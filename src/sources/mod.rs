//! Configuration source implementations.

mod config_source;
mod env;
mod factory;
mod file;
mod locations;
mod map;

#[cfg(feature = "remote")]
mod remote;

pub use config_source::{CONFIG_ORDINAL, ConfigSource, DEFAULT_ORDINAL};
pub use env::EnvSource;
pub use factory::{ConfigSourceContext, ConfigSourceFactory, DEFAULT_FACTORY_PRIORITY};
pub use file::FileSource;
pub use locations::{LOCATIONS_KEY, LocationsSourceFactory};
pub use map::{DefaultValuesSource, MapSource};

#[cfg(feature = "remote")]
pub use remote::{HttpSourceFactory, REMOTE_TOKEN_KEY, REMOTE_URL_KEY};
