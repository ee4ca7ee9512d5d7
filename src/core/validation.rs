//! Validation of mapped configuration types.

use crate::error::ValidationError;

/// Checks run on a type after it is mapped from a property prefix.
///
/// [`Config::validated_mapping`](crate::core::Config::validated_mapping) maps
/// the properties under a prefix into `T` and then calls [`validate`]. A
/// failure is reported as `ConfigError::ValidationError`. The checks see the
/// final resolved values, after profiles, expressions and relocations.
///
/// [`validate`]: Validate::validate
///
/// # Examples
///
/// ```rust
/// use ordinal_config::prelude::*;
/// use ordinal_config::sources::MapSource;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Pool {
///     min: u32,
///     max: u32,
/// }
///
/// impl Validate for Pool {
///     fn validate(&self) -> std::result::Result<(), ValidationError> {
///         let mut problems = Vec::new();
///         if self.max == 0 {
///             problems.push(ValidationError::invalid_field("max", "must be positive"));
///         }
///         if self.min > self.max {
///             problems.push(ValidationError::invalid_field("min", "exceeds max"));
///         }
///         match problems.len() {
///             0 => Ok(()),
///             1 => Err(problems.remove(0)),
///             _ => Err(ValidationError::Multiple(problems)),
///         }
///     }
/// }
///
/// # fn example() -> Result<()> {
/// let config = Config::builder()
///     .with_source(
///         MapSource::new("app")
///             .with_property("datasource.pool.min", "8")
///             .with_property("datasource.pool.max", "4"),
///     )
///     .build()?;
///
/// assert!(matches!(
///     config.validated_mapping::<Pool>("datasource.pool"),
///     Err(ConfigError::ValidationError(_))
/// ));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub trait Validate {
    /// Check the mapped value.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, or `ValidationError::Multiple`.
    fn validate(&self) -> Result<(), ValidationError>;
}
