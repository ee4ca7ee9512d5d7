//! Resolution logging.

use super::{ConfigSourceInterceptor, InterceptorContext};
use crate::core::ConfigValue;
use crate::error::Result;
use std::collections::BTreeSet;

const MASK: &str = "***";

/// Logs every lookup at debug level through `tracing`.
///
/// Values of secret keys are replaced by `***` in the log output; the value
/// returned to the caller is untouched. The interceptor usually sits below the
/// profile interceptor, so it also masks `%{profile}.{key}` for every active
/// profile.
#[derive(Debug, Default)]
pub struct LoggingInterceptor {
    secret_keys: BTreeSet<String>,
    profiles: Vec<String>,
}

impl LoggingInterceptor {
    /// Create a logging interceptor with no secret keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mask the values of the given keys.
    pub fn with_secret_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secret_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Also mask the profile-prefixed names of secret keys for these profiles.
    pub fn with_profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profiles.extend(profiles.into_iter().map(Into::into));
        self
    }

    fn is_secret(&self, name: &str) -> bool {
        if self.secret_keys.contains(name) {
            return true;
        }
        self.profiles.iter().any(|profile| {
            name.strip_prefix('%')
                .and_then(|rest| rest.strip_prefix(profile.as_str()))
                .and_then(|rest| rest.strip_prefix('.'))
                .is_some_and(|key| self.secret_keys.contains(key))
        })
    }

    /// The value as it should appear in logs.
    pub fn loggable<'a>(&self, name: &str, value: &'a str) -> &'a str {
        if self.is_secret(name) { MASK } else { value }
    }
}

impl ConfigSourceInterceptor for LoggingInterceptor {
    fn get_value(
        &self,
        context: &dyn InterceptorContext,
        name: &str,
    ) -> Result<Option<ConfigValue>> {
        let resolved = context.proceed(name)?;
        match &resolved {
            Some(value) => tracing::debug!(
                property = name,
                value = self.loggable(name, value.value()),
                source = value.source_name(),
                ordinal = value.source_ordinal(),
                location = value.location().unwrap_or("-"),
                "resolved configuration property"
            ),
            None => tracing::debug!(property = name, "configuration property not found"),
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_values_are_masked() {
        let interceptor = LoggingInterceptor::new().with_secret_keys(["db.password"]);
        assert_eq!(interceptor.loggable("db.password", "hunter2"), "***");
        assert_eq!(interceptor.loggable("db.user", "admin"), "admin");
    }

    #[test]
    fn test_profile_prefixed_secrets_are_masked() {
        let interceptor = LoggingInterceptor::new()
            .with_secret_keys(["db.password"])
            .with_profiles(["dev"]);
        assert_eq!(interceptor.loggable("%dev.db.password", "hunter2"), "***");
        assert_eq!(interceptor.loggable("%prod.db.password", "x"), "x");
        assert_eq!(interceptor.loggable("%devdb.password", "x"), "x");
        assert_eq!(interceptor.loggable("%dev.db.user", "admin"), "admin");
    }
}
