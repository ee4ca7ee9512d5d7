//! Profile-aware lookups.

use super::{ConfigSourceInterceptor, InterceptorContext};
use crate::core::ConfigValue;
use crate::error::Result;
use std::collections::BTreeSet;

/// Resolves profile-specific properties such as `%dev.server.port`.
///
/// For every active profile (the last one listed takes precedence), the
/// interceptor looks up `%{profile}.{name}`. A profile value is used when its
/// source ordinal is at least that of the plain value, so a profile property in
/// a low-ordinal file does not shadow a plain override from the environment.
pub struct ProfileInterceptor {
    profiles: Vec<String>,
}

impl ProfileInterceptor {
    /// Create an interceptor for the given active profiles.
    pub fn new<I, S>(profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            profiles: profiles.into_iter().map(Into::into).collect(),
        }
    }

    /// The active profiles, in activation order.
    pub fn profiles(&self) -> &[String] {
        &self.profiles
    }

    fn is_active(&self, profile: &str) -> bool {
        self.profiles.iter().any(|p| p == profile)
    }
}

/// Split `%profile.name` into its profile and name.
fn split_profile(name: &str) -> Option<(&str, &str)> {
    name.strip_prefix('%')?.split_once('.')
}

impl ConfigSourceInterceptor for ProfileInterceptor {
    fn get_value(
        &self,
        context: &dyn InterceptorContext,
        name: &str,
    ) -> Result<Option<ConfigValue>> {
        if name.starts_with('%') {
            return context.proceed(name);
        }

        let plain = context.proceed(name)?;
        for profile in self.profiles.iter().rev() {
            let Some(value) = context.proceed(&format!("%{}.{}", profile, name))? else {
                continue;
            };
            let wins = plain
                .as_ref()
                .is_none_or(|p| value.source_ordinal() >= p.source_ordinal());
            if wins {
                return Ok(Some(value.with_name(name).with_profile(profile.clone())));
            }
        }

        Ok(plain)
    }

    fn iterate_names(&self, context: &dyn InterceptorContext) -> BTreeSet<String> {
        context
            .iterate_names()
            .into_iter()
            .filter_map(|name| match split_profile(&name) {
                Some((profile, rest)) if self.is_active(profile) => Some(rest.to_string()),
                Some(_) => None,
                None if name.starts_with('%') => None,
                None => Some(name),
            })
            .collect()
    }
}
