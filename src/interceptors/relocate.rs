//! Renamed and fallback property names.

use super::{ConfigSourceInterceptor, InterceptorContext};
use crate::core::ConfigValue;
use crate::error::Result;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

type NameMapping = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

fn from_map(map: HashMap<String, String>) -> NameMapping {
    Arc::new(move |name: &str| map.get(name).cloned())
}

/// Looks a property up under a new name first, then under the requested one.
///
/// Use this when a property has been renamed: requests for the old name see the
/// value stored under the new name when there is one.
///
/// # Examples
///
/// ```rust
/// use ordinal_config::interceptors::RelocateInterceptor;
/// use std::collections::HashMap;
///
/// let relocate = RelocateInterceptor::from_map(HashMap::from([(
///     "db.url".to_string(),
///     "datasource.url".to_string(),
/// )]));
/// ```
pub struct RelocateInterceptor {
    mapping: NameMapping,
}

impl RelocateInterceptor {
    /// Relocate names using a function. `None` leaves a name untouched.
    pub fn new<F>(mapping: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            mapping: Arc::new(mapping),
        }
    }

    /// Relocate names using a fixed old-name to new-name table.
    pub fn from_map(map: HashMap<String, String>) -> Self {
        Self {
            mapping: from_map(map),
        }
    }
}

impl ConfigSourceInterceptor for RelocateInterceptor {
    fn get_value(
        &self,
        context: &dyn InterceptorContext,
        name: &str,
    ) -> Result<Option<ConfigValue>> {
        if let Some(relocated) = (self.mapping)(name).filter(|n| n != name) {
            if let Some(value) = context.proceed(&relocated)? {
                return Ok(Some(value));
            }
        }
        context.proceed(name)
    }

    fn iterate_names(&self, context: &dyn InterceptorContext) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for name in context.iterate_names() {
            if let Some(relocated) = (self.mapping)(&name) {
                names.insert(relocated);
            }
            names.insert(name);
        }
        names
    }
}

/// Looks a property up under the requested name, then under a fallback name.
pub struct FallbackInterceptor {
    mapping: NameMapping,
}

impl FallbackInterceptor {
    /// Fall back using a function. `None` means there is no fallback.
    pub fn new<F>(mapping: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            mapping: Arc::new(mapping),
        }
    }

    /// Fall back using a fixed name to fallback-name table.
    pub fn from_map(map: HashMap<String, String>) -> Self {
        Self {
            mapping: from_map(map),
        }
    }
}

impl ConfigSourceInterceptor for FallbackInterceptor {
    fn get_value(
        &self,
        context: &dyn InterceptorContext,
        name: &str,
    ) -> Result<Option<ConfigValue>> {
        if let Some(value) = context.proceed(name)? {
            return Ok(Some(value));
        }
        match (self.mapping)(name).filter(|n| n != name) {
            Some(fallback) => context.proceed(&fallback),
            None => Ok(None),
        }
    }
}
