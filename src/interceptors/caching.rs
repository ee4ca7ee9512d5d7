//! Memoization of resolved lookups.

use super::{ConfigSourceInterceptor, InterceptorContext};
use crate::core::ConfigValue;
use crate::error::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Caches the outcome of each lookup, including misses.
///
/// Sources never change once built, so a resolved value stays valid for the
/// lifetime of the [`Config`](crate::core::Config). Errors are not cached.
#[derive(Debug, Default)]
pub struct CachingInterceptor {
    cache: RwLock<HashMap<String, Option<ConfigValue>>>,
}

impl CachingInterceptor {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached lookups.
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

impl ConfigSourceInterceptor for CachingInterceptor {
    fn get_value(
        &self,
        context: &dyn InterceptorContext,
        name: &str,
    ) -> Result<Option<ConfigValue>> {
        if let Some(hit) = self.cache.read().get(name) {
            return Ok(hit.clone());
        }

        let resolved = context.proceed(name)?;
        self.cache
            .write()
            .entry(name.to_string())
            .or_insert_with(|| resolved.clone());
        Ok(resolved)
    }
}
