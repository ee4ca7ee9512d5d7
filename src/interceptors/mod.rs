//! Interceptors wrapping configuration lookups.
//!
//! Every lookup made through a [`Config`](crate::core::Config) passes through an
//! ordered chain of interceptors before reaching the sources. Each interceptor
//! may call [`InterceptorContext::proceed`] to continue down the chain, return a
//! value directly, or rewrite the value coming back.
//!
//! Interceptors with a higher priority run first. Interceptors registered with
//! the same priority run in registration order.
//!
//! # Examples
//!
//! ```rust
//! use ordinal_config::prelude::*;
//! use ordinal_config::interceptors::from_fn;
//! use ordinal_config::sources::MapSource;
//!
//! # fn example() -> Result<()> {
//! let config = Config::builder()
//!     .with_source(MapSource::new("app").with_property("greeting", "hello"))
//!     .with_interceptor(
//!         100,
//!         from_fn(|context, name| {
//!             Ok(context
//!                 .proceed(name)?
//!                 .map(|v| {
//!                     let upper = v.value().to_uppercase();
//!                     v.with_value(upper)
//!                 }))
//!         }),
//!     )
//!     .build()?;
//!
//! assert_eq!(config.get_value::<String>("greeting")?, "HELLO");
//! # Ok(())
//! # }
//! ```

mod caching;
pub(crate) mod chain;
mod expression;
mod logging;
mod profile;
mod relocate;

pub use caching::CachingInterceptor;
pub use expression::ExpressionInterceptor;
pub use logging::LoggingInterceptor;
pub use profile::ProfileInterceptor;
pub use relocate::{FallbackInterceptor, RelocateInterceptor};

use crate::core::ConfigValue;
use crate::error::Result;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Well-known interceptor priorities.
pub mod priorities {
    /// Priority of an interceptor factory that does not declare one.
    pub const DEFAULT: i32 = 100;
    /// Interceptors that should see values closest to the sources.
    pub const PLATFORM: i32 = 1000;
    /// Interceptors shipped by libraries (profiles, expressions, relocations).
    pub const LIBRARY: i32 = 3000;
    /// Interceptors registered by the application.
    pub const APPLICATION: i32 = 5000;
}

/// Access to the rest of the interceptor chain.
pub trait InterceptorContext {
    /// Continue the lookup with the next interceptor, or the sources if this is
    /// the last one.
    fn proceed(&self, name: &str) -> Result<Option<ConfigValue>>;

    /// Start a new lookup from the head of the chain.
    fn restart(&self, name: &str) -> Result<Option<ConfigValue>>;

    /// Property names as seen by the rest of the chain.
    fn iterate_names(&self) -> BTreeSet<String>;
}

/// A node in the lookup chain.
///
/// Interceptors are shared across threads. Any mutable state they keep must be
/// synchronized by the interceptor itself.
pub trait ConfigSourceInterceptor: Send + Sync {
    /// Resolve `name`, usually by calling `context.proceed(name)`.
    ///
    /// # Errors
    ///
    /// Errors abort the lookup and are returned to the caller unchanged.
    fn get_value(&self, context: &dyn InterceptorContext, name: &str)
    -> Result<Option<ConfigValue>>;

    /// Property names visible through this interceptor.
    fn iterate_names(&self, context: &dyn InterceptorContext) -> BTreeSet<String> {
        context.iterate_names()
    }
}

/// Builds an interceptor with access to the chain assembled so far.
///
/// The context handed to [`interceptor`](Self::interceptor) covers every
/// interceptor with a lower priority and the static configuration sources, so a
/// factory can read settings that configure the interceptor it builds.
pub trait ConfigSourceInterceptorFactory: Send + Sync {
    /// Priority of the interceptor this factory builds.
    fn priority(&self) -> i32 {
        priorities::DEFAULT
    }

    /// Build the interceptor.
    ///
    /// # Errors
    ///
    /// An error aborts building the configuration.
    fn interceptor(
        &self,
        context: &dyn InterceptorContext,
    ) -> Result<Arc<dyn ConfigSourceInterceptor>>;
}

/// An interceptor backed by a closure. Created with [`from_fn`].
pub struct FnInterceptor<F> {
    f: F,
}

/// Wrap a closure as an interceptor.
pub fn from_fn<F>(f: F) -> FnInterceptor<F>
where
    F: Fn(&dyn InterceptorContext, &str) -> Result<Option<ConfigValue>> + Send + Sync,
{
    FnInterceptor { f }
}

impl<F> ConfigSourceInterceptor for FnInterceptor<F>
where
    F: Fn(&dyn InterceptorContext, &str) -> Result<Option<ConfigValue>> + Send + Sync,
{
    fn get_value(
        &self,
        context: &dyn InterceptorContext,
        name: &str,
    ) -> Result<Option<ConfigValue>> {
        (self.f)(context, name)
    }
}
