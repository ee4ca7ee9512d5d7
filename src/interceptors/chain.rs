//! Chain execution and assembly.

use super::{ConfigSourceInterceptor, ConfigSourceInterceptorFactory, InterceptorContext};
use crate::core::{ConfigValue, SourceRegistry};
use crate::error::Result;
use std::collections::BTreeSet;
use std::sync::Arc;

/// What was registered with the builder: a ready interceptor or a factory.
#[derive(Clone)]
pub(crate) enum InterceptorKind {
    Instance(Arc<dyn ConfigSourceInterceptor>),
    Factory(Arc<dyn ConfigSourceInterceptorFactory>),
}

/// A registered interceptor awaiting assembly.
#[derive(Clone)]
pub(crate) struct InterceptorEntry {
    pub(crate) priority: i32,
    pub(crate) kind: InterceptorKind,
}

/// An assembled interceptor with its priority.
pub(crate) type Ranked = (i32, Arc<dyn ConfigSourceInterceptor>);

/// Interceptors in execution order (head first) in front of a source registry.
#[derive(Clone)]
pub(crate) struct InterceptorChain {
    interceptors: Vec<Ranked>,
    sources: Arc<SourceRegistry>,
}

impl InterceptorChain {
    pub(crate) fn new(interceptors: Vec<Ranked>, sources: Arc<SourceRegistry>) -> Self {
        Self {
            interceptors,
            sources,
        }
    }

    pub(crate) fn head(&self) -> ChainContext<'_> {
        ChainContext {
            chain: self,
            index: 0,
        }
    }

    pub(crate) fn get_value(&self, name: &str) -> Result<Option<ConfigValue>> {
        self.head().proceed(name)
    }

    pub(crate) fn iterate_names(&self) -> BTreeSet<String> {
        self.head().iterate_names()
    }

    pub(crate) fn sources(&self) -> &Arc<SourceRegistry> {
        &self.sources
    }

    pub(crate) fn interceptors(&self) -> &[Ranked] {
        &self.interceptors
    }

    /// Same interceptors in front of a different registry.
    pub(crate) fn with_sources(&self, sources: Arc<SourceRegistry>) -> Self {
        Self {
            interceptors: self.interceptors.clone(),
            sources,
        }
    }
}

/// Position inside a chain handed to interceptors.
pub(crate) struct ChainContext<'a> {
    chain: &'a InterceptorChain,
    index: usize,
}

impl ChainContext<'_> {
    fn next(&self) -> Self {
        ChainContext {
            chain: self.chain,
            index: self.index + 1,
        }
    }
}

impl InterceptorContext for ChainContext<'_> {
    fn proceed(&self, name: &str) -> Result<Option<ConfigValue>> {
        match self.chain.interceptors.get(self.index) {
            Some((_, interceptor)) => interceptor.get_value(&self.next(), name),
            None => Ok(self.chain.sources.lookup(name)),
        }
    }

    fn restart(&self, name: &str) -> Result<Option<ConfigValue>> {
        self.chain.head().proceed(name)
    }

    fn iterate_names(&self) -> BTreeSet<String> {
        match self.chain.interceptors.get(self.index) {
            Some((_, interceptor)) => interceptor.iterate_names(&self.next()),
            None => self.chain.sources.property_names(),
        }
    }
}

/// Order registered interceptors and run interceptor factories.
///
/// The chain is built from the lowest priority outward, so each factory sees
/// every interceptor that will run after the one it builds. The result is in
/// execution order: highest priority first, ties in registration order.
pub(crate) fn assemble(
    entries: Vec<InterceptorEntry>,
    sources: &Arc<SourceRegistry>,
) -> Result<Vec<Ranked>> {
    let mut indexed: Vec<(usize, InterceptorEntry)> = entries.into_iter().enumerate().collect();
    // Innermost first: ascending priority, later registrations deeper.
    indexed.sort_by(|(ia, a), (ib, b)| a.priority.cmp(&b.priority).then(ib.cmp(ia)));

    let mut built: Vec<Ranked> = Vec::with_capacity(indexed.len());
    for (_, entry) in indexed {
        let interceptor = match entry.kind {
            InterceptorKind::Instance(interceptor) => interceptor,
            InterceptorKind::Factory(factory) => {
                let inner = InterceptorChain::new(
                    built.iter().rev().cloned().collect(),
                    Arc::clone(sources),
                );
                factory.interceptor(&inner.head())?
            }
        };
        built.push((entry.priority, interceptor));
    }

    built.reverse();
    tracing::debug!(
        interceptors = built.len(),
        priorities = ?built.iter().map(|(p, _)| *p).collect::<Vec<_>>(),
        "assembled interceptor chain"
    );
    Ok(built)
}

/// Insert an interceptor at its priority position, after existing equal priorities.
pub(crate) fn insert_ranked(chain: &mut Vec<Ranked>, ranked: Ranked) {
    let position = chain
        .iter()
        .position(|(priority, _)| *priority < ranked.0)
        .unwrap_or(chain.len());
    chain.insert(position, ranked);
}
