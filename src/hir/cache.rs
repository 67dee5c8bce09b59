//! Memoized and batched member lookups.
//!
//! Lookup is a pure function of its inputs, so results can be cached for the
//! lifetime of a graph and independent requests can run in parallel.

use parking_lot::RwLock;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::accessibility::AccessContext;
use super::ids::SymbolId;
use super::lookup::{BindError, LookupResult, MemberLookup};
use super::symbols::SymbolGraph;

/// One member lookup request.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LookupRequest {
    pub scope: SymbolId,
    pub name: SmolStr,
    pub arity: usize,
    pub invoked: bool,
    pub context: AccessContext,
}

impl LookupRequest {
    pub fn new(scope: SymbolId, name: impl Into<SmolStr>, context: AccessContext) -> Self {
        Self {
            scope,
            name: name.into(),
            arity: 0,
            invoked: false,
            context,
        }
    }

    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    pub fn invoked(mut self) -> Self {
        self.invoked = true;
        self
    }
}

/// Thread-safe cache of [`MemberLookup::lookup_member`] results for one graph.
pub struct LookupCache<'g> {
    graph: &'g SymbolGraph,
    entries: RwLock<FxHashMap<LookupRequest, LookupResult>>,
}

impl<'g> LookupCache<'g> {
    pub fn new(graph: &'g SymbolGraph) -> Self {
        Self {
            graph,
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn graph(&self) -> &'g SymbolGraph {
        self.graph
    }

    /// Cached member lookup. Hard failures are returned but never cached.
    pub fn lookup_member(&self, request: &LookupRequest) -> Result<LookupResult, BindError> {
        if let Some(hit) = self.entries.read().get(request) {
            return Ok(hit.clone());
        }
        let result = MemberLookup::new(self.graph)
            .with_context(request.context)
            .lookup_member(request.scope, &request.name, request.arity, request.invoked)?;
        self.entries.write().insert(request.clone(), result.clone());
        Ok(result)
    }

    /// Run independent lookups on the rayon pool; results are in request order.
    pub fn lookup_batch(&self, requests: &[LookupRequest]) -> Vec<Result<LookupResult, BindError>> {
        tracing::debug!("running {} lookups in parallel", requests.len());
        requests
            .par_iter()
            .map(|request| self.lookup_member(request))
            .collect()
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl std::fmt::Debug for LookupCache<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupCache")
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::{Accessibility, MemberDecl, SymbolGraphBuilder, TypeDecl, TypeKind};

    #[test]
    fn test_cache_hits_match_direct_lookup() {
        let mut builder = SymbolGraphBuilder::new();
        let global = builder.global_namespace();
        let c = builder.add_type(TypeDecl::new(TypeKind::Class, global, "C")).unwrap();
        builder
            .add_method(MemberDecl::new(c, "Run").with_accessibility(Accessibility::Public))
            .unwrap();
        let graph = builder.build().unwrap();
        let cache = LookupCache::new(&graph);
        let request = LookupRequest::new(c, "Run", AccessContext::default()).invoked();

        let first = cache.lookup_member(&request).unwrap();
        let second = cache.lookup_member(&request).unwrap();
        let direct = MemberLookup::new(&graph).lookup_member(c, "Run", 0, true).unwrap();

        assert_eq!(first, direct);
        assert_eq!(second, direct);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_errors_are_not_cached() {
        let graph = SymbolGraphBuilder::new().build().unwrap();
        let cache = LookupCache::new(&graph);
        let request = LookupRequest::new(graph.global_namespace(), "ToString", AccessContext::default());

        assert!(cache.lookup_member(&request).is_err());
        assert!(cache.is_empty());
    }
}
