//! Property-based tests for member lookup over generated class chains.
//!
//! Each generated program is a single inheritance chain `C0 : C1 : ... : Cn`
//! whose classes declare public fields and methods drawn from a small pool
//! of names. Lookup results are checked against a direct model of hiding:
//! walking from the most derived class, a field stops the walk, methods keep
//! collecting overloads from the bases.
#![cfg(feature = "proptest")]

use proptest::prelude::*;

use binder::hir::{
    Accessibility, AccessContext, LookupCache, LookupRequest, MemberDecl, MemberLookup, SymbolGraph,
    SymbolGraphBuilder, SymbolId, TypeDecl, TypeKind,
};

const NAMES: [&str; 3] = ["Alpha", "Beta", "Gamma"];

// ============================================================================
// PROPTEST STRATEGIES
// ============================================================================

/// One declared member: an index into [`NAMES`] and whether it is a method.
fn arb_member() -> impl Strategy<Value = (usize, bool)> {
    (0..NAMES.len(), any::<bool>())
}

/// Levels of the chain, most derived first.
fn arb_chain() -> impl Strategy<Value = Vec<Vec<(usize, bool)>>> {
    prop::collection::vec(prop::collection::vec(arb_member(), 0..4), 1..6)
}

// ============================================================================
// HELPERS
// ============================================================================

struct Chain {
    graph: SymbolGraph,
    most_derived: SymbolId,
    /// Declared members per level, most derived first: (symbol, name, is_method).
    levels: Vec<Vec<(SymbolId, &'static str, bool)>>,
}

fn build_chain(declared_levels: &[Vec<(usize, bool)>]) -> Chain {
    let mut builder = SymbolGraphBuilder::new();
    let global = builder.global_namespace();
    let int = builder.special(binder::hir::SpecialType::Int32);

    let mut classes = Vec::new();
    let mut levels = Vec::new();
    for (depth, members) in declared_levels.iter().enumerate() {
        let class = builder
            .add_type(TypeDecl::new(TypeKind::Class, global, format!("C{depth}")).with_accessibility(Accessibility::Public))
            .unwrap();
        let mut declared = Vec::new();
        for &(name, is_method) in members {
            let decl = MemberDecl::new(class, NAMES[name]).with_accessibility(Accessibility::Public);
            let symbol = if is_method {
                builder.add_method(decl).unwrap()
            } else {
                builder.add_field(decl, int).unwrap()
            };
            declared.push((symbol, NAMES[name], is_method));
        }
        classes.push(class);
        levels.push(declared);
    }
    for pair in classes.windows(2) {
        builder.set_base_type(pair[0], pair[1]).unwrap();
    }

    Chain {
        graph: builder.build().unwrap(),
        most_derived: classes[0],
        levels,
    }
}

/// Visible symbols for `name` when not invoked.
fn expected_visible(chain: &Chain, name: &str) -> Vec<SymbolId> {
    let mut visible: Vec<(SymbolId, bool)> = Vec::new();
    for level in &chain.levels {
        let here = level.iter().filter(|(_, n, _)| *n == name);
        if visible.iter().any(|&(_, is_method)| !is_method) {
            break;
        }
        if visible.is_empty() {
            visible.extend(here.map(|&(s, _, m)| (s, m)));
        } else {
            visible.extend(here.filter(|(_, _, m)| *m).map(|&(s, _, m)| (s, m)));
        }
    }
    visible.into_iter().map(|(s, _)| s).collect()
}

/// Visible symbols for `name` when invoked: every method along the chain.
fn expected_invoked(chain: &Chain, name: &str) -> Vec<SymbolId> {
    chain
        .levels
        .iter()
        .flatten()
        .filter(|(_, n, m)| *n == name && *m)
        .map(|&(s, _, _)| s)
        .collect()
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_lookup_matches_hiding_model(declared in arb_chain()) {
        let chain = build_chain(&declared);
        let lookup = MemberLookup::new(&chain.graph).with_context(AccessContext::default());
        for name in NAMES {
            let result = lookup.lookup_member(chain.most_derived, name, 0, false).unwrap();
            prop_assert_eq!(result.symbols(), expected_visible(&chain, name));

            let invoked = lookup.lookup_member(chain.most_derived, name, 0, true).unwrap();
            let methods = expected_invoked(&chain, name);
            prop_assert_eq!(invoked.is_viable(), !methods.is_empty());
            if invoked.is_viable() {
                prop_assert_eq!(invoked.symbols(), methods);
            }
        }
    }

    #[test]
    fn prop_viable_non_method_is_alone_or_same_level(declared in arb_chain()) {
        let chain = build_chain(&declared);
        let lookup = MemberLookup::new(&chain.graph);
        for name in NAMES {
            let result = lookup.lookup_member(chain.most_derived, name, 0, false).unwrap();
            let symbols = result.symbols();
            let containers: Vec<_> = symbols
                .iter()
                .filter(|&&s| !chain.graph.is_method(s))
                .map(|&s| chain.graph.container(s))
                .collect();
            if let Some(first) = containers.first() {
                prop_assert!(containers.iter().all(|c| c == first));
                prop_assert!(symbols.iter().all(|&s| chain.graph.container(s) == *first));
            }
        }
    }

    #[test]
    fn prop_cache_agrees_with_direct_lookup(declared in arb_chain()) {
        let chain = build_chain(&declared);
        let cache = LookupCache::new(&chain.graph);
        let requests: Vec<LookupRequest> = NAMES
            .iter()
            .flat_map(|&name| {
                let request = LookupRequest::new(chain.most_derived, name, AccessContext::default());
                [request.clone(), request.invoked()]
            })
            .collect();

        let batch = cache.lookup_batch(&requests);
        for (request, cached) in requests.iter().zip(batch) {
            let direct = MemberLookup::new(&chain.graph)
                .lookup_member(request.scope, &request.name, request.arity, request.invoked)
                .unwrap();
            prop_assert_eq!(cached.unwrap(), direct.clone());
            prop_assert_eq!(cache.lookup_member(request).unwrap(), direct);
        }
    }
}
