//! Accessibility checking.
//!
//! A symbol is accessible from an [`AccessContext`] when it and every type
//! containing it are accessible. Declared accessibility is evaluated against
//! original (unconstructed) definitions so type arguments never change what
//! is visible.

use super::ids::{AssemblyId, SymbolId};
use super::symbols::{Accessibility, SymbolData, SymbolGraph, TypeKind};

/// Where an access happens: the caller's assembly and, inside a type body,
/// the innermost enclosing type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AccessContext {
    pub assembly: AssemblyId,
    pub within_type: Option<SymbolId>,
}

impl AccessContext {
    /// Context at namespace level of `assembly`.
    pub fn new(assembly: AssemblyId) -> Self {
        Self {
            assembly,
            within_type: None,
        }
    }

    /// Set the enclosing type.
    pub fn with_type(mut self, ty: SymbolId) -> Self {
        self.within_type = Some(ty);
        self
    }
}

impl Default for AccessContext {
    fn default() -> Self {
        Self::new(AssemblyId::CORE)
    }
}

/// Is `symbol` accessible from `context`?
pub fn is_accessible(graph: &SymbolGraph, symbol: SymbolId, context: &AccessContext) -> bool {
    let data = &graph.symbol(symbol).data;
    match data {
        SymbolData::Namespace(_) | SymbolData::TypeParameter(_) => return true,
        SymbolData::Type(t) => match t.type_kind {
            TypeKind::Error => return true,
            TypeKind::Array | TypeKind::Pointer | TypeKind::Ref => {
                return t.element.is_none_or(|e| is_accessible(graph, e, context));
            }
            _ => {
                if let Some(original) = t.original {
                    return is_accessible(graph, original, context)
                        && t.type_arguments
                            .iter()
                            .all(|&arg| is_accessible(graph, arg, context));
                }
            }
        },
        _ => {}
    }

    match graph.containing_type(symbol) {
        // A member or nested type: its container must be visible first.
        Some(declaring) => {
            is_accessible(graph, declaring, context)
                && is_member_accessible(graph, symbol, graph.original_definition(declaring), context)
        }
        // Top-level types are public or internal.
        None => match graph.accessibility(symbol) {
            Accessibility::Public | Accessibility::NotApplicable => true,
            _ => graph.assembly(symbol) == context.assembly,
        },
    }
}

fn is_member_accessible(
    graph: &SymbolGraph,
    symbol: SymbolId,
    declaring: SymbolId,
    context: &AccessContext,
) -> bool {
    let internal = || graph.assembly(symbol) == context.assembly;
    let protected = || is_protected_accessible(graph, declaring, context);
    match graph.accessibility(symbol) {
        Accessibility::NotApplicable | Accessibility::Public => true,
        Accessibility::Internal => internal(),
        Accessibility::Private => is_private_accessible(graph, declaring, context),
        Accessibility::Protected => protected(),
        Accessibility::ProtectedAndInternal => internal() && protected(),
        Accessibility::ProtectedOrInternal => internal() || protected(),
    }
}

/// The caller is inside the declaring type, possibly in a nested type.
fn is_private_accessible(graph: &SymbolGraph, declaring: SymbolId, context: &AccessContext) -> bool {
    context.within_type.is_some_and(|within| {
        graph
            .enclosing_types(graph.original_definition(within))
            .any(|t| graph.original_definition(t) == declaring)
    })
}

/// The caller is inside the declaring type or a type derived from it, possibly
/// in a nested type.
fn is_protected_accessible(graph: &SymbolGraph, declaring: SymbolId, context: &AccessContext) -> bool {
    context.within_type.is_some_and(|within| {
        graph
            .enclosing_types(graph.original_definition(within))
            .any(|enclosing| graph.is_derived_from(enclosing, declaring))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::{MemberDecl, SymbolGraphBuilder, TypeDecl};

    struct Fixture {
        graph: SymbolGraph,
        app: AssemblyId,
        lib: AssemblyId,
        base: SymbolId,
        derived: SymbolId,
        unrelated: SymbolId,
        nested: SymbolId,
        private: SymbolId,
        protected: SymbolId,
        internal: SymbolId,
        private_protected: SymbolId,
        protected_internal: SymbolId,
    }

    fn fixture() -> Fixture {
        let mut builder = SymbolGraphBuilder::new();
        let lib = builder.add_assembly("Lib");
        let global = builder.global_namespace();
        let base = builder
            .add_type(TypeDecl::new(TypeKind::Class, global, "Base").with_accessibility(Accessibility::Public))
            .unwrap();
        let nested = builder
            .add_type(TypeDecl::new(TypeKind::Class, base, "Nested"))
            .unwrap();
        let member = |name: &str, accessibility| MemberDecl::new(base, name).with_accessibility(accessibility);
        let private = builder.add_method(member("Private", Accessibility::Private)).unwrap();
        let protected = builder.add_method(member("Protected", Accessibility::Protected)).unwrap();
        let internal = builder.add_method(member("Internal", Accessibility::Internal)).unwrap();
        let private_protected = builder
            .add_method(member("PrivateProtected", Accessibility::ProtectedAndInternal))
            .unwrap();
        let protected_internal = builder
            .add_method(member("ProtectedInternal", Accessibility::ProtectedOrInternal))
            .unwrap();

        let app = builder.add_assembly("App");
        let derived = builder.add_type(TypeDecl::new(TypeKind::Class, global, "Derived")).unwrap();
        builder.set_base_type(derived, base).unwrap();
        let unrelated = builder.add_type(TypeDecl::new(TypeKind::Class, global, "Unrelated")).unwrap();

        Fixture {
            graph: builder.build().unwrap(),
            app,
            lib,
            base,
            derived,
            unrelated,
            nested,
            private,
            protected,
            internal,
            private_protected,
            protected_internal,
        }
    }

    #[test]
    fn test_protected_from_derived_only() {
        let f = fixture();
        let from_derived = AccessContext::new(f.app).with_type(f.derived);
        let from_unrelated = AccessContext::new(f.app).with_type(f.unrelated);

        assert!(is_accessible(&f.graph, f.protected, &from_derived));
        assert!(!is_accessible(&f.graph, f.protected, &from_unrelated));
    }

    #[test]
    fn test_private_never_from_derived() {
        let f = fixture();
        let from_derived = AccessContext::new(f.lib).with_type(f.derived);
        let from_base = AccessContext::new(f.lib).with_type(f.base);

        assert!(!is_accessible(&f.graph, f.private, &from_derived));
        assert!(is_accessible(&f.graph, f.private, &from_base));
    }

    #[test]
    fn test_nested_type_sees_enclosing_private_members() {
        let f = fixture();
        let from_nested = AccessContext::new(f.lib).with_type(f.nested);
        assert!(is_accessible(&f.graph, f.private, &from_nested));
        assert!(!is_accessible(&f.graph, f.nested, &AccessContext::new(f.lib)));
    }

    #[test]
    fn test_internal_combinations_across_assemblies() {
        let f = fixture();
        let derived_other_assembly = AccessContext::new(f.app).with_type(f.derived);
        let unrelated_same_assembly = AccessContext::new(f.lib).with_type(f.unrelated);

        assert!(!is_accessible(&f.graph, f.internal, &derived_other_assembly));
        assert!(is_accessible(&f.graph, f.internal, &unrelated_same_assembly));

        assert!(!is_accessible(&f.graph, f.private_protected, &derived_other_assembly));
        assert!(!is_accessible(&f.graph, f.private_protected, &unrelated_same_assembly));

        assert!(is_accessible(&f.graph, f.protected_internal, &derived_other_assembly));
        assert!(is_accessible(&f.graph, f.protected_internal, &unrelated_same_assembly));
        assert!(!is_accessible(&f.graph, f.protected_internal, &AccessContext::new(f.app)));
    }

    #[test]
    fn test_namespaces_and_type_parameters_are_accessible() {
        let f = fixture();
        let ctx = AccessContext::new(f.app);
        assert!(is_accessible(&f.graph, f.graph.global_namespace(), &ctx));
        assert!(is_accessible(&f.graph, f.graph.error_type(), &ctx));
    }
}
