//! Type relation queries: base chains, interface closures, enclosing types and
//! the effective base/interfaces of type parameters.
//!
//! All comparisons that decide *relationship* (derivation, nesting) go through
//! [`SymbolGraph::original_definition`], so a constructed type is related to
//! exactly what its generic definition is related to.

use rustc_hash::FxHashSet;

use super::ids::SymbolId;
use super::symbols::{SpecialType, SymbolGraph, TypeKind};

/// Walks `base_type` links starting at (and including) a type.
pub struct BaseChain<'g> {
    graph: &'g SymbolGraph,
    next: Option<SymbolId>,
}

impl Iterator for BaseChain<'_> {
    type Item = SymbolId;

    fn next(&mut self) -> Option<SymbolId> {
        let current = self.next?;
        self.next = self.graph.base_type(current);
        Some(current)
    }
}

/// Walks lexically enclosing types starting at (and including) a type.
pub struct EnclosingTypes<'g> {
    graph: &'g SymbolGraph,
    next: Option<SymbolId>,
}

impl Iterator for EnclosingTypes<'_> {
    type Item = SymbolId;

    fn next(&mut self) -> Option<SymbolId> {
        let current = self.next?;
        self.next = self.graph.containing_type(current);
        Some(current)
    }
}

impl SymbolGraph {
    /// `ty` followed by its base types, most derived first.
    pub fn base_chain(&self, ty: SymbolId) -> BaseChain<'_> {
        BaseChain {
            graph: self,
            next: Some(ty),
        }
    }

    /// `ty` followed by the types it is lexically nested in, innermost first.
    pub fn enclosing_types(&self, ty: SymbolId) -> EnclosingTypes<'_> {
        EnclosingTypes {
            graph: self,
            next: Some(ty),
        }
    }

    /// Every interface `ty` implements, directly or through bases and base
    /// interfaces, each listed once in discovery order.
    pub fn all_interfaces(&self, ty: SymbolId) -> Vec<SymbolId> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        let mut pending: Vec<SymbolId> = Vec::new();
        for level in self.base_chain(ty) {
            pending.extend(self.interfaces(level).iter().rev());
            while let Some(interface) = pending.pop() {
                if seen.insert(interface) {
                    out.push(interface);
                    pending.extend(self.interfaces(interface).iter().rev());
                }
            }
        }
        out
    }

    /// Whether `ty` is `base` or derives from it through the base chain.
    pub fn is_derived_from(&self, ty: SymbolId, base: SymbolId) -> bool {
        let base = self.original_definition(base);
        self.base_chain(ty)
            .any(|t| self.original_definition(t) == base)
    }

    /// Whether `ty` is `interface` or implements it.
    pub fn implements(&self, ty: SymbolId, interface: SymbolId) -> bool {
        let interface = self.original_definition(interface);
        self.original_definition(ty) == interface
            || self
                .all_interfaces(ty)
                .into_iter()
                .any(|i| self.original_definition(i) == interface)
    }

    /// Whether `inner` is `outer` or lexically nested inside it.
    pub fn is_nested_in(&self, inner: SymbolId, outer: SymbolId) -> bool {
        let outer = self.original_definition(outer);
        self.enclosing_types(self.original_definition(inner))
            .any(|t| t == outer)
    }

    /// The class a type parameter is treated as deriving from.
    ///
    /// The first class-typed constraint wins; a type-parameter constraint
    /// contributes its own effective base. `struct` constrained parameters
    /// derive from `System.ValueType`, everything else from `object`.
    pub fn effective_base(&self, type_parameter: SymbolId) -> SymbolId {
        let mut seen = FxHashSet::default();
        self.effective_base_inner(type_parameter, &mut seen)
    }

    fn effective_base_inner(&self, tp: SymbolId, seen: &mut FxHashSet<SymbolId>) -> SymbolId {
        let object = self.well_known.object();
        let Some(data) = self.type_parameter_data(tp) else {
            return object;
        };
        if !seen.insert(tp) {
            return object;
        }
        for &constraint in data.constraint_types() {
            match self.type_kind(constraint) {
                Some(TypeKind::Class) => return constraint,
                Some(TypeKind::TypeParameter) => {
                    let base = self.effective_base_inner(constraint, seen);
                    if base != object {
                        return base;
                    }
                }
                _ => {}
            }
        }
        if data.has_struct_constraint() {
            self.well_known.get(SpecialType::ValueType)
        } else {
            object
        }
    }

    /// Interfaces a type parameter is treated as implementing: its interface
    /// constraints plus those inherited from type-parameter constraints.
    pub fn effective_interfaces(&self, type_parameter: SymbolId) -> Vec<SymbolId> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut stack = vec![type_parameter];
        let mut visited = FxHashSet::default();
        while let Some(tp) = stack.pop() {
            if !visited.insert(tp) {
                continue;
            }
            let Some(data) = self.type_parameter_data(tp) else {
                continue;
            };
            for &constraint in data.constraint_types() {
                match self.type_kind(constraint) {
                    Some(TypeKind::Interface) => {
                        if seen.insert(constraint) {
                            out.push(constraint);
                        }
                    }
                    Some(TypeKind::TypeParameter) => stack.push(constraint),
                    _ => {}
                }
            }
        }
        out
    }

    /// Whether values of `ty` are references (classes, interfaces, arrays,
    /// delegates, `class`-constrained type parameters).
    pub fn is_reference_type(&self, ty: SymbolId) -> bool {
        match self.type_kind(ty) {
            Some(TypeKind::Class | TypeKind::Interface | TypeKind::Array | TypeKind::Delegate) => true,
            Some(TypeKind::TypeParameter) => self.type_parameter_data(ty).is_some_and(|d| {
                d.has_class_constraint()
                    || d.constraint_types()
                        .iter()
                        .any(|&c| self.type_kind(c) == Some(TypeKind::Class) || self.is_reference_type(c))
            }),
            _ => false,
        }
    }

    /// Whether values of `ty` are values (structs, enums, `struct`-constrained
    /// type parameters).
    pub fn is_value_type(&self, ty: SymbolId) -> bool {
        match self.type_kind(ty) {
            Some(TypeKind::Struct | TypeKind::Enum) => true,
            Some(TypeKind::TypeParameter) => self
                .type_parameter_data(ty)
                .is_some_and(|d| d.has_struct_constraint()),
            _ => false,
        }
    }

    /// Whether a field or property of type `ty` can be invoked.
    pub fn is_delegate_type(&self, ty: SymbolId) -> bool {
        self.type_kind(ty) == Some(TypeKind::Delegate)
    }
}

#[cfg(test)]
mod tests {
    use crate::hir::{MemberDecl, SymbolGraphBuilder, TypeConstraint, TypeDecl};

    use super::*;

    #[test]
    fn test_base_chain_ends_at_object() {
        let mut builder = SymbolGraphBuilder::new();
        let global = builder.global_namespace();
        let base = builder.add_type(TypeDecl::new(TypeKind::Class, global, "Base")).unwrap();
        let derived = builder.add_type(TypeDecl::new(TypeKind::Class, global, "Derived")).unwrap();
        builder.set_base_type(derived, base).unwrap();
        let graph = builder.build().unwrap();

        let chain: Vec<_> = graph.base_chain(derived).collect();
        assert_eq!(chain, vec![derived, base, graph.well_known().object()]);
        assert!(graph.is_derived_from(derived, base));
        assert!(!graph.is_derived_from(base, derived));
    }

    #[test]
    fn test_all_interfaces_are_deduplicated() {
        let mut builder = SymbolGraphBuilder::new();
        let global = builder.global_namespace();
        let ia = builder.add_type(TypeDecl::new(TypeKind::Interface, global, "IA")).unwrap();
        let ib = builder.add_type(TypeDecl::new(TypeKind::Interface, global, "IB")).unwrap();
        let ic = builder.add_type(TypeDecl::new(TypeKind::Interface, global, "IC")).unwrap();
        builder.add_interface(ib, ia).unwrap();
        builder.add_interface(ic, ia).unwrap();
        let class = builder.add_type(TypeDecl::new(TypeKind::Class, global, "C")).unwrap();
        builder.add_interface(class, ib).unwrap();
        builder.add_interface(class, ic).unwrap();
        let graph = builder.build().unwrap();

        assert_eq!(graph.all_interfaces(class), vec![ib, ia, ic]);
        assert!(graph.implements(class, ia));
    }

    #[test]
    fn test_enclosing_types() {
        let mut builder = SymbolGraphBuilder::new();
        let global = builder.global_namespace();
        let outer = builder.add_type(TypeDecl::new(TypeKind::Class, global, "Outer")).unwrap();
        let inner = builder.add_type(TypeDecl::new(TypeKind::Class, outer, "Inner")).unwrap();
        let graph = builder.build().unwrap();

        let chain: Vec<_> = graph.enclosing_types(inner).collect();
        assert_eq!(chain, vec![inner, outer]);
        assert!(graph.is_nested_in(inner, outer));
        assert!(!graph.is_nested_in(outer, inner));
    }

    #[test]
    fn test_effective_base_and_interfaces() {
        let mut builder = SymbolGraphBuilder::new();
        let global = builder.global_namespace();
        let base = builder.add_type(TypeDecl::new(TypeKind::Class, global, "Base")).unwrap();
        let iface = builder.add_type(TypeDecl::new(TypeKind::Interface, global, "IThing")).unwrap();
        let generic = builder.add_type(TypeDecl::new(TypeKind::Class, global, "G")).unwrap();
        let t = builder.add_type_parameter(generic, "T").unwrap();
        let u = builder.add_type_parameter(generic, "U").unwrap();
        let s = builder.add_type_parameter(generic, "S").unwrap();
        builder.add_constraint(t, TypeConstraint::Type(base)).unwrap();
        builder.add_constraint(t, TypeConstraint::Type(iface)).unwrap();
        builder.add_constraint(u, TypeConstraint::Type(t)).unwrap();
        builder.add_constraint(s, TypeConstraint::Struct).unwrap();
        let m = builder.add_method(MemberDecl::new(generic, "M")).unwrap();
        let free = builder.add_type_parameter(m, "V").unwrap();
        let graph = builder.build().unwrap();

        assert_eq!(graph.effective_base(t), base);
        assert_eq!(graph.effective_base(u), base);
        assert_eq!(graph.effective_interfaces(u), vec![iface]);
        assert_eq!(graph.effective_base(s), graph.well_known().get(SpecialType::ValueType));
        assert_eq!(graph.effective_base(free), graph.well_known().object());
        assert!(graph.is_reference_type(u));
        assert!(graph.is_value_type(s));
    }
}
