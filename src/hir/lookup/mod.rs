//! Member lookup over the symbol graph.
//!
//! # Algorithm
//!
//! [`MemberLookup::lookup_member`] dispatches on the [`TypeKind`] of the scope:
//!
//! - **Classes, structs, enums, delegates, arrays** walk the base chain most
//!   derived first, folding each level in with the hiding merge.
//! - **Interfaces** combine their own members with the sibling results of
//!   every base interface; an interface without bases sees `object`.
//! - **Type parameters** look in their effective base class, then in their
//!   effective interfaces.
//! - **Ref types** forward to the referenced type.
//! - **Pointers and the error type** have no members.
//!
//! Each visited scope is classified by [`single_scope`]; accessibility is
//! evaluated against the lookup's [`AccessContext`]. Lookups are pure: the
//! same inputs always produce the same [`LookupResult`].

mod result;
mod single_scope;

use rustc_hash::FxHashMap;
use thiserror::Error;

pub use result::{
    Ambiguity, Candidate, LookupError, LookupResult, Materialized, SymbolOrMethodGroup, Viability,
};

use super::accessibility::AccessContext;
use super::ids::SymbolId;
use super::symbols::{SymbolGraph, SymbolKind, TypeKind};
use crate::base::Name;
use single_scope::lookup_in_single_scope;

/// Hard failures: the graph is in a state lookup cannot interpret.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("corrupt symbol '{symbol}': {reason}")]
    CorruptSymbol { symbol: String, reason: &'static str },
}

impl BindError {
    pub(crate) fn corrupt(graph: &SymbolGraph, symbol: SymbolId, reason: &'static str) -> Self {
        BindError::CorruptSymbol {
            symbol: graph.display(symbol),
            reason,
        }
    }
}

/// Member lookup from one caller context.
#[derive(Clone, Copy, Debug)]
pub struct MemberLookup<'a> {
    graph: &'a SymbolGraph,
    context: AccessContext,
}

impl<'a> MemberLookup<'a> {
    pub fn new(graph: &'a SymbolGraph) -> Self {
        Self {
            graph,
            context: AccessContext::default(),
        }
    }

    /// Evaluate accessibility from `context`.
    pub fn with_context(mut self, context: AccessContext) -> Self {
        self.context = context;
        self
    }

    pub fn graph(&self) -> &'a SymbolGraph {
        self.graph
    }

    pub fn context(&self) -> &AccessContext {
        &self.context
    }

    /// Look up `name` with `arity` type arguments as a member of `ty`,
    /// including inherited members.
    pub fn lookup_member(
        &self,
        ty: SymbolId,
        name: &str,
        arity: usize,
        invoked: bool,
    ) -> Result<LookupResult, BindError> {
        // A name the graph never interned cannot be declared anywhere.
        let Some(name) = self.graph.interner().find(name) else {
            self.check_is_type(ty)?;
            return Ok(LookupResult::empty());
        };
        self.lookup_member_named(ty, name, arity, invoked)
    }

    /// [`lookup_member`](Self::lookup_member) with an interned name.
    pub fn lookup_member_named(
        &self,
        ty: SymbolId,
        name: Name,
        arity: usize,
        invoked: bool,
    ) -> Result<LookupResult, BindError> {
        let result = self.dispatch(ty, name, arity, invoked)?;
        tracing::trace!(
            "[LOOKUP] '{}' in {} -> {:?}",
            self.graph.interner().lookup(name).unwrap_or_default(),
            self.graph.display(ty),
            result.symbols()
        );
        Ok(result)
    }

    /// Look up a type or namespace named `name` directly inside `namespace`.
    pub fn lookup_in_namespace(
        &self,
        namespace: SymbolId,
        name: &str,
        arity: usize,
    ) -> Result<LookupResult, BindError> {
        if self.graph.kind(namespace) != SymbolKind::Namespace {
            return Err(BindError::corrupt(self.graph, namespace, "not a namespace"));
        }
        let Some(name) = self.graph.interner().find(name) else {
            return Ok(LookupResult::empty());
        };
        let result = lookup_in_single_scope(self.graph, namespace, name, arity, false, &self.context);
        tracing::trace!(
            "[LOOKUP] namespace member in {} -> {:?}",
            self.graph.display(namespace),
            result.symbols()
        );
        Ok(result)
    }

    fn check_is_type(&self, ty: SymbolId) -> Result<(), BindError> {
        match self.graph.type_kind(ty) {
            None => Err(BindError::corrupt(self.graph, ty, "not a type")),
            Some(TypeKind::Unknown) => Err(BindError::corrupt(self.graph, ty, "unknown type kind")),
            Some(_) => Ok(()),
        }
    }

    fn dispatch(&self, ty: SymbolId, name: Name, arity: usize, invoked: bool) -> Result<LookupResult, BindError> {
        let Some(kind) = self.graph.type_kind(ty) else {
            return Err(BindError::corrupt(self.graph, ty, "not a type"));
        };
        match kind {
            TypeKind::Ref => match self.graph.element_type(ty) {
                Some(referenced) => self.dispatch(referenced, name, arity, invoked),
                None => Err(BindError::corrupt(self.graph, ty, "ref type without referenced type")),
            },
            TypeKind::TypeParameter => Ok(self.lookup_in_type_parameter(ty, name, arity, invoked)),
            TypeKind::Interface => {
                let mut memo = FxHashMap::default();
                Ok(self.lookup_in_interface(ty, name, arity, invoked, &mut memo))
            }
            TypeKind::Class | TypeKind::Struct | TypeKind::Enum | TypeKind::Delegate | TypeKind::Array => {
                Ok(self.lookup_in_class(ty, name, arity, invoked))
            }
            TypeKind::Error | TypeKind::Pointer => Ok(LookupResult::empty()),
            TypeKind::Unknown => Err(BindError::corrupt(self.graph, ty, "unknown type kind")),
        }
    }

    fn lookup_in_class(&self, ty: SymbolId, name: Name, arity: usize, invoked: bool) -> LookupResult {
        self.graph
            .base_chain(ty)
            .fold(LookupResult::empty(), |acc, level| {
                let local = lookup_in_single_scope(self.graph, level, name, arity, invoked, &self.context);
                acc.merge_hiding(local)
            })
    }

    /// Interface lookup, memoized per interface so diamonds are visited once
    /// per distinct interface while every path still contributes.
    fn lookup_in_interface(
        &self,
        interface: SymbolId,
        name: Name,
        arity: usize,
        invoked: bool,
        memo: &mut FxHashMap<SymbolId, LookupResult>,
    ) -> LookupResult {
        if let Some(done) = memo.get(&interface) {
            return done.clone();
        }
        let local = lookup_in_single_scope(self.graph, interface, name, arity, invoked, &self.context);
        let bases = self.graph.interfaces(interface);
        let inherited = if bases.is_empty() {
            self.lookup_in_class(self.graph.well_known().object(), name, arity, invoked)
        } else {
            let merged = bases.iter().fold(LookupResult::empty(), |acc, &base| {
                acc.merge_ambiguous(self.lookup_in_interface(base, name, arity, invoked, memo))
            });
            self.remove_hidden_across_paths(merged)
        };
        let result = local.merge_hiding(inherited);
        memo.insert(interface, result.clone());
        result
    }

    fn lookup_in_type_parameter(&self, tp: SymbolId, name: Name, arity: usize, invoked: bool) -> LookupResult {
        let from_class = self.lookup_in_class(self.graph.effective_base(tp), name, arity, invoked);
        let mut memo = FxHashMap::default();
        let from_interfaces = self
            .graph
            .effective_interfaces(tp)
            .into_iter()
            .fold(LookupResult::empty(), |acc, interface| {
                acc.merge_ambiguous(self.lookup_in_interface(interface, name, arity, invoked, &mut memo))
            });
        from_class.merge_hiding(self.remove_hidden_across_paths(from_interfaces))
    }

    /// Drop candidates that one path of an interface diamond hides and another
    /// path brings back. A `Good` candidate hides what its declaring interface
    /// inherits: everything when it is a non-method, only non-methods otherwise.
    fn remove_hidden_across_paths(&self, result: LookupResult) -> LookupResult {
        let graph = self.graph;
        let hiders: Vec<(SymbolId, bool)> = result
            .candidates()
            .iter()
            .filter(|c| c.viability == Viability::Good)
            .filter_map(|c| graph.container(c.symbol).map(|owner| (owner, c.is_method)))
            .collect();
        result.retain(|candidate| {
            let Some(owner) = graph.container(candidate.symbol) else {
                return true;
            };
            !hiders.iter().any(|&(hider, hider_is_method)| {
                hider != owner
                    && graph.implements(hider, owner)
                    && (!hider_is_method || !candidate.is_method)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::symbols::SymbolData;
    use crate::hir::{Accessibility, MemberDecl, SpecialType, SymbolGraphBuilder, TypeDecl};

    fn public(container: SymbolId, name: &str) -> MemberDecl {
        MemberDecl::new(container, name).with_accessibility(Accessibility::Public)
    }

    #[test]
    fn test_field_hides_base_method() {
        let mut builder = SymbolGraphBuilder::new();
        let global = builder.global_namespace();
        let int = builder.special(SpecialType::Int32);
        let b = builder.add_type(TypeDecl::new(TypeKind::Class, global, "B")).unwrap();
        builder.add_method(public(b, "F")).unwrap();
        let d = builder.add_type(TypeDecl::new(TypeKind::Class, global, "D")).unwrap();
        builder.set_base_type(d, b).unwrap();
        let field = builder.add_field(public(d, "F"), int).unwrap();
        let graph = builder.build().unwrap();

        let result = MemberLookup::new(&graph).lookup_member(d, "F", 0, false).unwrap();
        assert_eq!(result.symbols(), vec![field]);
    }

    #[test]
    fn test_overloads_accumulate_across_levels() {
        let mut builder = SymbolGraphBuilder::new();
        let global = builder.global_namespace();
        let int = builder.special(SpecialType::Int32);
        let b = builder.add_type(TypeDecl::new(TypeKind::Class, global, "B")).unwrap();
        let base_m = builder.add_method(public(b, "M")).unwrap();
        builder.set_parameters(base_m, &[("x", int)]).unwrap();
        let d = builder.add_type(TypeDecl::new(TypeKind::Class, global, "D")).unwrap();
        builder.set_base_type(d, b).unwrap();
        let derived_m = builder.add_method(public(d, "M")).unwrap();
        let graph = builder.build().unwrap();

        let result = MemberLookup::new(&graph).lookup_member(d, "M", 0, true).unwrap();
        assert_eq!(result.symbols(), vec![derived_m, base_m]);
    }

    #[test]
    fn test_interface_sees_object_members() {
        let mut builder = SymbolGraphBuilder::new();
        let global = builder.global_namespace();
        let i = builder.add_type(TypeDecl::new(TypeKind::Interface, global, "I")).unwrap();
        let graph = builder.build().unwrap();

        let result = MemberLookup::new(&graph).lookup_member(i, "ToString", 0, true).unwrap();
        assert!(result.is_viable());
        assert!(graph.is_method(result.symbols()[0]));
    }

    #[test]
    fn test_core_types_are_members_of_system() {
        let graph = SymbolGraphBuilder::new().build().unwrap();
        let lookup = MemberLookup::new(&graph);
        let system = lookup.lookup_in_namespace(graph.global_namespace(), "System", 0).unwrap();
        let system = system.symbols()[0];

        let object = lookup.lookup_in_namespace(system, "Object", 0).unwrap();
        assert_eq!(object.symbols(), vec![graph.well_known().object()]);
        let int = lookup.lookup_in_namespace(system, "Int32", 0).unwrap();
        assert_eq!(int.symbols(), vec![graph.well_known().int32()]);
    }

    #[test]
    fn test_hiding_on_one_diamond_path_hides_on_all() {
        // IA { Value }  IB : IA { Value }  IC : IA { }  ID : IB, IC { }
        let mut builder = SymbolGraphBuilder::new();
        let global = builder.global_namespace();
        let int = builder.special(SpecialType::Int32);
        let ia = builder.add_type(TypeDecl::new(TypeKind::Interface, global, "IA")).unwrap();
        let ib = builder.add_type(TypeDecl::new(TypeKind::Interface, global, "IB")).unwrap();
        let ic = builder.add_type(TypeDecl::new(TypeKind::Interface, global, "IC")).unwrap();
        let id = builder.add_type(TypeDecl::new(TypeKind::Interface, global, "ID")).unwrap();
        builder.add_interface(ib, ia).unwrap();
        builder.add_interface(ic, ia).unwrap();
        builder.add_interface(id, ib).unwrap();
        builder.add_interface(id, ic).unwrap();
        builder.add_property(public(ia, "Value"), int).unwrap();
        let derived = builder.add_property(public(ib, "Value"), int).unwrap();
        let graph = builder.build().unwrap();

        let result = MemberLookup::new(&graph).lookup_member(id, "Value", 0, false).unwrap();
        assert_eq!(result.symbols(), vec![derived]);
        assert_eq!(result.materialize(&graph).unwrap().ambiguity, None);
    }

    #[test]
    fn test_methods_on_one_diamond_path_keep_base_overloads() {
        let mut builder = SymbolGraphBuilder::new();
        let global = builder.global_namespace();
        let int = builder.special(SpecialType::Int32);
        let ia = builder.add_type(TypeDecl::new(TypeKind::Interface, global, "IA")).unwrap();
        let ib = builder.add_type(TypeDecl::new(TypeKind::Interface, global, "IB")).unwrap();
        let ic = builder.add_type(TypeDecl::new(TypeKind::Interface, global, "IC")).unwrap();
        let id = builder.add_type(TypeDecl::new(TypeKind::Interface, global, "ID")).unwrap();
        builder.add_interface(ib, ia).unwrap();
        builder.add_interface(ic, ia).unwrap();
        builder.add_interface(id, ib).unwrap();
        builder.add_interface(id, ic).unwrap();
        let base_run = builder.add_method(public(ia, "Run")).unwrap();
        let base_field = builder.add_property(public(ia, "Stop"), int).unwrap();
        let derived_run = builder.add_method(public(ib, "Run")).unwrap();
        builder.add_method(public(ib, "Stop")).unwrap();
        let graph = builder.build().unwrap();
        let lookup = MemberLookup::new(&graph);

        let run = lookup.lookup_member(id, "Run", 0, true).unwrap();
        assert_eq!(run.symbols(), vec![derived_run, base_run]);

        let stop = lookup.lookup_member(id, "Stop", 0, false).unwrap();
        assert!(!stop.symbols().contains(&base_field));
    }

    #[test]
    fn test_pointer_and_error_types_have_no_members() {
        let mut builder = SymbolGraphBuilder::new();
        let int = builder.special(SpecialType::Int32);
        let pointer = builder.pointer_to(int);
        let graph = builder.build().unwrap();
        let lookup = MemberLookup::new(&graph);

        assert!(lookup.lookup_member(pointer, "ToString", 0, true).unwrap().is_empty());
        assert!(lookup.lookup_member(graph.error_type(), "ToString", 0, true).unwrap().is_empty());
    }

    #[test]
    fn test_ref_forwards_to_referenced_type() {
        let mut builder = SymbolGraphBuilder::new();
        let int = builder.special(SpecialType::Int32);
        let by_ref = builder.ref_to(int);
        let graph = builder.build().unwrap();

        let result = MemberLookup::new(&graph).lookup_member(by_ref, "GetHashCode", 0, true).unwrap();
        assert!(result.is_viable());
    }

    #[test]
    fn test_unknown_type_kind_is_corrupt() {
        let mut builder = SymbolGraphBuilder::new();
        let global = builder.global_namespace();
        let c = builder.add_type(TypeDecl::new(TypeKind::Class, global, "C")).unwrap();
        let mut graph = builder.build().unwrap();
        if let SymbolData::Type(t) = &mut graph.symbols[c.index()].data {
            t.type_kind = TypeKind::Unknown;
        }

        let err = MemberLookup::new(&graph).lookup_member(c, "ToString", 0, false).unwrap_err();
        assert!(matches!(err, BindError::CorruptSymbol { .. }));
    }

    #[test]
    fn test_members_are_not_scopes() {
        let mut builder = SymbolGraphBuilder::new();
        let global = builder.global_namespace();
        let c = builder.add_type(TypeDecl::new(TypeKind::Class, global, "C")).unwrap();
        let m = builder.add_method(public(c, "M")).unwrap();
        let graph = builder.build().unwrap();
        let lookup = MemberLookup::new(&graph);

        assert!(lookup.lookup_member(m, "X", 0, false).is_err());
        assert!(lookup.lookup_in_namespace(c, "X", 0).is_err());
    }
}
