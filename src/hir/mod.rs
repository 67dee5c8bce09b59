//! Semantic model: the symbol graph and member lookup over it.
//!
//! - [`SymbolGraph`] - Immutable declarations, built with [`SymbolGraphBuilder`]
//! - [`MemberLookup`] - Member lookup with hiding, diamonds and accessibility
//! - [`is_accessible`] - Accessibility of a symbol from an [`AccessContext`]
//! - [`LookupCache`] - Memoized and parallel lookups
//! - [`DiagnosticCollector`] - The sink binding reports into

mod accessibility;
mod builder;
mod cache;
pub mod diagnostics;
mod ids;
mod lookup;
mod relations;
mod symbols;

pub use accessibility::{is_accessible, AccessContext};
pub use builder::{GraphError, MemberDecl, SymbolGraphBuilder, TypeConstraint, TypeDecl, INDEXER_NAME};
pub use cache::{LookupCache, LookupRequest};
pub use diagnostics::{codes, Diagnostic, DiagnosticCollector, RelatedInfo, Severity};
pub use ids::{AssemblyId, SymbolId};
pub use lookup::{
    Ambiguity, BindError, Candidate, LookupError, LookupResult, Materialized, MemberLookup,
    SymbolOrMethodGroup, Viability,
};
pub use relations::{BaseChain, EnclosingTypes};
pub use symbols::{
    Accessibility, FieldData, MemberMap, MethodData, NamespaceData, Parameter, PropertyData,
    SpecialType, Symbol, SymbolData, SymbolGraph, SymbolKind, TypeData, TypeKind,
    TypeParameterData, WellKnownTypes,
};
