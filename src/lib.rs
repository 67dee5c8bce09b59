//! # binder-base
//!
//! Member lookup, accessibility and member-access binding for a C#-like
//! compiler front end.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! binder  → Binds method bodies: member access, names, element access, statements
//!   ↓
//! syntax  → Lexer + parser for declarations and bodies, lowering into the graph
//!   ↓
//! hir     → Symbol graph, member lookup, accessibility, diagnostics
//!   ↓
//! base    → Primitives (FileId, TextRange, Name interning)
//! ```
//!
//! ## Example
//!
//! ```
//! use binder::binder::Binder;
//! use binder::hir::{codes, DiagnosticCollector};
//! use binder::syntax::{lower, parse};
//! use binder::FileId;
//!
//! let unit = parse(FileId::new(0), "class C { int[] items; void M() { items[0, 1]; } }").unwrap();
//! let program = lower(&[unit]).unwrap();
//! let method = program.graph.lookup_path("C.M").unwrap();
//!
//! let mut diagnostics = DiagnosticCollector::new();
//! let mut binder = Binder::new(&program.graph, &mut diagnostics);
//! binder.bind_method_body(program.body_of(method).unwrap()).unwrap();
//! assert_eq!(diagnostics.codes(), vec![codes::BAD_INDEX_COUNT]);
//! ```

/// Foundation types: FileId, TextRange, Name interning
pub mod base;

/// Semantic model: symbol graph and member lookup
pub mod hir;

/// Declaration language front end
pub mod syntax;

/// Method body binding
pub mod binder;

pub use base::{FileId, Interner, LineCol, LineIndex, Name, TextRange, TextSize};
pub use binder::{Binder, BinderOptions, BoundExpr, BoundStmt};
pub use hir::{is_accessible, AccessContext, LookupResult, MemberLookup, SymbolGraph, SymbolGraphBuilder};
