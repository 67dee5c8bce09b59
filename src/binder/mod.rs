//! Binding of method bodies against the symbol graph.
//!
//! The binder turns syntax into a [`BoundExpr`]/[`BoundStmt`] tree, resolving
//! every name through [`MemberLookup`]:
//!
//! - [`Binder::classify_member_access`] - `left.name` for namespace, type and value operands
//! - simple names - locals, type parameters, enclosing types, namespaces
//! - element access - arrays, pointers and indexers
//! - statements - `if`, `while`, `break`, `continue`, locals
//!
//! Language errors never abort binding. Each failure records one
//! [`Diagnostic`] and yields a [`BoundExpr::Bad`] node; once a statement has
//! reported, the rest of it binds without reporting. Only corrupt graph
//! states surface as [`BindError`].

mod bound;
mod conversions;
mod element_access;
mod expressions;
mod member_access;
mod names;
mod statements;

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

pub use bound::{BoundBlock, BoundExpr, BoundStmt, LabelId, LocalId, LocalSymbol};
pub use conversions::{classify_expression, implicit_conversion, null_conversion, ConversionKind};
pub use element_access::BoundArgument;

use crate::base::{FileId, TextRange};
use crate::hir::{
    codes, AccessContext, Ambiguity, BindError, Diagnostic, DiagnosticCollector, LookupResult, Materialized,
    MemberLookup, SpecialType, SymbolGraph, SymbolId, SymbolKind, SymbolOrMethodGroup, Viability,
};
use crate::syntax::MethodBody;

// ============================================================================
// OPTIONS
// ============================================================================

/// Binder configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinderOptions {
    /// Record diagnostics at all. When off, binding still produces `Bad` nodes.
    pub report_diagnostics: bool,
    /// Pointer operations are allowed.
    pub allow_unsafe: bool,
    /// Report two non-methods of one name declared in the same scope.
    pub report_same_scope_ambiguity: bool,
    /// Report instance members reached through a type name and static
    /// members reached through a value.
    pub report_static_instance_mismatch: bool,
}

impl Default for BinderOptions {
    fn default() -> Self {
        Self {
            report_diagnostics: true,
            allow_unsafe: false,
            report_same_scope_ambiguity: false,
            report_static_instance_mismatch: false,
        }
    }
}

impl BinderOptions {
    pub fn with_diagnostics(mut self, report: bool) -> Self {
        self.report_diagnostics = report;
        self
    }

    pub fn with_unsafe(mut self, allow: bool) -> Self {
        self.allow_unsafe = allow;
        self
    }

    pub fn with_same_scope_ambiguity(mut self, report: bool) -> Self {
        self.report_same_scope_ambiguity = report;
        self
    }

    pub fn with_static_instance_mismatch(mut self, report: bool) -> Self {
        self.report_static_instance_mismatch = report;
        self
    }
}

// ============================================================================
// BINDER
// ============================================================================

#[derive(Clone, Copy, Debug)]
struct LoopLabels {
    break_label: LabelId,
    continue_label: LabelId,
}

/// Binds expressions and statements from one position in the program.
pub struct Binder<'a> {
    graph: &'a SymbolGraph,
    lookup: MemberLookup<'a>,
    options: BinderOptions,
    diagnostics: &'a mut DiagnosticCollector,
    file: FileId,
    namespace: SymbolId,
    containing_type: Option<SymbolId>,
    method: Option<SymbolId>,
    /// Type of `this`, when inside an instance member.
    this_type: Option<SymbolId>,
    /// Types written in the body being bound, from lowering.
    types: FxHashMap<TextRange, SymbolId>,
    locals: Vec<LocalSymbol>,
    /// Open block scopes, innermost last; each holds indexes into `locals`.
    scopes: Vec<Vec<LocalId>>,
    declared_names: FxHashSet<SmolStr>,
    loops: Vec<LoopLabels>,
    next_label: u32,
    /// Set once the current statement reported.
    suppressed: bool,
}

impl<'a> Binder<'a> {
    /// A binder at global-namespace level of the core assembly.
    pub fn new(graph: &'a SymbolGraph, diagnostics: &'a mut DiagnosticCollector) -> Self {
        Self {
            graph,
            lookup: MemberLookup::new(graph),
            options: BinderOptions::default(),
            diagnostics,
            file: FileId::new(0),
            namespace: graph.global_namespace(),
            containing_type: None,
            method: None,
            this_type: None,
            types: FxHashMap::default(),
            locals: Vec::new(),
            scopes: Vec::new(),
            declared_names: FxHashSet::default(),
            loops: Vec::new(),
            next_label: 0,
            suppressed: false,
        }
    }

    pub fn with_options(mut self, options: BinderOptions) -> Self {
        self.options = options;
        self
    }

    /// File diagnostics are reported against.
    pub fn in_file(mut self, file: FileId) -> Self {
        self.file = file;
        self
    }

    /// Bind as if inside the body of `ty`, without an instance.
    pub fn within_type(mut self, ty: SymbolId) -> Self {
        self.containing_type = Some(ty);
        self.namespace = self
            .graph
            .containing_namespace(ty)
            .unwrap_or_else(|| self.graph.global_namespace());
        self.lookup = self
            .lookup
            .with_context(AccessContext::new(self.graph.assembly(ty)).with_type(ty));
        self
    }

    /// Evaluate accessibility from `context` instead.
    pub fn with_context(mut self, context: AccessContext) -> Self {
        self.lookup = self.lookup.with_context(context);
        self
    }

    pub fn graph(&self) -> &'a SymbolGraph {
        self.graph
    }

    pub fn options(&self) -> &BinderOptions {
        &self.options
    }

    /// Every local and parameter declared so far, indexed by [`LocalId`].
    pub fn locals(&self) -> &[LocalSymbol] {
        &self.locals
    }

    /// Bind the body of a method lowered from source.
    pub fn bind_method_body(&mut self, body: &MethodBody) -> Result<BoundBlock, BindError> {
        let graph = self.graph;
        let method = body.method;
        let Some(data) = graph.method_data(method) else {
            return Err(BindError::corrupt(graph, method, "body owner is not a method"));
        };
        let owner = graph.containing_type(method);

        self.file = body.file;
        self.method = Some(method);
        self.containing_type = owner;
        self.namespace = graph
            .containing_namespace(method)
            .unwrap_or_else(|| graph.global_namespace());
        self.this_type = owner.filter(|_| !graph.is_static(method));
        let mut context = AccessContext::new(graph.assembly(method));
        if let Some(owner) = owner {
            context = context.with_type(owner);
        }
        self.lookup = self.lookup.with_context(context);
        self.types = body.types.clone();
        self.locals.clear();
        self.scopes.clear();
        self.declared_names.clear();
        self.loops.clear();

        self.scopes.push(Vec::new());
        for parameter in data.parameters() {
            let name = graph.interner().lookup(parameter.name).unwrap_or_default();
            self.declare_local(name, parameter.ty, true);
        }
        let block = self.bind_block(&body.block)?;
        self.scopes.pop();

        tracing::debug!(
            "bound body of {}: {} statements, {} locals",
            graph.display(method),
            block.statements.len(),
            self.locals.len()
        );
        Ok(block)
    }

    // ------------------------------------------------------------------
    // Shared helpers
    // ------------------------------------------------------------------

    fn error_type(&self) -> SymbolId {
        self.graph.error_type()
    }

    fn special(&self, special: SpecialType) -> SymbolId {
        self.graph.well_known().get(special)
    }

    fn bad(&self, children: Vec<BoundExpr>) -> BoundExpr {
        BoundExpr::Bad {
            children,
            ty: self.error_type(),
        }
    }

    fn declare_local(&mut self, name: SmolStr, ty: SymbolId, is_parameter: bool) -> LocalId {
        let id = LocalId(self.locals.len() as u32);
        self.declared_names.insert(name.clone());
        self.locals.push(LocalSymbol {
            id,
            name,
            ty,
            is_parameter,
        });
        if let Some(scope) = self.scopes.last_mut() {
            scope.push(id);
        }
        id
    }

    fn new_label(&mut self) -> LabelId {
        let label = LabelId(self.next_label);
        self.next_label += 1;
        label
    }

    /// Record a diagnostic unless reporting is off or the current statement
    /// already reported.
    fn report(&mut self, code: &'static str, range: TextRange, message: impl Into<String>) {
        if !self.options.report_diagnostics || self.suppressed {
            return;
        }
        let message: String = message.into();
        self.diagnostics.add(Diagnostic::error(self.file, range, code, message));
        self.suppressed = true;
    }

    fn warn(&mut self, code: &'static str, range: TextRange, message: impl Into<String>) {
        if !self.options.report_diagnostics || self.suppressed {
            return;
        }
        let message: String = message.into();
        self.diagnostics.add(Diagnostic::warning(self.file, range, code, message));
    }

    /// Report a lookup that found nothing viable. `not_found` is the message
    /// used when nothing at all was found.
    fn report_lookup_failure(&mut self, result: &LookupResult, not_found: String, range: TextRange) {
        let Some(candidate) = result.best_candidate() else {
            tracing::debug!("[BIND] unresolved: {not_found}");
            self.report(codes::UNRESOLVED, range, not_found);
            return;
        };
        let code = match candidate.viability {
            Viability::Inaccessible => codes::INACCESSIBLE,
            Viability::WrongArity => codes::WRONG_ARITY,
            Viability::NotInvocable => codes::NOT_INVOCABLE,
            Viability::Bad | Viability::Good => codes::UNRESOLVED,
        };
        let message = match result.best_error() {
            Some(error) => error.to_string(),
            None => not_found,
        };
        tracing::debug!("[BIND] lookup failed ({code}): {message}");
        self.report(code, range, message);
    }

    /// Narrow a viable result to a symbol or method group, reporting any
    /// ambiguity found on the way.
    fn materialize(&mut self, result: &LookupResult, range: TextRange) -> Option<SymbolOrMethodGroup> {
        let Materialized { value, ambiguity } = result.materialize(self.graph)?;
        let graph = self.graph;
        match ambiguity {
            None => {}
            Some(Ambiguity::MultiPath { first, second }) => {
                self.report(
                    codes::AMBIGUOUS_SAME_SCOPE,
                    range,
                    format!(
                        "ambiguity between '{}' and '{}'",
                        graph.display(first),
                        graph.display(second)
                    ),
                );
            }
            Some(Ambiguity::SameScope { first, second }) => {
                if self.options.report_same_scope_ambiguity {
                    self.report(
                        codes::AMBIGUOUS_SAME_SCOPE,
                        range,
                        format!(
                            "'{}' is declared more than once in '{}'",
                            graph.name(first),
                            graph.container(second).map(|c| graph.display(c)).unwrap_or_default()
                        ),
                    );
                }
            }
            Some(Ambiguity::MethodVsNonMethod { non_method, method }) => {
                self.report(
                    codes::AMBIGUOUS_METHOD_VS_NON_METHOD,
                    range,
                    format!(
                        "ambiguity between method '{}' and non-method '{}'; using the non-method",
                        graph.display(method),
                        graph.display(non_method)
                    ),
                );
            }
        }
        Some(value)
    }

    /// Bind a field or property symbol reached with or without a receiver.
    fn bind_member(&mut self, receiver: Option<BoundExpr>, symbol: SymbolId, range: TextRange) -> BoundExpr {
        let graph = self.graph;
        let is_static = graph.is_static(symbol);
        let mismatch = match &receiver {
            None => !is_static,
            Some(_) => is_static,
        };
        if mismatch {
            tracing::debug!(
                "[BIND] {} member '{}' accessed {}",
                if is_static { "static" } else { "instance" },
                graph.display(symbol),
                if is_static { "through a value" } else { "without an instance" }
            );
            if self.options.report_static_instance_mismatch {
                let message = if is_static {
                    format!("static member '{}' cannot be accessed through an instance", graph.display(symbol))
                } else {
                    format!("an object reference is required for '{}'", graph.display(symbol))
                };
                self.report(codes::STATIC_INSTANCE_MISMATCH, range, message);
            }
        }
        BoundExpr::Member {
            receiver: receiver.map(Box::new),
            symbol,
            ty: graph.member_type(symbol).unwrap_or_else(|| self.error_type()),
        }
    }

    /// Implicitly convert `expr` to `target`, reporting when there is no
    /// conversion.
    fn convert(&mut self, expr: BoundExpr, target: SymbolId, range: TextRange) -> BoundExpr {
        let graph = self.graph;
        match classify_expression(graph, &expr, target) {
            Some(kind) => self.wrap_conversion(expr, kind, target),
            None => {
                let source = match expr.ty() {
                    Some(ty) => graph.display(ty),
                    None if expr.is_null_literal() => "<null>".to_string(),
                    None => "<no value>".to_string(),
                };
                self.report(
                    codes::NO_CONVERSION,
                    range,
                    format!(
                        "cannot implicitly convert type '{source}' to '{}'",
                        graph.display(target)
                    ),
                );
                self.bad(vec![expr])
            }
        }
    }

    fn wrap_conversion(&self, expr: BoundExpr, kind: ConversionKind, target: SymbolId) -> BoundExpr {
        if kind == ConversionKind::Identity {
            return expr;
        }
        BoundExpr::Conversion {
            operand: Box::new(expr),
            kind,
            ty: target,
        }
    }

    /// Whether `symbol` is a namespace or a type.
    fn is_namespace_or_type(&self, symbol: SymbolId) -> bool {
        self.graph.kind(symbol) == SymbolKind::Namespace || self.graph.kind(symbol).is_type()
    }

    /// Bind a namespace or type symbol found by lookup.
    fn bind_namespace_or_type(&self, symbol: SymbolId) -> BoundExpr {
        if self.graph.kind(symbol) == SymbolKind::Namespace {
            BoundExpr::Namespace(symbol)
        } else {
            BoundExpr::Type(symbol)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = BinderOptions::default();
        assert!(options.report_diagnostics);
        assert!(!options.allow_unsafe);
        assert!(!options.report_same_scope_ambiguity);
        assert!(!options.report_static_instance_mismatch);

        let options = options.with_unsafe(true).with_diagnostics(false);
        assert!(options.allow_unsafe);
        assert!(!options.report_diagnostics);
    }
}
