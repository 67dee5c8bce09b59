//! Simple names.
//!
//! A simple name resolves against, in order: locals (innermost block first,
//! then parameters), the method's type parameters, each enclosing type from
//! the innermost outward (its type parameters, then its members including
//! inherited ones) and finally each enclosing namespace up to the global
//! namespace. The first viable result wins; when nothing is viable the best
//! failure found on the way is reported.

use super::{Binder, BoundExpr};
use crate::base::TextRange;
use crate::hir::{BindError, LookupResult, SymbolId, SymbolOrMethodGroup};

impl Binder<'_> {
    /// Bind `name` (with `arity` type arguments) as a simple name.
    pub fn bind_simple_name(
        &mut self,
        name: &str,
        arity: usize,
        invoked: bool,
        range: TextRange,
    ) -> Result<BoundExpr, BindError> {
        let graph = self.graph;
        if arity == 0 {
            if let Some(local) = self.find_local(name) {
                let symbol = &self.locals[local.0 as usize];
                return Ok(BoundExpr::Local {
                    local,
                    ty: symbol.ty,
                });
            }
            if let Some(tp) = self.method.and_then(|m| self.type_parameter_named(m, name)) {
                return Ok(BoundExpr::Type(tp));
            }
        }

        let mut failed: Option<LookupResult> = None;
        if let Some(innermost) = self.containing_type {
            for enclosing in graph.enclosing_types(innermost) {
                if arity == 0 {
                    if let Some(tp) = self.type_parameter_named(enclosing, name) {
                        return Ok(BoundExpr::Type(tp));
                    }
                }
                let result = self.lookup.lookup_member(enclosing, name, arity, invoked)?;
                if result.is_viable() {
                    let implicit_this = enclosing == innermost;
                    return Ok(self.bind_found_in_type(&result, implicit_this, range));
                }
                keep_best_failure(&mut failed, result);
            }
        }

        let mut namespace = Some(self.namespace);
        while let Some(current) = namespace {
            let result = self.lookup.lookup_in_namespace(current, name, arity)?;
            if result.is_viable() {
                return Ok(match self.materialize(&result, range) {
                    Some(SymbolOrMethodGroup::Symbol(symbol)) => self.bind_namespace_or_type(symbol),
                    _ => self.bad(Vec::new()),
                });
            }
            keep_best_failure(&mut failed, result);
            namespace = graph.container(current);
        }

        let failed = failed.unwrap_or_default();
        self.report_lookup_failure(
            &failed,
            format!("the name '{name}' does not exist in the current context"),
            range,
        );
        Ok(self.bad(Vec::new()))
    }

    fn find_local(&self, name: &str) -> Option<super::LocalId> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .copied()
            .find(|id| self.locals[id.0 as usize].name == name)
    }

    fn type_parameter_named(&self, owner: SymbolId, name: &str) -> Option<SymbolId> {
        self.graph
            .type_parameters(owner)
            .iter()
            .copied()
            .find(|&tp| self.graph.name(tp) == name)
    }

    /// Bind a member found through an enclosing type. Only members of the
    /// innermost type get `this` as their implicit receiver.
    fn bind_found_in_type(&mut self, result: &LookupResult, implicit_this: bool, range: TextRange) -> BoundExpr {
        let this = self
            .this_type
            .filter(|_| implicit_this)
            .map(|ty| BoundExpr::This { ty });
        match self.materialize(result, range) {
            Some(SymbolOrMethodGroup::Symbol(symbol)) if self.is_namespace_or_type(symbol) => {
                self.bind_namespace_or_type(symbol)
            }
            Some(SymbolOrMethodGroup::Symbol(symbol)) => {
                let receiver = this.filter(|_| !self.graph.is_static(symbol));
                self.bind_member(receiver, symbol, range)
            }
            Some(SymbolOrMethodGroup::MethodGroup(methods)) => {
                let any_instance = methods.iter().any(|&m| !self.graph.is_static(m));
                BoundExpr::MethodGroup {
                    receiver: this.filter(|_| any_instance).map(Box::new),
                    methods,
                }
            }
            None => self.bad(Vec::new()),
        }
    }
}

fn keep_best_failure(best: &mut Option<LookupResult>, result: LookupResult) {
    if result.is_empty() {
        return;
    }
    let better = match best {
        None => true,
        Some(current) => result.best_viability() > current.best_viability(),
    };
    if better {
        *best = Some(result);
    }
}
