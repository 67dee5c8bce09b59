//! Member access: `left.name`.

use super::{Binder, BoundExpr};
use crate::base::TextRange;
use crate::hir::{codes, BindError, SymbolKind, SymbolOrMethodGroup, TypeKind};

impl Binder<'_> {
    /// Classify `left.name` where `left` is already bound.
    ///
    /// - a namespace on the left yields a nested namespace or a type;
    /// - a type on the left yields a nested type, a static member or a method
    ///   group without receiver;
    /// - a value on the left yields an instance member or a method group with
    ///   the value as receiver.
    ///
    /// Failures report one diagnostic at `range` and return [`BoundExpr::Bad`].
    pub fn classify_member_access(
        &mut self,
        left: BoundExpr,
        name: &str,
        arity: usize,
        invoked: bool,
        range: TextRange,
    ) -> Result<BoundExpr, BindError> {
        let graph = self.graph;
        match left {
            BoundExpr::Namespace(namespace) => {
                let result = self.lookup.lookup_in_namespace(namespace, name, arity)?;
                if !result.is_viable() {
                    self.report_lookup_failure(
                        &result,
                        format!(
                            "the type or namespace name '{name}' does not exist in the namespace '{}'",
                            graph.display(namespace)
                        ),
                        range,
                    );
                    return Ok(self.bad(vec![BoundExpr::Namespace(namespace)]));
                }
                Ok(match self.materialize(&result, range) {
                    Some(SymbolOrMethodGroup::Symbol(symbol)) if self.is_namespace_or_type(symbol) => {
                        self.bind_namespace_or_type(symbol)
                    }
                    _ => self.bad(vec![BoundExpr::Namespace(namespace)]),
                })
            }

            BoundExpr::Type(ty) if graph.type_kind(ty) == Some(TypeKind::TypeParameter) => {
                self.report(
                    codes::TYPE_PARAMETER_MEMBER_LOOKUP,
                    range,
                    format!("'{}' is a type parameter, which is not valid in the given context", graph.display(ty)),
                );
                Ok(self.bad(vec![BoundExpr::Type(ty)]))
            }

            BoundExpr::Type(ty) => {
                let result = self.lookup.lookup_member(ty, name, arity, invoked)?;
                if !result.is_viable() {
                    self.report_lookup_failure(
                        &result,
                        format!("'{}' does not contain a definition for '{name}'", graph.display(ty)),
                        range,
                    );
                    return Ok(self.bad(vec![BoundExpr::Type(ty)]));
                }
                Ok(match self.materialize(&result, range) {
                    Some(SymbolOrMethodGroup::Symbol(symbol)) if self.is_namespace_or_type(symbol) => {
                        BoundExpr::Type(symbol)
                    }
                    Some(SymbolOrMethodGroup::Symbol(symbol)) => self.bind_member(None, symbol, range),
                    Some(SymbolOrMethodGroup::MethodGroup(methods)) => BoundExpr::MethodGroup {
                        receiver: None,
                        methods,
                    },
                    None => self.bad(vec![BoundExpr::Type(ty)]),
                })
            }

            BoundExpr::MethodGroup { .. } => {
                self.report(
                    codes::METHOD_GROUP_MEMBER_ACCESS,
                    range,
                    format!("cannot access '{name}' on a method group"),
                );
                Ok(self.bad(vec![left]))
            }

            left if left.is_bad() => Ok(self.bad(vec![left])),

            left => self.classify_value_member_access(left, name, arity, invoked, range),
        }
    }

    fn classify_value_member_access(
        &mut self,
        left: BoundExpr,
        name: &str,
        arity: usize,
        invoked: bool,
        range: TextRange,
    ) -> Result<BoundExpr, BindError> {
        let graph = self.graph;
        let Some(ty) = left.ty() else {
            let what = if left.is_null_literal() { "'null'" } else { "an expression of type 'void'" };
            self.report(codes::UNRESOLVED, range, format!("operator '.' cannot be applied to {what}"));
            return Ok(self.bad(vec![left]));
        };
        if graph.is_error_type(ty) {
            return Ok(self.bad(vec![left]));
        }

        let result = self.lookup.lookup_member(ty, name, arity, invoked)?;
        if !result.is_viable() {
            self.report_lookup_failure(
                &result,
                format!("'{}' does not contain a definition for '{name}'", graph.display(ty)),
                range,
            );
            return Ok(self.bad(vec![left]));
        }
        Ok(match self.materialize(&result, range) {
            Some(SymbolOrMethodGroup::Symbol(symbol)) if self.is_namespace_or_type(symbol) => {
                self.report(
                    codes::TYPE_THROUGH_EXPRESSION,
                    range,
                    format!(
                        "'{}': cannot reference a {} through an expression; use the type name instead",
                        graph.display(symbol),
                        if graph.kind(symbol) == SymbolKind::Namespace { "namespace" } else { "type" }
                    ),
                );
                self.bad(vec![left])
            }
            Some(SymbolOrMethodGroup::Symbol(symbol)) => self.bind_member(Some(left), symbol, range),
            Some(SymbolOrMethodGroup::MethodGroup(methods)) => BoundExpr::MethodGroup {
                receiver: Some(Box::new(left)),
                methods,
            },
            None => self.bad(vec![left]),
        })
    }
}
