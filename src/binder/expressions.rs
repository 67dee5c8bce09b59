//! Expressions: dispatch over syntax, literals and invocations.

use super::{Binder, BoundArgument, BoundExpr};
use crate::base::TextRange;
use crate::hir::{codes, BindError, SpecialType, SymbolId, SymbolOrMethodGroup};
use crate::syntax::ast::{Argument, Expression, Literal};

impl Binder<'_> {
    pub fn bind_expression(&mut self, expr: &Expression) -> Result<BoundExpr, BindError> {
        self.bind_expression_inner(expr, false)
    }

    fn bind_expression_inner(&mut self, expr: &Expression, invoked: bool) -> Result<BoundExpr, BindError> {
        match expr {
            Expression::Name {
                ident,
                type_arguments,
                range,
            } => self.bind_simple_name(&ident.text, type_arguments.len(), invoked, *range),
            Expression::PredefinedType(special, _) => Ok(BoundExpr::Type(self.special(*special))),
            Expression::Literal(literal, _) => Ok(self.bind_literal(literal)),
            Expression::This(range) => Ok(self.bind_this(*range)),
            Expression::Parenthesized(inner, _) => self.bind_expression_inner(inner, invoked),
            Expression::MemberAccess {
                receiver,
                name,
                type_arguments,
                range,
            } => {
                let left = self.bind_expression(receiver)?;
                self.classify_member_access(left, &name.text, type_arguments.len(), invoked, *range)
            }
            Expression::Invocation {
                callee,
                arguments,
                range,
            } => self.bind_invocation(callee, arguments, *range),
            Expression::ElementAccess {
                receiver,
                arguments,
                range,
            } => {
                let receiver = self.bind_expression(receiver)?;
                let arguments = self.bind_arguments(arguments)?;
                self.bind_element_access(receiver, arguments, *range)
            }
        }
    }

    fn bind_arguments(&mut self, arguments: &[Argument]) -> Result<Vec<BoundArgument>, BindError> {
        arguments
            .iter()
            .map(|argument| {
                Ok(BoundArgument {
                    name: argument.name.as_ref().map(|n| n.text.clone()),
                    value: self.bind_expression(&argument.value)?,
                    range: argument.value.range(),
                })
            })
            .collect()
    }

    /// Integer literals take the first of `int`, `uint`, `long`, `ulong` that
    /// holds their value.
    fn bind_literal(&self, literal: &Literal) -> BoundExpr {
        let ty = match literal {
            Literal::Integer(value) => Some(self.special(match *value {
                v if v <= i32::MAX as u64 => SpecialType::Int32,
                v if v <= u32::MAX as u64 => SpecialType::UInt32,
                v if v <= i64::MAX as u64 => SpecialType::Int64,
                _ => SpecialType::UInt64,
            })),
            Literal::Boolean(_) => Some(self.special(SpecialType::Boolean)),
            Literal::String(_) => Some(self.special(SpecialType::String)),
            Literal::Null => None,
        };
        BoundExpr::Literal {
            value: literal.clone(),
            ty,
        }
    }

    fn bind_this(&mut self, range: TextRange) -> BoundExpr {
        match self.this_type {
            Some(ty) => BoundExpr::This { ty },
            None => {
                self.report(
                    codes::UNRESOLVED,
                    range,
                    "keyword 'this' is not available in the current context",
                );
                self.bad(Vec::new())
            }
        }
    }

    /// `callee(arguments)`. Method groups and delegate values are invoked
    /// without choosing an overload.
    fn bind_invocation(
        &mut self,
        callee: &Expression,
        arguments: &[Argument],
        range: TextRange,
    ) -> Result<BoundExpr, BindError> {
        let graph = self.graph;
        let callee = self.bind_expression_inner(callee, true)?;
        let arguments: Vec<BoundExpr> = self
            .bind_arguments(arguments)?
            .into_iter()
            .map(|a| a.value)
            .collect();

        if let BoundExpr::MethodGroup { methods, .. } = &callee {
            let ty = self.group_return_type(methods);
            return Ok(BoundExpr::Invocation {
                callee: Box::new(callee),
                arguments,
                ty,
            });
        }
        if !callee.is_bad() {
            if let Some(delegate) = callee.ty().filter(|&t| graph.is_delegate_type(t)) {
                let ty = self.delegate_return_type(delegate)?;
                return Ok(BoundExpr::Invocation {
                    callee: Box::new(callee),
                    arguments,
                    ty,
                });
            }
            let what = match &callee {
                BoundExpr::Namespace(ns) => format!("'{}' is a namespace and", graph.display(*ns)),
                BoundExpr::Type(ty) => format!("'{}' is a type and", graph.display(*ty)),
                _ => "the expression".to_string(),
            };
            self.report(codes::NOT_INVOCABLE, range, format!("{what} cannot be used like a method"));
        }
        let mut children = vec![callee];
        children.extend(arguments);
        Ok(self.bad(children))
    }

    /// Without overload resolution the result type is known only when every
    /// candidate agrees on it.
    fn group_return_type(&self, methods: &[SymbolId]) -> Option<SymbolId> {
        let graph = self.graph;
        let mut returns = methods
            .iter()
            .map(|&m| graph.method_data(m).and_then(|d| d.return_type()));
        let first = returns.next().flatten();
        if returns.all(|r| r == first) {
            first
        } else {
            Some(self.error_type())
        }
    }

    fn delegate_return_type(&self, delegate: SymbolId) -> Result<Option<SymbolId>, BindError> {
        let graph = self.graph;
        let invoke = self.lookup.lookup_member(delegate, "Invoke", 0, true)?;
        Ok(match invoke.materialize(graph).map(|m| m.value) {
            Some(SymbolOrMethodGroup::MethodGroup(methods)) => methods
                .first()
                .and_then(|&m| graph.method_data(m))
                .and_then(|d| d.return_type()),
            _ => Some(self.error_type()),
        })
    }
}
