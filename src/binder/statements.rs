//! Statements and blocks.

use super::{Binder, BoundBlock, BoundExpr, BoundStmt, LoopLabels};
use crate::base::TextRange;
use crate::hir::{codes, BindError, SpecialType};
use crate::syntax::ast::{Block, Expression, Statement};

impl Binder<'_> {
    pub fn bind_block(&mut self, block: &Block) -> Result<BoundBlock, BindError> {
        self.scopes.push(Vec::new());
        let statements = block
            .statements
            .iter()
            .map(|s| self.bind_statement(s))
            .collect::<Result<Vec<_>, _>>();
        let declared = self.scopes.pop().unwrap_or_default();
        Ok(BoundBlock {
            statements: statements?,
            locals: declared
                .into_iter()
                .map(|id| self.locals[id.0 as usize].clone())
                .collect(),
        })
    }

    /// Bind one statement. A diagnostic reported inside it silences the rest
    /// of the statement; nested statements report on their own.
    pub fn bind_statement(&mut self, statement: &Statement) -> Result<BoundStmt, BindError> {
        let outer = std::mem::replace(&mut self.suppressed, false);
        let bound = self.bind_statement_inner(statement);
        self.suppressed = outer;
        bound
    }

    fn bind_statement_inner(&mut self, statement: &Statement) -> Result<BoundStmt, BindError> {
        match statement {
            Statement::Block(block) => Ok(BoundStmt::Block(self.bind_block(block)?)),
            Statement::Empty(_) => Ok(BoundStmt::Empty),
            Statement::Expression(expr, _) => Ok(BoundStmt::Expression(self.bind_expression(expr)?)),
            Statement::LocalDeclaration {
                ty,
                name,
                initializer,
                ..
            } => {
                let local_type = self
                    .types
                    .get(&ty.range())
                    .copied()
                    .unwrap_or_else(|| self.error_type());
                if self.declared_names.contains(&name.text) {
                    self.report(
                        codes::DUPLICATE_LOCAL,
                        name.range,
                        format!("a local named '{}' is already defined in this method", name.text),
                    );
                }
                let initializer = match initializer {
                    Some(init) => {
                        let value = self.bind_expression(init)?;
                        Some(self.convert(value, local_type, init.range()))
                    }
                    None => None,
                };
                let local = self.declare_local(name.text.clone(), local_type, false);
                Ok(BoundStmt::LocalDeclaration { local, initializer })
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let condition = self.bind_condition(condition)?;
                if let Statement::Empty(range) = then_branch.as_ref() {
                    self.warn(
                        codes::POSSIBLE_MISTAKEN_EMPTY_STATEMENT,
                        *range,
                        "possible mistaken empty statement",
                    );
                }
                let then_branch = Box::new(self.bind_statement(then_branch)?);
                let else_branch = match else_branch {
                    Some(e) => Some(Box::new(self.bind_statement(e)?)),
                    None => None,
                };
                Ok(BoundStmt::If {
                    condition,
                    then_branch,
                    else_branch,
                })
            }
            Statement::While { condition, body, .. } => {
                let condition = self.bind_condition(condition)?;
                let labels = LoopLabels {
                    break_label: self.new_label(),
                    continue_label: self.new_label(),
                };
                self.loops.push(labels);
                let body = self.bind_statement(body);
                self.loops.pop();
                Ok(BoundStmt::While {
                    condition,
                    body: Box::new(body?),
                    break_label: labels.break_label,
                    continue_label: labels.continue_label,
                })
            }
            Statement::Break(range) => Ok(match self.loops.last().copied() {
                Some(labels) => BoundStmt::Break(labels.break_label),
                None => self.no_enclosing_loop(*range),
            }),
            Statement::Continue(range) => Ok(match self.loops.last().copied() {
                Some(labels) => BoundStmt::Continue(labels.continue_label),
                None => self.no_enclosing_loop(*range),
            }),
        }
    }

    fn bind_condition(&mut self, condition: &Expression) -> Result<BoundExpr, BindError> {
        let value = self.bind_expression(condition)?;
        let boolean = self.special(SpecialType::Boolean);
        Ok(self.convert(value, boolean, condition.range()))
    }

    fn no_enclosing_loop(&mut self, range: TextRange) -> BoundStmt {
        self.report(
            codes::NO_ENCLOSING_LOOP,
            range,
            "no enclosing loop out of which to break or continue",
        );
        BoundStmt::Bad
    }
}
