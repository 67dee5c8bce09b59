//! Recursive-descent parser producing [`ast`](super::ast) nodes.

use smol_str::SmolStr;

use super::SyntaxError;
use super::ast::*;
use super::lexer::{lex, Lexeme, Token};
use crate::base::{FileId, TextRange, TextSize};
use crate::hir::{Accessibility, SpecialType, TypeKind};

/// Parse one source file.
pub fn parse(file: FileId, text: &str) -> Result<SourceUnit, SyntaxError> {
    let tokens = lex(text)?;
    let mut parser = Parser {
        text,
        tokens,
        pos: 0,
    };
    let members = parser.namespace_members(false)?;
    tracing::trace!("[PARSE] {file}: {} top-level declarations", members.len());
    Ok(SourceUnit { file, members })
}

struct Parser<'t> {
    text: &'t str,
    tokens: Vec<Lexeme>,
    pos: usize,
}

type PResult<T> = Result<T, SyntaxError>;

impl Parser<'_> {
    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<Token> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Option<Token> {
        self.tokens.get(self.pos + n).map(|l| l.token)
    }

    fn at(&self, token: Token) -> bool {
        self.peek() == Some(token)
    }

    fn bump(&mut self) -> Option<Lexeme> {
        let lexeme = self.tokens.get(self.pos).copied();
        if lexeme.is_some() {
            self.pos += 1;
        }
        lexeme
    }

    fn eat(&mut self, token: Token) -> Option<Lexeme> {
        if self.at(token) { self.bump() } else { None }
    }

    fn expect(&mut self, token: Token) -> PResult<Lexeme> {
        match self.eat(token) {
            Some(lexeme) => Ok(lexeme),
            None => Err(self.unexpected(token.describe())),
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        let (found, range) = match self.tokens.get(self.pos) {
            Some(l) => (format!("'{}'", &self.text[l.range]), l.range),
            None => ("end of file".to_string(), TextRange::empty(self.end_offset())),
        };
        SyntaxError::Unexpected {
            expected: expected.to_string(),
            found,
            range,
        }
    }

    fn end_offset(&self) -> TextSize {
        TextSize::of(self.text)
    }

    /// Start offset of the current token.
    fn start(&self) -> TextSize {
        self.tokens
            .get(self.pos)
            .map_or(self.end_offset(), |l| l.range.start())
    }

    /// Range from `start` to the end of the last consumed token.
    fn range_from(&self, start: TextSize) -> TextRange {
        let end = self
            .pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(start, |l| l.range.end());
        TextRange::new(start, end.max(start))
    }

    fn ident(&mut self) -> PResult<Ident> {
        let lexeme = self.expect(Token::Identifier)?;
        Ok(Ident {
            text: SmolStr::new(&self.text[lexeme.range]),
            range: lexeme.range,
        })
    }

    /// The current identifier token names a predefined type.
    fn at_predefined_type(&self) -> Option<SpecialType> {
        let lexeme = self.tokens.get(self.pos)?;
        if lexeme.token != Token::Identifier {
            return None;
        }
        SpecialType::from_keyword(&self.text[lexeme.range])
    }

    fn at_void(&self) -> bool {
        self.at_predefined_type() == Some(SpecialType::Void)
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn namespace_members(&mut self, in_braces: bool) -> PResult<Vec<NamespaceMember>> {
        let mut members = Vec::new();
        loop {
            match self.peek() {
                None if !in_braces => break,
                Some(Token::RBrace) if in_braces => break,
                Some(Token::Namespace) => members.push(NamespaceMember::Namespace(self.namespace_declaration()?)),
                _ => {
                    let start = self.start();
                    let modifiers = self.modifiers();
                    members.push(NamespaceMember::Type(self.type_declaration(modifiers, start)?));
                }
            }
        }
        Ok(members)
    }

    fn namespace_declaration(&mut self) -> PResult<NamespaceDeclaration> {
        let start = self.start();
        self.expect(Token::Namespace)?;
        let mut name = vec![self.ident()?];
        while self.eat(Token::Dot).is_some() {
            name.push(self.ident()?);
        }
        self.expect(Token::LBrace)?;
        let members = self.namespace_members(true)?;
        self.expect(Token::RBrace)?;
        Ok(NamespaceDeclaration {
            name,
            members,
            range: self.range_from(start),
        })
    }

    fn modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();
        let (mut public, mut private, mut protected, mut internal) = (false, false, false, false);
        while let Some(token) = self.peek().filter(Token::is_modifier) {
            self.bump();
            match token {
                Token::Public => public = true,
                Token::Private => private = true,
                Token::Protected => protected = true,
                Token::Internal => internal = true,
                Token::Static => modifiers.is_static = true,
                Token::Readonly => modifiers.is_readonly = true,
                _ => {}
            }
        }
        modifiers.accessibility = match (public, private, protected, internal) {
            (true, ..) => Some(Accessibility::Public),
            (_, true, true, _) => Some(Accessibility::ProtectedAndInternal),
            (_, _, true, true) => Some(Accessibility::ProtectedOrInternal),
            (_, true, _, _) => Some(Accessibility::Private),
            (_, _, true, _) => Some(Accessibility::Protected),
            (_, _, _, true) => Some(Accessibility::Internal),
            _ => None,
        };
        modifiers
    }

    fn type_declaration(&mut self, modifiers: Modifiers, start: TextSize) -> PResult<TypeDeclaration> {
        let kind = match self.peek() {
            Some(Token::Class) => TypeKind::Class,
            Some(Token::Struct) => TypeKind::Struct,
            Some(Token::Interface) => TypeKind::Interface,
            Some(Token::Enum) => TypeKind::Enum,
            Some(Token::Delegate) => TypeKind::Delegate,
            _ => return Err(self.unexpected("type declaration")),
        };
        self.bump();

        let mut decl = TypeDeclaration {
            kind,
            modifiers,
            name: Ident {
                text: SmolStr::default(),
                range: TextRange::empty(start),
            },
            type_parameters: Vec::new(),
            bases: Vec::new(),
            constraints: Vec::new(),
            members: Vec::new(),
            enumerators: Vec::new(),
            delegate_return: None,
            delegate_parameters: Vec::new(),
            range: TextRange::empty(start),
        };

        if kind == TypeKind::Delegate {
            decl.delegate_return = self.return_type()?;
            decl.name = self.ident()?;
            decl.type_parameters = self.type_parameter_list()?;
            self.expect(Token::LParen)?;
            decl.delegate_parameters = self.parameters(Token::RParen)?;
            self.expect(Token::RParen)?;
            decl.constraints = self.constraint_clauses()?;
            self.expect(Token::Semicolon)?;
            decl.range = self.range_from(start);
            return Ok(decl);
        }

        decl.name = self.ident()?;
        if kind != TypeKind::Enum {
            decl.type_parameters = self.type_parameter_list()?;
        }
        if self.eat(Token::Colon).is_some() {
            decl.bases.push(self.ty()?);
            while self.eat(Token::Comma).is_some() {
                decl.bases.push(self.ty()?);
            }
        }
        decl.constraints = self.constraint_clauses()?;
        self.expect(Token::LBrace)?;
        if kind == TypeKind::Enum {
            while !self.at(Token::RBrace) {
                decl.enumerators.push(self.ident()?);
                if self.eat(Token::Equals).is_some() {
                    self.expression()?;
                }
                if self.eat(Token::Comma).is_none() {
                    break;
                }
            }
        } else {
            while !self.at(Token::RBrace) {
                if self.peek().is_none() {
                    return Err(self.unexpected(Token::RBrace.describe()));
                }
                decl.members.push(self.member()?);
            }
        }
        self.expect(Token::RBrace)?;
        self.eat(Token::Semicolon);
        decl.range = self.range_from(start);
        Ok(decl)
    }

    fn type_parameter_list(&mut self) -> PResult<Vec<Ident>> {
        let mut parameters = Vec::new();
        if self.eat(Token::Less).is_some() {
            parameters.push(self.ident()?);
            while self.eat(Token::Comma).is_some() {
                parameters.push(self.ident()?);
            }
            self.expect(Token::Greater)?;
        }
        Ok(parameters)
    }

    fn constraint_clauses(&mut self) -> PResult<Vec<ConstraintClause>> {
        let mut clauses = Vec::new();
        while self.eat(Token::Where).is_some() {
            let parameter = self.ident()?;
            self.expect(Token::Colon)?;
            let mut constraints = vec![self.constraint()?];
            while self.eat(Token::Comma).is_some() {
                constraints.push(self.constraint()?);
            }
            clauses.push(ConstraintClause {
                parameter,
                constraints,
            });
        }
        Ok(clauses)
    }

    fn constraint(&mut self) -> PResult<ConstraintSyntax> {
        if self.eat(Token::Class).is_some() {
            Ok(ConstraintSyntax::Class)
        } else if self.eat(Token::Struct).is_some() {
            Ok(ConstraintSyntax::Struct)
        } else {
            Ok(ConstraintSyntax::Type(self.ty()?))
        }
    }

    fn parameters(&mut self, close: Token) -> PResult<Vec<ParameterSyntax>> {
        let mut parameters = Vec::new();
        if self.at(close) {
            return Ok(parameters);
        }
        loop {
            let ty = self.ty()?;
            let name = self.ident()?;
            parameters.push(ParameterSyntax { ty, name });
            if self.eat(Token::Comma).is_none() {
                return Ok(parameters);
            }
        }
    }

    /// `void` or a type.
    fn return_type(&mut self) -> PResult<Option<TypeSyntax>> {
        if self.at_void() && self.peek_at(1) != Some(Token::Star) {
            self.bump();
            return Ok(None);
        }
        self.ty().map(Some)
    }

    fn member(&mut self) -> PResult<MemberDeclaration> {
        let start = self.start();
        let modifiers = self.modifiers();
        match self.peek() {
            Some(Token::Class | Token::Struct | Token::Interface | Token::Enum | Token::Delegate) => {
                return Ok(MemberDeclaration::Type(self.type_declaration(modifiers, start)?));
            }
            Some(Token::Const) => {
                self.bump();
                let ty = self.ty()?;
                let name = self.ident()?;
                self.expect(Token::Equals)?;
                self.expression()?;
                self.expect(Token::Semicolon)?;
                return Ok(MemberDeclaration::Field {
                    modifiers,
                    is_const: true,
                    ty,
                    name,
                    range: self.range_from(start),
                });
            }
            _ => {}
        }

        let return_type = self.return_type()?;

        if self.eat(Token::This).is_some() {
            let ty = self.non_void(return_type)?;
            self.expect(Token::LBracket)?;
            let parameters = self.parameters(Token::RBracket)?;
            self.expect(Token::RBracket)?;
            self.accessors()?;
            return Ok(MemberDeclaration::Indexer {
                modifiers,
                ty,
                parameters,
                range: self.range_from(start),
            });
        }

        let name = self.ident()?;
        match self.peek() {
            Some(Token::Less | Token::LParen) => {
                let type_parameters = self.type_parameter_list()?;
                self.expect(Token::LParen)?;
                let parameters = self.parameters(Token::RParen)?;
                self.expect(Token::RParen)?;
                let constraints = self.constraint_clauses()?;
                let body = if self.at(Token::LBrace) {
                    Some(self.block()?)
                } else {
                    self.expect(Token::Semicolon)?;
                    None
                };
                Ok(MemberDeclaration::Method(MethodDeclaration {
                    modifiers,
                    return_type,
                    name,
                    type_parameters,
                    parameters,
                    constraints,
                    body,
                    range: self.range_from(start),
                }))
            }
            Some(Token::LBrace) => {
                let ty = self.non_void(return_type)?;
                self.accessors()?;
                Ok(MemberDeclaration::Property {
                    modifiers,
                    ty,
                    name,
                    range: self.range_from(start),
                })
            }
            _ => {
                let ty = self.non_void(return_type)?;
                if self.eat(Token::Equals).is_some() {
                    self.expression()?;
                }
                self.expect(Token::Semicolon)?;
                Ok(MemberDeclaration::Field {
                    modifiers,
                    is_const: false,
                    ty,
                    name,
                    range: self.range_from(start),
                })
            }
        }
    }

    fn non_void(&self, ty: Option<TypeSyntax>) -> PResult<TypeSyntax> {
        ty.ok_or_else(|| self.unexpected("'('"))
    }

    /// `{ get; set; }` or accessors with bodies; the bodies are not kept.
    fn accessors(&mut self) -> PResult<()> {
        self.expect(Token::LBrace)?;
        while !self.at(Token::RBrace) {
            self.modifiers();
            self.ident()?;
            if self.at(Token::LBrace) {
                self.block()?;
            } else {
                self.expect(Token::Semicolon)?;
            }
        }
        self.expect(Token::RBrace)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    fn ty(&mut self) -> PResult<TypeSyntax> {
        let start = self.start();
        if self.eat(Token::Ref).is_some() {
            let element = self.ty()?;
            return Ok(TypeSyntax::Ref {
                element: Box::new(element),
                range: self.range_from(start),
            });
        }

        let mut ty = if let Some(special) = self.at_predefined_type() {
            self.bump();
            TypeSyntax::Predefined(special, self.range_from(start))
        } else {
            let mut segments = vec![self.name_segment()?];
            while self.at(Token::Dot) && self.peek_at(1) == Some(Token::Identifier) {
                self.bump();
                segments.push(self.name_segment()?);
            }
            TypeSyntax::Named(segments, self.range_from(start))
        };

        loop {
            if self.at(Token::LBracket) && matches!(self.peek_at(1), Some(Token::Comma | Token::RBracket)) {
                self.bump();
                let mut rank = 1;
                while self.eat(Token::Comma).is_some() {
                    rank += 1;
                }
                self.expect(Token::RBracket)?;
                ty = TypeSyntax::Array {
                    element: Box::new(ty),
                    rank,
                    range: self.range_from(start),
                };
            } else if self.eat(Token::Star).is_some() {
                ty = TypeSyntax::Pointer {
                    element: Box::new(ty),
                    range: self.range_from(start),
                };
            } else {
                return Ok(ty);
            }
        }
    }

    fn name_segment(&mut self) -> PResult<NameSegment> {
        let ident = self.ident()?;
        let type_arguments = self.type_argument_list()?;
        Ok(NameSegment {
            ident,
            type_arguments,
        })
    }

    fn type_argument_list(&mut self) -> PResult<Vec<TypeSyntax>> {
        let mut arguments = Vec::new();
        if self.eat(Token::Less).is_some() {
            arguments.push(self.ty()?);
            while self.eat(Token::Comma).is_some() {
                arguments.push(self.ty()?);
            }
            self.expect(Token::Greater)?;
        }
        Ok(arguments)
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn block(&mut self) -> PResult<Block> {
        let start = self.start();
        self.expect(Token::LBrace)?;
        let mut statements = Vec::new();
        while !self.at(Token::RBrace) {
            if self.peek().is_none() {
                return Err(self.unexpected(Token::RBrace.describe()));
            }
            statements.push(self.statement()?);
        }
        self.expect(Token::RBrace)?;
        Ok(Block {
            statements,
            range: self.range_from(start),
        })
    }

    fn statement(&mut self) -> PResult<Statement> {
        let start = self.start();
        match self.peek() {
            Some(Token::LBrace) => Ok(Statement::Block(self.block()?)),
            Some(Token::Semicolon) => {
                self.bump();
                Ok(Statement::Empty(self.range_from(start)))
            }
            Some(Token::If) => {
                self.bump();
                self.expect(Token::LParen)?;
                let condition = self.expression()?;
                self.expect(Token::RParen)?;
                let then_branch = Box::new(self.statement()?);
                let else_branch = match self.eat(Token::Else) {
                    Some(_) => Some(Box::new(self.statement()?)),
                    None => None,
                };
                Ok(Statement::If {
                    condition,
                    then_branch,
                    else_branch,
                    range: self.range_from(start),
                })
            }
            Some(Token::While) => {
                self.bump();
                self.expect(Token::LParen)?;
                let condition = self.expression()?;
                self.expect(Token::RParen)?;
                let body = Box::new(self.statement()?);
                Ok(Statement::While {
                    condition,
                    body,
                    range: self.range_from(start),
                })
            }
            Some(Token::Break) => {
                self.bump();
                self.expect(Token::Semicolon)?;
                Ok(Statement::Break(self.range_from(start)))
            }
            Some(Token::Continue) => {
                self.bump();
                self.expect(Token::Semicolon)?;
                Ok(Statement::Continue(self.range_from(start)))
            }
            _ => {
                if let Some(local) = self.try_local_declaration(start)? {
                    return Ok(local);
                }
                let expression = self.expression()?;
                self.expect(Token::Semicolon)?;
                Ok(Statement::Expression(expression, self.range_from(start)))
            }
        }
    }

    /// `Type name [= expr];`, or `None` (with the position restored) when the
    /// tokens do not start a local declaration.
    fn try_local_declaration(&mut self, start: TextSize) -> PResult<Option<Statement>> {
        let saved = self.pos;
        let is_declaration = self.ty().is_ok()
            && self.at(Token::Identifier)
            && matches!(self.peek_at(1), Some(Token::Semicolon | Token::Equals));
        self.pos = saved;
        if !is_declaration {
            return Ok(None);
        }
        let ty = self.ty()?;
        let name = self.ident()?;
        let initializer = match self.eat(Token::Equals) {
            Some(_) => Some(self.expression()?),
            None => None,
        };
        self.expect(Token::Semicolon)?;
        Ok(Some(Statement::LocalDeclaration {
            ty,
            name,
            initializer,
            range: self.range_from(start),
        }))
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn expression(&mut self) -> PResult<Expression> {
        let start = self.start();
        let mut expr = self.primary()?;
        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    self.bump();
                    let name = self.ident()?;
                    let type_arguments = self.try_type_arguments();
                    expr = Expression::MemberAccess {
                        receiver: Box::new(expr),
                        name,
                        type_arguments,
                        range: self.range_from(start),
                    };
                }
                Some(Token::LParen) => {
                    self.bump();
                    let arguments = self.arguments(Token::RParen)?;
                    self.expect(Token::RParen)?;
                    expr = Expression::Invocation {
                        callee: Box::new(expr),
                        arguments,
                        range: self.range_from(start),
                    };
                }
                Some(Token::LBracket) => {
                    self.bump();
                    let arguments = self.arguments(Token::RBracket)?;
                    self.expect(Token::RBracket)?;
                    expr = Expression::ElementAccess {
                        receiver: Box::new(expr),
                        arguments,
                        range: self.range_from(start),
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    /// `<T, U>` after a name in an expression; restores the position if the
    /// tokens do not form a type argument list.
    fn try_type_arguments(&mut self) -> Vec<TypeSyntax> {
        if !self.at(Token::Less) {
            return Vec::new();
        }
        let saved = self.pos;
        match self.type_argument_list() {
            Ok(arguments) => arguments,
            Err(_) => {
                self.pos = saved;
                Vec::new()
            }
        }
    }

    fn primary(&mut self) -> PResult<Expression> {
        let start = self.start();
        if let Some(special) = self.at_predefined_type() {
            self.bump();
            return Ok(Expression::PredefinedType(special, self.range_from(start)));
        }
        let Some(lexeme) = self.bump() else {
            return Err(self.unexpected("expression"));
        };
        let literal = |literal| Ok(Expression::Literal(literal, lexeme.range));
        match lexeme.token {
            Token::Identifier => {
                let ident = Ident {
                    text: SmolStr::new(&self.text[lexeme.range]),
                    range: lexeme.range,
                };
                let type_arguments = self.try_type_arguments();
                Ok(Expression::Name {
                    ident,
                    type_arguments,
                    range: self.range_from(start),
                })
            }
            Token::Integer => {
                let text = &self.text[lexeme.range];
                match text.parse::<u64>() {
                    Ok(value) => literal(Literal::Integer(value)),
                    Err(_) => Err(SyntaxError::IntegerOverflow {
                        text: SmolStr::new(text),
                        range: lexeme.range,
                    }),
                }
            }
            Token::String => {
                let text = &self.text[lexeme.range];
                literal(Literal::String(SmolStr::new(&text[1..text.len() - 1])))
            }
            Token::True => literal(Literal::Boolean(true)),
            Token::False => literal(Literal::Boolean(false)),
            Token::Null => literal(Literal::Null),
            Token::This => Ok(Expression::This(lexeme.range)),
            Token::LParen => {
                let inner = self.expression()?;
                self.expect(Token::RParen)?;
                Ok(Expression::Parenthesized(Box::new(inner), self.range_from(start)))
            }
            _ => {
                self.pos -= 1;
                Err(self.unexpected("expression"))
            }
        }
    }

    fn arguments(&mut self, close: Token) -> PResult<Vec<Argument>> {
        let mut arguments = Vec::new();
        if self.at(close) {
            return Ok(arguments);
        }
        loop {
            let name = if self.at(Token::Identifier) && self.peek_at(1) == Some(Token::Colon) {
                let name = self.ident()?;
                self.bump();
                Some(name)
            } else {
                None
            };
            let value = self.expression()?;
            arguments.push(Argument { name, value });
            if self.eat(Token::Comma).is_none() {
                return Ok(arguments);
            }
        }
    }
}
