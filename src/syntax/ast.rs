//! Syntax tree of the declaration language.
//!
//! Every node keeps its [`TextRange`] so diagnostics can point back at the
//! source. Predefined type keywords (`int`, `object`, ...) are resolved to a
//! [`SpecialType`] while parsing.

use smol_str::SmolStr;

use crate::base::{FileId, TextRange};
use crate::hir::{Accessibility, SpecialType, TypeKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub text: SmolStr,
    pub range: TextRange,
}

/// One parsed file.
#[derive(Clone, Debug)]
pub struct SourceUnit {
    pub file: FileId,
    pub members: Vec<NamespaceMember>,
}

#[derive(Clone, Debug)]
pub enum NamespaceMember {
    Namespace(NamespaceDeclaration),
    Type(TypeDeclaration),
}

/// `namespace A.B { ... }`
#[derive(Clone, Debug)]
pub struct NamespaceDeclaration {
    pub name: Vec<Ident>,
    pub members: Vec<NamespaceMember>,
    pub range: TextRange,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub accessibility: Option<Accessibility>,
    pub is_static: bool,
    pub is_readonly: bool,
}

#[derive(Clone, Debug)]
pub struct TypeDeclaration {
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    pub name: Ident,
    pub type_parameters: Vec<Ident>,
    pub bases: Vec<TypeSyntax>,
    pub constraints: Vec<ConstraintClause>,
    pub members: Vec<MemberDeclaration>,
    /// Enum members.
    pub enumerators: Vec<Ident>,
    /// Delegate signature; `None` return type is `void`.
    pub delegate_return: Option<TypeSyntax>,
    pub delegate_parameters: Vec<ParameterSyntax>,
    pub range: TextRange,
}

/// `where T : class, IFoo`
#[derive(Clone, Debug)]
pub struct ConstraintClause {
    pub parameter: Ident,
    pub constraints: Vec<ConstraintSyntax>,
}

#[derive(Clone, Debug)]
pub enum ConstraintSyntax {
    Class,
    Struct,
    Type(TypeSyntax),
}

#[derive(Clone, Debug)]
pub struct ParameterSyntax {
    pub ty: TypeSyntax,
    pub name: Ident,
}

#[derive(Clone, Debug)]
pub enum MemberDeclaration {
    Type(TypeDeclaration),
    Field {
        modifiers: Modifiers,
        is_const: bool,
        ty: TypeSyntax,
        name: Ident,
        range: TextRange,
    },
    Property {
        modifiers: Modifiers,
        ty: TypeSyntax,
        name: Ident,
        range: TextRange,
    },
    Indexer {
        modifiers: Modifiers,
        ty: TypeSyntax,
        parameters: Vec<ParameterSyntax>,
        range: TextRange,
    },
    Method(MethodDeclaration),
}

#[derive(Clone, Debug)]
pub struct MethodDeclaration {
    pub modifiers: Modifiers,
    /// `None` is `void`.
    pub return_type: Option<TypeSyntax>,
    pub name: Ident,
    pub type_parameters: Vec<Ident>,
    pub parameters: Vec<ParameterSyntax>,
    pub constraints: Vec<ConstraintClause>,
    pub body: Option<Block>,
    pub range: TextRange,
}

/// One segment of a possibly qualified, possibly generic type name.
#[derive(Clone, Debug)]
pub struct NameSegment {
    pub ident: Ident,
    pub type_arguments: Vec<TypeSyntax>,
}

#[derive(Clone, Debug)]
pub enum TypeSyntax {
    Predefined(SpecialType, TextRange),
    Named(Vec<NameSegment>, TextRange),
    Array {
        element: Box<TypeSyntax>,
        rank: u32,
        range: TextRange,
    },
    Pointer {
        element: Box<TypeSyntax>,
        range: TextRange,
    },
    Ref {
        element: Box<TypeSyntax>,
        range: TextRange,
    },
}

impl TypeSyntax {
    pub fn range(&self) -> TextRange {
        match self {
            TypeSyntax::Predefined(_, range) | TypeSyntax::Named(_, range) => *range,
            TypeSyntax::Array { range, .. } | TypeSyntax::Pointer { range, .. } | TypeSyntax::Ref { range, .. } => {
                *range
            }
        }
    }
}

// ============================================================================
// BODIES
// ============================================================================

#[derive(Clone, Debug)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub range: TextRange,
}

#[derive(Clone, Debug)]
pub enum Statement {
    Block(Block),
    Empty(TextRange),
    LocalDeclaration {
        ty: TypeSyntax,
        name: Ident,
        initializer: Option<Expression>,
        range: TextRange,
    },
    Expression(Expression, TextRange),
    If {
        condition: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
        range: TextRange,
    },
    While {
        condition: Expression,
        body: Box<Statement>,
        range: TextRange,
    },
    Break(TextRange),
    Continue(TextRange),
}

impl Statement {
    pub fn range(&self) -> TextRange {
        match self {
            Statement::Block(block) => block.range,
            Statement::Empty(range)
            | Statement::Expression(_, range)
            | Statement::Break(range)
            | Statement::Continue(range) => *range,
            Statement::LocalDeclaration { range, .. }
            | Statement::If { range, .. }
            | Statement::While { range, .. } => *range,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Literal {
    Integer(u64),
    Boolean(bool),
    String(SmolStr),
    Null,
}

#[derive(Clone, Debug)]
pub struct Argument {
    pub name: Option<Ident>,
    pub value: Expression,
}

#[derive(Clone, Debug)]
pub enum Expression {
    Name {
        ident: Ident,
        type_arguments: Vec<TypeSyntax>,
        range: TextRange,
    },
    /// A predefined type keyword used as an expression, as in `int.Parse`.
    PredefinedType(SpecialType, TextRange),
    Literal(Literal, TextRange),
    This(TextRange),
    Parenthesized(Box<Expression>, TextRange),
    MemberAccess {
        receiver: Box<Expression>,
        name: Ident,
        type_arguments: Vec<TypeSyntax>,
        range: TextRange,
    },
    Invocation {
        callee: Box<Expression>,
        arguments: Vec<Argument>,
        range: TextRange,
    },
    ElementAccess {
        receiver: Box<Expression>,
        arguments: Vec<Argument>,
        range: TextRange,
    },
}

impl Expression {
    pub fn range(&self) -> TextRange {
        match self {
            Expression::PredefinedType(_, range)
            | Expression::Literal(_, range)
            | Expression::This(range)
            | Expression::Parenthesized(_, range) => *range,
            Expression::Name { range, .. }
            | Expression::MemberAccess { range, .. }
            | Expression::Invocation { range, .. }
            | Expression::ElementAccess { range, .. } => *range,
        }
    }
}
