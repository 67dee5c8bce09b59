//! Declaration language front end.
//!
//! A small C#-like surface used to describe programs for the binder:
//!
//! - [`lexer`] - `logos` tokens
//! - [`ast`] - Syntax tree
//! - [`parse`] - Recursive-descent parser
//! - [`lower`] - Declares everything into a [`SymbolGraph`](crate::hir::SymbolGraph)
//!   and resolves type syntax, keeping method bodies for the binder

pub mod ast;
pub mod lexer;
mod lower;
mod parser;

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::TextRange;
use crate::hir::GraphError;

pub use ast::SourceUnit;
pub use lower::{lower, lower_assemblies, LoweredProgram, MethodBody};
pub use parser::parse;

/// Lexing, parsing and lowering failures.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("invalid token '{text}'")]
    InvalidToken { text: SmolStr, range: TextRange },

    #[error("expected {expected}, found {found}")]
    Unexpected {
        expected: String,
        found: String,
        range: TextRange,
    },

    #[error("integer literal '{text}' is too large")]
    IntegerOverflow { text: SmolStr, range: TextRange },

    #[error("the type or namespace name '{name}' could not be found")]
    UnresolvedType { name: String, range: TextRange },

    #[error("'{name}' cannot be used as a base of '{owner}'")]
    InvalidBase {
        name: String,
        owner: String,
        range: TextRange,
    },

    #[error("'{name}' does not name a type parameter of '{owner}'")]
    UnknownTypeParameter {
        name: SmolStr,
        owner: String,
        range: TextRange,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl SyntaxError {
    /// Source range of the error, when it has one.
    pub fn range(&self) -> Option<TextRange> {
        match self {
            SyntaxError::InvalidToken { range, .. }
            | SyntaxError::Unexpected { range, .. }
            | SyntaxError::IntegerOverflow { range, .. }
            | SyntaxError::UnresolvedType { range, .. }
            | SyntaxError::InvalidBase { range, .. }
            | SyntaxError::UnknownTypeParameter { range, .. } => Some(*range),
            SyntaxError::Graph(_) => None,
        }
    }
}
