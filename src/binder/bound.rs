//! Bound tree produced by the binder.

use smol_str::SmolStr;

use super::conversions::ConversionKind;
use crate::hir::SymbolId;
use crate::syntax::ast::Literal;

/// Index of a local (or parameter) within one method body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalSymbol {
    pub id: LocalId,
    pub name: SmolStr,
    pub ty: SymbolId,
    pub is_parameter: bool,
}

/// Jump target of a `while` loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LabelId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoundExpr {
    Namespace(SymbolId),
    Type(SymbolId),
    MethodGroup {
        receiver: Option<Box<BoundExpr>>,
        methods: Vec<SymbolId>,
    },
    /// Field or property access. `receiver` is `None` for static access.
    Member {
        receiver: Option<Box<BoundExpr>>,
        symbol: SymbolId,
        ty: SymbolId,
    },
    Local {
        local: LocalId,
        ty: SymbolId,
    },
    This {
        ty: SymbolId,
    },
    /// `ty` is `None` for `null`.
    Literal {
        value: Literal,
        ty: Option<SymbolId>,
    },
    ArrayAccess {
        array: Box<BoundExpr>,
        indices: Vec<BoundExpr>,
        ty: SymbolId,
    },
    PointerElementAccess {
        pointer: Box<BoundExpr>,
        index: Box<BoundExpr>,
        ty: SymbolId,
    },
    IndexerAccess {
        receiver: Box<BoundExpr>,
        indexer: SymbolId,
        arguments: Vec<BoundExpr>,
        ty: SymbolId,
    },
    Conversion {
        operand: Box<BoundExpr>,
        kind: ConversionKind,
        ty: SymbolId,
    },
    /// A call whose target is not resolved further: `callee` is a method
    /// group or a delegate-typed value. `ty` is `None` when the result is
    /// `void`.
    Invocation {
        callee: Box<BoundExpr>,
        arguments: Vec<BoundExpr>,
        ty: Option<SymbolId>,
    },
    /// A construct recognized but not bound further.
    Unsupported {
        reason: &'static str,
        children: Vec<BoundExpr>,
        ty: SymbolId,
    },
    /// Failed binding; `ty` is the error type.
    Bad {
        children: Vec<BoundExpr>,
        ty: SymbolId,
    },
}

impl BoundExpr {
    /// Type of the value, if this is a value.
    pub fn ty(&self) -> Option<SymbolId> {
        match self {
            BoundExpr::Namespace(_) | BoundExpr::Type(_) | BoundExpr::MethodGroup { .. } => None,
            BoundExpr::Literal { ty, .. } | BoundExpr::Invocation { ty, .. } => *ty,
            BoundExpr::Member { ty, .. }
            | BoundExpr::Local { ty, .. }
            | BoundExpr::This { ty }
            | BoundExpr::ArrayAccess { ty, .. }
            | BoundExpr::PointerElementAccess { ty, .. }
            | BoundExpr::IndexerAccess { ty, .. }
            | BoundExpr::Conversion { ty, .. }
            | BoundExpr::Unsupported { ty, .. }
            | BoundExpr::Bad { ty, .. } => Some(*ty),
        }
    }

    /// Whether binding already failed here (and was reported, if reporting is on).
    pub fn is_bad(&self) -> bool {
        matches!(self, BoundExpr::Bad { .. } | BoundExpr::Unsupported { .. })
    }

    pub fn is_null_literal(&self) -> bool {
        matches!(
            self,
            BoundExpr::Literal {
                value: Literal::Null,
                ..
            }
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundBlock {
    pub statements: Vec<BoundStmt>,
    /// Locals declared directly in this block.
    pub locals: Vec<LocalSymbol>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoundStmt {
    Block(BoundBlock),
    Expression(BoundExpr),
    LocalDeclaration {
        local: LocalId,
        initializer: Option<BoundExpr>,
    },
    If {
        condition: BoundExpr,
        then_branch: Box<BoundStmt>,
        else_branch: Option<Box<BoundStmt>>,
    },
    While {
        condition: BoundExpr,
        body: Box<BoundStmt>,
        break_label: LabelId,
        continue_label: LabelId,
    },
    Break(LabelId),
    Continue(LabelId),
    Empty,
    /// A statement that could not be bound, such as `break` outside a loop.
    Bad,
}
