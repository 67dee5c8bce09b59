//! Element access: `receiver[args]` on arrays, pointers and indexers.

use smol_str::SmolStr;

use super::{classify_expression, Binder, BoundExpr};
use crate::base::TextRange;
use crate::hir::{codes, BindError, SpecialType, SymbolId, TypeKind, INDEXER_NAME};

/// An argument after binding its value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundArgument {
    pub name: Option<SmolStr>,
    pub value: BoundExpr,
    pub range: TextRange,
}

/// Array indices convert to the first of these that works.
const INDEX_TYPES: [SpecialType; 4] = [
    SpecialType::Int32,
    SpecialType::UInt32,
    SpecialType::Int64,
    SpecialType::UInt64,
];

impl Binder<'_> {
    pub fn bind_element_access(
        &mut self,
        receiver: BoundExpr,
        arguments: Vec<BoundArgument>,
        range: TextRange,
    ) -> Result<BoundExpr, BindError> {
        if receiver.is_bad() {
            return Ok(self.bad(with_arguments(receiver, arguments)));
        }
        let graph = self.graph;
        let Some(ty) = receiver.ty() else {
            self.report(codes::BAD_INDEXER, range, "cannot apply indexing with [] to this expression");
            return Ok(self.bad(with_arguments(receiver, arguments)));
        };
        match graph.type_kind(ty) {
            Some(TypeKind::Error) => Ok(self.bad(with_arguments(receiver, arguments))),
            Some(TypeKind::Array) => Ok(self.bind_array_access(receiver, ty, arguments, range)),
            Some(TypeKind::Pointer) => Ok(self.bind_pointer_access(receiver, ty, arguments, range)),
            Some(_) => self.bind_indexer_access(receiver, ty, arguments, range),
            None => Err(BindError::corrupt(graph, ty, "value type is not a type")),
        }
    }

    fn bind_array_access(
        &mut self,
        array: BoundExpr,
        ty: SymbolId,
        arguments: Vec<BoundArgument>,
        range: TextRange,
    ) -> BoundExpr {
        let graph = self.graph;
        if let Some(named) = arguments.iter().find(|a| a.name.is_some()) {
            let at = named.range;
            self.report(codes::NAMED_ARGUMENT_ON_ARRAY_INDEX, at, "array access cannot have named arguments");
            return self.bad(with_arguments(array, arguments));
        }
        let rank = graph.rank(ty) as usize;
        if arguments.len() != rank {
            self.report(
                codes::BAD_INDEX_COUNT,
                range,
                format!("wrong number of indices inside []; expected {rank}"),
            );
            return self.bad(with_arguments(array, arguments));
        }
        let indices = arguments.into_iter().map(|a| self.convert_index(a)).collect();
        BoundExpr::ArrayAccess {
            array: Box::new(array),
            indices,
            ty: graph.element_type(ty).unwrap_or_else(|| self.error_type()),
        }
    }

    fn bind_pointer_access(
        &mut self,
        pointer: BoundExpr,
        ty: SymbolId,
        arguments: Vec<BoundArgument>,
        range: TextRange,
    ) -> BoundExpr {
        let graph = self.graph;
        if !self.options.allow_unsafe {
            self.report(
                codes::UNSAFE_NEEDED,
                range,
                "pointers may only be used in an unsafe context",
            );
            return self.bad(with_arguments(pointer, arguments));
        }
        if let Some(named) = arguments.iter().find(|a| a.name.is_some()) {
            let at = named.range;
            self.report(codes::NAMED_ARGUMENT_ON_ARRAY_INDEX, at, "pointer access cannot have named arguments");
            return self.bad(with_arguments(pointer, arguments));
        }
        if arguments.len() != 1 {
            self.report(
                codes::BAD_INDEX_COUNT,
                range,
                "a pointer must be indexed by only one value",
            );
            return self.bad(with_arguments(pointer, arguments));
        }
        let pointee = graph.element_type(ty).unwrap_or_else(|| self.error_type());
        if graph.special_type(pointee) == Some(SpecialType::Void) {
            self.report(
                codes::VOID_POINTER_INDEX,
                range,
                "the operation is undefined on void pointers",
            );
            return self.bad(with_arguments(pointer, arguments));
        }
        let mut arguments = arguments;
        let Some(index) = arguments.pop() else {
            return self.bad(vec![pointer]);
        };
        BoundExpr::PointerElementAccess {
            pointer: Box::new(pointer),
            index: Box::new(self.convert_index(index)),
            ty: pointee,
        }
    }

    fn bind_indexer_access(
        &mut self,
        receiver: BoundExpr,
        ty: SymbolId,
        arguments: Vec<BoundArgument>,
        range: TextRange,
    ) -> Result<BoundExpr, BindError> {
        let graph = self.graph;
        let result = self.lookup.lookup_member(ty, INDEXER_NAME, 0, false)?;
        let candidates: Vec<SymbolId> = if result.is_viable() {
            result
                .symbols()
                .into_iter()
                .filter(|&s| {
                    graph
                        .property_data(s)
                        .is_some_and(|p| p.parameters().len() == arguments.len())
                })
                .collect()
        } else {
            Vec::new()
        };

        match candidates.as_slice() {
            [] => {
                if result.is_viable() || result.is_empty() {
                    self.report(
                        codes::BAD_INDEXER,
                        range,
                        format!("cannot apply indexing with [] to an expression of type '{}'", graph.display(ty)),
                    );
                } else {
                    self.report_lookup_failure(&result, String::new(), range);
                }
                Ok(self.bad(with_arguments(receiver, arguments)))
            }
            [indexer] => {
                let indexer = *indexer;
                let parameters = graph
                    .property_data(indexer)
                    .map(|p| p.parameters().to_vec())
                    .unwrap_or_default();
                let arguments = arguments
                    .into_iter()
                    .zip(parameters)
                    .map(|(argument, parameter)| self.convert(argument.value, parameter.ty, argument.range))
                    .collect();
                Ok(BoundExpr::IndexerAccess {
                    receiver: Box::new(receiver),
                    indexer,
                    arguments,
                    ty: graph.member_type(indexer).unwrap_or_else(|| self.error_type()),
                })
            }
            _ => {
                tracing::debug!(
                    "[BIND] {} indexers of {} take {} arguments",
                    candidates.len(),
                    graph.display(ty),
                    arguments.len()
                );
                self.report(
                    codes::UNSUPPORTED,
                    range,
                    format!("choosing between {} indexers of '{}' is not supported", candidates.len(), graph.display(ty)),
                );
                Ok(BoundExpr::Unsupported {
                    reason: "indexer overload resolution",
                    children: with_arguments(receiver, arguments),
                    ty: self.error_type(),
                })
            }
        }
    }

    /// Convert an array or pointer index to the first integral index type
    /// that accepts it.
    fn convert_index(&mut self, argument: BoundArgument) -> BoundExpr {
        let graph = self.graph;
        for special in INDEX_TYPES {
            let target = self.special(special);
            if let Some(kind) = classify_expression(graph, &argument.value, target) {
                return self.wrap_conversion(argument.value, kind, target);
            }
        }
        let int = self.special(SpecialType::Int32);
        self.convert(argument.value, int, argument.range)
    }
}

fn with_arguments(receiver: BoundExpr, arguments: Vec<BoundArgument>) -> Vec<BoundExpr> {
    std::iter::once(receiver)
        .chain(arguments.into_iter().map(|a| a.value))
        .collect()
}
