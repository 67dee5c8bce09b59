//! Classification of the same-named members of one scope.

use crate::base::Name;
use crate::hir::accessibility::{is_accessible, AccessContext};
use crate::hir::ids::SymbolId;
use crate::hir::symbols::{SymbolData, SymbolGraph, SymbolKind};

use super::result::{LookupError, LookupResult};

/// Look up `name` among the members declared directly in `scope`.
///
/// Each member is classified in priority order: wrong arity, invoked but not
/// invocable, inaccessible, good. `invoked` is ignored for namespaces, which
/// only contain types and namespaces.
pub(crate) fn lookup_in_single_scope(
    graph: &SymbolGraph,
    scope: SymbolId,
    name: Name,
    arity: usize,
    invoked: bool,
    context: &AccessContext,
) -> LookupResult {
    let invoked = invoked && graph.kind(scope) != SymbolKind::Namespace;
    graph
        .members_named(scope, name)
        .iter()
        .map(|&member| classify(graph, member, arity, invoked, context))
        .fold(LookupResult::empty(), LookupResult::merge_same_scope)
}

fn classify(
    graph: &SymbolGraph,
    member: SymbolId,
    arity: usize,
    invoked: bool,
    context: &AccessContext,
) -> LookupResult {
    let is_method = graph.is_method(member);
    if let Some(error) = arity_error(graph, member, arity) {
        return LookupResult::wrong_arity(member, is_method, error);
    }
    if invoked && !is_invocable(graph, member) {
        return LookupResult::not_invocable(
            member,
            is_method,
            LookupError::NotInvocable {
                name: graph.display(member),
            },
        );
    }
    if !is_accessible(graph, member, context) {
        return LookupResult::inaccessible(
            member,
            is_method,
            LookupError::Inaccessible {
                name: graph.display(member),
            },
        );
    }
    LookupResult::good(member, is_method)
}

fn arity_error(graph: &SymbolGraph, member: SymbolId, arity: usize) -> Option<LookupError> {
    let declared = graph.arity(member);
    match graph.kind(member) {
        SymbolKind::NamedType if declared != arity => Some(if declared == 0 {
            LookupError::TypeArgumentsNotAllowed {
                kind: "type",
                name: graph.display(member),
            }
        } else {
            LookupError::WrongArity {
                kind: "type",
                name: graph.display(member),
                expected: declared,
            }
        }),
        // Arity 0 leaves room for type argument inference.
        SymbolKind::Method if arity != 0 && declared != arity => Some(if declared == 0 {
            LookupError::TypeArgumentsNotAllowed {
                kind: "method",
                name: graph.display(member),
            }
        } else {
            LookupError::WrongArity {
                kind: "method",
                name: graph.display(member),
                expected: declared,
            }
        }),
        SymbolKind::NamedType | SymbolKind::Method => None,
        kind if arity != 0 => Some(LookupError::TypeArgumentsNotAllowed {
            kind: kind.display(),
            name: graph.display(member),
        }),
        _ => None,
    }
}

/// Methods, and fields or properties of delegate type.
fn is_invocable(graph: &SymbolGraph, member: SymbolId) -> bool {
    match &graph.symbol(member).data {
        SymbolData::Method(_) => true,
        SymbolData::Field(_) | SymbolData::Property(_) => graph
            .member_type(member)
            .is_some_and(|ty| graph.is_delegate_type(ty)),
        _ => false,
    }
}
