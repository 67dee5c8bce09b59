//! Lookup results and the merge algebra used to combine them.
//!
//! A [`LookupResult`] is a bag of candidates, each classified with a
//! [`Viability`]. Results found in one scope are combined with
//! [`merge_same_scope`](LookupResult::merge_same_scope); results from a
//! more-derived scope are combined with a less-derived one through
//! [`merge_hiding`](LookupResult::merge_hiding); results from sibling scopes
//! (two base interfaces) through
//! [`merge_ambiguous`](LookupResult::merge_ambiguous).

use thiserror::Error;

use crate::hir::ids::SymbolId;
use crate::hir::symbols::SymbolGraph;

// ============================================================================
// VIABILITY
// ============================================================================

/// How usable a candidate is. Later variants are better; when nothing is
/// viable the best remaining classification decides the diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Viability {
    Bad,
    WrongArity,
    NotInvocable,
    Inaccessible,
    Good,
}

/// Why a candidate is not viable. `Display` is the user-facing message.
#[derive(Clone, Debug, Error, PartialEq, Eq, Hash)]
pub enum LookupError {
    #[error("'{name}' is inaccessible due to its protection level")]
    Inaccessible { name: String },

    #[error("using the generic {kind} '{name}' requires {expected} type argument(s)")]
    WrongArity {
        kind: &'static str,
        name: String,
        expected: usize,
    },

    #[error("the {kind} '{name}' cannot be used with type arguments")]
    TypeArgumentsNotAllowed { kind: &'static str, name: String },

    #[error("non-invocable member '{name}' cannot be used like a method")]
    NotInvocable { name: String },

    #[error("'{name}' cannot be used here")]
    Bad { name: String },
}

/// One symbol found by a lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub symbol: SymbolId,
    pub viability: Viability,
    pub is_method: bool,
    pub error: Option<LookupError>,
}

// ============================================================================
// LOOKUP RESULT
// ============================================================================

/// The candidates of one lookup, in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupResult {
    candidates: Vec<Candidate>,
}

impl LookupResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn good(symbol: SymbolId, is_method: bool) -> Self {
        Self::single(symbol, is_method, Viability::Good, None)
    }

    pub fn bad(symbol: SymbolId, is_method: bool, error: LookupError) -> Self {
        Self::single(symbol, is_method, Viability::Bad, Some(error))
    }

    pub fn inaccessible(symbol: SymbolId, is_method: bool, error: LookupError) -> Self {
        Self::single(symbol, is_method, Viability::Inaccessible, Some(error))
    }

    pub fn wrong_arity(symbol: SymbolId, is_method: bool, error: LookupError) -> Self {
        Self::single(symbol, is_method, Viability::WrongArity, Some(error))
    }

    pub fn not_invocable(symbol: SymbolId, is_method: bool, error: LookupError) -> Self {
        Self::single(symbol, is_method, Viability::NotInvocable, Some(error))
    }

    fn single(symbol: SymbolId, is_method: bool, viability: Viability, error: Option<LookupError>) -> Self {
        Self {
            candidates: vec![Candidate {
                symbol,
                viability,
                is_method,
                error,
            }],
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Best classification among the candidates.
    pub fn best_viability(&self) -> Option<Viability> {
        self.candidates.iter().map(|c| c.viability).max()
    }

    /// At least one candidate is `Good`.
    pub fn is_viable(&self) -> bool {
        self.best_viability() == Some(Viability::Good)
    }

    /// Exactly one symbol at the best classification.
    pub fn is_singleton(&self) -> bool {
        self.symbols().len() == 1
    }

    /// Symbols at the best classification, in discovery order.
    pub fn symbols(&self) -> Vec<SymbolId> {
        let Some(best) = self.best_viability() else {
            return Vec::new();
        };
        self.best_candidates(best).map(|c| c.symbol).collect()
    }

    /// The error to report when nothing is viable.
    pub fn best_error(&self) -> Option<&LookupError> {
        match self.best_viability() {
            None | Some(Viability::Good) => None,
            Some(best) => self.best_candidates(best).find_map(|c| c.error.as_ref()),
        }
    }

    /// The first candidate at the best classification.
    pub fn best_candidate(&self) -> Option<&Candidate> {
        let best = self.best_viability()?;
        self.best_candidates(best).next()
    }

    fn best_candidates(&self, best: Viability) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter().filter(move |c| c.viability == best)
    }

    /// Keep only the candidates matching `keep`.
    pub(crate) fn retain(mut self, keep: impl FnMut(&Candidate) -> bool) -> LookupResult {
        self.candidates.retain(keep);
        self
    }

    /// Whether a `Good` candidate is not a method.
    fn has_viable_non_method(&self) -> bool {
        self.candidates
            .iter()
            .any(|c| c.viability == Viability::Good && !c.is_method)
    }

    // ------------------------------------------------------------------
    // Merges
    // ------------------------------------------------------------------

    /// Union of two results from the same scope. A symbol present in both
    /// keeps its better classification.
    pub fn merge_same_scope(mut self, other: LookupResult) -> LookupResult {
        for candidate in other.candidates {
            match self.candidates.iter_mut().find(|c| c.symbol == candidate.symbol) {
                Some(existing) if candidate.viability > existing.viability => *existing = candidate,
                Some(_) => {}
                None => self.candidates.push(candidate),
            }
        }
        self
    }

    /// Combine a more-derived result (`self`) with a less-derived one.
    ///
    /// A viable non-method hides everything below it; viable methods hide
    /// only non-methods, so overloads from both levels accumulate. A hiding
    /// side with nothing viable contributes no visible symbol: the union lets
    /// the hidden side's viable symbols win, or else the best diagnostic.
    pub fn merge_hiding(self, hidden: LookupResult) -> LookupResult {
        if self.is_viable() {
            if self.has_viable_non_method() {
                return self;
            }
            let methods = LookupResult {
                candidates: hidden.candidates.into_iter().filter(|c| c.is_method).collect(),
            };
            return self.merge_same_scope(methods);
        }
        self.merge_same_scope(hidden)
    }

    /// Combine results of sibling scopes.
    ///
    /// Uses the same-scope algebra; whether two surviving non-methods from
    /// different scopes are an error is decided when the result is
    /// [materialized](Self::materialize).
    pub fn merge_ambiguous(self, other: LookupResult) -> LookupResult {
        self.merge_same_scope(other)
    }

    // ------------------------------------------------------------------
    // Materialization
    // ------------------------------------------------------------------

    /// Turn a viable result into either one symbol or a method group.
    ///
    /// Returns `None` when nothing is viable.
    pub fn materialize(&self, graph: &SymbolGraph) -> Option<Materialized> {
        if !self.is_viable() {
            return None;
        }
        let (methods, non_methods): (Vec<&Candidate>, Vec<&Candidate>) = self
            .best_candidates(Viability::Good)
            .partition(|c| c.is_method);

        let Some(first) = non_methods.first() else {
            return Some(Materialized {
                value: SymbolOrMethodGroup::MethodGroup(methods.iter().map(|c| c.symbol).collect()),
                ambiguity: None,
            });
        };

        let ambiguity = if let Some(second) = non_methods.get(1) {
            let same_scope = graph.container(first.symbol) == graph.container(second.symbol);
            Some(if same_scope {
                Ambiguity::SameScope {
                    first: first.symbol,
                    second: second.symbol,
                }
            } else {
                Ambiguity::MultiPath {
                    first: first.symbol,
                    second: second.symbol,
                }
            })
        } else {
            methods.first().map(|method| Ambiguity::MethodVsNonMethod {
                non_method: first.symbol,
                method: method.symbol,
            })
        };

        Some(Materialized {
            value: SymbolOrMethodGroup::Symbol(first.symbol),
            ambiguity,
        })
    }
}

// ============================================================================
// SYMBOL OR METHOD GROUP
// ============================================================================

/// A viable lookup result narrowed to what binding continues with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymbolOrMethodGroup {
    Symbol(SymbolId),
    MethodGroup(Vec<SymbolId>),
}

/// An ambiguity detected while materializing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ambiguity {
    /// Two non-methods declared in the same scope.
    SameScope { first: SymbolId, second: SymbolId },
    /// Two non-methods reached through different scopes.
    MultiPath { first: SymbolId, second: SymbolId },
    /// A non-method and a method; the non-method is kept.
    MethodVsNonMethod { non_method: SymbolId, method: SymbolId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Materialized {
    pub value: SymbolOrMethodGroup,
    pub ambiguity: Option<Ambiguity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> SymbolId {
        SymbolId::new(n)
    }

    fn err(name: &str) -> LookupError {
        LookupError::Inaccessible { name: name.into() }
    }

    #[test]
    fn test_empty_is_not_viable() {
        let result = LookupResult::empty();
        assert!(!result.is_viable());
        assert!(result.symbols().is_empty());
        assert!(result.best_error().is_none());
    }

    #[test]
    fn test_same_scope_keeps_best_classification() {
        let merged = LookupResult::inaccessible(id(1), false, err("x"))
            .merge_same_scope(LookupResult::good(id(1), false));
        assert_eq!(merged.candidates().len(), 1);
        assert!(merged.is_viable());
        assert!(merged.is_singleton());
    }

    #[test]
    fn test_hiding_non_method_hides_everything() {
        let hiding = LookupResult::good(id(1), false);
        let hidden = LookupResult::good(id(2), true);
        assert_eq!(hiding.merge_hiding(hidden).symbols(), vec![id(1)]);
    }

    #[test]
    fn test_hiding_methods_accumulate_overloads() {
        let hiding = LookupResult::good(id(1), true);
        let hidden = LookupResult::good(id(2), true).merge_same_scope(LookupResult::good(id(3), false));
        assert_eq!(hiding.merge_hiding(hidden).symbols(), vec![id(1), id(2)]);
    }

    #[test]
    fn test_non_viable_hiding_side_defers() {
        let hiding = LookupResult::inaccessible(id(1), false, err("a"));
        let hidden = LookupResult::good(id(2), false);
        assert_eq!(hiding.merge_hiding(hidden).symbols(), vec![id(2)]);

        let hiding = LookupResult::wrong_arity(
            id(1),
            false,
            LookupError::TypeArgumentsNotAllowed {
                kind: "field",
                name: "a".into(),
            },
        );
        let hidden = LookupResult::inaccessible(id(2), false, err("b"));
        let merged = hiding.merge_hiding(hidden);
        assert_eq!(merged.best_viability(), Some(Viability::Inaccessible));
        assert_eq!(merged.best_error(), Some(&err("b")));
    }

    #[test]
    fn test_diagnostic_priority() {
        assert!(Viability::Inaccessible > Viability::NotInvocable);
        assert!(Viability::NotInvocable > Viability::WrongArity);
        assert!(Viability::WrongArity > Viability::Bad);
    }

    #[test]
    fn test_lookup_error_messages() {
        assert_eq!(err("F").to_string(), "'F' is inaccessible due to its protection level");
        let arity = LookupError::WrongArity {
            kind: "type",
            name: "List<T>".into(),
            expected: 1,
        };
        assert_eq!(arity.to_string(), "using the generic type 'List<T>' requires 1 type argument(s)");
    }
}
