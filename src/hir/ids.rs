//! Identifiers for entries of the symbol graph.

use std::fmt;

/// Index of a symbol in a [`SymbolGraph`](super::SymbolGraph).
///
/// Ids are dense and assigned in declaration order, so they are stable for the
/// lifetime of the graph and cheap to copy, hash and compare.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SymbolId(pub u32);

impl SymbolId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

/// A compilation unit boundary for `internal` accessibility.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct AssemblyId(pub u32);

impl AssemblyId {
    /// The assembly holding the well-known core types.
    pub const CORE: AssemblyId = AssemblyId(0);

    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for AssemblyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssemblyId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_id_size() {
        assert_eq!(std::mem::size_of::<SymbolId>(), 4);
        assert_eq!(std::mem::size_of::<Option<SymbolId>>(), 8);
    }

    #[test]
    fn test_core_assembly_is_first() {
        assert_eq!(AssemblyId::CORE.index(), 0);
        assert_ne!(AssemblyId::new(1), AssemblyId::CORE);
    }
}
