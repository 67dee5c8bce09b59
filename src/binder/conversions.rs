//! Implicit conversions.
//!
//! Only the implicit conversions binding needs to check arguments and
//! conditions are classified here; user-defined conversions are not.

use super::bound::BoundExpr;
use crate::hir::{SpecialType, SymbolGraph, SymbolId, TypeKind};
use crate::syntax::ast::Literal;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConversionKind {
    Identity,
    ImplicitNumeric,
    /// An integer constant that fits the target integral type.
    ImplicitConstant,
    ImplicitReference,
    Boxing,
    NullLiteral,
    /// From a type parameter to its effective base or interfaces.
    TypeParameter,
}

/// Classify the implicit conversion of `expr` to `target`.
///
/// Error types on either side convert as identity so one failure does not
/// cascade into conversion errors.
pub fn classify_expression(graph: &SymbolGraph, expr: &BoundExpr, target: SymbolId) -> Option<ConversionKind> {
    if expr.is_bad() || graph.is_error_type(target) {
        return Some(ConversionKind::Identity);
    }
    if expr.is_null_literal() {
        return null_conversion(graph, target);
    }
    let source = expr.ty()?;
    if let Some(kind) = implicit_conversion(graph, source, target) {
        return Some(kind);
    }
    match expr {
        BoundExpr::Literal {
            value: Literal::Integer(value),
            ..
        } => constant_conversion(graph, *value, target),
        _ => None,
    }
}

/// Classify the implicit conversion between two types.
pub fn implicit_conversion(graph: &SymbolGraph, source: SymbolId, target: SymbolId) -> Option<ConversionKind> {
    if source == target || graph.is_error_type(source) || graph.is_error_type(target) {
        return Some(ConversionKind::Identity);
    }
    if let (Some(from), Some(to)) = (graph.special_type(source), graph.special_type(target)) {
        if is_implicit_numeric(from, to) {
            return Some(ConversionKind::ImplicitNumeric);
        }
    }
    match graph.type_kind(source)? {
        TypeKind::TypeParameter => type_parameter_conversion(graph, source, target),
        TypeKind::Struct | TypeKind::Enum => {
            if is_base_or_interface(graph, source, target) {
                Some(ConversionKind::Boxing)
            } else {
                None
            }
        }
        TypeKind::Class | TypeKind::Interface | TypeKind::Delegate | TypeKind::Array => {
            if reference_conversion(graph, source, target) {
                Some(ConversionKind::ImplicitReference)
            } else {
                None
            }
        }
        TypeKind::Ref => {
            let referenced = graph.element_type(source)?;
            implicit_conversion(graph, referenced, target)
        }
        TypeKind::Pointer | TypeKind::Error | TypeKind::Unknown => None,
    }
}

/// `null` converts to reference types, pointers and reference-constrained
/// type parameters.
pub fn null_conversion(graph: &SymbolGraph, target: SymbolId) -> Option<ConversionKind> {
    if graph.is_reference_type(target) || graph.type_kind(target) == Some(TypeKind::Pointer) {
        Some(ConversionKind::NullLiteral)
    } else {
        None
    }
}

fn constant_conversion(graph: &SymbolGraph, value: u64, target: SymbolId) -> Option<ConversionKind> {
    let max = match graph.special_type(target)? {
        SpecialType::SByte => i8::MAX as u64,
        SpecialType::Byte => u8::MAX as u64,
        SpecialType::Int16 => i16::MAX as u64,
        SpecialType::UInt16 | SpecialType::Char => u16::MAX as u64,
        SpecialType::Int32 => i32::MAX as u64,
        SpecialType::UInt32 => u32::MAX as u64,
        SpecialType::Int64 => i64::MAX as u64,
        SpecialType::UInt64 => u64::MAX,
        _ => return None,
    };
    // `char` has no constant conversion from integers.
    if value <= max && graph.special_type(target) != Some(SpecialType::Char) {
        Some(ConversionKind::ImplicitConstant)
    } else {
        None
    }
}

fn is_implicit_numeric(from: SpecialType, to: SpecialType) -> bool {
    use SpecialType::*;
    let targets: &[SpecialType] = match from {
        SByte => &[Int16, Int32, Int64, Single, Double],
        Byte => &[Int16, UInt16, Int32, UInt32, Int64, UInt64, Single, Double],
        Int16 => &[Int32, Int64, Single, Double],
        UInt16 => &[Int32, UInt32, Int64, UInt64, Single, Double],
        Int32 => &[Int64, Single, Double],
        UInt32 => &[Int64, UInt64, Single, Double],
        Int64 | UInt64 => &[Single, Double],
        Char => &[UInt16, Int32, UInt32, Int64, UInt64, Single, Double],
        Single => &[Double],
        _ => &[],
    };
    targets.contains(&to)
}

fn is_base_or_interface(graph: &SymbolGraph, source: SymbolId, target: SymbolId) -> bool {
    match graph.type_kind(target) {
        Some(TypeKind::Interface) => graph.implements(source, target),
        Some(TypeKind::Class) => graph.is_derived_from(source, target),
        _ => false,
    }
}

fn reference_conversion(graph: &SymbolGraph, source: SymbolId, target: SymbolId) -> bool {
    if target == graph.well_known().object() || is_base_or_interface(graph, source, target) {
        return true;
    }
    // Array covariance: same rank, reference conversion between elements.
    if graph.type_kind(source) == Some(TypeKind::Array) && graph.type_kind(target) == Some(TypeKind::Array) {
        if graph.rank(source) != graph.rank(target) {
            return false;
        }
        return match (graph.element_type(source), graph.element_type(target)) {
            (Some(from), Some(to)) => {
                from == to || (graph.is_reference_type(from) && reference_conversion(graph, from, to))
            }
            _ => false,
        };
    }
    false
}

fn type_parameter_conversion(graph: &SymbolGraph, source: SymbolId, target: SymbolId) -> Option<ConversionKind> {
    let base = graph.effective_base(source);
    let reaches_base = base == target || graph.is_derived_from(base, target);
    let reaches_interface = graph
        .effective_interfaces(source)
        .into_iter()
        .any(|i| graph.implements(i, target));
    let reaches_parameter = graph
        .type_parameter_data(source)
        .is_some_and(|d| d.constraint_types().contains(&target));
    (reaches_base || reaches_interface || reaches_parameter).then_some(ConversionKind::TypeParameter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::{SymbolGraphBuilder, TypeConstraint, TypeDecl};

    struct Fixture {
        graph: SymbolGraph,
        base: SymbolId,
        derived: SymbolId,
        iface: SymbolId,
        point: SymbolId,
        tp: SymbolId,
    }

    fn fixture() -> Fixture {
        let mut b = SymbolGraphBuilder::new();
        let global = b.global_namespace();
        let base = b.add_type(TypeDecl::new(TypeKind::Class, global, "Base")).unwrap();
        let derived = b.add_type(TypeDecl::new(TypeKind::Class, global, "Derived")).unwrap();
        let iface = b.add_type(TypeDecl::new(TypeKind::Interface, global, "IShape")).unwrap();
        let point = b.add_type(TypeDecl::new(TypeKind::Struct, global, "Point")).unwrap();
        let generic = b.add_type(TypeDecl::new(TypeKind::Class, global, "G")).unwrap();
        let tp = b.add_type_parameter(generic, "T").unwrap();
        b.set_base_type(derived, base).unwrap();
        b.add_interface(base, iface).unwrap();
        b.add_interface(point, iface).unwrap();
        b.add_constraint(tp, TypeConstraint::Type(base)).unwrap();
        Fixture {
            graph: b.build().unwrap(),
            base,
            derived,
            iface,
            point,
            tp,
        }
    }

    fn special(f: &Fixture, s: SpecialType) -> SymbolId {
        f.graph.well_known().get(s)
    }

    #[test]
    fn test_numeric_widening_only() {
        let f = fixture();
        let int = special(&f, SpecialType::Int32);
        let long = special(&f, SpecialType::Int64);
        let uint = special(&f, SpecialType::UInt32);
        assert_eq!(implicit_conversion(&f.graph, int, long), Some(ConversionKind::ImplicitNumeric));
        assert_eq!(implicit_conversion(&f.graph, long, int), None);
        assert_eq!(implicit_conversion(&f.graph, int, uint), None);
        assert_eq!(implicit_conversion(&f.graph, int, int), Some(ConversionKind::Identity));
    }

    #[test]
    fn test_reference_and_boxing() {
        let f = fixture();
        let object = f.graph.well_known().object();
        assert_eq!(
            implicit_conversion(&f.graph, f.derived, f.base),
            Some(ConversionKind::ImplicitReference)
        );
        assert_eq!(
            implicit_conversion(&f.graph, f.derived, f.iface),
            Some(ConversionKind::ImplicitReference)
        );
        assert_eq!(implicit_conversion(&f.graph, f.base, f.derived), None);
        assert_eq!(implicit_conversion(&f.graph, f.point, object), Some(ConversionKind::Boxing));
        assert_eq!(implicit_conversion(&f.graph, f.point, f.iface), Some(ConversionKind::Boxing));
    }

    #[test]
    fn test_type_parameter_to_constraint() {
        let f = fixture();
        assert_eq!(implicit_conversion(&f.graph, f.tp, f.base), Some(ConversionKind::TypeParameter));
        assert_eq!(
            implicit_conversion(&f.graph, f.tp, f.graph.well_known().object()),
            Some(ConversionKind::TypeParameter)
        );
        assert_eq!(implicit_conversion(&f.graph, f.tp, f.derived), None);
    }

    #[test]
    fn test_null_and_constants() {
        let f = fixture();
        let int = special(&f, SpecialType::Int32);
        let byte = special(&f, SpecialType::Byte);
        assert_eq!(null_conversion(&f.graph, f.base), Some(ConversionKind::NullLiteral));
        assert_eq!(null_conversion(&f.graph, int), None);

        let literal = |value| BoundExpr::Literal {
            value: Literal::Integer(value),
            ty: Some(int),
        };
        assert_eq!(
            classify_expression(&f.graph, &literal(200), byte),
            Some(ConversionKind::ImplicitConstant)
        );
        assert_eq!(classify_expression(&f.graph, &literal(300), byte), None);
    }

    #[test]
    fn test_error_type_converts_silently() {
        let f = fixture();
        let error = f.graph.error_type();
        assert_eq!(implicit_conversion(&f.graph, error, f.base), Some(ConversionKind::Identity));
        let bad = BoundExpr::Bad {
            children: Vec::new(),
            ty: error,
        };
        assert_eq!(
            classify_expression(&f.graph, &bad, special(&f, SpecialType::Boolean)),
            Some(ConversionKind::Identity)
        );
    }
}
