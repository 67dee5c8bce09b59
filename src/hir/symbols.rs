//! The symbol graph: immutable declarations that member lookup runs over.
//!
//! Symbols live in a single arena owned by [`SymbolGraph`] and refer to each
//! other by [`SymbolId`]. The graph is produced once by
//! [`SymbolGraphBuilder`](super::SymbolGraphBuilder) and never mutated after
//! that, so every query here is a pure read and the graph is `Send + Sync`.

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::ids::{AssemblyId, SymbolId};
use crate::base::{Interner, Location, Name};

// ============================================================================
// KINDS
// ============================================================================

/// Declared accessibility of a symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Accessibility {
    NotApplicable,
    Private,
    /// `private protected`
    ProtectedAndInternal,
    Protected,
    Internal,
    /// `protected internal`
    ProtectedOrInternal,
    Public,
}

impl Accessibility {
    /// Source spelling, used in diagnostics.
    pub fn display(&self) -> &'static str {
        match self {
            Accessibility::NotApplicable => "",
            Accessibility::Private => "private",
            Accessibility::ProtectedAndInternal => "private protected",
            Accessibility::Protected => "protected",
            Accessibility::Internal => "internal",
            Accessibility::ProtectedOrInternal => "protected internal",
            Accessibility::Public => "public",
        }
    }
}

/// What kind of entity a symbol is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Namespace,
    NamedType,
    ErrorType,
    ArrayType,
    PointerType,
    TypeParameter,
    Method,
    Field,
    Property,
}

impl SymbolKind {
    /// Whether symbols of this kind denote types.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            SymbolKind::NamedType
                | SymbolKind::ErrorType
                | SymbolKind::ArrayType
                | SymbolKind::PointerType
                | SymbolKind::TypeParameter
        )
    }

    pub fn display(&self) -> &'static str {
        match self {
            SymbolKind::Namespace => "namespace",
            SymbolKind::NamedType => "type",
            SymbolKind::ErrorType => "error type",
            SymbolKind::ArrayType => "array type",
            SymbolKind::PointerType => "pointer type",
            SymbolKind::TypeParameter => "type parameter",
            SymbolKind::Method => "method",
            SymbolKind::Field => "field",
            SymbolKind::Property => "property",
        }
    }
}

/// Shape of a type symbol; drives per-kind member lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    Array,
    Pointer,
    TypeParameter,
    Ref,
    Error,
    Unknown,
}

impl TypeKind {
    pub fn display(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Delegate => "delegate",
            TypeKind::Array => "array",
            TypeKind::Pointer => "pointer",
            TypeKind::TypeParameter => "type parameter",
            TypeKind::Ref => "ref",
            TypeKind::Error => "error",
            TypeKind::Unknown => "unknown",
        }
    }
}

/// Types the language itself refers to; seeded into the core assembly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecialType {
    Object,
    ValueType,
    Enum,
    Array,
    Delegate,
    MulticastDelegate,
    Void,
    Boolean,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    String,
}

impl SpecialType {
    pub const ALL: [SpecialType; 20] = [
        SpecialType::Object,
        SpecialType::ValueType,
        SpecialType::Enum,
        SpecialType::Array,
        SpecialType::Delegate,
        SpecialType::MulticastDelegate,
        SpecialType::Void,
        SpecialType::Boolean,
        SpecialType::Char,
        SpecialType::SByte,
        SpecialType::Byte,
        SpecialType::Int16,
        SpecialType::UInt16,
        SpecialType::Int32,
        SpecialType::UInt32,
        SpecialType::Int64,
        SpecialType::UInt64,
        SpecialType::Single,
        SpecialType::Double,
        SpecialType::String,
    ];

    /// Name of the type inside the `System` namespace.
    pub fn metadata_name(&self) -> &'static str {
        match self {
            SpecialType::Object => "Object",
            SpecialType::ValueType => "ValueType",
            SpecialType::Enum => "Enum",
            SpecialType::Array => "Array",
            SpecialType::Delegate => "Delegate",
            SpecialType::MulticastDelegate => "MulticastDelegate",
            SpecialType::Void => "Void",
            SpecialType::Boolean => "Boolean",
            SpecialType::Char => "Char",
            SpecialType::SByte => "SByte",
            SpecialType::Byte => "Byte",
            SpecialType::Int16 => "Int16",
            SpecialType::UInt16 => "UInt16",
            SpecialType::Int32 => "Int32",
            SpecialType::UInt32 => "UInt32",
            SpecialType::Int64 => "Int64",
            SpecialType::UInt64 => "UInt64",
            SpecialType::Single => "Single",
            SpecialType::Double => "Double",
            SpecialType::String => "String",
        }
    }

    /// Predefined type keyword, if the language has one.
    pub fn keyword(&self) -> Option<&'static str> {
        Some(match self {
            SpecialType::Object => "object",
            SpecialType::Void => "void",
            SpecialType::Boolean => "bool",
            SpecialType::Char => "char",
            SpecialType::SByte => "sbyte",
            SpecialType::Byte => "byte",
            SpecialType::Int16 => "short",
            SpecialType::UInt16 => "ushort",
            SpecialType::Int32 => "int",
            SpecialType::UInt32 => "uint",
            SpecialType::Int64 => "long",
            SpecialType::UInt64 => "ulong",
            SpecialType::Single => "float",
            SpecialType::Double => "double",
            SpecialType::String => "string",
            SpecialType::ValueType
            | SpecialType::Enum
            | SpecialType::Array
            | SpecialType::Delegate
            | SpecialType::MulticastDelegate => return None,
        })
    }

    pub fn from_keyword(keyword: &str) -> Option<SpecialType> {
        SpecialType::ALL
            .into_iter()
            .find(|s| s.keyword() == Some(keyword))
    }

    pub fn type_kind(&self) -> TypeKind {
        match self {
            SpecialType::Object
            | SpecialType::ValueType
            | SpecialType::Enum
            | SpecialType::Array
            | SpecialType::Delegate
            | SpecialType::MulticastDelegate
            | SpecialType::String => TypeKind::Class,
            _ => TypeKind::Struct,
        }
    }

    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            SpecialType::Char
                | SpecialType::SByte
                | SpecialType::Byte
                | SpecialType::Int16
                | SpecialType::UInt16
                | SpecialType::Int32
                | SpecialType::UInt32
                | SpecialType::Int64
                | SpecialType::UInt64
        )
    }

    fn ordinal(&self) -> usize {
        *self as usize
    }
}

// ============================================================================
// SYMBOL DATA
// ============================================================================

/// Same-named members of a scope, in declaration order.
pub type MemberMap = IndexMap<Name, Vec<SymbolId>>;

#[derive(Clone, Debug, Default)]
pub struct NamespaceData {
    pub(crate) members: MemberMap,
}

#[derive(Clone, Debug)]
pub struct TypeData {
    pub(crate) type_kind: TypeKind,
    pub(crate) type_parameters: Vec<SymbolId>,
    pub(crate) base_type: Option<SymbolId>,
    pub(crate) interfaces: Vec<SymbolId>,
    pub(crate) members: MemberMap,
    /// Generic definition this type was constructed from.
    pub(crate) original: Option<SymbolId>,
    pub(crate) type_arguments: Vec<SymbolId>,
    /// Element of an array, pointee of a pointer, target of a ref.
    pub(crate) element: Option<SymbolId>,
    pub(crate) rank: u32,
    pub(crate) special: Option<SpecialType>,
}

impl TypeData {
    pub(crate) fn new(type_kind: TypeKind) -> Self {
        Self {
            type_kind,
            type_parameters: Vec::new(),
            base_type: None,
            interfaces: Vec::new(),
            members: MemberMap::default(),
            original: None,
            type_arguments: Vec::new(),
            element: None,
            rank: 0,
            special: None,
        }
    }

    pub fn type_kind(&self) -> TypeKind {
        self.type_kind
    }
}

#[derive(Clone, Debug, Default)]
pub struct TypeParameterData {
    pub(crate) ordinal: u32,
    pub(crate) constraint_types: Vec<SymbolId>,
    pub(crate) has_class_constraint: bool,
    pub(crate) has_struct_constraint: bool,
}

impl TypeParameterData {
    pub fn constraint_types(&self) -> &[SymbolId] {
        &self.constraint_types
    }

    pub fn has_class_constraint(&self) -> bool {
        self.has_class_constraint
    }

    pub fn has_struct_constraint(&self) -> bool {
        self.has_struct_constraint
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub name: Name,
    pub ty: SymbolId,
}

#[derive(Clone, Debug, Default)]
pub struct MethodData {
    pub(crate) type_parameters: Vec<SymbolId>,
    pub(crate) parameters: Vec<Parameter>,
    /// `None` for `void`.
    pub(crate) return_type: Option<SymbolId>,
}

impl MethodData {
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn return_type(&self) -> Option<SymbolId> {
        self.return_type
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FieldData {
    pub(crate) ty: SymbolId,
    pub(crate) is_const: bool,
    pub(crate) is_readonly: bool,
}

impl FieldData {
    pub fn is_const(&self) -> bool {
        self.is_const
    }

    pub fn is_readonly(&self) -> bool {
        self.is_readonly
    }
}

#[derive(Clone, Debug)]
pub struct PropertyData {
    pub(crate) ty: SymbolId,
    /// Non-empty only for indexers.
    pub(crate) parameters: Vec<Parameter>,
}

impl PropertyData {
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

#[derive(Clone, Debug)]
pub enum SymbolData {
    Namespace(NamespaceData),
    Type(TypeData),
    TypeParameter(TypeParameterData),
    Method(MethodData),
    Field(FieldData),
    Property(PropertyData),
}

/// A declared entity.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub(crate) name: Name,
    pub(crate) container: Option<SymbolId>,
    pub(crate) assembly: AssemblyId,
    pub(crate) accessibility: Accessibility,
    pub(crate) is_static: bool,
    pub(crate) location: Option<Location>,
    pub(crate) data: SymbolData,
}

impl Symbol {
    pub fn name(&self) -> Name {
        self.name
    }

    /// The namespace, type or method this symbol is declared in.
    pub fn container(&self) -> Option<SymbolId> {
        self.container
    }

    pub fn assembly(&self) -> AssemblyId {
        self.assembly
    }

    pub fn accessibility(&self) -> Accessibility {
        self.accessibility
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn data(&self) -> &SymbolData {
        &self.data
    }

    pub fn kind(&self) -> SymbolKind {
        match &self.data {
            SymbolData::Namespace(_) => SymbolKind::Namespace,
            SymbolData::Type(t) => match t.type_kind {
                TypeKind::Error => SymbolKind::ErrorType,
                TypeKind::Array => SymbolKind::ArrayType,
                TypeKind::Pointer => SymbolKind::PointerType,
                _ => SymbolKind::NamedType,
            },
            SymbolData::TypeParameter(_) => SymbolKind::TypeParameter,
            SymbolData::Method(_) => SymbolKind::Method,
            SymbolData::Field(_) => SymbolKind::Field,
            SymbolData::Property(_) => SymbolKind::Property,
        }
    }
}

// ============================================================================
// WELL-KNOWN TYPES
// ============================================================================

/// Table of the special types of the core assembly.
#[derive(Clone, Debug)]
pub struct WellKnownTypes {
    table: Vec<SymbolId>,
}

impl WellKnownTypes {
    /// `table` must be indexed by `SpecialType` ordinal.
    pub(crate) fn new(table: Vec<SymbolId>) -> Self {
        debug_assert_eq!(table.len(), SpecialType::ALL.len());
        Self { table }
    }

    /// Placeholder used while the core assembly is being seeded.
    pub(crate) fn empty() -> Self {
        Self { table: Vec::new() }
    }

    pub fn get(&self, special: SpecialType) -> SymbolId {
        self.table[special.ordinal()]
    }

    pub fn object(&self) -> SymbolId {
        self.get(SpecialType::Object)
    }

    pub fn boolean(&self) -> SymbolId {
        self.get(SpecialType::Boolean)
    }

    pub fn int32(&self) -> SymbolId {
        self.get(SpecialType::Int32)
    }
}

// ============================================================================
// SYMBOL GRAPH
// ============================================================================

/// The immutable type/namespace/member graph of one compilation.
#[derive(Debug)]
pub struct SymbolGraph {
    pub(crate) symbols: Vec<Symbol>,
    pub(crate) interner: Interner,
    pub(crate) assemblies: Vec<SmolStr>,
    pub(crate) global_namespace: SymbolId,
    pub(crate) error_type: SymbolId,
    pub(crate) well_known: WellKnownTypes,
}

impl SymbolGraph {
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId::new(i as u32), s))
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn global_namespace(&self) -> SymbolId {
        self.global_namespace
    }

    /// The shared error type used for placeholders after failed binding.
    pub fn error_type(&self) -> SymbolId {
        self.error_type
    }

    pub fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }

    pub fn assembly_name(&self, assembly: AssemblyId) -> Option<&str> {
        self.assemblies.get(assembly.index()).map(|s| s.as_str())
    }

    pub fn name(&self, id: SymbolId) -> SmolStr {
        self.interner
            .lookup(self.symbol(id).name)
            .unwrap_or_default()
    }

    pub fn kind(&self, id: SymbolId) -> SymbolKind {
        self.symbol(id).kind()
    }

    pub fn is_method(&self, id: SymbolId) -> bool {
        self.kind(id) == SymbolKind::Method
    }

    pub fn type_data(&self, id: SymbolId) -> Option<&TypeData> {
        match &self.symbol(id).data {
            SymbolData::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn method_data(&self, id: SymbolId) -> Option<&MethodData> {
        match &self.symbol(id).data {
            SymbolData::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn field_data(&self, id: SymbolId) -> Option<&FieldData> {
        match &self.symbol(id).data {
            SymbolData::Field(f) => Some(f),
            _ => None,
        }
    }

    pub fn property_data(&self, id: SymbolId) -> Option<&PropertyData> {
        match &self.symbol(id).data {
            SymbolData::Property(p) => Some(p),
            _ => None,
        }
    }

    pub fn type_parameter_data(&self, id: SymbolId) -> Option<&TypeParameterData> {
        match &self.symbol(id).data {
            SymbolData::TypeParameter(t) => Some(t),
            _ => None,
        }
    }

    /// `TypeKind` of a type symbol; `None` for namespaces and members.
    pub fn type_kind(&self, id: SymbolId) -> Option<TypeKind> {
        match &self.symbol(id).data {
            SymbolData::Type(t) => Some(t.type_kind),
            SymbolData::TypeParameter(_) => Some(TypeKind::TypeParameter),
            _ => None,
        }
    }

    pub fn special_type(&self, id: SymbolId) -> Option<SpecialType> {
        self.type_data(id).and_then(|t| t.special)
    }

    pub fn is_error_type(&self, id: SymbolId) -> bool {
        self.type_kind(id) == Some(TypeKind::Error)
    }

    /// Number of type parameters declared (or type arguments supplied).
    pub fn arity(&self, id: SymbolId) -> usize {
        match &self.symbol(id).data {
            SymbolData::Type(t) if t.original.is_some() => t.type_arguments.len(),
            SymbolData::Type(t) => t.type_parameters.len(),
            SymbolData::Method(m) => m.type_parameters.len(),
            _ => 0,
        }
    }

    pub fn type_parameters(&self, id: SymbolId) -> &[SymbolId] {
        match &self.symbol(id).data {
            SymbolData::Type(t) => match t.original {
                Some(original) => self.type_parameters(original),
                None => &t.type_parameters,
            },
            SymbolData::Method(m) => &m.type_parameters,
            _ => &[],
        }
    }

    pub fn type_arguments(&self, id: SymbolId) -> &[SymbolId] {
        self.type_data(id).map_or(&[], |t| &t.type_arguments)
    }

    /// The unconstructed generic definition of `id`, or `id` itself.
    pub fn original_definition(&self, id: SymbolId) -> SymbolId {
        self.type_data(id).and_then(|t| t.original).unwrap_or(id)
    }

    pub fn base_type(&self, id: SymbolId) -> Option<SymbolId> {
        self.type_data(id).and_then(|t| t.base_type)
    }

    pub fn interfaces(&self, id: SymbolId) -> &[SymbolId] {
        self.type_data(id).map_or(&[], |t| &t.interfaces)
    }

    /// Element type of an array, pointee of a pointer, target of a ref.
    pub fn element_type(&self, id: SymbolId) -> Option<SymbolId> {
        self.type_data(id).and_then(|t| t.element)
    }

    pub fn rank(&self, id: SymbolId) -> u32 {
        self.type_data(id).map_or(0, |t| t.rank)
    }

    /// Members of a namespace or type named `name`.
    ///
    /// Constructed types expose the members of their generic definition.
    pub fn members(&self, scope: SymbolId, name: &str) -> &[SymbolId] {
        match self.interner.find(name) {
            Some(name) => self.members_named(scope, name),
            None => &[],
        }
    }

    pub fn members_named(&self, scope: SymbolId, name: Name) -> &[SymbolId] {
        let map = match &self.symbol(scope).data {
            SymbolData::Namespace(ns) => &ns.members,
            SymbolData::Type(t) => match t.original {
                Some(original) => return self.members_named(original, name),
                None => &t.members,
            },
            _ => return &[],
        };
        map.get(&name).map_or(&[], |v| v.as_slice())
    }

    pub fn accessibility(&self, id: SymbolId) -> Accessibility {
        self.symbol(id).accessibility
    }

    pub fn is_static(&self, id: SymbolId) -> bool {
        self.symbol(id).is_static
    }

    pub fn assembly(&self, id: SymbolId) -> AssemblyId {
        self.symbol(id).assembly
    }

    pub fn container(&self, id: SymbolId) -> Option<SymbolId> {
        self.symbol(id).container
    }

    /// Nearest enclosing type, skipping an owning method of a type parameter.
    pub fn containing_type(&self, id: SymbolId) -> Option<SymbolId> {
        let mut current = self.symbol(id).container;
        while let Some(c) = current {
            match &self.symbol(c).data {
                SymbolData::Type(_) => return Some(c),
                SymbolData::Namespace(_) => return None,
                _ => current = self.symbol(c).container,
            }
        }
        None
    }

    pub fn containing_namespace(&self, id: SymbolId) -> Option<SymbolId> {
        let mut current = self.symbol(id).container;
        while let Some(c) = current {
            if let SymbolData::Namespace(_) = self.symbol(c).data {
                return Some(c);
            }
            current = self.symbol(c).container;
        }
        None
    }

    /// Declared type of a field or property.
    pub fn member_type(&self, id: SymbolId) -> Option<SymbolId> {
        match &self.symbol(id).data {
            SymbolData::Field(f) => Some(f.ty),
            SymbolData::Property(p) => Some(p.ty),
            _ => None,
        }
    }

    /// Resolve a dotted path such as `N.Outer.Inner.M` from the global namespace.
    ///
    /// Takes the first member of each name, which is enough for tests and
    /// diagnostics; binding goes through member lookup instead.
    pub fn lookup_path(&self, path: &str) -> Option<SymbolId> {
        path.split('.')
            .try_fold(self.global_namespace, |scope, segment| {
                self.members(scope, segment).first().copied()
            })
    }

    /// Human-readable name used in diagnostics (`N.C<T>`, `int[,]`, `T*`).
    pub fn display(&self, id: SymbolId) -> String {
        if let Some(keyword) = self.special_type(id).and_then(|s| s.keyword()) {
            return keyword.to_string();
        }
        let symbol = self.symbol(id);
        match &symbol.data {
            SymbolData::Type(t) => match t.type_kind {
                TypeKind::Array => {
                    let element = t.element.map(|e| self.display(e)).unwrap_or_default();
                    let commas = ",".repeat(t.rank.saturating_sub(1) as usize);
                    format!("{element}[{commas}]")
                }
                TypeKind::Pointer => {
                    let element = t.element.map(|e| self.display(e)).unwrap_or_default();
                    format!("{element}*")
                }
                TypeKind::Ref => {
                    let element = t.element.map(|e| self.display(e)).unwrap_or_default();
                    format!("ref {element}")
                }
                TypeKind::Error => "?".to_string(),
                _ => {
                    let mut out = self.qualified_prefix(id);
                    out.push_str(&self.name(id));
                    let args: Vec<String> = if t.original.is_some() {
                        t.type_arguments.iter().map(|a| self.display(*a)).collect()
                    } else {
                        t.type_parameters.iter().map(|p| self.name(*p).to_string()).collect()
                    };
                    if !args.is_empty() {
                        out.push('<');
                        out.push_str(&args.join(", "));
                        out.push('>');
                    }
                    out
                }
            },
            SymbolData::TypeParameter(_) => self.name(id).to_string(),
            _ => {
                let mut out = self.qualified_prefix(id);
                out.push_str(&self.name(id));
                out
            }
        }
    }

    fn qualified_prefix(&self, id: SymbolId) -> String {
        match self.symbol(id).container {
            Some(c) if c != self.global_namespace => format!("{}.", self.display(c)),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::{MemberDecl, SymbolGraphBuilder, TypeDecl};

    #[test]
    fn test_special_type_keywords() {
        assert_eq!(SpecialType::from_keyword("int"), Some(SpecialType::Int32));
        assert_eq!(SpecialType::from_keyword("object"), Some(SpecialType::Object));
        assert_eq!(SpecialType::from_keyword("Array"), None);
        assert!(SpecialType::UInt64.is_integral());
        assert!(!SpecialType::Double.is_integral());
    }

    #[test]
    fn test_graph_display_and_paths() {
        let mut builder = SymbolGraphBuilder::new();
        let app = builder.add_assembly("App");
        let ns = builder
            .add_namespace(builder.global_namespace(), "N")
            .unwrap();
        let outer = builder
            .add_type(TypeDecl::new(TypeKind::Class, ns, "Outer").in_assembly(app))
            .unwrap();
        builder.add_type_parameter(outer, "T").unwrap();
        let int = builder.special(SpecialType::Int32);
        let field = builder
            .add_field(MemberDecl::new(outer, "count"), int)
            .unwrap();
        let matrix = builder.array_of(int, 2);
        let graph = builder.build().unwrap();

        assert_eq!(graph.display(outer), "N.Outer<T>");
        assert_eq!(graph.display(field), "N.Outer<T>.count");
        assert_eq!(graph.display(matrix), "int[,]");
        assert_eq!(graph.lookup_path("N.Outer.count"), Some(field));
        assert_eq!(graph.kind(matrix), SymbolKind::ArrayType);
        assert_eq!(graph.arity(outer), 1);
        assert_eq!(graph.containing_type(field), Some(outer));
        assert_eq!(graph.containing_namespace(field), Some(ns));
    }

    #[test]
    fn test_unknown_names_have_no_members() {
        let graph = SymbolGraphBuilder::new().build().unwrap();
        let object = graph.well_known().object();
        assert!(graph.members(object, "NoSuchMember").is_empty());
        assert_eq!(graph.display(object), "object");
    }
}
