//! Construction of a [`SymbolGraph`].
//!
//! The builder seeds the core assembly (the `System` namespace with the
//! [`SpecialType`]s and the root object type's members), accepts declarations,
//! and on [`build`](SymbolGraphBuilder::build) fills in implicit base types and
//! rejects cyclic inheritance or constraints. Everything member lookup relies
//! on structurally (acyclic base chains, acyclic interface graphs) is checked
//! here once, so lookup itself never has to guard against it.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use thiserror::Error;

use super::ids::{AssemblyId, SymbolId};
use super::symbols::{
    Accessibility, FieldData, MemberMap, MethodData, NamespaceData, Parameter, PropertyData,
    SpecialType, Symbol, SymbolData, SymbolGraph, TypeData, TypeKind, TypeParameterData,
    WellKnownTypes,
};
use crate::base::{Interner, Location};

/// Name under which indexers are stored in member tables.
pub const INDEXER_NAME: &str = "this[]";

/// Errors raised while building a symbol graph.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("'{0}' is not a valid identifier")]
    InvalidIdentifier(SmolStr),

    #[error("'{symbol}' is not a {expected}")]
    WrongSymbolKind {
        symbol: String,
        expected: &'static str,
    },

    #[error("circular base dependency involving '{0}'")]
    CyclicBase(String),

    #[error("circular constraint dependency involving '{0}'")]
    CyclicConstraint(String),

    #[error("'{generic}' requires {expected} type argument(s) but {actual} were supplied")]
    ArityMismatch {
        generic: String,
        expected: usize,
        actual: usize,
    },

    #[error("unknown assembly {0:?}")]
    UnknownAssembly(AssemblyId),
}

/// A constraint on a type parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeConstraint {
    Type(SymbolId),
    /// `where T : class`
    Class,
    /// `where T : struct`
    Struct,
}

/// Declaration of a namespace member or nested type.
#[derive(Clone, Debug)]
pub struct TypeDecl {
    kind: TypeKind,
    container: SymbolId,
    name: SmolStr,
    assembly: Option<AssemblyId>,
    accessibility: Option<Accessibility>,
    is_static: bool,
    location: Option<Location>,
}

impl TypeDecl {
    pub fn new(kind: TypeKind, container: SymbolId, name: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            container,
            name: name.into(),
            assembly: None,
            accessibility: None,
            is_static: false,
            location: None,
        }
    }

    pub fn in_assembly(mut self, assembly: AssemblyId) -> Self {
        self.assembly = Some(assembly);
        self
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = Some(accessibility);
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// Declaration of a method, field or property.
#[derive(Clone, Debug)]
pub struct MemberDecl {
    container: SymbolId,
    name: SmolStr,
    accessibility: Option<Accessibility>,
    is_static: bool,
    is_const: bool,
    is_readonly: bool,
    location: Option<Location>,
}

impl MemberDecl {
    pub fn new(container: SymbolId, name: impl Into<SmolStr>) -> Self {
        Self {
            container,
            name: name.into(),
            accessibility: None,
            is_static: false,
            is_const: false,
            is_readonly: false,
            location: None,
        }
    }

    pub fn indexer(container: SymbolId) -> Self {
        Self::new(container, INDEXER_NAME)
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = Some(accessibility);
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Constants are implicitly static.
    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self.is_static = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.is_readonly = true;
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// Mutable front of a [`SymbolGraph`] under construction.
#[derive(Debug)]
pub struct SymbolGraphBuilder {
    graph: SymbolGraph,
    default_assembly: AssemblyId,
    arrays: FxHashMap<(SymbolId, u32), SymbolId>,
    pointers: FxHashMap<SymbolId, SymbolId>,
    refs: FxHashMap<SymbolId, SymbolId>,
    constructed: FxHashMap<(SymbolId, Vec<SymbolId>), SymbolId>,
}

impl Default for SymbolGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolGraphBuilder {
    /// Create a builder seeded with the core assembly.
    pub fn new() -> Self {
        let interner = Interner::new();
        let global = Symbol {
            name: interner.intern(""),
            container: None,
            assembly: AssemblyId::CORE,
            accessibility: Accessibility::Public,
            is_static: true,
            location: None,
            data: SymbolData::Namespace(NamespaceData::default()),
        };
        let error = Symbol {
            name: interner.intern("?"),
            container: None,
            assembly: AssemblyId::CORE,
            accessibility: Accessibility::Public,
            is_static: false,
            location: None,
            data: SymbolData::Type(TypeData::new(TypeKind::Error)),
        };
        let graph = SymbolGraph {
            symbols: vec![global, error],
            interner,
            assemblies: vec![SmolStr::new("corlib")],
            global_namespace: SymbolId::new(0),
            error_type: SymbolId::new(1),
            well_known: WellKnownTypes::empty(),
        };
        let mut builder = Self {
            graph,
            default_assembly: AssemblyId::CORE,
            arrays: FxHashMap::default(),
            pointers: FxHashMap::default(),
            refs: FxHashMap::default(),
            constructed: FxHashMap::default(),
        };
        builder.seed_core_library();
        builder
    }

    fn seed_core_library(&mut self) {
        let system = self.namespace_unchecked(self.graph.global_namespace, "System");
        let mut table = Vec::with_capacity(SpecialType::ALL.len());
        for special in SpecialType::ALL {
            let mut data = TypeData::new(special.type_kind());
            data.special = Some(special);
            let id = self.push(
                special.metadata_name(),
                Some(system),
                AssemblyId::CORE,
                Accessibility::Public,
                false,
                None,
                SymbolData::Type(data),
            );
            self.attach(system, id);
            table.push(id);
        }
        self.graph.well_known = WellKnownTypes::new(table);

        let table = self.graph.well_known.clone();
        let wk = |s| table.get(s);
        let bases = [
            (SpecialType::ValueType, SpecialType::Object),
            (SpecialType::Enum, SpecialType::ValueType),
            (SpecialType::Array, SpecialType::Object),
            (SpecialType::Delegate, SpecialType::Object),
            (SpecialType::MulticastDelegate, SpecialType::Delegate),
            (SpecialType::String, SpecialType::Object),
        ]
        .map(|(derived, base)| (wk(derived), wk(base)));
        for (derived, base) in bases {
            self.type_data_mut(derived).base_type = Some(base);
        }
        let value_type = wk(SpecialType::ValueType);
        let structs: Vec<_> = SpecialType::ALL
            .into_iter()
            .filter(|s| s.type_kind() == TypeKind::Struct)
            .map(wk)
            .collect();
        for id in structs {
            self.type_data_mut(id).base_type = Some(value_type);
        }

        // The root type's members are what interfaces and type parameters see
        // through their implicit object base.
        let object = wk(SpecialType::Object);
        let string = wk(SpecialType::String);
        let boolean = wk(SpecialType::Boolean);
        let int = wk(SpecialType::Int32);
        let members = [
            ("ToString", Some(string), None),
            ("Equals", Some(boolean), Some(("obj", object))),
            ("GetHashCode", Some(int), None),
        ];
        for (name, return_type, parameter) in members {
            let parameters = parameter
                .map(|(p, ty)| {
                    vec![Parameter {
                        name: self.graph.interner.intern(p),
                        ty,
                    }]
                })
                .unwrap_or_default();
            let method = self.push(
                name,
                Some(object),
                AssemblyId::CORE,
                Accessibility::Public,
                false,
                None,
                SymbolData::Method(MethodData {
                    type_parameters: Vec::new(),
                    parameters,
                    return_type,
                }),
            );
            self.attach(object, method);
        }
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Read access to the graph built so far.
    pub fn graph(&self) -> &SymbolGraph {
        &self.graph
    }

    pub fn global_namespace(&self) -> SymbolId {
        self.graph.global_namespace
    }

    pub fn error_type(&self) -> SymbolId {
        self.graph.error_type
    }

    pub fn special(&self, special: SpecialType) -> SymbolId {
        self.graph.well_known.get(special)
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    /// Register a new assembly; later declarations default to it.
    pub fn add_assembly(&mut self, name: impl Into<SmolStr>) -> AssemblyId {
        let id = AssemblyId::new(self.graph.assemblies.len() as u32);
        self.graph.assemblies.push(name.into());
        self.default_assembly = id;
        id
    }

    /// Make `assembly` the default for declarations without an explicit one.
    pub fn set_default_assembly(&mut self, assembly: AssemblyId) -> Result<(), GraphError> {
        if assembly.index() >= self.graph.assemblies.len() {
            return Err(GraphError::UnknownAssembly(assembly));
        }
        self.default_assembly = assembly;
        Ok(())
    }

    /// Get or create the namespace `name` inside `parent`.
    ///
    /// Namespaces are shared by every assembly that declares into them.
    pub fn add_namespace(&mut self, parent: SymbolId, name: &str) -> Result<SymbolId, GraphError> {
        validate_identifier(name)?;
        self.expect_namespace(parent)?;
        Ok(self.namespace_unchecked(parent, name))
    }

    fn namespace_unchecked(&mut self, parent: SymbolId, name: &str) -> SymbolId {
        if let Some(existing) = self
            .graph
            .members(parent, name)
            .iter()
            .copied()
            .find(|&m| matches!(self.graph.symbol(m).data, SymbolData::Namespace(_)))
        {
            return existing;
        }
        let id = self.push(
            name,
            Some(parent),
            AssemblyId::CORE,
            Accessibility::Public,
            true,
            None,
            SymbolData::Namespace(NamespaceData::default()),
        );
        self.attach(parent, id);
        id
    }

    pub fn add_type(&mut self, decl: TypeDecl) -> Result<SymbolId, GraphError> {
        validate_identifier(&decl.name)?;
        if !matches!(
            decl.kind,
            TypeKind::Class | TypeKind::Struct | TypeKind::Interface | TypeKind::Enum | TypeKind::Delegate
        ) {
            return Err(GraphError::WrongSymbolKind {
                symbol: decl.name.to_string(),
                expected: "declarable type kind",
            });
        }
        let nested = match &self.graph.symbol(decl.container).data {
            SymbolData::Namespace(_) => false,
            SymbolData::Type(t) if t.original.is_none() && is_named(t.type_kind) => true,
            _ => {
                return Err(GraphError::WrongSymbolKind {
                    symbol: self.graph.display(decl.container),
                    expected: "namespace or type",
                });
            }
        };
        let assembly = match decl.assembly {
            Some(a) if a.index() >= self.graph.assemblies.len() => {
                return Err(GraphError::UnknownAssembly(a));
            }
            Some(a) => a,
            None if nested => self.graph.assembly(decl.container),
            None => self.default_assembly,
        };
        let accessibility = decl.accessibility.unwrap_or(if nested {
            Accessibility::Private
        } else {
            Accessibility::Internal
        });
        let id = self.push(
            &decl.name,
            Some(decl.container),
            assembly,
            accessibility,
            decl.is_static,
            decl.location,
            SymbolData::Type(TypeData::new(decl.kind)),
        );
        self.attach(decl.container, id);
        Ok(id)
    }

    /// Declare a type parameter on a generic type or method definition.
    pub fn add_type_parameter(&mut self, owner: SymbolId, name: &str) -> Result<SymbolId, GraphError> {
        validate_identifier(name)?;
        let ordinal = match &self.graph.symbol(owner).data {
            SymbolData::Type(t) if t.original.is_none() && is_named(t.type_kind) => t.type_parameters.len(),
            SymbolData::Method(m) => m.type_parameters.len(),
            _ => {
                return Err(GraphError::WrongSymbolKind {
                    symbol: self.graph.display(owner),
                    expected: "generic type or method definition",
                });
            }
        };
        let assembly = self.graph.assembly(owner);
        let id = self.push(
            name,
            Some(owner),
            assembly,
            Accessibility::NotApplicable,
            false,
            None,
            SymbolData::TypeParameter(TypeParameterData {
                ordinal: ordinal as u32,
                ..TypeParameterData::default()
            }),
        );
        match &mut self.graph.symbols[owner.index()].data {
            SymbolData::Type(t) => t.type_parameters.push(id),
            SymbolData::Method(m) => m.type_parameters.push(id),
            _ => {}
        }
        Ok(id)
    }

    pub fn add_constraint(&mut self, type_parameter: SymbolId, constraint: TypeConstraint) -> Result<(), GraphError> {
        let display = self.graph.display(type_parameter);
        let SymbolData::TypeParameter(data) = &mut self.graph.symbols[type_parameter.index()].data else {
            return Err(GraphError::WrongSymbolKind {
                symbol: display,
                expected: "type parameter",
            });
        };
        match constraint {
            TypeConstraint::Type(ty) => data.constraint_types.push(ty),
            TypeConstraint::Class => data.has_class_constraint = true,
            TypeConstraint::Struct => data.has_struct_constraint = true,
        }
        Ok(())
    }

    pub fn add_method(&mut self, decl: MemberDecl) -> Result<SymbolId, GraphError> {
        self.add_member(decl, SymbolData::Method(MethodData::default()))
    }

    pub fn add_field(&mut self, decl: MemberDecl, ty: SymbolId) -> Result<SymbolId, GraphError> {
        let data = FieldData {
            ty,
            is_const: decl.is_const,
            is_readonly: decl.is_readonly,
        };
        self.add_member(decl, SymbolData::Field(data))
    }

    pub fn add_property(&mut self, decl: MemberDecl, ty: SymbolId) -> Result<SymbolId, GraphError> {
        self.add_member(
            decl,
            SymbolData::Property(PropertyData {
                ty,
                parameters: Vec::new(),
            }),
        )
    }

    fn add_member(&mut self, decl: MemberDecl, data: SymbolData) -> Result<SymbolId, GraphError> {
        if decl.name != INDEXER_NAME {
            validate_identifier(&decl.name)?;
        }
        let in_interface = match &self.graph.symbol(decl.container).data {
            SymbolData::Type(t) if t.original.is_none() && is_named(t.type_kind) => {
                t.type_kind == TypeKind::Interface
            }
            _ => {
                return Err(GraphError::WrongSymbolKind {
                    symbol: self.graph.display(decl.container),
                    expected: "type definition",
                });
            }
        };
        let accessibility = decl.accessibility.unwrap_or(if in_interface {
            Accessibility::Public
        } else {
            Accessibility::Private
        });
        let assembly = self.graph.assembly(decl.container);
        let id = self.push(
            &decl.name,
            Some(decl.container),
            assembly,
            accessibility,
            decl.is_static,
            decl.location,
            data,
        );
        self.attach(decl.container, id);
        Ok(id)
    }

    /// Set the parameter list of a method or indexer.
    pub fn set_parameters(&mut self, member: SymbolId, parameters: &[(&str, SymbolId)]) -> Result<(), GraphError> {
        let parameters: Vec<Parameter> = parameters
            .iter()
            .map(|&(name, ty)| {
                validate_identifier(name).map(|_| Parameter {
                    name: self.graph.interner.intern(name),
                    ty,
                })
            })
            .collect::<Result<_, _>>()?;
        let display = self.graph.display(member);
        match &mut self.graph.symbols[member.index()].data {
            SymbolData::Method(m) => m.parameters = parameters,
            SymbolData::Property(p) => p.parameters = parameters,
            _ => {
                return Err(GraphError::WrongSymbolKind {
                    symbol: display,
                    expected: "method or indexer",
                });
            }
        }
        Ok(())
    }

    pub fn set_return_type(&mut self, method: SymbolId, ty: SymbolId) -> Result<(), GraphError> {
        let display = self.graph.display(method);
        let void = self.special(SpecialType::Void);
        let SymbolData::Method(m) = &mut self.graph.symbols[method.index()].data else {
            return Err(GraphError::WrongSymbolKind {
                symbol: display,
                expected: "method",
            });
        };
        m.return_type = if ty == void { None } else { Some(ty) };
        Ok(())
    }

    /// Set the explicit base class of a class.
    pub fn set_base_type(&mut self, ty: SymbolId, base: SymbolId) -> Result<(), GraphError> {
        let derived_ok = self.graph.type_data(ty).is_some_and(|t| t.original.is_none() && t.type_kind == TypeKind::Class);
        if !derived_ok {
            return Err(GraphError::WrongSymbolKind {
                symbol: self.graph.display(ty),
                expected: "class definition",
            });
        }
        if self.graph.type_kind(base) != Some(TypeKind::Class) {
            return Err(GraphError::WrongSymbolKind {
                symbol: self.graph.display(base),
                expected: "class",
            });
        }
        self.type_data_mut(ty).base_type = Some(base);
        Ok(())
    }

    /// Append a directly declared interface to a type's base list.
    pub fn add_interface(&mut self, ty: SymbolId, interface: SymbolId) -> Result<(), GraphError> {
        let owner_ok = self
            .graph
            .type_data(ty)
            .is_some_and(|t| t.original.is_none() && matches!(t.type_kind, TypeKind::Class | TypeKind::Struct | TypeKind::Interface));
        if !owner_ok {
            return Err(GraphError::WrongSymbolKind {
                symbol: self.graph.display(ty),
                expected: "class, struct or interface definition",
            });
        }
        if self.graph.type_kind(interface) != Some(TypeKind::Interface) {
            return Err(GraphError::WrongSymbolKind {
                symbol: self.graph.display(interface),
                expected: "interface",
            });
        }
        let data = self.type_data_mut(ty);
        if !data.interfaces.contains(&interface) {
            data.interfaces.push(interface);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Derived types
    // ------------------------------------------------------------------

    /// Instantiate a generic type definition with type arguments.
    pub fn construct(&mut self, generic: SymbolId, arguments: &[SymbolId]) -> Result<SymbolId, GraphError> {
        let expected = match self.graph.type_data(generic) {
            Some(t) if t.original.is_none() && is_named(t.type_kind) => t.type_parameters.len(),
            _ => {
                return Err(GraphError::WrongSymbolKind {
                    symbol: self.graph.display(generic),
                    expected: "generic type definition",
                });
            }
        };
        if expected != arguments.len() || expected == 0 {
            return Err(GraphError::ArityMismatch {
                generic: self.graph.display(generic),
                expected,
                actual: arguments.len(),
            });
        }
        let key = (generic, arguments.to_vec());
        if let Some(&existing) = self.constructed.get(&key) {
            return Ok(existing);
        }
        let original = self.graph.symbol(generic);
        let (name, container, assembly, accessibility, is_static) = (
            original.name,
            original.container,
            original.assembly,
            original.accessibility,
            original.is_static,
        );
        let mut data = TypeData::new(self.graph.type_kind(generic).unwrap_or(TypeKind::Class));
        data.original = Some(generic);
        data.type_arguments = arguments.to_vec();
        let id = self.push_named(name, container, assembly, accessibility, is_static, None, SymbolData::Type(data));
        self.constructed.insert(key, id);
        Ok(id)
    }

    pub fn array_of(&mut self, element: SymbolId, rank: u32) -> SymbolId {
        let rank = rank.max(1);
        if let Some(&existing) = self.arrays.get(&(element, rank)) {
            return existing;
        }
        let mut data = TypeData::new(TypeKind::Array);
        data.element = Some(element);
        data.rank = rank;
        data.base_type = Some(self.special(SpecialType::Array));
        let id = self.push("", None, self.graph.assembly(element), Accessibility::NotApplicable, false, None, SymbolData::Type(data));
        self.arrays.insert((element, rank), id);
        id
    }

    pub fn pointer_to(&mut self, pointee: SymbolId) -> SymbolId {
        if let Some(&existing) = self.pointers.get(&pointee) {
            return existing;
        }
        let mut data = TypeData::new(TypeKind::Pointer);
        data.element = Some(pointee);
        let id = self.push("", None, self.graph.assembly(pointee), Accessibility::NotApplicable, false, None, SymbolData::Type(data));
        self.pointers.insert(pointee, id);
        id
    }

    pub fn ref_to(&mut self, referenced: SymbolId) -> SymbolId {
        if let Some(&existing) = self.refs.get(&referenced) {
            return existing;
        }
        let mut data = TypeData::new(TypeKind::Ref);
        data.element = Some(referenced);
        let id = self.push("", None, self.graph.assembly(referenced), Accessibility::NotApplicable, false, None, SymbolData::Type(data));
        self.refs.insert(referenced, id);
        id
    }

    // ------------------------------------------------------------------
    // Finishing
    // ------------------------------------------------------------------

    /// Fill in implicit base types, validate the graph and freeze it.
    pub fn build(mut self) -> Result<SymbolGraph, GraphError> {
        let object = self.special(SpecialType::Object);
        let value_type = self.special(SpecialType::ValueType);
        let enum_type = self.special(SpecialType::Enum);
        let multicast = self.special(SpecialType::MulticastDelegate);

        for symbol in &mut self.graph.symbols {
            let SymbolData::Type(t) = &mut symbol.data else {
                continue;
            };
            if t.base_type.is_some() || t.original.is_some() || t.special == Some(SpecialType::Object) {
                continue;
            }
            t.base_type = match t.type_kind {
                TypeKind::Class => Some(object),
                TypeKind::Struct => Some(value_type),
                TypeKind::Enum => Some(enum_type),
                TypeKind::Delegate => Some(multicast),
                _ => None,
            };
        }

        // Constructed types share their definition's bases; type arguments are
        // not substituted into base lists.
        let constructed: Vec<(SymbolId, SymbolId)> = self
            .constructed
            .iter()
            .map(|((generic, _), &id)| (*generic, id))
            .collect();
        for (generic, id) in constructed {
            let (base, interfaces) = match self.graph.type_data(generic) {
                Some(t) => (t.base_type, t.interfaces.clone()),
                None => continue,
            };
            let data = self.type_data_mut(id);
            data.base_type = base;
            data.interfaces = interfaces;
        }

        self.check_base_cycles()?;
        self.check_interface_cycles()?;
        self.check_constraint_cycles()?;

        tracing::info!(
            "built symbol graph: {} symbols, {} assemblies",
            self.graph.symbols.len(),
            self.graph.assemblies.len()
        );
        Ok(self.graph)
    }

    fn check_base_cycles(&self) -> Result<(), GraphError> {
        for (id, _) in self.graph.iter() {
            let mut seen = FxHashSet::default();
            let mut current = Some(id);
            while let Some(ty) = current {
                if !seen.insert(self.graph.original_definition(ty)) {
                    return Err(GraphError::CyclicBase(self.graph.display(id)));
                }
                current = self.graph.base_type(ty);
            }
        }
        Ok(())
    }

    fn check_interface_cycles(&self) -> Result<(), GraphError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }
        fn visit(graph: &SymbolGraph, id: SymbolId, marks: &mut FxHashMap<SymbolId, Mark>) -> Result<(), GraphError> {
            let id = graph.original_definition(id);
            match marks.get(&id) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::Visiting) => return Err(GraphError::CyclicBase(graph.display(id))),
                None => {}
            }
            marks.insert(id, Mark::Visiting);
            for &interface in graph.interfaces(id) {
                visit(graph, interface, marks)?;
            }
            marks.insert(id, Mark::Done);
            Ok(())
        }

        let mut marks = FxHashMap::default();
        for (id, symbol) in self.graph.iter() {
            if matches!(&symbol.data, SymbolData::Type(t) if t.type_kind == TypeKind::Interface) {
                visit(&self.graph, id, &mut marks)?;
            }
        }
        Ok(())
    }

    fn check_constraint_cycles(&self) -> Result<(), GraphError> {
        for (id, symbol) in self.graph.iter() {
            if !matches!(symbol.data, SymbolData::TypeParameter(_)) {
                continue;
            }
            let mut stack = vec![id];
            let mut seen = FxHashSet::default();
            while let Some(tp) = stack.pop() {
                for &constraint in self.graph.type_parameter_data(tp).map_or(&[][..], |d| d.constraint_types()) {
                    if constraint == id {
                        return Err(GraphError::CyclicConstraint(self.graph.display(id)));
                    }
                    if self.graph.type_parameter_data(constraint).is_some() && seen.insert(constraint) {
                        stack.push(constraint);
                    }
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    #[allow(clippy::too_many_arguments)]
    fn push(
        &mut self,
        name: &str,
        container: Option<SymbolId>,
        assembly: AssemblyId,
        accessibility: Accessibility,
        is_static: bool,
        location: Option<Location>,
        data: SymbolData,
    ) -> SymbolId {
        let name = self.graph.interner.intern(name);
        self.push_named(name, container, assembly, accessibility, is_static, location, data)
    }

    #[allow(clippy::too_many_arguments)]
    fn push_named(
        &mut self,
        name: crate::base::Name,
        container: Option<SymbolId>,
        assembly: AssemblyId,
        accessibility: Accessibility,
        is_static: bool,
        location: Option<Location>,
        data: SymbolData,
    ) -> SymbolId {
        let id = SymbolId::new(self.graph.symbols.len() as u32);
        self.graph.symbols.push(Symbol {
            name,
            container,
            assembly,
            accessibility,
            is_static,
            location,
            data,
        });
        id
    }

    /// Register `member` in its container's member table.
    fn attach(&mut self, container: SymbolId, member: SymbolId) {
        let name = self.graph.symbols[member.index()].name;
        let members: &mut MemberMap = match &mut self.graph.symbols[container.index()].data {
            SymbolData::Namespace(ns) => &mut ns.members,
            SymbolData::Type(t) => &mut t.members,
            _ => return,
        };
        members.entry(name).or_default().push(member);
    }

    fn type_data_mut(&mut self, id: SymbolId) -> &mut TypeData {
        match &mut self.graph.symbols[id.index()].data {
            SymbolData::Type(t) => t,
            _ => unreachable!("type_data_mut called on a non-type symbol"),
        }
    }

    fn expect_namespace(&self, id: SymbolId) -> Result<(), GraphError> {
        match self.graph.symbol(id).data {
            SymbolData::Namespace(_) => Ok(()),
            _ => Err(GraphError::WrongSymbolKind {
                symbol: self.graph.display(id),
                expected: "namespace",
            }),
        }
    }
}

fn is_named(kind: TypeKind) -> bool {
    matches!(
        kind,
        TypeKind::Class | TypeKind::Struct | TypeKind::Interface | TypeKind::Enum | TypeKind::Delegate
    )
}

fn validate_identifier(name: &str) -> Result<(), GraphError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first == '_' || unicode_ident::is_xid_start(first)) && chars.all(unicode_ident::is_xid_continue)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(GraphError::InvalidIdentifier(SmolStr::new(name)))
    }
}
