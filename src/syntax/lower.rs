//! Lowering parsed units into a symbol graph.
//!
//! Runs in phases so that declaration order in the source never matters:
//!
//! 1. declare namespaces, types and their type parameters;
//! 2. resolve base lists and constraints;
//! 3. declare members with resolved signatures;
//! 4. resolve every type written inside method bodies.
//!
//! Type names resolve against method type parameters, then each enclosing type
//! (its type parameters and nested types), then the enclosing namespaces
//! outward. Nested types inherited from base classes are not considered.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::SyntaxError;
use super::ast::*;
use crate::base::{FileId, Location, TextRange};
use crate::hir::{
    Accessibility, AssemblyId, MemberDecl, SymbolGraph, SymbolGraphBuilder, SymbolId, SymbolKind,
    TypeConstraint, TypeDecl, TypeKind,
};

/// A method body ready for binding.
#[derive(Clone, Debug)]
pub struct MethodBody {
    pub method: SymbolId,
    pub file: FileId,
    pub block: Block,
    /// Types written in the body, keyed by the range of their syntax.
    pub types: FxHashMap<TextRange, SymbolId>,
}

impl MethodBody {
    pub fn resolved_type(&self, syntax: &TypeSyntax) -> Option<SymbolId> {
        self.types.get(&syntax.range()).copied()
    }
}

/// Result of lowering: the finished graph plus the bodies to bind.
#[derive(Debug)]
pub struct LoweredProgram {
    pub graph: SymbolGraph,
    /// One entry per lowered assembly, in input order.
    pub assemblies: Vec<AssemblyId>,
    pub bodies: Vec<MethodBody>,
}

impl LoweredProgram {
    pub fn body_of(&self, method: SymbolId) -> Option<&MethodBody> {
        self.bodies.iter().find(|b| b.method == method)
    }
}

/// Lower units into a single assembly named `App`.
pub fn lower(units: &[SourceUnit]) -> Result<LoweredProgram, SyntaxError> {
    lower_assemblies(&[("App", units)])
}

/// Lower several assemblies into one graph. Types may reference types of any
/// assembly in the list.
pub fn lower_assemblies(assemblies: &[(&str, &[SourceUnit])]) -> Result<LoweredProgram, SyntaxError> {
    let mut lowerer = Lowerer {
        builder: SymbolGraphBuilder::new(),
        types: Vec::new(),
        methods: Vec::new(),
    };
    let mut ids = Vec::with_capacity(assemblies.len());
    for (name, units) in assemblies {
        let assembly = lowerer.builder.add_assembly(*name);
        ids.push(assembly);
        for unit in units.iter() {
            let global = lowerer.builder.global_namespace();
            lowerer.declare_namespace_members(&unit.members, global, unit.file, assembly)?;
        }
    }
    lowerer.resolve_headers()?;
    lowerer.declare_members()?;
    let bodies = lowerer.resolve_bodies()?;

    tracing::info!(
        "lowered {} types and {} method bodies",
        lowerer.types.len(),
        bodies.len()
    );
    Ok(LoweredProgram {
        graph: lowerer.builder.build()?,
        assemblies: ids,
        bodies,
    })
}

/// Where type names are resolved from.
#[derive(Clone, Copy, Debug)]
struct Scope {
    namespace: SymbolId,
    ty: Option<SymbolId>,
    method: Option<SymbolId>,
}

struct DeclaredType<'u> {
    syntax: &'u TypeDeclaration,
    symbol: SymbolId,
    namespace: SymbolId,
    file: FileId,
}

struct DeclaredMethod<'u> {
    syntax: &'u MethodDeclaration,
    symbol: SymbolId,
    scope: Scope,
    file: FileId,
}

struct Lowerer<'u> {
    builder: SymbolGraphBuilder,
    types: Vec<DeclaredType<'u>>,
    methods: Vec<DeclaredMethod<'u>>,
}

impl<'u> Lowerer<'u> {
    // ------------------------------------------------------------------
    // Phase 1: namespaces and types
    // ------------------------------------------------------------------

    fn declare_namespace_members(
        &mut self,
        members: &'u [NamespaceMember],
        namespace: SymbolId,
        file: FileId,
        assembly: AssemblyId,
    ) -> Result<(), SyntaxError> {
        for member in members {
            match member {
                NamespaceMember::Namespace(decl) => {
                    let mut inner = namespace;
                    for segment in &decl.name {
                        inner = self.builder.add_namespace(inner, &segment.text)?;
                    }
                    self.declare_namespace_members(&decl.members, inner, file, assembly)?;
                }
                NamespaceMember::Type(decl) => {
                    self.declare_type(decl, namespace, namespace, file, assembly)?;
                }
            }
        }
        Ok(())
    }

    fn declare_type(
        &mut self,
        syntax: &'u TypeDeclaration,
        container: SymbolId,
        namespace: SymbolId,
        file: FileId,
        assembly: AssemblyId,
    ) -> Result<(), SyntaxError> {
        let mut decl = TypeDecl::new(syntax.kind, container, syntax.name.text.clone())
            .in_assembly(assembly)
            .with_static(syntax.modifiers.is_static)
            .at(Location::new(file, syntax.name.range));
        if let Some(accessibility) = syntax.modifiers.accessibility {
            decl = decl.with_accessibility(accessibility);
        }
        let symbol = self.builder.add_type(decl)?;
        for parameter in &syntax.type_parameters {
            self.builder.add_type_parameter(symbol, &parameter.text)?;
        }
        self.types.push(DeclaredType {
            syntax,
            symbol,
            namespace,
            file,
        });
        for member in &syntax.members {
            if let MemberDeclaration::Type(nested) = member {
                self.declare_type(nested, symbol, namespace, file, assembly)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Phase 2: bases and constraints
    // ------------------------------------------------------------------

    fn resolve_headers(&mut self) -> Result<(), SyntaxError> {
        for i in 0..self.types.len() {
            let (syntax, symbol, namespace) = (self.types[i].syntax, self.types[i].symbol, self.types[i].namespace);
            let scope = Scope {
                namespace,
                ty: Some(symbol),
                method: None,
            };
            if syntax.kind != TypeKind::Enum {
                for (position, base) in syntax.bases.iter().enumerate() {
                    let resolved = self.resolve_type(base, scope)?;
                    self.add_base(syntax, symbol, resolved, position, base.range())?;
                }
            }
            self.add_constraints(&syntax.constraints, symbol, scope)?;
        }
        Ok(())
    }

    fn add_base(
        &mut self,
        syntax: &TypeDeclaration,
        symbol: SymbolId,
        base: SymbolId,
        position: usize,
        range: TextRange,
    ) -> Result<(), SyntaxError> {
        let graph = self.builder.graph();
        match graph.type_kind(base) {
            Some(TypeKind::Interface) => self.builder.add_interface(symbol, base)?,
            Some(TypeKind::Class) if syntax.kind == TypeKind::Class && position == 0 => {
                self.builder.set_base_type(symbol, base)?
            }
            _ => {
                return Err(SyntaxError::InvalidBase {
                    name: graph.display(base),
                    owner: graph.display(symbol),
                    range,
                });
            }
        }
        Ok(())
    }

    fn add_constraints(
        &mut self,
        clauses: &[ConstraintClause],
        owner: SymbolId,
        scope: Scope,
    ) -> Result<(), SyntaxError> {
        for clause in clauses {
            let graph = self.builder.graph();
            let Some(parameter) = graph
                .type_parameters(owner)
                .iter()
                .copied()
                .find(|&p| graph.name(p) == clause.parameter.text)
            else {
                return Err(SyntaxError::UnknownTypeParameter {
                    name: clause.parameter.text.clone(),
                    owner: graph.display(owner),
                    range: clause.parameter.range,
                });
            };
            for constraint in &clause.constraints {
                let constraint = match constraint {
                    ConstraintSyntax::Class => TypeConstraint::Class,
                    ConstraintSyntax::Struct => TypeConstraint::Struct,
                    ConstraintSyntax::Type(ty) => TypeConstraint::Type(self.resolve_type(ty, scope)?),
                };
                self.builder.add_constraint(parameter, constraint)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Phase 3: members
    // ------------------------------------------------------------------

    fn declare_members(&mut self) -> Result<(), SyntaxError> {
        for i in 0..self.types.len() {
            let (syntax, symbol, namespace, file) = {
                let t = &self.types[i];
                (t.syntax, t.symbol, t.namespace, t.file)
            };
            let scope = Scope {
                namespace,
                ty: Some(symbol),
                method: None,
            };
            for enumerator in &syntax.enumerators {
                let decl = MemberDecl::new(symbol, enumerator.text.clone())
                    .with_accessibility(Accessibility::Public)
                    .constant()
                    .at(Location::new(file, enumerator.range));
                self.builder.add_field(decl, symbol)?;
            }
            if syntax.kind == TypeKind::Delegate {
                self.declare_delegate_invoke(syntax, symbol, scope)?;
            }
            for member in &syntax.members {
                self.declare_member(member, symbol, scope, file)?;
            }
        }
        Ok(())
    }

    fn declare_delegate_invoke(
        &mut self,
        syntax: &TypeDeclaration,
        symbol: SymbolId,
        scope: Scope,
    ) -> Result<(), SyntaxError> {
        let invoke = self.builder.add_method(
            MemberDecl::new(symbol, "Invoke").with_accessibility(Accessibility::Public),
        )?;
        self.set_signature(invoke, syntax.delegate_return.as_ref(), &syntax.delegate_parameters, scope)
    }

    fn declare_member(
        &mut self,
        member: &'u MemberDeclaration,
        owner: SymbolId,
        scope: Scope,
        file: FileId,
    ) -> Result<(), SyntaxError> {
        let member_decl = |name: &Ident, modifiers: &Modifiers| {
            let mut decl = MemberDecl::new(owner, name.text.clone())
                .with_static(modifiers.is_static)
                .at(Location::new(file, name.range));
            if let Some(accessibility) = modifiers.accessibility {
                decl = decl.with_accessibility(accessibility);
            }
            if modifiers.is_readonly {
                decl = decl.readonly();
            }
            decl
        };
        match member {
            MemberDeclaration::Type(_) => {}
            MemberDeclaration::Field {
                modifiers,
                is_const,
                ty,
                name,
                ..
            } => {
                let ty = self.resolve_type(ty, scope)?;
                let mut decl = member_decl(name, modifiers);
                if *is_const {
                    decl = decl.constant();
                }
                self.builder.add_field(decl, ty)?;
            }
            MemberDeclaration::Property { modifiers, ty, name, .. } => {
                let ty = self.resolve_type(ty, scope)?;
                self.builder.add_property(member_decl(name, modifiers), ty)?;
            }
            MemberDeclaration::Indexer {
                modifiers,
                ty,
                parameters,
                range,
            } => {
                let ty = self.resolve_type(ty, scope)?;
                let mut decl = MemberDecl::indexer(owner)
                    .with_static(modifiers.is_static)
                    .at(Location::new(file, *range));
                if let Some(accessibility) = modifiers.accessibility {
                    decl = decl.with_accessibility(accessibility);
                }
                let indexer = self.builder.add_property(decl, ty)?;
                let resolved = self.resolve_parameters(parameters, scope)?;
                self.set_parameters(indexer, &resolved)?;
            }
            MemberDeclaration::Method(method) => {
                let symbol = self.builder.add_method(member_decl(&method.name, &method.modifiers))?;
                for parameter in &method.type_parameters {
                    self.builder.add_type_parameter(symbol, &parameter.text)?;
                }
                let scope = Scope {
                    method: Some(symbol),
                    ..scope
                };
                self.add_constraints(&method.constraints, symbol, scope)?;
                self.set_signature(symbol, method.return_type.as_ref(), &method.parameters, scope)?;
                if method.body.is_some() {
                    self.methods.push(DeclaredMethod {
                        syntax: method,
                        symbol,
                        scope,
                        file,
                    });
                }
            }
        }
        Ok(())
    }

    fn set_signature(
        &mut self,
        method: SymbolId,
        return_type: Option<&TypeSyntax>,
        parameters: &[ParameterSyntax],
        scope: Scope,
    ) -> Result<(), SyntaxError> {
        if let Some(return_type) = return_type {
            let ty = self.resolve_type(return_type, scope)?;
            self.builder.set_return_type(method, ty)?;
        }
        let resolved = self.resolve_parameters(parameters, scope)?;
        self.set_parameters(method, &resolved)
    }

    fn resolve_parameters(
        &mut self,
        parameters: &[ParameterSyntax],
        scope: Scope,
    ) -> Result<Vec<(SmolStr, SymbolId)>, SyntaxError> {
        parameters
            .iter()
            .map(|p| Ok((p.name.text.clone(), self.resolve_type(&p.ty, scope)?)))
            .collect()
    }

    fn set_parameters(&mut self, member: SymbolId, parameters: &[(SmolStr, SymbolId)]) -> Result<(), SyntaxError> {
        let borrowed: Vec<(&str, SymbolId)> = parameters.iter().map(|(n, t)| (n.as_str(), *t)).collect();
        self.builder.set_parameters(member, &borrowed)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Phase 4: bodies
    // ------------------------------------------------------------------

    fn resolve_bodies(&mut self) -> Result<Vec<MethodBody>, SyntaxError> {
        let methods = std::mem::take(&mut self.methods);
        let mut bodies = Vec::with_capacity(methods.len());
        for method in methods {
            let Some(block) = &method.syntax.body else {
                continue;
            };
            let mut types = FxHashMap::default();
            self.collect_block(block, method.scope, &mut types)?;
            bodies.push(MethodBody {
                method: method.symbol,
                file: method.file,
                block: block.clone(),
                types,
            });
        }
        Ok(bodies)
    }

    fn collect_block(
        &mut self,
        block: &Block,
        scope: Scope,
        types: &mut FxHashMap<TextRange, SymbolId>,
    ) -> Result<(), SyntaxError> {
        for statement in &block.statements {
            self.collect_statement(statement, scope, types)?;
        }
        Ok(())
    }

    fn collect_statement(
        &mut self,
        statement: &Statement,
        scope: Scope,
        types: &mut FxHashMap<TextRange, SymbolId>,
    ) -> Result<(), SyntaxError> {
        match statement {
            Statement::Block(block) => self.collect_block(block, scope, types),
            Statement::Empty(_) | Statement::Break(_) | Statement::Continue(_) => Ok(()),
            Statement::LocalDeclaration { ty, initializer, .. } => {
                let resolved = self.resolve_type(ty, scope)?;
                types.insert(ty.range(), resolved);
                match initializer {
                    Some(init) => self.collect_expression(init, scope, types),
                    None => Ok(()),
                }
            }
            Statement::Expression(expr, _) => self.collect_expression(expr, scope, types),
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.collect_expression(condition, scope, types)?;
                self.collect_statement(then_branch, scope, types)?;
                match else_branch {
                    Some(e) => self.collect_statement(e, scope, types),
                    None => Ok(()),
                }
            }
            Statement::While { condition, body, .. } => {
                self.collect_expression(condition, scope, types)?;
                self.collect_statement(body, scope, types)
            }
        }
    }

    fn collect_expression(
        &mut self,
        expr: &Expression,
        scope: Scope,
        types: &mut FxHashMap<TextRange, SymbolId>,
    ) -> Result<(), SyntaxError> {
        match expr {
            Expression::Name { type_arguments, .. } => self.collect_types(type_arguments, scope, types),
            Expression::PredefinedType(..) | Expression::Literal(..) | Expression::This(_) => Ok(()),
            Expression::Parenthesized(inner, _) => self.collect_expression(inner, scope, types),
            Expression::MemberAccess {
                receiver,
                type_arguments,
                ..
            } => {
                self.collect_expression(receiver, scope, types)?;
                self.collect_types(type_arguments, scope, types)
            }
            Expression::Invocation {
                callee: receiver,
                arguments,
                ..
            }
            | Expression::ElementAccess {
                receiver, arguments, ..
            } => {
                self.collect_expression(receiver, scope, types)?;
                for argument in arguments {
                    self.collect_expression(&argument.value, scope, types)?;
                }
                Ok(())
            }
        }
    }

    fn collect_types(
        &mut self,
        syntax: &[TypeSyntax],
        scope: Scope,
        types: &mut FxHashMap<TextRange, SymbolId>,
    ) -> Result<(), SyntaxError> {
        for ty in syntax {
            let resolved = self.resolve_type(ty, scope)?;
            types.insert(ty.range(), resolved);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Type resolution
    // ------------------------------------------------------------------

    fn resolve_type(&mut self, syntax: &TypeSyntax, scope: Scope) -> Result<SymbolId, SyntaxError> {
        match syntax {
            TypeSyntax::Predefined(special, _) => Ok(self.builder.special(*special)),
            TypeSyntax::Array { element, rank, .. } => {
                let element = self.resolve_type(element, scope)?;
                Ok(self.builder.array_of(element, *rank))
            }
            TypeSyntax::Pointer { element, .. } => {
                let element = self.resolve_type(element, scope)?;
                Ok(self.builder.pointer_to(element))
            }
            TypeSyntax::Ref { element, .. } => {
                let element = self.resolve_type(element, scope)?;
                Ok(self.builder.ref_to(element))
            }
            TypeSyntax::Named(segments, range) => self.resolve_named(segments, *range, scope),
        }
    }

    fn resolve_named(
        &mut self,
        segments: &[NameSegment],
        range: TextRange,
        scope: Scope,
    ) -> Result<SymbolId, SyntaxError> {
        let unresolved = || SyntaxError::UnresolvedType {
            name: segments
                .iter()
                .map(|s| s.ident.text.as_str())
                .collect::<Vec<_>>()
                .join("."),
            range,
        };
        let mut current: Option<SymbolId> = None;
        for segment in segments {
            let arguments = segment
                .type_arguments
                .iter()
                .map(|a| self.resolve_type(a, scope))
                .collect::<Result<Vec<_>, _>>()?;
            let found = match current {
                None => self.resolve_first(&segment.ident.text, arguments.len(), scope),
                Some(container) => self.find_type_or_namespace(container, &segment.ident.text, arguments.len()),
            }
            .ok_or_else(unresolved)?;
            current = Some(if arguments.is_empty() {
                found
            } else {
                self.builder.construct(found, &arguments)?
            });
        }
        match current {
            Some(ty) if self.builder.graph().kind(ty).is_type() => Ok(ty),
            _ => Err(unresolved()),
        }
    }

    fn resolve_first(&self, name: &str, arity: usize, scope: Scope) -> Option<SymbolId> {
        let graph = self.builder.graph();
        let type_parameter = |owner: SymbolId| {
            graph
                .type_parameters(owner)
                .iter()
                .copied()
                .find(|&p| graph.name(p) == name)
        };
        if arity == 0 {
            if let Some(found) = scope.method.and_then(type_parameter) {
                return Some(found);
            }
        }
        if let Some(ty) = scope.ty {
            for enclosing in graph.enclosing_types(ty) {
                if arity == 0 {
                    if let Some(found) = type_parameter(enclosing) {
                        return Some(found);
                    }
                }
                if let Some(found) = self.find_type_or_namespace(enclosing, name, arity) {
                    return Some(found);
                }
            }
        }
        let mut namespace = Some(scope.namespace);
        while let Some(ns) = namespace {
            if let Some(found) = self.find_type_or_namespace(ns, name, arity) {
                return Some(found);
            }
            namespace = graph.container(ns);
        }
        None
    }

    /// A nested type (or namespace, for arity 0) named `name` directly in `container`.
    fn find_type_or_namespace(&self, container: SymbolId, name: &str, arity: usize) -> Option<SymbolId> {
        let graph = self.builder.graph();
        let container = graph.original_definition(container);
        graph.members(container, name).iter().copied().find(|&m| match graph.kind(m) {
            SymbolKind::NamedType => graph.arity(m) == arity,
            SymbolKind::Namespace => arity == 0,
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;

    fn lower_text(text: &str) -> Result<LoweredProgram, SyntaxError> {
        let unit = parse(FileId::new(0), text)?;
        lower(std::slice::from_ref(&unit))
    }

    #[test]
    fn test_declarations_in_any_order() {
        let program = lower_text(
            "namespace N {
                class Derived : Base, IThing { }
                public class Base { protected int value; }
                interface IThing { void Run(); }
            }",
        )
        .unwrap();
        let graph = &program.graph;
        let derived = graph.lookup_path("N.Derived").unwrap();
        let base = graph.lookup_path("N.Base").unwrap();
        let thing = graph.lookup_path("N.IThing").unwrap();

        assert_eq!(graph.base_type(derived), Some(base));
        assert_eq!(graph.interfaces(derived), &[thing]);
        assert_eq!(graph.accessibility(base), Accessibility::Public);
        assert_eq!(
            graph.accessibility(graph.lookup_path("N.Base.value").unwrap()),
            Accessibility::Protected
        );
        assert_eq!(graph.assembly(derived), program.assemblies[0]);
    }

    #[test]
    fn test_generic_signatures_and_constraints() {
        let program = lower_text(
            "class Box<T> where T : class {
                T item;
                Box<int[]> Wrap<U>(U value, T other) where U : struct { }
            }",
        )
        .unwrap();
        let graph = &program.graph;
        let boxed = graph.lookup_path("Box").unwrap();
        let t = graph.type_parameters(boxed)[0];
        let item = graph.lookup_path("Box.item").unwrap();
        let wrap = graph.lookup_path("Box.Wrap").unwrap();

        assert_eq!(graph.member_type(item), Some(t));
        assert!(graph.type_parameter_data(t).unwrap().has_class_constraint());
        let method = graph.method_data(wrap).unwrap();
        assert_eq!(graph.display(method.return_type().unwrap()), "Box<int[]>");
        assert_eq!(method.parameters()[0].ty, graph.type_parameters(wrap)[0]);
        assert_eq!(program.bodies.len(), 1);
    }

    #[test]
    fn test_enum_members_and_delegate_invoke() {
        let program = lower_text("enum Color { Red, Green } delegate int Fn(string s);").unwrap();
        let graph = &program.graph;
        let color = graph.lookup_path("Color").unwrap();
        let red = graph.lookup_path("Color.Red").unwrap();
        assert_eq!(graph.member_type(red), Some(color));
        assert!(graph.field_data(red).unwrap().is_const());

        let invoke = graph.lookup_path("Fn.Invoke").unwrap();
        assert_eq!(graph.method_data(invoke).unwrap().return_type(), Some(graph.well_known().int32()));
    }

    #[test]
    fn test_body_types_are_resolved() {
        let program = lower_text("class C { void M() { int[,] grid; C other; } }").unwrap();
        let body = &program.bodies[0];
        let Statement::LocalDeclaration { ty, .. } = &body.block.statements[0] else {
            panic!("expected a local declaration");
        };
        let grid = body.resolved_type(ty).unwrap();
        assert_eq!(program.graph.display(grid), "int[,]");
        assert_eq!(program.graph.rank(grid), 2);
    }

    #[test]
    fn test_unresolved_type() {
        let err = lower_text("class C { Missing m; }").unwrap_err();
        assert!(matches!(err, SyntaxError::UnresolvedType { ref name, .. } if name == "Missing"));
    }

    #[test]
    fn test_struct_cannot_have_class_base() {
        let err = lower_text("class B { } struct S : B { }").unwrap_err();
        assert!(matches!(err, SyntaxError::InvalidBase { .. }));
    }

    #[test]
    fn test_two_assemblies() {
        let lib = parse(FileId::new(0), "public class Shared { internal int secret; }").unwrap();
        let app = parse(FileId::new(1), "class User : Shared { }").unwrap();
        let program = lower_assemblies(&[
            ("Lib", std::slice::from_ref(&lib)),
            ("App", std::slice::from_ref(&app)),
        ])
        .unwrap();
        let graph = &program.graph;
        let shared = graph.lookup_path("Shared").unwrap();
        let user = graph.lookup_path("User").unwrap();
        assert_eq!(graph.assembly(shared), program.assemblies[0]);
        assert_eq!(graph.assembly(user), program.assemblies[1]);
        assert_eq!(graph.assembly_name(program.assemblies[1]), Some("App"));
    }
}
