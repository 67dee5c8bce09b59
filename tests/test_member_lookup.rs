//! Member lookup over lowered programs.
//!
//! Covers hiding, overload accumulation, interface diamonds, type-parameter
//! lookup, arity handling, namespace lookup and the accessibility closure
//! across assemblies.

use once_cell::sync::Lazy;
use rstest::rstest;

use binder::base::FileId;
use binder::hir::{
    AccessContext, Ambiguity, LookupCache, LookupError, LookupRequest, LookupResult, MemberLookup,
    SymbolId, SymbolOrMethodGroup, Viability,
};
use binder::syntax::{lower, lower_assemblies, parse, LoweredProgram};

const SHAPES: &str = r#"
namespace Shapes {
    public class Base {
        public int Size;
        public void Draw() { }
        public void Resize(int factor) { }
        protected int secret;
        private int hidden;
        public static int Count;
    }

    public class Derived : Base {
        public string Size;
        public void Draw(int times) { }
        public int Resize;
        void Peek() { }
    }

    public interface ITop { int Id { get; } void Run(); }
    public interface ILeft : ITop { }
    public interface IRight : ITop { }
    public interface IBottom : ILeft, IRight { }

    public interface IA { int Value { get; } }
    public interface IB { int Value { get; } }
    public interface IBoth : IA, IB { }

    public class Generic<T> {
        public T Item;
        public void Run<U>() { }
        public void Run() { }
    }

    public class Constrained<T> where T : Base, ITop { }

    public class Outer {
        private int secret;
        public class Inner { }
    }

    public interface IRoot { int Value { get; } }
    public interface IRefined : IRoot { int Value { get; } }
    public interface IPassThrough : IRoot { }
    public interface IJoined : IRefined, IPassThrough { }

    public class Keeper<T> { protected T stored; }
    public class IntKeeper : Keeper<int> { }
    public class Stranger { }
}
"#;

static SHAPES_PROGRAM: Lazy<LoweredProgram> = Lazy::new(|| {
    let unit = parse(FileId::new(0), SHAPES).expect("source parses");
    lower(&[unit]).expect("source lowers")
});

fn sym(path: &str) -> SymbolId {
    SHAPES_PROGRAM
        .graph
        .lookup_path(path)
        .unwrap_or_else(|| panic!("no symbol at {path}"))
}

fn app() -> AccessContext {
    AccessContext::new(SHAPES_PROGRAM.assemblies[0])
}

fn lookup_from(context: AccessContext, ty: SymbolId, name: &str, arity: usize, invoked: bool) -> LookupResult {
    MemberLookup::new(&SHAPES_PROGRAM.graph)
        .with_context(context)
        .lookup_member(ty, name, arity, invoked)
        .expect("lookup succeeds")
}

fn lookup(ty: &str, name: &str, arity: usize, invoked: bool) -> LookupResult {
    lookup_from(app(), sym(ty), name, arity, invoked)
}

// ============================================================================
// HIDING AND OVERLOADS
// ============================================================================

#[test]
fn test_field_hides_base_field() {
    let result = lookup("Shapes.Derived", "Size", 0, false);
    assert!(result.is_viable());
    assert_eq!(result.symbols(), vec![sym("Shapes.Derived.Size")]);
}

#[test]
fn test_overloads_accumulate_most_derived_first() {
    let result = lookup("Shapes.Derived", "Draw", 0, true);
    assert_eq!(result.symbols(), vec![sym("Shapes.Derived.Draw"), sym("Shapes.Base.Draw")]);
    let materialized = result.materialize(&SHAPES_PROGRAM.graph).unwrap();
    assert!(matches!(materialized.value, SymbolOrMethodGroup::MethodGroup(ref m) if m.len() == 2));
    assert_eq!(materialized.ambiguity, None);
}

#[rstest]
#[case(false, "Shapes.Derived.Resize")]
#[case(true, "Shapes.Base.Resize")]
fn test_field_hides_methods_unless_invoked(#[case] invoked: bool, #[case] expected: &str) {
    let result = lookup("Shapes.Derived", "Resize", 0, invoked);
    assert!(result.is_viable());
    assert_eq!(result.symbols(), vec![sym(expected)]);
}

#[test]
fn test_lookup_is_deterministic() {
    let first = lookup("Shapes.Derived", "Draw", 0, false);
    let second = lookup("Shapes.Derived", "Draw", 0, false);
    assert_eq!(first, second);

    let unit = parse(FileId::new(0), SHAPES).unwrap();
    let fresh = lower(&[unit]).unwrap();
    let derived = fresh.graph.lookup_path("Shapes.Derived").unwrap();
    let again = MemberLookup::new(&fresh.graph)
        .with_context(AccessContext::new(fresh.assemblies[0]))
        .lookup_member(derived, "Draw", 0, false)
        .unwrap();
    assert_eq!(again, first);
}

// ============================================================================
// INTERFACES
// ============================================================================

#[rstest]
#[case("Run")]
#[case("Id")]
fn test_diamond_yields_member_once(#[case] name: &str) {
    let result = lookup("Shapes.IBottom", name, 0, false);
    assert_eq!(result.symbols(), vec![sym(&format!("Shapes.ITop.{name}"))]);
    assert!(result.is_singleton());
}

#[test]
fn test_unrelated_base_interfaces_are_ambiguous() {
    let result = lookup("Shapes.IBoth", "Value", 0, false);
    assert_eq!(result.symbols(), vec![sym("Shapes.IA.Value"), sym("Shapes.IB.Value")]);
    let materialized = result.materialize(&SHAPES_PROGRAM.graph).unwrap();
    assert!(matches!(materialized.ambiguity, Some(Ambiguity::MultiPath { .. })));
}

#[test]
fn test_hiding_along_one_path_applies_to_the_diamond() {
    let result = lookup("Shapes.IJoined", "Value", 0, false);
    assert_eq!(result.symbols(), vec![sym("Shapes.IRefined.Value")]);
    let materialized = result.materialize(&SHAPES_PROGRAM.graph).unwrap();
    assert_eq!(materialized.value, SymbolOrMethodGroup::Symbol(sym("Shapes.IRefined.Value")));
    assert_eq!(materialized.ambiguity, None);
}

#[test]
fn test_interface_sees_object_members() {
    let result = lookup("Shapes.ITop", "ToString", 0, true);
    assert_eq!(result.symbols(), vec![sym("System.Object.ToString")]);
}

// ============================================================================
// TYPE PARAMETERS AND ARITY
// ============================================================================

#[test]
fn test_type_parameter_uses_class_and_interface_constraints() {
    let graph = &SHAPES_PROGRAM.graph;
    let t = graph.type_parameters(sym("Shapes.Constrained"))[0];
    let draw = lookup_from(app(), t, "Draw", 0, true);
    assert_eq!(draw.symbols(), vec![sym("Shapes.Base.Draw")]);
    let run = lookup_from(app(), t, "Run", 0, true);
    assert_eq!(run.symbols(), vec![sym("Shapes.ITop.Run")]);
}

#[test]
fn test_unconstrained_type_parameter_sees_object() {
    let t = SHAPES_PROGRAM.graph.type_parameters(sym("Shapes.Generic"))[0];
    let result = lookup_from(app(), t, "GetHashCode", 0, true);
    assert_eq!(result.symbols(), vec![sym("System.Object.GetHashCode")]);
}

#[rstest]
#[case(0, 2)]
#[case(1, 1)]
fn test_generic_method_arity(#[case] arity: usize, #[case] expected: usize) {
    let result = lookup("Shapes.Generic", "Run", arity, true);
    assert!(result.is_viable());
    assert_eq!(result.symbols().len(), expected);
}

#[test]
fn test_wrong_arity_is_reported() {
    let result = lookup("Shapes.Generic", "Run", 2, true);
    assert!(!result.is_viable());
    assert_eq!(result.best_viability(), Some(Viability::WrongArity));

    let field = lookup("Shapes.Generic", "Item", 1, false);
    assert!(matches!(field.best_error(), Some(LookupError::TypeArgumentsNotAllowed { .. })));
}

#[rstest]
#[case("Generic", 1, true)]
#[case("Generic", 0, false)]
#[case("Base", 0, true)]
#[case("Base", 1, false)]
fn test_namespace_lookup_checks_type_arity(#[case] name: &str, #[case] arity: usize, #[case] viable: bool) {
    let result = MemberLookup::new(&SHAPES_PROGRAM.graph)
        .with_context(app())
        .lookup_in_namespace(sym("Shapes"), name, arity)
        .unwrap();
    assert_eq!(result.is_viable(), viable);
}

#[test]
fn test_namespace_chain() {
    let graph = &SHAPES_PROGRAM.graph;
    let lookup = MemberLookup::new(graph).with_context(app());
    let shapes = lookup.lookup_in_namespace(graph.global_namespace(), "Shapes", 0).unwrap();
    assert_eq!(shapes.symbols(), vec![sym("Shapes")]);
    let outer = lookup.lookup_in_namespace(sym("Shapes"), "Outer", 0).unwrap();
    let inner = lookup.lookup_member(outer.symbols()[0], "Inner", 0, false).unwrap();
    assert_eq!(inner.symbols(), vec![sym("Shapes.Outer.Inner")]);
}

// ============================================================================
// ACCESSIBILITY
// ============================================================================

#[rstest]
#[case("Shapes.Base.secret", None, Viability::Inaccessible)]
#[case("Shapes.Base.secret", Some("Shapes.Derived"), Viability::Good)]
#[case("Shapes.Base.hidden", Some("Shapes.Derived"), Viability::Inaccessible)]
#[case("Shapes.Base.hidden", Some("Shapes.Base"), Viability::Good)]
#[case("Shapes.Outer.secret", Some("Shapes.Outer.Inner"), Viability::Good)]
#[case("Shapes.Derived.Peek", None, Viability::Inaccessible)]
fn test_member_accessibility(#[case] member: &str, #[case] within: Option<&str>, #[case] expected: Viability) {
    let (owner, name) = member.rsplit_once('.').unwrap();
    let mut context = app();
    if let Some(within) = within {
        context = context.with_type(sym(within));
    }
    let result = lookup_from(context, sym(owner), name, 0, false);
    assert_eq!(result.best_viability(), Some(expected));
}

#[rstest]
#[case("Shapes.IntKeeper", Viability::Good)]
#[case("Shapes.Stranger", Viability::Inaccessible)]
fn test_protected_member_through_constructed_base(#[case] within: &str, #[case] expected: Viability) {
    let graph = &SHAPES_PROGRAM.graph;
    let keeper_of_int = graph.base_type(sym("Shapes.IntKeeper")).unwrap();
    assert_ne!(keeper_of_int, sym("Shapes.Keeper"));
    assert_eq!(graph.original_definition(keeper_of_int), sym("Shapes.Keeper"));

    let context = app().with_type(sym(within));
    let result = lookup_from(context, keeper_of_int, "stored", 0, false);
    assert_eq!(result.best_viability(), Some(expected));
    assert_eq!(result.symbols(), vec![sym("Shapes.Keeper.stored")]);
}

#[test]
fn test_protected_member_inherited_from_constructed_base() {
    let context = app().with_type(sym("Shapes.IntKeeper"));
    let result = lookup_from(context, sym("Shapes.IntKeeper"), "stored", 0, false);
    assert!(result.is_viable());
    assert_eq!(result.symbols(), vec![sym("Shapes.Keeper.stored")]);
}

const LIBRARY: &str = r#"
public class Host {
    protected internal int Either;
    private protected int Both;
    internal int Local;
    public int Open;
}
internal class Widget { }
public class Widget<T> { }
"#;

const APPLICATION: &str = r#"
class Sub : Host { }
class Other { }
"#;

static TWO_ASSEMBLIES: Lazy<LoweredProgram> = Lazy::new(|| {
    let lib = parse(FileId::new(0), LIBRARY).unwrap();
    let app = parse(FileId::new(1), APPLICATION).unwrap();
    lower_assemblies(&[("Lib", std::slice::from_ref(&lib)), ("App", std::slice::from_ref(&app))]).unwrap()
});

#[rstest]
#[case("Either", Some("Sub"), Viability::Good)]
#[case("Either", Some("Other"), Viability::Inaccessible)]
#[case("Either", None, Viability::Good)]
#[case("Both", Some("Sub"), Viability::Inaccessible)]
#[case("Both", None, Viability::Inaccessible)]
#[case("Local", Some("Sub"), Viability::Inaccessible)]
#[case("Open", Some("Other"), Viability::Good)]
fn test_cross_assembly_accessibility(
    #[case] member: &str,
    #[case] within_app_type: Option<&str>,
    #[case] expected: Viability,
) {
    let program = &*TWO_ASSEMBLIES;
    let graph = &program.graph;
    let host = graph.lookup_path("Host").unwrap();
    // A caller inside App when a type is given, otherwise a namespace-level
    // caller inside Lib.
    let context = match within_app_type {
        Some(ty) => AccessContext::new(program.assemblies[1]).with_type(graph.lookup_path(ty).unwrap()),
        None => AccessContext::new(program.assemblies[0]),
    };
    let result = MemberLookup::new(graph)
        .with_context(context)
        .lookup_member(host, member, 0, false)
        .unwrap();
    assert_eq!(result.best_viability(), Some(expected));
}

#[test]
fn test_inaccessible_beats_wrong_arity() {
    let program = &*TWO_ASSEMBLIES;
    let result = MemberLookup::new(&program.graph)
        .with_context(AccessContext::new(program.assemblies[1]))
        .lookup_in_namespace(program.graph.global_namespace(), "Widget", 0)
        .unwrap();
    assert!(!result.is_viable());
    assert_eq!(result.best_viability(), Some(Viability::Inaccessible));
    assert!(matches!(result.best_error(), Some(LookupError::Inaccessible { .. })));
}

// ============================================================================
// CACHE
// ============================================================================

#[test]
fn test_cached_and_batch_lookups_match_direct_lookups() {
    let graph = &SHAPES_PROGRAM.graph;
    let cache = LookupCache::new(graph);
    let requests = vec![
        LookupRequest::new(sym("Shapes.Derived"), "Draw", app()).invoked(),
        LookupRequest::new(sym("Shapes.Derived"), "Size", app()),
        LookupRequest::new(sym("Shapes.IBottom"), "Run", app()),
        LookupRequest::new(sym("Shapes.Generic"), "Run", app()).with_arity(1),
        LookupRequest::new(sym("Shapes.Base"), "secret", app()),
    ];

    let batch = cache.lookup_batch(&requests);
    for (request, cached) in requests.iter().zip(batch) {
        let direct = MemberLookup::new(graph)
            .with_context(request.context)
            .lookup_member(request.scope, &request.name, request.arity, request.invoked)
            .unwrap();
        assert_eq!(cached.unwrap(), direct);
        assert_eq!(cache.lookup_member(request).unwrap(), direct);
    }
    assert_eq!(cache.len(), requests.len());
}
