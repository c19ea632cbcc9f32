use std::path::PathBuf;

use pretty_assertions::assert_eq;

use mutor::TargetResolver;
use mutor::types::{MethodScope, TargetSpec};
use mutor::{SourceFile, SymbolTable};

const THING: &str = r#"
pub struct Thing;

impl Thing {
    pub fn kind() -> bool {
        true
    }

    pub fn parse(input: &str) -> Option<Thing> {
        if input.is_empty() { None } else { Some(Thing) }
    }

    pub fn alive(&self) -> bool {
        true
    }
}

pub struct Empty;

pub struct OnlyTraits;

impl Clone for OnlyTraits {
    fn clone(&self) -> Self {
        OnlyTraits
    }
}
"#;

fn load(source: &str) -> Vec<SourceFile> {
    vec![SourceFile::from_source(PathBuf::from("thing.rs"), source.to_string()).unwrap()]
}

#[test]
fn round_trip_reconstruction_of_valid_specs() {
    for raw in ["Thing", "Thing.kind", "Thing#alive", "A.b", "A#b"] {
        let spec = TargetSpec::parse(raw).unwrap();
        let rebuilt = format!(
            "{}{}{}",
            spec.class_name(),
            spec.method_scope().map(String::from).unwrap_or_default(),
            spec.method_name().unwrap_or_default()
        );
        assert_eq!(rebuilt, raw);
    }
}

#[test]
fn scope_type_is_determined_by_the_separator() {
    assert_eq!(
        TargetSpec::parse("Thing.kind").unwrap().scope_type(),
        Some(MethodScope::Singleton)
    );
    assert_eq!(
        TargetSpec::parse("Thing#alive").unwrap().scope_type(),
        Some(MethodScope::Instance)
    );
    assert_eq!(TargetSpec::parse("Thing").unwrap().scope_type(), None);
}

#[test]
fn all_methods_is_singletons_then_instances() {
    let files = load(THING);
    let symbols = SymbolTable::build(&files);
    assert_eq!(
        symbols.all_singleton_methods("Thing"),
        vec!["Thing.kind", "Thing.parse"]
    );
    assert_eq!(symbols.all_instance_methods("Thing"), vec!["Thing#alive"]);

    let mut expected = symbols.all_singleton_methods("Thing");
    expected.extend(symbols.all_instance_methods("Thing"));
    assert_eq!(symbols.all_methods("Thing"), expected);
}

#[test]
fn class_with_no_declared_methods_yields_no_mutatees() {
    let files = load(THING);
    let resolver = TargetResolver::new(&files);

    let empty = resolver
        .resolve(&TargetSpec::parse("Empty").unwrap())
        .unwrap();
    assert!(empty.is_empty());

    // Trait impls do not count as directly declared methods
    let only_traits = resolver
        .resolve(&TargetSpec::parse("OnlyTraits").unwrap())
        .unwrap();
    assert!(only_traits.is_empty());
}

#[test]
fn class_with_singleton_and_instance_methods_yields_one_mutatee_each() {
    let source = r#"
struct Pair;
impl Pair {
    fn make() -> Pair { Pair }
    fn swap(&self) {}
}
"#;
    let files = load(source);
    let resolver = TargetResolver::new(&files);
    let mutatees = resolver
        .resolve(&TargetSpec::parse("Pair").unwrap())
        .unwrap();
    assert_eq!(mutatees.len(), 2);
    assert_eq!(mutatees[0].qualified_name(), "Pair.make");
    assert_eq!(mutatees[1].qualified_name(), "Pair#swap");
}

#[test]
fn resolving_twice_yields_structurally_equal_sequences() {
    let files = load(THING);
    let resolver = TargetResolver::new(&files);
    for raw in ["Thing", "Thing.kind", "Thing#alive"] {
        let spec = TargetSpec::parse(raw).unwrap();
        assert_eq!(
            resolver.resolve(&spec).unwrap(),
            resolver.resolve(&spec).unwrap()
        );
    }
}

#[test]
fn symbol_table_spans_multiple_files() {
    let files = vec![
        SourceFile::from_source(
            PathBuf::from("a.rs"),
            "pub struct A; impl A { pub fn go(&self) {} }".to_string(),
        )
        .unwrap(),
        SourceFile::from_source(
            PathBuf::from("b.rs"),
            "pub struct B; impl B { pub fn stop() {} }".to_string(),
        )
        .unwrap(),
    ];
    let resolver = TargetResolver::new(&files);

    let a = resolver.resolve(&TargetSpec::parse("A#go").unwrap()).unwrap();
    assert_eq!(a[0].file, 0);
    let b = resolver.resolve(&TargetSpec::parse("B.stop").unwrap()).unwrap();
    assert_eq!(b[0].file, 1);
}
