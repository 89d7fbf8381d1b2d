use structgraph::core::{
    CallGraphResolver, CallSite, ClassEntity, EntityRegistry, FileEntity, FunctionEntity, Span,
};
use structgraph::parsers::EntityCalls;

fn function(file: &str, name: &str) -> FunctionEntity {
    FunctionEntity::new(file, name.to_string(), None, Span::new(1, 1), String::new())
}

fn class(file: &str, name: &str, methods: &[&str]) -> ClassEntity {
    let methods = methods
        .iter()
        .map(|m| {
            FunctionEntity::new(
                file,
                m.to_string(),
                Some(name.to_string()),
                Span::new(1, 1),
                String::new(),
            )
        })
        .collect();
    ClassEntity::new(file, name.to_string(), Span::new(1, 1), String::new()).with_methods(methods)
}

fn calls(caller: &str, sites: &[(&str, Option<&str>)]) -> EntityCalls {
    EntityCalls {
        caller_id: caller.to_string(),
        call_sites: sites
            .iter()
            .enumerate()
            .map(|(i, (callee, qualifier))| {
                CallSite::new(callee.to_string(), qualifier.map(str::to_string), i + 1)
            })
            .collect(),
    }
}

fn codebase() -> Vec<FileEntity> {
    let mut a = FileEntity::new("a.py".into());
    a.functions.push(function("a.py", "helper"));
    a.functions.push(function("a.py", "caller"));
    a.functions.push(function("a.py", "recurse"));
    a.classes.push(class("a.py", "Store", &["save", "helper"]));

    let mut b = FileEntity::new("b.py".into());
    b.functions.push(function("b.py", "helper"));
    b.functions.push(function("b.py", "main"));
    vec![a, b]
}

#[test]
fn resolver_simple_call_matches_every_top_level_function_with_that_name() {
    let registry = EntityRegistry::from_files(&codebase());
    let edges = CallGraphResolver::new().resolve(
        &registry,
        &[calls("b.py:main", &[("helper", None), ("helper", None)])],
    );

    assert_eq!(edges.callers_of("a.py:helper"), ["b.py:main"]);
    assert_eq!(edges.callers_of("b.py:helper"), ["b.py:main"]);
    // Unqualified calls never reach methods
    assert!(edges.callers_of("a.py:Store.helper").is_empty());
    assert_eq!(edges.len(), 2);
}

#[test]
fn qualified_call_reaches_method_only_through_literal_class_name() {
    let registry = EntityRegistry::from_files(&codebase());
    let edges = CallGraphResolver::new().resolve(
        &registry,
        &[
            calls("a.py:caller", &[("save", Some("Store"))]),
            calls("b.py:main", &[("save", Some("store"))]),
        ],
    );

    assert_eq!(edges.callers_of("a.py:Store.save"), ["a.py:caller"]);
    assert_eq!(edges.len(), 1);
}

#[test]
fn recursion_creates_no_self_loop() {
    let registry = EntityRegistry::from_files(&codebase());
    let edges = CallGraphResolver::new().resolve(
        &registry,
        &[calls("a.py:recurse", &[("recurse", None)])],
    );
    assert!(edges.is_empty());
}

#[test]
fn callers_are_listed_in_caller_order_without_duplicates() {
    let registry = EntityRegistry::from_files(&codebase());
    let input = vec![
        calls("a.py:caller", &[("helper", Some("Store"))]),
        calls("b.py:main", &[("helper", Some("Store")), ("helper", None)]),
        calls("a.py:Store.save", &[("helper", None)]),
    ];
    let edges = CallGraphResolver::new().resolve(&registry, &input);

    assert_eq!(
        edges.callers_of("a.py:helper"),
        ["a.py:caller", "b.py:main", "a.py:Store.save"]
    );
    assert_eq!(
        edges.callers_of("a.py:Store.helper"),
        ["a.py:caller", "b.py:main"]
    );
}

#[test]
fn parallel_and_sequential_resolution_agree() {
    let registry = EntityRegistry::from_files(&codebase());
    let input = vec![
        calls("a.py:caller", &[("helper", None), ("save", Some("Store"))]),
        calls("b.py:main", &[("caller", None), ("recurse", None)]),
        calls("a.py:recurse", &[("main", None), ("recurse", None)]),
    ];
    let parallel = CallGraphResolver::new().resolve(&registry, &input);
    let sequential = CallGraphResolver::new()
        .with_parallel(false)
        .resolve(&registry, &input);
    assert_eq!(parallel, sequential);
}

#[test]
fn class_ids_are_not_callees() {
    let registry = EntityRegistry::from_files(&codebase());
    let edges =
        CallGraphResolver::new().resolve(&registry, &[calls("b.py:main", &[("Store", None)])]);
    assert!(edges.is_empty());
    assert!(edges.callers_of("a.py:Store").is_empty());
}

#[test]
fn edges_lists_every_caller_callee_pair() {
    let registry = EntityRegistry::from_files(&codebase());
    let edges = CallGraphResolver::new().resolve(
        &registry,
        &[
            calls("b.py:main", &[("caller", None), ("save", Some("Store"))]),
            calls("a.py:caller", &[("main", None)]),
        ],
    );

    let mut pairs: Vec<(&str, &str)> = edges.edges().collect();
    pairs.sort();
    assert_eq!(
        pairs,
        vec![
            ("a.py:caller", "b.py:main"),
            ("b.py:main", "a.py:Store.save"),
            ("b.py:main", "a.py:caller"),
        ]
    );
    assert_eq!(pairs.len(), edges.len());
}
