use structgraph::parsers::python::PythonParser;
use structgraph::parsers::LanguageParser;

fn inward(code: &str, function: &str) -> Vec<String> {
    let parsed = PythonParser::new()
        .unwrap()
        .parse_source("a.py", code)
        .unwrap();
    let deps = parsed
        .file
        .callables()
        .find(|f| f.name == function)
        .map(|f| f.inward_dependencies.clone())
        .unwrap();
    deps
}

#[test]
fn buckets_are_sorted_independently_and_concatenated_in_order() {
    let code = r#"
def f():
    import zlib
    from collections import deque
    zeta()
    alpha()
    obj.method()
    base.attr
    return path.join(a.b.c())
"#;
    assert_eq!(
        inward(code, "f"),
        vec![
            // imports
            "collections",
            "collections.deque",
            "zlib",
            // calls
            "alpha",
            "zeta",
            // references
            "a",
            "base",
            "obj",
            "path",
            // attributes
            "attr",
            "b",
            "c",
            "join",
            "method",
        ]
    );
}

#[test]
fn same_name_may_appear_in_several_buckets() {
    let code = r#"
def g():
    run()
    run.run
"#;
    assert_eq!(inward(code, "g"), vec!["run", "run", "run"]);
}

#[test]
fn constructor_call_and_method_on_instance() {
    let code = r#"
class C:
    def m(self):
        return 1

def f():
    c = C()
    c.m()
"#;
    let deps = inward(code, "f");
    assert!(deps.contains(&"C".to_string()));
    assert!(deps.contains(&"m".to_string()));
    assert_eq!(deps, vec!["C", "c", "m"]);
}

#[test]
fn class_dependencies_cover_the_whole_class_body() {
    let code = r#"
import os

class Loader(base.Loader):
    cache = make_cache()

    def load(self, name):
        return os.path.join(self.root, name)
"#;
    let parsed = PythonParser::new()
        .unwrap()
        .parse_source("a.py", code)
        .unwrap();
    let class = parsed.file.class("Loader").unwrap();
    assert_eq!(
        class.inward_dependencies,
        vec!["make_cache", "base", "os", "self", "Loader", "join", "path", "root"]
    );
}

#[test]
fn body_without_references_is_empty_not_missing() {
    let code = "def noop():\n    pass\n";
    assert!(inward(code, "noop").is_empty());
}
