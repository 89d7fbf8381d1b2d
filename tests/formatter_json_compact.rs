use serde_json::Value;
use structgraph::core::{AnalyzerConfig, CodebaseAnalyzer, CodebaseGraph, SourceFile};
use structgraph::formatters::JsonCompactFormatter;

fn graph() -> CodebaseGraph {
    let analyzer =
        CodebaseAnalyzer::with_config(AnalyzerConfig::new().without_cache()).unwrap();
    analyzer
        .analyze_sources(vec![
            SourceFile::new("a.py", "def helper():\n    pass\n\ndef caller():\n    helper()\n"),
            SourceFile::new("b.py", "class Job:\n    def run(self):\n        caller()\n"),
        ])
        .graph
}

#[test]
fn json_compact_formatter_outputs_valid_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("graph.json");

    JsonCompactFormatter::new()
        .format_to_file(&graph(), &path)
        .unwrap();

    let data = std::fs::read_to_string(&path).unwrap();
    let v: Value = serde_json::from_str(&data).unwrap();

    assert_eq!(v["meta"]["nodes"].as_u64().unwrap() as usize, 3);
    assert_eq!(v["meta"]["edges"].as_u64().unwrap() as usize, 2);
    assert_eq!(v["meta"]["format"], "compact");
    assert_eq!(v["files"], serde_json::json!(["a.py", "b.py"]));

    // nodes in file order: methods first, then functions
    assert_eq!(v["nodes"][0]["n"], "helper");
    assert_eq!(v["nodes"][2]["n"], "run");
    assert_eq!(v["nodes"][2]["c"], "Job");
    assert_eq!(v["nodes"][2]["f"], 1);

    // [caller, callee]
    let mut edges: Vec<(u64, u64)> = v["edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| (e[0].as_u64().unwrap(), e[1].as_u64().unwrap()))
        .collect();
    edges.sort();
    assert_eq!(edges, vec![(1, 0), (2, 1)]);
}

#[test]
fn full_format_carries_ids_and_spans() {
    let call_graph = graph().call_graph();
    let json = JsonCompactFormatter::new()
        .with_minimal(false)
        .format_graph(&call_graph)
        .unwrap();
    let v: Value = serde_json::from_str(&json).unwrap();

    assert_eq!(v["meta"]["format"], "full");
    assert_eq!(v["nodes"][1]["id"], "a.py:caller");
    assert_eq!(v["nodes"][1]["start"], 4);
    assert_eq!(v["nodes"][1]["end"], 5);
    assert!(v["nodes"][1]["class"].is_null());
}
