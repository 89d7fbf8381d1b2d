use serde_json::Value;
use structgraph::core::{AnalyzerConfig, CodebaseAnalyzer, SourceFile};
use structgraph::formatters::JsonFormatter;

#[test]
fn json_report_nests_entities_and_lists_diagnostics() {
    let analyzer =
        CodebaseAnalyzer::with_config(AnalyzerConfig::new().without_cache()).unwrap();
    let report = analyzer.analyze_sources(vec![
        SourceFile::new(
            "app.py",
            "import os\n\nclass App:\n    def start(self):\n        boot()\n\ndef boot():\n    return os.getcwd()\n",
        ),
        SourceFile::new("broken.py", "def (:\n"),
    ]);

    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("report.json");
    JsonFormatter::new()
        .format_to_file(&report, "/src/project", &path)
        .unwrap();
    let v: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(v["root"], "/src/project");
    assert_eq!(v["total_files"], 1);
    assert_eq!(v["total_classes"], 1);
    assert_eq!(v["total_functions"], 1);
    assert_eq!(v["total_methods"], 1);
    assert_eq!(v["total_call_edges"], 1);

    let file = &v["files"][0];
    assert_eq!(file["path"], "app.py");
    assert_eq!(file["imports"], serde_json::json!(["os"]));

    let start = &file["classes"][0]["methods"][0];
    assert_eq!(start["id"], "app.py:App.start");
    assert_eq!(start["span"]["start"], 4);
    assert_eq!(start["span"]["end"], 5);

    let boot = &file["functions"][0];
    assert_eq!(boot["outward_dependencies"], serde_json::json!(["app.py:App.start"]));
    assert_eq!(
        boot["inward_dependencies"],
        serde_json::json!(["os", "getcwd"])
    );

    assert_eq!(v["diagnostics"].as_array().unwrap().len(), 1);
    assert_eq!(v["diagnostics"][0]["file"], "broken.py");
}

#[test]
fn compact_output_is_single_line() {
    let analyzer =
        CodebaseAnalyzer::with_config(AnalyzerConfig::new().without_cache()).unwrap();
    let report = analyzer.analyze_sources(vec![SourceFile::new("m.py", "def f():\n    pass\n")]);
    let json = JsonFormatter::new()
        .with_pretty(false)
        .format_report(&report, ".")
        .unwrap();
    assert!(!json.contains('\n'));
    let v: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["files"][0]["functions"][0]["name"], "f");
}
