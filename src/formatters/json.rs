use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::core::{AnalysisReport, Diagnostic, FileEntity};

/// Nested report: file -> classes/methods/functions with dependencies and summaries
#[derive(Debug, Serialize)]
struct Report<'a> {
    root: &'a str,
    total_files: usize,
    total_classes: usize,
    total_functions: usize,
    total_methods: usize,
    total_call_edges: usize,
    files: &'a [FileEntity],
    diagnostics: &'a [Diagnostic],
}

pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn format_to_file(&self, report: &AnalysisReport, root: &str, output_path: &Path) -> Result<()> {
        let json_content = self.format_report(report, root)?;
        fs::write(output_path, json_content)?;
        Ok(())
    }

    pub fn format_report(&self, report: &AnalysisReport, root: &str) -> Result<String> {
        let stats = report.graph.stats();
        let output = Report {
            root,
            total_files: stats.files,
            total_classes: stats.classes,
            total_functions: stats.functions,
            total_methods: stats.methods,
            total_call_edges: stats.call_edges,
            files: report.graph.files(),
            diagnostics: &report.diagnostics,
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&output)?
        } else {
            serde_json::to_string(&output)?
        };
        Ok(json)
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}
