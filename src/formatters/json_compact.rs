use anyhow::Result;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::{CallGraph, CodebaseGraph};

/// Call graph as JSON with numeric node and file ids
pub struct JsonCompactFormatter {
    /// Include full metadata or just essential information
    minimal: bool,
}

impl JsonCompactFormatter {
    pub fn new() -> Self {
        Self { minimal: true }
    }

    pub fn with_minimal(mut self, minimal: bool) -> Self {
        self.minimal = minimal;
        self
    }

    pub fn format_to_file(&self, graph: &CodebaseGraph, output_path: &Path) -> Result<()> {
        let json_content = self.format_graph(&graph.call_graph())?;
        fs::write(output_path, json_content)?;
        Ok(())
    }

    pub fn format_graph(&self, graph: &CallGraph) -> Result<String> {
        let node_indices: Vec<NodeIndex> = graph.node_indices().collect();

        let mut nodes = Vec::new();
        let mut node_id_map = HashMap::new();
        let mut file_map: HashMap<String, u32> = HashMap::new();
        let mut files: Vec<String> = Vec::new();

        for &idx in &node_indices {
            let node = &graph[idx];
            if !file_map.contains_key(&node.file_path) {
                file_map.insert(node.file_path.clone(), files.len() as u32);
                files.push(node.file_path.clone());
            }
        }

        for (node_idx, &idx) in node_indices.iter().enumerate() {
            let node = &graph[idx];
            node_id_map.insert(idx, node_idx);
            let file_id = file_map[&node.file_path];

            let node_json = if self.minimal {
                json!({
                    "n": node.name,
                    "c": node.class_name,
                    "f": file_id,
                    "l": node.span.start
                })
            } else {
                json!({
                    "id": node.id,
                    "name": node.name,
                    "class": node.class_name,
                    "file": file_id,
                    "start": node.span.start,
                    "end": node.span.end
                })
            };
            nodes.push(node_json);
        }

        let mut edges = Vec::new();
        for edge_ref in graph.edge_references() {
            if let (Some(&src_id), Some(&tgt_id)) = (
                node_id_map.get(&edge_ref.source()),
                node_id_map.get(&edge_ref.target()),
            ) {
                edges.push(json!([src_id, tgt_id]));
            }
        }

        let output = json!({
            "meta": {
                "nodes": graph.node_count(),
                "edges": graph.edge_count(),
                "format": if self.minimal { "compact" } else { "full" }
            },
            "files": files,
            "nodes": nodes,
            "edges": edges
        });

        Ok(serde_json::to_string(&output)?)
    }
}

impl Default for JsonCompactFormatter {
    fn default() -> Self {
        Self::new()
    }
}
