use petgraph::{graph::NodeIndex, Directed, Graph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{CallEdges, ClassEntity, FileEntity, FunctionEntity, Span};

/// Every file of one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodebaseGraph {
    files: Vec<FileEntity>,
    resolved: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub files: usize,
    pub classes: usize,
    pub functions: usize,
    pub methods: usize,
    pub call_edges: usize,
}

impl CodebaseGraph {
    pub fn new(files: Vec<FileEntity>) -> Self {
        Self {
            files,
            resolved: false,
        }
    }

    pub fn files(&self) -> &[FileEntity] {
        &self.files
    }

    pub fn file(&self, path: &str) -> Option<&FileEntity> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Every function and method across all files.
    pub fn callables(&self) -> impl Iterator<Item = &FunctionEntity> {
        self.files.iter().flat_map(|f| f.callables())
    }

    pub fn function(&self, id: &str) -> Option<&FunctionEntity> {
        self.callables().find(|f| f.id == id)
    }

    pub fn class(&self, id: &str) -> Option<&ClassEntity> {
        self.files
            .iter()
            .flat_map(|f| f.classes.iter())
            .find(|c| c.id == id)
    }

    /// Callers of `id`; `None` before resolution or for unknown IDs.
    pub fn outward_dependencies(&self, id: &str) -> Option<&[String]> {
        if !self.resolved {
            return None;
        }
        self.function(id).map(|f| f.outward_dependencies.as_slice())
    }

    /// `entity id -> outward dependencies` for every function and method.
    pub fn outward_lookup(&self) -> Option<HashMap<&str, &[String]>> {
        if !self.resolved {
            return None;
        }
        Some(
            self.callables()
                .map(|f| (f.id.as_str(), f.outward_dependencies.as_slice()))
                .collect(),
        )
    }

    /// Append resolved callers to each callee, skipping ones already present.
    pub(crate) fn apply_edges(&mut self, edges: &CallEdges) {
        for file in &mut self.files {
            for function in file.callables_mut() {
                for caller in edges.callers_of(&function.id) {
                    if *caller != function.id && !function.outward_dependencies.contains(caller) {
                        function.outward_dependencies.push(caller.clone());
                    }
                }
            }
        }
        self.resolved = true;
    }

    pub(crate) fn files_mut(&mut self) -> &mut [FileEntity] {
        &mut self.files
    }

    pub fn stats(&self) -> GraphStats {
        let classes: usize = self.files.iter().map(|f| f.classes.len()).sum();
        let functions: usize = self.files.iter().map(|f| f.functions.len()).sum();
        let methods: usize = self
            .files
            .iter()
            .flat_map(|f| f.classes.iter())
            .map(|c| c.methods.len())
            .sum();
        let call_edges: usize = self
            .callables()
            .map(|f| f.outward_dependencies.len())
            .sum();
        GraphStats {
            files: self.files.len(),
            classes,
            functions,
            methods,
            call_edges,
        }
    }

    /// Export resolved calls as a directed `caller -> callee` graph.
    pub fn call_graph(&self) -> CallGraph {
        let mut builder = GraphBuilder::new();
        for file in &self.files {
            for function in file.callables() {
                builder.add_node(CallNode::from_entity(&file.path, function));
            }
        }
        for callee in self.callables() {
            for caller in &callee.outward_dependencies {
                builder.add_edge(caller, &callee.id);
            }
        }
        builder.build()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallNode {
    pub id: String,
    pub name: String,
    pub class_name: Option<String>,
    pub file_path: String,
    pub span: Span,
}

impl CallNode {
    fn from_entity(file_path: &str, entity: &FunctionEntity) -> Self {
        Self {
            id: entity.id.clone(),
            name: entity.name.clone(),
            class_name: entity.class_name.clone(),
            file_path: file_path.to_string(),
            span: entity.span,
        }
    }
}

/// Edge weight: the call graph carries no data beyond direction.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallEdge;

pub type CallGraph = Graph<CallNode, CallEdge, Directed>;

pub struct GraphBuilder {
    graph: CallGraph,
    node_map: HashMap<String, NodeIndex>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Add a node; a repeated ID maps to the first node added for it.
    pub fn add_node(&mut self, node: CallNode) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&node.id) {
            return index;
        }
        let id = node.id.clone();
        let index = self.graph.add_node(node);
        self.node_map.insert(id, index);
        index
    }

    pub fn add_edge(&mut self, source_id: &str, target_id: &str) -> Option<petgraph::graph::EdgeIndex> {
        let source_idx = *self.node_map.get(source_id)?;
        let target_idx = *self.node_map.get(target_id)?;
        if self.graph.contains_edge(source_idx, target_idx) {
            return self.graph.find_edge(source_idx, target_idx);
        }
        Some(self.graph.add_edge(source_idx, target_idx, CallEdge))
    }

    pub fn build(self) -> CallGraph {
        self.graph
    }

    pub fn get_node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
