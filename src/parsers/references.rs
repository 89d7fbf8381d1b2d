//! Reference classification for Python syntax subtrees.
//!
//! The collector walks a class or function subtree and sorts every name it
//! meets into four buckets: imports, calls, references (simple receivers of
//! attribute accesses) and attributes. The buckets are deduplicated and sorted
//! independently and then concatenated in that fixed order, so the same name
//! may appear more than once in the final list.
//!
//! Alongside the buckets the collector records one [`CallSite`] per call
//! expression whose callee can be reduced to a name, which is what the
//! resolver matches against the entity registry.

use std::collections::BTreeSet;
use tree_sitter::Node as TSNode;

use super::common::{extract_text, named_children};
use crate::core::CallSite;

#[derive(Debug, Default, Clone)]
pub struct ReferenceCollector {
    imports: BTreeSet<String>,
    calls: BTreeSet<String>,
    references: BTreeSet<String>,
    attributes: BTreeSet<String>,
    call_sites: Vec<CallSite>,
}

impl ReferenceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect from `node` and every descendant.
    pub fn visit(&mut self, node: &TSNode, source: &[u8]) {
        match node.kind() {
            "import_statement" => self.visit_import(node, source),
            "import_from_statement" | "future_import_statement" => {
                self.visit_import_from(node, source)
            }
            "call" => self.visit_call(node, source),
            "attribute" => self.visit_attribute(node, source),
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(&child, source);
        }
    }

    fn visit_import(&mut self, node: &TSNode, source: &[u8]) {
        let mut cursor = node.walk();
        for name in node.children_by_field_name("name", &mut cursor) {
            self.imports.insert(imported_name(&name, source));
        }
    }

    fn visit_import_from(&mut self, node: &TSNode, source: &[u8]) {
        let module = if node.kind() == "future_import_statement" {
            Some("__future__".to_string())
        } else {
            node.child_by_field_name("module_name")
                .and_then(|m| module_name(&m, source))
        };

        let mut names: Vec<String> = {
            let mut cursor = node.walk();
            node.children_by_field_name("name", &mut cursor)
                .map(|name| imported_name(&name, source))
                .collect()
        };
        let mut cursor = node.walk();
        if node
            .children(&mut cursor)
            .any(|child| child.kind() == "wildcard_import")
        {
            names.push("*".to_string());
        }

        if let Some(module) = &module {
            self.imports.insert(module.clone());
        }
        for name in names {
            let entry = match &module {
                Some(module) => format!("{}.{}", module, name),
                None => name,
            };
            self.imports.insert(entry);
        }
    }

    fn visit_call(&mut self, node: &TSNode, source: &[u8]) {
        let Some(function) = node.child_by_field_name("function") else {
            return;
        };
        let line_number = node.start_position().row + 1;

        match function.kind() {
            "identifier" => {
                let name = extract_text(&function, source).to_string();
                self.calls.insert(name.clone());
                self.call_sites.push(CallSite::new(name, None, line_number));
            }
            "attribute" => {
                let (Some(object), Some(attribute)) = (
                    function.child_by_field_name("object"),
                    function.child_by_field_name("attribute"),
                ) else {
                    return;
                };
                let callee = extract_text(&attribute, source).to_string();
                match object.kind() {
                    "identifier" => {
                        let qualifier = extract_text(&object, source).to_string();
                        self.call_sites
                            .push(CallSite::new(callee, Some(qualifier), line_number));
                    }
                    "attribute" => {
                        self.call_sites.push(CallSite::new(callee, None, line_number));
                    }
                    _ => {}
                }
                // The attribute node itself is bucketed when the walk reaches it.
            }
            _ => {}
        }
    }

    fn visit_attribute(&mut self, node: &TSNode, source: &[u8]) {
        if let Some(object) = node.child_by_field_name("object") {
            if object.kind() == "identifier" {
                self.references
                    .insert(extract_text(&object, source).to_string());
            }
        }
        if let Some(attribute) = node.child_by_field_name("attribute") {
            self.attributes
                .insert(extract_text(&attribute, source).to_string());
        }
    }

    pub fn imports(&self) -> &BTreeSet<String> {
        &self.imports
    }

    pub fn calls(&self) -> &BTreeSet<String> {
        &self.calls
    }

    pub fn references(&self) -> &BTreeSet<String> {
        &self.references
    }

    pub fn attributes(&self) -> &BTreeSet<String> {
        &self.attributes
    }

    pub fn call_sites(&self) -> &[CallSite] {
        &self.call_sites
    }

    /// Concatenate the four buckets: imports, calls, references, attributes.
    pub fn dependencies(&self) -> Vec<String> {
        self.imports
            .iter()
            .chain(self.calls.iter())
            .chain(self.references.iter())
            .chain(self.attributes.iter())
            .cloned()
            .collect()
    }

    /// Consume the collector, yielding the dependency list and the call sites.
    pub fn finish(self) -> (Vec<String>, Vec<CallSite>) {
        let dependencies = self.dependencies();
        (dependencies, self.call_sites)
    }
}

/// `a.b` for `import a.b` and `import a.b as c`.
fn imported_name(node: &TSNode, source: &[u8]) -> String {
    match node.kind() {
        "aliased_import" => node
            .child_by_field_name("name")
            .map(|n| extract_text(&n, source).to_string())
            .unwrap_or_default(),
        _ => extract_text(node, source).to_string(),
    }
}

/// Module of a `from` import; `None` for a bare relative prefix like `from . import x`.
fn module_name(node: &TSNode, source: &[u8]) -> Option<String> {
    match node.kind() {
        "relative_import" => named_children(node)
            .into_iter()
            .find(|child| child.kind() == "dotted_name")
            .map(|dotted| extract_text(&dotted, source).to_string()),
        _ => Some(extract_text(node, source).to_string()),
    }
}
