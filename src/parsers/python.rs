use tracing::debug;
use tree_sitter::Node as TSNode;

use super::common::{extract_text, named_children, node_span, slice_lines, TreeSitterParser};
use super::references::ReferenceCollector;
use super::{EntityCalls, LanguageParser, ParsedFile};
use crate::core::{ClassEntity, FileEntity, FunctionEntity, Result};

/// Builds File -> Class -> Method and File -> Function entities from Python source.
pub struct PythonParser;

/// A definition found in a block, with the node the collector should walk.
///
/// For decorated definitions `scope` is the `decorated_definition` wrapper so
/// decorator references are collected, while `definition` supplies the span.
struct Definition<'a> {
    scope: TSNode<'a>,
    definition: TSNode<'a>,
}

impl PythonParser {
    pub fn new() -> Result<Self> {
        Ok(Self)
    }

    /// Direct definitions of `kind` inside `block`, unwrapping decorators.
    fn definitions<'a>(block: &TSNode<'a>, kind: &str) -> Vec<Definition<'a>> {
        named_children(block)
            .into_iter()
            .filter_map(|child| match child.kind() {
                k if k == kind => Some(Definition {
                    scope: child,
                    definition: child,
                }),
                "decorated_definition" => child
                    .child_by_field_name("definition")
                    .filter(|def| def.kind() == kind)
                    .map(|definition| Definition {
                        scope: child,
                        definition,
                    }),
                _ => None,
            })
            .collect()
    }

    /// Module-wide import list, including imports nested in bodies.
    fn extract_imports(&self, root: &TSNode, source: &[u8]) -> Vec<String> {
        let mut collector = ReferenceCollector::new();
        Self::visit_imports(root, source, &mut collector);
        collector.imports().iter().cloned().collect()
    }

    fn visit_imports(node: &TSNode, source: &[u8], collector: &mut ReferenceCollector) {
        match node.kind() {
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                collector.visit(node, source);
            }
            _ => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    Self::visit_imports(&child, source, collector);
                }
            }
        }
    }

    fn process_class(
        &self,
        def: &Definition,
        source: &str,
        file_id: &str,
        calls: &mut Vec<EntityCalls>,
    ) -> Option<ClassEntity> {
        let bytes = source.as_bytes();
        let name_node = def.definition.child_by_field_name("name")?;
        let class_name = extract_text(&name_node, bytes).to_string();
        let span = node_span(&def.definition);

        let bases = def
            .definition
            .child_by_field_name("superclasses")
            .map(|args| {
                named_children(&args)
                    .iter()
                    .filter(|arg| arg.kind() != "comment")
                    .map(|arg| extract_text(arg, bytes).to_string())
                    .collect()
            })
            .unwrap_or_default();

        let mut methods = Vec::new();
        if let Some(body) = def.definition.child_by_field_name("body") {
            for method_def in Self::definitions(&body, "function_definition") {
                if let Some(method) = self.process_function(
                    &method_def,
                    source,
                    file_id,
                    Some(&class_name),
                    calls,
                ) {
                    methods.push(method);
                }
            }
        }

        let mut collector = ReferenceCollector::new();
        collector.visit(&def.scope, bytes);

        debug!(
            file = file_id,
            class = %class_name,
            methods = methods.len(),
            "extracted class"
        );

        Some(
            ClassEntity::new(file_id, class_name, span, slice_lines(source, span))
                .with_bases(bases)
                .with_methods(methods)
                .with_inward_dependencies(collector.dependencies()),
        )
    }

    fn process_function(
        &self,
        def: &Definition,
        source: &str,
        file_id: &str,
        class_name: Option<&str>,
        calls: &mut Vec<EntityCalls>,
    ) -> Option<FunctionEntity> {
        let bytes = source.as_bytes();
        let name_node = def.definition.child_by_field_name("name")?;
        let func_name = extract_text(&name_node, bytes).to_string();
        let span = node_span(&def.definition);

        let is_async = def
            .definition
            .child(0)
            .map(|first| first.kind() == "async")
            .unwrap_or(false);

        let mut collector = ReferenceCollector::new();
        collector.visit(&def.scope, bytes);
        let (dependencies, call_sites) = collector.finish();

        let function = FunctionEntity::new(
            file_id,
            func_name,
            class_name.map(str::to_string),
            span,
            slice_lines(source, span),
        )
        .with_async(is_async)
        .with_inward_dependencies(dependencies);

        calls.push(EntityCalls {
            caller_id: function.id.clone(),
            call_sites,
        });

        Some(function)
    }
}

impl LanguageParser for PythonParser {
    fn parse_source(&self, file_id: &str, source: &str) -> Result<ParsedFile> {
        let mut parser = TreeSitterParser::new(tree_sitter_python::language())?;
        let tree = parser.parse_source(file_id, source)?;
        let root = tree.root_node();
        let bytes = source.as_bytes();

        let mut file = FileEntity::new(file_id.to_string());
        let mut calls = Vec::new();

        file.imports = self.extract_imports(&root, bytes);

        // Classes and functions are walked in one pass so call sites follow source order.
        for child in named_children(&root) {
            let unwrapped = match child.kind() {
                "decorated_definition" => child.child_by_field_name("definition"),
                _ => Some(child),
            };
            let Some(definition) = unwrapped else {
                continue;
            };
            let def = Definition {
                scope: child,
                definition,
            };
            match definition.kind() {
                "class_definition" => {
                    if let Some(class) = self.process_class(&def, source, file_id, &mut calls) {
                        file.classes.push(class);
                    }
                }
                "function_definition" => {
                    if let Some(function) =
                        self.process_function(&def, source, file_id, None, &mut calls)
                    {
                        file.functions.push(function);
                    }
                }
                _ => {}
            }
        }

        debug!(
            file = file_id,
            classes = file.classes.len(),
            functions = file.functions.len(),
            imports = file.imports.len(),
            "extracted file"
        );

        Ok(ParsedFile { file, calls })
    }

    fn language_name(&self) -> &str {
        "python"
    }
}
