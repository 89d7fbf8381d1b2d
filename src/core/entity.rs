use serde::{Deserialize, Serialize};

/// Inclusive, 1-based line range of an entity inside its file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start >= 1 && start <= end);
        Self { start, end }
    }

    pub fn line_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// ID of a top-level function: `file:name`.
pub fn function_id(file: &str, name: &str) -> String {
    format!("{}:{}", file, name)
}

/// ID of a method: `file:Class.name`.
pub fn method_id(file: &str, class_name: &str, name: &str) -> String {
    format!("{}:{}.{}", file, class_name, name)
}

/// ID of a class: `file:Class`.
pub fn class_id(file: &str, name: &str) -> String {
    format!("{}:{}", file, name)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionEntity {
    pub id: String,
    pub name: String,
    pub class_name: Option<String>,
    pub span: Span,
    pub code: String,
    pub is_async: bool,
    /// Names this function references
    pub inward_dependencies: Vec<String>,
    /// IDs of the entities that call this function
    pub outward_dependencies: Vec<String>,
    pub code_summary: Option<String>,
    pub dependency_summary: Option<String>,
}

impl FunctionEntity {
    pub fn new(file: &str, name: String, class_name: Option<String>, span: Span, code: String) -> Self {
        let id = match class_name.as_deref() {
            Some(class_name) => method_id(file, class_name, &name),
            None => function_id(file, &name),
        };
        Self {
            id,
            name,
            class_name,
            span,
            code,
            is_async: false,
            inward_dependencies: Vec::new(),
            outward_dependencies: Vec::new(),
            code_summary: None,
            dependency_summary: None,
        }
    }

    pub fn with_inward_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.inward_dependencies = dependencies;
        self
    }

    pub fn with_async(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }

    pub fn is_method(&self) -> bool {
        self.class_name.is_some()
    }

    /// Label used when asking a summarizer about this entity.
    pub fn context_label(&self) -> String {
        match &self.class_name {
            Some(class_name) => format!("method {} in class {}", self.name, class_name),
            None => format!("function {}", self.name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassEntity {
    pub id: String,
    pub name: String,
    pub span: Span,
    pub code: String,
    /// Base class expressions as written in the class header
    pub bases: Vec<String>,
    pub methods: Vec<FunctionEntity>,
    pub inward_dependencies: Vec<String>,
    pub code_summary: Option<String>,
    pub dependency_summary: Option<String>,
}

impl ClassEntity {
    pub fn new(file: &str, name: String, span: Span, code: String) -> Self {
        Self {
            id: class_id(file, &name),
            name,
            span,
            code,
            bases: Vec::new(),
            methods: Vec::new(),
            inward_dependencies: Vec::new(),
            code_summary: None,
            dependency_summary: None,
        }
    }

    pub fn with_bases(mut self, bases: Vec<String>) -> Self {
        self.bases = bases;
        self
    }

    pub fn with_methods(mut self, methods: Vec<FunctionEntity>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_inward_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.inward_dependencies = dependencies;
        self
    }

    pub fn method(&self, name: &str) -> Option<&FunctionEntity> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntity {
    pub path: String,
    /// Sorted, deduplicated module names, including `module.member` forms
    pub imports: Vec<String>,
    pub classes: Vec<ClassEntity>,
    pub functions: Vec<FunctionEntity>,
    pub code_summary: Option<String>,
    pub dependency_summary: Option<String>,
}

impl FileEntity {
    pub fn new(path: String) -> Self {
        Self {
            path,
            imports: Vec::new(),
            classes: Vec::new(),
            functions: Vec::new(),
            code_summary: None,
            dependency_summary: None,
        }
    }

    pub fn class(&self, name: &str) -> Option<&ClassEntity> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn function(&self, name: &str) -> Option<&FunctionEntity> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Every function and method of the file, methods first in class order.
    pub fn callables(&self) -> impl Iterator<Item = &FunctionEntity> {
        self.classes
            .iter()
            .flat_map(|c| c.methods.iter())
            .chain(self.functions.iter())
    }

    pub fn callables_mut(&mut self) -> impl Iterator<Item = &mut FunctionEntity> {
        self.classes
            .iter_mut()
            .flat_map(|c| c.methods.iter_mut())
            .chain(self.functions.iter_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_and_function_ids_use_disjoint_namespaces() {
        let f = FunctionEntity::new("a.py", "run".into(), None, Span::new(1, 2), String::new());
        let m = FunctionEntity::new(
            "a.py",
            "run".into(),
            Some("Job".into()),
            Span::new(4, 5),
            String::new(),
        );
        assert_eq!(f.id, "a.py:run");
        assert_eq!(m.id, "a.py:Job.run");
        assert!(m.is_method());
        assert_eq!(m.context_label(), "method run in class Job");
    }

    #[test]
    fn span_line_count_is_inclusive() {
        assert_eq!(Span::new(3, 3).line_count(), 1);
        assert_eq!(Span::new(3, 7).line_count(), 5);
    }
}
