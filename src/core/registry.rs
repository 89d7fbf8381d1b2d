use std::collections::HashMap;

use super::FileEntity;

/// Frozen snapshot of every function and method ID in a codebase.
///
/// Built once after all files are extracted; the resolver only ever reads it.
/// Lookups mirror suffix matching on IDs: `:callee` selects top-level
/// functions named `callee`, `:Class.callee` selects methods of classes named
/// `Class`. Entity names never contain `.` or `:`, so the two lookups are
/// disjoint and exact.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    function_index: HashMap<String, Vec<usize>>,
    method_index: HashMap<String, Vec<usize>>,
}

impl EntityRegistry {
    pub fn from_files(files: &[FileEntity]) -> Self {
        let mut registry = Self::default();
        for file in files {
            for class in &file.classes {
                for method in &class.methods {
                    registry.register(&method.id, format!("{}.{}", class.name, method.name), true);
                }
            }
            for function in &file.functions {
                registry.register(&function.id, function.name.clone(), false);
            }
        }
        registry
    }

    fn register(&mut self, id: &str, key: String, is_method: bool) {
        if self.index.contains_key(id) {
            return;
        }
        let idx = self.ids.len();
        self.ids.push(id.to_string());
        self.index.insert(id.to_string(), idx);
        let target = if is_method {
            &mut self.method_index
        } else {
            &mut self.function_index
        };
        target.entry(key).or_default().push(idx);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn id(&self, idx: usize) -> &str {
        &self.ids[idx]
    }

    /// Registry indices of every entity a call `qualifier.callee()` may reach.
    pub fn candidates(&self, callee: &str, qualifier: Option<&str>) -> Vec<usize> {
        let mut found: Vec<usize> = self
            .function_index
            .get(callee)
            .cloned()
            .unwrap_or_default();
        if let Some(qualifier) = qualifier {
            let key = format!("{}.{}", qualifier, callee);
            if let Some(methods) = self.method_index.get(&key) {
                found.extend(methods.iter().copied());
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClassEntity, FunctionEntity, Span};

    fn file() -> FileEntity {
        let mut file = FileEntity::new("a.py".into());
        let method = FunctionEntity::new(
            "a.py",
            "run".into(),
            Some("Job".into()),
            Span::new(2, 3),
            String::new(),
        );
        file.classes.push(
            ClassEntity::new("a.py", "Job".into(), Span::new(1, 3), String::new())
                .with_methods(vec![method]),
        );
        file.functions.push(FunctionEntity::new(
            "a.py",
            "run".into(),
            None,
            Span::new(5, 6),
            String::new(),
        ));
        file
    }

    #[test]
    fn unqualified_lookup_only_sees_top_level_functions() {
        let registry = EntityRegistry::from_files(&[file()]);
        let ids: Vec<_> = registry
            .candidates("run", Some("job"))
            .into_iter()
            .map(|i| registry.id(i).to_string())
            .collect();
        assert_eq!(ids, vec!["a.py:run"]);
    }

    #[test]
    fn qualified_lookup_requires_literal_class_name() {
        let registry = EntityRegistry::from_files(&[file()]);
        let ids: Vec<_> = registry
            .candidates("run", Some("Job"))
            .into_iter()
            .map(|i| registry.id(i).to_string())
            .collect();
        assert_eq!(ids, vec!["a.py:run", "a.py:Job.run"]);
        assert!(!registry.contains("a.py:Job"));
    }
}
