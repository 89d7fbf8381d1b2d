use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::EntityRegistry;
use crate::parsers::EntityCalls;

/// One call expression reduced to a callee name and an optional receiver name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallSite {
    pub callee: String,
    /// Receiver identifier for `receiver.callee()`; `None` for bare or chained calls
    pub qualifier: Option<String>,
    pub line_number: usize,
}

impl CallSite {
    pub fn new(callee: String, qualifier: Option<String>, line_number: usize) -> Self {
        Self {
            callee,
            qualifier,
            line_number,
        }
    }
}

/// Outward edges produced by one resolution pass.
///
/// Keyed by callee ID; each list holds caller IDs in first-seen order with no
/// duplicates and never the callee itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallEdges {
    outward: HashMap<String, Vec<String>>,
    edge_count: usize,
}

impl CallEdges {
    fn add(&mut self, callee: &str, caller: &str) {
        if callee == caller {
            return;
        }
        let callers = self.outward.entry(callee.to_string()).or_default();
        if !callers.iter().any(|c| c == caller) {
            callers.push(caller.to_string());
            self.edge_count += 1;
        }
    }

    pub fn callers_of(&self, callee: &str) -> &[String] {
        self.outward.get(callee).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }

    /// `(caller, callee)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outward.iter().flat_map(|(callee, callers)| {
            callers
                .iter()
                .map(move |caller| (caller.as_str(), callee.as_str()))
        })
    }
}

/// Name-heuristic resolver turning per-entity call sites into outward edges.
#[derive(Debug, Clone)]
pub struct CallGraphResolver {
    parallel: bool,
}

impl CallGraphResolver {
    pub fn new() -> Self {
        Self { parallel: true }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Resolve every caller's call sites against the frozen registry.
    ///
    /// Workers compute callee lists per caller; the merge step commits them in
    /// caller order so the output does not depend on scheduling.
    pub fn resolve(&self, registry: &EntityRegistry, calls: &[EntityCalls]) -> CallEdges {
        let per_caller: Vec<Vec<usize>> = if self.parallel {
            calls
                .par_iter()
                .map(|entity| Self::resolve_caller(registry, entity))
                .collect()
        } else {
            calls
                .iter()
                .map(|entity| Self::resolve_caller(registry, entity))
                .collect()
        };

        let mut edges = CallEdges::default();
        for (entity, callees) in calls.iter().zip(per_caller) {
            for callee in callees {
                edges.add(registry.id(callee), &entity.caller_id);
            }
        }

        debug!(
            callers = calls.len(),
            entities = registry.len(),
            edges = edges.len(),
            "resolved call graph"
        );
        edges
    }

    fn resolve_caller(registry: &EntityRegistry, entity: &EntityCalls) -> Vec<usize> {
        let mut callees = Vec::new();
        for site in &entity.call_sites {
            for candidate in registry.candidates(&site.callee, site.qualifier.as_deref()) {
                if registry.id(candidate) != entity.caller_id && !callees.contains(&candidate) {
                    callees.push(candidate);
                }
            }
        }
        callees
    }
}

impl Default for CallGraphResolver {
    fn default() -> Self {
        Self::new()
    }
}
