//! # STRUCTGRAPH
//!
//! Structural model and call graph extraction for Python codebases.
//!
//! Every file is parsed with tree-sitter into File -> Class -> Method and
//! File -> Function entities, each carrying its exact source span and the
//! names its body references. Once every file is extracted, a single
//! whole-codebase resolution pass links call sites to the functions and
//! methods they name, filling each entity's list of callers.
//!
//! ## Phases
//!
//! 1. **Extraction**: per file, independent, parallel.
//! 2. **Resolution**: once, over the frozen set of all entity IDs.
//! 3. **Annotation**: optional summaries from a [`core::Summarizer`].
//!
//! Resolution is name-based. `receiver.method()` only links to a method when
//! the receiver text equals the class name; no types are inferred.
//!
//! ## Output Formats
//!
//! - **JSON**: nested file/class/function report with diagnostics
//! - **JSON-Compact**: call graph with numeric ids

pub mod core;
pub mod formatters;
pub mod parsers;
