pub mod analyzer;
pub mod config;
pub mod entity;
pub mod error;
pub mod graph;
pub mod registry;
pub mod resolver;
pub mod scanner;
pub mod summarizer;

pub use analyzer::{AnalysisReport, CodebaseAnalyzer};
pub use config::{AnalyzerConfig, CacheMode};
pub use entity::{ClassEntity, FileEntity, FunctionEntity, Span};
pub use error::{AnalysisError, Diagnostic, DiagnosticKind, Result};
pub use graph::{CallGraph, CallNode, CodebaseGraph, GraphBuilder, GraphStats};
pub use registry::EntityRegistry;
pub use resolver::{CallEdges, CallGraphResolver, CallSite};
pub use scanner::{FileInfo, FileScanner, SourceFile};
pub use summarizer::{NoopSummarizer, Summarizer};
