use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use super::summarizer::Summarizer;
use super::{
    AnalyzerConfig, CacheMode, CallGraphResolver, CodebaseGraph, Diagnostic, EntityRegistry,
    FileEntity, FileScanner, Result, SourceFile,
};
use crate::parsers::{cache::ParseCache, EntityCalls, LanguageParser, ParsedFile, ParserFactory};

/// The graph of one run plus every file that was skipped.
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    pub graph: CodebaseGraph,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct CodebaseAnalyzer {
    config: AnalyzerConfig,
    file_scanner: FileScanner,
    parser: Box<dyn LanguageParser + Send + Sync>,
    resolver: CallGraphResolver,
    parse_cache: Option<ParseCache>,
    summarizer: Option<Box<dyn Summarizer>>,
}

impl CodebaseAnalyzer {
    pub fn new() -> Result<Self> {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Result<Self> {
        let parse_cache = match &config.cache {
            CacheMode::Disabled => None,
            CacheMode::MemoryOnly => Some(ParseCache::in_memory_only()),
            CacheMode::Disk(dir) => Some(ParseCache::new(dir.clone()).unwrap_or_else(|err| {
                warn!(error = %err, "failed to initialize disk parse cache");
                ParseCache::in_memory_only()
            })),
        };

        Ok(Self {
            file_scanner: FileScanner::new(&config.extensions, &config.excluded_dirs),
            parser: ParserFactory::new().get_parser("python")?,
            resolver: CallGraphResolver::new().with_parallel(config.parallel),
            parse_cache,
            summarizer: None,
            config,
        })
    }

    /// Attach a summarisation oracle, consulted once per entity after resolution.
    pub fn with_summarizer(mut self, summarizer: Box<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn parse_cache(&self) -> Option<&ParseCache> {
        self.parse_cache.as_ref()
    }

    /// Scan `root_path`, read every matching file and analyze it.
    pub fn analyze(&self, root_path: &Path) -> Result<AnalysisReport> {
        info!(root = %root_path.display(), "scanning files");
        let files = self.file_scanner.scan_directory(root_path)?;
        info!(files = files.len(), "found files to analyze");

        let (sources, mut read_failures) = self.file_scanner.read_sources(&files);
        let mut report = self.analyze_sources(sources);
        read_failures.append(&mut report.diagnostics);
        report.diagnostics = read_failures;
        Ok(report)
    }

    /// Run all phases over in-memory sources. Output files keep input order.
    pub fn analyze_sources(&self, sources: Vec<SourceFile>) -> AnalysisReport {
        if sources.is_empty() {
            info!("no input files; returning empty graph");
            let mut graph = CodebaseGraph::new(Vec::new());
            self.link(&mut graph, &[]);
            return AnalysisReport {
                graph,
                diagnostics: Vec::new(),
            };
        }

        // Phase 1: per-file extraction
        info!(files = sources.len(), "extracting entities");
        let results: Vec<Result<ParsedFile>> = if self.config.parallel {
            sources.par_iter().map(|s| self.extract(s)).collect()
        } else {
            sources.iter().map(|s| self.extract(s)).collect()
        };

        let mut files = Vec::with_capacity(results.len());
        let mut all_calls: Vec<EntityCalls> = Vec::new();
        let mut diagnostics = Vec::new();
        for result in results {
            match result {
                Ok(parsed) => {
                    files.push(parsed.file);
                    all_calls.extend(parsed.calls);
                }
                Err(err) => {
                    warn!("skipping file: {}", err);
                    diagnostics.extend(err.to_diagnostic());
                }
            }
        }

        // Phase 2: resolution over the complete entity set
        let mut graph = CodebaseGraph::new(files);
        self.link(&mut graph, &all_calls);

        // Phase 3: optional annotation
        if let Some(summarizer) = &self.summarizer {
            let texts: HashMap<&str, &str> = sources
                .iter()
                .map(|s| (s.id.as_str(), s.text.as_str()))
                .collect();
            self.annotate(&mut graph, summarizer.as_ref(), &texts);
        }

        let stats = graph.stats();
        info!(
            files = stats.files,
            classes = stats.classes,
            functions = stats.functions,
            methods = stats.methods,
            call_edges = stats.call_edges,
            skipped = diagnostics.len(),
            "analysis complete"
        );

        AnalysisReport { graph, diagnostics }
    }

    /// Freeze the registry and resolve every call site against it.
    ///
    /// Repeating this over an unchanged graph adds no edges.
    pub fn link(&self, graph: &mut CodebaseGraph, calls: &[EntityCalls]) {
        let registry = EntityRegistry::from_files(graph.files());
        info!(entities = registry.len(), callers = calls.len(), "resolving calls");
        let edges = self.resolver.resolve(&registry, calls);
        graph.apply_edges(&edges);
        debug!(edges = edges.len(), "applied call edges");
    }

    fn extract(&self, source: &SourceFile) -> Result<ParsedFile> {
        if let Some(cache) = &self.parse_cache {
            if let Some(parsed) = cache.get(&source.id, &source.text) {
                debug!(file = %source.id, "cache hit");
                return Ok(parsed);
            }
        }

        let parsed = self.parser.parse_source(&source.id, &source.text)?;

        if let Some(cache) = &self.parse_cache {
            if let Err(err) = cache.store(&source.id, &source.text, &parsed) {
                warn!(file = %source.id, error = %err, "failed to cache extraction");
            }
        }
        Ok(parsed)
    }

    fn annotate(
        &self,
        graph: &mut CodebaseGraph,
        summarizer: &dyn Summarizer,
        texts: &HashMap<&str, &str>,
    ) {
        info!("summarizing entities");
        let annotate_file = |file: &mut FileEntity| {
            if let Some(text) = texts.get(file.path.as_str()) {
                file.code_summary = summarizer.summarize_code(text, "file");
            }
            file.dependency_summary = summarizer.summarize_dependencies(&file.imports, &[], "file");

            for class in &mut file.classes {
                let context = format!("class {}", class.name);
                class.code_summary = summarizer.summarize_code(&class.code, &context);
                class.dependency_summary =
                    summarizer.summarize_dependencies(&class.inward_dependencies, &[], &context);
            }

            for function in file.callables_mut() {
                let context = function.context_label();
                function.code_summary = summarizer.summarize_code(&function.code, &context);
                if !function.inward_dependencies.is_empty()
                    || !function.outward_dependencies.is_empty()
                {
                    function.dependency_summary = summarizer.summarize_dependencies(
                        &function.inward_dependencies,
                        &function.outward_dependencies,
                        &context,
                    );
                }
            }
        };

        if self.config.parallel {
            graph.files_mut().par_iter_mut().for_each(annotate_file);
        } else {
            graph.files_mut().iter_mut().for_each(annotate_file);
        }
    }
}
