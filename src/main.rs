use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use structgraph::core::{AnalyzerConfig, CodebaseAnalyzer};
use structgraph::formatters::{JsonCompactFormatter, JsonFormatter};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "structgraph",
    version,
    about = "Extract classes, functions and the call graph of a Python codebase"
)]
struct Cli {
    /// Input directory to analyze
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Output file path
    #[arg(short, long, value_name = "FILE", default_value = "structgraph.json")]
    output: PathBuf,

    /// Output format: json, json-compact
    #[arg(short, long, value_name = "FORMAT", value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Extra directory names to skip, comma-separated
    #[arg(long, value_name = "DIRS", value_delimiter = ',')]
    exclude: Vec<String>,

    /// Directory for the on-disk parse cache
    #[arg(long, value_name = "DIR", conflicts_with = "no_cache")]
    cache_dir: Option<PathBuf>,

    /// Disable the parse cache
    #[arg(long)]
    no_cache: bool,

    /// Run every phase on the current thread
    #[arg(long)]
    sequential: bool,

    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum OutputFormat {
    Json,
    JsonCompact,
}

impl OutputFormat {
    fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::JsonCompact => "json-compact",
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "structgraph=debug"
    } else {
        "structgraph=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}

fn build_config(cli: &Cli) -> AnalyzerConfig {
    let extra_excludes = cli
        .exclude
        .iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    let mut config = AnalyzerConfig::new()
        .with_parallel(!cli.sequential)
        .with_excluded_dirs(extra_excludes);
    if cli.no_cache {
        config = config.without_cache();
    } else if let Some(dir) = &cli.cache_dir {
        config = config.with_cache_dir(dir.clone());
    }
    config
}

fn run(cli: Cli) -> Result<()> {
    let start_time = Instant::now();
    info!(
        input = %cli.input.display(),
        output = %cli.output.display(),
        format = cli.format.as_str(),
        "starting analysis"
    );

    let analyzer = CodebaseAnalyzer::with_config(build_config(&cli))?;
    let report = analyzer
        .analyze(&cli.input)
        .with_context(|| format!("failed to analyze {}", cli.input.display()))?;

    match cli.format {
        OutputFormat::Json => {
            let root = cli.input.to_string_lossy();
            JsonFormatter::new().format_to_file(&report, &root, &cli.output)?;
        }
        OutputFormat::JsonCompact => {
            JsonCompactFormatter::new().format_to_file(&report.graph, &cli.output)?;
        }
    }

    let stats = report.graph.stats();
    eprintln!(
        "Analyzed {} files: {} classes, {} methods, {} functions, {} call edges",
        stats.files, stats.classes, stats.methods, stats.functions, stats.call_edges
    );
    if !report.diagnostics.is_empty() {
        eprintln!("Skipped {} file(s):", report.diagnostics.len());
        for diagnostic in &report.diagnostics {
            eprintln!("  {}", diagnostic);
        }
    }
    eprintln!("Wrote {}", cli.output.display());

    info!(
        elapsed_secs = start_time.elapsed().as_secs_f64(),
        "analysis finished"
    );
    Ok(())
}
