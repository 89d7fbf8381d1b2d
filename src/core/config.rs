use std::path::PathBuf;

/// Directories that hold vendored, generated or tool-managed code.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    "__pycache__",
    "venv",
    ".venv",
    "env",
    "node_modules",
    "site-packages",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    "build",
    "dist",
];

pub const DEFAULT_EXTENSIONS: &[&str] = &["py", "pyi", "pyw"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheMode {
    Disabled,
    MemoryOnly,
    /// Memory plus bincode files; `None` uses `$TMPDIR/structgraph_cache`
    Disk(Option<PathBuf>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub extensions: Vec<String>,
    pub excluded_dirs: Vec<String>,
    pub parallel: bool,
    pub cache: CacheMode,
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            parallel: true,
            cache: CacheMode::Disk(None),
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_cache_dir(mut self, dir: PathBuf) -> Self {
        self.cache = CacheMode::Disk(Some(dir));
        self
    }

    pub fn with_memory_cache(mut self) -> Self {
        self.cache = CacheMode::MemoryOnly;
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache = CacheMode::Disabled;
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.into().trim_start_matches('.').to_string())
            .collect();
        self
    }

    /// Add directory names to skip on top of the defaults.
    pub fn with_excluded_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for dir in dirs {
            let dir = dir.into();
            if !self.excluded_dirs.contains(&dir) {
                self.excluded_dirs.push(dir);
            }
        }
        self
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::new()
    }
}
