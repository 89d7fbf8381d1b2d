use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::{AnalysisError, Diagnostic, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    /// `/`-separated path relative to the scan root
    pub file_id: String,
}

/// One input to the analyzer: a file identifier and its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub id: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

pub struct FileScanner {
    extensions: Vec<String>,
    excluded_dirs: Vec<String>,
}

impl FileScanner {
    pub fn new(extensions: &[String], excluded_dirs: &[String]) -> Self {
        Self {
            extensions: extensions.to_vec(),
            excluded_dirs: excluded_dirs.to_vec(),
        }
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map(|name| self.excluded_dirs.iter().any(|d| d == name))
                .unwrap_or(false)
    }

    fn has_supported_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }

    /// Files under `root` with a supported extension, sorted by file id.
    pub fn scan_directory(&self, root_path: &Path) -> Result<Vec<FileInfo>> {
        if !root_path.is_dir() {
            return Err(AnalysisError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a directory", root_path.display()),
            )));
        }

        let mut files: Vec<FileInfo> = WalkDir::new(root_path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(error = %err, "skipping unreadable directory entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| self.has_supported_extension(entry.path()))
            .map(|entry| {
                let path = entry.into_path();
                let file_id = file_id_for(root_path, &path);
                FileInfo { path, file_id }
            })
            .collect();

        files.sort_by(|a, b| a.file_id.cmp(&b.file_id));
        debug!(root = %root_path.display(), files = files.len(), "scanned directory");
        Ok(files)
    }

    /// Read every file; unreadable or non-UTF-8 files become read failures.
    pub fn read_sources(&self, files: &[FileInfo]) -> (Vec<SourceFile>, Vec<Diagnostic>) {
        let results: Vec<Result<SourceFile>> = files
            .par_iter()
            .map(|info| {
                fs::read_to_string(&info.path)
                    .map(|text| SourceFile::new(info.file_id.clone(), text))
                    .map_err(|err| AnalysisError::read(info.file_id.clone(), err.to_string()))
            })
            .collect();

        let mut sources = Vec::with_capacity(results.len());
        let mut diagnostics = Vec::new();
        for result in results {
            match result {
                Ok(source) => sources.push(source),
                Err(err) => {
                    warn!("{}", err);
                    diagnostics.extend(err.to_diagnostic());
                }
            }
        }
        (sources, diagnostics)
    }
}

fn file_id_for(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
