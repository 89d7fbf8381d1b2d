use anyhow::Result;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::ParsedFile;

const DEFAULT_MAX_MEMORY_ENTRIES: usize = 1000;

/// Cached extraction result, valid while the file's content hash is unchanged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedFileEntry {
    pub parsed: ParsedFile,
    pub content_hash: u64,
}

/// Thread-safe cache with memory and (best-effort) disk storage
pub struct ParseCache {
    memory_cache: DashMap<String, ParsedFileEntry>,
    cache_dir: Option<PathBuf>,
    max_memory_entries: usize,
}

impl ParseCache {
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let resolved_dir =
            cache_dir.unwrap_or_else(|| std::env::temp_dir().join("structgraph_cache"));
        let cache_dir = match fs::create_dir_all(&resolved_dir) {
            Ok(()) => Some(resolved_dir),
            Err(err) => {
                warn!(
                    dir = %resolved_dir.display(),
                    error = %err,
                    "failed to initialize disk cache"
                );
                None
            }
        };

        Ok(Self {
            memory_cache: DashMap::with_capacity(DEFAULT_MAX_MEMORY_ENTRIES),
            cache_dir,
            max_memory_entries: DEFAULT_MAX_MEMORY_ENTRIES,
        })
    }

    /// Build an in-memory-only cache without touching the filesystem
    pub fn in_memory_only() -> Self {
        Self {
            memory_cache: DashMap::with_capacity(DEFAULT_MAX_MEMORY_ENTRIES),
            cache_dir: None,
            max_memory_entries: DEFAULT_MAX_MEMORY_ENTRIES,
        }
    }

    pub fn content_hash(source: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        source.hash(&mut hasher);
        hasher.finish()
    }

    /// Get the cached extraction for `file_id` if it was built from `source`
    pub fn get(&self, file_id: &str, source: &str) -> Option<ParsedFile> {
        let content_hash = Self::content_hash(source);

        if let Some(entry) = self.memory_cache.get(file_id) {
            if entry.content_hash == content_hash {
                return Some(entry.parsed.clone());
            }
            return None;
        }

        let cache_path = self.cache_path(file_id)?;
        if !cache_path.exists() {
            return None;
        }
        match self.load_from_disk(&cache_path) {
            Ok(entry) if entry.content_hash == content_hash => {
                let parsed = entry.parsed.clone();
                if self.memory_cache.len() < self.max_memory_entries {
                    self.memory_cache.insert(file_id.to_string(), entry);
                }
                Some(parsed)
            }
            Ok(_) => None,
            Err(err) => {
                warn!(file = file_id, error = %err, "discarding unreadable cache entry");
                None
            }
        }
    }

    /// Store an extraction result for `file_id` built from `source`
    pub fn store(&self, file_id: &str, source: &str, parsed: &ParsedFile) -> Result<()> {
        let entry = ParsedFileEntry {
            parsed: parsed.clone(),
            content_hash: Self::content_hash(source),
        };

        if self.memory_cache.len() >= self.max_memory_entries {
            if let Some(entry) = self.memory_cache.iter().next() {
                let key = entry.key().clone();
                drop(entry);
                self.memory_cache.remove(&key);
            }
        }

        if let Some(cache_path) = self.cache_path(file_id) {
            self.store_to_disk(&cache_path, &entry)?;
        }
        self.memory_cache.insert(file_id.to_string(), entry);

        Ok(())
    }

    /// Clear all caches
    pub fn clear(&self) -> Result<()> {
        self.memory_cache.clear();
        if let Some(cache_dir) = &self.cache_dir {
            if cache_dir.exists() {
                fs::remove_dir_all(cache_dir)?;
                fs::create_dir_all(cache_dir)?;
            }
        }
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            memory_entries: self.memory_cache.len(),
            disk_cache_size: self.get_disk_cache_size(),
        }
    }

    fn cache_path(&self, file_id: &str) -> Option<PathBuf> {
        let cache_dir = self.cache_dir.as_ref()?;

        let mut hasher = DefaultHasher::new();
        file_id.hash(&mut hasher);
        let hash = hasher.finish();

        Some(cache_dir.join(format!("cache_{:x}.bincode", hash)))
    }

    fn load_from_disk(&self, cache_path: &Path) -> Result<ParsedFileEntry> {
        let data = fs::read(cache_path)?;
        let entry: ParsedFileEntry = bincode::deserialize(&data)?;
        Ok(entry)
    }

    fn store_to_disk(&self, cache_path: &Path, entry: &ParsedFileEntry) -> Result<()> {
        let data = bincode::serialize(entry)?;
        fs::write(cache_path, data)?;
        Ok(())
    }

    fn get_disk_cache_size(&self) -> usize {
        match &self.cache_dir {
            Some(cache_dir) => fs::read_dir(cache_dir)
                .map(|entries| entries.filter_map(|e| e.ok()).count())
                .unwrap_or(0),
            None => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub memory_entries: usize,
    pub disk_cache_size: usize,
}
