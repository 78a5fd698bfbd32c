//! A single named cache bucket.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::cache::entry::{CachedEntry, ResponseSnapshot};
use crate::request::OutboundRequest;

/// One named durable bucket: a directory of JSON entry files, one per
/// normalized request key. Writes overwrite in place, so a key holds at
/// most one entry.
pub struct Bucket {
    name: String,
    dir: PathBuf,
}

impl Bucket {
    /// Open the bucket under `root`, creating its directory lazily.
    pub(crate) fn open(root: &Path, name: &str) -> Result<Self> {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create bucket directory: {}", dir.display()))?;
        Ok(Self {
            name: name.to_string(),
            dir,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn entry_path(&self, request: &OutboundRequest) -> PathBuf {
        self.dir.join(format!("{}.json", request.key_digest()))
    }

    /// Insert or overwrite the entry for `request`.
    pub fn put(&self, request: &OutboundRequest, snapshot: &ResponseSnapshot) -> Result<()> {
        let entry = CachedEntry::new(request.cache_key(), snapshot.clone());
        let path = self.entry_path(request);
        let contents = serde_json::to_string_pretty(&entry)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write cache entry: {}", path.display()))?;
        debug!(bucket = %self.name, key = %entry.key, "Stored cache entry");
        Ok(())
    }

    /// Return the stored entry for `request`, if any.
    pub fn lookup(&self, request: &OutboundRequest) -> Result<Option<CachedEntry>> {
        let path = self.entry_path(request);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache entry: {}", path.display()))?;
        let entry: CachedEntry = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache entry: {}", path.display()))?;
        Ok(Some(entry))
    }

    /// Number of entries currently stored.
    pub fn entry_count(&self) -> Result<usize> {
        Ok(self.entry_files()?.len())
    }

    /// Load every entry in the bucket.
    pub fn entries(&self) -> Result<Vec<CachedEntry>> {
        let mut entries = Vec::new();
        for path in self.entry_files()? {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read cache entry: {}", path.display()))?;
            let entry: CachedEntry = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse cache entry: {}", path.display()))?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Humanized age of the most recent entry, for status display.
    /// Read errors are logged and reported as no age.
    pub fn newest_age(&self) -> Option<String> {
        match self.entries() {
            Ok(entries) => entries
                .into_iter()
                .max_by_key(|e| e.cached_at)
                .map(|e| e.age_display()),
            Err(e) => {
                debug!(bucket = %self.name, error = %e, "Failed to load entries for age display");
                None
            }
        }
    }

    fn entry_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let dir = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read bucket directory: {}", self.dir.display()))?;
        for item in dir {
            let path = item?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

// ============================================================================
// Tests
// ============================================================================
