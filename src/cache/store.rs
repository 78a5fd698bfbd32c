//! Bucket store: creation, enumeration, and purge.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::cache::bucket::Bucket;

/// Manages named buckets under one root directory. Bucket directories are
/// created lazily on first open; deleting a bucket removes every entry in
/// it.
pub struct BucketStore {
    root: PathBuf,
}

impl BucketStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create bucket root: {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open a bucket by name, creating it if needed.
    pub fn bucket(&self, name: &str) -> Result<Bucket> {
        Bucket::open(&self.root, name)
    }

    /// Names of the buckets currently on disk, sorted.
    pub fn bucket_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let dir = std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read bucket root: {}", self.root.display()))?;
        for item in dir {
            let item = item?;
            if item.path().is_dir() {
                names.push(item.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Delete a bucket and all its entries. Returns whether it existed.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let dir = self.root.join(name);
        if !dir.exists() {
            return Ok(false);
        }
        std::fs::remove_dir_all(&dir)
            .with_context(|| format!("Failed to delete bucket: {}", dir.display()))?;
        Ok(true)
    }

    /// Delete every bucket whose name is not in `allow`.
    /// Returns the names that were removed.
    pub fn retain(&self, allow: &[String]) -> Result<Vec<String>> {
        let mut removed = Vec::new();
        for name in self.bucket_names()? {
            if !allow.contains(&name) {
                debug!(bucket = %name, "Deleting bucket not in allow-list");
                self.delete(&name)?;
                removed.push(name);
            }
        }
        Ok(removed)
    }
}

// ============================================================================
// Tests
// ============================================================================
