//! Manager configuration.
//!
//! One configuration drives the whole cache manager: bucket naming, the
//! shell asset manifest, and the API host rule. Bumping [`ManagerConfig::generation`]
//! renames both buckets, which is how a new manager version invalidates
//! its predecessor's buckets through the activate purge.
//!
//! When used from the CLI the configuration is stored at
//! `~/.config/shellcache/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "shellcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Current cache generation.
const CACHE_GENERATION: u32 = 1;

/// Host suffix identifying the remote API backend.
const API_HOST_SUFFIX: &str = "supabase.co";

/// Origin the shell asset paths resolve against at install time.
const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// Shell asset paths cached at install time: the minimal set needed to
/// boot the application offline.
const SHELL_MANIFEST: &[&str] = &[
    "/",
    "/index.html",
    "/site.webmanifest",
    "/favicon.ico",
    "/apple-touch-icon.png",
    "/android-chrome-192x192.png",
    "/android-chrome-512x512.png",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Name prefix for both bucket names.
    pub app_slug: String,
    /// Version tag embedded in bucket names.
    pub generation: u32,
    /// Base URL for shell asset installation.
    pub origin: String,
    /// Fixed enumerated list of shell asset paths.
    pub shell_manifest: Vec<String>,
    /// Host suffix routed network-first.
    pub api_host_suffix: String,
    /// Bucket storage root. `None` resolves to the platform cache directory.
    pub bucket_root: Option<PathBuf>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            app_slug: APP_NAME.to_string(),
            generation: CACHE_GENERATION,
            origin: DEFAULT_ORIGIN.to_string(),
            shell_manifest: SHELL_MANIFEST.iter().map(|s| s.to_string()).collect(),
            api_host_suffix: API_HOST_SUFFIX.to_string(),
            bucket_root: None,
        }
    }
}

impl ManagerConfig {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Bucket holding shell assets for this generation.
    pub fn asset_bucket_name(&self) -> String {
        format!("{}-cache-v{}", self.app_slug, self.generation)
    }

    /// Bucket holding API responses for this generation.
    pub fn api_bucket_name(&self) -> String {
        format!("{}-api-cache-v{}", self.app_slug, self.generation)
    }

    /// The allow-list: the only bucket names that survive an activate.
    pub fn allowed_buckets(&self) -> [String; 2] {
        [self.asset_bucket_name(), self.api_bucket_name()]
    }

    pub fn origin_url(&self) -> Result<Url> {
        Url::parse(&self.origin)
            .map_err(|e| anyhow::anyhow!("Invalid origin {}: {}", self.origin, e))
    }

    /// Where bucket directories live.
    pub fn resolve_bucket_root(&self) -> Result<PathBuf> {
        if let Some(ref root) = self.bucket_root {
            return Ok(root.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(&self.app_slug))
    }
}

// ============================================================================
// Tests
// ============================================================================
