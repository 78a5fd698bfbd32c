//! Outbound request model, classification, and cache keys.
//!
//! Every intercepted request is normalized into an [`OutboundRequest`]
//! before routing: the method is uppercased and the URL fragment is
//! dropped (fragments are never sent on the wire, so two URLs differing
//! only by fragment are the same cache entry).

use anyhow::{Context, Result};
use reqwest::Url;
use sha2::{Digest, Sha256};

/// How a request is routed, derived from its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Destination host matches the remote API backend suffix; network-first.
    Api,
    /// Any other HTTP(S) request; cache-first.
    Asset,
    /// Non-HTTP(S) scheme; passed through untouched.
    Unmanaged,
}

/// An outbound HTTP request intercepted by the manager.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    method: String,
    url: Url,
    headers: Vec<(String, String)>,
}

impl OutboundRequest {
    /// Build a request from a method and an already-parsed URL.
    pub fn new(method: &str, mut url: Url) -> Self {
        url.set_fragment(None);
        Self {
            method: method.to_ascii_uppercase(),
            url,
            headers: Vec::new(),
        }
    }

    /// Shorthand for the common GET case.
    pub fn get(url: Url) -> Self {
        Self::new("GET", url)
    }

    /// Parse `url` and build a request.
    pub fn parse(method: &str, url: &str) -> Result<Self> {
        let url = Url::parse(url).with_context(|| format!("Invalid request URL: {}", url))?;
        Ok(Self::new(method, url))
    }

    /// Attach a request header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Normalized cache key: method plus the fragment-less URL.
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    /// Hex digest of the cache key, used as a filesystem-safe entry name.
    pub fn key_digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.cache_key().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Classify this request against the configured API host suffix.
    pub fn classify(&self, api_host_suffix: &str) -> RequestClass {
        let scheme = self.url.scheme();
        if scheme != "http" && scheme != "https" {
            return RequestClass::Unmanaged;
        }
        match self.url.host_str() {
            Some(host) if host_matches_suffix(host, api_host_suffix) => RequestClass::Api,
            _ => RequestClass::Asset,
        }
    }
}

/// Suffix match on a label boundary: `suffix` itself or `*.suffix`.
/// A plain substring or `ends_with` check would also match unrelated hosts
/// that merely embed the suffix at the end of a longer label.
fn host_matches_suffix(host: &str, suffix: &str) -> bool {
    if suffix.is_empty() {
        return false;
    }
    let host = host.to_ascii_lowercase();
    let suffix = suffix.to_ascii_lowercase();
    host == suffix
        || host
            .strip_suffix(&suffix)
            .is_some_and(|rest| rest.ends_with('.'))
}

// ============================================================================
// Tests
// ============================================================================
