//! The offline cache manager: lifecycle and request routing.
//!
//! The manager owns the bucket store and a [`Fetcher`] and mediates every
//! intercepted request. Lifecycle transitions are driven by the embedding
//! host, never by the manager itself:
//!
//! 1. `install()` populates the asset bucket from the shell manifest,
//!    all-or-nothing. A failed install leaves the manager in
//!    [`LifecycleState::Installing`] and blocks activation.
//! 2. `activate()` deletes every bucket outside the current allow-list
//!    and marks the manager active. There is no waiting phase: the new
//!    configuration applies to the very next request.
//! 3. `handle()` routes requests in the active steady state: pass-through
//!    for non-HTTP(S) schemes, network-first for the API host, cache-first
//!    for everything else.

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use crate::cache::{BucketStore, CachedEntry, ResponseSnapshot};
use crate::config::ManagerConfig;
use crate::net::{FetchError, Fetcher};
use crate::request::{OutboundRequest, RequestClass};

// ============================================================================
// Constants
// ============================================================================

/// Maximum concurrent shell asset fetches during install.
/// Bounds parallelism against the origin server; entries are still written
/// only after every fetch has succeeded.
const MAX_CONCURRENT_INSTALL_FETCHES: usize = 4;

/// Only plain 200 responses are cached on the cache-first path.
/// Redirects, partial content, and error statuses are returned live but
/// never stored.
const CACHEABLE_ASSET_STATUS: u16 = 200;

/// Lifecycle of one manager version. Transitions are triggered by the
/// host runtime, not by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Initial state; the shell cache may not be populated yet.
    Installing,
    /// Steady state; the manager intercepts and routes requests.
    Active,
}

/// Outcome of routing one intercepted request.
///
/// The cache-first path resolves to [`FetchOutcome::Degraded`] when both
/// cache and network fail, so callers and tests can tell "handler ran and
/// produced nothing" apart from "request was never intercepted"
/// ([`FetchOutcome::PassThrough`]).
#[derive(Debug)]
pub enum FetchOutcome {
    /// Live network response (also stored in a bucket when cacheable).
    Network(ResponseSnapshot),
    /// Served from a bucket: a cache-first hit, or the network-first
    /// fallback after a transport failure.
    Cached(CachedEntry),
    /// Cache-first path with a miss and a failed network call; the
    /// failure is swallowed and the caller gets no usable response.
    Degraded,
    /// Not intercepted; the request proceeds untouched.
    PassThrough,
}

impl FetchOutcome {
    /// The response snapshot carried by this outcome, if any.
    pub fn snapshot(&self) -> Option<&ResponseSnapshot> {
        match self {
            FetchOutcome::Network(snapshot) => Some(snapshot),
            FetchOutcome::Cached(entry) => Some(&entry.snapshot),
            FetchOutcome::Degraded | FetchOutcome::PassThrough => None,
        }
    }
}

/// Mediates outbound requests between a client application, the network,
/// and the durable cache buckets.
pub struct OfflineCacheManager<F: Fetcher> {
    config: ManagerConfig,
    store: BucketStore,
    fetcher: F,
    state: LifecycleState,
    shell_ready: bool,
}

impl<F: Fetcher> OfflineCacheManager<F> {
    pub fn new(config: ManagerConfig, fetcher: F) -> Result<Self, FetchError> {
        let root = config.resolve_bucket_root().map_err(FetchError::Storage)?;
        let store = BucketStore::new(root).map_err(FetchError::Storage)?;
        Ok(Self {
            config,
            store,
            fetcher,
            state: LifecycleState::Installing,
            shell_ready: false,
        })
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Populate the asset bucket from the shell manifest, all-or-nothing.
    ///
    /// Every asset is fetched first; entries are written only once every
    /// fetch succeeded with a success status. Any failure aborts the
    /// install, leaves the asset bucket without manifest entries, and
    /// keeps the manager out of the active state. Returns the number of
    /// assets cached.
    pub async fn install(&mut self) -> Result<usize, FetchError> {
        let origin = self
            .config
            .origin_url()
            .map_err(|e| FetchError::InvalidRequest(e.to_string()))?;

        let mut requests = Vec::new();
        for path in &self.config.shell_manifest {
            let url = origin
                .join(path)
                .map_err(|e| FetchError::InvalidRequest(format!("{}: {}", path, e)))?;
            requests.push(OutboundRequest::get(url));
        }

        info!(assets = requests.len(), origin = %origin, "Populating shell cache");

        let fetcher = &self.fetcher;
        let fetched: Vec<(OutboundRequest, ResponseSnapshot)> = stream::iter(requests)
            .map(|request| async move {
                match fetcher.fetch(&request).await {
                    Ok(snapshot) if snapshot.is_success() => Ok((request, snapshot)),
                    Ok(snapshot) => Err(FetchError::InstallFailed(format!(
                        "{} returned status {}",
                        request.url(),
                        snapshot.status
                    ))),
                    Err(e) => Err(FetchError::InstallFailed(format!("{}: {}", request.url(), e))),
                }
            })
            .buffer_unordered(MAX_CONCURRENT_INSTALL_FETCHES)
            .try_collect()
            .await?;

        let bucket = self
            .store
            .bucket(&self.config.asset_bucket_name())
            .map_err(FetchError::Storage)?;
        for (request, snapshot) in &fetched {
            bucket.put(request, snapshot).map_err(FetchError::Storage)?;
        }

        self.shell_ready = true;
        info!(assets = fetched.len(), bucket = %bucket.name(), "Shell cache populated");
        Ok(fetched.len())
    }

    /// Purge every bucket outside the allow-list and enter the active
    /// state. Returns the names of the buckets that were deleted.
    ///
    /// Activation requires a populated shell for this generation: either
    /// this instance's `install()` succeeded, or a previous instance left
    /// the asset bucket populated (a restart of an already-installed
    /// version).
    pub fn activate(&mut self) -> Result<Vec<String>, FetchError> {
        let ready = self.shell_ready || {
            let bucket = self
                .store
                .bucket(&self.config.asset_bucket_name())
                .map_err(FetchError::Storage)?;
            bucket.entry_count().map_err(FetchError::Storage)? > 0
        };
        if !ready {
            return Err(FetchError::InstallFailed(
                "shell cache is empty; install must succeed before activation".to_string(),
            ));
        }

        let removed = self
            .store
            .retain(&self.config.allowed_buckets())
            .map_err(FetchError::Storage)?;
        self.state = LifecycleState::Active;
        info!(purged = removed.len(), "Cache manager active");
        Ok(removed)
    }

    /// Route one intercepted request.
    ///
    /// Only an active manager intercepts; until then every request is
    /// reported as [`FetchOutcome::PassThrough`] so the host sends it to
    /// the network directly.
    pub async fn handle(&self, request: &OutboundRequest) -> Result<FetchOutcome, FetchError> {
        if self.state != LifecycleState::Active {
            debug!(url = %request.url(), "Manager not active; request not intercepted");
            return Ok(FetchOutcome::PassThrough);
        }

        match request.classify(&self.config.api_host_suffix) {
            RequestClass::Unmanaged => Ok(FetchOutcome::PassThrough),
            RequestClass::Api => self.network_first(request).await,
            RequestClass::Asset => self.cache_first(request).await,
        }
    }

    /// Network-first: the live response wins; the cached copy is served
    /// only when the transport fails, and a miss propagates the failure.
    async fn network_first(&self, request: &OutboundRequest) -> Result<FetchOutcome, FetchError> {
        match self.fetcher.fetch(request).await {
            Ok(snapshot) => {
                if snapshot.is_success() {
                    // Best-effort write; the live response is returned
                    // whether or not it succeeds.
                    if let Err(e) =
                        self.store_snapshot(&self.config.api_bucket_name(), request, &snapshot)
                    {
                        warn!(url = %request.url(), error = %e, "Failed to store API response");
                    }
                }
                Ok(FetchOutcome::Network(snapshot))
            }
            Err(err) => match self.lookup(&self.config.api_bucket_name(), request) {
                Some(entry) => {
                    debug!(url = %request.url(), "Network failed; serving cached API response");
                    Ok(FetchOutcome::Cached(entry))
                }
                None => Err(err),
            },
        }
    }

    /// Cache-first: a stored entry is served with no network round-trip
    /// and no freshness check; the network is consulted only on a miss,
    /// and a network failure on a miss is swallowed.
    async fn cache_first(&self, request: &OutboundRequest) -> Result<FetchOutcome, FetchError> {
        // A hit in any managed bucket wins; the asset bucket is checked first.
        for name in self.config.allowed_buckets() {
            if let Some(entry) = self.lookup(&name, request) {
                return Ok(FetchOutcome::Cached(entry));
            }
        }

        match self.fetcher.fetch(request).await {
            Ok(snapshot) => {
                if snapshot.status == CACHEABLE_ASSET_STATUS {
                    if let Err(e) =
                        self.store_snapshot(&self.config.asset_bucket_name(), request, &snapshot)
                    {
                        warn!(url = %request.url(), error = %e, "Failed to store asset response");
                    }
                }
                Ok(FetchOutcome::Network(snapshot))
            }
            Err(err) => {
                warn!(url = %request.url(), error = %err, "Asset fetch failed with no cached copy");
                Ok(FetchOutcome::Degraded)
            }
        }
    }

    fn store_snapshot(
        &self,
        bucket_name: &str,
        request: &OutboundRequest,
        snapshot: &ResponseSnapshot,
    ) -> anyhow::Result<()> {
        let bucket = self.store.bucket(bucket_name)?;
        bucket.put(request, snapshot)
    }

    /// Tolerant lookup: storage errors are logged and read as a miss.
    fn lookup(&self, bucket_name: &str, request: &OutboundRequest) -> Option<CachedEntry> {
        let bucket = match self.store.bucket(bucket_name) {
            Ok(bucket) => bucket,
            Err(e) => {
                debug!(bucket = bucket_name, error = %e, "Failed to open bucket; treating as miss");
                return None;
            }
        };
        match bucket.lookup(request) {
            Ok(found) => found,
            Err(e) => {
                debug!(bucket = bucket_name, error = %e, "Failed to read cache entry; treating as miss");
                None
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::future::Future;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const ORIGIN: &str = "https://app.example.com";
    const API_URL: &str = "https://abc.supabase.co/rest/v1/leads";

    /// Programmable fetcher double with an offline switch and a network
    /// call counter. Unknown URLs behave like an unreachable host.
    struct MockFetcher {
        responses: Mutex<HashMap<String, ResponseSnapshot>>,
        offline: AtomicBool,
        calls: AtomicUsize,
    }

    impl MockFetcher {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(HashMap::new()),
                offline: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
            })
        }

        fn respond(&self, url: &str, status: u16, body: &[u8]) {
            self.responses.lock().unwrap().insert(
                url.to_string(),
                ResponseSnapshot::new(status, vec![], body.to_vec()),
            );
        }

        fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn outcome_for(&self, request: &OutboundRequest) -> Result<ResponseSnapshot, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.offline.load(Ordering::SeqCst) {
                return Err(FetchError::Network("connection refused".to_string()));
            }
            self.responses
                .lock()
                .unwrap()
                .get(request.url().as_str())
                .cloned()
                .ok_or_else(|| FetchError::Network(format!("no route to {}", request.url())))
        }
    }

    impl Fetcher for Arc<MockFetcher> {
        fn fetch(
            &self,
            request: &OutboundRequest,
        ) -> impl Future<Output = Result<ResponseSnapshot, FetchError>> + Send {
            let outcome = self.outcome_for(request);
            async move { outcome }
        }
    }

    fn test_config(root: &Path) -> ManagerConfig {
        ManagerConfig {
            origin: ORIGIN.to_string(),
            shell_manifest: vec![
                "/".to_string(),
                "/index.html".to_string(),
                "/favicon.ico".to_string(),
            ],
            bucket_root: Some(root.to_path_buf()),
            ..ManagerConfig::default()
        }
    }

    fn respond_shell(mock: &MockFetcher) {
        mock.respond("https://app.example.com/", 200, b"<html>root</html>");
        mock.respond("https://app.example.com/index.html", 200, b"<html>index</html>");
        mock.respond("https://app.example.com/favicon.ico", 200, b"icon");
    }

    async fn active_manager(
        root: &Path,
    ) -> (OfflineCacheManager<Arc<MockFetcher>>, Arc<MockFetcher>) {
        let mock = MockFetcher::new();
        respond_shell(&mock);
        let mut manager = OfflineCacheManager::new(test_config(root), Arc::clone(&mock)).unwrap();
        manager.install().await.unwrap();
        manager.activate().unwrap();
        (manager, mock)
    }

    fn request(url: &str) -> OutboundRequest {
        OutboundRequest::parse("GET", url).unwrap()
    }

    #[tokio::test]
    async fn test_installed_shell_serves_cache_first_without_network() {
        let tmp = tempfile::tempdir().unwrap();
        let (manager, mock) = active_manager(tmp.path()).await;
        let calls_after_install = mock.calls();

        for path in ["/", "/index.html", "/favicon.ico"] {
            let req = request(&format!("{}{}", ORIGIN, path));
            match manager.handle(&req).await.unwrap() {
                FetchOutcome::Cached(entry) => assert_eq!(entry.snapshot.status, 200),
                other => panic!("expected cached shell asset, got {:?}", other),
            }
        }
        assert_eq!(mock.calls(), calls_after_install);
    }

    #[tokio::test]
    async fn test_install_is_all_or_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mock = MockFetcher::new();
        // Two of three shell assets reachable
        mock.respond("https://app.example.com/", 200, b"root");
        mock.respond("https://app.example.com/index.html", 200, b"index");

        let config = test_config(tmp.path());
        let asset_bucket = config.asset_bucket_name();
        let mut manager = OfflineCacheManager::new(config, Arc::clone(&mock)).unwrap();

        let err = manager.install().await.unwrap_err();
        assert!(matches!(err, FetchError::InstallFailed(_)));
        assert_eq!(manager.state(), LifecycleState::Installing);
        assert!(manager.activate().is_err());

        let store = BucketStore::new(tmp.path().to_path_buf()).unwrap();
        assert_eq!(store.bucket(&asset_bucket).unwrap().entry_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_install_rejects_error_status_assets() {
        let tmp = tempfile::tempdir().unwrap();
        let mock = MockFetcher::new();
        respond_shell(&mock);
        mock.respond("https://app.example.com/favicon.ico", 404, b"not found");

        let mut manager =
            OfflineCacheManager::new(test_config(tmp.path()), Arc::clone(&mock)).unwrap();
        let err = manager.install().await.unwrap_err();
        assert!(matches!(err, FetchError::InstallFailed(_)));
        assert_eq!(manager.state(), LifecycleState::Installing);
    }

    #[tokio::test]
    async fn test_network_first_returns_live_response_and_stores_it() {
        let tmp = tempfile::tempdir().unwrap();
        let (manager, mock) = active_manager(tmp.path()).await;
        mock.respond(API_URL, 200, b"[{\"lead\":1}]");

        let req = request(API_URL);
        match manager.handle(&req).await.unwrap() {
            FetchOutcome::Network(snapshot) => assert_eq!(snapshot.body, b"[{\"lead\":1}]"),
            other => panic!("expected live response, got {:?}", other),
        }

        let store = BucketStore::new(tmp.path().to_path_buf()).unwrap();
        let bucket = store.bucket(&manager.config().api_bucket_name()).unwrap();
        let entry = bucket.lookup(&req).unwrap().expect("API response stored");
        assert_eq!(entry.snapshot.body, b"[{\"lead\":1}]");
    }

    #[tokio::test]
    async fn test_network_first_falls_back_to_cache_when_offline() {
        let tmp = tempfile::tempdir().unwrap();
        let (manager, mock) = active_manager(tmp.path()).await;
        mock.respond(API_URL, 200, b"fresh data");

        let req = request(API_URL);
        manager.handle(&req).await.unwrap();

        mock.set_offline(true);
        match manager.handle(&req).await.unwrap() {
            FetchOutcome::Cached(entry) => assert_eq!(entry.snapshot.body, b"fresh data"),
            other => panic!("expected cached fallback, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_network_first_failure_without_cache_propagates() {
        let tmp = tempfile::tempdir().unwrap();
        let (manager, mock) = active_manager(tmp.path()).await;
        mock.set_offline(true);

        let err = manager.handle(&request(API_URL)).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }

    #[tokio::test]
    async fn test_network_first_prefers_live_over_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let (manager, mock) = active_manager(tmp.path()).await;
        let req = request(API_URL);

        mock.respond(API_URL, 200, b"old");
        manager.handle(&req).await.unwrap();

        mock.respond(API_URL, 200, b"new");
        match manager.handle(&req).await.unwrap() {
            FetchOutcome::Network(snapshot) => assert_eq!(snapshot.body, b"new"),
            other => panic!("expected live response, got {:?}", other),
        }

        // The entry was overwritten in place: one entry, the fresh body
        let store = BucketStore::new(tmp.path().to_path_buf()).unwrap();
        let bucket = store.bucket(&manager.config().api_bucket_name()).unwrap();
        assert_eq!(bucket.entry_count().unwrap(), 1);
        assert_eq!(bucket.lookup(&req).unwrap().unwrap().snapshot.body, b"new");
    }

    #[tokio::test]
    async fn test_non_success_api_response_is_returned_live_but_not_cached() {
        let tmp = tempfile::tempdir().unwrap();
        let (manager, mock) = active_manager(tmp.path()).await;
        mock.respond(API_URL, 500, b"server error");

        let req = request(API_URL);
        match manager.handle(&req).await.unwrap() {
            FetchOutcome::Network(snapshot) => assert_eq!(snapshot.status, 500),
            other => panic!("expected live response, got {:?}", other),
        }

        let store = BucketStore::new(tmp.path().to_path_buf()).unwrap();
        let bucket = store.bucket(&manager.config().api_bucket_name()).unwrap();
        assert!(bucket.lookup(&req).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cache_first_miss_fetches_and_stores() {
        let tmp = tempfile::tempdir().unwrap();
        let (manager, mock) = active_manager(tmp.path()).await;
        let url = "https://cdn.example.net/logo.png";
        mock.respond(url, 200, b"png bytes");

        let req = request(url);
        match manager.handle(&req).await.unwrap() {
            FetchOutcome::Network(snapshot) => assert_eq!(snapshot.body, b"png bytes"),
            other => panic!("expected live response, got {:?}", other),
        }

        // Second request is served from cache even offline
        mock.set_offline(true);
        match manager.handle(&req).await.unwrap() {
            FetchOutcome::Cached(entry) => assert_eq!(entry.snapshot.body, b"png bytes"),
            other => panic!("expected cached asset, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cache_first_non_200_is_returned_live_but_not_cached() {
        let tmp = tempfile::tempdir().unwrap();
        let (manager, mock) = active_manager(tmp.path()).await;
        let url = "https://cdn.example.net/missing.png";
        mock.respond(url, 404, b"not found");

        let req = request(url);
        match manager.handle(&req).await.unwrap() {
            FetchOutcome::Network(snapshot) => assert_eq!(snapshot.status, 404),
            other => panic!("expected live response, got {:?}", other),
        }

        // Nothing was stored, so going offline degrades
        mock.set_offline(true);
        assert!(matches!(
            manager.handle(&req).await.unwrap(),
            FetchOutcome::Degraded
        ));
    }

    #[tokio::test]
    async fn test_cache_first_miss_offline_degrades_without_error() {
        let tmp = tempfile::tempdir().unwrap();
        let (manager, mock) = active_manager(tmp.path()).await;
        mock.set_offline(true);

        let outcome = manager
            .handle(&request("https://cdn.example.net/never-seen.js"))
            .await
            .unwrap();
        assert!(matches!(outcome, FetchOutcome::Degraded));
    }

    #[tokio::test]
    async fn test_cache_first_hits_in_any_managed_bucket() {
        let tmp = tempfile::tempdir().unwrap();
        let (manager, mock) = active_manager(tmp.path()).await;

        // Plant an asset-classified entry in the API bucket directly
        let url = "https://cdn.example.net/planted.css";
        let req = request(url);
        let store = BucketStore::new(tmp.path().to_path_buf()).unwrap();
        store
            .bucket(&manager.config().api_bucket_name())
            .unwrap()
            .put(&req, &ResponseSnapshot::new(200, vec![], b"planted".to_vec()))
            .unwrap();

        let calls_before = mock.calls();
        match manager.handle(&req).await.unwrap() {
            FetchOutcome::Cached(entry) => assert_eq!(entry.snapshot.body, b"planted"),
            other => panic!("expected cached entry, got {:?}", other),
        }
        assert_eq!(mock.calls(), calls_before);
    }

    #[tokio::test]
    async fn test_unmanaged_scheme_passes_through() {
        let tmp = tempfile::tempdir().unwrap();
        let (manager, mock) = active_manager(tmp.path()).await;
        let calls_before = mock.calls();

        let req = OutboundRequest::parse("GET", "chrome-extension://abcdef/popup.html").unwrap();
        assert!(matches!(
            manager.handle(&req).await.unwrap(),
            FetchOutcome::PassThrough
        ));
        assert_eq!(mock.calls(), calls_before);
    }

    #[tokio::test]
    async fn test_handle_before_activation_is_not_intercepted() {
        let tmp = tempfile::tempdir().unwrap();
        let mock = MockFetcher::new();
        respond_shell(&mock);
        let mut manager =
            OfflineCacheManager::new(test_config(tmp.path()), Arc::clone(&mock)).unwrap();
        manager.install().await.unwrap();

        let outcome = manager
            .handle(&request("https://cdn.example.net/app.js"))
            .await
            .unwrap();
        assert!(matches!(outcome, FetchOutcome::PassThrough));
    }

    #[tokio::test]
    async fn test_activate_purges_buckets_outside_allow_list() {
        let tmp = tempfile::tempdir().unwrap();
        let mock = MockFetcher::new();
        respond_shell(&mock);

        // A previous generation left buckets behind
        let store = BucketStore::new(tmp.path().to_path_buf()).unwrap();
        store.bucket("shellcache-cache-v0").unwrap();
        store.bucket("shellcache-api-cache-v0").unwrap();

        let mut manager =
            OfflineCacheManager::new(test_config(tmp.path()), Arc::clone(&mock)).unwrap();
        manager.install().await.unwrap();
        let removed = manager.activate().unwrap();

        assert_eq!(
            removed,
            vec![
                "shellcache-api-cache-v0".to_string(),
                "shellcache-cache-v0".to_string()
            ]
        );
        // The API bucket is created lazily on first store, so only the
        // freshly populated asset bucket remains on disk.
        assert_eq!(
            store.bucket_names().unwrap(),
            vec![manager.config().asset_bucket_name()]
        );
        assert_eq!(manager.state(), LifecycleState::Active);
    }

    #[tokio::test]
    async fn test_activate_requires_a_populated_shell() {
        let tmp = tempfile::tempdir().unwrap();
        let mock = MockFetcher::new();
        let mut manager =
            OfflineCacheManager::new(test_config(tmp.path()), Arc::clone(&mock)).unwrap();

        let err = manager.activate().unwrap_err();
        assert!(matches!(err, FetchError::InstallFailed(_)));
        assert_eq!(manager.state(), LifecycleState::Installing);
    }

    #[tokio::test]
    async fn test_activate_accepts_a_shell_from_a_previous_instance() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let (_, _) = active_manager(tmp.path()).await;
        }

        // Same generation, fresh instance, offline: activation still works
        let mock = MockFetcher::new();
        mock.set_offline(true);
        let mut manager =
            OfflineCacheManager::new(test_config(tmp.path()), Arc::clone(&mock)).unwrap();
        manager.activate().unwrap();
        assert_eq!(manager.state(), LifecycleState::Active);

        // And the shell is still served from cache
        let outcome = manager
            .handle(&request("https://app.example.com/index.html"))
            .await
            .unwrap();
        assert!(matches!(outcome, FetchOutcome::Cached(_)));
    }
}
