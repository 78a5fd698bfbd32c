//! shellcache - an offline HTTP cache manager.
//!
//! This crate mediates outbound HTTP(S) requests for a client application
//! so the application keeps functioning (degraded) without network
//! connectivity, and keeps previously fetched assets fresh when the
//! network is available.
//!
//! Responses are kept in two named durable buckets on disk: one for the
//! application shell (static assets precached at install time) and one for
//! remote API responses. Requests are routed by destination:
//!
//! - Requests to the configured API host suffix are **network-first**: the
//!   live response wins, and the cached copy is served only when the
//!   network fails.
//! - Everything else is **cache-first**: a stored entry is served without
//!   a network round-trip, and the network is consulted only on a miss.
//!
//! The [`manager::OfflineCacheManager`] carries an explicit lifecycle
//! (install, activate, steady state) so version transitions and the
//! bucket allow-list purge are driven and observed by the embedding host.

pub mod cache;
pub mod config;
pub mod manager;
pub mod net;
pub mod request;

pub use cache::{Bucket, BucketStore, CachedEntry, ResponseSnapshot};
pub use config::ManagerConfig;
pub use manager::{FetchOutcome, LifecycleState, OfflineCacheManager};
pub use net::{FetchError, Fetcher, NetClient};
pub use request::{OutboundRequest, RequestClass};
