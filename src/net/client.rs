//! Network fetcher seam and the reqwest-backed client.
//!
//! The manager is generic over [`Fetcher`] so routing and lifecycle logic
//! can be exercised against a programmable double instead of a live
//! network. [`NetClient`] is the production implementation.

use std::future::Future;

use reqwest::{Client, Method};

use crate::cache::ResponseSnapshot;
use crate::request::OutboundRequest;

use super::FetchError;

/// Abstraction over the transport.
pub trait Fetcher: Send + Sync {
    /// Issue a single network request.
    ///
    /// A response that arrived is `Ok` whatever its status; `Err` means a
    /// transport-level failure. No retries: every attempt is single-shot.
    fn fetch(
        &self,
        request: &OutboundRequest,
    ) -> impl Future<Output = Result<ResponseSnapshot, FetchError>> + Send;
}

/// reqwest-backed fetcher.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct NetClient {
    client: Client,
}

impl NetClient {
    /// Create a new network client.
    ///
    /// No request timeout is configured: the caching contract relies on
    /// transport-level failure only, and a hung request blocks nothing but
    /// the one handler awaiting it.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }
}

impl Fetcher for NetClient {
    fn fetch(
        &self,
        request: &OutboundRequest,
    ) -> impl Future<Output = Result<ResponseSnapshot, FetchError>> + Send {
        async move {
            let method = Method::from_bytes(request.method().as_bytes())
                .map_err(|_| FetchError::InvalidRequest(request.method().to_string()))?;

            let mut builder = self.client.request(method, request.url().clone());
            for (name, value) in request.headers() {
                builder = builder.header(name.as_str(), value.as_str());
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response.bytes().await?.to_vec();

            Ok(ResponseSnapshot::new(status, headers, body))
        }
    }
}
