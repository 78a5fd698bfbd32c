use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure: the request produced no response at all
    /// (connection refused, DNS failure, aborted transfer).
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Shell install failed: {0}")]
    InstallFailed(String),

    #[error("Storage error: {0}")]
    Storage(anyhow::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}
