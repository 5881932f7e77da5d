//! Enrichment fetchers.
//!
//! Each fetcher wraps exactly one request to one external service. They are
//! single-shot: no retry, no backoff and no timeout beyond the transport's
//! own. A payload that does not have the expected shape is an empty outcome
//! (`Ok(None)`), never an error; only a failed exchange is an error.
//!
//! The coordinator talks to the traits, so tests and alternative services
//! can stand in for the HTTP implementations.

#[cfg(feature = "client")]
mod chat;
#[cfg(feature = "client")]
mod images;

#[cfg(feature = "client")]
pub use chat::ChatSuggestionClient;
#[cfg(feature = "client")]
pub use images::ImageSearchClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{ImageRef, Suggestion};

/// Result type alias for fetchers
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// A failed exchange with an external service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("service returned HTTP {0}")]
    Http(u16),

    #[error("request failed: {0}")]
    Transport(String),
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FetchError::Http(status.as_u16()),
            None => FetchError::Transport(e.to_string()),
        }
    }
}

/// Source of "better alternative" suggestions.
#[async_trait]
pub trait SuggestionFetcher: Send + Sync {
    /// Fetch a suggestion for `item_name`. The caller has already checked that
    /// a credential exists and passes it in.
    async fn fetch_suggestion(&self, item_name: &str, credential: &str)
        -> FetchResult<Option<Suggestion>>;
}

/// Source of representative images.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch an image reference for `item_name` using `credential`.
    async fn fetch_image(&self, item_name: &str, credential: &str) -> FetchResult<Option<ImageRef>>;
}
