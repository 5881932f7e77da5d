//! Image fetcher backed by a stock photo search endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::{FetchError, FetchResult, ImageFetcher};
use crate::config::ImageConfig;
use crate::error::Result;
use crate::types::ImageRef;

/// Client for a Pexels-style `search` endpoint
#[derive(Clone)]
pub struct ImageSearchClient {
    client: reqwest::Client,
    config: ImageConfig,
}

impl ImageSearchClient {
    /// Create a client with a default HTTP transport
    pub fn new(config: ImageConfig) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client sharing an existing HTTP transport
    pub fn with_client(client: reqwest::Client, config: ImageConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }
}

#[async_trait]
impl ImageFetcher for ImageSearchClient {
    async fn fetch_image(&self, item_name: &str, credential: &str) -> FetchResult<Option<ImageRef>> {
        let query = self.config.query(item_name);
        debug!("Image request: GET {} query={:?}", self.config.endpoint, query);

        // The key goes in the header as-is; this service does not use a Bearer prefix.
        let resp = self
            .client
            .get(&self.config.endpoint)
            .header(reqwest::header::AUTHORIZATION, credential)
            .query(&[("query", query.as_str()), ("per_page", "1")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let body = resp.bytes().await?;
        let parsed: SearchResponse = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Malformed image payload for {:?}: {}", item_name, e);
                return Ok(None);
            }
        };

        let field = self.config.size.field();
        let image = parsed
            .photos
            .into_iter()
            .next()
            .and_then(|photo| photo.src.get(field).and_then(|v| v.as_str()).map(ImageRef::new));

        if image.is_none() {
            debug!("No image result for {:?}", item_name);
        }
        Ok(image)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    #[serde(default)]
    src: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageSize;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, size: ImageSize) -> ImageSearchClient {
        let config = ImageConfig {
            endpoint: format!("{}/v1/search", server.uri()),
            size,
            ..ImageConfig::default()
        };
        ImageSearchClient::new(config).expect("client")
    }

    fn photo_body() -> serde_json::Value {
        json!({
            "page": 1,
            "per_page": 1,
            "photos": [{
                "id": 42,
                "src": {
                    "original": "https://images.example/42.jpeg",
                    "medium": "https://images.example/42-medium.jpeg",
                    "small": "https://images.example/42-small.jpeg",
                    "tiny": "https://images.example/42-tiny.jpeg"
                }
            }]
        })
    }

    #[tokio::test]
    async fn test_returns_first_photo_at_configured_size() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(header("authorization", "px-key"))
            .and(query_param("query", "Whole milk food"))
            .and(query_param("per_page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(photo_body()))
            .expect(1)
            .mount(&server)
            .await;

        let image = client_for(&server, ImageSize::Medium)
            .fetch_image("Whole milk", "px-key")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(image.as_str(), "https://images.example/42-medium.jpeg");
    }

    #[tokio::test]
    async fn test_size_selects_rendition() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(photo_body()))
            .mount(&server)
            .await;

        let image = client_for(&server, ImageSize::Tiny)
            .fetch_image("Kale", "px")
            .await
            .unwrap();
        assert_eq!(image, Some(ImageRef::new("https://images.example/42-tiny.jpeg")));

        // Not offered by this result
        let image = client_for(&server, ImageSize::Large)
            .fetch_image("Kale", "px")
            .await
            .unwrap();
        assert_eq!(image, None);
    }

    #[tokio::test]
    async fn test_no_results_is_empty_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "photos": [] })))
            .mount(&server)
            .await;

        let result = client_for(&server, ImageSize::Medium)
            .fetch_image("Unobtainium", "px")
            .await;
        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client_for(&server, ImageSize::Medium)
            .fetch_image("Kale", "px")
            .await;
        assert_eq!(result, Err(FetchError::Http(500)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_empty_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "photos": "nope" })))
            .mount(&server)
            .await;

        let result = client_for(&server, ImageSize::Medium)
            .fetch_image("Kale", "px")
            .await;
        assert_eq!(result, Ok(None));
    }
}
