//! Suggestion fetcher backed by a chat-completion endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{FetchError, FetchResult, SuggestionFetcher};
use crate::config::SuggestionConfig;
use crate::error::Result;
use crate::suggestion::parse_suggestion;
use crate::types::Suggestion;

/// Client for an OpenAI-style `chat/completions` endpoint
#[derive(Clone)]
pub struct ChatSuggestionClient {
    client: reqwest::Client,
    config: SuggestionConfig,
}

impl ChatSuggestionClient {
    /// Create a client with a default HTTP transport
    pub fn new(config: SuggestionConfig) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client sharing an existing HTTP transport
    pub fn with_client(client: reqwest::Client, config: SuggestionConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &SuggestionConfig {
        &self.config
    }

    fn request_body<'a>(&'a self, item_name: &str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.config.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: self.config.user_message(item_name),
                },
            ],
        }
    }
}

#[async_trait]
impl SuggestionFetcher for ChatSuggestionClient {
    async fn fetch_suggestion(
        &self,
        item_name: &str,
        credential: &str,
    ) -> FetchResult<Option<Suggestion>> {
        debug!("Suggestion request: POST {} for {:?}", self.config.endpoint, item_name);

        let resp = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(credential)
            .json(&self.request_body(item_name))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let body = resp.bytes().await?;
        let parsed: ChatCompletionResponse = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Malformed suggestion payload for {:?}: {}", item_name, e);
                return Ok(None);
            }
        };

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content);

        match content {
            Some(text) => Ok(parse_suggestion(&text)),
            None => {
                debug!("No completion content for {:?}", item_name);
                Ok(None)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request/Response Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ChatSuggestionClient {
        let config = SuggestionConfig {
            endpoint: format!("{}/v1/chat/completions", server.uri()),
            ..SuggestionConfig::default()
        };
        ChatSuggestionClient::new(config).expect("client")
    }

    #[tokio::test]
    async fn test_parses_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({ "model": "gpt-4o-mini" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "Oat milk\n\nBecause it has less sugar." } },
                    { "message": { "role": "assistant", "content": "Ignored" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let suggestion = client_for(&server)
            .fetch_suggestion("Whole milk", "sk-test")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(suggestion.alternative, "Oat milk");
        assert_eq!(suggestion.reason, "Because it has less sugar.");
    }

    #[test]
    fn test_request_body_shape() {
        let client = ChatSuggestionClient::new(SuggestionConfig::default()).unwrap();
        let body = serde_json::to_value(client.request_body("Whole milk")).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["messages"][0]["role"], "system");
        assert!(body["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains("nutrition expert"));
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(
            body["messages"][1]["content"],
            "Suggest a healthier alternative to: Whole milk"
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_suggestion("Chips", "sk-wrong")
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Http(401));
    }

    #[tokio::test]
    async fn test_missing_content_is_empty_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [ { "message": { "role": "assistant", "content": null } } ]
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_suggestion("Chips", "sk").await;
        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn test_no_choices_is_empty_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "x" })))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_suggestion("Chips", "sk").await;
        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn test_blank_content_is_empty_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [ { "message": { "content": "\n\n  \n" } } ]
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_suggestion("Chips", "sk").await;
        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn test_non_json_body_is_empty_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_suggestion("Chips", "sk").await;
        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let config = SuggestionConfig {
            endpoint: "http://127.0.0.1:1/v1/chat/completions".into(),
            ..SuggestionConfig::default()
        };
        let client = ChatSuggestionClient::new(config).unwrap();

        let err = client.fetch_suggestion("Chips", "sk").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
