//! Wiring of the core components for one CLI invocation.

use anyhow::{Context, Result};
use std::sync::Arc;

use larder_core::{
    ChatSuggestionClient, CredentialGate, EnrichmentCoordinator, FileCredentialStore, Frontend,
    ImageSearchClient, ItemStore, LarderConfig,
};

pub struct App {
    pub coordinator: Arc<EnrichmentCoordinator>,
}

impl App {
    /// Build the store, fetchers and coordinator, reporting to `frontend`.
    pub fn build(config: &LarderConfig, frontend: Arc<dyn Frontend>) -> Result<Self> {
        let credentials = Arc::new(open_credentials(config)?);

        let http = http_client()?;

        let suggestions = Arc::new(ChatSuggestionClient::with_client(
            http.clone(),
            config.suggestion.clone(),
        ));
        let images = Arc::new(ImageSearchClient::with_client(http, config.image.clone()));
        let gate = CredentialGate::new(credentials, Arc::clone(&frontend));

        let coordinator = Arc::new(EnrichmentCoordinator::new(
            Arc::new(ItemStore::new()),
            gate,
            suggestions,
            images,
            frontend,
        ));

        Ok(Self { coordinator })
    }

    pub fn store(&self) -> &Arc<ItemStore> {
        self.coordinator.store()
    }

    pub fn gate(&self) -> &CredentialGate {
        self.coordinator.gate()
    }
}

/// Shared transport for both fetchers. Requests wait as long as the
/// transport allows; no per-request timeout is set.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("larder/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

/// Open the credential file named by the config, with environment overrides.
pub fn open_credentials(config: &LarderConfig) -> Result<FileCredentialStore> {
    let store = FileCredentialStore::open(&config.paths.credentials_file).with_context(|| {
        format!(
            "Failed to open credential store {}",
            config.paths.credentials_file.display()
        )
    })?;
    Ok(store.with_env_overrides())
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::NullFrontend;
    use tempfile::tempdir;

    #[test]
    fn test_http_client_has_no_request_timeout() {
        let client = http_client().unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("larder/"));
        assert!(!debug.contains("timeout"));
    }

    #[tokio::test]
    async fn test_build_wires_credentials_from_config() {
        let temp = tempdir().expect("Failed to create temp dir");
        std::fs::write(
            temp.path().join("credentials.toml"),
            "suggestion_api_key = \"sk-file\"\n",
        )
        .unwrap();
        let config = LarderConfig::default().with_data_dir(temp.path());

        let app = App::build(&config, Arc::new(NullFrontend)).unwrap();
        assert!(app.store().is_empty().await);
        if std::env::var(larder_core::Service::Suggestion.env_var()).is_err() {
            assert_eq!(
                app.gate().get(larder_core::Service::Suggestion).as_deref(),
                Some("sk-file")
            );
        }
    }
}
