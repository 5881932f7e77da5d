//! larder Configuration
//!
//! Defines configuration options for the enrichment services.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default chat-completion endpoint for suggestions
pub const DEFAULT_SUGGESTION_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default image search endpoint
pub const DEFAULT_IMAGE_ENDPOINT: &str = "https://api.pexels.com/v1/search";

/// Default system instruction sent with every suggestion request
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a nutrition expert. When given a grocery item, \
reply with a healthier alternative on the first line and a one-sentence reason on the next line. \
Do not add anything else.";

/// Default user message; `{item}` is replaced by the item name
pub const DEFAULT_USER_TEMPLATE: &str = "Suggest a healthier alternative to: {item}";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LarderConfig {
    /// Suggestion service settings
    #[serde(default)]
    pub suggestion: SuggestionConfig,

    /// Image service settings
    #[serde(default)]
    pub image: ImageConfig,

    /// Paths
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Suggestion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// Chat-completion endpoint URL
    #[serde(default = "default_suggestion_endpoint")]
    pub endpoint: String,

    /// Model name sent in the request body (default: gpt-4o-mini)
    #[serde(default = "default_model")]
    pub model: String,

    /// Fixed system instruction
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// User message template with an `{item}` placeholder
    #[serde(default = "default_user_template")]
    pub user_template: String,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_suggestion_endpoint(),
            model: default_model(),
            system_prompt: default_system_prompt(),
            user_template: default_user_template(),
        }
    }
}

impl SuggestionConfig {
    /// Render the user message for an item.
    pub fn user_message(&self, item_name: &str) -> String {
        self.user_template.replace("{item}", item_name)
    }
}

/// Image service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Search endpoint URL
    #[serde(default = "default_image_endpoint")]
    pub endpoint: String,

    /// Term appended to every query to keep results on-topic (default: food)
    #[serde(default = "default_query_qualifier")]
    pub query_qualifier: String,

    /// Which rendition of the first photo to keep
    #[serde(default)]
    pub size: ImageSize,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            endpoint: default_image_endpoint(),
            query_qualifier: default_query_qualifier(),
            size: ImageSize::default(),
        }
    }
}

impl ImageConfig {
    /// Build the search query for an item.
    pub fn query(&self, item_name: &str) -> String {
        let qualifier = self.query_qualifier.trim();
        if qualifier.is_empty() {
            item_name.to_string()
        } else {
            format!("{} {}", item_name, qualifier)
        }
    }
}

/// Image renditions offered by the search service (`photos[].src.<size>`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Original,
}

impl ImageSize {
    /// Field name inside the `src` object
    pub fn field(&self) -> &'static str {
        match self {
            ImageSize::Tiny => "tiny",
            ImageSize::Small => "small",
            ImageSize::Medium => "medium",
            ImageSize::Large => "large",
            ImageSize::Original => "original",
        }
    }
}

/// Filesystem locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Base directory for larder data
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Credential file (key-value TOML)
    #[serde(default = "default_credentials_file")]
    pub credentials_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            credentials_file: default_credentials_file(),
        }
    }
}

// Default value functions
fn default_suggestion_endpoint() -> String {
    DEFAULT_SUGGESTION_ENDPOINT.to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_user_template() -> String {
    DEFAULT_USER_TEMPLATE.to_string()
}

fn default_image_endpoint() -> String {
    DEFAULT_IMAGE_ENDPOINT.to_string()
}

fn default_query_qualifier() -> String {
    "food".to_string()
}

/// `$LARDER_DIR`, else `~/.larder`
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LARDER_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".larder")
}

fn default_credentials_file() -> PathBuf {
    default_data_dir().join("credentials.toml")
}

impl LarderConfig {
    /// Set the suggestion endpoint
    pub fn with_suggestion_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.suggestion.endpoint = endpoint.into();
        self
    }

    /// Set the image endpoint
    pub fn with_image_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.image.endpoint = endpoint.into();
        self
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.suggestion.model = model.into();
        self
    }

    /// Set the data directory (credentials file follows it)
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        self.paths.credentials_file = data_dir.join("credentials.toml");
        self.paths.data_dir = data_dir;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("suggestion.endpoint", &self.suggestion.endpoint),
            ("image.endpoint", &self.image.endpoint),
        ] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(ConfigValidationError::InvalidValue {
                    field: field.into(),
                    message: format!("'{}' is not an http(s) URL", value),
                });
            }
        }

        if self.suggestion.model.trim().is_empty() {
            return Err(ConfigValidationError::InvalidValue {
                field: "suggestion.model".into(),
                message: "must not be empty".into(),
            });
        }

        if !self.suggestion.user_template.contains("{item}") {
            return Err(ConfigValidationError::MissingPlaceholder);
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("suggestion.user_template must contain an {{item}} placeholder")]
    MissingPlaceholder,

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
