//! Shared types for larder-core.
//!
//! These types are used by the item store, the fetchers and the frontends.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Opaque item identifier. Generated once per item and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, enough to address an item in a terminal.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Enrichment Values
// ─────────────────────────────────────────────────────────────────────────────

/// A "better alternative" for an item, as returned by the suggestion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub alternative: String,
    pub reason: String,
}

/// Reference to a representative picture (a URL for the stock image service).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entity Types
// ─────────────────────────────────────────────────────────────────────────────

/// An entry in the item list.
///
/// Only the item store mutates these; everything else sees clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub suggestion: Option<Suggestion>,
    pub suggestion_visible: bool,
    pub suggestion_pending: bool,
    pub image: Option<ImageRef>,
    pub image_pending: bool,
}

impl Item {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            suggestion: None,
            suggestion_visible: false,
            suggestion_pending: false,
            image: None,
            image_pending: false,
        }
    }

    /// The suggestion currently shown to the user, if any.
    pub fn shown_suggestion(&self) -> Option<&Suggestion> {
        if self.suggestion_visible {
            self.suggestion.as_ref()
        } else {
            None
        }
    }

    /// Whether either enrichment fetch is still outstanding.
    pub fn is_pending(&self) -> bool {
        self.suggestion_pending || self.image_pending
    }
}

/// An item as rendered by a frontend: the record plus its editing state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: Item,
    pub editing: bool,
}

impl std::ops::Deref for ItemView {
    type Target = Item;

    fn deref(&self) -> &Item {
        &self.item
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// External Services
// ─────────────────────────────────────────────────────────────────────────────

/// The two external services an item can be enriched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Suggestion,
    Image,
}

impl Service {
    pub const ALL: [Service; 2] = [Service::Suggestion, Service::Image];

    /// Key under which the service's credential is stored.
    pub fn credential_key(&self) -> &'static str {
        match self {
            Service::Suggestion => "suggestion_api_key",
            Service::Image => "image_api_key",
        }
    }

    /// Environment variable that overrides the stored credential.
    pub fn env_var(&self) -> &'static str {
        match self {
            Service::Suggestion => "LARDER_SUGGESTION_KEY",
            Service::Image => "LARDER_IMAGE_KEY",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Suggestion => f.write_str("suggestion"),
            Service::Image => f.write_str("image"),
        }
    }
}

impl FromStr for Service {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "suggestion" | "suggestions" | "openai" => Ok(Service::Suggestion),
            "image" | "images" | "pexels" => Ok(Service::Image),
            other => Err(Error::UnknownService(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_ids_are_unique() {
        let a = ItemId::new();
        let b = ItemId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
        assert!(a.to_string().starts_with(&a.short()));
    }

    #[test]
    fn test_new_item_is_unenriched() {
        let item = Item::new("Whole milk");
        assert_eq!(item.name, "Whole milk");
        assert!(item.suggestion.is_none());
        assert!(!item.suggestion_visible);
        assert!(!item.is_pending());
        assert!(item.image.is_none());
    }

    #[test]
    fn test_shown_suggestion_respects_visibility() {
        let mut item = Item::new("Butter");
        item.suggestion = Some(Suggestion {
            alternative: "Olive oil spread".into(),
            reason: "Less saturated fat.".into(),
        });
        assert!(item.shown_suggestion().is_none());

        item.suggestion_visible = true;
        assert_eq!(item.shown_suggestion().unwrap().alternative, "Olive oil spread");
    }

    #[test]
    fn test_service_parsing() {
        assert_eq!("suggestion".parse::<Service>().unwrap(), Service::Suggestion);
        assert_eq!("Pexels".parse::<Service>().unwrap(), Service::Image);
        assert!("weather".parse::<Service>().is_err());
    }

    #[test]
    fn test_item_view_serializes_flat() {
        let view = ItemView {
            item: Item::new("Bread"),
            editing: true,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["name"], "Bread");
        assert_eq!(json["editing"], true);
        assert_eq!(json["suggestion"], serde_json::Value::Null);
    }
}
