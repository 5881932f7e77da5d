//! larder-core - Core library for Larder
//!
//! A shopping list whose items are enriched in the background with a
//! healthier-alternative suggestion and a representative image:
//!
//! - **store**: Item list, the single editing slot, field-scoped patches
//! - **coordinator**: Dispatches fetches and merges their outcomes
//! - **fetch**: Suggestion and image fetchers (HTTP clients behind `client`)
//! - **credentials**: Credential storage and the gate that asks for missing keys
//! - **frontend**: The interface the core uses to talk to a user
//! - **config**: Endpoints, prompts and paths

pub mod config;
pub mod coordinator;
pub mod credentials;
pub mod error;
pub mod fetch;
pub mod frontend;
pub mod store;
pub mod suggestion;
pub mod types;

// Re-export commonly used types
pub use config::LarderConfig;
pub use coordinator::{Dispatch, EnrichmentCoordinator};
pub use credentials::{CredentialGate, CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use error::{Error, Result};
pub use fetch::{FetchError, ImageFetcher, SuggestionFetcher};
#[cfg(feature = "client")]
pub use fetch::{ChatSuggestionClient, ImageSearchClient};
pub use frontend::{ChannelFrontend, Frontend, FrontendSignal, Notice, NullFrontend};
pub use store::{Axis, ItemPatch, ItemStore, StoreEvent};
pub use types::{ImageRef, Item, ItemId, ItemView, Service, Suggestion};
