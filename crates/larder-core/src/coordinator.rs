//! Enrichment coordinator.
//!
//! Sits between the fetchers and the item store. It holds no item state: it
//! checks the credential gate, starts fetches through the store (which hands
//! out tickets), and writes each outcome back as a field-scoped patch. The
//! suggestion and image paths touch disjoint fields, so their completions
//! commute whatever order they arrive in.
//!
//! Policy differences between the two paths are deliberate:
//!
//! | | suggestion | image |
//! |---|---|---|
//! | no credential | ask the frontend, dispatch nothing | skip silently |
//! | fetch failed | reset pending, show a notice | reset pending only |

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::credentials::CredentialGate;
use crate::fetch::{ImageFetcher, SuggestionFetcher};
use crate::frontend::{Frontend, Notice};
use crate::store::{Axis, FetchTicket, ItemPatch, ItemStore};
use crate::types::{ItemId, Service};

/// Which fetches an `enrich` call actually started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub suggestion: bool,
    pub image: bool,
}

impl Dispatch {
    pub const NONE: Dispatch = Dispatch {
        suggestion: false,
        image: false,
    };
}

/// Dispatch/merge policy between the fetchers and the item store.
pub struct EnrichmentCoordinator {
    store: Arc<ItemStore>,
    gate: CredentialGate,
    suggestions: Arc<dyn SuggestionFetcher>,
    images: Arc<dyn ImageFetcher>,
    frontend: Arc<dyn Frontend>,
}

impl EnrichmentCoordinator {
    pub fn new(
        store: Arc<ItemStore>,
        gate: CredentialGate,
        suggestions: Arc<dyn SuggestionFetcher>,
        images: Arc<dyn ImageFetcher>,
        frontend: Arc<dyn Frontend>,
    ) -> Self {
        Self {
            store,
            gate,
            suggestions,
            images,
            frontend,
        }
    }

    pub fn store(&self) -> &Arc<ItemStore> {
        &self.store
    }

    pub fn gate(&self) -> &CredentialGate {
        &self.gate
    }

    /// Fetch a suggestion and an image for an item and merge both into the
    /// store. Resolves once every started fetch has been merged or dropped.
    pub async fn enrich(&self, id: ItemId, name: &str) -> Dispatch {
        let Some(suggestion_key) = self.gate.get(Service::Suggestion) else {
            info!("No suggestion credential; enrichment of {:?} not started", name);
            self.gate.request(Service::Suggestion);
            return Dispatch::NONE;
        };

        let Some(ticket) = self.store.begin_fetch(id, Axis::Suggestion).await else {
            debug!("Item {} is gone; nothing to enrich", id.short());
            return Dispatch::NONE;
        };

        let (_, image) = tokio::join!(
            self.run_suggestion(ticket, name, &suggestion_key),
            self.refresh_image(id, name),
        );

        Dispatch {
            suggestion: true,
            image,
        }
    }

    /// [`enrich`](Self::enrich) on a background task.
    pub fn spawn_enrich(self: &Arc<Self>, id: ItemId, name: impl Into<String>) -> JoinHandle<Dispatch> {
        let this = Arc::clone(self);
        let name = name.into();
        tokio::spawn(async move { this.enrich(id, &name).await })
    }

    /// Accept the item's suggestion and look up an image for the new name.
    ///
    /// Returns the new name, or `None` if there was nothing to accept.
    pub async fn accept(&self, id: ItemId) -> Option<String> {
        let name = self.store.accept_suggestion(id).await?;
        self.refresh_image(id, &name).await;
        Some(name)
    }

    /// [`accept`](Self::accept) on a background task.
    pub fn spawn_accept(self: &Arc<Self>, id: ItemId) -> JoinHandle<Option<String>> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.accept(id).await })
    }

    /// Run the image path only. Returns whether a fetch was started.
    pub async fn refresh_image(&self, id: ItemId, name: &str) -> bool {
        let Some(image_key) = self.gate.get(Service::Image) else {
            debug!("No image credential; skipping image for {:?}", name);
            return false;
        };

        let Some(ticket) = self.store.begin_fetch(id, Axis::Image).await else {
            return false;
        };

        self.run_image(ticket, name, &image_key).await;
        true
    }

    async fn run_suggestion(&self, ticket: FetchTicket, name: &str, credential: &str) {
        match self.suggestions.fetch_suggestion(name, credential).await {
            Ok(suggestion) => {
                match &suggestion {
                    Some(s) => info!("Suggestion for {:?}: {:?}", name, s.alternative),
                    None => info!("No suggestion for {:?}", name),
                }
                self.store
                    .complete_fetch(ticket, ItemPatch::suggestion_outcome(suggestion))
                    .await;
            }
            Err(e) => {
                warn!("Suggestion fetch for {:?} failed: {}", name, e);
                let applied = self
                    .store
                    .complete_fetch(ticket, ItemPatch::suggestion_failed())
                    .await;
                // Only the newest fetch of a live item gets to talk to the user.
                if applied {
                    self.frontend.notify(Notice {
                        item_id: ticket.item_id,
                        item_name: name.to_string(),
                        message: format!("Could not fetch a suggestion ({})", e),
                    });
                }
            }
        }
    }

    async fn run_image(&self, ticket: FetchTicket, name: &str, credential: &str) {
        let patch = match self.images.fetch_image(name, credential).await {
            Ok(image) => {
                debug!("Image for {:?}: {:?}", name, image);
                ItemPatch::image_outcome(image)
            }
            Err(e) => {
                debug!("Image fetch for {:?} failed: {}", name, e);
                ItemPatch::image_failed()
            }
        };
        self.store.complete_fetch(ticket, patch).await;
    }
}
