//! The item store.
//!
//! Owns the ordered item collection and is the only place item records are
//! mutated. Every operation is one indivisible transition under the store
//! lock, followed by at most one [`StoreEvent`] for subscribers. Operations
//! addressed to an id that no longer exists are silent no-ops: that is how a
//! fetch that outlives its item gets discarded.

mod patch;

pub use patch::{Axis, FetchTicket, ItemPatch};

use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::types::{Item, ItemId, ItemView};

const EVENT_CAPACITY: usize = 256;

/// Notification that the store changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Added(ItemId),
    Removed(ItemId),
    Updated(ItemId),
    EditingChanged(Option<ItemId>),
}

struct Entry {
    item: Item,
    /// Newest ticket generation per axis
    generations: [u64; 2],
}

#[derive(Default)]
struct StoreState {
    order: Vec<ItemId>,
    entries: HashMap<ItemId, Entry>,
    editing: Option<ItemId>,
}

impl StoreState {
    fn view(&self, id: &ItemId) -> Option<ItemView> {
        self.entries.get(id).map(|entry| ItemView {
            item: entry.item.clone(),
            editing: self.editing == Some(*id),
        })
    }
}

/// Ordered, in-memory item collection.
pub struct ItemStore {
    state: RwLock<StoreState>,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: RwLock::new(StoreState::default()),
            events,
        }
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Get one item.
    pub async fn get(&self, id: ItemId) -> Option<ItemView> {
        self.state.read().await.view(&id)
    }

    /// All items in insertion order.
    pub async fn snapshot(&self) -> Vec<ItemView> {
        let state = self.state.read().await;
        state.order.iter().filter_map(|id| state.view(id)).collect()
    }

    /// The item currently being edited.
    pub async fn editing(&self) -> Option<ItemId> {
        self.state.read().await.editing
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Whether any item still has a fetch outstanding.
    pub async fn has_pending(&self) -> bool {
        let state = self.state.read().await;
        state.entries.values().any(|entry| entry.item.is_pending())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // List Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a new item. Enrichment is the caller's business.
    pub async fn add(&self, name: &str) -> ItemId {
        let item = Item::new(name.trim());
        let id = item.id;

        let mut state = self.state.write().await;
        state.order.push(id);
        state.entries.insert(
            id,
            Entry {
                item,
                generations: [0; 2],
            },
        );
        debug!("Added item {}", id.short());
        self.emit(StoreEvent::Added(id));
        id
    }

    /// Delete an item. Returns `false` if it was already gone.
    pub async fn remove(&self, id: ItemId) -> bool {
        let mut state = self.state.write().await;
        if state.entries.remove(&id).is_none() {
            return false;
        }
        state.order.retain(|other| *other != id);
        if state.editing == Some(id) {
            state.editing = None;
        }
        debug!("Removed item {}", id.short());
        self.emit(StoreEvent::Removed(id));
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    /// Make `id` the one item being edited.
    pub async fn begin_edit(&self, id: ItemId) -> bool {
        let mut state = self.state.write().await;
        if !state.entries.contains_key(&id) {
            return false;
        }
        if state.editing != Some(id) {
            state.editing = Some(id);
            self.emit(StoreEvent::EditingChanged(Some(id)));
        }
        true
    }

    /// Rename an item and close its edit. A blank name leaves the edit open.
    pub async fn commit_edit(&self, id: ItemId, new_name: &str) -> bool {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return false;
        }

        let mut state = self.state.write().await;
        let Some(entry) = state.entries.get_mut(&id) else {
            return false;
        };
        let renamed = ItemPatch::new().name(new_name).apply(&mut entry.item);

        let closed = state.editing == Some(id);
        if closed {
            state.editing = None;
        }

        match (renamed, closed) {
            (_, true) => self.emit(StoreEvent::EditingChanged(None)),
            (true, false) => self.emit(StoreEvent::Updated(id)),
            (false, false) => {}
        }
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Patches
    // ─────────────────────────────────────────────────────────────────────────

    /// Merge `patch` into the item addressed by `id`.
    ///
    /// Dropped without error when the item no longer exists.
    pub async fn patch(&self, id: ItemId, patch: ItemPatch) -> bool {
        let mut state = self.state.write().await;
        let Some(entry) = state.entries.get_mut(&id) else {
            debug!("Dropping patch for missing item {}", id.short());
            return false;
        };
        if patch.apply(&mut entry.item) {
            self.emit(StoreEvent::Updated(id));
        }
        true
    }

    /// Mark a fetch as started: set the axis' pending flag and issue a ticket
    /// that supersedes any earlier one for the same axis. A suggestion already
    /// on screen is hidden (but kept) until the new outcome lands.
    ///
    /// Returns `None` if the item no longer exists.
    pub async fn begin_fetch(&self, id: ItemId, axis: Axis) -> Option<FetchTicket> {
        let mut state = self.state.write().await;
        let entry = state.entries.get_mut(&id)?;

        entry.generations[axis.index()] += 1;
        let generation = entry.generations[axis.index()];

        let pending = match axis {
            Axis::Suggestion => ItemPatch::new()
                .suggestion_pending(true)
                .suggestion_visible(false),
            Axis::Image => ItemPatch::new().image_pending(true),
        };
        if pending.apply(&mut entry.item) {
            self.emit(StoreEvent::Updated(id));
        }

        Some(FetchTicket {
            item_id: id,
            axis,
            generation,
        })
    }

    /// Apply the outcome of a fetch, unless the item is gone or a newer fetch
    /// for the same axis has been started since.
    pub async fn complete_fetch(&self, ticket: FetchTicket, patch: ItemPatch) -> bool {
        let mut state = self.state.write().await;
        let Some(entry) = state.entries.get_mut(&ticket.item_id) else {
            debug!(
                "Dropping {:?} result for removed item {}",
                ticket.axis,
                ticket.item_id.short()
            );
            return false;
        };
        if entry.generations[ticket.axis.index()] != ticket.generation {
            debug!(
                "Dropping stale {:?} result for item {}",
                ticket.axis,
                ticket.item_id.short()
            );
            return false;
        }
        if patch.apply(&mut entry.item) {
            self.emit(StoreEvent::Updated(ticket.item_id));
        }
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Resolution
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the name with the stored suggestion's alternative.
    ///
    /// Clears the suggestion and the image (the new name needs its own) and
    /// invalidates any image fetch still in flight. Returns the new name, or
    /// `None` if no suggestion is shown.
    pub async fn accept_suggestion(&self, id: ItemId) -> Option<String> {
        let mut state = self.state.write().await;
        let entry = state.entries.get_mut(&id)?;
        let alternative = entry.item.shown_suggestion()?.alternative.clone();

        ItemPatch::new()
            .name(alternative.clone())
            .suggestion(None)
            .suggestion_visible(false)
            .image(None)
            .image_pending(false)
            .apply(&mut entry.item);
        entry.generations[Axis::Image.index()] += 1;

        debug!("Accepted suggestion {:?} for item {}", alternative, id.short());
        self.emit(StoreEvent::Updated(id));
        Some(alternative)
    }

    /// Hide the suggestion but keep it.
    pub async fn dismiss_suggestion(&self, id: ItemId) -> bool {
        let mut state = self.state.write().await;
        let Some(entry) = state.entries.get_mut(&id) else {
            return false;
        };
        if ItemPatch::new()
            .suggestion_visible(false)
            .apply(&mut entry.item)
        {
            self.emit(StoreEvent::Updated(id));
        }
        true
    }
}
