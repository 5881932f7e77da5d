//! Field-scoped partial updates.

use crate::types::{ImageRef, Item, ItemId, Suggestion};

/// One of the two independent enrichment axes of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Suggestion,
    Image,
}

impl Axis {
    pub(crate) fn index(self) -> usize {
        match self {
            Axis::Suggestion => 0,
            Axis::Image => 1,
        }
    }
}

/// Proof that a fetch was started for an item.
///
/// A completion carrying a ticket is only applied while the ticket is the
/// newest one issued for its item and axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub item_id: ItemId,
    pub axis: Axis,
    pub(crate) generation: u64,
}

/// Partial update of one item. `None` leaves the field untouched.
///
/// For optional fields the outer `Option` says whether to write, the inner
/// one is the written value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub suggestion: Option<Option<Suggestion>>,
    pub suggestion_visible: Option<bool>,
    pub suggestion_pending: Option<bool>,
    pub image: Option<Option<ImageRef>>,
    pub image_pending: Option<bool>,
}

impl ItemPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn suggestion(mut self, suggestion: Option<Suggestion>) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    pub fn suggestion_visible(mut self, visible: bool) -> Self {
        self.suggestion_visible = Some(visible);
        self
    }

    pub fn suggestion_pending(mut self, pending: bool) -> Self {
        self.suggestion_pending = Some(pending);
        self
    }

    pub fn image(mut self, image: Option<ImageRef>) -> Self {
        self.image = Some(image);
        self
    }

    pub fn image_pending(mut self, pending: bool) -> Self {
        self.image_pending = Some(pending);
        self
    }

    /// Completed suggestion fetch: store the outcome and show it if present.
    pub fn suggestion_outcome(suggestion: Option<Suggestion>) -> Self {
        let visible = suggestion.is_some();
        Self::new()
            .suggestion(suggestion)
            .suggestion_visible(visible)
            .suggestion_pending(false)
    }

    /// Failed suggestion fetch: only the pending flag changes.
    pub fn suggestion_failed() -> Self {
        Self::new().suggestion_pending(false)
    }

    /// Completed image fetch.
    pub fn image_outcome(image: Option<ImageRef>) -> Self {
        Self::new().image(image).image_pending(false)
    }

    /// Failed image fetch: only the pending flag changes.
    pub fn image_failed() -> Self {
        Self::new().image_pending(false)
    }

    /// Merge into `item`. Returns whether anything changed.
    ///
    /// `suggestion_visible` is forced off whenever no suggestion is stored.
    pub(crate) fn apply(self, item: &mut Item) -> bool {
        let before = item.clone();

        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(suggestion) = self.suggestion {
            item.suggestion = suggestion;
        }
        if let Some(visible) = self.suggestion_visible {
            item.suggestion_visible = visible;
        }
        if let Some(pending) = self.suggestion_pending {
            item.suggestion_pending = pending;
        }
        if let Some(image) = self.image {
            item.image = image;
        }
        if let Some(pending) = self.image_pending {
            item.image_pending = pending;
        }

        if item.suggestion.is_none() {
            item.suggestion_visible = false;
        }

        *item != before
    }
}
