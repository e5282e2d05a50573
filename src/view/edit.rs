use super::{Effect, NodeId, View, ViewTree};
use crate::catalog::{DestinationCatalog, OfferCatalog};
use crate::model::{Waypoint, WaypointKind};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Malformed edit-form input. Handled locally by the edit view as inline
/// feedback; never forwarded to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// `date_from` is after `date_to`
    InvertedInterval,
    /// Destination does not resolve against the catalog
    UnknownDestination,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvertedInterval => write!(f, "start must not be after end"),
            ValidationError::UnknownDestination => write!(f, "unknown destination"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Edit-form state: the user's draft plus the optimistic-update flags.
#[derive(Clone, Debug, PartialEq)]
pub struct EditState {
    pub draft: Waypoint,
    pub is_disabled: bool,
    pub is_saving: bool,
    pub is_deleting: bool,
    pub error: Option<ValidationError>,
}

impl EditState {
    fn new(draft: Waypoint) -> Self {
        Self {
            draft,
            is_disabled: false,
            is_saving: false,
            is_deleting: false,
            error: None,
        }
    }
}

/// Editable form presentation of a single waypoint.
///
/// Owns the in-progress draft. Every state change rebuilds the root node
/// wholesale at its current tree position; nothing is patched in place.
pub struct WaypointEditView {
    state: EditState,
    destinations: Arc<DestinationCatalog>,
    offers: Arc<OfferCatalog>,
    node: Option<NodeId>,
}

impl WaypointEditView {
    pub fn new(
        waypoint: Waypoint,
        destinations: Arc<DestinationCatalog>,
        offers: Arc<OfferCatalog>,
    ) -> Self {
        Self {
            state: EditState::new(waypoint),
            destinations,
            offers,
            node: None,
        }
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn draft(&self) -> &Waypoint {
        &self.state.draft
    }

    pub fn is_disabled(&self) -> bool {
        self.state.is_disabled
    }

    /// Discard the draft in favor of a known-good snapshot and clear all
    /// transient flags.
    pub fn reset(&mut self, tree: &mut ViewTree, waypoint: Waypoint) {
        self.state = EditState::new(waypoint);
        self.rerender(tree);
    }

    pub fn set_kind(&mut self, tree: &mut ViewTree, kind: WaypointKind) {
        self.edit_draft(tree, |draft| draft.with_kind(kind));
    }

    pub fn set_base_price(&mut self, tree: &mut ViewTree, base_price: u32) {
        self.edit_draft(tree, |draft| draft.with_base_price(base_price));
    }

    pub fn set_dates(&mut self, tree: &mut ViewTree, from: DateTime<Utc>, to: DateTime<Utc>) {
        self.edit_draft(tree, |draft| draft.with_dates(from, to));
    }

    pub fn set_destination(&mut self, tree: &mut ViewTree, destination: Uuid) {
        self.edit_draft(tree, |draft| draft.with_destination(destination));
    }

    /// Flip one offer in the selection. Ids outside the kind's catalog are
    /// ignored.
    pub fn toggle_offer(&mut self, tree: &mut ViewTree, offer: Uuid) {
        let catalog = self.offers.offers_for(self.state.draft.kind);
        if !catalog.iter().any(|o| o.id == offer) {
            return;
        }
        self.edit_draft(tree, |draft| {
            let mut offers = draft.offers.clone();
            match offers.iter().position(|id| *id == offer) {
                Some(index) => {
                    offers.remove(index);
                }
                None => offers.push(offer),
            }
            draft.with_offers(offers)
        });
    }

    fn edit_draft(&mut self, tree: &mut ViewTree, derive: impl FnOnce(&Waypoint) -> Waypoint) {
        if self.state.is_disabled {
            return;
        }
        self.state.draft = derive(&self.state.draft);
        self.state.error = None;
        self.rerender(tree);
    }

    /// Validate the draft and hand it out for submission.
    ///
    /// On failure the error is recorded as inline feedback and submission is
    /// blocked.
    pub fn submit(&mut self, tree: &mut ViewTree) -> Result<Waypoint, ValidationError> {
        let error = if !self.state.draft.interval_is_ordered() {
            Some(ValidationError::InvertedInterval)
        } else if !self.destinations.contains(self.state.draft.destination) {
            Some(ValidationError::UnknownDestination)
        } else {
            None
        };

        match error {
            Some(error) => {
                self.state.error = Some(error);
                self.rerender(tree);
                Err(error)
            }
            None => {
                self.state.error = None;
                Ok(self.state.draft.clone())
            }
        }
    }

    /// Drive the optimistic sub-state flags.
    pub fn set_flags(&mut self, tree: &mut ViewTree, disabled: bool, saving: bool, deleting: bool) {
        self.state.is_disabled = disabled;
        self.state.is_saving = saving;
        self.state.is_deleting = deleting;
        self.rerender(tree);
    }

    /// Transient failure feedback with the draft left intact for retry: clear
    /// the disabled/saving/deleting flags, then mark the rebuilt node.
    pub fn shake_and_reset_flags(&mut self, tree: &mut ViewTree) {
        self.set_flags(tree, false, false, false);
        if let Some(id) = self.node {
            tree.set_effect(id, Effect::Shake);
        }
    }
}

impl View for WaypointEditView {
    fn template(&self) -> String {
        let draft = &self.state.draft;
        let destination = self.destinations.get(draft.destination);
        let available = self.offers.offers_for(draft.kind);

        let mut row = format!(
            "[edit] {} -> {} | {} — {} | €{}",
            draft.kind.label(),
            destination.name,
            draft.date_from.format("%d %b %H:%M"),
            draft.date_to.format("%d %b %H:%M"),
            draft.base_price,
        );
        for offer in &available {
            let mark = if draft.offers.contains(&offer.id) {
                "[x]"
            } else {
                "[ ]"
            };
            row.push_str(&format!(" | {} {} €{}", mark, offer.title, offer.price));
        }
        if self.state.is_saving {
            row.push_str(" | saving...");
        } else if self.state.is_deleting {
            row.push_str(" | deleting...");
        }
        if self.state.is_disabled {
            row.push_str(" (disabled)");
        }
        if let Some(error) = self.state.error {
            row.push_str(&format!(" | ! {}", error));
        }
        row
    }

    fn node(&self) -> Option<NodeId> {
        self.node
    }

    fn set_node(&mut self, node: Option<NodeId>) {
        self.node = node;
    }
}
