use crate::catalog::{DestinationCatalog, OfferCatalog};
use crate::model::{Mode, UpdateType, UserAction, Waypoint, WaypointKind};
use crate::view::{
    self, NodeId, RenderPosition, ValidationError, ViewError, ViewTree, WaypointCardView,
    WaypointEditView,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

mod dispatch;


pub use dispatch::CancelDispatcher;

/// User gesture on one waypoint's card or edit view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// Unfold the card into the edit form
    OpenEditor,
    /// Fold the form back, discarding the draft
    CloseEditor,
    /// Submit the draft
    Submit,
    /// Delete the waypoint
    Delete,
    /// Flip the favorite flag (card view)
    ToggleFavorite,
}

/// Single edit-form input change, applied to the open editor's draft.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DraftEdit {
    SetKind(WaypointKind),
    SetBasePrice(u32),
    SetDates(DateTime<Utc>, DateTime<Utc>),
    SetDestination(Uuid),
    ToggleOffer(Uuid),
}

/// What a handled gesture asks of the board.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureOutcome {
    /// Handled locally (or ignored, e.g. while a save is in flight)
    Noop,
    /// The editor opened; the board must close every other open editor
    EditorOpened,
    /// A store-bound mutation with its classified severity
    Action {
        action: UserAction,
        update: UpdateType,
        waypoint: Waypoint,
    },
    /// The edit form blocked submission with inline feedback
    Rejected(ValidationError),
}

/// Per-waypoint state machine.
///
/// Owns the waypoint's two view instances and decides which is mounted.
/// Default mode shows the card, Editing mode the form; the optimistic
/// saving/deleting/abort sub-states are layered onto the edit view as flags,
/// not separate modes. All tree access goes through the lifecycle primitives.
pub struct WaypointPresenter {
    container: NodeId,
    destinations: Arc<DestinationCatalog>,
    offers: Arc<OfferCatalog>,
    waypoint: Waypoint,
    card: Option<WaypointCardView>,
    edit: Option<WaypointEditView>,
    mode: Mode,
}

impl WaypointPresenter {
    pub fn new(
        container: NodeId,
        destinations: Arc<DestinationCatalog>,
        offers: Arc<OfferCatalog>,
        waypoint: Waypoint,
    ) -> Self {
        Self {
            container,
            destinations,
            offers,
            waypoint,
            card: None,
            edit: None,
            mode: Mode::Default,
        }
    }

    pub fn id(&self) -> Uuid {
        self.waypoint.id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Last known-good snapshot.
    pub fn waypoint(&self) -> &Waypoint {
        &self.waypoint
    }

    pub fn edit_view(&self) -> Option<&WaypointEditView> {
        self.edit.as_ref()
    }

    pub fn card_view(&self) -> Option<&WaypointCardView> {
        self.card.as_ref()
    }

    /// (Re)build both views from a snapshot and mount the current mode's view,
    /// swapping out the previous instance at the same position when one exists.
    pub fn init(&mut self, tree: &mut ViewTree, waypoint: Waypoint) -> Result<(), ViewError> {
        self.waypoint = waypoint.clone();

        let prev_card = self.card.take();
        let prev_edit = self.edit.take();

        let mut card = WaypointCardView::new(
            waypoint.clone(),
            Arc::clone(&self.destinations),
            Arc::clone(&self.offers),
        );
        let mut edit = WaypointEditView::new(
            waypoint,
            Arc::clone(&self.destinations),
            Arc::clone(&self.offers),
        );

        match (prev_card, prev_edit) {
            (Some(mut prev_card), Some(mut prev_edit)) => {
                match self.mode {
                    Mode::Default => view::replace(&mut card, &prev_card, tree)?,
                    Mode::Editing => view::replace(&mut edit, &prev_edit, tree)?,
                }
                view::remove(&mut prev_card, tree);
                view::remove(&mut prev_edit, tree);
            }
            _ => {
                view::render(&mut card, tree, self.container, RenderPosition::AfterLastChild);
            }
        }

        self.card = Some(card);
        self.edit = Some(edit);
        Ok(())
    }

    /// Unmount and release both views; give up the cancel gesture if held.
    pub fn destroy(&mut self, tree: &mut ViewTree, dispatcher: &mut CancelDispatcher) {
        if let Some(mut card) = self.card.take() {
            view::remove(&mut card, tree);
        }
        if let Some(mut edit) = self.edit.take() {
            view::remove(&mut edit, tree);
        }
        dispatcher.release(self.waypoint.id);
        self.mode = Mode::Default;
    }

    /// Force Editing back to Default with the draft discarded. Used by the
    /// board to enforce the single-open-editor invariant, and by the cancel
    /// gesture.
    pub fn reset_to_default(
        &mut self,
        tree: &mut ViewTree,
        dispatcher: &mut CancelDispatcher,
    ) -> Result<(), ViewError> {
        if self.mode != Mode::Default {
            self.close_editor(tree, dispatcher, true)?;
        }
        Ok(())
    }

    /// Successful submit: fold back to the card without a draft reset; the
    /// store notification rebuilds everything from the accepted snapshot.
    pub fn complete_save(
        &mut self,
        tree: &mut ViewTree,
        dispatcher: &mut CancelDispatcher,
    ) -> Result<(), ViewError> {
        if self.mode == Mode::Editing {
            self.close_editor(tree, dispatcher, false)?;
        }
        Ok(())
    }

    pub fn set_saving(&mut self, tree: &mut ViewTree) {
        if self.mode == Mode::Editing {
            if let Some(edit) = self.edit.as_mut() {
                edit.set_flags(tree, true, true, false);
            }
        }
    }

    pub fn set_deleting(&mut self, tree: &mut ViewTree) {
        if self.mode == Mode::Editing {
            if let Some(edit) = self.edit.as_mut() {
                edit.set_flags(tree, true, false, true);
            }
        }
    }

    /// Persistence failure: transient shake, draft kept for retry.
    ///
    /// In Default mode the failed attempt was a favorite toggle from the card
    /// view, which holds no draft state, so the card shakes with no flag
    /// cleanup.
    pub fn set_aborting(&mut self, tree: &mut ViewTree) {
        match self.mode {
            Mode::Default => {
                if let Some(card) = self.card.as_mut() {
                    card.shake(tree);
                }
            }
            Mode::Editing => {
                if let Some(edit) = self.edit.as_mut() {
                    edit.shake_and_reset_flags(tree);
                }
            }
        }
    }

    /// Apply one form input change to the open editor's draft. Ignored unless
    /// this presenter is editing and the form is interactive.
    pub fn apply_draft(&mut self, tree: &mut ViewTree, edit: DraftEdit) {
        if self.mode != Mode::Editing {
            return;
        }
        let Some(view) = self.edit.as_mut() else { return };
        match edit {
            DraftEdit::SetKind(kind) => view.set_kind(tree, kind),
            DraftEdit::SetBasePrice(price) => view.set_base_price(tree, price),
            DraftEdit::SetDates(from, to) => view.set_dates(tree, from, to),
            DraftEdit::SetDestination(destination) => view.set_destination(tree, destination),
            DraftEdit::ToggleOffer(offer) => view.toggle_offer(tree, offer),
        }
    }

    /// Translate a user gesture into mode transitions and store-bound actions.
    pub fn handle_gesture(
        &mut self,
        tree: &mut ViewTree,
        dispatcher: &mut CancelDispatcher,
        gesture: Gesture,
    ) -> Result<GestureOutcome, ViewError> {
        // Controls are disabled while a save/delete is in flight; a second
        // gesture must not re-enter the persistence path.
        if self.edit.as_ref().map_or(false, |edit| edit.is_disabled()) {
            debug!(waypoint_id = %self.waypoint.id, ?gesture, "Gesture ignored while disabled");
            return Ok(GestureOutcome::Noop);
        }

        match (self.mode, gesture) {
            (Mode::Default, Gesture::OpenEditor) => {
                self.open_editor(tree, dispatcher)?;
                Ok(GestureOutcome::EditorOpened)
            }
            (Mode::Default, Gesture::ToggleFavorite) => Ok(GestureOutcome::Action {
                action: UserAction::Update,
                update: UpdateType::Minor,
                waypoint: self.waypoint.with_favorite(!self.waypoint.is_favorite),
            }),
            (Mode::Editing, Gesture::CloseEditor) => {
                self.close_editor(tree, dispatcher, true)?;
                Ok(GestureOutcome::Noop)
            }
            (Mode::Editing, Gesture::Submit) => {
                let Some(edit) = self.edit.as_mut() else {
                    return Ok(GestureOutcome::Noop);
                };
                match edit.submit(tree) {
                    Ok(waypoint) => Ok(GestureOutcome::Action {
                        action: UserAction::Update,
                        update: self.classify_update(&waypoint),
                        waypoint,
                    }),
                    Err(error) => Ok(GestureOutcome::Rejected(error)),
                }
            }
            (Mode::Editing, Gesture::Delete) => Ok(GestureOutcome::Action {
                action: UserAction::Remove,
                update: UpdateType::Minor,
                waypoint: self.waypoint.clone(),
            }),
            _ => Ok(GestureOutcome::Noop),
        }
    }

    /// Position-invariant edits (price, offers, destination, kind) patch a
    /// single row; any interval change may reorder or refilter the list.
    fn classify_update(&self, edited: &Waypoint) -> UpdateType {
        let dates_unchanged = edited.date_from == self.waypoint.date_from
            && edited.date_to == self.waypoint.date_to;
        if dates_unchanged {
            UpdateType::Patch
        } else {
            UpdateType::Minor
        }
    }

    fn open_editor(
        &mut self,
        tree: &mut ViewTree,
        dispatcher: &mut CancelDispatcher,
    ) -> Result<(), ViewError> {
        let (Some(edit), Some(card)) = (self.edit.as_mut(), self.card.as_ref()) else {
            return Ok(());
        };
        view::replace(edit, card, tree)?;
        dispatcher.acquire(self.waypoint.id);
        self.mode = Mode::Editing;
        debug!(waypoint_id = %self.waypoint.id, "Editor opened");
        Ok(())
    }

    fn close_editor(
        &mut self,
        tree: &mut ViewTree,
        dispatcher: &mut CancelDispatcher,
        reset_draft: bool,
    ) -> Result<(), ViewError> {
        let (Some(card), Some(edit)) = (self.card.as_mut(), self.edit.as_mut()) else {
            return Ok(());
        };
        if reset_draft {
            edit.reset(tree, self.waypoint.clone());
        }
        view::replace(card, edit, tree)?;
        dispatcher.release(self.waypoint.id);
        self.mode = Mode::Default;
        debug!(waypoint_id = %self.waypoint.id, "Editor closed");
        Ok(())
    }
}
