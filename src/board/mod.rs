use crate::catalog::{DestinationCatalog, OfferCatalog};
use crate::model::{Mode, UpdateType, UserAction, Waypoint};
use crate::persist::Persistence;
use crate::presenter::{CancelDispatcher, DraftEdit, Gesture, GestureOutcome, WaypointPresenter};
use crate::store::WaypointStore;
use crate::view::{self, FiltersView, NodeId, RenderPosition, SortingView, View, ViewError, ViewTree};
use chrono::Utc;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub mod policy;


use policy::{Filter, SortOrder};

/// One store notification, queued by the board's subscription and applied
/// after the mutation that produced it returns.
struct StoreEvent {
    update: UpdateType,
    waypoint: Option<Waypoint>,
}

/// List controller: owns the store, the view tree, the cancel dispatcher, and
/// one presenter per visible waypoint.
///
/// The board routes gestures to presenters, enforces the single-open-editor
/// invariant on the editor-opened broadcast, drives the optimistic sub-states
/// around persistence attempts, and applies the re-render policy keyed on
/// update severity: Patch redraws one row, Minor additionally recomputes the
/// visible order, Major rebuilds the whole list.
pub struct Board<P: Persistence> {
    store: WaypointStore<P>,
    events: Rc<RefCell<VecDeque<StoreEvent>>>,
    tree: ViewTree,
    root: NodeId,
    list: NodeId,
    filters_view: FiltersView,
    sorting_view: SortingView,
    dispatcher: CancelDispatcher,
    presenters: HashMap<Uuid, WaypointPresenter>,
    order: Vec<Uuid>,
    filter: Filter,
    sort: SortOrder,
    destinations: Arc<DestinationCatalog>,
    offers: Arc<OfferCatalog>,
}

impl<P: Persistence> Board<P> {
    pub fn new(
        backend: P,
        destinations: Arc<DestinationCatalog>,
        offers: Arc<OfferCatalog>,
    ) -> Self {
        let mut store = WaypointStore::new(backend);
        let events: Rc<RefCell<VecDeque<StoreEvent>>> = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&events);
        store.subscribe(move |update, payload| {
            sink.borrow_mut().push_back(StoreEvent {
                update,
                waypoint: payload.cloned(),
            });
        });

        let mut tree = ViewTree::new();
        let root = tree.create_node("board");
        let list = tree.create_node("waypoints");
        tree.attach(list, root, RenderPosition::AfterLastChild);

        let mut filters_view = FiltersView::new(Filter::default());
        let mut sorting_view = SortingView::new(SortOrder::default());
        view::render(&mut sorting_view, &mut tree, root, RenderPosition::BeforeFirstChild);
        view::render(&mut filters_view, &mut tree, root, RenderPosition::BeforeFirstChild);

        Self {
            store,
            events,
            tree,
            root,
            list,
            filters_view,
            sorting_view,
            dispatcher: CancelDispatcher::new(),
            presenters: HashMap::new(),
            order: Vec::new(),
            filter: Filter::default(),
            sort: SortOrder::default(),
            destinations,
            offers,
        }
    }

    /// Bootstrap the store from its backend and render the initial list.
    pub async fn init(&mut self) -> anyhow::Result<()> {
        self.store.init().await?;
        self.drain_events()?;
        Ok(())
    }

    /// Route a user gesture to the waypoint's presenter and act on the
    /// outcome.
    pub async fn handle_gesture(&mut self, waypoint: Uuid, gesture: Gesture) -> anyhow::Result<()> {
        let Some(presenter) = self.presenters.get_mut(&waypoint) else {
            warn!(waypoint_id = %waypoint, ?gesture, "Gesture for unknown waypoint, dropping");
            return Ok(());
        };
        let outcome = presenter.handle_gesture(&mut self.tree, &mut self.dispatcher, gesture)?;
        match outcome {
            GestureOutcome::Noop => {}
            GestureOutcome::Rejected(error) => {
                info!(waypoint_id = %waypoint, error = %error, "Submission blocked by validation");
            }
            GestureOutcome::EditorOpened => self.close_other_editors(waypoint)?,
            GestureOutcome::Action {
                action,
                update,
                waypoint,
            } => self.apply_action(action, update, waypoint).await?,
        }
        Ok(())
    }

    /// Apply one edit-form input change to the open editor's draft.
    pub fn apply_draft(&mut self, waypoint: Uuid, edit: DraftEdit) {
        if let Some(presenter) = self.presenters.get_mut(&waypoint) {
            presenter.apply_draft(&mut self.tree, edit);
        }
    }

    /// Process-wide cancel gesture (Escape), forwarded to the presenter that
    /// currently owns it.
    pub fn handle_escape(&mut self) -> anyhow::Result<()> {
        if let Some(owner) = self.dispatcher.owner() {
            if let Some(presenter) = self.presenters.get_mut(&owner) {
                presenter.reset_to_default(&mut self.tree, &mut self.dispatcher)?;
            }
        }
        Ok(())
    }

    /// Add a new waypoint; list shape changes, so the severity is fixed Major.
    pub async fn add_waypoint(&mut self, waypoint: Waypoint) -> anyhow::Result<()> {
        self.apply_action(UserAction::Add, UpdateType::Major, waypoint)
            .await
    }

    /// Switch the active filter; an external-context change that rebuilds the
    /// list.
    pub fn set_filter(&mut self, filter: Filter) -> anyhow::Result<()> {
        if self.filter == filter {
            return Ok(());
        }
        info!(?filter, "Filter changed");
        self.filter = filter;
        self.filters_view.set_active(filter);
        self.filters_view.rerender(&mut self.tree);
        self.rebuild()?;
        Ok(())
    }

    /// Switch the active sort order; an external-context change that rebuilds
    /// the list.
    pub fn set_sort(&mut self, sort: SortOrder) -> anyhow::Result<()> {
        if self.sort == sort {
            return Ok(());
        }
        info!(?sort, "Sort order changed");
        self.sort = sort;
        self.sorting_view.set_active(sort);
        self.sorting_view.rerender(&mut self.tree);
        self.rebuild()?;
        Ok(())
    }

    pub fn store(&self) -> &WaypointStore<P> {
        &self.store
    }

    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    pub fn presenter(&self, waypoint: Uuid) -> Option<&WaypointPresenter> {
        self.presenters.get(&waypoint)
    }

    /// Visible waypoint ids in render order.
    pub fn visible(&self) -> &[Uuid] {
        &self.order
    }

    pub fn editing_count(&self) -> usize {
        self.presenters
            .values()
            .filter(|presenter| presenter.mode() == Mode::Editing)
            .count()
    }

    /// Plain-text dump of the whole board for logging and demos.
    pub fn snapshot(&self) -> String {
        self.tree.render_to_string(self.root)
    }

    async fn apply_action(
        &mut self,
        action: UserAction,
        update: UpdateType,
        waypoint: Waypoint,
    ) -> anyhow::Result<()> {
        info!(?action, ?update, waypoint_id = %waypoint.id, "Applying user action");
        match action {
            UserAction::Update => {
                if let Some(presenter) = self.presenters.get_mut(&waypoint.id) {
                    presenter.set_saving(&mut self.tree);
                }
                match self.store.update(update, waypoint.clone()).await {
                    Ok(()) => {
                        if let Some(presenter) = self.presenters.get_mut(&waypoint.id) {
                            presenter.complete_save(&mut self.tree, &mut self.dispatcher)?;
                        }
                        self.drain_events()?;
                    }
                    Err(error) => {
                        warn!(waypoint_id = %waypoint.id, error = %error, "Update failed");
                        if let Some(presenter) = self.presenters.get_mut(&waypoint.id) {
                            presenter.set_aborting(&mut self.tree);
                        }
                    }
                }
            }
            UserAction::Remove => {
                if let Some(presenter) = self.presenters.get_mut(&waypoint.id) {
                    presenter.set_deleting(&mut self.tree);
                }
                match self.store.remove(update, &waypoint).await {
                    Ok(()) => self.drain_events()?,
                    Err(error) => {
                        warn!(waypoint_id = %waypoint.id, error = %error, "Remove failed");
                        if let Some(presenter) = self.presenters.get_mut(&waypoint.id) {
                            presenter.set_aborting(&mut self.tree);
                        }
                    }
                }
            }
            UserAction::Add => match self.store.add(update, waypoint).await {
                Ok(()) => self.drain_events()?,
                Err(error) => {
                    warn!(error = %error, "Add failed");
                }
            },
        }
        Ok(())
    }

    fn close_other_editors(&mut self, keep: Uuid) -> Result<(), ViewError> {
        for (id, presenter) in self.presenters.iter_mut() {
            if *id != keep {
                presenter.reset_to_default(&mut self.tree, &mut self.dispatcher)?;
            }
        }
        Ok(())
    }

    /// Apply queued store notifications with severity-keyed granularity.
    fn drain_events(&mut self) -> anyhow::Result<()> {
        loop {
            let event = self.events.borrow_mut().pop_front();
            let Some(event) = event else { break };
            match event.update {
                UpdateType::Patch => {
                    if let Some(waypoint) = event.waypoint {
                        if let Some(presenter) = self.presenters.get_mut(&waypoint.id) {
                            presenter.init(&mut self.tree, waypoint)?;
                        }
                    }
                }
                UpdateType::Minor => {
                    if self.visible_order() != self.order {
                        self.rebuild()?;
                    } else if let Some(waypoint) = event.waypoint {
                        if let Some(presenter) = self.presenters.get_mut(&waypoint.id) {
                            presenter.init(&mut self.tree, waypoint)?;
                        }
                    }
                }
                UpdateType::Major => self.rebuild()?,
            }
        }
        Ok(())
    }

    fn visible_order(&self) -> Vec<Uuid> {
        let now = Utc::now();
        let mut visible: Vec<&Waypoint> = self
            .store
            .waypoints()
            .iter()
            .filter(|waypoint| self.filter.accepts(waypoint, now))
            .collect();
        visible.sort_by(|a, b| self.sort.compare(a, b));
        visible.into_iter().map(|waypoint| waypoint.id).collect()
    }

    /// Destroy every presenter and re-render the visible list from the store.
    fn rebuild(&mut self) -> Result<(), ViewError> {
        for presenter in self.presenters.values_mut() {
            presenter.destroy(&mut self.tree, &mut self.dispatcher);
        }
        self.presenters.clear();

        self.order = self.visible_order();
        let visible: Vec<Waypoint> = self
            .order
            .iter()
            .filter_map(|id| self.store.find(*id).cloned())
            .collect();
        info!(count = visible.len(), "Rebuilding waypoint list");

        for waypoint in visible {
            let mut presenter = WaypointPresenter::new(
                self.list,
                Arc::clone(&self.destinations),
                Arc::clone(&self.offers),
                waypoint.clone(),
            );
            presenter.init(&mut self.tree, waypoint)?;
            self.presenters.insert(presenter.id(), presenter);
        }
        Ok(())
    }
}
