use crate::model::{UpdateType, UserAction, Waypoint};
use crate::persist::{Persistence, PersistenceError};
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

#[cfg(test)]
mod tests;

/// Store mutation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Update or remove of an id not in the collection
    UnknownWaypoint(Uuid),
    /// The persistence attempt failed; the collection was not touched
    Persistence(PersistenceError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::UnknownWaypoint(id) => write!(f, "unknown waypoint {}", id),
            StoreError::Persistence(e) => write!(f, "persistence failed: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<PersistenceError> for StoreError {
    fn from(e: PersistenceError) -> Self {
        StoreError::Persistence(e)
    }
}

type Listener = Box<dyn FnMut(UpdateType, Option<&Waypoint>)>;

/// Observable store holding the authoritative waypoint collection.
///
/// Listeners registered via `subscribe` are invoked synchronously, in
/// registration order, after every successful mutation. The store never
/// decides update severity; the caller performing the mutation supplies it.
/// A failed persistence attempt leaves the collection untouched, skips
/// notification, and propagates the error to the caller.
pub struct WaypointStore<P: Persistence> {
    backend: P,
    waypoints: Vec<Waypoint>,
    listeners: Vec<Listener>,
}

impl<P: Persistence> WaypointStore<P> {
    pub fn new(backend: P) -> Self {
        Self {
            backend,
            waypoints: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Current collection, in insertion order.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn backend(&self) -> &P {
        &self.backend
    }

    pub fn find(&self, id: Uuid) -> Option<&Waypoint> {
        self.waypoints.iter().find(|w| w.id == id)
    }

    /// Register a listener for successful mutations.
    ///
    /// No de-duplication: subscribing the same logical listener twice means it
    /// runs twice per notification.
    pub fn subscribe(&mut self, listener: impl FnMut(UpdateType, Option<&Waypoint>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, update: UpdateType, payload: Option<Waypoint>) {
        debug!(?update, listeners = self.listeners.len(), "Store notifying");
        for listener in &mut self.listeners {
            listener(update, payload.as_ref());
        }
    }

    /// Bootstrap the collection from the persistence backend and notify a
    /// full-list change.
    pub async fn init(&mut self) -> Result<(), StoreError> {
        let waypoints = self.backend.load().await?;
        info!(count = waypoints.len(), "Store initialized from backend");
        self.waypoints = waypoints;
        self.notify(UpdateType::Major, None);
        Ok(())
    }

    pub async fn add(&mut self, update: UpdateType, waypoint: Waypoint) -> Result<(), StoreError> {
        let accepted = self.backend.apply(UserAction::Add, &waypoint).await?;
        self.waypoints.push(accepted.clone());
        self.notify(update, Some(accepted));
        Ok(())
    }

    pub async fn update(
        &mut self,
        update: UpdateType,
        waypoint: Waypoint,
    ) -> Result<(), StoreError> {
        let index = self
            .waypoints
            .iter()
            .position(|w| w.id == waypoint.id)
            .ok_or(StoreError::UnknownWaypoint(waypoint.id))?;

        let accepted = self.backend.apply(UserAction::Update, &waypoint).await?;
        self.waypoints[index] = accepted.clone();
        self.notify(update, Some(accepted));
        Ok(())
    }

    pub async fn remove(
        &mut self,
        update: UpdateType,
        waypoint: &Waypoint,
    ) -> Result<(), StoreError> {
        let index = self
            .waypoints
            .iter()
            .position(|w| w.id == waypoint.id)
            .ok_or(StoreError::UnknownWaypoint(waypoint.id))?;

        self.backend.apply(UserAction::Remove, waypoint).await?;
        let removed = self.waypoints.remove(index);
        self.notify(update, Some(removed));
        Ok(())
    }
}
