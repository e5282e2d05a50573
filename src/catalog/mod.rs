use crate::model::WaypointKind;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;


/// A destination a waypoint can reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

impl Destination {
    /// Empty placeholder returned for unknown destination ids.
    ///
    /// A miss is logged but not raised as an error: rows for waypoints with
    /// dangling destination references still render, with an empty name.
    pub fn placeholder(id: Uuid) -> Destination {
        Destination {
            id,
            name: String::new(),
            description: String::new(),
        }
    }
}

/// Read-only id -> destination mapping, queried during view rebuilds.
#[derive(Debug, Default)]
pub struct DestinationCatalog {
    inner: DashMap<Uuid, Destination>,
}

impl DestinationCatalog {
    pub fn new(destinations: Vec<Destination>) -> Self {
        let inner = DashMap::new();
        for destination in destinations {
            inner.insert(destination.id, destination);
        }
        Self { inner }
    }

    /// Look up a destination, falling back to an empty placeholder on a miss.
    pub fn get(&self, id: Uuid) -> Destination {
        match self.inner.get(&id) {
            Some(destination) => destination.clone(),
            None => {
                warn!(destination_id = %id, "Unknown destination, rendering placeholder");
                Destination::placeholder(id)
            }
        }
    }

    /// True when the id resolves to a real catalog entry.
    pub fn contains(&self, id: Uuid) -> bool {
        self.inner.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// An extra service that can be attached to a waypoint of a given kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: Uuid,
    pub title: String,
    pub price: u32,
}

/// Read-only per-kind offer catalogs. An offer belongs to exactly one kind.
#[derive(Debug, Default)]
pub struct OfferCatalog {
    by_kind: DashMap<WaypointKind, Vec<Offer>>,
}

impl OfferCatalog {
    pub fn new(catalogs: Vec<(WaypointKind, Vec<Offer>)>) -> Self {
        let by_kind = DashMap::new();
        for (kind, offers) in catalogs {
            by_kind.insert(kind, offers);
        }
        Self { by_kind }
    }

    /// All offers available for a kind; empty for kinds with no catalog.
    pub fn offers_for(&self, kind: WaypointKind) -> Vec<Offer> {
        self.by_kind
            .get(&kind)
            .map(|offers| offers.clone())
            .unwrap_or_default()
    }

    /// The subset of a kind's offers matching the given selection, in catalog
    /// order. Ids from other kinds' catalogs are ignored.
    pub fn selected(&self, kind: WaypointKind, selection: &[Uuid]) -> Vec<Offer> {
        self.offers_for(kind)
            .into_iter()
            .filter(|offer| selection.contains(&offer.id))
            .collect()
    }
}
