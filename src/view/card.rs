use super::{format_duration, Effect, NodeId, View, ViewTree};
use crate::catalog::{DestinationCatalog, OfferCatalog};
use crate::model::Waypoint;
use std::sync::Arc;

/// Read-only card presentation of a single waypoint.
///
/// Holds no draft state; rebuilt from scratch whenever the snapshot changes.
pub struct WaypointCardView {
    waypoint: Waypoint,
    destinations: Arc<DestinationCatalog>,
    offers: Arc<OfferCatalog>,
    node: Option<NodeId>,
}

impl WaypointCardView {
    pub fn new(
        waypoint: Waypoint,
        destinations: Arc<DestinationCatalog>,
        offers: Arc<OfferCatalog>,
    ) -> Self {
        Self {
            waypoint,
            destinations,
            offers,
            node: None,
        }
    }

    pub fn waypoint(&self) -> &Waypoint {
        &self.waypoint
    }

    /// Transient failure feedback (favorite toggle that did not persist).
    pub fn shake(&mut self, tree: &mut ViewTree) {
        if let Some(id) = self.node {
            tree.set_effect(id, Effect::Shake);
        }
    }
}

impl View for WaypointCardView {
    fn template(&self) -> String {
        let waypoint = &self.waypoint;
        let destination = self.destinations.get(waypoint.destination);
        let selected = self.offers.selected(waypoint.kind, &waypoint.offers);

        let mut row = format!(
            "{} {} — {} ({}) | {} {} | €{}",
            waypoint.date_from.format("%d %b"),
            waypoint.date_from.format("%H:%M"),
            waypoint.date_to.format("%H:%M"),
            format_duration(waypoint.duration()),
            waypoint.kind.label(),
            destination.name,
            waypoint.base_price,
        );
        for offer in &selected {
            row.push_str(&format!(" | +{} €{}", offer.title, offer.price));
        }
        if waypoint.is_favorite {
            row.push_str(" | ★");
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
