//! Sample data for demos and tests: a small destination catalog, per-kind
//! offer catalogs, and randomized waypoints referencing them.

use crate::catalog::{Destination, DestinationCatalog, Offer, OfferCatalog};
use crate::model::{Waypoint, WaypointKind};
use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;


const CITIES: [(&str, &str); 5] = [
    ("Amsterdam", "Canals, bikes, and narrow brick houses."),
    ("Geneva", "Lakeside city at the foot of the Alps."),
    ("Chamonix", "Mountain resort below Mont Blanc."),
    ("Rotterdam", "Rebuilt port city with bold architecture."),
    ("Oslo", "Fjord capital with a compact center."),
];

/// Build the demo destination catalog.
pub fn destinations() -> Vec<Destination> {
    CITIES
        .iter()
        .map(|(name, description)| Destination {
            id: Uuid::new_v4(),
            name: (*name).to_string(),
            description: (*description).to_string(),
        })
        .collect()
}

/// Build the demo offer catalogs, one per waypoint kind.
pub fn offers() -> Vec<(WaypointKind, Vec<Offer>)> {
    let titled = |entries: &[(&str, u32)]| -> Vec<Offer> {
        entries
            .iter()
            .map(|(title, price)| Offer {
                id: Uuid::new_v4(),
                title: (*title).to_string(),
                price: *price,
            })
            .collect()
    };

    vec![
        (
            WaypointKind::Taxi,
            titled(&[("Order Uber", 20), ("Ride in silence", 5)]),
        ),
        (
            WaypointKind::Flight,
            titled(&[("Add luggage", 50), ("Switch to comfort", 80), ("Add meal", 15)]),
        ),
        (WaypointKind::Train, titled(&[("Book a seat", 10)])),
        (
            WaypointKind::Drive,
            titled(&[("Rent a car", 200), ("Full insurance", 60)]),
        ),
        (WaypointKind::CheckIn, titled(&[("Add breakfast", 30)])),
        (
            WaypointKind::Sightseeing,
            titled(&[("Book tickets", 40), ("Lunch in city", 30)]),
        ),
    ]
}

/// Generate `count` random waypoints against the given catalogs.
///
/// Intervals are always ordered and spread across past, present, and future so
/// every filter has something to show.
pub fn waypoints(
    count: usize,
    destinations: &DestinationCatalog,
    offers: &OfferCatalog,
    destination_ids: &[Uuid],
) -> Vec<Waypoint> {
    let mut rng = rand::thread_rng();
    let mut generated = Vec::with_capacity(count);
    for index in 0..count {
        let kind = *WaypointKind::ALL
            .choose(&mut rng)
            .unwrap_or(&WaypointKind::Taxi);
        let destination = destination_ids
            .choose(&mut rng)
            .copied()
            .unwrap_or_else(Uuid::new_v4);

        // Spread starts from two days back to a week ahead
        let offset = Duration::hours(rng.gen_range(-48..168) + index as i64);
        let date_from = Utc::now() + offset;
        let date_to = date_from + Duration::minutes(rng.gen_range(30..2880));

        let available = offers.offers_for(kind);
        let picked = available
            .iter()
            .filter(|_| rng.gen_bool(0.5))
            .map(|offer| offer.id)
            .collect();

        debug_assert!(destinations.contains(destination) || destination_ids.is_empty());
        generated.push(Waypoint {
            id: Uuid::new_v4(),
            kind,
            date_from,
            date_to,
            base_price: rng.gen_range(20..1500),
            is_favorite: rng.gen_bool(0.3),
            destination,
            offers: picked,
        });
    }
    generated
}
