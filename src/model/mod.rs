use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;


/// Kind of trip event a waypoint represents.
///
/// Each kind owns its own offer catalog (see `catalog::OfferCatalog`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaypointKind {
    Taxi,
    Bus,
    Train,
    Ship,
    Drive,
    Flight,
    CheckIn,
    Sightseeing,
    Restaurant,
}

impl WaypointKind {
    /// All kinds, in the order the edit form lists them.
    pub const ALL: [WaypointKind; 9] = [
        WaypointKind::Taxi,
        WaypointKind::Bus,
        WaypointKind::Train,
        WaypointKind::Ship,
        WaypointKind::Drive,
        WaypointKind::Flight,
        WaypointKind::CheckIn,
        WaypointKind::Sightseeing,
        WaypointKind::Restaurant,
    ];

    /// Human-readable label for row rendering.
    pub fn label(&self) -> &'static str {
        match self {
            WaypointKind::Taxi => "Taxi",
            WaypointKind::Bus => "Bus",
            WaypointKind::Train => "Train",
            WaypointKind::Ship => "Ship",
            WaypointKind::Drive => "Drive",
            WaypointKind::Flight => "Flight",
            WaypointKind::CheckIn => "Check-in",
            WaypointKind::Sightseeing => "Sightseeing",
            WaypointKind::Restaurant => "Restaurant",
        }
    }
}

/// A single trip waypoint.
///
/// Waypoints are immutable value snapshots: every change derives a new
/// snapshot through the `with_*` constructors rather than mutating fields at
/// call sites, so field invariants stay centralized here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Unique waypoint identifier
    pub id: Uuid,

    /// Trip event kind (scopes the selectable offers)
    pub kind: WaypointKind,

    /// Interval start
    pub date_from: DateTime<Utc>,

    /// Interval end (expected to be >= date_from; checked at the edit-form
    /// boundary, see `view::ValidationError`)
    pub date_to: DateTime<Utc>,

    /// Base price, non-negative by construction
    pub base_price: u32,

    /// Favorite flag
    pub is_favorite: bool,

    /// Foreign key into the destination catalog
    pub destination: Uuid,

    /// Selected offer ids, scoped to `kind`
    pub offers: Vec<Uuid>,
}

impl Waypoint {
    /// Derive a snapshot with the favorite flag replaced.
    pub fn with_favorite(&self, is_favorite: bool) -> Waypoint {
        Waypoint {
            is_favorite,
            ..self.clone()
        }
    }

    /// Derive a snapshot with the base price replaced.
    pub fn with_base_price(&self, base_price: u32) -> Waypoint {
        Waypoint {
            base_price,
            ..self.clone()
        }
    }

    /// Derive a snapshot with both interval bounds replaced.
    pub fn with_dates(&self, date_from: DateTime<Utc>, date_to: DateTime<Utc>) -> Waypoint {
        Waypoint {
            date_from,
            date_to,
            ..self.clone()
        }
    }

    /// Derive a snapshot with the destination replaced.
    pub fn with_destination(&self, destination: Uuid) -> Waypoint {
        Waypoint {
            destination,
            ..self.clone()
        }
    }

    /// Derive a snapshot with the kind replaced and the offer selection
    /// cleared (offers are scoped per kind, so a kind change invalidates it).
    pub fn with_kind(&self, kind: WaypointKind) -> Waypoint {
        Waypoint {
            kind,
            offers: Vec::new(),
            ..self.clone()
        }
    }

    /// Derive a snapshot with the offer selection replaced.
    pub fn with_offers(&self, offers: Vec<Uuid>) -> Waypoint {
        Waypoint {
            offers,
            ..self.clone()
        }
    }

    /// True when the interval bounds are ordered (`date_from <= date_to`).
    pub fn interval_is_ordered(&self) -> bool {
        self.date_from <= self.date_to
    }

    /// Interval duration; zero for inverted intervals.
    pub fn duration(&self) -> chrono::Duration {
        (self.date_to - self.date_from).max(chrono::Duration::zero())
    }
}

/// Kind of mutation a user gesture requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    Add,
    Update,
    Remove,
}

/// How much of the rendered list must be recomputed after a mutation.
///
/// - `Patch`: only the affected row needs a redraw.
/// - `Minor`: the row changed in a way that may affect sort order or filter
///   membership.
/// - `Major`: the list's shape or external context changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    Patch,
    Minor,
    Major,
}

/// Per-presenter display state. At most one presenter per board is `Editing`
/// at any time; the board enforces this on the editor-opened broadcast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Default,
    Editing,
}
