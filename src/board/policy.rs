use crate::model::Waypoint;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Which waypoints the list shows, relative to the current instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    Everything,
    Future,
    Present,
    Past,
}

impl Filter {
    pub const ALL: [Filter; 4] = [
        Filter::Everything,
        Filter::Future,
        Filter::Present,
        Filter::Past,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Filter::Everything => "Everything",
            Filter::Future => "Future",
            Filter::Present => "Present",
            Filter::Past => "Past",
        }
    }

    /// Future starts after `now`, Present contains `now`, Past ended before it.
    pub fn accepts(&self, waypoint: &Waypoint, now: DateTime<Utc>) -> bool {
        match self {
            Filter::Everything => true,
            Filter::Future => waypoint.date_from > now,
            Filter::Present => waypoint.date_from <= now && waypoint.date_to >= now,
            Filter::Past => waypoint.date_to < now,
        }
    }
}

/// How the visible list is ordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Day,
    Time,
    Price,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::Day, SortOrder::Time, SortOrder::Price];

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Day => "Day",
            SortOrder::Time => "Time",
            SortOrder::Price => "Price",
        }
    }

    /// Day: chronological by start. Time: longest first. Price: most
    /// expensive first.
    pub fn compare(&self, a: &Waypoint, b: &Waypoint) -> Ordering {
        match self {
            SortOrder::Day => a.date_from.cmp(&b.date_from),
            SortOrder::Time => b.duration().cmp(&a.duration()),
            SortOrder::Price => b.base_price.cmp(&a.base_price),
        }
    }
}
