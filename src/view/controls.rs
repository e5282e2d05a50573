use super::{NodeId, View};
use crate::board::policy::{Filter, SortOrder};

/// Static filter selector rendered once above the list.
pub struct FiltersView {
    active: Filter,
    node: Option<NodeId>,
}

impl FiltersView {
    pub fn new(active: Filter) -> Self {
        Self { active, node: None }
    }

    pub fn set_active(&mut self, active: Filter) {
        self.active = active;
    }
}

impl View for FiltersView {
    fn template(&self) -> String {
        let mut row = String::from("filters:");
        for filter in Filter::ALL {
            let mark = if filter == self.active { "*" } else { " " };
            row.push_str(&format!(" [{}{}]", mark, filter.label()));
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

/// Static sort selector rendered once above the list.
pub struct SortingView {
    active: SortOrder,
    node: Option<NodeId>,
}

impl SortingView {
    pub fn new(active: SortOrder) -> Self {
        Self { active, node: None }
    }

    pub fn set_active(&mut self, active: SortOrder) {
        self.active = active;
    }
}

impl View for SortingView {
    fn template(&self) -> String {
        let mut row = String::from("sort:");
        for order in SortOrder::ALL {
            let mark = if order == self.active { "*" } else { " " };
            row.push_str(&format!(" [{}{}]", mark, order.label()));
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
