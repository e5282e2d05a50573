use std::fmt;

mod card;
mod controls;
mod edit;
mod tree;


pub use card::WaypointCardView;
pub use controls::{FiltersView, SortingView};
pub use edit::{EditState, ValidationError, WaypointEditView};
pub use tree::{Effect, NodeId, ViewTree};

/// Where `render` mounts a view inside its container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPosition {
    /// Header-style singletons
    BeforeFirstChild,
    /// Append-only collections
    AfterLastChild,
}

/// Lifecycle-primitive precondition violation.
///
/// A programming error: the operation that hit it is abandoned, not recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewError {
    /// `replace` onto a view that has no mounted root node
    InvalidReplacement,
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::InvalidReplacement => {
                write!(f, "cannot replace a view with no mounted root node")
            }
        }
    }
}

impl std::error::Error for ViewError {}

/// A view owning at most one root node in a `ViewTree`.
///
/// `template` builds the row content from the view's current state; the node
/// itself is created lazily and rebuilt wholesale on every change.
pub trait View {
    fn template(&self) -> String;

    fn node(&self) -> Option<NodeId>;

    fn set_node(&mut self, node: Option<NodeId>);

    /// Root node, created from the template on first access.
    fn ensure_node(&mut self, tree: &mut ViewTree) -> NodeId {
        match self.node() {
            Some(id) if tree.contains(id) => id,
            _ => {
                let id = tree.create_node(self.template());
                self.set_node(Some(id));
                id
            }
        }
    }

    /// Rebuild the root node from the current template, keeping its tree
    /// position when mounted.
    fn rerender(&mut self, tree: &mut ViewTree) {
        let content = self.template();
        let rebuilt = self.node().and_then(|old| tree.rebuild(old, content));
        self.set_node(rebuilt);
    }
}

/// Mount a view's root node into `container` at `position`.
pub fn render(view: &mut dyn View, tree: &mut ViewTree, container: NodeId, position: RenderPosition) {
    let id = view.ensure_node(tree);
    tree.attach(id, container, position);
}

/// Swap `old_view`'s root node for `new_view`'s at the same tree position,
/// preserving sibling order.
///
/// Fails with `InvalidReplacement` when `old_view` has no mounted root node.
/// `old_view` is not released; the caller remains responsible for it.
pub fn replace(
    new_view: &mut dyn View,
    old_view: &dyn View,
    tree: &mut ViewTree,
) -> Result<(), ViewError> {
    let old = old_view
        .node()
        .filter(|id| tree.is_mounted(*id))
        .ok_or(ViewError::InvalidReplacement)?;
    let new = new_view.ensure_node(tree);
    tree.substitute(new, old)
}

/// Unmount a view and release its root node. No-op for unmounted views.
pub fn remove(view: &mut dyn View, tree: &mut ViewTree) {
    if let Some(id) = view.node() {
        tree.release(id);
    }
    view.set_node(None);
}

/// Humanized interval duration for row rendering ("2d 3h 05m", "45m", ...).
pub(crate) fn format_duration(duration: chrono::Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    let (days, hours, mins) = (minutes / 1440, (minutes % 1440) / 60, minutes % 60);
    if days > 0 {
        format!("{}d {}h {:02}m", days, hours, mins)
    } else if hours > 0 {
        format!("{}h {:02}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}
