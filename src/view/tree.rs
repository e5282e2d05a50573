use super::{RenderPosition, ViewError};

/// Handle to a node in a `ViewTree`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Transient visual effect recorded on a node for the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Shake,
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    content: String,
    effect: Option<Effect>,
}

/// Arena of mounted view nodes.
///
/// The display tree the lifecycle primitives operate on. Nodes are plain
/// content rows plus containers; there is no markup and no in-place attribute
/// mutation, every visual change swaps a rebuilt node in at the same position.
#[derive(Debug, Default)]
pub struct ViewTree {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached node with the given content.
    pub fn create_node(&mut self, content: impl Into<String>) -> NodeId {
        let node = Node {
            parent: None,
            children: Vec::new(),
            content: content.into(),
            effect: None,
        };
        match self.free.pop() {
            Some(index) => {
                self.nodes[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.get(id.0).map_or(false, Option::is_some)
    }

    /// True when the node is attached to a parent.
    pub fn is_mounted(&self, id: NodeId) -> bool {
        self.get(id).map_or(false, |node| node.parent.is_some())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id).map(|node| node.children.clone()).unwrap_or_default()
    }

    pub fn content(&self, id: NodeId) -> Option<&str> {
        Some(self.get(id)?.content.as_str())
    }

    pub fn effect(&self, id: NodeId) -> Option<Effect> {
        self.get(id)?.effect
    }

    pub fn set_effect(&mut self, id: NodeId, effect: Effect) {
        if let Some(node) = self.get_mut(id) {
            node.effect = Some(effect);
        }
    }

    /// Consume a node's transient effect (renderer-side).
    pub fn take_effect(&mut self, id: NodeId) -> Option<Effect> {
        self.get_mut(id)?.effect.take()
    }

    /// Attach a detached (or re-attach a mounted) node under a container.
    pub fn attach(&mut self, child: NodeId, container: NodeId, position: RenderPosition) {
        if !self.contains(child) || !self.contains(container) {
            return;
        }
        self.detach(child);
        match position {
            RenderPosition::BeforeFirstChild => {
                if let Some(node) = self.get_mut(container) {
                    node.children.insert(0, child);
                }
            }
            RenderPosition::AfterLastChild => {
                if let Some(node) = self.get_mut(container) {
                    node.children.push(child);
                }
            }
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(container);
        }
    }

    /// Detach a node from its parent, preserving sibling order around it.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.get(id).and_then(|node| node.parent) else {
            return;
        };
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.retain(|child| *child != id);
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
    }

    /// Substitute `new` for `old` at the same child index.
    ///
    /// Fails if `old` is not mounted. `old` ends up detached but alive; the
    /// caller decides when to release it.
    pub fn substitute(&mut self, new: NodeId, old: NodeId) -> Result<(), ViewError> {
        if !self.contains(new) {
            return Err(ViewError::InvalidReplacement);
        }
        let parent = self
            .get(old)
            .and_then(|node| node.parent)
            .ok_or(ViewError::InvalidReplacement)?;

        self.detach(new);
        let parent_node = self.get_mut(parent).ok_or(ViewError::InvalidReplacement)?;
        let index = parent_node
            .children
            .iter()
            .position(|child| *child == old)
            .ok_or(ViewError::InvalidReplacement)?;
        parent_node.children[index] = new;

        if let Some(node) = self.get_mut(old) {
            node.parent = None;
        }
        if let Some(node) = self.get_mut(new) {
            node.parent = Some(parent);
        }
        Ok(())
    }

    /// Rebuild a node with new content, keeping its tree position.
    ///
    /// Returns the replacement node, or `None` when the old id is stale.
    pub fn rebuild(&mut self, old: NodeId, content: impl Into<String>) -> Option<NodeId> {
        if !self.contains(old) {
            return None;
        }
        let new = self.create_node(content);
        if self.is_mounted(old) {
            // old is mounted and new is fresh, substitution cannot fail
            self.substitute(new, old).ok()?;
        }
        self.release(old);
        Some(new)
    }

    /// Detach a node and free it together with its subtree.
    pub fn release(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        self.detach(id);
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(|slot| slot.take()) {
                pending.extend(node.children);
                self.free.push(current.0);
            }
        }
    }

    /// Number of live nodes (containers included).
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Indented plain-text dump of a subtree, for logging and demos.
    pub fn render_to_string(&self, root: NodeId) -> String {
        let mut out = String::new();
        self.render_into(root, 0, &mut out);
        out
    }

    fn render_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&node.content);
        if node.effect == Some(Effect::Shake) {
            out.push_str(" ~shake~");
        }
        out.push('\n');
        for child in &node.children {
            self.render_into(*child, depth + 1, out);
        }
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)?.as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)?.as_mut()
    }
}
