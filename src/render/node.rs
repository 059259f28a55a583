//! Node registry: the tree the compositor consumes, stored flat by id.
//!
//! Nodes refer to their children by [`NodeId`], never by reference. The
//! registry is owned by whoever builds the tree; the compositor only reads
//! it, and tolerates child ids that are not (yet) registered.

use std::collections::HashMap;

use super::style::Style;

/// Identifier of a node in a [`NodeRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The tree root; laid out like a box.
    Root,
    /// A flex container.
    Box,
    /// A block of text built from its descendants.
    Text,
    /// Styled text nested inside a text node.
    VirtualText,
    /// A raw string.
    TextLeaf,
}

impl NodeKind {
    /// Root and box nodes: painted with background and border, children
    /// laid out by flex.
    #[inline]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Root | Self::Box)
    }

    /// Text and virtual-text nodes: content squashed from descendants.
    #[inline]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Text | Self::VirtualText)
    }
}

/// One node of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// This node's id.
    pub id: NodeId,
    /// Kind of node.
    pub kind: NodeKind,
    /// Children in document order.
    pub children: Vec<NodeId>,
    /// Resolved style.
    pub style: Style,
    /// Raw string, for text leaves.
    pub text: Option<String>,
}

impl Node {
    /// A node without children.
    pub fn new(id: NodeId, kind: NodeKind, style: Style) -> Self {
        Self {
            id,
            kind,
            children: Vec::new(),
            style,
            text: None,
        }
    }

    /// A text leaf holding `text`.
    pub fn leaf(id: NodeId, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(id, NodeKind::TextLeaf, Style::default())
        }
    }
}

/// Flat id → node map.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: HashMap<NodeId, Node>,
    next_id: u32,
}

impl NodeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node, returning the previous one with that id.
    pub fn insert(&mut self, node: Node) -> Option<Node> {
        self.next_id = self.next_id.max(node.id.0.saturating_add(1));
        self.nodes.insert(node.id, node)
    }

    /// Look a node up.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Look a node up mutably.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Whether `id` is registered.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of registered nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the registry is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Registered children of `id` in document order; unknown ids are skipped.
    pub fn children_of(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.get(id)
            .into_iter()
            .flat_map(|node| node.children.iter())
            .filter_map(|child| self.get(*child))
    }

    /// Append `child` to `parent`'s child list. Returns `false` if the
    /// parent is not registered.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.nodes.get_mut(&parent) {
            Some(node) => {
                node.children.push(child);
                true
            }
            None => false,
        }
    }

    /// Remove a node. Its id stays in any parent's child list, where it is
    /// skipped from then on.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.remove(&id)
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Create a root node.
    pub fn add_root(&mut self, style: Style) -> NodeId {
        let id = self.allocate();
        self.insert(Node::new(id, NodeKind::Root, style));
        id
    }

    /// Create a box under `parent`.
    pub fn add_box(&mut self, parent: NodeId, style: Style) -> NodeId {
        self.add_child(parent, NodeKind::Box, style)
    }

    /// Create a text node holding `text` under `parent`.
    pub fn add_text(&mut self, parent: NodeId, style: Style, text: impl Into<String>) -> NodeId {
        let id = self.add_child(parent, NodeKind::Text, style);
        self.add_leaf(id, text);
        id
    }

    /// Create a nested styled run holding `text` under a text node.
    pub fn add_virtual_text(
        &mut self,
        parent: NodeId,
        style: Style,
        text: impl Into<String>,
    ) -> NodeId {
        let id = self.add_child(parent, NodeKind::VirtualText, style);
        self.add_leaf(id, text);
        id
    }

    /// Create a raw text leaf under `parent`.
    pub fn add_leaf(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.allocate();
        self.insert(Node::leaf(id, text));
        self.append_child(parent, id);
        id
    }

    fn add_child(&mut self, parent: NodeId, kind: NodeKind, style: Style) -> NodeId {
        let id = self.allocate();
        self.insert(Node::new(id, kind, style));
        self.append_child(parent, id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_links_children() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default());
        let a = registry.add_box(root, Style::default());
        let text = registry.add_text(a, Style::default(), "hi");

        assert_eq!(registry.get(root).unwrap().children, vec![a]);
        assert_eq!(registry.get(a).unwrap().children, vec![text]);
        let leaf = registry.get(text).unwrap().children[0];
        assert_eq!(registry.get(leaf).unwrap().text.as_deref(), Some("hi"));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_children_of_skips_missing() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default());
        let a = registry.add_box(root, Style::default());
        registry.append_child(root, NodeId(99));
        let b = registry.add_box(root, Style::default());

        let ids: Vec<NodeId> = registry.children_of(root).map(|node| node.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(registry.children_of(NodeId(1000)).count(), 0);
    }

    #[test]
    fn test_insert_advances_allocator() {
        let mut registry = NodeRegistry::new();
        registry.insert(Node::new(NodeId(10), NodeKind::Root, Style::default()));
        let next = registry.add_box(NodeId(10), Style::default());
        assert_eq!(next, NodeId(11));
    }

    #[test]
    fn test_remove_and_append_to_missing() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default());
        let a = registry.add_box(root, Style::default());
        assert!(registry.remove(a).is_some());
        assert!(!registry.contains(a));
        assert!(!registry.append_child(a, root));
        assert_eq!(registry.children_of(root).count(), 0);
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(7).to_string(), "#7");
    }
}
