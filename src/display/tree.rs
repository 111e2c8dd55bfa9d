use std::collections::HashMap;
use std::ops::Range;

use super::error::TreeError;
use super::node::{Node, NodeId, NodeKind};

/// Ordered tree of text units and containers backing one rendered page.
///
/// Nodes live in an arena and are addressed by [`NodeId`]. Nothing is ever
/// removed from the arena: structural edits only re-parent existing nodes or
/// add new ones, so a handle stays valid for the life of the tree.
#[derive(Debug, Clone)]
pub struct DisplayTree {
    nodes: Vec<Node>,
    root: NodeId,
    ids: HashMap<String, NodeId>,
}

impl DisplayTree {
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![Node::container(root_tag)],
            root: NodeId(0),
            ids: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.nodes.get_mut(id.0).ok_or(TreeError::UnknownNode(id))
    }

    fn require_container(&self, id: NodeId) -> Result<&Node, TreeError> {
        let node = self.get(id).ok_or(TreeError::UnknownNode(id))?;
        if node.is_text() {
            return Err(TreeError::NotAContainer(id));
        }
        Ok(node)
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn append_text(&mut self, parent: NodeId, value: &str) -> Result<NodeId, TreeError> {
        self.require_container(parent)?;
        let child = self.alloc(Node::text(value));
        self.attach(parent, child);
        Ok(child)
    }

    pub fn append_container(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, TreeError> {
        self.require_container(parent)?;
        let child = self.alloc(Node::container(tag));
        self.attach(parent, child);
        Ok(child)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Tags a container with an id and registers it for [`Self::get_element_by_id`].
    pub fn set_id(&mut self, node: NodeId, id: &str) -> Result<(), TreeError> {
        self.require_container(node)?;
        if let Some(existing) = self.ids.get(id) {
            if *existing != node {
                return Err(TreeError::DuplicateId(id.to_string()));
            }
        }
        let previous = match &mut self.get_mut(node)?.kind {
            NodeKind::Container { id: slot, .. } => slot.replace(id.to_string()),
            NodeKind::Text(_) => return Err(TreeError::NotAContainer(node)),
        };
        if let Some(previous) = previous {
            self.ids.remove(&previous);
        }
        self.ids.insert(id.to_string(), node);
        Ok(())
    }

    pub fn set_class(&mut self, node: NodeId, class: &str) -> Result<(), TreeError> {
        match &mut self.get_mut(node)?.kind {
            NodeKind::Container { class: slot, .. } => {
                *slot = Some(class.to_string());
                Ok(())
            }
            NodeKind::Text(_) => Err(TreeError::NotAContainer(node)),
        }
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.kind {
            NodeKind::Text(value) => Some(value),
            NodeKind::Container { .. } => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.kind {
            NodeKind::Container { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.kind {
            NodeKind::Container { id, .. } => id.as_deref(),
            NodeKind::Text(_) => None,
        }
    }

    /// Nodes below `id` in document order, `id` itself excluded.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    /// Number of nodes reachable from the root, the root included.
    pub fn node_count(&self) -> usize {
        self.descendants(self.root).count() + 1
    }

    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(value) = self.text(id) {
            return value.to_string();
        }
        self.descendants(id)
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// Character index of `(unit, offset)` within the flattened text of `scope`.
    pub fn flat_offset(&self, scope: NodeId, unit: NodeId, offset: usize) -> Option<usize> {
        let mut before = 0;
        for node in self.descendants(scope) {
            if node == unit {
                return Some(before + offset);
            }
            if let Some(value) = self.text(node) {
                before += value.chars().count();
            }
        }
        None
    }

    /// Splits a text unit at a character offset.
    ///
    /// `unit` keeps the leading part; the trailing part becomes a new text
    /// unit inserted right after it, whose id is returned.
    pub fn split_text(&mut self, unit: NodeId, offset: usize) -> Result<NodeId, TreeError> {
        let node = self.get(unit).ok_or(TreeError::UnknownNode(unit))?;
        let NodeKind::Text(value) = &node.kind else {
            return Err(TreeError::NotText(unit));
        };
        let len = value.chars().count();
        if offset > len {
            return Err(TreeError::OffsetOutOfBounds {
                node: unit,
                offset,
                len,
            });
        }
        let byte = value
            .char_indices()
            .nth(offset)
            .map(|(b, _)| b)
            .unwrap_or(value.len());
        let tail = value[byte..].to_string();
        let parent = node.parent.ok_or(TreeError::UnknownNode(unit))?;
        let index = self
            .index_in_parent(unit)
            .ok_or(TreeError::UnknownNode(unit))?;

        if let NodeKind::Text(value) = &mut self.get_mut(unit)?.kind {
            value.truncate(byte);
        }
        let rest = self.alloc(Node::text(tail));
        self.nodes[rest.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(index + 1, rest);
        Ok(rest)
    }

    /// Moves `parent`'s children in `range` under a new container placed where
    /// the range began. An empty range yields an empty container.
    pub fn wrap_children(
        &mut self,
        parent: NodeId,
        range: Range<usize>,
        tag: &str,
    ) -> Result<NodeId, TreeError> {
        let len = self.require_container(parent)?.children.len();
        if range.start > range.end || range.end > len {
            return Err(TreeError::ChildRangeOutOfBounds {
                parent,
                start: range.start,
                end: range.end,
                len,
            });
        }
        let wrapper = self.alloc(Node::container(tag));
        let start = range.start;
        let moved: Vec<NodeId> = self.nodes[parent.0].children.drain(range).collect();
        for child in &moved {
            self.nodes[child.0].parent = Some(wrapper);
        }
        self.nodes[wrapper.0].children = moved;
        self.nodes[wrapper.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(start, wrapper);
        Ok(wrapper)
    }
}

pub struct Descendants<'a> {
    tree: &'a DisplayTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let next = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(next).iter().rev().copied());
        Some(next)
    }
}
