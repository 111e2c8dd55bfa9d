use std::fmt;

/// Handle to a node stored in a [`DisplayTree`](super::DisplayTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node carries: a run of characters or a container of children.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Text(String),
    Container {
        tag: String,
        id: Option<String>,
        class: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text(value.into()),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn container(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Container {
                tag: tag.into(),
                id: None,
                class: None,
            },
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    /// Length in characters; containers report zero.
    pub fn char_len(&self) -> usize {
        match &self.kind {
            NodeKind::Text(value) => value.chars().count(),
            NodeKind::Container { .. } => 0,
        }
    }
}
