use serde::{Deserialize, Serialize};

use super::error::TreeError;
use super::node::{NodeId, NodeKind};
use super::tree::DisplayTree;

/// Serializable description of a display subtree.
///
/// A bare JSON string is a text unit; an object is a container:
///
/// ```json
/// { "tag": "code", "id": "server-r-code", "children": ["x <- ", { "tag": "span", "class": "number", "children": ["1"] }] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Text(String),
    Container {
        tag: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class: Option<String>,
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
}

impl NodeSpec {
    pub fn container(tag: &str, children: Vec<NodeSpec>) -> Self {
        NodeSpec::Container {
            tag: tag.to_string(),
            id: None,
            class: None,
            children,
        }
    }

    pub fn with_id(mut self, value: &str) -> Self {
        if let NodeSpec::Container { id, .. } = &mut self {
            *id = Some(value.to_string());
        }
        self
    }

    pub fn with_class(mut self, value: &str) -> Self {
        if let NodeSpec::Container { class, .. } = &mut self {
            *class = Some(value.to_string());
        }
        self
    }
}

impl From<&str> for NodeSpec {
    fn from(value: &str) -> Self {
        NodeSpec::Text(value.to_string())
    }
}

impl DisplayTree {
    /// Builds a tree whose root is described by `spec`. A text description is
    /// placed under an anonymous `div` root.
    pub fn from_spec(spec: &NodeSpec) -> Result<Self, TreeError> {
        match spec {
            NodeSpec::Text(_) => {
                let mut tree = DisplayTree::new("div");
                let root = tree.root();
                tree.append_spec(root, spec)?;
                Ok(tree)
            }
            NodeSpec::Container {
                tag,
                id,
                class,
                children,
            } => {
                let mut tree = DisplayTree::new(tag);
                let root = tree.root();
                tree.decorate(root, id.as_deref(), class.as_deref())?;
                for child in children {
                    tree.append_spec(root, child)?;
                }
                Ok(tree)
            }
        }
    }

    pub fn append_spec(&mut self, parent: NodeId, spec: &NodeSpec) -> Result<NodeId, TreeError> {
        match spec {
            NodeSpec::Text(value) => self.append_text(parent, value),
            NodeSpec::Container {
                tag,
                id,
                class,
                children,
            } => {
                let node = self.append_container(parent, tag)?;
                self.decorate(node, id.as_deref(), class.as_deref())?;
                for child in children {
                    self.append_spec(node, child)?;
                }
                Ok(node)
            }
        }
    }

    fn decorate(
        &mut self,
        node: NodeId,
        id: Option<&str>,
        class: Option<&str>,
    ) -> Result<(), TreeError> {
        if let Some(id) = id {
            self.set_id(node, id)?;
        }
        if let Some(class) = class {
            self.set_class(node, class)?;
        }
        Ok(())
    }

    pub fn to_spec(&self, node: NodeId) -> Option<NodeSpec> {
        match &self.get(node)?.kind {
            NodeKind::Text(value) => Some(NodeSpec::Text(value.clone())),
            NodeKind::Container { tag, id, class } => Some(NodeSpec::Container {
                tag: tag.clone(),
                id: id.clone(),
                class: class.clone(),
                children: self
                    .children(node)
                    .iter()
                    .filter_map(|c| self.to_spec(*c))
                    .collect(),
            }),
        }
    }
}
