use crate::display::{DisplayTree, NodeId, TreeError};

use super::error::{Endpoint, HighlightError};

/// One end of a span to wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Inside a text unit, at a character offset.
    At { unit: NodeId, offset: usize },
    /// Just before a node.
    Before(NodeId),
    /// Just after a node.
    After(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanRange {
    pub start: Boundary,
    pub end: Boundary,
}

impl SpanRange {
    /// Chooses boundaries for the span between two resolved text points.
    ///
    /// | parent is inline wrapper | same unit as other end | boundary            |
    /// |--------------------------|------------------------|---------------------|
    /// | yes                      | no                     | outside the wrapper |
    /// | yes                      | yes                    | exact offset        |
    /// | no                       | either                 | exact offset        |
    pub fn between(
        tree: &DisplayTree,
        code_root: NodeId,
        wrapper_tag: &str,
        start: (NodeId, usize),
        end: (NodeId, usize),
    ) -> Self {
        let same_unit = start.0 == end.0;
        let wrapper_of = |unit: NodeId| {
            tree.parent(unit)
                .filter(|p| *p != code_root && tree.tag(*p) == Some(wrapper_tag))
        };
        let pick = |edge: Endpoint, (unit, offset): (NodeId, usize)| {
            match (wrapper_of(unit), same_unit, edge) {
                (Some(wrapper), false, Endpoint::Start) => Boundary::Before(wrapper),
                (Some(wrapper), false, Endpoint::End) => Boundary::After(wrapper),
                _ => Boundary::At { unit, offset },
            }
        };
        Self {
            start: pick(Endpoint::Start, start),
            end: pick(Endpoint::End, end),
        }
    }

    /// Wraps the range in a new container, splitting boundary text units as
    /// needed. Nothing is mutated unless the range can be wrapped whole.
    pub fn surround(
        &self,
        tree: &mut DisplayTree,
        tag: &str,
        id: &str,
    ) -> Result<NodeId, HighlightError> {
        let start = Slot::locate(tree, self.start)?;
        let end = Slot::locate(tree, self.end)?;
        if start.container != end.container {
            return Err(HighlightError::StructuralMismatch {
                start: start.container,
                end: end.container,
            });
        }
        if start.order > end.order {
            return Err(HighlightError::InvertedRange);
        }

        // Split the end first so the start's unit and offset stay valid.
        if let Some((unit, offset)) = end.split {
            tree.split_text(unit, offset)?;
        }
        let start = Slot::locate(tree, self.start)?;
        let mut end_index = end.index;
        if let Some((unit, offset)) = start.split {
            tree.split_text(unit, offset)?;
            end_index += 1;
        }

        let marker = tree.wrap_children(start.container, start.index..end_index, tag)?;
        tree.set_id(marker, id)?;
        Ok(marker)
    }
}

/// A boundary expressed as a child index within its container.
struct Slot {
    container: NodeId,
    index: usize,
    /// Text unit and offset to split before `index` is valid.
    split: Option<(NodeId, usize)>,
    order: (usize, usize),
}

impl Slot {
    fn locate(tree: &DisplayTree, boundary: Boundary) -> Result<Self, HighlightError> {
        let node = match boundary {
            Boundary::At { unit, .. } | Boundary::Before(unit) | Boundary::After(unit) => unit,
        };
        let detached = || TreeError::UnknownNode(node);
        let container = tree.parent(node).ok_or_else(detached)?;
        let index = tree.index_in_parent(node).ok_or_else(detached)?;

        let slot = match boundary {
            Boundary::Before(_) => Slot {
                container,
                index,
                split: None,
                order: (index, 0),
            },
            Boundary::After(_) => Slot {
                container,
                index: index + 1,
                split: None,
                order: (index, usize::MAX),
            },
            Boundary::At { unit, offset } => {
                let len = tree.get(unit).map(|n| n.char_len()).unwrap_or(0);
                let (slot_index, split) = if offset == 0 {
                    (index, None)
                } else if offset >= len {
                    (index + 1, None)
                } else {
                    (index + 1, Some((unit, offset)))
                };
                Slot {
                    container,
                    index: slot_index,
                    split,
                    order: (index, offset),
                }
            }
        };
        Ok(slot)
    }
}
