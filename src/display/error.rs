use super::NodeId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error("node {0} does not belong to this tree")]
    UnknownNode(NodeId),
    #[error("node {0} is not a container")]
    NotAContainer(NodeId),
    #[error("node {0} is not a text unit")]
    NotText(NodeId),
    #[error("offset {offset} is outside text unit {node} of length {len}")]
    OffsetOutOfBounds {
        node: NodeId,
        offset: usize,
        len: usize,
    },
    #[error("children {start}..{end} are outside container {parent} with {len} children")]
    ChildRangeOutOfBounds {
        parent: NodeId,
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("id {0:?} is already taken")]
    DuplicateId(String),
}
