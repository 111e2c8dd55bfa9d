use crate::display::{NodeId, TreeError};
use crate::resolver::Miss;

/// Which end of a source reference failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::End => f.write_str("end"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HighlightError {
    #[error("no code panel with id {0:?} in the display tree")]
    MissingCodeRoot(String),
    #[error("{endpoint} of the reference is not rendered: {miss}")]
    Unresolved { endpoint: Endpoint, miss: Miss },
    #[error("range boundaries sit in different containers ({start} and {end})")]
    StructuralMismatch { start: NodeId, end: NodeId },
    #[error("range start lies after its end")]
    InvertedRange,
    #[error(transparent)]
    Tree(#[from] TreeError),
}
