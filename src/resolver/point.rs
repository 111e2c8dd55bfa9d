use crate::display::NodeId;

/// Which walk ran out of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkPhase {
    Lines,
    Columns,
}

/// A failed resolution and how far counting got before the tree ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Miss {
    pub phase: WalkPhase,
    pub counted: usize,
}

impl Miss {
    pub fn lines(counted: usize) -> Self {
        Self {
            phase: WalkPhase::Lines,
            counted,
        }
    }

    pub fn columns(counted: usize) -> Self {
        Self {
            phase: WalkPhase::Columns,
            counted,
        }
    }
}

impl std::fmt::Display for Miss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.phase {
            WalkPhase::Lines => write!(f, "only {} lines rendered", self.counted),
            WalkPhase::Columns => write!(f, "only {} characters left on line", self.counted),
        }
    }
}

/// Outcome of resolving a (line, column) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPoint {
    /// `offset` is a character offset into the text unit, `0..=len`.
    Found { unit: NodeId, offset: usize },
    NotFound(Miss),
}

impl TextPoint {
    pub fn found(self) -> Option<(NodeId, usize)> {
        match self {
            TextPoint::Found { unit, offset } => Some((unit, offset)),
            TextPoint::NotFound(_) => None,
        }
    }

    pub fn into_result(self) -> Result<(NodeId, usize), Miss> {
        match self {
            TextPoint::Found { unit, offset } => Ok((unit, offset)),
            TextPoint::NotFound(miss) => Err(miss),
        }
    }
}
