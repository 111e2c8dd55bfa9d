use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A source reference in the six-integer form emitted by the R runtime:
/// `[first_line, first_byte, last_line, last_byte, first_col, last_col]`.
///
/// Lines are 1-based and columns 0-based. The byte fields are carried for the
/// identifier only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(pub [u32; 6]);

impl SourceRef {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self([start_line, start_col, end_line, end_col, start_col, end_col])
    }

    pub fn start_line(&self) -> usize {
        self.0[0] as usize
    }

    pub fn end_line(&self) -> usize {
        self.0[2] as usize
    }

    pub fn start_col(&self) -> usize {
        self.0[4] as usize
    }

    pub fn end_col(&self) -> usize {
        self.0[5] as usize
    }

    /// Deterministic marker id for this reference, e.g. `srcref_1,0,1,0,0,3`.
    pub fn marker_id(&self, prefix: &str) -> String {
        format!("{prefix}{self}")
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a},{b},{c},{d},{e},{g}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceRefParseError {
    #[error("expected 6 integers, got {0}")]
    WrongArity(usize),
    #[error("{0:?} is not a non-negative integer")]
    BadInteger(String),
}

impl FromStr for SourceRef {
    type Err = SourceRefParseError;

    /// Accepts the six integers separated by commas and/or whitespace,
    /// optionally wrapped in brackets.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() != 6 {
            return Err(SourceRefParseError::WrongArity(fields.len()));
        }
        let mut values = [0u32; 6];
        for (slot, field) in values.iter_mut().zip(&fields) {
            *slot = field
                .parse()
                .map_err(|_| SourceRefParseError::BadInteger(field.to_string()))?;
        }
        Ok(SourceRef(values))
    }
}
