mod effect;
mod error;
mod highlighter;
mod range;
mod srcref;

pub use effect::{EffectSink, EffectStats, EffectTimeline, HighlightEffect};
pub use error::{Endpoint, HighlightError};
pub use highlighter::{HighlightOutcome, SpanHighlighter};
pub use range::{Boundary, SpanRange};
pub use srcref::{SourceRef, SourceRefParseError};
