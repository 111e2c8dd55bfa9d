//! Highlights source references inside a rendered code panel.
//!
//! A [`display::DisplayTree`] holds the rendered code as nested text units
//! and inline token containers. [`resolver::resolve`] turns a 1-based line and
//! 0-based column into a position inside that tree, and
//! [`highlight::SpanHighlighter`] wraps the span named by a
//! [`highlight::SourceRef`] in a marker and restarts its highlight effect.
//! [`showcase::Showcase`] ties a tree, its markers and the panel layout to the
//! messages that request highlights.

pub mod config;
pub mod display;
pub mod highlight;
pub mod layout;
pub mod logging;
pub mod resolver;
pub mod showcase;

pub use config::ShowcaseConfig;
pub use display::{DisplayTree, NodeId};
pub use highlight::{HighlightOutcome, SourceRef, SpanHighlighter};
pub use resolver::{resolve, TextPoint};
pub use showcase::Showcase;
