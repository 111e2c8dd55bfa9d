mod error;
mod node;
mod render;
mod spec;
mod tree;

pub use error::TreeError;
pub use node::{Node, NodeId, NodeKind};
pub use render::{render_source, Tokenize};
pub use spec::NodeSpec;
pub use tree::{Descendants, DisplayTree};
