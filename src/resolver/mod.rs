mod point;
mod walk;

pub use point::{Miss, TextPoint, WalkPhase};
pub use walk::resolve;
