mod cross_edge;
mod walk_in_triangle;

pub use cross_edge::{CrossEdge, EdgeCrossing};
pub use walk_in_triangle::{TriangleStep, WalkInTriangle};
