pub mod walk_mesh;
pub mod walk_point;

pub use walk_mesh::{EdgeGeometry, WalkMesh, NORMAL_AGREEMENT};
pub use walk_point::WalkPoint;
