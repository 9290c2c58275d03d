pub mod collection;
pub mod error;
pub mod locomotion;
pub mod math;
pub mod mesh;
pub mod operations;

pub use collection::{SurfaceId, WalkMeshes};
pub use error::{Result, WalkError};
pub use locomotion::{LocomotionParams, Transform, Walker, WalkerKind};
pub use mesh::{WalkMesh, WalkPoint};
