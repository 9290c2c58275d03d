pub mod transform;
pub mod walker;

pub use transform::Transform;
pub use walker::{Walker, WalkerKind};

use crate::math::Vector3;

/// Parameters of the per-frame locomotion resolver.
#[derive(Debug, Clone, Copy)]
pub struct LocomotionParams {
    /// Upper bound on walk/cross iterations per step.
    pub max_iterations: u32,
    /// Scale of the inward push when a step runs into a boundary edge.
    pub bounce: f64,
    /// Scale of the inward nudge when a step runs along a boundary edge.
    pub slide_bias: f64,
    /// Entity-local axis kept aligned with the surface normal.
    pub up_axis: Vector3,
}

impl Default for LocomotionParams {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            bounce: 1.25,
            slide_bias: 0.01,
            up_axis: Vector3::z(),
        }
    }
}
