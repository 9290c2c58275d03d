use crate::math::{Point3, UnitQuaternion, Vector3};

/// World placement of a walking entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World position.
    pub position: Point3,
    /// World orientation.
    pub rotation: UnitQuaternion,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }
}

impl Transform {
    /// Creates a transform from a position and an orientation.
    #[must_use]
    pub fn new(position: Point3, rotation: UnitQuaternion) -> Self {
        Self { position, rotation }
    }

    /// Creates an unrotated transform at `position`.
    #[must_use]
    pub fn from_position(position: Point3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Rotates a local direction into world space.
    #[must_use]
    pub fn direction_to_world(&self, local: &Vector3) -> Vector3 {
        self.rotation * local
    }

    /// World direction of the local axis `axis`.
    #[must_use]
    pub fn up(&self, axis: &Vector3) -> Vector3 {
        self.direction_to_world(axis)
    }
}
