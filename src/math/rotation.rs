use std::f64::consts::PI;

use nalgebra::Unit;

use super::{UnitQuaternion, Vector3, TOLERANCE};

/// Minimal rotation taking the direction of `from` onto the direction of `to`.
///
/// Opposite vectors rotate by half a turn about an arbitrary axis perpendicular
/// to `from`. Zero-length inputs yield the identity.
#[must_use]
pub fn rotation_between(from: &Vector3, to: &Vector3) -> UnitQuaternion {
    if from.norm() < TOLERANCE || to.norm() < TOLERANCE {
        return UnitQuaternion::identity();
    }
    if let Some(rotation) = UnitQuaternion::rotation_between(from, to) {
        return rotation;
    }

    // Anti-parallel: pick any axis orthogonal to `from`.
    let reference = if from.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let axis = Unit::new_normalize(from.cross(&reference));
    UnitQuaternion::from_axis_angle(&axis, PI)
}
