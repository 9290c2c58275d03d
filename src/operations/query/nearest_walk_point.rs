use crate::error::MeshError;
use crate::math::{barycentric_weights, closest_point_on_segment, Point3, Vector3};
use crate::mesh::{WalkMesh, WalkPoint};

/// Finds the walk point closest to a world position.
pub struct NearestWalkPoint {
    point: Point3,
}

impl NearestWalkPoint {
    /// Creates a new `NearestWalkPoint` query.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self { point }
    }

    /// Executes the query by scanning every triangle of the surface.
    ///
    /// A projection that lands inside a triangle is a candidate on its own;
    /// otherwise each of the triangle's edges is clamped against. On ties the
    /// first candidate found is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface has no triangles.
    pub fn execute(&self, mesh: &WalkMesh) -> Result<WalkPoint, MeshError> {
        let mut closest: Option<(WalkPoint, f64)> = None;
        let mut consider = |candidate: WalkPoint, dis2: f64| match closest {
            Some((_, best)) if dis2 >= best => {}
            _ => closest = Some((candidate, dis2)),
        };

        for &tri in mesh.triangles() {
            let [a, b, c] = mesh.corners(&tri);
            let weights = barycentric_weights(a, b, c, &self.point);

            if weights.iter().all(|&w| w >= 0.0) {
                let candidate = WalkPoint::new(tri, weights);
                let dis2 = (self.point - mesh.to_world_point(&candidate)).norm_squared();
                consider(candidate, dis2);
            } else {
                let [x, y, z] = tri;
                for indices in [[x, y, z], [y, z, x], [z, x, y]] {
                    let [a, b, _] = mesh.corners(&indices);
                    let (on_edge, t) = closest_point_on_segment(a, b, &self.point);
                    let candidate = WalkPoint::new(indices, Vector3::new(1.0 - t, t, 0.0));
                    consider(candidate, (self.point - on_edge).norm_squared());
                }
            }
        }

        closest.map(|(wp, _)| wp).ok_or(MeshError::EmptySurface)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::mesh::fixtures;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn point_above_triangle_snaps_straight_down() {
        let mesh = fixtures::single_triangle();
        let wp = mesh.nearest_walk_point(&p(0.2, 0.2, 5.0)).unwrap();
        assert_eq!(wp.indices, [0, 1, 2]);
        assert_abs_diff_eq!(wp.weights, Vector3::new(0.6, 0.2, 0.2), epsilon = 1e-12);
        assert!(wp.weights.iter().all(|&w| w >= 0.0));
    }

    #[test]
    fn point_outside_snaps_to_edge() {
        let mesh = fixtures::single_triangle();
        let wp = mesh.nearest_walk_point(&p(0.5, -3.0, 1.0)).unwrap();
        assert!(wp.is_on_edge());
        assert_abs_diff_eq!(wp.weights.sum(), 1.0, epsilon = 1e-12);
        assert!(wp.weights.iter().all(|&w| w >= -1e-5));
        assert_abs_diff_eq!(mesh.to_world_point(&wp), p(0.5, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn point_past_corner_snaps_to_vertex() {
        let mesh = fixtures::single_triangle();
        let wp = mesh.nearest_walk_point(&p(-2.0, -1.0, 0.0)).unwrap();
        assert_abs_diff_eq!(mesh.to_world_point(&wp), p(0.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn picks_closest_triangle() {
        let mesh = fixtures::strip();
        let wp = mesh.nearest_walk_point(&p(3.6, 0.3, 0.5)).unwrap();
        assert_abs_diff_eq!(mesh.to_world_point(&wp), p(3.6, 0.3, 0.0), epsilon = 1e-12);
        for &i in &wp.indices {
            assert!((i as usize) < mesh.vertices().len());
        }
    }

    #[test]
    fn snapping_a_surface_point_is_stable() {
        let mesh = fixtures::ramp();
        let samples = [
            WalkPoint::new([0, 1, 2], Vector3::new(0.5, 0.25, 0.25)),
            WalkPoint::new([2, 1, 3], Vector3::new(0.2, 0.3, 0.5)),
            WalkPoint::new([2, 1, 3], Vector3::new(0.1, 0.1, 0.8)),
        ];
        for wp in samples {
            let world = mesh.to_world_point(&wp);
            let snapped = mesh.nearest_walk_point(&world).unwrap();
            assert_abs_diff_eq!(mesh.to_world_point(&snapped), world, epsilon = 1e-9);
        }
    }

    #[test]
    fn empty_surface_is_an_error() {
        let mesh = WalkMesh::new(vec![], vec![], vec![]).unwrap();
        let err = mesh.nearest_walk_point(&p(0.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, MeshError::EmptySurface));
    }
}
