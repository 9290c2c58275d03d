use tracing::{debug, trace};

use crate::locomotion::{LocomotionParams, Walker};
use crate::math::{rotation_between, UnitQuaternion, Vector3};
use crate::mesh::WalkMesh;

/// What happened while resolving one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Walk/cross iterations used.
    pub iterations: u32,
    /// Interior edges crossed.
    pub edges_crossed: u32,
    /// Boundary edges bounced off.
    pub wall_hits: u32,
    /// `true` if the iteration budget ran out before the step was consumed.
    pub truncated: bool,
}

/// Moves a walker across a walk surface by a world-space displacement.
///
/// Repeatedly steps within the current triangle, crossing interior edges and
/// bouncing off boundary edges, for at most `max_iterations` rounds. Then
/// writes the final position back to the walker's transform and tilts its
/// orientation so its up axis follows the smoothed surface normal.
pub struct ResolveStep {
    displacement: Vector3,
    params: LocomotionParams,
}

impl ResolveStep {
    /// Creates a new `ResolveStep` operation with default parameters.
    #[must_use]
    pub fn new(displacement: Vector3) -> Self {
        Self {
            displacement,
            params: LocomotionParams::default(),
        }
    }

    /// Overrides the resolver parameters.
    #[must_use]
    pub fn with_params(mut self, params: LocomotionParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the step. `mesh` must be the surface the walker stands on.
    pub fn execute(&self, mesh: &WalkMesh, walker: &mut Walker) -> StepReport {
        let mut report = StepReport::default();
        let mut at = walker.at;
        let mut remain = self.displacement;

        while report.iterations < self.params.max_iterations {
            if remain == Vector3::zeros() {
                break;
            }
            report.iterations += 1;

            let step = mesh.walk_in_triangle(&at, &remain);
            at = step.end;
            if step.is_complete() {
                remain = Vector3::zeros();
                break;
            }
            remain *= 1.0 - step.time;

            let crossing = mesh.cross_edge(&at);
            if crossing.crossed {
                at = crossing.end;
                remain = crossing.rotation * remain;
                report.edges_crossed += 1;
                continue;
            }

            report.wall_hits += 1;
            let edge = mesh.edge_geometry(&at.indices);
            let d = remain.dot(&edge.inward);
            if d < 0.0 {
                remain += edge.inward * (-self.params.bounce * d);
            } else {
                remain += edge.inward * (self.params.slide_bias * d);
            }
            trace!(edge = ?at.edge(), d, "bounced off boundary edge");
        }

        if remain != Vector3::zeros() {
            report.truncated = true;
            debug!(
                iterations = report.iterations,
                remaining = remain.norm(),
                "step used the full iteration budget"
            );
        }

        walker.at = at;
        walker.transform.position = mesh.to_world_point(&at);

        let up = walker.transform.up(&self.params.up_axis);
        let adjust = rotation_between(&up, &mesh.to_world_smooth_normal(&at));
        walker.transform.rotation =
            UnitQuaternion::new_normalize(adjust.into_inner() * walker.transform.rotation.into_inner());

        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::collection::SurfaceId;
    use crate::locomotion::{Transform, WalkerKind};
    use crate::math::Point3;
    use crate::mesh::fixtures;

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    fn walker_at(mesh: &WalkMesh, position: Point3) -> Walker {
        let at = mesh.nearest_walk_point(&position).unwrap();
        Walker {
            kind: WalkerKind::Pedestrian,
            at,
            surface: SurfaceId::default(),
            transform: Transform::from_position(mesh.to_world_point(&at)),
        }
    }

    #[test]
    fn zero_displacement_does_nothing() {
        let mesh = fixtures::single_triangle();
        let mut walker = walker_at(&mesh, Point3::new(0.25, 0.25, 0.0));
        let before = walker.at;
        let report = ResolveStep::new(Vector3::zeros()).execute(&mesh, &mut walker);
        assert_eq!(report, StepReport::default());
        assert_eq!(walker.at, before);
    }

    #[test]
    fn walks_across_many_triangles() {
        let mesh = fixtures::strip();
        let mut walker = walker_at(&mesh, Point3::new(0.5, 0.4, 0.0));
        let report = ResolveStep::new(v(3.0, 0.0, 0.0)).execute(&mesh, &mut walker);

        assert!(!report.truncated);
        assert_eq!(report.wall_hits, 0);
        assert_eq!(report.edges_crossed, 6);
        assert!(report.iterations <= 10);
        assert_abs_diff_eq!(walker.transform.position, Point3::new(3.5, 0.4, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn bounces_off_wall_without_penetrating() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let mesh = fixtures::single_triangle();
        let mut walker = walker_at(&mesh, Point3::new(0.25, 0.25, 0.0));
        let report = ResolveStep::new(v(0.0, -1.0, 0.0)).execute(&mesh, &mut walker);

        assert_eq!(report.wall_hits, 1);
        assert!(!report.truncated);
        let pos = walker.transform.position;
        assert!(pos.y >= 0.0);
        assert_abs_diff_eq!(pos, Point3::new(0.25, 0.1875, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn slides_along_wall() {
        let mesh = fixtures::single_triangle();
        let mut walker = walker_at(&mesh, Point3::new(0.25, 0.25, 0.0));
        let report = ResolveStep::new(v(0.5, -0.5, 0.0)).execute(&mesh, &mut walker);

        assert_eq!(report.wall_hits, 1);
        let pos = walker.transform.position;
        assert_abs_diff_eq!(pos, Point3::new(0.75, 0.0625, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn budget_exhaustion_truncates_motion() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let mesh = fixtures::strip();
        let mut walker = walker_at(&mesh, Point3::new(0.5, 0.4, 0.0));
        let params = LocomotionParams {
            max_iterations: 2,
            ..LocomotionParams::default()
        };
        let report = ResolveStep::new(v(3.0, 0.0, 0.0))
            .with_params(params)
            .execute(&mesh, &mut walker);

        assert!(report.truncated);
        assert_eq!(report.iterations, 2);
        // Stopped on the first diagonal crossed, at x = 1.4.
        assert_abs_diff_eq!(walker.transform.position, Point3::new(1.4, 0.4, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn climbing_a_fold_tilts_up_axis_onto_normal() {
        let mesh = fixtures::ramp();
        let mut walker = walker_at(&mesh, Point3::new(0.3, 0.3, 0.0));
        let report = ResolveStep::new(v(0.4, 0.4, 0.0)).execute(&mesh, &mut walker);

        assert_eq!(report.edges_crossed, 1);
        assert_eq!(walker.at.indices, [2, 1, 3]);
        assert!(walker.transform.position.z > 0.0);

        let normal = mesh.to_world_smooth_normal(&walker.at);
        assert_abs_diff_eq!(walker.transform.up(&Vector3::z()), normal, epsilon = 1e-9);
    }

    #[test]
    fn crossing_into_a_slope_preserves_step_length() {
        let mesh = fixtures::ramp();
        let mut walker = walker_at(&mesh, Point3::new(0.3, 0.3, 0.0));
        let start = mesh.to_world_point(&walker.at);
        ResolveStep::new(v(0.4, 0.4, 0.0)).execute(&mesh, &mut walker);

        // Half the step on the flat face, half rotated onto the slope.
        let fold = Point3::new(0.5, 0.5, 0.0);
        let flat = (fold - start).norm();
        let slope = (walker.transform.position - fold).norm();
        assert_abs_diff_eq!(flat + slope, v(0.4, 0.4, 0.0).norm(), epsilon = 1e-9);
    }
}
