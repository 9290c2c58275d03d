use crate::math::{barycentric_weights, Vector3, TOLERANCE};
use crate::mesh::{WalkMesh, WalkPoint};

/// Result of stepping inside a single triangle.
#[derive(Debug, Clone, Copy)]
pub struct TriangleStep {
    /// Where the step stopped.
    pub end: WalkPoint,
    /// Fraction of the step taken, in `[0, 1]`.
    pub time: f64,
}

impl TriangleStep {
    /// Returns `true` when the whole step stayed inside the triangle.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.time >= 1.0
    }
}

/// Advances a walk point by a world-space step, stopping at the triangle's
/// boundary.
pub struct WalkInTriangle {
    start: WalkPoint,
    step: Vector3,
}

impl WalkInTriangle {
    /// Creates a new `WalkInTriangle` operation.
    #[must_use]
    pub fn new(start: WalkPoint, step: Vector3) -> Self {
        Self { start, step }
    }

    /// Executes the step.
    ///
    /// The target is reprojected into the start triangle's barycentric frame.
    /// If a weight would turn negative, the step stops where the first one
    /// reaches zero; simultaneous crossings go to the lowest coordinate
    /// (x, then y, then z). The returned point then lies on the exited edge
    /// with `weights.z == 0.0` and the edge ordered as the neighboring triangle
    /// winds it, ready for [`CrossEdge`](super::CrossEdge).
    #[must_use]
    pub fn execute(&self, mesh: &WalkMesh) -> TriangleStep {
        let start = self.start;
        if self.step == Vector3::zeros() {
            return TriangleStep {
                end: start,
                time: 1.0,
            };
        }

        let [a, b, c] = mesh.corners(&start.indices);
        let target = barycentric_weights(a, b, c, &(mesh.to_world_point(&start) + self.step));
        let delta = target - start.weights;

        let mut exit: Option<(usize, f64)> = None;
        for k in 0..3 {
            if target[k] >= 0.0 {
                continue;
            }
            // A weight that is already negative and not shrinking exits at once.
            let time = if delta[k] < 0.0 {
                (start.weights[k] / -delta[k]).clamp(0.0, 1.0)
            } else {
                0.0
            };
            match exit {
                Some((_, first)) if time >= first => {}
                _ => exit = Some((k, time)),
            }
        }

        let Some((k, time)) = exit else {
            return TriangleStep {
                end: WalkPoint::new(start.indices, target),
                time: 1.0,
            };
        };

        let w = start.weights + delta * time;
        let [i0, i1, i2] = start.indices;
        let (indices, survivors) = match k {
            0 => ([i2, i1, i0], (w.z, w.y)),
            1 => ([i0, i2, i1], (w.x, w.z)),
            _ => ([i1, i0, i2], (w.y, w.x)),
        };

        let total = survivors.0 + survivors.1;
        let (wa, wb) = if total > TOLERANCE {
            (survivors.0 / total, survivors.1 / total)
        } else {
            survivors
        };

        TriangleStep {
            end: WalkPoint::new(indices, Vector3::new(wa, wb, 0.0)),
            time,
        }
    }
}
