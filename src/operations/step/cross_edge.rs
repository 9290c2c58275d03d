use crate::math::{rotation_between, UnitQuaternion};
use crate::mesh::{WalkMesh, WalkPoint};

/// Result of trying to cross an edge.
#[derive(Debug, Clone, Copy)]
pub struct EdgeCrossing {
    /// The same world position expressed in the neighboring triangle, or the
    /// start point when the edge is a boundary.
    pub end: WalkPoint,
    /// Rotation from the exited triangle's normal to the entered one's.
    pub rotation: UnitQuaternion,
    /// `false` when the edge is a boundary of the surface.
    pub crossed: bool,
}

/// Moves an edge point into the triangle on the other side of its edge.
pub struct CrossEdge {
    start: WalkPoint,
}

impl CrossEdge {
    /// Creates a new `CrossEdge` operation.
    ///
    /// `start` must lie on an edge (`weights.z == 0.0`).
    #[must_use]
    pub fn new(start: WalkPoint) -> Self {
        Self { start }
    }

    /// Executes the crossing.
    ///
    /// The edge is expected in exit order, i.e. as the neighbor winds it (what
    /// [`WalkInTriangle`](super::WalkInTriangle) produces); an edge given in the
    /// start triangle's own winding is flipped first. The entered point is
    /// indexed `(edge.0, edge.1, neighbor_third)`, which is the neighbor's
    /// winding.
    #[must_use]
    pub fn execute(&self, mesh: &WalkMesh) -> EdgeCrossing {
        let start = self.start;
        debug_assert!(start.is_on_edge(), "cross_edge needs a point on an edge");

        let [x, y, z] = start.indices;
        let (a, b, wa, wb) = if mesh.opposite_vertex(x, y) == Some(z) {
            (y, x, start.weights.y, start.weights.x)
        } else {
            (x, y, start.weights.x, start.weights.y)
        };

        let Some(d) = mesh.opposite_vertex(a, b) else {
            return EdgeCrossing {
                end: start,
                rotation: UnitQuaternion::identity(),
                crossed: false,
            };
        };

        let exited = mesh.winding_normal(&[b, a, z]);
        let entered = mesh.winding_normal(&[a, b, d]);
        let mut end = start;
        end.indices = [a, b, d];
        end.weights.x = wa;
        end.weights.y = wb;

        EdgeCrossing {
            end,
            rotation: rotation_between(&exited, &entered),
            crossed: true,
        }
    }
}
