use crate::math::Vector3;

/// A location on a walk surface: a triangle plus barycentric weights.
///
/// When the point lies on an edge, `weights.z == 0.0` and
/// `(indices[0], indices[1])` is that edge, ordered in the direction it is
/// being exited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkPoint {
    /// Vertex indices of the triangle.
    pub indices: [u32; 3],
    /// Barycentric weights matching `indices`.
    pub weights: Vector3,
}

impl WalkPoint {
    /// Creates a walk point from triangle indices and weights.
    #[must_use]
    pub fn new(indices: [u32; 3], weights: Vector3) -> Self {
        Self { indices, weights }
    }

    /// Returns `true` when the point sits on the edge `(indices[0], indices[1])`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_on_edge(&self) -> bool {
        self.weights.z == 0.0
    }

    /// The edge `(indices[0], indices[1])`.
    #[must_use]
    pub fn edge(&self) -> (u32, u32) {
        (self.indices[0], self.indices[1])
    }
}
