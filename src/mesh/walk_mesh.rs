use std::collections::HashMap;

use crate::error::MeshError;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::operations::query::NearestWalkPoint;
use crate::operations::step::{CrossEdge, EdgeCrossing, TriangleStep, WalkInTriangle};

use super::WalkPoint;

/// Minimum dot product between a triangle's geometric normal and the stored
/// normal of each of its vertices.
pub const NORMAL_AGREEMENT: f64 = 0.1;

/// Local frame of a triangle edge, used for wall response.
#[derive(Debug, Clone, Copy)]
pub struct EdgeGeometry {
    /// Unit vector from `indices[0]` to `indices[1]`.
    pub along: Vector3,
    /// Unit face normal, oriented with the stored vertex normals.
    pub normal: Vector3,
    /// Unit in-plane vector perpendicular to `along`, pointing into the triangle.
    pub inward: Vector3,
}

/// A triangulated surface that entities walk on.
///
/// Immutable after construction. Every directed edge belongs to at most one
/// triangle, so the neighbor across an edge is found by looking up the
/// reversed edge.
#[derive(Debug, Clone)]
pub struct WalkMesh {
    vertices: Vec<Point3>,
    normals: Vec<Vector3>,
    triangles: Vec<[u32; 3]>,
    next_vertex: HashMap<(u32, u32), u32>,
}

impl WalkMesh {
    /// Builds a walk surface and its edge-adjacency index.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal count differs from the vertex count, a
    /// triangle references a missing vertex, a directed edge is used twice,
    /// a triangle has zero area, or a stored normal disagrees with the winding
    /// of a triangle touching it.
    pub fn new(
        vertices: Vec<Point3>,
        normals: Vec<Vector3>,
        triangles: Vec<[u32; 3]>,
    ) -> Result<Self, MeshError> {
        if vertices.len() != normals.len() {
            return Err(MeshError::MismatchedNormals {
                vertices: vertices.len(),
                normals: normals.len(),
            });
        }

        for (triangle, tri) in triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(MeshError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        let mut next_vertex = HashMap::with_capacity(triangles.len() * 3);
        for &[x, y, z] in &triangles {
            for (a, b, c) in [(x, y, z), (y, z, x), (z, x, y)] {
                if next_vertex.insert((a, b), c).is_some() {
                    return Err(MeshError::DuplicateEdge { a, b });
                }
            }
        }

        let mesh = Self {
            vertices,
            normals,
            triangles,
            next_vertex,
        };
        mesh.check_normals()?;
        Ok(mesh)
    }

    /// Stored normals must agree with the winding of every triangle.
    fn check_normals(&self) -> Result<(), MeshError> {
        for (triangle, tri) in self.triangles.iter().enumerate() {
            let [a, b, c] = self.corners(tri);
            let out = (b - a).cross(&(c - a));
            let len = out.norm();
            if len < TOLERANCE {
                return Err(MeshError::Degenerate { triangle });
            }
            let out = out / len;

            for &vertex in tri {
                let dot = out.dot(&self.normals[vertex as usize]);
                if dot <= NORMAL_AGREEMENT {
                    return Err(MeshError::InconsistentNormal {
                        triangle,
                        vertex,
                        dot,
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns the vertex positions.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Returns the per-vertex normals.
    #[must_use]
    pub fn normals(&self) -> &[Vector3] {
        &self.normals
    }

    /// Returns the triangles as vertex index triples.
    #[must_use]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Third vertex of the triangle that owns the directed edge `(a, b)`.
    #[must_use]
    pub fn opposite_vertex(&self, a: u32, b: u32) -> Option<u32> {
        self.next_vertex.get(&(a, b)).copied()
    }

    /// Positions of the three vertices in `indices`.
    #[must_use]
    pub fn corners(&self, indices: &[u32; 3]) -> [&Point3; 3] {
        indices.map(|i| &self.vertices[i as usize])
    }

    /// World position of a walk point.
    #[must_use]
    pub fn to_world_point(&self, wp: &WalkPoint) -> Point3 {
        let [a, b, c] = self.corners(&wp.indices);
        Point3::from(a.coords * wp.weights.x + b.coords * wp.weights.y + c.coords * wp.weights.z)
    }

    /// Interpolated vertex normal at a walk point, re-normalized.
    #[must_use]
    pub fn to_world_smooth_normal(&self, wp: &WalkPoint) -> Vector3 {
        let [a, b, c] = wp.indices.map(|i| &self.normals[i as usize]);
        (a * wp.weights.x + b * wp.weights.y + c * wp.weights.z).normalize()
    }

    /// Unit normal of the triangle as wound by `indices`.
    ///
    /// Swapping two indices flips the result.
    #[must_use]
    pub fn winding_normal(&self, indices: &[u32; 3]) -> Vector3 {
        let [a, b, c] = self.corners(indices);
        (b - a).cross(&(c - a)).normalize()
    }

    /// Unit face normal of a triangle, independent of index order.
    ///
    /// Oriented to agree with the stored vertex normals.
    #[must_use]
    pub fn face_normal(&self, indices: &[u32; 3]) -> Vector3 {
        let normal = self.winding_normal(indices);
        let stored: Vector3 = indices.iter().map(|&i| self.normals[i as usize]).sum();
        if normal.dot(&stored) < 0.0 {
            -normal
        } else {
            normal
        }
    }

    /// Frame of the edge `(indices[0], indices[1])` within its triangle.
    #[must_use]
    pub fn edge_geometry(&self, indices: &[u32; 3]) -> EdgeGeometry {
        let [a, b, c] = self.corners(indices);
        let along = (b - a).normalize();
        let to_third = c - a;
        let inward = (to_third - along * to_third.dot(&along)).normalize();
        EdgeGeometry {
            along,
            normal: self.face_normal(indices),
            inward,
        }
    }

    /// Closest walk point to `world_point`.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface has no triangles.
    pub fn nearest_walk_point(&self, world_point: &Point3) -> Result<WalkPoint, MeshError> {
        NearestWalkPoint::new(*world_point).execute(self)
    }

    /// Moves `start` by `step` until the step ends or leaves the triangle.
    #[must_use]
    pub fn walk_in_triangle(&self, start: &WalkPoint, step: &Vector3) -> TriangleStep {
        WalkInTriangle::new(*start, *step).execute(self)
    }

    /// Re-expresses an edge point in the triangle across that edge.
    #[must_use]
    pub fn cross_edge(&self, start: &WalkPoint) -> EdgeCrossing {
        CrossEdge::new(*start).execute(self)
    }
}
