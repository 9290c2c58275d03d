use nalgebra::Unit;

use crate::collection::{SurfaceId, WalkMeshes};
use crate::error::Result;
use crate::math::{Point3, UnitQuaternion, Vector3};
use crate::mesh::WalkPoint;
use crate::operations::locomotion::{ResolveStep, StepReport};

use super::{LocomotionParams, Transform};

/// Which controller drives a walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkerKind {
    /// Walks on foot.
    Pedestrian,
    /// Drives.
    Vehicle,
}

/// Locomotion state of one controlled entity.
///
/// Each walker names the surface it stands on, so switching surfaces never
/// affects other walkers.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Controller kind.
    pub kind: WalkerKind,
    /// Location on the current surface.
    pub at: WalkPoint,
    /// Surface the walker is resolved against.
    pub surface: SurfaceId,
    /// World placement, rewritten after every step.
    pub transform: Transform,
}

impl Walker {
    /// Places a walker on `surface` at the point nearest to `transform.position`.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface is not in `meshes` or has no triangles.
    pub fn spawn(
        meshes: &WalkMeshes,
        surface: SurfaceId,
        kind: WalkerKind,
        mut transform: Transform,
    ) -> Result<Self> {
        let mesh = meshes.get(surface)?;
        let at = mesh.nearest_walk_point(&transform.position)?;
        transform.position = mesh.to_world_point(&at);
        Ok(Self {
            kind,
            at,
            surface,
            transform,
        })
    }

    /// Moves the walker onto another surface, snapping its current position.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface is not in `meshes` or has no triangles.
    pub fn switch_surface(&mut self, meshes: &WalkMeshes, surface: SurfaceId) -> Result<()> {
        let mesh = meshes.get(surface)?;
        self.at = mesh.nearest_walk_point(&self.transform.position)?;
        self.transform.position = mesh.to_world_point(&self.at);
        self.surface = surface;
        Ok(())
    }

    /// Yaws the walker by `angle` radians about the surface normal under it.
    ///
    /// # Errors
    ///
    /// Returns an error if the walker's surface is not in `meshes`.
    pub fn turn(&mut self, meshes: &WalkMeshes, angle: f64) -> Result<()> {
        let mesh = meshes.get(self.surface)?;
        let normal = Unit::new_normalize(mesh.to_world_smooth_normal(&self.at));
        self.transform.rotation = UnitQuaternion::from_axis_angle(&normal, angle) * self.transform.rotation;
        Ok(())
    }

    /// World displacement for a planar move `(dx, dy)` in the walker's frame.
    ///
    /// Vehicles cannot strafe: their sideways input steers through
    /// [`turn`](Self::turn) instead, so `dx` is ignored.
    #[must_use]
    pub fn local_displacement(&self, dx: f64, dy: f64) -> Vector3 {
        let dx = match self.kind {
            WalkerKind::Pedestrian => dx,
            WalkerKind::Vehicle => 0.0,
        };
        self.transform.direction_to_world(&Vector3::new(dx, dy, 0.0))
    }

    /// Resolves one frame of motion on the walker's surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the walker's surface is not in `meshes`.
    pub fn step(
        &mut self,
        meshes: &WalkMeshes,
        displacement: &Vector3,
        params: &LocomotionParams,
    ) -> Result<StepReport> {
        let mesh = meshes.get(self.surface)?;
        Ok(ResolveStep::new(*displacement)
            .with_params(*params)
            .execute(mesh, self))
    }

    /// Returns `true` if `point` is strictly closer than `radius`.
    #[must_use]
    pub fn within_reach(&self, point: &Point3, radius: f64) -> bool {
        nalgebra::distance(&self.transform.position, point) < radius
    }
}
