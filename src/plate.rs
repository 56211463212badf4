//! A movable floor plate that drags the bottom of the jello with it.

use crate::collision::Plane;
use crate::error::{JelloError, Result};
use crate::float::Float;
use crate::lattice::{Face, Lattice};
use crate::vec::Vec3;

/// Square horizontal plate, kinematically constraining a set of lattice points.
///
/// The plate holds point indices, not points. After every lattice rebuild
/// the indices are stale and [`Plate::attach`] must be called again.
#[derive(Clone, Debug)]
pub struct Plate<F: Float> {
    center: Vec3<F>,
    size: F,
    plane: Plane<F>,
    constrained: Vec<usize>,
}

impl<F: Float> Plate<F> {
    pub fn new(center: Vec3<F>, size: F) -> Self {
        let mut plate = Plate {
            center,
            size,
            plane: Plane::new(center, Vec3::new(F::zero(), F::one(), F::zero())),
            constrained: Vec::new(),
        };
        plate.rebuild_plane();
        plate
    }

    fn rebuild_plane(&mut self) {
        let [a, b, c, d] = self.corners();
        self.plane = Plane::from_corners(a, b, c, d);
    }

    pub fn center(&self) -> Vec3<F> {
        self.center
    }

    pub fn size(&self) -> F {
        self.size
    }

    pub fn plane(&self) -> &Plane<F> {
        &self.plane
    }

    /// Corners as top-left, top-right, bottom-left, bottom-right (looking down +y).
    pub fn corners(&self) -> [Vec3<F>; 4] {
        let half = self.size * F::half();
        let zero = F::zero();
        [
            self.center + Vec3::new(-half, zero, -half),
            self.center + Vec3::new(half, zero, -half),
            self.center + Vec3::new(-half, zero, half),
            self.center + Vec3::new(half, zero, half),
        ]
    }

    pub fn constrained_points(&self) -> &[usize] {
        &self.constrained
    }

    /// Constrain the lattice's bottom face to the plate. The points become fixed.
    pub fn attach(&mut self, lattice: &mut Lattice<F>) {
        let bottom = lattice.face(Face::Bottom).to_vec();
        for &index in &bottom {
            lattice.point_mut(index).fix();
        }
        tracing::debug!(points = bottom.len(), "plate attached to bottom face");
        self.constrained = bottom;
    }

    /// Constrain an explicit set of points. The points become fixed.
    ///
    /// Nothing changes if any index is out of bounds.
    pub fn set_constraint_points(&mut self, lattice: &mut Lattice<F>, indices: &[usize]) -> Result<()> {
        let count = lattice.point_count();
        if let Some(&index) = indices.iter().find(|&&i| i >= count) {
            return Err(JelloError::PointOutOfBounds { index, count });
        }
        for &index in indices {
            lattice.point_mut(index).fix();
        }
        self.constrained = indices.to_vec();
        Ok(())
    }

    /// Drop every constraint. Points keep their fixed flag.
    pub fn detach(&mut self) {
        self.constrained.clear();
    }

    /// Translate the plate by `delta` over `dt`.
    ///
    /// Every constrained point moves by `delta` and gets velocity `delta / dt`,
    /// bypassing integration.
    pub fn offset(&mut self, delta: Vec3<F>, dt: F, lattice: &mut Lattice<F>) {
        self.center += delta;
        self.plane.translate(delta);
        let count = lattice.point_count();
        for &index in self.constrained.iter().filter(|&&i| i < count) {
            lattice.point_mut(index).translate(delta, dt);
        }
    }

    /// Move the plate center to `target` over `dt`, carrying constrained points.
    pub fn move_to(&mut self, target: Vec3<F>, dt: F, lattice: &mut Lattice<F>) {
        let delta = target - self.center;
        self.offset(delta, dt, lattice);
    }

    /// Place the plate at `center` without touching any point.
    pub fn reset_to(&mut self, center: Vec3<F>) {
        self.center = center;
        self.rebuild_plane();
    }
}
