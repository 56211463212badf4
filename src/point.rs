//! Point masses of the jello lattice.

use crate::float::Float;
use crate::vec::Vec3;

/// A single simulated particle.
///
/// Mass is uniform across the lattice and lives in [`Material`](crate::config::Material),
/// so a point only carries its kinematic state. Springs are stored by the
/// lattice as index pairs; a point never references its neighbors directly.
#[derive(Clone, Debug, PartialEq)]
pub struct MassPoint<F: Float> {
    /// Grid coordinate at construction. Only used to derive rest lengths.
    pub rest_position: Vec3<F>,
    pub position: Vec3<F>,
    pub velocity: Vec3<F>,
    pub acceleration: Vec3<F>,
    /// Force injected for the current step; overwritten, never accumulated.
    pub external_force: Vec3<F>,
    pub fixed: bool,
    pub surface: bool,
}

impl<F: Float> MassPoint<F> {
    pub fn new(rest_position: Vec3<F>, surface: bool) -> Self {
        MassPoint {
            rest_position,
            position: rest_position,
            velocity: Vec3::zero(),
            acceleration: Vec3::zero(),
            external_force: Vec3::zero(),
            fixed: false,
            surface,
        }
    }

    /// A free point with an initial velocity, outside any lattice.
    pub fn with_velocity(position: Vec3<F>, velocity: Vec3<F>) -> Self {
        MassPoint {
            velocity,
            ..MassPoint::new(position, false)
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn is_surface(&self) -> bool {
        self.surface
    }

    pub fn fix(&mut self) {
        self.fixed = true;
    }

    /// Overwrite the external force. Fixed points ignore it.
    pub fn set_external_force(&mut self, force: Vec3<F>) {
        if !self.fixed {
            self.external_force = force;
        }
    }

    /// Start a new force evaluation: acceleration becomes `external_force / mass`.
    pub fn reset_acceleration(&mut self, inv_mass: F) {
        self.acceleration = self.external_force.scale(inv_mass);
    }

    pub fn add_acceleration(&mut self, acc: Vec3<F>) {
        self.acceleration += acc;
    }

    /// Displace the point kinematically, bypassing integration.
    ///
    /// The velocity becomes `delta / dt`, or zero when `dt` is not positive.
    pub fn translate(&mut self, delta: Vec3<F>, dt: F) {
        self.position += delta;
        self.velocity = if dt > F::zero() {
            delta.scale(F::one() / dt)
        } else {
            Vec3::zero()
        };
    }

    /// True when position and velocity hold no NaN or infinity.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}
