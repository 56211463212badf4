//! Spring-damper edges and the per-edge force accumulation pass.

use crate::config::Material;
use crate::float::Float;
use crate::point::MassPoint;
use crate::vec::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Springs shorter than this are treated as degenerate (direction undefined).
pub const MIN_SPRING_LENGTH: f32 = 1e-12;

/// Spring category, matching the lattice wiring rule that created it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpringKind {
    /// Axis-aligned nearest neighbors.
    Structural,
    /// Face and body diagonals.
    Shear,
    /// Second-nearest axis neighbors.
    Bend,
}

/// An undirected spring between points `a` and `b`, stored once per pair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spring<F: Float> {
    pub a: usize,
    pub b: usize,
    pub rest_length: F,
    pub kind: SpringKind,
}

impl<F: Float> Spring<F> {
    pub fn new(a: usize, b: usize, rest_length: F, kind: SpringKind) -> Self {
        Spring { a, b, rest_length, kind }
    }

    /// Spring whose rest length is the distance between the points' rest positions.
    pub fn between(a: usize, b: usize, points: &[MassPoint<F>], kind: SpringKind) -> Self {
        let rest_length = points[a].rest_position.distance(points[b].rest_position);
        Spring { a, b, rest_length, kind }
    }

    /// Current length of the spring.
    pub fn length(&self, points: &[MassPoint<F>]) -> F {
        points[self.a].position.distance(points[self.b].position)
    }
}

/// Spring plus damping force acting on endpoint A of an A-B spring.
///
/// `L = pos_a - pos_b`:
/// - spring: `-k (|L| - rest) L/|L|`
/// - damping: `-c (dot(vel_a - vel_b, L) / |L|) L/|L|`
///
/// Endpoint B receives the negation. Returns `None` when `|L|` is too small
/// to define a direction or the result is not finite.
pub fn spring_damper_force<F: Float>(
    stiffness: F,
    damping: F,
    rest_length: F,
    pos_a: Vec3<F>,
    pos_b: Vec3<F>,
    vel_a: Vec3<F>,
    vel_b: Vec3<F>,
) -> Option<Vec3<F>> {
    let l = pos_a - pos_b;
    let len = l.length();
    if !len.is_finite() || len <= F::from_f32(MIN_SPRING_LENGTH) {
        return None;
    }
    let dir = l.scale(F::one() / len);
    let spring = dir.scale(-stiffness * (len - rest_length));
    let damper = dir.scale(-damping * ((vel_a - vel_b).dot(l) / len));
    let force = spring + damper;
    if force.is_finite() {
        Some(force)
    } else {
        None
    }
}

/// Add every spring's contribution to both endpoints' accelerations.
///
/// Accelerations must already be reset for this evaluation. Returns the
/// number of degenerate springs whose contribution was clamped to zero.
pub fn accumulate_spring_forces<F: Float>(
    points: &mut [MassPoint<F>],
    springs: &[Spring<F>],
    material: &Material<F>,
) -> usize {
    let inv_mass = material.inv_mass();
    let mut degenerate = 0;

    for s in springs {
        let (a, b) = (&points[s.a], &points[s.b]);
        match spring_damper_force(
            material.stiffness,
            material.damping,
            s.rest_length,
            a.position,
            b.position,
            a.velocity,
            b.velocity,
        ) {
            Some(force) => {
                let acc = force.scale(inv_mass);
                points[s.a].add_acceleration(acc);
                points[s.b].add_acceleration(-acc);
            }
            None => degenerate += 1,
        }
    }

    degenerate
}
