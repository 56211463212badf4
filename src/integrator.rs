//! Explicit Euler and classical RK4 integration of the mass-spring system.

use crate::collision::{apply_box_collisions, BoundingBox};
use crate::config::Material;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::point::MassPoint;
use crate::spring::{accumulate_spring_forces, Spring};
use crate::vec::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Numerical scheme used to advance the lattice by one timestep.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Integrator {
    /// One force evaluation: `v += a dt`, then `x += v dt`.
    #[default]
    Euler,
    /// Classical fourth-order Runge-Kutta, four force evaluations per step.
    Rk4,
}

/// Diagnostics gathered during one step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Springs (over all force evaluations) whose force was clamped to zero.
    pub degenerate_springs: usize,
    /// Box face contacts (over all force evaluations).
    pub contacts: usize,
    /// Non-fixed points holding NaN or infinity after the update.
    pub non_finite_points: usize,
}

impl StepStats {
    /// No degeneracy of any kind was seen.
    pub fn is_clean(&self) -> bool {
        self.degenerate_springs == 0 && self.non_finite_points == 0
    }
}

/// Collaborators a force evaluation reads, passed explicitly into every step.
#[derive(Copy, Clone, Debug)]
pub struct Environment<'a, F: Float> {
    pub material: Material<F>,
    pub bounds: Option<&'a BoundingBox<F>>,
}

impl<'a, F: Float> Environment<'a, F> {
    pub fn new(material: Material<F>) -> Self {
        Environment { material, bounds: None }
    }

    pub fn with_bounds(mut self, bounds: &'a BoundingBox<F>) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// Evaluate the total acceleration of every point from its current state.
///
/// Accelerations are reset to `external_force / mass`, then springs and box
/// collisions add their contributions.
pub fn compute_accelerations<F: Float>(
    points: &mut [MassPoint<F>],
    springs: &[Spring<F>],
    env: &Environment<'_, F>,
    stats: &mut StepStats,
) {
    let inv_mass = env.material.inv_mass();
    for p in points.iter_mut() {
        p.reset_acceleration(inv_mass);
    }

    stats.degenerate_springs += accumulate_spring_forces(points, springs, &env.material);

    if let Some(bounds) = env.bounds {
        stats.contacts += apply_box_collisions(points, bounds, &env.material);
    }
}

impl Integrator {
    /// Advance `points` by `dt`. Fixed points are never modified.
    pub fn step<F: Float, O: StepObserver>(
        self,
        points: &mut [MassPoint<F>],
        springs: &[Spring<F>],
        env: &Environment<'_, F>,
        dt: F,
        observer: &mut O,
    ) -> StepStats {
        let mut stats = match self {
            Integrator::Euler => euler(points, springs, env, dt, observer),
            Integrator::Rk4 => rk4(points, springs, env, dt, observer),
        };
        observer.on_integrate();

        stats.non_finite_points = points.iter().filter(|p| !p.fixed && !p.is_finite()).count();
        if !stats.is_clean() {
            tracing::warn!(
                integrator = ?self,
                degenerate_springs = stats.degenerate_springs,
                non_finite_points = stats.non_finite_points,
                "numerical degeneracy during step"
            );
        }

        observer.on_step_complete(&stats);
        stats
    }
}

fn euler<F: Float, O: StepObserver>(
    points: &mut [MassPoint<F>],
    springs: &[Spring<F>],
    env: &Environment<'_, F>,
    dt: F,
    observer: &mut O,
) -> StepStats {
    let mut stats = StepStats::default();
    compute_accelerations(points, springs, env, &mut stats);
    observer.on_forces_evaluated(0);

    for p in points.iter_mut().filter(|p| !p.fixed) {
        p.velocity += p.acceleration.scale(dt);
        p.position += p.velocity.scale(dt);
    }
    stats
}

fn rk4<F: Float, O: StepObserver>(
    points: &mut [MassPoint<F>],
    springs: &[Spring<F>],
    env: &Environment<'_, F>,
    dt: F,
    observer: &mut O,
) -> StepStats {
    let mut stats = StepStats::default();
    let mut dx: [Vec<Vec3<F>>; 4] = Default::default();
    let mut dv: [Vec<Vec3<F>>; 4] = Default::default();

    compute_accelerations(points, springs, env, &mut stats);
    observer.on_forces_evaluated(0);
    let (x, v) = derivative(points, dt);
    dx[0] = x;
    dv[0] = v;

    // Later stages run on a value copy of the arena. Springs hold indices,
    // so evaluating them against the copy reads only the copy's state.
    let mut snapshot = points.to_vec();
    for stage in 1..4 {
        let weight = if stage == 3 { F::one() } else { F::half() };
        advance(&mut snapshot, points, &dx[stage - 1], &dv[stage - 1], weight);
        compute_accelerations(&mut snapshot, springs, env, &mut stats);
        observer.on_forces_evaluated(stage);
        let (x, v) = derivative(&snapshot, dt);
        dx[stage] = x;
        dv[stage] = v;
    }

    let two = F::two();
    let sixth = F::one() / F::from_f32(6.0);
    for (i, p) in points.iter_mut().enumerate() {
        if p.fixed {
            continue;
        }
        let step_x = dx[0][i] + dx[1][i].scale(two) + dx[2][i].scale(two) + dx[3][i];
        let step_v = dv[0][i] + dv[1][i].scale(two) + dv[2][i].scale(two) + dv[3][i];
        p.position += step_x.scale(sixth);
        p.velocity += step_v.scale(sixth);
    }
    stats
}

/// `(velocity * dt, acceleration * dt)` for every point.
fn derivative<F: Float>(points: &[MassPoint<F>], dt: F) -> (Vec<Vec3<F>>, Vec<Vec3<F>>) {
    points
        .iter()
        .map(|p| (p.velocity.scale(dt), p.acceleration.scale(dt)))
        .unzip()
}

/// Set the snapshot to `base + weight * (dx, dv)`; fixed points copy through.
fn advance<F: Float>(
    snapshot: &mut [MassPoint<F>],
    base: &[MassPoint<F>],
    dx: &[Vec3<F>],
    dv: &[Vec3<F>],
    weight: F,
) {
    for (i, (s, b)) in snapshot.iter_mut().zip(base).enumerate() {
        if b.fixed {
            s.position = b.position;
            s.velocity = b.velocity;
        } else {
            s.position = b.position + dx[i].scale(weight);
            s.velocity = b.velocity + dv[i].scale(weight);
        }
    }
}
