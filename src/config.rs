//! Configuration types for the simulation.

use crate::error::{JelloError, Result};
use crate::float::Float;
use crate::integrator::Integrator;
use crate::lattice::{LatticeConfig, SpringCategories};
use crate::vec::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default multiplier applied to the lattice damping for box collisions.
pub const DEFAULT_COLLISION_DAMPING_SCALE: f32 = 50.0;

/// Spring and mass parameters shared by every point and spring of the lattice.
///
/// Both coefficients are non-negative; forces are always computed as
/// `-stiffness * ...` and `-damping * ...`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Material<F: Float> {
    pub stiffness: F,
    pub damping: F,
    pub mass: F,
    /// Box collisions use `damping * collision_damping_scale` to suppress bounce.
    pub collision_damping_scale: F,
}

impl<F: Float> Material<F> {
    pub fn new(stiffness: F, damping: F, mass: F) -> Self {
        Material {
            stiffness,
            damping,
            mass,
            collision_damping_scale: F::from_f32(DEFAULT_COLLISION_DAMPING_SCALE),
        }
    }

    pub fn with_collision_damping_scale(mut self, scale: F) -> Self {
        self.collision_damping_scale = scale;
        self
    }

    pub fn inv_mass(&self) -> F {
        F::one() / self.mass
    }

    /// Damping coefficient used for penalty collisions.
    pub fn collision_damping(&self) -> F {
        self.damping * self.collision_damping_scale
    }

    pub fn validate(&self) -> Result<()> {
        if !self.mass.is_finite() || self.mass <= F::zero() {
            return Err(JelloError::invalid_config(format!(
                "mass must be positive and finite, got {}",
                self.mass
            )));
        }
        for (name, value) in [
            ("stiffness", self.stiffness),
            ("damping", self.damping),
            ("collision damping scale", self.collision_damping_scale),
        ] {
            if !value.is_finite() || value < F::zero() {
                return Err(JelloError::invalid_config(format!(
                    "{name} must be non-negative and finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl<F: Float> Default for Material<F> {
    fn default() -> Self {
        Material::new(F::from_f32(50.0), F::from_f32(0.5), F::one())
    }
}

/// Everything the simulation needs to (re)build and step the jello.
///
/// # Builder Pattern
/// ```
/// use jello::config::SimulationConfig;
/// use jello::integrator::Integrator;
///
/// let config: SimulationConfig<f64> = SimulationConfig::new()
///     .with_resolution(6)
///     .with_springs(true, true, false)
///     .with_stiffness(80.0)
///     .with_timestep(0.002)
///     .with_integrator(Integrator::Rk4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig<F: Float> {
    /// Resolution, spring categories and fixed floor. Default: 4, all springs, on.
    pub lattice: LatticeConfig,
    /// Default: stiffness 50, damping 0.5, mass 1.
    pub material: Material<F>,
    /// Seconds per step. Default: 0.005.
    pub timestep: F,
    /// Default: explicit Euler.
    pub integrator: Integrator,
    /// Gravity acceleration. Default: (0, -9.8, 0).
    pub gravity: Vec3<F>,
    /// Whether gravity is part of the external force. Default: on.
    pub gravity_enabled: bool,
}

impl<F: Float> SimulationConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SimulationConfig {
            lattice: LatticeConfig::default(),
            material: Material::default(),
            timestep: F::from_f32(0.005),
            integrator: Integrator::Euler,
            gravity: Vec3::new(F::zero(), F::from_f32(-9.8), F::zero()),
            gravity_enabled: true,
        }
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.lattice.resolution = resolution;
        self
    }

    /// Enable or disable the structural, shear and bend spring categories.
    pub fn with_springs(mut self, structural: bool, shear: bool, bend: bool) -> Self {
        self.lattice.springs = SpringCategories::new(structural, shear, bend);
        self
    }

    pub fn with_fixed_floor(mut self, fixed_floor: bool) -> Self {
        self.lattice.fixed_floor = fixed_floor;
        self
    }

    pub fn with_stiffness(mut self, stiffness: F) -> Self {
        self.material.stiffness = stiffness;
        self
    }

    pub fn with_damping(mut self, damping: F) -> Self {
        self.material.damping = damping;
        self
    }

    pub fn with_mass(mut self, mass: F) -> Self {
        self.material.mass = mass;
        self
    }

    pub fn with_collision_damping_scale(mut self, scale: F) -> Self {
        self.material.collision_damping_scale = scale;
        self
    }

    pub fn with_timestep(mut self, timestep: F) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3<F>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_gravity_enabled(mut self, enabled: bool) -> Self {
        self.gravity_enabled = enabled;
        self
    }

    /// Gravity contribution to the external force.
    pub fn effective_gravity(&self) -> Vec3<F> {
        if self.gravity_enabled {
            self.gravity
        } else {
            Vec3::zero()
        }
    }

    /// Check every value before anything is built from it.
    pub fn validate(&self) -> Result<()> {
        self.lattice.validate()?;
        self.material.validate()?;
        if !self.timestep.is_finite() || self.timestep <= F::zero() {
            return Err(JelloError::invalid_config(format!(
                "timestep must be positive and finite, got {}",
                self.timestep
            )));
        }
        if !self.gravity.is_finite() {
            return Err(JelloError::invalid_config("gravity must be finite"));
        }
        Ok(())
    }

    /// True when moving from `self` to `other` requires a lattice rebuild.
    pub fn needs_rebuild(&self, other: &Self) -> bool {
        self.lattice != other.lattice
    }
}

impl<F: Float> Default for SimulationConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config: SimulationConfig<f64> = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lattice.resolution, 4);
        assert!(config.lattice.fixed_floor);
        assert!((config.material.collision_damping() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_positive_mass() {
        let config: SimulationConfig<f64> = SimulationConfig::new().with_mass(0.0);
        assert!(matches!(config.validate(), Err(JelloError::InvalidConfiguration(_))));
    }

    #[test]
    fn rejects_non_positive_timestep() {
        let config: SimulationConfig<f64> = SimulationConfig::new().with_timestep(-0.01);
        assert!(config.validate().is_err());
        let config: SimulationConfig<f64> = SimulationConfig::new().with_timestep(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_negative_stiffness() {
        let config: SimulationConfig<f32> = SimulationConfig::new().with_stiffness(-50.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_damping_is_allowed() {
        let config: SimulationConfig<f64> = SimulationConfig::new().with_damping(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rebuild_only_on_topology_change() {
        let a: SimulationConfig<f64> = SimulationConfig::new();
        assert!(!a.needs_rebuild(&a.with_stiffness(10.0)));
        assert!(a.needs_rebuild(&a.with_resolution(5)));
        assert!(a.needs_rebuild(&a.with_springs(true, false, false)));
    }
}
