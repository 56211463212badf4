//! Mass-spring jello cube simulation.
//!
//! `jello` models a cube of gelatin as a `resolution³` lattice of point masses
//! joined by damped springs, kept inside a bounding box by penalty springs and
//! optionally resting on a movable plate. Motion is advanced with explicit
//! (semi-implicit) Euler or classical fourth-order Runge-Kutta.
//!
//! # Features
//!
//! - **Lattice springs**: structural, shear and bend categories, toggled independently
//! - **Hooke + damping**: each spring pushes along its own axis, degenerate springs are skipped
//! - **Box collisions**: zero-rest-length penalty springs against six inward-facing planes
//! - **Kinematic plate**: drags the bottom face with it, velocity included
//! - **Integrators**: Euler (one force evaluation) and RK4 (four)
//! - **Observable**: Monitor force evaluations and steps via the `StepObserver` trait
//! - **`f32` or `f64`**: everything is generic over [`Float`]
//!
//! # Example
//!
//! ```
//! use jello::{Integrator, Simulation, SimulationConfig};
//!
//! let config: SimulationConfig<f64> = SimulationConfig::new()
//!     .with_resolution(3)
//!     .with_integrator(Integrator::Rk4);
//! let mut sim = Simulation::with_default_scene(config).unwrap();
//! sim.run(100);
//! assert!(sim.diagnostics().ensure_stable().is_ok());
//! ```

pub mod float;
pub mod vec;
pub mod point;
pub mod spring;
pub mod lattice;
pub mod collision;
pub mod plate;
pub mod integrator;
pub mod observer;
pub mod config;
pub mod simulation;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec3;
pub use point::MassPoint;
pub use spring::{spring_damper_force, Spring, SpringKind};
pub use lattice::{Face, Lattice, LatticeConfig, SpringCategories};
pub use collision::{BoundingBox, BoxFace, Contact, Plane};
pub use plate::Plate;
pub use integrator::{compute_accelerations, Environment, Integrator, StepStats};
pub use config::{Material, SimulationConfig};
pub use simulation::{Diagnostics, Simulation};
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::{JelloError, Result};
