//! Scene-level driver: one jello cube, a bounding box and a floor plate.
//!
//! [`Simulation`] is what a renderer or UI talks to. It owns the
//! configuration, rebuilds the lattice when asked, injects gravity and drag
//! every step, carries the plate's kinematic constraint across rebuilds, and
//! keeps running diagnostics so the caller can detect a blow-up.

use crate::collision::BoundingBox;
use crate::config::SimulationConfig;
use crate::error::{JelloError, Result};
use crate::float::Float;
use crate::integrator::{Environment, StepStats};
use crate::lattice::Lattice;
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::plate::Plate;
use crate::vec::Vec3;

/// Top-front-left corner of the default bounding box.
pub const DEFAULT_BOX_CORNER: [f32; 3] = [-2.0, 2.0, 2.0];
/// Edge length of the default (cubic) bounding box.
pub const DEFAULT_BOX_SIZE: f32 = 5.0;
/// Center of the default plate, under the middle of the unit cube.
pub const DEFAULT_PLATE_CENTER: [f32; 3] = [0.5, 0.0, 0.5];
pub const DEFAULT_PLATE_SIZE: f32 = 2.0;

/// Counters accumulated over every step since the last reset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub steps: u64,
    pub degenerate_springs: u64,
    pub contacts: u64,
    pub non_finite_points: u64,
}

impl Diagnostics {
    fn record(&mut self, stats: &StepStats) {
        self.steps += 1;
        self.degenerate_springs += stats.degenerate_springs as u64;
        self.contacts += stats.contacts as u64;
        self.non_finite_points += stats.non_finite_points as u64;
    }

    /// Fails once any point has gone non-finite; the caller should reset.
    pub fn ensure_stable(&self) -> Result<()> {
        if self.non_finite_points > 0 {
            return Err(JelloError::NumericalDegeneracy {
                steps: self.steps,
                degenerate_springs: self.degenerate_springs,
                non_finite_points: self.non_finite_points,
            });
        }
        Ok(())
    }
}

/// A running jello scene.
pub struct Simulation<F: Float> {
    config: SimulationConfig<F>,
    lattice: Lattice<F>,
    bounds: BoundingBox<F>,
    plate: Plate<F>,
    plate_home: Vec3<F>,
    drag: Vec3<F>,
    time: F,
    diagnostics: Diagnostics,
}

impl<F: Float> Simulation<F> {
    /// Build a scene from caller-supplied geometry.
    pub fn new(config: SimulationConfig<F>, bounds: BoundingBox<F>, plate: Plate<F>) -> Result<Self> {
        config.validate()?;
        let mut lattice = Lattice::new(config.lattice)?;
        let mut plate = plate;
        if config.lattice.fixed_floor {
            plate.attach(&mut lattice);
        }

        tracing::info!(
            resolution = config.lattice.resolution,
            integrator = ?config.integrator,
            timestep = config.timestep.to_f64(),
            "simulation created"
        );

        Ok(Simulation {
            config,
            lattice,
            bounds,
            plate_home: plate.center(),
            plate,
            drag: Vec3::zero(),
            time: F::zero(),
            diagnostics: Diagnostics::default(),
        })
    }

    /// Build the default scene: a 5x5x5 box around the unit cube resting on a plate.
    pub fn with_default_scene(config: SimulationConfig<F>) -> Result<Self> {
        let [x, y, z] = DEFAULT_BOX_CORNER.map(F::from_f32);
        let size = F::from_f32(DEFAULT_BOX_SIZE);
        let bounds = BoundingBox::from_top_front_left(Vec3::new(x, y, z), size, size, size);
        let [px, py, pz] = DEFAULT_PLATE_CENTER.map(F::from_f32);
        let plate = Plate::new(Vec3::new(px, py, pz), F::from_f32(DEFAULT_PLATE_SIZE));
        Simulation::new(config, bounds, plate)
    }

    /// Throw the lattice away and rebuild it from `config`.
    ///
    /// The plate returns to its initial position and re-attaches to the new
    /// bottom face. On error nothing changes.
    pub fn reset(&mut self, config: SimulationConfig<F>) -> Result<()> {
        config.validate()?;
        self.lattice.rebuild(config.lattice)?;
        self.plate.reset_to(self.plate_home);
        if config.lattice.fixed_floor {
            self.plate.attach(&mut self.lattice);
        } else {
            self.plate.detach();
        }
        self.config = config;
        self.time = F::zero();
        self.diagnostics = Diagnostics::default();

        tracing::info!(
            resolution = config.lattice.resolution,
            points = self.lattice.point_count(),
            springs = self.lattice.spring_count(),
            "simulation reset"
        );
        Ok(())
    }

    /// Rebuild from the current configuration.
    pub fn restart(&mut self) -> Result<()> {
        self.reset(self.config)
    }

    /// Apply a new configuration, rebuilding only if the topology changed.
    pub fn update_config(&mut self, config: SimulationConfig<F>) -> Result<()> {
        config.validate()?;
        if self.config.needs_rebuild(&config) {
            return self.reset(config);
        }
        self.config = config;
        Ok(())
    }

    pub fn set_drag(&mut self, drag: Vec3<F>) {
        self.drag = drag;
    }

    pub fn add_drag(&mut self, drag: Vec3<F>) {
        self.drag += drag;
    }

    /// Scale the accumulated drag, e.g. by `0.9` per frame to let it fade out.
    pub fn decay_drag(&mut self, factor: F) {
        self.drag = self.drag.scale(factor);
    }

    pub fn drag(&self) -> Vec3<F> {
        self.drag
    }

    /// Force injected into every free point on the next step: gravity plus drag.
    pub fn external_force(&self) -> Vec3<F> {
        self.config.effective_gravity() + self.drag
    }

    /// Move the plate to `target` over one timestep, carrying the bottom face.
    ///
    /// Constrained points keep the velocity `Δ/Δt` of the last move. Call
    /// again with the current center to bring the plate to rest.
    pub fn move_plate(&mut self, target: Vec3<F>) {
        self.plate.move_to(target, self.config.timestep, &mut self.lattice);
    }

    /// Replace the bounding box.
    pub fn set_bounds(&mut self, bounds: BoundingBox<F>) {
        self.bounds = bounds;
    }

    pub fn step(&mut self) -> StepStats {
        self.step_with(&mut NoOpStepObserver)
    }

    /// Run one full step: external force injection, force evaluation, integration.
    pub fn step_with<O: StepObserver>(&mut self, observer: &mut O) -> StepStats {
        self.lattice.set_external_force(self.external_force());

        let env = Environment::new(self.config.material).with_bounds(&self.bounds);
        let stats = self
            .lattice
            .step(self.config.integrator, self.config.timestep, &env, observer);

        self.time = self.time + self.config.timestep;
        self.diagnostics.record(&stats);
        tracing::debug!(
            step = self.diagnostics.steps,
            contacts = stats.contacts,
            degenerate_springs = stats.degenerate_springs,
            "step complete"
        );
        stats
    }

    /// Run `count` steps, returning the summed statistics.
    pub fn run(&mut self, count: usize) -> StepStats {
        let mut total = StepStats::default();
        for _ in 0..count {
            let stats = self.step();
            total.degenerate_springs += stats.degenerate_springs;
            total.contacts += stats.contacts;
            total.non_finite_points += stats.non_finite_points;
        }
        total
    }

    pub fn config(&self) -> &SimulationConfig<F> {
        &self.config
    }

    pub fn lattice(&self) -> &Lattice<F> {
        &self.lattice
    }

    pub fn bounds(&self) -> &BoundingBox<F> {
        &self.bounds
    }

    pub fn plate(&self) -> &Plate<F> {
        &self.plate
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Simulated seconds since the last reset.
    pub fn time(&self) -> F {
        self.time
    }

    pub fn positions(&self) -> Vec<Vec3<F>> {
        self.lattice.positions()
    }
}
