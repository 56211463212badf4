use jello::{Face, Integrator, NoOpStepObserver, Simulation, SimulationConfig, Vec3};
use wasm_bindgen::prelude::*;

/// Flatten positions into [x0, y0, z0, x1, y1, z1, ...].
fn flatten(points: impl Iterator<Item = Vec3<f32>>) -> Vec<f32> {
    let mut out = Vec::new();
    for p in points {
        out.push(p.x);
        out.push(p.y);
        out.push(p.z);
    }
    out
}

// ---- Jello Demo ----

#[wasm_bindgen]
pub struct JelloDemo {
    sim: Simulation<f32>,
    drag_decay: f32,
}

#[wasm_bindgen]
impl JelloDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(resolution: usize, rk4: bool) -> Result<JelloDemo, JsError> {
        let integrator = if rk4 { Integrator::Rk4 } else { Integrator::Euler };
        let config = SimulationConfig::new()
            .with_resolution(resolution)
            .with_integrator(integrator);
        let sim = Simulation::with_default_scene(config)?;
        Ok(JelloDemo { sim, drag_decay: 0.9 })
    }

    /// Advance `steps` simulation steps (one frame), then let the drag fade.
    pub fn update(&mut self, steps: usize) -> Result<(), JsError> {
        for _ in 0..steps {
            self.sim.step_with(&mut NoOpStepObserver);
        }
        self.sim.decay_drag(self.drag_decay);
        self.sim.diagnostics().ensure_stable()?;
        Ok(())
    }

    /// Mouse drag in world units, added to gravity as an external force.
    pub fn drag(&mut self, x: f32, y: f32, z: f32) {
        self.sim.add_drag(Vec3::new(x, y, z));
    }

    pub fn move_plate(&mut self, x: f32, y: f32, z: f32) {
        self.sim.move_plate(Vec3::new(x, y, z));
    }

    pub fn set_stiffness(&mut self, stiffness: f32) -> Result<(), JsError> {
        self.sim.update_config(self.sim.config().with_stiffness(stiffness))?;
        Ok(())
    }

    pub fn set_damping(&mut self, damping: f32) -> Result<(), JsError> {
        self.sim.update_config(self.sim.config().with_damping(damping))?;
        Ok(())
    }

    pub fn set_gravity(&mut self, enabled: bool) -> Result<(), JsError> {
        self.sim.update_config(self.sim.config().with_gravity_enabled(enabled))?;
        Ok(())
    }

    /// Rebuild with new topology; the previous cube survives a bad value.
    pub fn reset(
        &mut self,
        resolution: usize,
        structural: bool,
        shear: bool,
        bend: bool,
        fixed_floor: bool,
    ) -> Result<(), JsError> {
        let config = self
            .sim
            .config()
            .with_resolution(resolution)
            .with_springs(structural, shear, bend)
            .with_fixed_floor(fixed_floor);
        self.sim.reset(config)?;
        Ok(())
    }

    /// Returns flat [x0, y0, z0, x1, y1, z1, ...] positions
    pub fn positions(&self) -> Vec<f32> {
        flatten(self.sim.lattice().points().iter().map(|p| p.position))
    }

    /// 1 for surface points, 0 for interior ones
    pub fn surface_flags(&self) -> Vec<u8> {
        self.sim.lattice().points().iter().map(|p| p.surface as u8).collect()
    }

    /// Returns [a0, b0, a1, b1, ...] endpoint indices of surface springs
    pub fn surface_springs(&self) -> Vec<u32> {
        let mut out = Vec::new();
        for s in self.sim.lattice().surface_springs() {
            out.push(s.a as u32);
            out.push(s.b as u32);
        }
        out
    }

    /// Point indices of face 0..6 (left, right, bottom, top, back, front)
    pub fn face_points(&self, face: usize) -> Vec<u32> {
        Face::ALL
            .get(face)
            .map(|&f| self.sim.lattice().face(f).iter().map(|&i| i as u32).collect())
            .unwrap_or_default()
    }

    /// Returns [min_x, min_y, min_z, max_x, max_y, max_z]
    pub fn bounds(&self) -> Vec<f32> {
        let bounds = self.sim.bounds();
        flatten([bounds.min(), bounds.max()].into_iter())
    }

    /// Returns the plate's four corners as flat xyz triples
    pub fn plate_corners(&self) -> Vec<f32> {
        flatten(self.sim.plate().corners().into_iter())
    }

    pub fn point_count(&self) -> usize {
        self.sim.lattice().point_count()
    }

    pub fn time(&self) -> f32 {
        self.sim.time()
    }
}
