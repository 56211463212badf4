use jello::{Face, Integrator, JelloError, Simulation, SimulationConfig, Vec3};

fn quiet() -> SimulationConfig<f64> {
    SimulationConfig::new().with_gravity_enabled(false)
}

#[test]
fn gravity_pulls_the_top_down() {
    let mut sim = Simulation::with_default_scene(SimulationConfig::<f64>::new()).unwrap();
    let before = sim.positions();
    sim.step();

    let lattice = sim.lattice();
    for &index in lattice.face(Face::Top) {
        assert!(lattice.point(index).velocity.y < 0.0);
    }
    for &index in lattice.face(Face::Bottom) {
        assert_eq!(lattice.point(index).position, before[index]);
    }
    assert!((sim.time() - 0.005).abs() < 1e-12);
    assert_eq!(sim.diagnostics().steps, 1);
}

#[test]
fn no_forces_keeps_the_cube_still() {
    let mut sim = Simulation::with_default_scene(quiet().with_integrator(Integrator::Rk4)).unwrap();
    let before = sim.positions();
    let stats = sim.run(50);
    assert_eq!(stats.contacts, 0);
    for (p, b) in sim.positions().iter().zip(&before) {
        assert!((*p - *b).length() < 1e-12);
    }
}

#[test]
fn drag_accelerates_free_points() {
    let mut sim = Simulation::with_default_scene(quiet()).unwrap();
    sim.set_drag(Vec3::new(1.0, 0.0, 0.0));
    sim.step();
    let dt = sim.config().timestep;
    for p in sim.lattice().points() {
        if p.fixed {
            assert_eq!(p.velocity, Vec3::zero());
        } else {
            assert!((p.velocity.x - dt).abs() < 1e-12);
        }
    }
}

#[test]
fn moving_the_plate_drags_the_bottom_face() {
    let mut sim = Simulation::with_default_scene(quiet()).unwrap();
    let before = sim.positions();
    let center = sim.plate().center();
    sim.move_plate(center + Vec3::new(0.1, 0.0, 0.0));

    let dt = sim.config().timestep;
    for &index in sim.lattice().face(Face::Bottom) {
        let p = sim.lattice().point(index);
        assert!((p.position.x - before[index].x - 0.1).abs() < 1e-12);
        assert!((p.velocity.x - 0.1 / dt).abs() < 1e-6);
    }
    assert!((sim.plate().center().x - 0.6).abs() < 1e-12);
}

#[test]
fn reset_restores_plate_and_lattice() {
    let mut sim = Simulation::with_default_scene(SimulationConfig::<f64>::new()).unwrap();
    sim.move_plate(Vec3::new(1.0, 0.0, 0.5));
    sim.run(20);

    let config = sim.config().with_resolution(5);
    sim.reset(config).unwrap();
    assert_eq!(sim.lattice().point_count(), 125);
    assert_eq!(sim.plate().center(), Vec3::new(0.5, 0.0, 0.5));
    assert_eq!(sim.plate().constrained_points(), sim.lattice().face(Face::Bottom));
    assert_eq!(sim.plate().constrained_points().len(), 25);
    assert_eq!(sim.time(), 0.0);
    assert_eq!(sim.diagnostics().steps, 0);
    for p in sim.lattice().points() {
        assert_eq!(p.position, p.rest_position);
    }
}

#[test]
fn reset_without_floor_detaches_plate() {
    let mut sim = Simulation::with_default_scene(SimulationConfig::<f64>::new()).unwrap();
    sim.reset(sim.config().with_fixed_floor(false)).unwrap();
    assert!(sim.plate().constrained_points().is_empty());
    assert!(sim.lattice().points().iter().all(|p| !p.fixed));
}

#[test]
fn invalid_reset_keeps_the_old_lattice() {
    let mut sim = Simulation::with_default_scene(SimulationConfig::<f64>::new()).unwrap();
    sim.run(10);
    let positions = sim.positions();

    for bad in [
        sim.config().with_resolution(0),
        sim.config().with_mass(-1.0),
        sim.config().with_timestep(0.0),
        sim.config().with_damping(f64::NAN),
    ] {
        let err = sim.reset(bad).unwrap_err();
        assert!(matches!(err, JelloError::InvalidConfiguration(_)), "{err}");
    }

    assert_eq!(sim.lattice().point_count(), 64);
    assert_eq!(sim.positions(), positions);
    assert_eq!(sim.diagnostics().steps, 10);
}

#[test]
fn invalid_initial_config_is_rejected() {
    let result = Simulation::with_default_scene(SimulationConfig::<f32>::new().with_resolution(0));
    assert!(result.is_err());
}

#[test]
fn material_change_does_not_rebuild() {
    let mut sim = Simulation::with_default_scene(SimulationConfig::<f64>::new()).unwrap();
    sim.run(10);
    let positions = sim.positions();

    sim.update_config(sim.config().with_stiffness(80.0)).unwrap();
    assert_eq!(sim.positions(), positions);
    assert_eq!(sim.config().material.stiffness, 80.0);

    sim.update_config(sim.config().with_resolution(3)).unwrap();
    assert_eq!(sim.lattice().point_count(), 27);
}

#[test]
fn default_run_is_stable() {
    let mut sim = Simulation::with_default_scene(SimulationConfig::<f64>::new()).unwrap();
    for _ in 0..100 {
        sim.add_drag(Vec3::new(0.5, 0.0, 0.0));
        sim.decay_drag(0.9);
        sim.step();
    }
    let diagnostics = *sim.diagnostics();
    assert_eq!(diagnostics.steps, 100);
    assert_eq!(diagnostics.degenerate_springs, 0);
    assert!(diagnostics.ensure_stable().is_ok());
    for p in sim.lattice().points() {
        assert!(p.is_finite());
        assert!(sim.bounds().contains(p.position));
    }
}

#[test]
fn blow_up_is_reported() {
    let config = SimulationConfig::<f64>::new()
        .with_resolution(3)
        .with_fixed_floor(false)
        .with_stiffness(1.0e6)
        .with_timestep(0.1);
    let mut sim = Simulation::with_default_scene(config).unwrap();
    sim.set_drag(Vec3::new(3.0, 0.0, 0.0));
    sim.run(300);
    let d = sim.diagnostics();
    assert!(d.degenerate_springs > 0 || d.non_finite_points > 0, "{d:?}");
}

#[test]
fn zero_move_brings_the_plate_to_rest() {
    let mut sim = Simulation::with_default_scene(quiet()).unwrap();
    sim.move_plate(Vec3::new(0.6, 0.0, 0.5));
    let bottom = sim.lattice().face(Face::Bottom).to_vec();
    assert!(bottom.iter().all(|&i| sim.lattice().point(i).velocity.x > 0.0));

    let center = sim.plate().center();
    let before = sim.positions();
    sim.move_plate(center);
    for &index in &bottom {
        let p = sim.lattice().point(index);
        assert_eq!(p.velocity, Vec3::zero());
        assert_eq!(p.position, before[index]);
    }
}
