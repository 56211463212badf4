use jello::{
    Environment, Integrator, Material, MassPoint, NoOpStepObserver, Spring, SpringKind, Vec3,
};

fn stretched_pair() -> (Vec<MassPoint<f64>>, Vec<Spring<f64>>) {
    let mut points = vec![
        MassPoint::new(Vec3::new(0.0, 0.0, 0.0), false),
        MassPoint::new(Vec3::new(1.0, 0.0, 0.0), false),
    ];
    let springs = vec![Spring::between(0, 1, &points, SpringKind::Structural)];
    points[1].position = Vec3::new(2.0, 0.0, 0.0);
    (points, springs)
}

#[test]
fn stretched_pair_accelerates_inward() {
    let (mut points, springs) = stretched_pair();
    let env = Environment::new(Material::new(100.0, 0.0, 1.0));
    let stats = Integrator::Euler.step(&mut points, &springs, &env, 0.001, &mut NoOpStepObserver);
    assert!(stats.is_clean());

    // |a| = k (2 - 1) / m
    assert!((points[0].acceleration.x - 100.0).abs() < 1e-9);
    assert!((points[1].acceleration.x + 100.0).abs() < 1e-9);
    assert!(points[0].acceleration.y.abs() < 1e-12);
    assert!(points[0].acceleration.z.abs() < 1e-12);

    // both moved toward each other along x only
    assert!(points[0].position.x > 0.0);
    assert!(points[1].position.x < 2.0);
    assert_eq!(points[0].position.y, 0.0);
    assert_eq!(points[1].position.z, 0.0);
}

#[test]
fn heavier_mass_accelerates_less() {
    let (mut points, springs) = stretched_pair();
    let env = Environment::new(Material::new(100.0, 0.0, 4.0));
    Integrator::Euler.step(&mut points, &springs, &env, 0.001, &mut NoOpStepObserver);
    assert!((points[0].acceleration.x - 25.0).abs() < 1e-9);
}

#[test]
fn damping_slows_separation() {
    let (mut points, springs) = stretched_pair();
    points[1].position = Vec3::new(1.0, 0.0, 0.0);
    points[1].velocity = Vec3::new(1.0, 0.0, 0.0);
    let env = Environment::new(Material::new(0.0, 2.0, 1.0));
    Integrator::Euler.step(&mut points, &springs, &env, 0.001, &mut NoOpStepObserver);
    assert!((points[1].acceleration.x + 2.0).abs() < 1e-9);
    assert!((points[0].acceleration.x - 2.0).abs() < 1e-9);
}

#[test]
fn fixed_endpoint_is_not_moved() {
    let (mut points, springs) = stretched_pair();
    points[0].fix();
    let env = Environment::new(Material::new(100.0, 0.0, 1.0));
    for _ in 0..100 {
        Integrator::Euler.step(&mut points, &springs, &env, 0.001, &mut NoOpStepObserver);
    }
    assert_eq!(points[0].position, Vec3::zero());
    assert_eq!(points[0].velocity, Vec3::zero());
    assert!(points[1].position.x < 2.0);
}
