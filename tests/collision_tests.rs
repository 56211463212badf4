use jello::{
    BoundingBox, BoxFace, Environment, Integrator, Material, MassPoint, NoOpStepObserver, Plate,
    Vec3,
};

fn unit_box() -> BoundingBox<f64> {
    BoundingBox::new(Vec3::zero(), Vec3::splat(1.0))
}

#[test]
fn right_face_contact() {
    let bbox = unit_box();
    let contacts: Vec<_> = bbox.contacts(Vec3::new(1.5, 0.5, 0.5)).collect();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].face, BoxFace::Right);
    let c = contacts[0].closest_point;
    assert!((c.x - 1.0).abs() < 1e-12);
    assert!((c.y - 0.5).abs() < 1e-12);
    assert!((c.z - 0.5).abs() < 1e-12);
}

#[test]
fn corner_collects_every_violated_face() {
    let bbox = unit_box();
    let faces: Vec<BoxFace> = bbox.contacts(Vec3::new(1.5, 1.5, -0.5)).map(|c| c.face).collect();
    assert_eq!(faces.len(), 3);
    assert!(faces.contains(&BoxFace::Right));
    assert!(faces.contains(&BoxFace::Top));
    assert!(faces.contains(&BoxFace::Back));

    let edge: Vec<BoxFace> = bbox.contacts(Vec3::new(-0.5, 0.5, 1.5)).map(|c| c.face).collect();
    assert_eq!(edge, vec![BoxFace::Front, BoxFace::Left]);
}

#[test]
fn corner_penalty_points_back_toward_box() {
    let bbox = unit_box();
    let p = MassPoint::new(Vec3::new(1.2, 1.2, 1.2), false);
    let (acc, contacts) = bbox.penalty_acceleration(&p, &Material::new(50.0, 0.5, 1.0));
    assert_eq!(contacts, 3);
    // zero rest length: each face pulls with k * depth
    assert!((acc.x + 10.0).abs() < 1e-9);
    assert!((acc.y + 10.0).abs() < 1e-9);
    assert!((acc.z + 10.0).abs() < 1e-9);
}

#[test]
fn escaped_point_is_pushed_back() {
    let bbox = unit_box();
    let mut points = vec![MassPoint::with_velocity(
        Vec3::new(0.5, 0.5, 0.5),
        Vec3::new(0.0, -2.0, 0.0),
    )];
    let env = Environment::new(Material::new(200.0, 0.5, 1.0)).with_bounds(&bbox);
    let mut lowest = 0.5f64;
    let mut contacts = 0;
    for _ in 0..2000 {
        let stats = Integrator::Euler.step(&mut points, &[], &env, 0.001, &mut NoOpStepObserver);
        contacts += stats.contacts;
        lowest = lowest.min(points[0].position.y);
    }
    assert!(contacts > 0);
    assert!(lowest < 0.0, "point should sink into the floor before the penalty acts");
    assert!(lowest > -0.5);
    assert!(points[0].velocity.y.abs() < 0.5);
    assert!(points[0].position.y > -0.1);
}

#[test]
fn fixed_points_skip_collision() {
    let bbox = unit_box();
    let mut points = vec![MassPoint::new(Vec3::new(3.0, 3.0, 3.0), false)];
    points[0].fix();
    let env = Environment::new(Material::default()).with_bounds(&bbox);
    let stats = Integrator::Rk4.step(&mut points, &[], &env, 0.01, &mut NoOpStepObserver);
    assert_eq!(stats.contacts, 0);
    assert_eq!(points[0].position, Vec3::splat(3.0));
}

#[test]
fn plate_carries_constrained_points() {
    use jello::{Face, Lattice, LatticeConfig};

    let mut lattice: Lattice<f64> = Lattice::new(LatticeConfig::new(3).with_fixed_floor(true)).unwrap();
    let mut plate = Plate::new(Vec3::new(0.5, 0.0, 0.5), 2.0);
    plate.attach(&mut lattice);
    assert_eq!(plate.constrained_points(), lattice.face(Face::Bottom));

    let before = lattice.positions();
    plate.move_to(Vec3::new(0.6, 0.0, 0.5), 0.01, &mut lattice);

    for &index in lattice.face(Face::Bottom) {
        let p = lattice.point(index);
        assert!((p.position.x - before[index].x - 0.1).abs() < 1e-12);
        assert!((p.velocity.x - 10.0).abs() < 1e-9);
        assert!(p.fixed);
    }
    for &index in lattice.face(Face::Top) {
        assert_eq!(lattice.point(index).position, before[index]);
    }
    let [a, _, _, d] = plate.corners();
    assert!((a.x + 0.4).abs() < 1e-12);
    assert!((d.x - 1.6).abs() < 1e-12);
    assert!((plate.plane().point.x + 0.4).abs() < 1e-12);
}
