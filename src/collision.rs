//! Boundary geometry and penalty collision response.
//!
//! A [`BoundingBox`] is six finite [`Plane`]s whose normals face into the
//! box. A point is outside a plane when it lies on the plane's negative
//! half-space; each such plane pulls the point back with a zero-rest-length
//! spring-damper anchored at the point's projection onto the plane.

use crate::config::Material;
use crate::float::Float;
use crate::point::MassPoint;
use crate::spring::spring_damper_force;
use crate::vec::Vec3;

/// An oriented plane given by a point on it and a normal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane<F: Float> {
    pub point: Vec3<F>,
    pub normal: Vec3<F>,
}

impl<F: Float> Plane<F> {
    pub fn new(point: Vec3<F>, normal: Vec3<F>) -> Self {
        Plane { point, normal }
    }

    /// Plane through a quad given as top-left, top-right, bottom-left,
    /// bottom-right corners. The normal is `cross(d - c, a - c)`, normalized.
    pub fn from_corners(a: Vec3<F>, _b: Vec3<F>, c: Vec3<F>, d: Vec3<F>) -> Self {
        Plane {
            point: a,
            normal: (d - c).cross(a - c).normalize(),
        }
    }

    /// `dot(n, p) - dot(n, point)`: negative on the outside.
    pub fn signed_distance(&self, p: Vec3<F>) -> F {
        self.normal.dot(p) - self.normal.dot(self.point)
    }

    /// True when `p` lies in the negative half-space.
    ///
    /// A degenerate plane (zero normal) is never violated.
    pub fn is_violated_by(&self, p: Vec3<F>) -> bool {
        self.signed_distance(p) < F::zero()
    }

    /// Perpendicular projection of `p` onto the plane, `None` for a zero normal.
    pub fn closest_point(&self, p: Vec3<F>) -> Option<Vec3<F>> {
        let n2 = self.normal.length_sq();
        if n2.is_near_zero(F::from_f32(1e-20)) {
            return None;
        }
        let t = self.signed_distance(p) / n2;
        Some(p - self.normal.scale(t))
    }

    /// Shift the plane without changing its orientation.
    pub fn translate(&mut self, delta: Vec3<F>) {
        self.point += delta;
    }
}

/// Identifies one side of the bounding box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BoxFace {
    /// `z == max.z`
    Front,
    /// `x == max.x`
    Right,
    /// `x == min.x`
    Left,
    /// `z == min.z`
    Back,
    /// `y == min.y`
    Bottom,
    /// `y == max.y`
    Top,
}

impl BoxFace {
    pub const ALL: [BoxFace; 6] = [
        BoxFace::Front,
        BoxFace::Right,
        BoxFace::Left,
        BoxFace::Back,
        BoxFace::Bottom,
        BoxFace::Top,
    ];
}

/// A violated box face and the closest point on it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact<F: Float> {
    pub face: BoxFace,
    pub closest_point: Vec3<F>,
}

/// Closed axis-aligned box made of six planes facing inward.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox<F: Float> {
    planes: [Plane<F>; 6],
    min: Vec3<F>,
    max: Vec3<F>,
}

impl<F: Float> BoundingBox<F> {
    /// Box spanning `min..=max`. Corners are sorted per axis.
    pub fn new(a: Vec3<F>, b: Vec3<F>) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        let (zero, one) = (F::zero(), F::one());
        let planes = [
            Plane::new(max, Vec3::new(zero, zero, -one)),
            Plane::new(max, Vec3::new(-one, zero, zero)),
            Plane::new(min, Vec3::new(one, zero, zero)),
            Plane::new(min, Vec3::new(zero, zero, one)),
            Plane::new(min, Vec3::new(zero, one, zero)),
            Plane::new(max, Vec3::new(zero, -one, zero)),
        ];
        BoundingBox { planes, min, max }
    }

    /// Box hanging from its top-front-left corner: it extends `width` along
    /// +x, `height` along -y and `depth` along -z.
    pub fn from_top_front_left(corner: Vec3<F>, width: F, height: F, depth: F) -> Self {
        let opposite = Vec3::new(corner.x + width, corner.y - height, corner.z - depth);
        BoundingBox::new(corner, opposite)
    }

    pub fn min(&self) -> Vec3<F> {
        self.min
    }

    pub fn max(&self) -> Vec3<F> {
        self.max
    }

    pub fn plane(&self, face: BoxFace) -> &Plane<F> {
        &self.planes[face as usize]
    }

    /// Fast inclusion test against the cached extents (boundary counts as inside).
    pub fn contains(&self, p: Vec3<F>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Every face `p` is outside of, with the closest point on that face.
    ///
    /// Corners and edges report two or three contacts.
    pub fn contacts(&self, p: Vec3<F>) -> impl Iterator<Item = Contact<F>> + '_ {
        let outside = !self.contains(p);
        BoxFace::ALL
            .into_iter()
            .filter(move |_| outside)
            .filter_map(move |face| {
                let plane = self.plane(face);
                if !plane.is_violated_by(p) {
                    return None;
                }
                plane
                    .closest_point(p)
                    .map(|closest_point| Contact { face, closest_point })
            })
    }

    /// Penalty acceleration for one point: the sum over every violated face.
    ///
    /// Returns the acceleration and the number of contacts. Contacts whose
    /// force is not finite are dropped.
    pub fn penalty_acceleration(
        &self,
        point: &MassPoint<F>,
        material: &Material<F>,
    ) -> (Vec3<F>, usize) {
        let mut acc = Vec3::zero();
        let mut contacts = 0;
        let inv_mass = material.inv_mass();
        for contact in self.contacts(point.position) {
            let force = spring_damper_force(
                material.stiffness,
                material.collision_damping(),
                F::zero(),
                point.position,
                contact.closest_point,
                point.velocity,
                Vec3::zero(),
            );
            if let Some(force) = force {
                acc += force.scale(inv_mass);
                contacts += 1;
            }
        }
        (acc, contacts)
    }
}

/// Add box penalty accelerations to every non-fixed point; returns the contact count.
#[cfg(not(feature = "parallel"))]
pub fn apply_box_collisions<F: Float>(
    points: &mut [MassPoint<F>],
    bounds: &BoundingBox<F>,
    material: &Material<F>,
) -> usize {
    points
        .iter_mut()
        .filter(|p| !p.fixed)
        .map(|p| {
            let (acc, contacts) = bounds.penalty_acceleration(p, material);
            p.add_acceleration(acc);
            contacts
        })
        .sum()
}

/// Add box penalty accelerations to every non-fixed point; returns the contact count.
#[cfg(feature = "parallel")]
pub fn apply_box_collisions<F: Float>(
    points: &mut [MassPoint<F>],
    bounds: &BoundingBox<F>,
    material: &Material<F>,
) -> usize {
    use rayon::prelude::*;
    points
        .par_iter_mut()
        .filter(|p| !p.fixed)
        .map(|p| {
            let (acc, contacts) = bounds.penalty_acceleration(p, material);
            p.add_acceleration(acc);
            contacts
        })
        .sum()
}
