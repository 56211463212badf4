//! The jello cube: a `resolution³` grid of mass points wired with
//! structural, shear and bend springs.

use crate::error::{JelloError, Result};
use crate::float::Float;
use crate::integrator::{Environment, Integrator, StepStats};
use crate::observer::StepObserver;
use crate::point::MassPoint;
use crate::spring::{Spring, SpringKind};
use crate::vec::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned nearest neighbors in the forward direction.
const STRUCTURAL_OFFSETS: [[isize; 3]; 3] = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];

/// Half of the 20 face and body diagonals: no offset appears together with
/// its negation, so each diagonal pair is wired exactly once.
const SHEAR_OFFSETS: [[isize; 3]; 10] = [
    [1, 1, 0],
    [-1, 1, 0],
    [0, 1, 1],
    [0, -1, 1],
    [1, 0, 1],
    [-1, 0, 1],
    [1, 1, 1],
    [-1, 1, 1],
    [-1, -1, 1],
    [1, -1, 1],
];

/// Second-nearest axis neighbors in the forward direction.
const BEND_OFFSETS: [[isize; 3]; 3] = [[2, 0, 0], [0, 2, 0], [0, 0, 2]];

/// Which spring categories the lattice is wired with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpringCategories {
    pub structural: bool,
    pub shear: bool,
    pub bend: bool,
}

impl SpringCategories {
    pub const ALL: Self = SpringCategories { structural: true, shear: true, bend: true };
    pub const STRUCTURAL: Self = SpringCategories { structural: true, shear: false, bend: false };
    pub const NONE: Self = SpringCategories { structural: false, shear: false, bend: false };

    pub fn new(structural: bool, shear: bool, bend: bool) -> Self {
        SpringCategories { structural, shear, bend }
    }

    fn offsets(&self) -> impl Iterator<Item = ([isize; 3], SpringKind)> + '_ {
        let structural = STRUCTURAL_OFFSETS
            .iter()
            .filter(move |_| self.structural)
            .map(|o| (*o, SpringKind::Structural));
        let shear = SHEAR_OFFSETS
            .iter()
            .filter(move |_| self.shear)
            .map(|o| (*o, SpringKind::Shear));
        let bend = BEND_OFFSETS
            .iter()
            .filter(move |_| self.bend)
            .map(|o| (*o, SpringKind::Bend));
        structural.chain(shear).chain(bend)
    }
}

impl Default for SpringCategories {
    fn default() -> Self {
        Self::ALL
    }
}

/// Topology parameters. Changing any of them requires a full rebuild.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatticeConfig {
    /// Points per axis. Must be at least 1.
    pub resolution: usize,
    pub springs: SpringCategories,
    /// Pin the bottom layer (`j == 0`), as if the cube rests on a plate.
    pub fixed_floor: bool,
}

impl LatticeConfig {
    pub fn new(resolution: usize) -> Self {
        LatticeConfig {
            resolution,
            springs: SpringCategories::ALL,
            fixed_floor: false,
        }
    }

    pub fn with_springs(mut self, springs: SpringCategories) -> Self {
        self.springs = springs;
        self
    }

    pub fn with_fixed_floor(mut self, fixed_floor: bool) -> Self {
        self.fixed_floor = fixed_floor;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.resolution < 1 {
            return Err(JelloError::invalid_config(format!(
                "resolution must be at least 1, got {}",
                self.resolution
            )));
        }
        Ok(())
    }
}

impl Default for LatticeConfig {
    fn default() -> Self {
        LatticeConfig {
            resolution: 4,
            springs: SpringCategories::ALL,
            fixed_floor: true,
        }
    }
}

/// The six faces of the cube, named by the grid index that is pinned to an extreme.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// `i == 0`
    Left,
    /// `i == resolution - 1`
    Right,
    /// `j == 0`
    Bottom,
    /// `j == resolution - 1`
    Top,
    /// `k == 0`
    Back,
    /// `k == resolution - 1`
    Front,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::Left, Face::Right, Face::Bottom, Face::Top, Face::Back, Face::Front];

    fn slot(self) -> usize {
        self as usize
    }

    fn contains(self, [i, j, k]: [usize; 3], last: usize) -> bool {
        match self {
            Face::Left => i == 0,
            Face::Right => i == last,
            Face::Bottom => j == 0,
            Face::Top => j == last,
            Face::Back => k == 0,
            Face::Front => k == last,
        }
    }
}

/// A jello cube built from point masses and springs.
///
/// Points live in a dense arena indexed by `(i * R + j) * R + k`. Springs are
/// index pairs stored once each as `a < b` and grouped by `a`, so the
/// outgoing springs of point `p` are `springs[offsets[p]..offsets[p + 1]]`.
#[derive(Clone, Debug)]
pub struct Lattice<F: Float> {
    config: LatticeConfig,
    points: Vec<MassPoint<F>>,
    springs: Vec<Spring<F>>,
    spring_offsets: Vec<usize>,
    degrees: Vec<usize>,
    faces: [Vec<usize>; 6],
}

impl<F: Float> Lattice<F> {
    /// Build a lattice with coordinates normalized to `[0, 1]³`.
    pub fn new(config: LatticeConfig) -> Result<Self> {
        config.validate()?;

        let r = config.resolution;
        let last = r - 1;
        let count = r * r * r;
        // a single point sits at the origin
        let step = if r > 1 { F::one() / F::from_usize(last) } else { F::zero() };

        let mut points = Vec::with_capacity(count);
        let mut faces: [Vec<usize>; 6] = Default::default();

        for i in 0..r {
            for j in 0..r {
                for k in 0..r {
                    let rest = Vec3::new(
                        F::from_usize(i) * step,
                        F::from_usize(j) * step,
                        F::from_usize(k) * step,
                    );
                    let surface = i * j * k * (last - i) * (last - j) * (last - k) == 0;
                    let mut point = MassPoint::new(rest, surface);
                    if config.fixed_floor && j == 0 {
                        point.fix();
                    }
                    let index = points.len();
                    for face in Face::ALL {
                        if face.contains([i, j, k], last) {
                            faces[face.slot()].push(index);
                        }
                    }
                    points.push(point);
                }
            }
        }

        let mut springs = Vec::new();
        let mut degrees = vec![0; count];

        for i in 0..r {
            for j in 0..r {
                for k in 0..r {
                    let p = (i * r + j) * r + k;
                    for (offset, kind) in config.springs.offsets() {
                        if let Some(q) = neighbor_index(r, [i, j, k], offset) {
                            // mixed-sign shear offsets can land on a lower index
                            let (a, b) = (p.min(q), p.max(q));
                            springs.push(Spring::between(a, b, &points, kind));
                            degrees[a] += 1;
                            degrees[b] += 1;
                        }
                    }
                }
            }
        }
        springs.sort_by_key(|s| s.a);

        let mut spring_offsets = vec![0; count + 1];
        for s in &springs {
            spring_offsets[s.a + 1] += 1;
        }
        for index in 0..count {
            spring_offsets[index + 1] += spring_offsets[index];
        }

        tracing::info!(
            resolution = r,
            points = points.len(),
            springs = springs.len(),
            fixed_floor = config.fixed_floor,
            "built jello lattice"
        );

        Ok(Lattice {
            config,
            points,
            springs,
            spring_offsets,
            degrees,
            faces,
        })
    }

    /// Discard every point and spring and build again from `config`.
    ///
    /// On error the current lattice is left untouched.
    pub fn rebuild(&mut self, config: LatticeConfig) -> Result<()> {
        *self = Lattice::new(config)?;
        Ok(())
    }

    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    pub fn resolution(&self) -> usize {
        self.config.resolution
    }

    /// Flat arena index of grid coordinate `(i, j, k)`.
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        let r = self.config.resolution;
        (i * r + j) * r + k
    }

    /// Grid coordinate of a flat arena index.
    pub fn coords(&self, index: usize) -> [usize; 3] {
        let r = self.config.resolution;
        [index / (r * r), (index / r) % r, index % r]
    }

    pub fn point(&self, index: usize) -> &MassPoint<F> {
        &self.points[index]
    }

    pub fn point_mut(&mut self, index: usize) -> &mut MassPoint<F> {
        &mut self.points[index]
    }

    /// Checked point access.
    pub fn try_point(&self, index: usize) -> Result<&MassPoint<F>> {
        self.points.get(index).ok_or(JelloError::PointOutOfBounds {
            index,
            count: self.points.len(),
        })
    }

    pub fn points(&self) -> &[MassPoint<F>] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [MassPoint<F>] {
        &mut self.points
    }

    pub fn springs(&self) -> &[Spring<F>] {
        &self.springs
    }

    /// Springs recorded on `index`: those whose other endpoint has a higher index.
    pub fn outgoing_springs(&self, index: usize) -> &[Spring<F>] {
        &self.springs[self.spring_offsets[index]..self.spring_offsets[index + 1]]
    }

    /// Higher-index points `index` is wired to. Use [`Lattice::degree`] for the full count.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.outgoing_springs(index).iter().map(|s| s.b)
    }

    /// Number of springs touching `index`, counting both directions.
    pub fn degree(&self, index: usize) -> usize {
        self.degrees[index]
    }

    /// Springs whose endpoints both lie on the surface.
    pub fn surface_springs(&self) -> impl Iterator<Item = &Spring<F>> + '_ {
        self.springs
            .iter()
            .filter(move |s| self.points[s.a].surface && self.points[s.b].surface)
    }

    /// Point indices on `face`, in arena order.
    pub fn face(&self, face: Face) -> &[usize] {
        &self.faces[face.slot()]
    }

    pub fn positions(&self) -> Vec<Vec3<F>> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// Overwrite the external force of every non-fixed point.
    pub fn set_external_force(&mut self, force: Vec3<F>) {
        for p in self.points.iter_mut() {
            p.set_external_force(force);
        }
    }

    /// Advance every non-fixed point by `dt` with the chosen integrator.
    pub fn step<O: StepObserver>(
        &mut self,
        integrator: Integrator,
        dt: F,
        env: &Environment<'_, F>,
        observer: &mut O,
    ) -> StepStats {
        integrator.step(&mut self.points, &self.springs, env, dt, observer)
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    pub fn spring_count_of(&self, kind: SpringKind) -> usize {
        self.springs.iter().filter(|s| s.kind == kind).count()
    }
}

/// Flat index of `coords + offset`, or `None` when it falls outside the grid.
fn neighbor_index(r: usize, coords: [usize; 3], offset: [isize; 3]) -> Option<usize> {
    let mut target = [0usize; 3];
    for axis in 0..3 {
        let t = coords[axis] as isize + offset[axis];
        if t < 0 || t >= r as isize {
            return None;
        }
        target[axis] = t as usize;
    }
    Some((target[0] * r + target[1]) * r + target[2])
}
