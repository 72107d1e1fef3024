use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three lattice axes.
///
/// Slab decomposition walks voxel rows along an axis while holding the two
/// perpendicular coordinates fixed. The perpendicular pair is always returned
/// in ascending axis order, so `X -> (Y, Z)`, `Y -> (X, Z)` and `Z -> (X, Y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    #[inline]
    pub fn perpendicular(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Integer coordinate of a cell in a voxel lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LatticeIndex {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

impl LatticeIndex {
    pub fn new(i: usize, j: usize, k: usize) -> Self {
        Self { i, j, k }
    }

    #[inline]
    pub fn get(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.i,
            Axis::Y => self.j,
            Axis::Z => self.k,
        }
    }

    /// Builds the index of the cell at `along` on `axis`, with the perpendicular
    /// coordinates given in the order returned by [`Axis::perpendicular`].
    #[inline]
    pub fn compose(axis: Axis, along: usize, first: usize, second: usize) -> Self {
        match axis {
            Axis::X => Self::new(along, first, second),
            Axis::Y => Self::new(first, along, second),
            Axis::Z => Self::new(first, second, along),
        }
    }
}

impl From<[usize; 3]> for LatticeIndex {
    fn from(value: [usize; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl fmt::Display for LatticeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.i, self.j, self.k)
    }
}
