use super::error::SearchBoundsError;
use crate::core::models::lattice::Axis;
use itertools::iproduct;
use nalgebra::Vector3;
use serde::Serialize;
use std::fmt;

/// A rigid translation of the molecule grid, in lattice units.
///
/// Molecule cell `m` lands on cavity cell `m + (dx, dy, dz)`. The derived
/// ordering is lexicographic over `(dx, dy, dz)`, which is the canonical
/// tie-break between equally scored placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Placement {
    pub dx: i64,
    pub dy: i64,
    pub dz: i64,
}

impl Placement {
    pub const ORIGIN: Placement = Placement::new(0, 0, 0);

    pub const fn new(dx: i64, dy: i64, dz: i64) -> Self {
        Self { dx, dy, dz }
    }

    #[inline]
    pub fn component(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.dx,
            Axis::Y => self.dy,
            Axis::Z => self.dz,
        }
    }

    pub fn physical_offset(&self, spacing: f64) -> Vector3<f64> {
        Vector3::new(
            self.dx as f64 * spacing,
            self.dy as f64 * spacing,
            self.dz as f64 * spacing,
        )
    }

    /// Whether the translated molecule box lies entirely inside the cavity box.
    pub fn fits(&self, cavity_dims: [usize; 3], molecule_dims: [usize; 3]) -> bool {
        Axis::ALL.iter().all(|&axis| {
            let t = self.component(axis);
            let a = axis.index();
            t >= 0 && t + molecule_dims[a] as i64 <= cavity_dims[a] as i64
        })
    }
}

impl From<(i64, i64, i64)> for Placement {
    fn from((dx, dy, dz): (i64, i64, i64)) -> Self {
        Self::new(dx, dy, dz)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.dx, self.dy, self.dz)
    }
}

/// Enumerates every integer translation that keeps the molecule inside the
/// cavity, optionally limited to `|t_a| <= max_translation` on every axis.
///
/// Placements are produced in lexicographic order.
pub fn enumerate_placements(
    cavity_dims: [usize; 3],
    molecule_dims: [usize; 3],
    max_translation: Option<i64>,
) -> Result<Vec<Placement>, SearchBoundsError> {
    if let Some(bound) = max_translation {
        if bound < 0 {
            return Err(SearchBoundsError::NegativeBound(bound));
        }
    }

    let range = |a: usize| {
        let slack = cavity_dims[a] as i64 - molecule_dims[a] as i64;
        let upper = max_translation.map_or(slack, |bound| slack.min(bound));
        0..=upper
    };

    let placements: Vec<Placement> = iproduct!(range(0), range(1), range(2))
        .map(Placement::from)
        .collect();

    if placements.is_empty() {
        return Err(SearchBoundsError::NoCandidates {
            cavity_dims,
            molecule_dims,
            max_translation,
        });
    }
    Ok(placements)
}
