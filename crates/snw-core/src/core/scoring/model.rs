use super::matrix::{CompatibilityMatrix, MatrixError};
use crate::core::models::grid::VoxelGrid;
use crate::core::models::voxel::{LABEL_COUNT, VoxelLabel};
use serde::Deserialize;

/// Penalties subtracted by the alignment recurrence for unmatched voxels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GapPenalties {
    /// Cavity voxel left unfilled by any molecule voxel.
    pub cavity: f64,
    /// Molecule voxel left unmatched (a clash or overhang).
    pub clash: f64,
}

impl GapPenalties {
    pub fn new(cavity: f64, clash: f64) -> Self {
        Self { cavity, clash }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn validate(&self) -> Result<(), MatrixError> {
        for (name, value) in [("cavity", self.cavity), ("clash", self.clash)] {
            if !value.is_finite() || value < 0.0 {
                return Err(MatrixError::InvalidGapPenalty { name, value });
            }
        }
        Ok(())
    }
}

impl Default for GapPenalties {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// A compatibility matrix validated against the grids of one run.
///
/// Construction fails with [`MatrixError::MissingEntry`] as soon as any
/// `(cavity label, molecule label)` pair that can occur has no score. Lookups
/// go through a dense table indexed by label ordinal.
#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityModel {
    table: [[Option<f64>; LABEL_COUNT]; LABEL_COUNT],
    gaps: GapPenalties,
}

impl CompatibilityModel {
    pub fn new(
        matrix: &CompatibilityMatrix,
        gaps: GapPenalties,
        cavity: &VoxelGrid,
        molecule: &VoxelGrid,
    ) -> Result<Self, MatrixError> {
        gaps.validate()?;

        let mut table = [[None; LABEL_COUNT]; LABEL_COUNT];
        for (a, b, score) in matrix.entries() {
            table[a.ordinal()][b.ordinal()] = Some(score);
            table[b.ordinal()][a.ordinal()] = Some(score);
        }

        let model = Self { table, gaps };
        model.check_coverage(cavity, molecule)?;
        Ok(model)
    }

    /// Verifies that every label pair the two grids can produce has a score.
    pub fn check_coverage(&self, cavity: &VoxelGrid, molecule: &VoxelGrid) -> Result<(), MatrixError> {
        let molecule_alphabet = molecule.alphabet();
        for c in cavity.alphabet() {
            for &m in &molecule_alphabet {
                if self.get(c, m).is_none() {
                    return Err(MatrixError::MissingEntry {
                        cavity: c,
                        molecule: m,
                    });
                }
            }
        }
        Ok(())
    }

    /// Score of placing a `molecule` voxel on a `cavity` voxel, or `None` if
    /// the matrix has no entry for the pair.
    #[inline]
    pub fn get(&self, cavity: VoxelLabel, molecule: VoxelLabel) -> Option<f64> {
        self.table[cavity.ordinal()][molecule.ordinal()]
    }

    /// Unchecked lookup for the alignment inner loop. Only called with labels
    /// drawn from grids that passed [`check_coverage`](Self::check_coverage).
    #[inline]
    pub(crate) fn score(&self, cavity: VoxelLabel, molecule: VoxelLabel) -> f64 {
        match self.get(cavity, molecule) {
            Some(score) => score,
            None => panic!("no compatibility entry for {cavity}/{molecule}; coverage was not checked"),
        }
    }

    #[inline]
    pub fn gap_cavity(&self) -> f64 {
        self.gaps.cavity
    }

    #[inline]
    pub fn gap_clash(&self) -> f64 {
        self.gaps.clash
    }

    pub fn gaps(&self) -> GapPenalties {
        self.gaps
    }
}
