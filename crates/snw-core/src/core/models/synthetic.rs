//! Deterministic synthetic cavities for benchmarking and tests.

use super::grid::{GridError, VoxelGrid};
use super::voxel::VoxelLabel;
use nalgebra::Point3;

/// Alternating hydrophobic/polar cells by coordinate parity.
pub fn checkerboard(dims: [usize; 3], spacing: f64) -> Result<VoxelGrid, GridError> {
    generate(dims, spacing, |i, j, k, _| {
        if (i + j + k) % 2 == 0 {
            VoxelLabel::Hydrophobic
        } else {
            VoxelLabel::Polar
        }
    })
}

/// Hydrophobic core in the middle third along z, polar cells above and below.
pub fn layered(dims: [usize; 3], spacing: f64) -> Result<VoxelGrid, GridError> {
    generate(dims, spacing, |_, _, k, [_, _, nz]| {
        if k < nz / 3 || k > 2 * nz / 3 {
            VoxelLabel::Polar
        } else {
            VoxelLabel::Hydrophobic
        }
    })
}

/// A straight molecule along x alternating polar and hydrophobic cells.
pub fn linear_molecule(length: usize, spacing: f64) -> Result<VoxelGrid, GridError> {
    generate([length, 1, 1], spacing, |i, _, _, _| {
        if i % 2 == 0 {
            VoxelLabel::Polar
        } else {
            VoxelLabel::Hydrophobic
        }
    })
}

fn generate<F>(dims: [usize; 3], spacing: f64, label_for: F) -> Result<VoxelGrid, GridError>
where
    F: Fn(usize, usize, usize, [usize; 3]) -> VoxelLabel,
{
    let [nx, ny, nz] = dims;
    let mut labels = Vec::with_capacity(nx * ny * nz);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                labels.push(label_for(i, j, k, dims));
            }
        }
    }
    VoxelGrid::from_labels(dims, labels, spacing, Point3::origin())
}
