use super::lattice::{Axis, LatticeIndex};
use super::voxel::{Voxel, VoxelLabel};
use nalgebra::Point3;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use thiserror::Error;

/// Upper bound on the number of cells in one grid.
pub const MAX_CELLS: usize = 1 << 30;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("Cannot voxelize an empty point set")]
    EmptyPointSet,
    #[error("Grid spacing must be positive and finite, got {0}")]
    InvalidSpacing(f64),
    #[error("Point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },
    #[error("Point {index} is labeled 'empty'; input points must carry a chemical property")]
    EmptyLabelPoint { index: usize },
    #[error("Grid of dimensions {dims:?} needs {expected} labels, found {found}")]
    LabelCountMismatch {
        dims: [usize; 3],
        expected: usize,
        found: usize,
    },
    #[error("Grid of dimensions {dims:?} needs {expected} residue annotations, found {found}")]
    ResidueCountMismatch {
        dims: [usize; 3],
        expected: usize,
        found: usize,
    },
    #[error("Grid of {cells_per_axis:?} cells per axis exceeds the limit of {} cells", MAX_CELLS)]
    GridTooLarge { cells_per_axis: [f64; 3] },
}

/// An atom-like input point: physical coordinates plus a chemical property.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledPoint {
    pub position: Point3<f64>,
    pub label: VoxelLabel,
    /// Protein residue the point belongs to, e.g. `"SER69"`.
    pub residue: Option<String>,
}

impl LabeledPoint {
    pub fn new(x: f64, y: f64, z: f64, label: VoxelLabel) -> Self {
        Self {
            position: Point3::new(x, y, z),
            label,
            residue: None,
        }
    }

    pub fn with_residue(mut self, residue: impl Into<String>) -> Self {
        self.residue = Some(residue.into());
        self
    }
}

/// Immutable rectangular lattice of labeled cells.
///
/// Cells are stored with the x index varying fastest. `origin` is the physical
/// position of cell `(0, 0, 0)`'s lower corner and `spacing` the physical edge
/// length of a cell. Cavity grids may carry a residue annotation per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    dims: [usize; 3],
    spacing: f64,
    origin: Point3<f64>,
    labels: Vec<VoxelLabel>,
    residues: Option<Vec<Option<String>>>,
}

impl VoxelGrid {
    /// Voxelizes a point set into the tightest lattice that contains it.
    ///
    /// Every cell takes the label (and residue) of the point nearest to its
    /// centre; equal distances fall back to [`VoxelLabel`] priority, then to
    /// residue name. The result only depends on the set of points, never on
    /// their order.
    pub fn from_points(points: &[LabeledPoint], spacing: f64) -> Result<Self, GridError> {
        validate_spacing(spacing)?;
        if points.is_empty() {
            return Err(GridError::EmptyPointSet);
        }

        for (index, point) in points.iter().enumerate() {
            if !point.position.iter().all(|c| c.is_finite()) {
                return Err(GridError::NonFiniteCoordinate { index });
            }
            if !point.label.is_occupied() {
                return Err(GridError::EmptyLabelPoint { index });
            }
        }

        let mut min = points[0].position;
        let mut max = points[0].position;
        for point in &points[1..] {
            for a in 0..3 {
                min[a] = min[a].min(point.position[a]);
                max[a] = max[a].max(point.position[a]);
            }
        }

        let mut steps = [0.0; 3];
        for a in 0..3 {
            steps[a] = ((max[a] - min[a]) / spacing).floor();
        }
        let too_large = || GridError::GridTooLarge {
            cells_per_axis: steps.map(|s| s + 1.0),
        };

        let mut dims = [0usize; 3];
        for a in 0..3 {
            if !steps[a].is_finite() || steps[a] >= MAX_CELLS as f64 {
                return Err(too_large());
            }
            dims[a] = (steps[a] as usize).checked_add(1).ok_or_else(too_large)?;
        }
        let cells = checked_cell_count(dims).ok_or_else(too_large)?;

        let mut nearest: Vec<Option<(f64, usize)>> = vec![None; cells];
        for (index, point) in points.iter().enumerate() {
            let mut cell = [0usize; 3];
            let mut dist_sq = 0.0;
            for a in 0..3 {
                let offset = point.position[a] - min[a];
                cell[a] = ((offset / spacing).floor() as usize).min(dims[a] - 1);
                let centre = (cell[a] as f64 + 0.5) * spacing;
                let delta = offset - centre;
                dist_sq += delta * delta;
            }

            let slot = &mut nearest[linear_index(dims, cell[0], cell[1], cell[2])];
            let candidate = (dist_sq, index);
            let replace = match slot {
                None => true,
                Some(current) => closer(points, candidate, *current) == Ordering::Less,
            };
            if replace {
                *slot = Some(candidate);
            }
        }

        let labels = nearest
            .iter()
            .map(|cell| cell.map_or(VoxelLabel::Empty, |(_, i)| points[i].label))
            .collect();
        let residues = points.iter().any(|p| p.residue.is_some()).then(|| {
            nearest
                .iter()
                .map(|cell| cell.and_then(|(_, i)| points[i].residue.clone()))
                .collect()
        });

        Ok(Self {
            dims,
            spacing,
            origin: min,
            labels,
            residues,
        })
    }

    /// Wraps an already discretized lattice. `labels` is read with x varying fastest.
    pub fn from_labels(
        dims: [usize; 3],
        labels: Vec<VoxelLabel>,
        spacing: f64,
        origin: Point3<f64>,
    ) -> Result<Self, GridError> {
        validate_spacing(spacing)?;
        let expected = checked_cell_count(dims).ok_or(GridError::GridTooLarge {
            cells_per_axis: dims.map(|d| d as f64),
        })?;
        if labels.len() != expected {
            return Err(GridError::LabelCountMismatch {
                dims,
                expected,
                found: labels.len(),
            });
        }
        Ok(Self {
            dims,
            spacing,
            origin,
            labels,
            residues: None,
        })
    }

    /// A grid of the given shape where every cell carries `label`.
    pub fn filled(dims: [usize; 3], label: VoxelLabel, spacing: f64) -> Result<Self, GridError> {
        let cells = checked_cell_count(dims).ok_or(GridError::GridTooLarge {
            cells_per_axis: dims.map(|d| d as f64),
        })?;
        Self::from_labels(dims, vec![label; cells], spacing, Point3::origin())
    }

    /// Attaches one residue annotation per cell, in storage order.
    pub fn with_residues(mut self, residues: Vec<Option<String>>) -> Result<Self, GridError> {
        if residues.len() != self.labels.len() {
            return Err(GridError::ResidueCountMismatch {
                dims: self.dims,
                expected: self.labels.len(),
                found: residues.len(),
            });
        }
        self.residues = Some(residues);
        Ok(self)
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    #[inline]
    pub fn len_along(&self, axis: Axis) -> usize {
        self.dims[axis.index()]
    }

    #[inline]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    pub fn cell_count(&self) -> usize {
        self.labels.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_occupied()).count()
    }

    pub fn contains(&self, index: LatticeIndex) -> bool {
        index.i < self.dims[0] && index.j < self.dims[1] && index.k < self.dims[2]
    }

    pub fn label_at(&self, index: LatticeIndex) -> Option<VoxelLabel> {
        self.contains(index).then(|| self.label(index))
    }

    #[inline]
    pub(crate) fn label(&self, index: LatticeIndex) -> VoxelLabel {
        self.labels[linear_index(self.dims, index.i, index.j, index.k)]
    }

    /// Residue annotation of a cell, if the grid carries one.
    pub fn residue_at(&self, index: LatticeIndex) -> Option<&str> {
        if !self.contains(index) {
            return None;
        }
        let n = linear_index(self.dims, index.i, index.j, index.k);
        self.residues.as_ref()?[n].as_deref()
    }

    pub fn has_residues(&self) -> bool {
        self.residues.is_some()
    }

    /// Physical position of the lower corner of a cell.
    pub fn physical_position(&self, index: LatticeIndex) -> Point3<f64> {
        Point3::new(
            self.origin.x + index.i as f64 * self.spacing,
            self.origin.y + index.j as f64 * self.spacing,
            self.origin.z + index.k as f64 * self.spacing,
        )
    }

    /// Labels present in the grid, `Empty` included when any cell is unoccupied.
    pub fn alphabet(&self) -> BTreeSet<VoxelLabel> {
        self.labels.iter().copied().collect()
    }

    /// All cells in storage order (x fastest, then y, then z).
    pub fn voxels(&self) -> impl Iterator<Item = Voxel> + '_ {
        let [nx, ny, _] = self.dims;
        self.labels.iter().enumerate().map(move |(n, &label)| {
            let index = LatticeIndex::new(n % nx, (n / nx) % ny, n / (nx * ny));
            Voxel::new(index, label)
        })
    }

    /// Copies the labels of the row along `axis` at the given perpendicular
    /// coordinates into `out`, replacing its contents.
    pub(crate) fn read_row(&self, axis: Axis, first: usize, second: usize, out: &mut Vec<VoxelLabel>) {
        out.clear();
        out.extend(
            (0..self.len_along(axis))
                .map(|along| self.label(LatticeIndex::compose(axis, along, first, second))),
        );
    }
}

fn validate_spacing(spacing: f64) -> Result<(), GridError> {
    if spacing.is_finite() && spacing > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidSpacing(spacing))
    }
}

#[inline]
fn linear_index(dims: [usize; 3], i: usize, j: usize, k: usize) -> usize {
    i + dims[0] * (j + dims[1] * k)
}

fn checked_cell_count(dims: [usize; 3]) -> Option<usize> {
    dims.iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .filter(|&cells| cells <= MAX_CELLS)
}

/// Orders `(squared distance, point index)` candidates for one cell.
fn closer(points: &[LabeledPoint], a: (f64, usize), b: (f64, usize)) -> Ordering {
    let (pa, pb) = (&points[a.1], &points[b.1]);
    a.0.total_cmp(&b.0)
        .then(pa.label.cmp(&pb.label))
        .then_with(|| pa.residue.cmp(&pb.residue))
}
