use super::grid::{GridError, LabeledPoint, VoxelGrid};
use super::voxel::{UnknownLabelError, VoxelLabel};

/// Collects `(x, y, z, label)` records, optionally tagged with a residue, and
/// voxelizes them.
#[derive(Debug, Clone, Default)]
pub struct GridBuilder {
    points: Vec<LabeledPoint>,
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, x: f64, y: f64, z: f64, label: VoxelLabel) -> &mut Self {
        self.points.push(LabeledPoint::new(x, y, z, label));
        self
    }

    /// Adds a record whose property is given by name, e.g. `"charged_pos"`.
    pub fn add_record(
        &mut self,
        x: f64,
        y: f64,
        z: f64,
        label: &str,
    ) -> Result<&mut Self, UnknownLabelError> {
        let label: VoxelLabel = label.parse()?;
        Ok(self.add_point(x, y, z, label))
    }

    /// Adds a point tagged with the protein residue it belongs to.
    pub fn add_residue_point(
        &mut self,
        x: f64,
        y: f64,
        z: f64,
        label: VoxelLabel,
        residue: impl Into<String>,
    ) -> &mut Self {
        self.points
            .push(LabeledPoint::new(x, y, z, label).with_residue(residue));
        self
    }

    /// Record form of [`add_residue_point`](Self::add_residue_point). An empty
    /// residue name is treated as no annotation.
    pub fn add_residue_record(
        &mut self,
        x: f64,
        y: f64,
        z: f64,
        label: &str,
        residue: &str,
    ) -> Result<&mut Self, UnknownLabelError> {
        let label: VoxelLabel = label.parse()?;
        let residue = residue.trim();
        if residue.is_empty() {
            Ok(self.add_point(x, y, z, label))
        } else {
            Ok(self.add_residue_point(x, y, z, label, residue))
        }
    }

    pub fn extend<I: IntoIterator<Item = LabeledPoint>>(&mut self, points: I) -> &mut Self {
        self.points.extend(points);
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[LabeledPoint] {
        &self.points
    }

    pub fn build(&self, spacing: f64) -> Result<VoxelGrid, GridError> {
        VoxelGrid::from_points(&self.points, spacing)
    }
}
