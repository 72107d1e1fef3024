use super::placement::Placement;
use crate::core::models::lattice::{Axis, LatticeIndex};
use crate::core::models::voxel::VoxelLabel;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// A molecule voxel placed on a cavity voxel, scored by the compatibility model.
    Match,
    /// A cavity voxel no molecule voxel fills.
    Unfilled,
    /// A molecule voxel left without a cavity partner.
    Clash,
}

/// One move of an optimal slab alignment, with its signed score contribution.
///
/// Lattice indices refer to each grid's own lattice: `cavity` is a cavity cell,
/// `molecule` a cell of the untranslated molecule grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentStep {
    pub kind: StepKind,
    pub cavity: Option<(LatticeIndex, VoxelLabel)>,
    pub molecule: Option<(LatticeIndex, VoxelLabel)>,
    /// Residue annotation of the cavity cell; only filled in traces.
    pub cavity_residue: Option<String>,
    pub score: f64,
}

/// Identifies a slab: an axis plus the two perpendicular cavity coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SlabKey {
    pub axis: Axis,
    pub first: usize,
    pub second: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlabTrace {
    pub key: SlabKey,
    pub steps: Vec<AlignmentStep>,
}

/// The optimal voxel correspondence of one placement, slab by slab.
///
/// `score` is the left fold of every step's contribution in slab order, the same
/// quantity the placement search ranks by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentTrace {
    pub placement: Placement,
    pub score: f64,
    pub slabs: Vec<SlabTrace>,
}

impl AlignmentTrace {
    pub(crate) fn new(placement: Placement) -> Self {
        Self {
            placement,
            score: 0.0,
            slabs: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, key: SlabKey, step: AlignmentStep) {
        self.score += step.score;
        match self.slabs.last_mut() {
            Some(slab) if slab.key == key => slab.steps.push(step),
            _ => self.slabs.push(SlabTrace {
                key,
                steps: vec![step],
            }),
        }
    }

    pub fn steps(&self) -> impl Iterator<Item = (SlabKey, &AlignmentStep)> + '_ {
        self.slabs
            .iter()
            .flat_map(|slab| slab.steps.iter().map(move |step| (slab.key, step)))
    }

    pub fn step_count(&self) -> usize {
        self.slabs.iter().map(|s| s.steps.len()).sum()
    }
}
