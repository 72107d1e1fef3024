use super::placement::Placement;
use super::trace::{AlignmentTrace, StepKind};
use crate::core::models::lattice::{Axis, LatticeIndex};
use crate::core::models::voxel::VoxelLabel;
use serde::Serialize;
use std::collections::BTreeMap;

/// The signed share one voxel correspondence adds to a placement's score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub kind: StepKind,
    pub axis: Axis,
    pub cavity_voxel: Option<LatticeIndex>,
    pub molecule_voxel: Option<LatticeIndex>,
    pub cavity_label: Option<VoxelLabel>,
    pub molecule_label: Option<VoxelLabel>,
    /// Binding-site residue the cavity voxel was built from, if annotated.
    pub cavity_residue: Option<String>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub placement: Placement,
    pub contributions: Vec<Contribution>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PairTally {
    pub count: usize,
    pub score: f64,
}

/// Aggregate view of an [`Explanation`], for reporting which chemistry drives a
/// docking score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContributionSummary {
    pub matches: usize,
    pub unfilled: usize,
    pub clashes: usize,
    pub unfilled_penalty: f64,
    pub clash_penalty: f64,
    /// Matched `(cavity, molecule)` label pairs.
    pub pairs: BTreeMap<(VoxelLabel, VoxelLabel), PairTally>,
    /// Matches against annotated cavity voxels, keyed by residue.
    pub residues: BTreeMap<String, PairTally>,
}

/// Flattens a trace into per-voxel contributions, preserving the order the
/// score was accumulated in.
pub fn explain(trace: &AlignmentTrace) -> Explanation {
    let contributions = trace
        .steps()
        .map(|(key, step)| Contribution {
            kind: step.kind,
            axis: key.axis,
            cavity_voxel: step.cavity.map(|(index, _)| index),
            molecule_voxel: step.molecule.map(|(index, _)| index),
            cavity_label: step.cavity.map(|(_, label)| label),
            molecule_label: step.molecule.map(|(_, label)| label),
            cavity_residue: step.cavity_residue.clone(),
            score: step.score,
        })
        .collect();

    Explanation {
        placement: trace.placement,
        contributions,
    }
}

impl Explanation {
    /// Sum of contributions in order. Bit-identical to the placement score.
    pub fn total(&self) -> f64 {
        self.contributions.iter().fold(0.0, |acc, c| acc + c.score)
    }

    pub fn by_kind(&self, kind: StepKind) -> impl Iterator<Item = &Contribution> + '_ {
        self.contributions.iter().filter(move |c| c.kind == kind)
    }

    pub fn summary(&self) -> ContributionSummary {
        let mut summary = ContributionSummary::default();
        for c in &self.contributions {
            match c.kind {
                StepKind::Match => {
                    summary.matches += 1;
                    if let (Some(cavity), Some(molecule)) = (c.cavity_label, c.molecule_label) {
                        let tally = summary.pairs.entry((cavity, molecule)).or_default();
                        tally.count += 1;
                        tally.score += c.score;
                    }
                    if let Some(residue) = &c.cavity_residue {
                        let tally = summary.residues.entry(residue.clone()).or_default();
                        tally.count += 1;
                        tally.score += c.score;
                    }
                }
                StepKind::Unfilled => {
                    summary.unfilled += 1;
                    summary.unfilled_penalty += c.score;
                }
                StepKind::Clash => {
                    summary.clashes += 1;
                    summary.clash_penalty += c.score;
                }
            }
        }
        summary
    }
}
