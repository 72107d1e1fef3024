use super::lattice::LatticeIndex;
use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chemical property category of a voxel.
///
/// Declaration order doubles as the labeling priority: when two properties are
/// equally close to a cell centre, the one declared first wins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum VoxelLabel {
    Hydrophobic,
    Hydrophilic,
    Polar,
    ChargedPositive,
    ChargedNegative,
    Empty,
}

pub const LABEL_COUNT: usize = 6;

static LABEL_NAMES: Map<&'static str, VoxelLabel> = phf_map! {
    "hydrophobic" => VoxelLabel::Hydrophobic,
    "hydrophilic" => VoxelLabel::Hydrophilic,
    "polar" => VoxelLabel::Polar,
    "charged_pos" => VoxelLabel::ChargedPositive,
    "charged-pos" => VoxelLabel::ChargedPositive,
    "charged_positive" => VoxelLabel::ChargedPositive,
    "charged-positive" => VoxelLabel::ChargedPositive,
    "charged_neg" => VoxelLabel::ChargedNegative,
    "charged-neg" => VoxelLabel::ChargedNegative,
    "charged_negative" => VoxelLabel::ChargedNegative,
    "charged-negative" => VoxelLabel::ChargedNegative,
    "empty" => VoxelLabel::Empty,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown voxel label: '{0}'")]
pub struct UnknownLabelError(pub String);

impl VoxelLabel {
    pub const ALL: [VoxelLabel; LABEL_COUNT] = [
        VoxelLabel::Hydrophobic,
        VoxelLabel::Hydrophilic,
        VoxelLabel::Polar,
        VoxelLabel::ChargedPositive,
        VoxelLabel::ChargedNegative,
        VoxelLabel::Empty,
    ];

    /// Position in the label alphabet; lower values take priority on ties.
    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_occupied(self) -> bool {
        self != VoxelLabel::Empty
    }

    pub fn name(self) -> &'static str {
        match self {
            VoxelLabel::Hydrophobic => "hydrophobic",
            VoxelLabel::Hydrophilic => "hydrophilic",
            VoxelLabel::Polar => "polar",
            VoxelLabel::ChargedPositive => "charged_positive",
            VoxelLabel::ChargedNegative => "charged_negative",
            VoxelLabel::Empty => "empty",
        }
    }
}

impl FromStr for VoxelLabel {
    type Err = UnknownLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        LABEL_NAMES
            .get(key.as_str())
            .copied()
            .ok_or_else(|| UnknownLabelError(s.to_string()))
    }
}

impl TryFrom<String> for VoxelLabel {
    type Error = UnknownLabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for VoxelLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A labeled lattice cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Voxel {
    pub index: LatticeIndex,
    pub label: VoxelLabel,
}

impl Voxel {
    pub fn new(index: LatticeIndex, label: VoxelLabel) -> Self {
        Self { index, label }
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.label.is_occupied()
    }
}
