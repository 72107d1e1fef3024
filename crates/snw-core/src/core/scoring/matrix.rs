use crate::core::models::voxel::VoxelLabel;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatrixError {
    #[error("No compatibility entry for cavity label '{cavity}' and molecule label '{molecule}'")]
    MissingEntry {
        cavity: VoxelLabel,
        molecule: VoxelLabel,
    },
    #[error(
        "Conflicting compatibility scores for '{a}'/'{b}': {existing} vs {conflicting}; compatibility is symmetric"
    )]
    AsymmetricEntry {
        a: VoxelLabel,
        b: VoxelLabel,
        existing: f64,
        conflicting: f64,
    },
    #[error("Compatibility score for '{a}'/'{b}' is not finite: {score}")]
    NonFiniteScore {
        a: VoxelLabel,
        b: VoxelLabel,
        score: f64,
    },
    #[error("Gap penalty '{name}' must be finite and non-negative, got {value}")]
    InvalidGapPenalty { name: &'static str, value: f64 },
}

const DEFAULT_ENTRIES: [(VoxelLabel, VoxelLabel, f64); 21] = {
    use VoxelLabel::*;
    [
        (Hydrophobic, Hydrophobic, 2.0),
        (Hydrophobic, Hydrophilic, -3.0),
        (Hydrophobic, Polar, -1.0),
        (Hydrophobic, ChargedPositive, -2.0),
        (Hydrophobic, ChargedNegative, -2.0),
        (Hydrophobic, Empty, -0.5),
        (Hydrophilic, Hydrophilic, 1.5),
        (Hydrophilic, Polar, 1.0),
        (Hydrophilic, ChargedPositive, 0.5),
        (Hydrophilic, ChargedNegative, 0.5),
        (Hydrophilic, Empty, 0.0),
        (Polar, Polar, 1.5),
        (Polar, ChargedPositive, 1.0),
        (Polar, ChargedNegative, 1.0),
        (Polar, Empty, 0.0),
        (ChargedPositive, ChargedPositive, -4.0),
        (ChargedPositive, ChargedNegative, 3.0),
        (ChargedPositive, Empty, 0.0),
        (ChargedNegative, ChargedNegative, -4.0),
        (ChargedNegative, Empty, 0.0),
        (Empty, Empty, 0.0),
    ]
};

/// Symmetric score table over voxel label pairs.
///
/// Each unordered pair has at most one entry, so `get(a, b) == get(b, a)`
/// always holds. The matrix may be incomplete; completeness is checked against
/// concrete grids when a [`CompatibilityModel`](super::model::CompatibilityModel)
/// is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompatibilityMatrix {
    entries: BTreeMap<(VoxelLabel, VoxelLabel), f64>,
}

#[inline]
fn key(a: VoxelLabel, b: VoxelLabel) -> (VoxelLabel, VoxelLabel) {
    if a <= b { (a, b) } else { (b, a) }
}

impl CompatibilityMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// The chemically motivated default table, complete over every label.
    pub fn default_matrix() -> Self {
        let entries = DEFAULT_ENTRIES
            .iter()
            .map(|&(a, b, score)| (key(a, b), score))
            .collect();
        Self { entries }
    }

    pub fn from_entries<I>(entries: I) -> Result<Self, MatrixError>
    where
        I: IntoIterator<Item = (VoxelLabel, VoxelLabel, f64)>,
    {
        let mut matrix = Self::new();
        for (a, b, score) in entries {
            matrix.insert(a, b, score)?;
        }
        Ok(matrix)
    }

    /// Adds an entry for the unordered pair `(a, b)`.
    ///
    /// Re-inserting the same value is accepted; a different value for a pair
    /// that already has one (in either order) is rejected.
    pub fn insert(&mut self, a: VoxelLabel, b: VoxelLabel, score: f64) -> Result<(), MatrixError> {
        if !score.is_finite() {
            return Err(MatrixError::NonFiniteScore { a, b, score });
        }
        match self.entries.get(&key(a, b)) {
            Some(&existing) if existing != score => Err(MatrixError::AsymmetricEntry {
                a,
                b,
                existing,
                conflicting: score,
            }),
            _ => {
                self.entries.insert(key(a, b), score);
                Ok(())
            }
        }
    }

    /// Replaces (or adds) the entry for `(a, b)`.
    pub fn set(&mut self, a: VoxelLabel, b: VoxelLabel, score: f64) -> Result<(), MatrixError> {
        if !score.is_finite() {
            return Err(MatrixError::NonFiniteScore { a, b, score });
        }
        self.entries.insert(key(a, b), score);
        Ok(())
    }

    #[inline]
    pub fn get(&self, a: VoxelLabel, b: VoxelLabel) -> Option<f64> {
        self.entries.get(&key(a, b)).copied()
    }

    pub fn contains(&self, a: VoxelLabel, b: VoxelLabel) -> bool {
        self.entries.contains_key(&key(a, b))
    }

    /// Entries in canonical order, each unordered pair once with `a <= b`.
    pub fn entries(&self) -> impl Iterator<Item = (VoxelLabel, VoxelLabel, f64)> + '_ {
        self.entries.iter().map(|(&(a, b), &score)| (a, b, score))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
