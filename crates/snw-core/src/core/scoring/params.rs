use super::matrix::{CompatibilityMatrix, MatrixError};
use super::model::GapPenalties;
use crate::core::models::voxel::VoxelLabel;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid compatibility data in '{path}': {source}")]
    Matrix { path: String, source: MatrixError },
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MatrixEntry {
    pub cavity: VoxelLabel,
    pub molecule: VoxelLabel,
    pub score: f64,
}

/// Scoring parameters as stored in a TOML file:
///
/// ```toml
/// [gaps]
/// cavity = 0.5
/// clash = 1.0
///
/// [[entries]]
/// cavity = "hydrophobic"
/// molecule = "hydrophobic"
/// score = 2.0
/// ```
///
/// Setting `base = "default"` starts from the built-in table and lets
/// `entries` override individual pairs.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringParams {
    pub gaps: GapPenalties,
    #[serde(default)]
    pub base: MatrixBase,
    #[serde(default)]
    pub entries: Vec<MatrixEntry>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MatrixBase {
    #[default]
    None,
    Default,
}

impl ScoringParams {
    pub fn load(path: &Path) -> Result<Self, MatrixLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| MatrixLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let params: Self = toml::from_str(&content).map_err(|e| MatrixLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        params.gaps.validate().map_err(|e| MatrixLoadError::Matrix {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Ok(params)
    }

    pub fn matrix(&self) -> Result<CompatibilityMatrix, MatrixError> {
        match self.base {
            MatrixBase::None => CompatibilityMatrix::from_entries(
                self.entries.iter().map(|e| (e.cavity, e.molecule, e.score)),
            ),
            MatrixBase::Default => {
                let mut matrix = CompatibilityMatrix::default_matrix();
                for entry in &self.entries {
                    matrix.set(entry.cavity, entry.molecule, entry.score)?;
                }
                Ok(matrix)
            }
        }
    }
}

impl CompatibilityMatrix {
    /// Reads a `cavity,molecule,score` CSV table with a header row.
    pub fn load_csv(path: &Path) -> Result<Self, MatrixLoadError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| MatrixLoadError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        let mut matrix = CompatibilityMatrix::new();
        for result in reader.deserialize::<MatrixEntry>() {
            let record = result.map_err(|e| MatrixLoadError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            matrix
                .insert(record.cavity, record.molecule, record.score)
                .map_err(|e| MatrixLoadError::Matrix {
                    path: path.to_string_lossy().to_string(),
                    source: e,
                })?;
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use VoxelLabel::*;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn loads_params_from_valid_toml() {
        let file = write_temp(
            r#"
[gaps]
cavity = 0.5
clash = 1.0

[[entries]]
cavity = "hydrophobic"
molecule = "hydrophobic"
score = 2.0

[[entries]]
cavity = "charged_pos"
molecule = "charged-negative"
score = 3.0
"#,
        );

        let params = ScoringParams::load(file.path()).unwrap();
        assert_eq!(params.gaps, GapPenalties::new(0.5, 1.0));
        assert_eq!(params.base, MatrixBase::None);

        let matrix = params.matrix().unwrap();
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.get(ChargedNegative, ChargedPositive), Some(3.0));
    }

    #[test]
    fn default_base_is_overridden_by_entries() {
        let file = write_temp(
            r#"
base = "default"

[gaps]
cavity = 0.0
clash = 0.0

[[entries]]
cavity = "polar"
molecule = "polar"
score = 4.0
"#,
        );

        let matrix = ScoringParams::load(file.path()).unwrap().matrix().unwrap();
        assert_eq!(matrix.get(Polar, Polar), Some(4.0));
        assert_eq!(matrix.get(Hydrophobic, Hydrophobic), Some(2.0));
        assert_eq!(matrix.len(), 21);
    }

    #[test]
    fn asymmetric_entries_are_rejected_when_building_matrix() {
        let file = write_temp(
            r#"
[gaps]
cavity = 0.0
clash = 0.0

[[entries]]
cavity = "polar"
molecule = "hydrophobic"
score = -1.0

[[entries]]
cavity = "hydrophobic"
molecule = "polar"
score = -2.0
"#,
        );

        let result = ScoringParams::load(file.path()).unwrap().matrix();
        assert!(matches!(result, Err(MatrixError::AsymmetricEntry { .. })));
    }

    #[test]
    fn returns_io_error_for_nonexistent_file() {
        let result = ScoringParams::load(Path::new("nonexistent_scoring_params.toml"));
        assert!(matches!(result, Err(MatrixLoadError::Io { .. })));
    }

    #[test]
    fn returns_toml_error_for_unknown_label_or_field() {
        let file = write_temp(
            r#"
[gaps]
cavity = 0.0
clash = 0.0

[[entries]]
cavity = "metallic"
molecule = "polar"
score = 1.0
"#,
        );
        assert!(matches!(
            ScoringParams::load(file.path()),
            Err(MatrixLoadError::Toml { .. })
        ));

        let file = write_temp("[gaps]\ncavity = 0.0\nclash = 0.0\nextension = 1.0\n");
        assert!(matches!(
            ScoringParams::load(file.path()),
            Err(MatrixLoadError::Toml { .. })
        ));
    }

    #[test]
    fn negative_gap_in_file_is_rejected() {
        let file = write_temp("[gaps]\ncavity = -1.0\nclash = 0.0\n");
        assert!(matches!(
            ScoringParams::load(file.path()),
            Err(MatrixLoadError::Matrix {
                source: MatrixError::InvalidGapPenalty { .. },
                ..
            })
        ));
    }

    #[test]
    fn loads_matrix_from_csv() {
        let file = write_temp("cavity,molecule,score\nhydrophobic,hydrophobic,2.0\npolar,hydrophobic,-1.0\n");
        let matrix = CompatibilityMatrix::load_csv(file.path()).unwrap();
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.get(Hydrophobic, Polar), Some(-1.0));
    }

    #[test]
    fn csv_with_conflicting_rows_is_rejected() {
        let file = write_temp("cavity,molecule,score\npolar,hydrophobic,-1.0\nhydrophobic,polar,1.0\n");
        assert!(matches!(
            CompatibilityMatrix::load_csv(file.path()),
            Err(MatrixLoadError::Matrix { .. })
        ));
    }

    #[test]
    fn csv_with_malformed_score_is_rejected() {
        let file = write_temp("cavity,molecule,score\npolar,polar,high\n");
        assert!(matches!(
            CompatibilityMatrix::load_csv(file.path()),
            Err(MatrixLoadError::Csv { .. })
        ));
    }
}
