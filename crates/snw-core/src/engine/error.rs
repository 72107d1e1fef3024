use super::config::ConfigError;
use super::placement::Placement;
use crate::core::models::grid::GridError;
use crate::core::scoring::matrix::MatrixError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchBoundsError {
    #[error("Maximum translation must be non-negative, got {0}")]
    NegativeBound(i64),

    #[error(
        "No valid placement of a {molecule_dims:?} molecule grid inside a {cavity_dims:?} cavity grid (max translation: {max_translation:?})"
    )]
    NoCandidates {
        cavity_dims: [usize; 3],
        molecule_dims: [usize; 3],
        max_translation: Option<i64>,
    },

    #[error("Placement {placement} does not keep the molecule grid inside the cavity grid")]
    PlacementOutOfBounds { placement: Placement },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(#[from] GridError),

    #[error("Compatibility model error: {0}")]
    Compatibility(#[from] MatrixError),

    #[error("Grids cannot be decomposed into slabs: {reason}")]
    DimensionMismatch { reason: String },

    #[error("Grid spacing mismatch: cavity {cavity} vs molecule {molecule}")]
    SpacingMismatch { cavity: f64, molecule: f64 },

    #[error("Search bounds error: {0}")]
    SearchBounds(#[from] SearchBoundsError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
