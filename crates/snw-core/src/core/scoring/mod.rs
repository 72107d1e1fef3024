//! # Scoring Module
//!
//! Chemical compatibility scoring for voxel alignment, the spatial analogue of an
//! amino-acid substitution matrix.
//!
//! ## Key Components
//!
//! - [`matrix`] - Symmetric score table over voxel label pairs, including the default table
//! - [`model`] - A matrix validated against the grids of a run, plus gap penalties
//! - [`params`] - Loading matrices and penalties from TOML and CSV files
//!
//! ## Usage
//!
//! ```ignore
//! use spatial_nw::core::scoring::matrix::CompatibilityMatrix;
//! use spatial_nw::core::scoring::model::{CompatibilityModel, GapPenalties};
//!
//! let matrix = CompatibilityMatrix::default_matrix();
//! let model = CompatibilityModel::new(&matrix, GapPenalties::default(), &cavity, &molecule)?;
//! let s = model.get(VoxelLabel::Hydrophobic, VoxelLabel::Hydrophobic);
//! ```

pub mod matrix;
pub mod model;
pub mod params;
