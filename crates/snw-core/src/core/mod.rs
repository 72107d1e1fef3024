//! # Core Module
//!
//! Stateless building blocks of the spatial alignment engine: voxel grids and
//! the compatibility scoring model.
//!
//! ## Architecture
//!
//! - **Geometry** ([`models`]) - Voxel labels, lattice coordinates, grids and voxelization
//! - **Scoring** ([`scoring`]) - Compatibility matrices, gap penalties and parameter loading
//!
//! Everything in this layer is immutable once constructed. Grids are built once per
//! cavity or molecule, and the compatibility model is validated before any search starts.

pub mod models;
pub mod scoring;
