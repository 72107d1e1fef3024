//! # Core Models Module
//!
//! Data structures describing discretized molecular geometry: the voxel label
//! alphabet, lattice coordinates, and immutable voxel grids for cavities and
//! molecules.
//!
//! ## Key Components
//!
//! - [`lattice`] - Lattice axes and integer cell coordinates
//! - [`voxel`] - The chemical property alphabet and labeled cells
//! - [`grid`] - Voxel grids and voxelization of labeled points
//! - [`builder`] - Incremental collection of input records before voxelization
//! - [`synthetic`] - Deterministic test cavities and molecules
//!
//! ## Usage
//!
//! ```ignore
//! use spatial_nw::core::models::builder::GridBuilder;
//! use spatial_nw::core::models::voxel::VoxelLabel;
//!
//! let mut builder = GridBuilder::new();
//! builder
//!     .add_point(0.0, 0.0, 0.0, VoxelLabel::Hydrophobic)
//!     .add_point(0.5, 0.0, 0.0, VoxelLabel::Polar);
//! let grid = builder.build(0.5)?;
//! ```

pub mod builder;
pub mod grid;
pub mod lattice;
pub mod synthetic;
pub mod voxel;
