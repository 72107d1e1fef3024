//! # Spatial Needleman-Wunsch Docking Library
//!
//! Rigid docking of a voxelized molecule into a voxelized binding cavity, scored
//! by a spatial generalization of Needleman-Wunsch sequence alignment.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so that geometry,
//! scoring, and search stay independently testable.
//!
//! - **[`core`]: The Foundation.** Immutable voxel grids, the chemical label
//!   alphabet, and the symmetric compatibility matrix with its loaders.
//!
//! - **[`engine`]: The Logic Core.** The slab alignment recurrence, candidate
//!   placement enumeration, the deterministic parallel search, and the
//!   voxel-level explanation of a score.
//!
//! - **[`workflows`]: The Public API.** Complete docking and screening runs that
//!   tie `core` and `engine` together behind a small set of functions.

pub mod core;
pub mod engine;
pub mod workflows;
