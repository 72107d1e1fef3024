//! # Engine Module
//!
//! This module implements the docking engine: the slab-decomposed
//! Needleman-Wunsch alignment of a molecule grid against a cavity grid, and
//! the exhaustive placement search built on top of it.
//!
//! ## Overview
//!
//! A placement is scored by cutting both grids into one-dimensional voxel
//! rows along the configured axes and aligning each cavity row against the
//! translated molecule row that covers it. The search scores every valid
//! translation independently and reduces them with a total order, so the
//! winner never depends on scheduling or enumeration order.
//!
//! ## Architecture
//!
//! - **Alignment** ([`alignment`]) - Slab decomposition and the DP recurrence
//! - **Placement** ([`placement`]) - Translations and candidate enumeration
//! - **Search** ([`search`]) - Parallel scoring and deterministic reduction
//! - **State Tracking** ([`state`]) - Scored placements and their ordering
//! - **Traces** ([`trace`]) and **Explanation** ([`explain`]) - Voxel-level score decomposition
//! - **Configuration** ([`config`]) - Gap penalties, axes, and search bounds
//! - **Progress Monitoring** ([`progress`]) - Progress reporting for long searches
//! - **Error Handling** ([`error`]) - Engine-specific error types and error propagation

pub mod alignment;
pub mod config;
pub mod error;
pub mod explain;
pub mod placement;
pub mod progress;
pub mod search;
pub mod state;
pub mod trace;
