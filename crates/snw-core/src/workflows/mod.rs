//! # Workflows Module
//!
//! High-level entry points that run complete docking procedures on top of the
//! engine.
//!
//! ## Overview
//!
//! Workflows are the top-level API of the library. Each one validates its
//! inputs against the compatibility matrix before any search work starts,
//! reports progress phases, and returns plain result values.
//!
//! ## Architecture
//!
//! - **Docking Workflow** ([`dock`]) - Exhaustive placement search for a single
//!   molecule, single-pose scoring, and a score-only entry point for callers
//!   that use docking as an objective function.
//! - **Screening Workflow** ([`screen`]) - Docks a batch of molecules against one
//!   cavity and ranks them.

pub mod dock;
pub mod screen;
