use super::dock::{self, DockingResult};
use crate::core::models::grid::VoxelGrid;
use crate::core::scoring::matrix::CompatibilityMatrix;
use crate::engine::config::DockingConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningHit {
    /// Position of the molecule in the input batch.
    pub index: usize,
    pub result: DockingResult,
}

/// Docks every molecule against the same cavity and ranks them best first.
///
/// Molecules with equal scores keep their input order. The first molecule
/// that fails to dock aborts the screen.
#[instrument(skip_all, name = "screening_workflow")]
pub fn run(
    cavity: &VoxelGrid,
    molecules: &[VoxelGrid],
    matrix: &CompatibilityMatrix,
    config: &DockingConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<ScreeningHit>, EngineError> {
    if molecules.is_empty() {
        const EMPTY_BATCH: &str = "Screening batch is empty; nothing to dock.";
        warn!("{}", EMPTY_BATCH);
        reporter.report(Progress::Message(EMPTY_BATCH.to_string()));
        return Ok(Vec::new());
    }

    let mut hits = Vec::with_capacity(molecules.len());
    for (index, molecule) in molecules.iter().enumerate() {
        info!(
            molecule = index + 1,
            total = molecules.len(),
            "Docking molecule."
        );
        let result = dock::run(cavity, molecule, matrix, config, reporter)?;
        reporter.report(Progress::MoleculeDocked {
            index,
            score: result.score,
        });
        hits.push(ScreeningHit { index, result });
    }

    hits.sort_by(|a, b| b.result.score.total_cmp(&a.result.score));

    info!(
        molecules = hits.len(),
        best_index = hits[0].index,
        best_score = hits[0].result.score,
        "Screening complete."
    );
    Ok(hits)
}
