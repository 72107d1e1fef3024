use crate::core::models::grid::VoxelGrid;
use crate::core::scoring::matrix::CompatibilityMatrix;
use crate::core::scoring::model::CompatibilityModel;
use crate::engine::alignment::AlignmentEngine;
use crate::engine::config::{AlignmentConfig, DockingConfig};
use crate::engine::error::EngineError;
use crate::engine::explain::{Explanation, explain};
use crate::engine::placement::Placement;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::search::PlacementSearch;
use crate::engine::trace::AlignmentTrace;
use nalgebra::Vector3;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct DockingResult {
    pub score: f64,
    pub placement: Placement,
    /// `placement` scaled by the grid spacing.
    pub physical_offset: Vector3<f64>,
    pub candidates_evaluated: usize,
    pub cavity_voxels: usize,
    pub molecule_voxels: usize,
    /// Present when the run was configured with `retain_trace`.
    pub trace: Option<AlignmentTrace>,
}

impl DockingResult {
    pub fn explain(&self) -> Option<Explanation> {
        self.trace.as_ref().map(explain)
    }
}

/// Docks one molecule into one cavity by exhaustive placement search.
///
/// The compatibility matrix is checked against both grids before any
/// placement is scored.
#[instrument(skip_all, name = "docking_workflow")]
pub fn run(
    cavity: &VoxelGrid,
    molecule: &VoxelGrid,
    matrix: &CompatibilityMatrix,
    config: &DockingConfig,
    reporter: &ProgressReporter,
) -> Result<DockingResult, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    info!(
        cavity_voxels = cavity.cell_count(),
        molecule_voxels = molecule.cell_count(),
        "Preparing docking run."
    );
    let model = CompatibilityModel::new(matrix, config.alignment.gaps, cavity, molecule)?;
    let engine = AlignmentEngine::new(cavity, molecule, &model, &config.alignment.axes)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Placement Search",
    });
    let outcome = PlacementSearch::new(&engine, &config.search).run(reporter)?;
    reporter.report(Progress::PhaseFinish);

    let trace = if config.retain_trace {
        debug!("Retracing winning placement.");
        Some(engine.trace(outcome.best.placement)?)
    } else {
        None
    };

    info!(
        score = outcome.best.score,
        placement = %outcome.best.placement,
        "Docking complete."
    );

    Ok(DockingResult {
        score: outcome.best.score,
        placement: outcome.best.placement,
        physical_offset: outcome.best.placement.physical_offset(cavity.spacing()),
        candidates_evaluated: outcome.candidates_evaluated,
        cavity_voxels: cavity.cell_count(),
        molecule_voxels: molecule.cell_count(),
        trace,
    })
}

/// Scores one given placement without searching.
pub fn score_pose(
    cavity: &VoxelGrid,
    molecule: &VoxelGrid,
    matrix: &CompatibilityMatrix,
    config: &AlignmentConfig,
    placement: Placement,
) -> Result<f64, EngineError> {
    let model = CompatibilityModel::new(matrix, config.gaps, cavity, molecule)?;
    let engine = AlignmentEngine::new(cavity, molecule, &model, &config.axes)?;
    engine.score(placement)
}

/// Best docking score only, for callers that treat the aligner as a black-box
/// objective (ensembles, conformer sampling).
pub fn align(
    cavity: &VoxelGrid,
    molecule: &VoxelGrid,
    matrix: &CompatibilityMatrix,
    config: &DockingConfig,
) -> Result<f64, EngineError> {
    let config = DockingConfig {
        retain_trace: false,
        ..config.clone()
    };
    run(cavity, molecule, matrix, &config, &ProgressReporter::new()).map(|result| result.score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::voxel::VoxelLabel::*;
    use crate::core::scoring::matrix::MatrixError;
    use crate::core::scoring::model::GapPenalties;
    use crate::engine::config::DockingConfigBuilder;
    use crate::engine::error::SearchBoundsError;
    use std::sync::Mutex;

    fn config(gaps: GapPenalties, retain_trace: bool) -> DockingConfig {
        DockingConfigBuilder::new()
            .gap_penalties(gaps)
            .retain_trace(retain_trace)
            .build()
            .unwrap()
    }

    #[test]
    fn perfect_match_docks_at_origin_with_score_four() {
        let cavity = VoxelGrid::filled([2, 2, 1], Hydrophobic, 1.0).unwrap();
        let molecule = cavity.clone();
        let matrix = CompatibilityMatrix::from_entries([(Hydrophobic, Hydrophobic, 1.0)]).unwrap();

        let result = run(
            &cavity,
            &molecule,
            &matrix,
            &config(GapPenalties::zero(), false),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.score, 4.0);
        assert_eq!(result.placement, Placement::ORIGIN);
        assert_eq!(result.candidates_evaluated, 1);
        assert!(result.trace.is_none());
        assert!(result.explain().is_none());
    }

    #[test]
    fn retained_trace_explains_the_reported_score() {
        let cavity = VoxelGrid::filled([3, 1, 1], Hydrophobic, 0.5).unwrap();
        let molecule = VoxelGrid::filled([2, 1, 1], Hydrophobic, 0.5).unwrap();
        let matrix = CompatibilityMatrix::from_entries([(Hydrophobic, Hydrophobic, 1.0)]).unwrap();

        let result = run(
            &cavity,
            &molecule,
            &matrix,
            &config(GapPenalties::new(0.5, 1.0), true),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.score, 1.5);
        assert_eq!(result.placement, Placement::ORIGIN);
        assert_eq!(result.physical_offset, Vector3::zeros());
        let explanation = result.explain().unwrap();
        assert_eq!(explanation.total().to_bits(), result.score.to_bits());
    }

    #[test]
    fn physical_offset_uses_grid_spacing() {
        let cavity = VoxelGrid::from_labels(
            [3, 1, 1],
            vec![Polar, Polar, Hydrophobic],
            0.5,
            nalgebra::Point3::origin(),
        )
        .unwrap();
        let molecule = VoxelGrid::filled([1, 1, 1], Hydrophobic, 0.5).unwrap();

        let result = run(
            &cavity,
            &molecule,
            &CompatibilityMatrix::default_matrix(),
            &config(GapPenalties::default(), false),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.placement, Placement::new(2, 0, 0));
        assert_eq!(result.physical_offset, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn incomplete_matrix_fails_before_search_starts() {
        let cavity = VoxelGrid::filled([3, 3, 3], Hydrophobic, 1.0).unwrap();
        let molecule = VoxelGrid::filled([1, 1, 1], ChargedNegative, 1.0).unwrap();
        let matrix = CompatibilityMatrix::from_entries([(Hydrophobic, Hydrophobic, 1.0)]).unwrap();

        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        let result = run(
            &cavity,
            &molecule,
            &matrix,
            &config(GapPenalties::zero(), false),
            &reporter,
        );
        drop(reporter);

        assert_eq!(
            result,
            Err(EngineError::Compatibility(MatrixError::MissingEntry {
                cavity: Hydrophobic,
                molecule: ChargedNegative,
            }))
        );
        assert!(
            !events
                .into_inner()
                .unwrap()
                .iter()
                .any(|e| matches!(e, Progress::TaskStart { .. }))
        );
    }

    #[test]
    fn score_pose_matches_search_winner_and_rejects_overhang() {
        let cavity = VoxelGrid::from_labels(
            [4, 1, 1],
            vec![Polar, Hydrophobic, Hydrophobic, Polar],
            1.0,
            nalgebra::Point3::origin(),
        )
        .unwrap();
        let molecule = VoxelGrid::filled([2, 1, 1], Hydrophobic, 1.0).unwrap();
        let matrix = CompatibilityMatrix::default_matrix();
        let docking = config(GapPenalties::default(), false);

        let best = run(&cavity, &molecule, &matrix, &docking, &ProgressReporter::new()).unwrap();
        let pose = score_pose(&cavity, &molecule, &matrix, &docking.alignment, best.placement).unwrap();
        assert_eq!(pose, best.score);

        let overhang = score_pose(
            &cavity,
            &molecule,
            &matrix,
            &docking.alignment,
            Placement::new(3, 0, 0),
        );
        assert_eq!(
            overhang,
            Err(EngineError::SearchBounds(
                SearchBoundsError::PlacementOutOfBounds {
                    placement: Placement::new(3, 0, 0)
                }
            ))
        );
    }

    #[test]
    fn align_returns_the_best_score() {
        let cavity = VoxelGrid::filled([2, 2, 1], Hydrophobic, 1.0).unwrap();
        let matrix = CompatibilityMatrix::from_entries([(Hydrophobic, Hydrophobic, 1.0)]).unwrap();

        let score = align(&cavity, &cavity, &matrix, &config(GapPenalties::zero(), true)).unwrap();
        assert_eq!(score, 4.0);
    }
}
