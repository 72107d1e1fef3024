use super::error::{EngineError, SearchBoundsError};
use super::placement::Placement;
use super::trace::{AlignmentStep, AlignmentTrace, SlabKey, StepKind};
use crate::core::models::grid::VoxelGrid;
use crate::core::models::lattice::{Axis, LatticeIndex};
use crate::core::models::voxel::VoxelLabel;
use crate::core::scoring::model::CompatibilityModel;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Start,
    Match,
    Clash,
    Unfilled,
}

/// Scratch space for slab alignments.
///
/// One buffer serves any number of placements in sequence; the DP table is
/// resized in place instead of reallocated per slab. Search workers each own
/// one.
#[derive(Debug, Default)]
pub struct SlabBuffer {
    table: Vec<f64>,
    moves: Vec<Move>,
    path: Vec<Move>,
    cavity_row: Vec<VoxelLabel>,
    molecule_row: Vec<VoxelLabel>,
}

impl SlabBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Needleman-Wunsch over `cavity_row[start..start + m]` against the whole
    /// `molecule_row` (length `m`). Leaves the optimal path in `self.path`,
    /// first move first.
    ///
    /// Equal candidates resolve as match, then clash, then unfilled.
    fn align_window(&mut self, model: &CompatibilityModel, start: usize) {
        let n = self.molecule_row.len();
        let cavity = &self.cavity_row[start..start + n];
        let molecule = &self.molecule_row;
        let gap_cavity = model.gap_cavity();
        let gap_clash = model.gap_clash();
        let width = n + 1;

        self.table.clear();
        self.table.resize(width * width, 0.0);
        self.moves.clear();
        self.moves.resize(width * width, Move::Start);

        for y in 1..width {
            self.table[y] = self.table[y - 1] - gap_clash;
            self.moves[y] = Move::Clash;
        }

        for x in 1..width {
            let row = x * width;
            let prev = row - width;
            self.table[row] = self.table[prev] - gap_cavity;
            self.moves[row] = Move::Unfilled;

            for y in 1..width {
                let mut best = self.table[prev + y - 1] + model.score(cavity[x - 1], molecule[y - 1]);
                let mut step = Move::Match;

                let clash = self.table[row + y - 1] - gap_clash;
                if clash > best {
                    best = clash;
                    step = Move::Clash;
                }
                let unfilled = self.table[prev + y] - gap_cavity;
                if unfilled > best {
                    best = unfilled;
                    step = Move::Unfilled;
                }

                self.table[row + y] = best;
                self.moves[row + y] = step;
            }
        }

        self.path.clear();
        let (mut x, mut y) = (n, n);
        while x > 0 || y > 0 {
            let step = self.moves[x * width + y];
            match step {
                Move::Match => {
                    x -= 1;
                    y -= 1;
                }
                Move::Clash => y -= 1,
                Move::Unfilled => x -= 1,
                Move::Start => break,
            }
            self.path.push(step);
        }
        self.path.reverse();
    }
}

/// Scores placements of one molecule grid inside one cavity grid.
///
/// Each configured axis contributes one 1D alignment per cavity row along
/// that axis. The molecule row sharing the row's perpendicular coordinates
/// (after translation) is aligned against the cavity cells it covers; cavity
/// cells it does not cover, and cavity rows with no molecule row at all, are
/// unfilled. A placement's score is the running sum of every step's
/// contribution, taken in axis order, then perpendicular coordinates
/// ascending, then along the row.
pub struct AlignmentEngine<'a> {
    cavity: &'a VoxelGrid,
    molecule: &'a VoxelGrid,
    model: &'a CompatibilityModel,
    axes: Vec<Axis>,
}

impl<'a> AlignmentEngine<'a> {
    pub fn new(
        cavity: &'a VoxelGrid,
        molecule: &'a VoxelGrid,
        model: &'a CompatibilityModel,
        axes: &[Axis],
    ) -> Result<Self, EngineError> {
        if axes.is_empty() {
            return Err(EngineError::DimensionMismatch {
                reason: "no slab axes configured".to_string(),
            });
        }
        for (role, grid) in [("cavity", cavity), ("molecule", molecule)] {
            if let Some(axis) = Axis::ALL.into_iter().find(|&a| grid.len_along(a) == 0) {
                return Err(EngineError::DimensionMismatch {
                    reason: format!(
                        "{} grid has zero length along {} (dimensions {:?})",
                        role,
                        axis,
                        grid.dims()
                    ),
                });
            }
        }
        if cavity.spacing() != molecule.spacing() {
            return Err(EngineError::SpacingMismatch {
                cavity: cavity.spacing(),
                molecule: molecule.spacing(),
            });
        }
        model.check_coverage(cavity, molecule)?;

        debug!(
            cavity_dims = ?cavity.dims(),
            molecule_dims = ?molecule.dims(),
            axes = ?axes,
            "Alignment engine ready."
        );

        Ok(Self {
            cavity,
            molecule,
            model,
            axes: axes.to_vec(),
        })
    }

    pub fn cavity(&self) -> &VoxelGrid {
        self.cavity
    }

    pub fn molecule(&self) -> &VoxelGrid {
        self.molecule
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn fits(&self, placement: Placement) -> bool {
        placement.fits(self.cavity.dims(), self.molecule.dims())
    }

    pub(crate) fn ensure_fits(&self, placement: Placement) -> Result<(), SearchBoundsError> {
        if self.fits(placement) {
            Ok(())
        } else {
            Err(SearchBoundsError::PlacementOutOfBounds { placement })
        }
    }

    /// Optimal alignment score of a single placement.
    pub fn score(&self, placement: Placement) -> Result<f64, EngineError> {
        self.ensure_fits(placement)?;
        Ok(self.score_with(&mut SlabBuffer::new(), placement))
    }

    /// Optimal alignment of a single placement with its full voxel correspondence.
    pub fn trace(&self, placement: Placement) -> Result<AlignmentTrace, EngineError> {
        self.ensure_fits(placement)?;
        let mut trace = AlignmentTrace::new(placement);
        self.walk(&mut SlabBuffer::new(), placement, |key, mut step| {
            if let Some((index, _)) = step.cavity {
                step.cavity_residue = self.cavity.residue_at(index).map(str::to_owned);
            }
            trace.record(key, step)
        });
        Ok(trace)
    }

    /// Scores a placement already known to fit, reusing `buffer`.
    pub(crate) fn score_with(&self, buffer: &mut SlabBuffer, placement: Placement) -> f64 {
        let mut total = 0.0;
        self.walk(buffer, placement, |_, step| total += step.score);
        total
    }

    fn walk<F>(&self, buffer: &mut SlabBuffer, placement: Placement, mut emit: F)
    where
        F: FnMut(SlabKey, AlignmentStep),
    {
        for &axis in &self.axes {
            let (first_axis, second_axis) = axis.perpendicular();
            let start = placement.component(axis) as usize;
            let cavity_len = self.cavity.len_along(axis);

            for first in 0..self.cavity.len_along(first_axis) {
                for second in 0..self.cavity.len_along(second_axis) {
                    let key = SlabKey {
                        axis,
                        first,
                        second,
                    };
                    self.cavity
                        .read_row(axis, first, second, &mut buffer.cavity_row);

                    let molecule_first = self.molecule_coordinate(placement, first_axis, first);
                    let molecule_second = self.molecule_coordinate(placement, second_axis, second);
                    let (Some(mf), Some(ms)) = (molecule_first, molecule_second) else {
                        for along in 0..cavity_len {
                            emit(key, self.unfilled(key, along, buffer.cavity_row[along]));
                        }
                        continue;
                    };

                    self.molecule
                        .read_row(axis, mf, ms, &mut buffer.molecule_row);
                    buffer.align_window(self.model, start);
                    let end = start + buffer.molecule_row.len();

                    for along in 0..start {
                        emit(key, self.unfilled(key, along, buffer.cavity_row[along]));
                    }

                    let (mut x, mut y) = (start, 0);
                    for &step in &buffer.path {
                        match step {
                            Move::Match => {
                                let c = buffer.cavity_row[x];
                                let m = buffer.molecule_row[y];
                                emit(
                                    key,
                                    AlignmentStep {
                                        kind: StepKind::Match,
                                        cavity: Some((
                                            LatticeIndex::compose(axis, x, first, second),
                                            c,
                                        )),
                                        molecule: Some((LatticeIndex::compose(axis, y, mf, ms), m)),
                                        cavity_residue: None,
                                        score: self.model.score(c, m),
                                    },
                                );
                                x += 1;
                                y += 1;
                            }
                            Move::Clash => {
                                let m = buffer.molecule_row[y];
                                emit(
                                    key,
                                    AlignmentStep {
                                        kind: StepKind::Clash,
                                        cavity: None,
                                        molecule: Some((LatticeIndex::compose(axis, y, mf, ms), m)),
                                        cavity_residue: None,
                                        score: -self.model.gap_clash(),
                                    },
                                );
                                y += 1;
                            }
                            Move::Unfilled => {
                                emit(key, self.unfilled(key, x, buffer.cavity_row[x]));
                                x += 1;
                            }
                            Move::Start => {}
                        }
                    }

                    for along in end..cavity_len {
                        emit(key, self.unfilled(key, along, buffer.cavity_row[along]));
                    }
                }
            }
        }
    }

    /// Molecule-lattice coordinate that lands on cavity coordinate `cavity_coord`
    /// along `axis`, if the molecule grid has one.
    #[inline]
    fn molecule_coordinate(&self, placement: Placement, axis: Axis, cavity_coord: usize) -> Option<usize> {
        let coord = cavity_coord as i64 - placement.component(axis);
        (coord >= 0 && (coord as usize) < self.molecule.len_along(axis)).then_some(coord as usize)
    }

    #[inline]
    fn unfilled(&self, key: SlabKey, along: usize, label: VoxelLabel) -> AlignmentStep {
        AlignmentStep {
            kind: StepKind::Unfilled,
            cavity: Some((
                LatticeIndex::compose(key.axis, along, key.first, key.second),
                label,
            )),
            molecule: None,
            cavity_residue: None,
            score: -self.model.gap_cavity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::synthetic;
    use crate::core::scoring::matrix::{CompatibilityMatrix, MatrixError};
    use crate::core::scoring::model::GapPenalties;
    use VoxelLabel::*;

    fn row(labels: &[VoxelLabel]) -> VoxelGrid {
        VoxelGrid::from_labels(
            [labels.len(), 1, 1],
            labels.to_vec(),
            1.0,
            nalgebra::Point3::origin(),
        )
        .unwrap()
    }

    fn hp_matrix() -> CompatibilityMatrix {
        CompatibilityMatrix::from_entries([
            (Hydrophobic, Hydrophobic, 2.0),
            (Polar, Polar, 2.0),
            (Hydrophobic, Polar, -3.0),
        ])
        .unwrap()
    }

    #[test]
    fn forced_gap_leaves_one_cavity_voxel_unfilled() {
        let cavity = row(&[Hydrophobic; 3]);
        let molecule = row(&[Hydrophobic; 2]);
        let matrix = CompatibilityMatrix::from_entries([(Hydrophobic, Hydrophobic, 1.0)]).unwrap();
        let model =
            CompatibilityModel::new(&matrix, GapPenalties::new(0.5, 1.0), &cavity, &molecule).unwrap();
        let engine = AlignmentEngine::new(&cavity, &molecule, &model, &[Axis::X]).unwrap();

        assert_eq!(engine.score(Placement::new(0, 0, 0)).unwrap(), 1.5);
        assert_eq!(engine.score(Placement::new(1, 0, 0)).unwrap(), 1.5);
    }

    #[test]
    fn perfect_match_sums_every_voxel_pair() {
        let cavity = VoxelGrid::filled([2, 2, 1], Hydrophobic, 1.0).unwrap();
        let molecule = cavity.clone();
        let matrix = CompatibilityMatrix::from_entries([(Hydrophobic, Hydrophobic, 1.0)]).unwrap();
        let model = CompatibilityModel::new(&matrix, GapPenalties::zero(), &cavity, &molecule).unwrap();
        let engine = AlignmentEngine::new(&cavity, &molecule, &model, &[Axis::X]).unwrap();

        assert_eq!(engine.score(Placement::ORIGIN).unwrap(), 4.0);
    }

    #[test]
    fn every_configured_axis_contributes_its_slabs() {
        let cavity = VoxelGrid::filled([2, 2, 1], Hydrophobic, 1.0).unwrap();
        let molecule = cavity.clone();
        let matrix = CompatibilityMatrix::from_entries([(Hydrophobic, Hydrophobic, 1.0)]).unwrap();
        let model = CompatibilityModel::new(&matrix, GapPenalties::zero(), &cavity, &molecule).unwrap();

        let two_axes = AlignmentEngine::new(&cavity, &molecule, &model, &[Axis::X, Axis::Y]).unwrap();
        assert_eq!(two_axes.score(Placement::ORIGIN).unwrap(), 8.0);

        let all_axes = AlignmentEngine::new(&cavity, &molecule, &model, &Axis::ALL).unwrap();
        assert_eq!(all_axes.score(Placement::ORIGIN).unwrap(), 12.0);
    }

    #[test]
    fn recurrence_shifts_within_window_when_gaps_beat_mismatches() {
        let cavity = row(&[Polar, Hydrophobic, Hydrophobic]);
        let molecule = row(&[Hydrophobic, Hydrophobic, Polar]);
        let model =
            CompatibilityModel::new(&hp_matrix(), GapPenalties::new(0.5, 0.5), &cavity, &molecule)
                .unwrap();
        let engine = AlignmentEngine::new(&cavity, &molecule, &model, &[Axis::X]).unwrap();

        let trace = engine.trace(Placement::ORIGIN).unwrap();
        let kinds: Vec<_> = trace.steps().map(|(_, s)| s.kind).collect();

        assert_eq!(trace.score, 3.0);
        assert_eq!(
            kinds,
            vec![
                StepKind::Unfilled,
                StepKind::Match,
                StepKind::Match,
                StepKind::Clash
            ]
        );
    }

    #[test]
    fn trace_score_matches_untraced_score_and_covers_every_cell() {
        let cavity = synthetic::checkerboard([4, 3, 2], 1.0).unwrap();
        let molecule = synthetic::linear_molecule(3, 1.0).unwrap();
        let model = CompatibilityModel::new(
            &CompatibilityMatrix::default_matrix(),
            GapPenalties::new(0.5, 1.5),
            &cavity,
            &molecule,
        )
        .unwrap();
        let engine = AlignmentEngine::new(&cavity, &molecule, &model, &[Axis::X]).unwrap();

        for placement in [Placement::new(0, 0, 0), Placement::new(1, 2, 1)] {
            let trace = engine.trace(placement).unwrap();
            assert_eq!(trace.score, engine.score(placement).unwrap());
            assert_eq!(trace.slabs.len(), 3 * 2);

            let cavity_cells = trace.steps().filter(|(_, s)| s.cavity.is_some()).count();
            let molecule_cells = trace.steps().filter(|(_, s)| s.molecule.is_some()).count();
            assert_eq!(cavity_cells, cavity.cell_count());
            assert_eq!(molecule_cells, molecule.cell_count());
        }
    }

    #[test]
    fn matched_molecule_cells_are_reported_in_molecule_lattice() {
        let cavity = row(&[Polar, Hydrophobic, Hydrophobic, Polar]);
        let molecule = row(&[Hydrophobic, Hydrophobic]);
        let model =
            CompatibilityModel::new(&hp_matrix(), GapPenalties::new(1.0, 1.0), &cavity, &molecule)
                .unwrap();
        let engine = AlignmentEngine::new(&cavity, &molecule, &model, &[Axis::X]).unwrap();

        let trace = engine.trace(Placement::new(1, 0, 0)).unwrap();
        let matches: Vec<_> = trace
            .steps()
            .filter(|(_, s)| s.kind == StepKind::Match)
            .map(|(_, s)| (s.cavity.unwrap().0.i, s.molecule.unwrap().0.i))
            .collect();

        assert_eq!(matches, vec![(1, 0), (2, 1)]);
        assert_eq!(trace.score, 2.0);
    }

    #[test]
    fn zero_gap_identical_grids_score_direct_overlap() {
        let cavity = synthetic::checkerboard([4, 3, 2], 1.0).unwrap();
        let molecule = cavity.clone();
        let model =
            CompatibilityModel::new(&hp_matrix(), GapPenalties::zero(), &cavity, &molecule).unwrap();
        let engine = AlignmentEngine::new(&cavity, &molecule, &model, &[Axis::X]).unwrap();

        let direct: f64 = cavity
            .voxels()
            .map(|v| model.score(v.label, molecule.label_at(v.index).unwrap()))
            .sum();
        assert_eq!(engine.score(Placement::ORIGIN).unwrap(), direct);
    }

    #[test]
    fn out_of_bounds_placement_is_rejected() {
        let cavity = row(&[Hydrophobic; 3]);
        let molecule = row(&[Hydrophobic; 2]);
        let model = CompatibilityModel::new(
            &CompatibilityMatrix::default_matrix(),
            GapPenalties::zero(),
            &cavity,
            &molecule,
        )
        .unwrap();
        let engine = AlignmentEngine::new(&cavity, &molecule, &model, &[Axis::X]).unwrap();

        let result = engine.score(Placement::new(2, 0, 0));
        assert!(matches!(
            result,
            Err(EngineError::SearchBounds(SearchBoundsError::PlacementOutOfBounds { .. }))
        ));
    }

    #[test]
    fn zero_length_grid_is_a_dimension_mismatch() {
        let cavity = row(&[Hydrophobic; 3]);
        let molecule =
            VoxelGrid::from_labels([0, 1, 1], vec![], 1.0, nalgebra::Point3::origin()).unwrap();
        let model = CompatibilityModel::new(
            &CompatibilityMatrix::default_matrix(),
            GapPenalties::zero(),
            &cavity,
            &molecule,
        )
        .unwrap();

        let result = AlignmentEngine::new(&cavity, &molecule, &model, &[Axis::X]);
        assert!(matches!(result, Err(EngineError::DimensionMismatch { .. })));
    }

    #[test]
    fn empty_axis_list_is_a_dimension_mismatch() {
        let cavity = row(&[Hydrophobic; 3]);
        let model = CompatibilityModel::new(
            &CompatibilityMatrix::default_matrix(),
            GapPenalties::zero(),
            &cavity,
            &cavity,
        )
        .unwrap();

        let result = AlignmentEngine::new(&cavity, &cavity, &model, &[]);
        assert!(matches!(result, Err(EngineError::DimensionMismatch { .. })));
    }

    #[test]
    fn spacing_mismatch_is_rejected() {
        let cavity = row(&[Hydrophobic; 3]);
        let molecule = VoxelGrid::filled([2, 1, 1], Hydrophobic, 0.5).unwrap();
        let model = CompatibilityModel::new(
            &CompatibilityMatrix::default_matrix(),
            GapPenalties::zero(),
            &cavity,
            &molecule,
        )
        .unwrap();

        let result = AlignmentEngine::new(&cavity, &molecule, &model, &[Axis::X]);
        assert_eq!(
            result.err(),
            Some(EngineError::SpacingMismatch {
                cavity: 1.0,
                molecule: 0.5
            })
        );
    }

    #[test]
    fn engine_rechecks_coverage_for_new_molecule_variants() {
        let cavity = row(&[Hydrophobic, Polar]);
        let molecule = row(&[Hydrophobic]);
        let variant = row(&[ChargedPositive]);
        let model =
            CompatibilityModel::new(&hp_matrix(), GapPenalties::zero(), &cavity, &molecule).unwrap();

        let result = AlignmentEngine::new(&cavity, &variant, &model, &[Axis::X]);
        assert!(matches!(
            result,
            Err(EngineError::Compatibility(MatrixError::MissingEntry { .. }))
        ));
    }

    #[test]
    fn reused_buffer_gives_identical_scores() {
        let cavity = synthetic::layered([5, 4, 6], 1.0).unwrap();
        let molecule = synthetic::checkerboard([3, 2, 2], 1.0).unwrap();
        let model = CompatibilityModel::new(
            &CompatibilityMatrix::default_matrix(),
            GapPenalties::new(0.25, 0.75),
            &cavity,
            &molecule,
        )
        .unwrap();
        let engine = AlignmentEngine::new(&cavity, &molecule, &model, &Axis::ALL).unwrap();

        let mut buffer = SlabBuffer::new();
        let placements = [Placement::new(2, 1, 3), Placement::new(0, 0, 0), Placement::new(2, 1, 3)];
        let scores: Vec<_> = placements
            .iter()
            .map(|&p| engine.score_with(&mut buffer, p))
            .collect();

        assert_eq!(scores[0].to_bits(), scores[2].to_bits());
        assert_eq!(scores[1], engine.score(Placement::ORIGIN).unwrap());
    }
}
