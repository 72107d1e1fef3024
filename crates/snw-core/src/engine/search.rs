use super::alignment::{AlignmentEngine, SlabBuffer};
use super::config::SearchConfig;
use super::error::{EngineError, SearchBoundsError};
use super::placement::{Placement, enumerate_placements};
use super::progress::{Progress, ProgressReporter};
use super::state::ScoredPlacement;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    pub best: ScoredPlacement,
    pub candidates_evaluated: usize,
}

/// Exhaustive search over rigid translations of the molecule grid.
pub struct PlacementSearch<'e, 'a> {
    engine: &'e AlignmentEngine<'a>,
    max_translation: Option<i64>,
}

impl<'e, 'a> PlacementSearch<'e, 'a> {
    pub fn new(engine: &'e AlignmentEngine<'a>, config: &SearchConfig) -> Self {
        Self {
            engine,
            max_translation: config.max_translation,
        }
    }

    pub fn candidates(&self) -> Result<Vec<Placement>, SearchBoundsError> {
        enumerate_placements(
            self.engine.cavity().dims(),
            self.engine.molecule().dims(),
            self.max_translation,
        )
    }

    /// Scores every valid placement and returns the best one.
    pub fn run(&self, reporter: &ProgressReporter) -> Result<SearchOutcome, EngineError> {
        let candidates = self.candidates()?;
        self.run_over(&candidates, reporter)
    }

    /// Scores an explicit candidate list. The winner depends only on the set of
    /// candidates, not on their order.
    #[instrument(skip_all, name = "placement_search")]
    pub fn run_over(
        &self,
        candidates: &[Placement],
        reporter: &ProgressReporter,
    ) -> Result<SearchOutcome, EngineError> {
        if candidates.is_empty() {
            return Err(SearchBoundsError::NoCandidates {
                cavity_dims: self.engine.cavity().dims(),
                molecule_dims: self.engine.molecule().dims(),
                max_translation: self.max_translation,
            }
            .into());
        }
        for &placement in candidates {
            self.engine.ensure_fits(placement)?;
        }

        info!(candidates = candidates.len(), "Searching placements.");
        reporter.report(Progress::TaskStart {
            total_steps: candidates.len() as u64,
        });

        let score_one = |buffer: &mut SlabBuffer, &placement: &Placement| {
            let score = self.engine.score_with(buffer, placement);
            reporter.report(Progress::TaskIncrement);
            ScoredPlacement::new(placement, score)
        };

        #[cfg(feature = "parallel")]
        let best = candidates
            .par_iter()
            .map_init(SlabBuffer::new, score_one)
            .reduce_with(ScoredPlacement::better);

        #[cfg(not(feature = "parallel"))]
        let best = {
            let mut buffer = SlabBuffer::new();
            candidates
                .iter()
                .map(|placement| score_one(&mut buffer, placement))
                .reduce(ScoredPlacement::better)
        };

        reporter.report(Progress::TaskFinish);

        let best = best.ok_or_else(|| SearchBoundsError::NoCandidates {
            cavity_dims: self.engine.cavity().dims(),
            molecule_dims: self.engine.molecule().dims(),
            max_translation: self.max_translation,
        })?;

        debug!(placement = %best.placement, score = best.score, "Best placement selected.");
        reporter.report(Progress::BestPlacement {
            placement: best.placement,
            score: best.score,
        });

        Ok(SearchOutcome {
            best,
            candidates_evaluated: candidates.len(),
        })
    }
}
