use super::placement::Placement;
use serde::Serialize;
use std::cmp::Ordering;

/// A candidate placement with its alignment score.
///
/// Ordered so that the greater value is the better docking: higher score first,
/// and among equal scores the lexicographically smaller placement. `-0.0` and
/// `0.0` are equal scores. Scores are finite because matrix entries and gap
/// penalties are validated finite, and the order is total (`f64::total_cmp`), so
/// any reduction with [`ScoredPlacement::better`] picks the same winner
/// regardless of evaluation order.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoredPlacement {
    pub placement: Placement,
    pub score: f64,
}

impl ScoredPlacement {
    pub fn new(placement: Placement, score: f64) -> Self {
        Self { placement, score }
    }

    #[inline]
    pub fn better(self, other: Self) -> Self {
        if other > self { other } else { self }
    }
}

impl PartialEq for ScoredPlacement {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for ScoredPlacement {}

impl PartialOrd for ScoredPlacement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredPlacement {
    fn cmp(&self, other: &Self) -> Ordering {
        // Adding 0.0 maps -0.0 to 0.0 and leaves every other value unchanged.
        (self.score + 0.0)
            .total_cmp(&(other.score + 0.0))
            .then_with(|| other.placement.cmp(&self.placement))
    }
}
