use crate::core::models::lattice::Axis;
use crate::core::scoring::model::GapPenalties;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("At least one slab axis is required")]
    NoAxes,
    #[error("Slab axis '{0}' is listed more than once")]
    DuplicateAxis(Axis),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentConfig {
    pub gaps: GapPenalties,
    /// Slab axes in the order their scores are accumulated.
    pub axes: Vec<Axis>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchConfig {
    /// Chebyshev bound on the translation; `None` searches every placement
    /// that keeps the molecule inside the cavity.
    pub max_translation: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DockingConfig {
    pub alignment: AlignmentConfig,
    pub search: SearchConfig,
    /// Keep the winning placement's alignment trace for score decomposition.
    pub retain_trace: bool,
}

#[derive(Default)]
pub struct DockingConfigBuilder {
    gaps: Option<GapPenalties>,
    axes: Option<Vec<Axis>>,
    max_translation: Option<i64>,
    retain_trace: bool,
}

impl DockingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gap_penalties(mut self, gaps: GapPenalties) -> Self {
        self.gaps = Some(gaps);
        self
    }
    pub fn axes(mut self, axes: Vec<Axis>) -> Self {
        self.axes = Some(axes);
        self
    }
    pub fn max_translation(mut self, bound: i64) -> Self {
        self.max_translation = Some(bound);
        self
    }
    pub fn retain_trace(mut self, retain: bool) -> Self {
        self.retain_trace = retain;
        self
    }

    pub fn build(self) -> Result<DockingConfig, ConfigError> {
        let axes = self.axes.unwrap_or_else(|| vec![Axis::X]);
        if axes.is_empty() {
            return Err(ConfigError::NoAxes);
        }
        for (n, axis) in axes.iter().enumerate() {
            if axes[..n].contains(axis) {
                return Err(ConfigError::DuplicateAxis(*axis));
            }
        }

        Ok(DockingConfig {
            alignment: AlignmentConfig {
                gaps: self
                    .gaps
                    .ok_or(ConfigError::MissingParameter("gap_penalties"))?,
                axes,
            },
            search: SearchConfig {
                max_translation: self.max_translation,
            },
            retain_trace: self.retain_trace,
        })
    }
}
