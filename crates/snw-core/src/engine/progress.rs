use super::placement::Placement;

#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    /// One step per candidate placement.
    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    /// The search winner, reported once after the reduction.
    BestPlacement { placement: Placement, score: f64 },
    /// A molecule of a screening batch finished docking.
    MoleculeDocked { index: usize, score: f64 },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events to an optional observer.
///
/// Search workers report concurrently, so `TaskIncrement` events arrive in no
/// particular order.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    #[inline]
    pub fn is_silent(&self) -> bool {
        self.callback.is_none()
    }
}
