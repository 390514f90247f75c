//! Progress notification port
//!
//! Lets a caller observe pipeline phases without the use cases knowing
//! anything about presentation. All methods default to no-ops.

use resolve_domain::Provider;

/// Phase of one deliberation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliberationPhase {
    /// Option labeling (closed-form questions only)
    Labeling,
    /// Advocate fan-out
    Advocates,
    /// Stance classification
    Classification,
    /// Arbitration summary
    Arbitration,
}

impl DeliberationPhase {
    pub fn display_name(&self) -> &'static str {
        match self {
            DeliberationPhase::Labeling => "Option Labeling",
            DeliberationPhase::Advocates => "Advocates",
            DeliberationPhase::Classification => "Stance Classification",
            DeliberationPhase::Arbitration => "Arbitration",
        }
    }
}

impl std::fmt::Display for DeliberationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Observer for deliberation progress.
pub trait ProgressNotifier: Send + Sync {
    fn on_phase_start(&self, _phase: DeliberationPhase, _task_count: usize) {}
    fn on_advocate_complete(&self, _provider: Provider, _success: bool) {}
    fn on_phase_complete(&self, _phase: DeliberationPhase) {}
}

/// Default no-op notifier.
pub struct NoProgress;

impl ProgressNotifier for NoProgress {}
