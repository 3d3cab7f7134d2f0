use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{CycleMode, PhaseKind};

/// Every externally visible scheduler transition produces an Event.
/// The presentation layer renders them; nothing is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A phase began counting down from its full duration.
    TimerStarted {
        phase_index: usize,
        kind: PhaseKind,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    /// Quad mode: the previous phase expired and the next one is already
    /// running.
    PhaseAdvanced {
        phase_index: usize,
        kind: PhaseKind,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// Manual mode: a phase ran to zero and the scheduler stopped.
    PhaseCompleted {
        phase_index: usize,
        kind: PhaseKind,
        at: DateTime<Utc>,
    },
    /// Manual mode: the work phase finished; the break is preloaded and
    /// waiting for the user to start or defer it.
    BreakReady {
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// Manual mode: the user postponed the preloaded break.
    BreakDeferred { at: DateTime<Utc> },
    /// Quad mode: the final phase of the cycle expired.
    CycleCompleted {
        completed_work_phases: u32,
        at: DateTime<Utc>,
    },
    /// Quad mode: the user closed the finished cycle without repeating it.
    CycleClosed { at: DateTime<Utc> },
    SessionReset { at: DateTime<Utc> },
    StateSnapshot {
        mode: CycleMode,
        phase_index: usize,
        plan_len: usize,
        kind: PhaseKind,
        seconds_remaining: u32,
        total_secs: u32,
        progress: f64,
        running: bool,
        awaiting_confirmation: bool,
        cycle_finished: bool,
        completed_work_phases: u32,
        at: DateTime<Utc>,
    },
}
