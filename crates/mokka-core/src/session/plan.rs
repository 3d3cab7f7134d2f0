use serde::{Deserialize, Serialize};

/// Work durations offered in manual mode, in minutes.
///
/// The 1-minute entry is a short debugging duration kept alongside the
/// real choices.
pub const WORK_MINUTE_OPTIONS: [u32; 3] = [1, 25, 50];

/// Break length substituted when the selected work duration is not one of
/// [`WORK_MINUTE_OPTIONS`].
pub const DEFAULT_BREAK_SECS: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Work,
    Break,
}

/// How a session cycles between work and break phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleMode {
    /// Fixed four-phase cycle (work/break/work/break) that auto-advances
    /// without user confirmation.
    #[serde(rename = "quad")]
    FixedQuad,
    /// Single work/break pair; the break waits for explicit confirmation.
    #[serde(rename = "manual")]
    Manual,
}

/// One timed segment of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub kind: PhaseKind,
    /// Duration in seconds, fixed when the plan is built.
    pub duration_secs: u32,
}

impl Phase {
    fn work(duration_secs: u32) -> Self {
        Self {
            kind: PhaseKind::Work,
            duration_secs,
        }
    }

    fn rest(duration_secs: u32) -> Self {
        Self {
            kind: PhaseKind::Break,
            duration_secs,
        }
    }
}

/// Break length paired with a manual work duration.
///
/// Unknown durations get [`DEFAULT_BREAK_SECS`] rather than failing.
pub fn break_secs_for(work_minutes: u32) -> u32 {
    match work_minutes {
        1 => 20,
        25 => 5 * 60,
        50 => 10 * 60,
        _ => DEFAULT_BREAK_SECS,
    }
}

/// The ordered, non-empty sequence of phases for one configured session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub phases: Vec<Phase>,
}

impl Plan {
    /// Build the plan for the given mode.
    ///
    /// `work_minutes` only matters in manual mode; the quad cycle is always
    /// 25/5/25/5 regardless of it.
    pub fn build(mode: CycleMode, work_minutes: u32) -> Self {
        let phases = match mode {
            CycleMode::FixedQuad => vec![
                Phase::work(25 * 60),
                Phase::rest(5 * 60),
                Phase::work(25 * 60),
                Phase::rest(5 * 60),
            ],
            CycleMode::Manual => vec![
                Phase::work(work_minutes.saturating_mul(60)),
                Phase::rest(break_secs_for(work_minutes)),
            ],
        };
        Self { phases }
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn phase(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index)
    }

    pub fn total_secs(&self) -> u32 {
        self.phases.iter().map(|p| p.duration_secs).sum()
    }

    pub fn work_count(&self) -> usize {
        self.phases
            .iter()
            .filter(|p| p.kind == PhaseKind::Work)
            .count()
    }
}
