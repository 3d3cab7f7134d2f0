mod plan;
mod scheduler;

pub use plan::{
    break_secs_for, CycleMode, Phase, PhaseKind, Plan, DEFAULT_BREAK_SECS, WORK_MINUTE_OPTIONS,
};
pub use scheduler::{SessionScheduler, SessionSettings, SessionState};

/// Render a second count as `MM:SS`.
pub fn format_clock(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
