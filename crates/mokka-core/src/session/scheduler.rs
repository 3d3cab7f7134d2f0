//! Session scheduler implementation.
//!
//! The scheduler is a tick-driven state machine. It has no clock of its
//! own - the presentation layer owns a 1-second tick source and must stop
//! it entirely while the countdown is paused, rather than delivering ticks
//! that would be ignored.
//!
//! ## State transitions
//!
//! ```text
//! Manual: Idle(work) -> Running(work) -> AwaitingConfirmation
//!         -> Running(break) -> Idle(work)
//! Quad:   Idle -> Running(phase 0..=3, auto-chained) -> CycleFinished
//!         -> repeat | parked
//! ```
//!
//! All out-of-contract calls are silent no-ops returning `None`; the
//! scheduler raises no errors.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::plan::{CycleMode, PhaseKind, Plan};
use crate::events::Event;

/// The configuration inputs a plan is built from. Stored so `reset()` and
/// cycle repeat can rebuild the same plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub mode: CycleMode,
    /// Work duration in minutes, used only in manual mode.
    pub work_minutes: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            mode: CycleMode::FixedQuad,
            work_minutes: 25,
        }
    }
}

/// The run state of one session. Mutated only by [`SessionScheduler`]
/// operations; presentation code reads it and dispatches commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub plan: Plan,
    pub phase_index: usize,
    pub seconds_remaining: u32,
    pub running: bool,
    /// Work phases brought to zero since the scheduler was created.
    /// Survives reconfiguration and reset within one app run.
    pub completed_work_phases: u32,
    /// Manual mode only: a work phase finished and the break is preloaded,
    /// waiting for the user to start or defer it.
    pub awaiting_confirmation: bool,
    /// Quad mode only: the final phase of the cycle finished.
    pub cycle_finished: bool,
}

/// Owns one [`SessionState`] and encapsulates the phase-transition policy,
/// so presentation code never decides what happens next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionScheduler {
    settings: SessionSettings,
    state: SessionState,
}

impl SessionScheduler {
    pub fn new(settings: SessionSettings) -> Self {
        let plan = Plan::build(settings.mode, settings.work_minutes);
        let seconds_remaining = plan.phase(0).map(|p| p.duration_secs).unwrap_or(0);
        Self {
            settings,
            state: SessionState {
                plan,
                phase_index: 0,
                seconds_remaining,
                running: false,
                completed_work_phases: 0,
                awaiting_confirmation: false,
                cycle_finished: false,
            },
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.state
            .plan
            .phase(self.state.phase_index)
            .map(|p| p.kind)
            .unwrap_or(PhaseKind::Work)
    }

    /// Full duration of the current phase in seconds.
    pub fn total_secs(&self) -> u32 {
        self.state
            .plan
            .phase(self.state.phase_index)
            .map(|p| p.duration_secs)
            .unwrap_or(0)
    }

    /// 0.0 ..= 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.state.seconds_remaining as f64 / total as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.settings.mode,
            phase_index: self.state.phase_index,
            plan_len: self.state.plan.len(),
            kind: self.phase_kind(),
            seconds_remaining: self.state.seconds_remaining,
            total_secs: self.total_secs(),
            progress: self.phase_progress(),
            running: self.state.running,
            awaiting_confirmation: self.state.awaiting_confirmation,
            cycle_finished: self.state.cycle_finished,
            completed_work_phases: self.state.completed_work_phases,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Rebuild the plan from new settings and park at phase 0, paused.
    ///
    /// The completed-work counter survives; everything else resets.
    pub fn configure(&mut self, mode: CycleMode, work_minutes: u32) {
        self.settings = SessionSettings { mode, work_minutes };
        let plan = Plan::build(mode, work_minutes);
        let seconds_remaining = plan.phase(0).map(|p| p.duration_secs).unwrap_or(0);
        self.state = SessionState {
            plan,
            phase_index: 0,
            seconds_remaining,
            running: false,
            completed_work_phases: self.state.completed_work_phases,
            awaiting_confirmation: false,
            cycle_finished: false,
        };
    }

    /// Flip between running and paused.
    ///
    /// No-op while a confirmation is pending or the cycle is finished;
    /// those states are left via their dedicated operations.
    pub fn toggle_running(&mut self) -> Option<Event> {
        if self.state.awaiting_confirmation || self.state.cycle_finished {
            return None;
        }
        self.state.running = !self.state.running;
        let at = Utc::now();
        if !self.state.running {
            return Some(Event::TimerPaused {
                seconds_remaining: self.state.seconds_remaining,
                at,
            });
        }
        if self.state.seconds_remaining == self.total_secs() {
            Some(Event::TimerStarted {
                phase_index: self.state.phase_index,
                kind: self.phase_kind(),
                duration_secs: self.total_secs(),
                at,
            })
        } else {
            Some(Event::TimerResumed {
                seconds_remaining: self.state.seconds_remaining,
                at,
            })
        }
    }

    /// Consume one second from the external clock.
    ///
    /// Only acts while running with time left; each call assumes exactly
    /// one second has elapsed (no drift correction). The 1 -> 0 transition
    /// triggers phase expiry exactly once.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.running || self.state.seconds_remaining == 0 {
            return None;
        }
        self.state.seconds_remaining -= 1;
        if self.state.seconds_remaining == 0 {
            self.on_phase_expired()
        } else {
            None
        }
    }

    fn on_phase_expired(&mut self) -> Option<Event> {
        let expired_index = self.state.phase_index;
        let expired_kind = self.phase_kind();
        if expired_kind == PhaseKind::Work {
            self.state.completed_work_phases += 1;
        }
        let at = Utc::now();
        match self.settings.mode {
            CycleMode::FixedQuad => {
                if expired_index + 1 < self.state.plan.len() {
                    // Auto-chain: the next phase starts without user action.
                    self.load_phase(expired_index + 1);
                    Some(Event::PhaseAdvanced {
                        phase_index: self.state.phase_index,
                        kind: self.phase_kind(),
                        duration_secs: self.state.seconds_remaining,
                        at,
                    })
                } else {
                    self.state.running = false;
                    self.state.cycle_finished = true;
                    Some(Event::CycleCompleted {
                        completed_work_phases: self.state.completed_work_phases,
                        at,
                    })
                }
            }
            CycleMode::Manual => match expired_kind {
                PhaseKind::Work => {
                    // Preload the break but wait for confirmation.
                    self.state.running = false;
                    self.state.awaiting_confirmation = true;
                    self.load_phase(expired_index + 1);
                    Some(Event::BreakReady {
                        duration_secs: self.state.seconds_remaining,
                        at,
                    })
                }
                PhaseKind::Break => {
                    // Wrap back to the work phase, paused.
                    self.state.running = false;
                    self.load_phase(0);
                    Some(Event::PhaseCompleted {
                        phase_index: expired_index,
                        kind: expired_kind,
                        at,
                    })
                }
            },
        }
    }

    fn load_phase(&mut self, index: usize) {
        self.state.phase_index = index;
        self.state.seconds_remaining = self
            .state
            .plan
            .phase(index)
            .map(|p| p.duration_secs)
            .unwrap_or(0);
    }

    /// Start the preloaded break. Only valid while a confirmation is
    /// pending.
    pub fn confirm_start_next_phase(&mut self) -> Option<Event> {
        if !self.state.awaiting_confirmation {
            return None;
        }
        self.state.awaiting_confirmation = false;
        self.state.running = true;
        Some(Event::TimerStarted {
            phase_index: self.state.phase_index,
            kind: self.phase_kind(),
            duration_secs: self.state.seconds_remaining,
            at: Utc::now(),
        })
    }

    /// Postpone the preloaded break, leaving it startable later via
    /// [`Self::toggle_running`].
    pub fn defer_next_phase(&mut self) -> Option<Event> {
        if !self.state.awaiting_confirmation {
            return None;
        }
        self.state.awaiting_confirmation = false;
        Some(Event::BreakDeferred { at: Utc::now() })
    }

    /// Close the cycle-finished dialog state. `repeat` restarts the same
    /// plan, paused at phase 0; otherwise the state stays parked at the
    /// end of the plan.
    pub fn acknowledge_cycle_complete(&mut self, repeat: bool) -> Option<Event> {
        if !self.state.cycle_finished {
            return None;
        }
        if repeat {
            let SessionSettings { mode, work_minutes } = self.settings;
            self.configure(mode, work_minutes);
            Some(Event::SessionReset { at: Utc::now() })
        } else {
            self.state.cycle_finished = false;
            Some(Event::CycleClosed { at: Utc::now() })
        }
    }

    /// Rebuild the current plan from the stored settings.
    pub fn reset(&mut self) -> Option<Event> {
        let SessionSettings { mode, work_minutes } = self.settings;
        self.configure(mode, work_minutes);
        Some(Event::SessionReset { at: Utc::now() })
    }
}
