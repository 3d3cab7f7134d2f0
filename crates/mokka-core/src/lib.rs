//! # Mokka Core Library
//!
//! Core business logic for Mokka, a Pomodoro-style session timer. The
//! library is CLI-first: everything observable about a session is exposed
//! through [`SessionScheduler`] and its [`Event`]s, and any frontend is a
//! thin presentation layer that owns the 1-second clock source and
//! dispatches user commands.
//!
//! ## Architecture
//!
//! - **Session scheduler**: a tick-driven state machine; the caller
//!   delivers `tick()` once per second while the countdown runs
//! - **Plans**: the ordered work/break phase sequence built from a cycle
//!   mode and a manual duration choice
//! - **Storage**: TOML-based configuration (no session history is
//!   persisted; all run state lives in memory)
//!
//! ## Key Components
//!
//! - [`SessionScheduler`]: countdown state machine and transition policy
//! - [`Plan`]: phase sequence construction
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod session;
pub mod storage;

pub use error::{ConfigError, CoreError, Result};
pub use events::Event;
pub use session::{
    break_secs_for, format_clock, CycleMode, Phase, PhaseKind, Plan, SessionScheduler,
    SessionSettings, SessionState, DEFAULT_BREAK_SECS, WORK_MINUTE_OPTIONS,
};
pub use storage::Config;
