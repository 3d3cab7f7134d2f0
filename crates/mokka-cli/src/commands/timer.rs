//! Timer commands.
//!
//! `run` is the presentation layer from the scheduler's point of view: it
//! owns the 1-second clock, renders observable state, and translates the
//! user's answers to the break/cycle prompts into scheduler operations.

use std::io::Write as _;
use std::time::Duration;

use clap::Subcommand;
use mokka_core::{
    format_clock, Config, CycleMode, Event, PhaseKind, Plan, SessionScheduler, SessionSettings,
};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a session in the foreground, ticking once per second
    Run {
        /// Use the manual single work/break pair instead of the quad cycle
        #[arg(long)]
        manual: bool,
        /// Manual work duration in minutes (implies --manual)
        #[arg(long)]
        minutes: Option<u32>,
        /// Emit one JSON event per line instead of human-readable text
        #[arg(long)]
        json: bool,
        /// Answer prompts automatically: start breaks, do not repeat
        #[arg(long)]
        auto: bool,
    },
    /// Print the phase plan the given settings produce
    Plan {
        /// Use the manual single work/break pair instead of the quad cycle
        #[arg(long)]
        manual: bool,
        /// Manual work duration in minutes (implies --manual)
        #[arg(long)]
        minutes: Option<u32>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Drive a full session to completion without waiting
    Simulate {
        /// Use the manual single work/break pair instead of the quad cycle
        #[arg(long)]
        manual: bool,
        /// Manual work duration in minutes (implies --manual)
        #[arg(long)]
        minutes: Option<u32>,
        /// Emit one JSON event per line instead of human-readable text
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(action: TimerAction) -> CliResult {
    match action {
        TimerAction::Run {
            manual,
            minutes,
            json,
            auto,
        } => run_session(resolve_settings(manual, minutes), json, auto).await,
        TimerAction::Plan {
            manual,
            minutes,
            json,
        } => print_plan(resolve_settings(manual, minutes), json),
        TimerAction::Simulate {
            manual,
            minutes,
            json,
        } => simulate(resolve_settings(manual, minutes), json),
    }
}

/// Settings from config, overridden by flags. A duration choice only
/// exists in manual mode, so `--minutes` switches the mode as well.
fn resolve_settings(manual: bool, minutes: Option<u32>) -> SessionSettings {
    let config = Config::load_or_default();
    let mut settings = config.settings();
    if manual || minutes.is_some() {
        settings.mode = CycleMode::Manual;
    }
    if let Some(m) = minutes {
        settings.work_minutes = m;
    }
    settings
}

fn kind_label(kind: PhaseKind) -> &'static str {
    match kind {
        PhaseKind::Work => "work",
        PhaseKind::Break => "break",
    }
}

fn describe(scheduler: &SessionScheduler, event: &Event) -> String {
    let plan_len = scheduler.state().plan.len();
    match event {
        Event::TimerStarted {
            phase_index,
            kind,
            duration_secs,
            ..
        } => format!(
            "{} block {}/{} started ({})",
            kind_label(*kind),
            phase_index + 1,
            plan_len,
            format_clock(*duration_secs)
        ),
        Event::TimerPaused {
            seconds_remaining, ..
        } => format!("paused at {}", format_clock(*seconds_remaining)),
        Event::TimerResumed {
            seconds_remaining, ..
        } => format!("resumed at {}", format_clock(*seconds_remaining)),
        Event::PhaseAdvanced {
            phase_index,
            kind,
            duration_secs,
            ..
        } => format!(
            "next: {} block {}/{} ({})",
            kind_label(*kind),
            phase_index + 1,
            plan_len,
            format_clock(*duration_secs)
        ),
        Event::PhaseCompleted { kind, .. } => format!("{} block finished", kind_label(*kind)),
        Event::BreakReady { duration_secs, .. } => format!(
            "work block finished; break ready ({})",
            format_clock(*duration_secs)
        ),
        Event::BreakDeferred { .. } => "break deferred".into(),
        Event::CycleCompleted {
            completed_work_phases,
            ..
        } => format!("cycle finished; {completed_work_phases} work blocks completed"),
        Event::CycleClosed { .. } => "cycle closed".into(),
        Event::SessionReset { .. } => "session reset".into(),
        Event::StateSnapshot {
            seconds_remaining, ..
        } => format!("{} remaining", format_clock(*seconds_remaining)),
    }
}

fn emit(scheduler: &SessionScheduler, event: &Event, json: bool) -> CliResult {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        println!("{}", describe(scheduler, event));
    }
    Ok(())
}

fn render_countdown(scheduler: &SessionScheduler) -> std::io::Result<()> {
    let state = scheduler.state();
    print!(
        "\r  block {}/{}  {:<5}  {}   ",
        state.phase_index + 1,
        state.plan.len(),
        kind_label(scheduler.phase_kind()),
        format_clock(state.seconds_remaining)
    );
    std::io::stdout().flush()
}

fn clear_countdown_line() -> std::io::Result<()> {
    print!("\r{:40}\r", "");
    std::io::stdout().flush()
}

async fn confirm<R: AsyncRead + Unpin>(
    input: &mut Lines<BufReader<R>>,
    question: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    print!("{question} [y/n] ");
    std::io::stdout().flush()?;
    loop {
        let Some(line) = input.next_line().await? else {
            // stdin closed; treat as declining
            return Ok(false);
        };
        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => {
                print!("Please answer y or n: ");
                std::io::stdout().flush()?;
            }
        }
    }
}

async fn run_session(settings: SessionSettings, json: bool, auto: bool) -> CliResult {
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let scheduler = drive_session(settings, json, auto, &mut input).await?;

    if json {
        println!("{}", serde_json::to_string(&scheduler.snapshot())?);
    } else {
        println!(
            "Completed work blocks: {}",
            scheduler.state().completed_work_phases
        );
        println!(
            "Session finished at {}",
            chrono::Local::now().format("%H:%M:%S")
        );
    }
    Ok(())
}

async fn drive_session<R: AsyncRead + Unpin>(
    settings: SessionSettings,
    json: bool,
    auto: bool,
    input: &mut Lines<BufReader<R>>,
) -> Result<SessionScheduler, Box<dyn std::error::Error>> {
    let mut scheduler = SessionScheduler::new(settings);

    if let Some(event) = scheduler.toggle_running() {
        emit(&scheduler, &event, json)?;
    }

    loop {
        if scheduler.state().running {
            // The tick source exists only while the countdown runs; it is
            // dropped, not muted, whenever the scheduler stops.
            let mut clock = tokio::time::interval(Duration::from_secs(1));
            clock.tick().await; // the first tick completes immediately
            while scheduler.state().running {
                clock.tick().await;
                let event = scheduler.tick();
                if let Some(event) = event {
                    if !json {
                        clear_countdown_line()?;
                    }
                    emit(&scheduler, &event, json)?;
                } else if !json {
                    render_countdown(&scheduler)?;
                }
            }
        }

        if scheduler.state().awaiting_confirmation {
            let start_now =
                auto || confirm(input, "Work block done. Start the break now?").await?;
            let event = if start_now {
                scheduler.confirm_start_next_phase()
            } else {
                scheduler.defer_next_phase()
            };
            if let Some(event) = event {
                emit(&scheduler, &event, json)?;
            }
            if !start_now {
                print!("Press Enter to start the deferred break. ");
                std::io::stdout().flush()?;
                if input.next_line().await?.is_none() {
                    // stdin closed; leave the deferred break unstarted
                    break;
                }
                if let Some(event) = scheduler.toggle_running() {
                    emit(&scheduler, &event, json)?;
                }
            }
        } else if scheduler.state().cycle_finished {
            // Unattended runs decline the repeat so they terminate.
            let repeat =
                !auto && confirm(input, "Cycle finished (25/5/25/5). Repeat it?").await?;
            if let Some(event) = scheduler.acknowledge_cycle_complete(repeat) {
                emit(&scheduler, &event, json)?;
            }
            if repeat {
                if let Some(event) = scheduler.toggle_running() {
                    emit(&scheduler, &event, json)?;
                }
            } else {
                break;
            }
        } else {
            // Manual mode wrapped back to an idle work phase: session over.
            break;
        }
    }

    Ok(scheduler)
}

fn print_plan(settings: SessionSettings, json: bool) -> CliResult {
    let plan = Plan::build(settings.mode, settings.work_minutes);
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        for (i, phase) in plan.phases.iter().enumerate() {
            println!(
                "{}. {:<5} {}",
                i + 1,
                kind_label(phase.kind),
                format_clock(phase.duration_secs)
            );
        }
        println!("total {}", format_clock(plan.total_secs()));
    }
    Ok(())
}

/// Run the whole plan without sleeping, confirming breaks and closing the
/// finished cycle automatically. Useful for inspecting the event trace.
fn simulate(settings: SessionSettings, json: bool) -> CliResult {
    let mut scheduler = SessionScheduler::new(settings);
    if let Some(event) = scheduler.toggle_running() {
        emit(&scheduler, &event, json)?;
    }

    // One full pass over the plan, plus slack for the transitions.
    let budget = Plan::build(settings.mode, settings.work_minutes).total_secs() + 10;
    for _ in 0..budget {
        if !scheduler.state().running {
            if scheduler.state().awaiting_confirmation {
                if let Some(event) = scheduler.confirm_start_next_phase() {
                    emit(&scheduler, &event, json)?;
                }
            } else if scheduler.state().cycle_finished {
                if let Some(event) = scheduler.acknowledge_cycle_complete(false) {
                    emit(&scheduler, &event, json)?;
                }
                break;
            } else {
                break;
            }
        }
        if let Some(event) = scheduler.tick() {
            emit(&scheduler, &event, json)?;
        }
    }

    if json {
        println!("{}", serde_json::to_string(&scheduler.snapshot())?);
    } else {
        println!(
            "completed work blocks: {}",
            scheduler.state().completed_work_phases
        );
    }
    Ok(())
}
