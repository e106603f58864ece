//! Toast scheduler: owns the single toasting session.
//!
//! `start` runs the inference once, derives the plan and hands it to a
//! producer thread that walks the stages with one-tick sleeps, pushing
//! events into an unbounded channel. The producer never waits on the
//! consumer. The session status is checked and set under one lock so that
//! at most one producer exists at any time.

use crate::plan::temperature_for_stage;
use crate::{
    Config, ControlInputs, Error, Result, RuleTable, SessionSnapshot, SessionStatus, ToastEvent,
    ToastingPlan,
};
use std::sync::mpsc::{self, Receiver, SendError, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// Mutable session state, only touched by the scheduler
#[derive(Debug, Default)]
struct ToastSession {
    status: SessionStatus,
    plan: Option<ToastingPlan>,
    current_stage_index: usize,
    elapsed_seconds: f64,
    cancel_requested: bool,
}

impl ToastSession {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            plan: self.plan.clone(),
            current_stage_index: self.current_stage_index,
            elapsed_seconds: self.elapsed_seconds,
        }
    }
}

/// State shared between the command side and the producer thread
#[derive(Debug, Default)]
struct Shared {
    session: Mutex<ToastSession>,
    cancelled: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ToastSession> {
        self.session.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Sleep for one tick. Returns true if a cancel arrived meanwhile.
    fn wait_tick(&self, tick: Duration) -> bool {
        let session = self.lock();
        let (session, _) = self
            .cancelled
            .wait_timeout_while(session, tick, |s| !s.cancel_requested)
            .unwrap_or_else(|p| p.into_inner());
        session.cancel_requested
    }
}

/// How a producer run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Finished,
    Cancelled,
    /// The event receiver went away
    Disconnected,
}

/// The toaster: one session, commands in, events out
#[derive(Debug)]
pub struct Toaster {
    shared: Arc<Shared>,
    events: Sender<ToastEvent>,
    rules: RuleTable,
    tick: Duration,
    strict_range: bool,
}

impl Toaster {
    /// Create an idle toaster and the receiving end of its event channel
    pub fn new(config: &Config) -> (Self, Receiver<ToastEvent>) {
        let (events, receiver) = mpsc::channel();
        let toaster = Self {
            shared: Arc::new(Shared::default()),
            events,
            rules: RuleTable::DEFAULT,
            tick: config.timing.tick(),
            strict_range: config.inputs.strict_range,
        };
        (toaster, receiver)
    }

    /// Begin a session in the background.
    ///
    /// Fails with [`Error::AlreadyRunning`] if a session is in progress; the
    /// request is dropped, not queued, and its inputs are not looked at.
    pub fn start(&self, browning: f64, bread_type: f64) -> Result<()> {
        let mut session = self.shared.lock();
        if session.status == SessionStatus::Running {
            tracing::warn!("Start rejected: a session is already running");
            return Err(Error::AlreadyRunning);
        }

        let inputs = ControlInputs::new(browning, bread_type).validate(self.strict_range)?;

        let plan = ToastingPlan::derive(inputs, &self.rules);
        tracing::info!(
            browning,
            bread_type,
            duration_seconds = plan.duration_seconds(),
            stages = ?plan.stages(),
            "Starting toast session"
        );

        let previous_status = session.status;
        session.status = SessionStatus::Running;
        session.plan = Some(plan.clone());
        session.current_stage_index = 0;
        session.elapsed_seconds = 0.0;
        session.cancel_requested = false;

        let shared = Arc::clone(&self.shared);
        let events = self.events.clone();
        let tick = self.tick;
        let spawned = thread::Builder::new()
            .name("toast-session".into())
            .spawn(move || run_session(&shared, &plan, &events, tick));

        if let Err(e) = spawned {
            session.status = previous_status;
            return Err(Error::Io(e));
        }
        Ok(())
    }

    /// Return to Idle, restoring the raw slice and a cold display.
    ///
    /// Fails with [`Error::CannotResetWhileRunning`] during a session.
    pub fn reset(&self) -> Result<()> {
        let mut session = self.shared.lock();
        if session.status == SessionStatus::Running {
            tracing::warn!("Reset rejected: a session is running");
            return Err(Error::CannotResetWhileRunning);
        }

        *session = ToastSession::default();
        tracing::info!("Toaster reset");

        // Sent under the lock so they cannot interleave with a starting session
        let _ = self.events.send(ToastEvent::StageChanged(crate::StageId::Raw));
        let _ = self.events.send(ToastEvent::Temperature(0));
        let _ = self.events.send(ToastEvent::ReadyForNextStart);
        Ok(())
    }

    /// Ask the running session to stop at the next tick.
    ///
    /// Returns false if nothing was running. When this returns true the
    /// session ends with `Cancelled` rather than `Completed`. It still ends in
    /// the Completed status, so no second producer can start before the first
    /// exits.
    pub fn cancel(&self) -> bool {
        let mut session = self.shared.lock();
        if session.status != SessionStatus::Running {
            return false;
        }
        session.cancel_requested = true;
        self.shared.cancelled.notify_all();
        tracing::info!("Cancellation requested");
        true
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.lock().snapshot()
    }

    pub fn status(&self) -> SessionStatus {
        self.shared.lock().status
    }
}

fn run_session(shared: &Shared, plan: &ToastingPlan, events: &Sender<ToastEvent>, tick: Duration) {
    let outcome = emit_stages(shared, plan, events, tick).unwrap_or(Outcome::Disconnected);
    finish_session(shared, plan, events, outcome);
}

/// Move the session to Completed and send its closing events.
///
/// Runs entirely under the session lock: a cancel accepted before this point
/// turns a finished run into a cancelled one.
fn finish_session(
    shared: &Shared,
    plan: &ToastingPlan,
    events: &Sender<ToastEvent>,
    outcome: Outcome,
) {
    let mut session = shared.lock();
    let outcome = match outcome {
        Outcome::Finished if session.cancel_requested => Outcome::Cancelled,
        other => other,
    };
    session.status = SessionStatus::Completed;
    session.cancel_requested = false;

    match outcome {
        Outcome::Finished => {
            session.elapsed_seconds = plan.duration_seconds();
            tracing::info!("Toast session complete");
            if events.send(ToastEvent::Completed).is_err() {
                return;
            }
        }
        Outcome::Cancelled => {
            tracing::info!(
                elapsed_seconds = session.elapsed_seconds,
                "Toast session cancelled"
            );
            let _ = events.send(ToastEvent::Cancelled);
        }
        Outcome::Disconnected => {
            tracing::debug!("Event receiver dropped, abandoning session");
            return;
        }
    }

    // Status is already Completed, so a consumer reacting to this can start again
    let _ = events.send(ToastEvent::ReadyForNextStart);
}

fn emit_stages(
    shared: &Shared,
    plan: &ToastingPlan,
    events: &Sender<ToastEvent>,
    tick: Duration,
) -> std::result::Result<Outcome, SendError<ToastEvent>> {
    events.send(ToastEvent::Started {
        duration_seconds: plan.duration_seconds(),
    })?;

    let ticks = plan.ticks_per_stage();
    for (index, stage) in plan.stages().iter().enumerate() {
        {
            let mut session = shared.lock();
            if session.cancel_requested {
                return Ok(Outcome::Cancelled);
            }
            session.current_stage_index = index;
        }
        tracing::debug!(index, ?stage, "Stage changed");
        events.send(ToastEvent::StageChanged(*stage))?;

        let temperature = temperature_for_stage(index);
        for seconds_left in (1..=ticks).rev() {
            if shared.wait_tick(tick) {
                return Ok(Outcome::Cancelled);
            }

            let remaining = plan.remaining_after_tick(index, seconds_left);
            shared.lock().elapsed_seconds = plan.duration_seconds() - remaining;

            events.send(ToastEvent::RemainingTime(remaining))?;
            events.send(ToastEvent::Temperature(temperature))?;
        }
    }

    Ok(Outcome::Finished)
}
