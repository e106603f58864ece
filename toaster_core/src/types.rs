//! Core domain types for the toaster.
//!
//! This module defines the data shared between the inference engine,
//! the scheduler and whoever renders the emitted events:
//! - Control inputs and membership degrees
//! - Stages and the toasting plan
//! - Session status and snapshots
//! - Outbound events

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest and highest value either control input is meant to take
pub const INPUT_MIN: f64 = 0.0;
pub const INPUT_MAX: f64 = 10.0;

// ============================================================================
// Inputs
// ============================================================================

/// The two scalars supplied by the input widgets
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlInputs {
    pub browning: f64,
    pub bread_type: f64,
}

impl ControlInputs {
    pub fn new(browning: f64, bread_type: f64) -> Self {
        Self {
            browning,
            bread_type,
        }
    }

    /// Check the inputs before they reach the engine.
    ///
    /// Non-finite values are always rejected: the membership functions would
    /// otherwise fall through every comparison. Finite values outside [0, 10]
    /// are only rejected when `strict` is set; by default they degrade to zero
    /// membership and a zero-second toast.
    pub fn validate(self, strict: bool) -> Result<Self> {
        check_input("browning", self.browning, strict)?;
        check_input("bread_type", self.bread_type, strict)?;
        Ok(self)
    }
}

fn check_input(name: &'static str, value: f64, strict: bool) -> Result<()> {
    let in_range = (INPUT_MIN..=INPUT_MAX).contains(&value);
    if !value.is_finite() || (strict && !in_range) {
        return Err(Error::InvalidInputRange { name, value });
    }
    if !in_range {
        tracing::warn!("{} = {} is outside [0, 10]; it will carry no membership", name, value);
    }
    Ok(())
}

/// Degrees of membership in the three linguistic categories of one input
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MembershipTriple {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

impl MembershipTriple {
    pub fn as_array(&self) -> [f64; 3] {
        [self.low, self.mid, self.high]
    }
}

// ============================================================================
// Stages and plan
// ============================================================================

/// Visual stage of the slice; the renderer maps these to images
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    Raw,
    Light,
    Medium,
    Dark,
}

impl StageId {
    /// Asset name of the bread image shown for this stage
    pub fn image_ref(&self) -> &'static str {
        match self {
            StageId::Raw => "bread(1).png",
            StageId::Light => "bread(2).png",
            StageId::Medium => "bread(3).png",
            StageId::Dark => "bread(4).png",
        }
    }
}

/// Everything the scheduler needs to run one session.
///
/// Built once by [`ToastingPlan::derive`](crate::plan) and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToastingPlan {
    pub(crate) duration_seconds: f64,
    pub(crate) stages: Vec<StageId>,
    pub(crate) interval_seconds: f64,
}

impl ToastingPlan {
    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn stages(&self) -> &[StageId] {
        &self.stages
    }

    pub fn interval_seconds(&self) -> f64 {
        self.interval_seconds
    }
}

// ============================================================================
// Session
// ============================================================================

/// Lifecycle of the single toasting session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    Running,
    Completed,
}

/// Read-only copy of the session, handed out to callers
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub plan: Option<ToastingPlan>,
    pub current_stage_index: usize,
    pub elapsed_seconds: f64,
}

// ============================================================================
// Events
// ============================================================================

/// Events emitted by the scheduler, in order, for the renderer
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum ToastEvent {
    /// A session began and will last this long
    Started { duration_seconds: f64 },
    StageChanged(StageId),
    RemainingTime(f64),
    Temperature(i32),
    Completed,
    /// The session was stopped before its last stage finished
    Cancelled,
    /// Starting is allowed again
    ReadyForNextStart,
}

impl fmt::Display for ToastEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToastEvent::Started { duration_seconds } => {
                write!(f, "Toasting Time: {:.2} seconds", duration_seconds)
            }
            ToastEvent::StageChanged(stage) => {
                write!(f, "Stage: {:?} ({})", stage, stage.image_ref())
            }
            // Whole seconds, truncated toward zero
            ToastEvent::RemainingTime(seconds) => {
                write!(f, "Time left: {} seconds", seconds.trunc() as i64)
            }
            ToastEvent::Temperature(celsius) => write!(f, "Temperature: {} °C", celsius),
            ToastEvent::Completed => write!(f, "Toasting complete!"),
            ToastEvent::Cancelled => write!(f, "Toasting cancelled."),
            ToastEvent::ReadyForNextStart => write!(f, "Ready to toast!"),
        }
    }
}
