//! Stage and timing derivation for a toasting session.

use crate::{RuleTable, ControlInputs, StageId, ToastingPlan};

/// Browning at or below this stays light
pub const LIGHT_THRESHOLD: f64 = 3.0;
/// Browning above this goes dark
pub const DARK_THRESHOLD: f64 = 7.0;

pub const BASE_TEMPERATURE_C: i32 = 150;
pub const TEMPERATURE_STEP_C: i32 = 30;

/// Visual stages for a browning level.
///
/// Always four entries; lighter toast repeats its last stage.
pub fn stages_for_browning(browning: f64) -> Vec<StageId> {
    use StageId::*;

    if browning <= LIGHT_THRESHOLD {
        vec![Raw, Light, Light, Light]
    } else if browning <= DARK_THRESHOLD {
        vec![Raw, Light, Medium, Medium]
    } else {
        vec![Raw, Light, Medium, Dark]
    }
}

/// Temperature reported while in stage `index`
pub fn temperature_for_stage(index: usize) -> i32 {
    BASE_TEMPERATURE_C + TEMPERATURE_STEP_C * index as i32
}

impl ToastingPlan {
    /// Infer the duration and lay it out over the stages
    pub fn derive(inputs: ControlInputs, rules: &RuleTable) -> Self {
        let duration_seconds = rules.infer(inputs).duration_seconds;
        Self::from_duration(inputs.browning, duration_seconds)
    }

    /// Split a known duration evenly across the stages for `browning`
    pub fn from_duration(browning: f64, duration_seconds: f64) -> Self {
        let stages = stages_for_browning(browning);
        let interval_seconds = duration_seconds / stages.len() as f64;
        Self {
            duration_seconds,
            stages,
            interval_seconds,
        }
    }

    /// Countdown ticks per stage; fractions of a second are not ticked
    pub fn ticks_per_stage(&self) -> u64 {
        self.interval_seconds.floor() as u64
    }

    /// Time left after the tick where `seconds_left` of stage `index` remained
    pub fn remaining_after_tick(&self, index: usize, seconds_left: u64) -> f64 {
        self.duration_seconds
            - (index as f64 * self.interval_seconds
                + (self.interval_seconds - seconds_left as f64))
    }
}
