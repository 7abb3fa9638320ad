//! Display sinks read by the UI collaborator

use bevy::prelude::*;

use super::controller::{SessionController, timer_string};
use crate::constants::{TIMER_ALARM_COLOR, TIMER_CALM_COLOR};

/// Countdown readout: text, slider fill, and a color that turns red as time runs out
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TimerDisplay {
    pub text: String,
    /// Remaining over limit, in [0, 1]
    pub fill: f32,
    /// sRGB
    pub color: [f32; 3],
}

impl TimerDisplay {
    pub fn from_session(session: &SessionController) -> Self {
        let fill = if session.time_limit() > 0.0 {
            (session.time_remaining() / session.time_limit()).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            text: timer_string(session.time_remaining()),
            fill,
            color: timer_color(fill),
        }
    }
}

impl Default for TimerDisplay {
    fn default() -> Self {
        Self::from_session(&SessionController::default())
    }
}

/// Interpolate alarm -> calm by fill fraction
pub fn timer_color(fill: f32) -> [f32; 3] {
    let t = fill.clamp(0.0, 1.0);
    let mut color = [0.0; 3];
    for (i, channel) in color.iter_mut().enumerate() {
        *channel = TIMER_ALARM_COLOR[i] * (1.0 - t) + TIMER_CALM_COLOR[i] * t;
    }
    color
}

/// Integer score readout
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScoreDisplay(pub u32);

/// Game-over text, shown once the session ends
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct GameOverBanner(pub Option<String>);
