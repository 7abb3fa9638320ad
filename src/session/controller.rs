//! Session state: score, pocket count, timer, end detection

use bevy::prelude::*;

use crate::constants::{GAME_OVER_MESSAGE, MAX_POCKETED_COUNT, TIME_LIMIT_SECS};
use crate::tuning::TableTuning;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionOutcome {
    /// Pocket limit reached
    Cleared,
    /// Timer ran out
    TimeUp,
}

/// Snapshot of one session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionState {
    pub score: u32,
    pub pocketed_count: u32,
    pub time_remaining: f32,
    pub is_over: bool,
}

/// Sole owner of `SessionState`.
///
/// Score and pocket count only grow until the next `start`; `is_over` flips once per
/// session and freezes everything after it.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SessionController {
    state: SessionState,
    time_limit: f32,
    max_pocketed_count: u32,
    running: bool,
    outcome: Option<SessionOutcome>,
    /// Outcome not yet picked up by the session systems
    unreported_end: Option<SessionOutcome>,
}

impl SessionController {
    pub fn new(time_limit: f32, max_pocketed_count: u32) -> Self {
        Self {
            state: SessionState {
                score: 0,
                pocketed_count: 0,
                time_remaining: time_limit,
                is_over: false,
            },
            time_limit,
            max_pocketed_count,
            running: false,
            outcome: None,
            unreported_end: None,
        }
    }

    pub fn from_tuning(tuning: &TableTuning) -> Self {
        Self::new(tuning.time_limit_secs, tuning.max_pocketed_count)
    }

    /// Reset counters and start the timer
    pub fn start(&mut self) {
        self.state = SessionState {
            score: 0,
            pocketed_count: 0,
            time_remaining: self.time_limit,
            is_over: false,
        };
        self.outcome = None;
        self.unreported_end = None;
        self.running = true;
    }

    /// Advance the timer. Returns the outcome on the call that ends the session.
    pub fn tick(&mut self, dt: f32) -> Option<SessionOutcome> {
        if !self.running || self.state.is_over {
            return None;
        }
        self.state.time_remaining = (self.state.time_remaining - dt.max(0.0)).max(0.0);
        self.check_end()
    }

    pub fn add_score(&mut self, points: u32) {
        if self.state.is_over {
            return;
        }
        self.state.score = self.state.score.saturating_add(points);
    }

    /// Count a pocketed object ball. Returns the outcome if this pocket ended the session.
    pub fn increment_pocket_count(&mut self) -> Option<SessionOutcome> {
        if self.state.is_over {
            return None;
        }
        self.state.pocketed_count += 1;
        self.check_end()
    }

    fn check_end(&mut self) -> Option<SessionOutcome> {
        let outcome = if self.state.pocketed_count >= self.max_pocketed_count {
            SessionOutcome::Cleared
        } else if self.state.time_remaining <= 0.0 {
            SessionOutcome::TimeUp
        } else {
            return None;
        };
        self.state.is_over = true;
        self.running = false;
        self.outcome = Some(outcome);
        self.unreported_end = Some(outcome);
        Some(outcome)
    }

    /// Hand the end of the session to whoever reacts to it, once
    pub fn take_unreported_end(&mut self) -> Option<SessionOutcome> {
        self.unreported_end.take()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn pocketed_count(&self) -> u32 {
        self.state.pocketed_count
    }

    pub fn time_remaining(&self) -> f32 {
        self.state.time_remaining
    }

    pub fn time_limit(&self) -> f32 {
        self.time_limit
    }

    pub fn max_pocketed_count(&self) -> u32 {
        self.max_pocketed_count
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    pub fn game_over_message(&self) -> Option<&'static str> {
        self.state.is_over.then_some(GAME_OVER_MESSAGE)
    }

    /// Remaining time as "MM:SS"
    pub fn timer_string(&self) -> String {
        timer_string(self.state.time_remaining)
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(TIME_LIMIT_SECS, MAX_POCKETED_COUNT)
    }
}

/// Format seconds as "MM:SS" (both fields floored)
pub fn timer_string(seconds: f32) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u32;
    let secs = (seconds % 60.0).floor() as u32;
    format!("{:02}:{:02}", minutes, secs)
}
