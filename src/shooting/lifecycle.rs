//! Shot state machine: Idle -> Charging -> Released -> Settling -> Idle

use bevy::prelude::*;

use crate::constants::{MAX_FORCE, SETTLE_TICKS};
use crate::error::PoolError;
use crate::tuning::TableTuning;

/// Where the current turn is in the shot cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShotState {
    /// Aiming allowed; a press begins charging if the cue ball is at rest
    #[default]
    Idle,
    /// Power input accepted, aim locked
    Charging,
    /// Impulse applied this tick
    Released,
    /// Waiting for every tracked ball to come to rest
    Settling,
}

/// Why a press could not begin a charge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotRejection {
    NotIdle(ShotState),
    SessionOver,
    CueBallMoving,
    ChargeDisabled,
}

impl ShotRejection {
    pub fn into_error(self, from: ShotState) -> PoolError {
        PoolError::InvalidTransition {
            from,
            reason: self.to_string(),
        }
    }
}

impl std::fmt::Display for ShotRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShotRejection::NotIdle(state) => write!(f, "shot cycle busy ({:?})", state),
            ShotRejection::SessionOver => write!(f, "session is over"),
            ShotRejection::CueBallMoving => write!(f, "cue ball still moving"),
            ShotRejection::ChargeDisabled => write!(f, "charge input disabled"),
        }
    }
}

/// Conditions the lifecycle consults before leaving Idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeGate {
    pub cue_at_rest: bool,
    pub session_over: bool,
    pub charge_enabled: bool,
}

/// The single impulse produced by a release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotImpulse {
    pub shot: u32,
    pub direction: Vec3,
    pub force: f32,
}

/// Result of one lifecycle evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStep {
    /// Nothing changed
    Unchanged,
    /// Released -> Settling
    BeganSettling,
    /// Settling -> Idle; carries the shot number that settled
    Settled(u32),
}

/// Shot force from a normalized charge reading (1 = no power, 0 = full power)
pub fn shot_force(charge_value: f32, max_force: f32) -> f32 {
    let charge = if charge_value.is_nan() {
        1.0
    } else {
        charge_value.clamp(0.0, 1.0)
    };
    ((1.0 - charge) * max_force).clamp(0.0, max_force)
}

/// Owner of the shot state.
///
/// An impulse can only come out of `release` while Charging, and Charging can only be
/// entered from Idle, so two impulses are always separated by a completed Settling.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ShotLifecycle {
    state: ShotState,
    max_force: f32,
    settle_ticks: u32,
    rest_streak: u32,
    shots_taken: u32,
}

impl ShotLifecycle {
    pub fn new(max_force: f32, settle_ticks: u32) -> Self {
        Self {
            state: ShotState::Idle,
            max_force,
            settle_ticks,
            rest_streak: 0,
            shots_taken: 0,
        }
    }

    pub fn from_tuning(tuning: &TableTuning) -> Self {
        Self::new(tuning.max_force, tuning.settle_ticks)
    }

    pub fn state(&self) -> ShotState {
        self.state
    }

    pub fn shots_taken(&self) -> u32 {
        self.shots_taken
    }

    pub fn rest_streak(&self) -> u32 {
        self.rest_streak
    }

    pub fn max_force(&self) -> f32 {
        self.max_force
    }

    pub fn is_idle(&self) -> bool {
        self.state == ShotState::Idle
    }

    /// Aim follows the pointer only between shots
    pub fn can_aim(&self) -> bool {
        self.is_idle()
    }

    /// Idle -> Charging
    pub fn begin_charge(&mut self, gate: ChargeGate) -> Result<(), ShotRejection> {
        if self.state != ShotState::Idle {
            return Err(ShotRejection::NotIdle(self.state));
        }
        if gate.session_over {
            return Err(ShotRejection::SessionOver);
        }
        if !gate.cue_at_rest {
            return Err(ShotRejection::CueBallMoving);
        }
        if !gate.charge_enabled {
            return Err(ShotRejection::ChargeDisabled);
        }
        self.state = ShotState::Charging;
        Ok(())
    }

    /// Charging -> Released. Returns the impulse to apply, or None when there was no
    /// matching press.
    pub fn release(&mut self, charge_value: f32, aim_forward: Vec3) -> Option<ShotImpulse> {
        if self.state != ShotState::Charging {
            return None;
        }
        self.state = ShotState::Released;
        self.shots_taken += 1;
        Some(ShotImpulse {
            shot: self.shots_taken,
            direction: aim_forward.normalize_or_zero(),
            force: shot_force(charge_value, self.max_force),
        })
    }

    /// Charging -> Idle without an impulse. Returns true if a charge was dropped.
    pub fn abort_charge(&mut self) -> bool {
        if self.state != ShotState::Charging {
            return false;
        }
        self.state = ShotState::Idle;
        true
    }

    /// Per-tick evaluation. `settled` is true when every tracked ball is at rest and the
    /// cue ball is not waiting on a respawn.
    pub fn advance(&mut self, settled: bool) -> LifecycleStep {
        match self.state {
            ShotState::Released => {
                self.state = ShotState::Settling;
                self.rest_streak = 0;
                LifecycleStep::BeganSettling
            }
            ShotState::Settling => {
                if !settled {
                    self.rest_streak = 0;
                    return LifecycleStep::Unchanged;
                }
                self.rest_streak += 1;
                if self.rest_streak >= self.settle_ticks {
                    self.state = ShotState::Idle;
                    self.rest_streak = 0;
                    LifecycleStep::Settled(self.shots_taken)
                } else {
                    LifecycleStep::Unchanged
                }
            }
            ShotState::Idle | ShotState::Charging => LifecycleStep::Unchanged,
        }
    }

    /// Back to Idle for a new session
    pub fn reset(&mut self) {
        self.state = ShotState::Idle;
        self.rest_streak = 0;
        self.shots_taken = 0;
    }
}

impl Default for ShotLifecycle {
    fn default() -> Self {
        Self::new(MAX_FORCE, SETTLE_TICKS)
    }
}
