//! Replay module - record per-ball kinematic frames and play them back.
//!
//! Recording and playback are switched by the director, never automatically. While
//! playing, the engine is the only writer of ball kinematics: the physics step and the
//! live gameplay sets are gated off by the run conditions below.

mod data;
mod engine;
mod state;
mod systems;

pub use data::{ReplayBuffer, ReplayFrame};
pub use engine::{PlaybackTick, ReplayEngine};
pub use state::{KinematicAuthority, PLAYBACK_SPEEDS, ReplayPhase, ReplaySpeed};
pub use systems::{play_replay_frame, record_replay_frame};

use bevy::prelude::*;

/// Run condition: live physics owns ball kinematics
pub fn physics_has_authority(engine: Res<ReplayEngine>) -> bool {
    engine.authority() == KinematicAuthority::Physics
}

/// Run condition: playback owns ball kinematics
pub fn replay_has_authority(engine: Res<ReplayEngine>) -> bool {
    engine.authority() == KinematicAuthority::Replay
}

/// Run condition: a recording is in progress
pub fn replay_recording(engine: Res<ReplayEngine>) -> bool {
    engine.is_recording()
}
