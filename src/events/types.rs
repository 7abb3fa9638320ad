//! Notification types emitted by the table

use bevy::prelude::*;

use crate::ball::BallId;
use crate::pockets::PocketId;
use crate::session::SessionOutcome;
use crate::tuning::TableTuning;

/// Everything the table reports to outside collaborators (camera, audio, UI, logs)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    // === Session Events ===
    /// Session started
    SessionStart {
        session_id: String, // UUID v4
        timestamp: String,  // RFC 3339
    },
    /// Tuning snapshot (logged after session start)
    Config(TableTuning),
    /// Session ended; `message` is the text for the game-over display
    SessionEnd {
        outcome: SessionOutcome,
        score: u32,
        pocketed: u32,
        message: String,
    },

    // === Shot Events ===
    /// Charging began (aim is now locked)
    ChargeStarted { shot: u32 },
    /// Shot input refused in the current state
    ShotRejected { reason: String },
    /// Impulse applied to the cue ball
    ShotTaken {
        shot: u32,
        direction: Vec3,
        force: f32,
    },
    /// Charge dropped without a shot (session ended mid-charge)
    ChargeAborted { shot: u32 },
    /// Every tracked ball is at rest; input is open again
    AllSettled { shot: u32 },

    // === Pocket Events ===
    /// Object ball pocketed and scored
    BallPocketed {
        ball: BallId,
        pocket: PocketId,
        points: u32,
        score: u32,
    },
    /// Cue ball pocketed; respawn armed for `fire_tick`
    CueBallScratched {
        ball: BallId,
        pocket: PocketId,
        fire_tick: u64,
    },
    /// Cue ball returned to its spawn pose
    CueBallRespawned { ball: BallId },
    /// Pending respawn dropped before firing
    RespawnCancelled { ball: BallId },

    // === Replay Events ===
    RecordingStarted { balls: usize },
    RecordingStopped { frames: usize },
    ReplayStarted { frames: usize, speed: f32 },
    ReplayFinished { frames_played: usize },
}

impl GameEvent {
    /// Get the event type code for compact serialization
    pub fn type_code(&self) -> &'static str {
        match self {
            GameEvent::SessionStart { .. } => "SE",
            GameEvent::Config(_) => "CF",
            GameEvent::SessionEnd { .. } => "GO",
            GameEvent::ChargeStarted { .. } => "CS",
            GameEvent::ShotRejected { .. } => "SX",
            GameEvent::ShotTaken { .. } => "ST",
            GameEvent::ChargeAborted { .. } => "CA",
            GameEvent::AllSettled { .. } => "AS",
            GameEvent::BallPocketed { .. } => "BP",
            GameEvent::CueBallScratched { .. } => "CP",
            GameEvent::CueBallRespawned { .. } => "CR",
            GameEvent::RespawnCancelled { .. } => "RC",
            GameEvent::RecordingStarted { .. } => "R+",
            GameEvent::RecordingStopped { .. } => "R-",
            GameEvent::ReplayStarted { .. } => "P+",
            GameEvent::ReplayFinished { .. } => "P-",
        }
    }

    /// Variant name, used by scenario expectations
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::SessionStart { .. } => "SessionStart",
            GameEvent::Config(_) => "Config",
            GameEvent::SessionEnd { .. } => "SessionEnd",
            GameEvent::ChargeStarted { .. } => "ChargeStarted",
            GameEvent::ShotRejected { .. } => "ShotRejected",
            GameEvent::ShotTaken { .. } => "ShotTaken",
            GameEvent::ChargeAborted { .. } => "ChargeAborted",
            GameEvent::AllSettled { .. } => "AllSettled",
            GameEvent::BallPocketed { .. } => "BallPocketed",
            GameEvent::CueBallScratched { .. } => "CueBallScratched",
            GameEvent::CueBallRespawned { .. } => "CueBallRespawned",
            GameEvent::RespawnCancelled { .. } => "RespawnCancelled",
            GameEvent::RecordingStarted { .. } => "RecordingStarted",
            GameEvent::RecordingStopped { .. } => "RecordingStopped",
            GameEvent::ReplayStarted { .. } => "ReplayStarted",
            GameEvent::ReplayFinished { .. } => "ReplayFinished",
        }
    }
}
