//! Pocket entry routing: scoring for object balls, delayed respawn for the cue ball

use bevy::prelude::*;

use super::respawn::RespawnQueue;
use super::types::{PocketEvent, PocketId, PocketValues, ZoneKind};
use crate::ball::BallId;
use crate::session::{SessionController, SessionOutcome};
use crate::tuning::TableTuning;

/// Why a pocket event had no effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PocketIgnored {
    SessionOver,
    UnknownBall,
    AlreadyInactive,
    RespawnPending,
}

/// What routing one pocket event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PocketOutcome {
    /// Object ball scored; the caller takes it out of play
    Scored {
        ball: BallId,
        pocket: PocketId,
        points: u32,
        score: u32,
        /// Set when this pocket reached the session's pocket limit
        ended: Option<SessionOutcome>,
    },
    /// Cue ball respawn armed
    RespawnScheduled {
        ball: BallId,
        pocket: PocketId,
        fire_tick: u64,
    },
    Ignored(PocketIgnored),
}

/// Routes trigger entries to the session and the respawn queue
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PocketEventRouter {
    respawn_delay_ticks: u64,
}

impl PocketEventRouter {
    pub fn new(respawn_delay_ticks: u64) -> Self {
        Self {
            respawn_delay_ticks,
        }
    }

    pub fn from_tuning(tuning: &TableTuning) -> Self {
        Self::new(tuning.respawn_delay_ticks())
    }

    pub fn respawn_delay_ticks(&self) -> u64 {
        self.respawn_delay_ticks
    }

    /// Route one event. `in_play` is the ball's current InPlay flag, or None when the
    /// ball is not on the roster.
    pub fn on_ball_entered_pocket(
        &self,
        event: PocketEvent,
        tick: u64,
        in_play: Option<bool>,
        values: &PocketValues,
        session: &mut SessionController,
        respawns: &mut RespawnQueue,
    ) -> PocketOutcome {
        let Some(in_play) = in_play else {
            return PocketOutcome::Ignored(PocketIgnored::UnknownBall);
        };
        if session.is_over() {
            return PocketOutcome::Ignored(PocketIgnored::SessionOver);
        }

        match event.kind {
            ZoneKind::ObjectBallPocket => {
                if !in_play {
                    return PocketOutcome::Ignored(PocketIgnored::AlreadyInactive);
                }
                let points = values.score(event.pocket);
                session.add_score(points);
                let ended = session.increment_pocket_count();
                PocketOutcome::Scored {
                    ball: event.ball,
                    pocket: event.pocket,
                    points,
                    score: session.score(),
                    ended,
                }
            }
            ZoneKind::CueBallPocket => {
                let fire_tick = tick + self.respawn_delay_ticks;
                if respawns.schedule(event.ball, fire_tick) {
                    PocketOutcome::RespawnScheduled {
                        ball: event.ball,
                        pocket: event.pocket,
                        fire_tick,
                    }
                } else {
                    PocketOutcome::Ignored(PocketIgnored::RespawnPending)
                }
            }
        }
    }
}

impl Default for PocketEventRouter {
    fn default() -> Self {
        Self::from_tuning(&TableTuning::default())
    }
}
