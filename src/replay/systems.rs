//! Replay recording and playback systems

use bevy::prelude::*;

use super::data::ReplayFrame;
use super::engine::ReplayEngine;
use crate::ball::{Ball, BallId, LinearVelocity};
use crate::clock::TableClock;
use crate::events::{EventBus, GameEvent};

/// Append this tick's kinematic state of every tracked ball
pub fn record_replay_frame(
    mut engine: ResMut<ReplayEngine>,
    balls: Query<(&BallId, &Transform, &LinearVelocity), With<Ball>>,
) {
    engine.record_tick(
        balls
            .iter()
            .map(|(id, transform, velocity)| (*id, ReplayFrame::from_transform(transform, velocity.0))),
    );
}

/// Overwrite ball kinematics from the buffers, halting every ball together at the end
pub fn play_replay_frame(
    clock: Res<TableClock>,
    mut engine: ResMut<ReplayEngine>,
    mut event_bus: ResMut<EventBus>,
    mut balls: Query<(&BallId, &mut Transform, &mut LinearVelocity), With<Ball>>,
) {
    let step = engine.playback_tick(clock.dt);

    if let Some(index) = step.index {
        for (id, mut transform, mut velocity) in &mut balls {
            match engine.frame(*id, index) {
                Ok(frame) => {
                    transform.translation = frame.position;
                    transform.rotation = frame.rotation;
                    velocity.0 = frame.linear_velocity;
                }
                Err(e) => {
                    // Untracked balls keep their pose; a short buffer stops everyone
                    if engine.buffer(*id).is_some() {
                        warn!("Replay halted for all balls: {}", e);
                        engine.cancel_playback();
                        event_bus.emit(GameEvent::ReplayFinished {
                            frames_played: engine.frames_played(),
                        });
                        return;
                    }
                }
            }
        }
    }

    if step.finished {
        info!("Replay finished after {} frames", engine.frames_played());
        event_bus.emit(GameEvent::ReplayFinished {
            frames_played: engine.frames_played(),
        });
    }
}
