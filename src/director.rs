//! Director commands: session restart and replay control from outside the table

use bevy::prelude::*;
use std::collections::VecDeque;

use crate::ball::{Ball, InPlay, TableRoster};
use crate::events::{EventBus, GameEvent};
use crate::input::PointerInput;
use crate::pockets::{PocketInbox, RespawnQueue};
use crate::replay::ReplayEngine;
use crate::session::{GameOverBanner, SessionController, session_start_event};
use crate::shooting::{CueControls, ShotLifecycle};

/// A request from the external director
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DirectorCommand {
    RestartSession,
    StartRecording,
    StopRecording,
    Replay,
    SetReplaySpeed(f32),
    SpeedUp,
    SpeedDown,
}

/// Commands queued between ticks, applied in order at the start of the next tick
#[derive(Resource, Debug, Default)]
pub struct DirectorQueue {
    commands: VecDeque<DirectorCommand>,
}

impl DirectorQueue {
    pub fn push(&mut self, command: DirectorCommand) {
        self.commands.push_back(command);
    }

    pub fn pop(&mut self) -> Option<DirectorCommand> {
        self.commands.pop_front()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Apply every queued director command
#[allow(clippy::too_many_arguments)]
pub fn apply_director_commands(
    mut queue: ResMut<DirectorQueue>,
    roster: Res<TableRoster>,
    mut session: ResMut<SessionController>,
    mut respawns: ResMut<RespawnQueue>,
    mut lifecycle: ResMut<ShotLifecycle>,
    mut controls: ResMut<CueControls>,
    mut engine: ResMut<ReplayEngine>,
    mut inbox: ResMut<PocketInbox>,
    mut input: ResMut<PointerInput>,
    mut banner: ResMut<GameOverBanner>,
    mut event_bus: ResMut<EventBus>,
    mut balls: Query<&mut InPlay, With<Ball>>,
) {
    while let Some(command) = queue.pop() {
        match command {
            DirectorCommand::RestartSession => {
                for ball in respawns.cancel_all() {
                    event_bus.emit(GameEvent::RespawnCancelled { ball });
                }
                for mut in_play in &mut balls {
                    in_play.0 = true;
                }
                lifecycle.reset();
                controls.reset();
                engine.clear();
                inbox.clear();
                *input = PointerInput::default();
                banner.0 = None;

                session.start();
                info!("Session restarted");
                event_bus.emit(session_start_event());
            }
            DirectorCommand::StartRecording => {
                if engine.is_playing() {
                    debug!("Playback cancelled by new recording");
                }
                engine.start_recording(roster.ids());
                info!("Recording {} balls", roster.len());
                event_bus.emit(GameEvent::RecordingStarted {
                    balls: roster.len(),
                });
            }
            DirectorCommand::StopRecording => match engine.stop_recording() {
                Some(frames) => {
                    info!("Recording stopped: {} frames", frames);
                    event_bus.emit(GameEvent::RecordingStopped { frames });
                }
                None => debug!("StopRecording with no recording running"),
            },
            DirectorCommand::Replay => {
                if let Some(frames) = engine.stop_recording() {
                    event_bus.emit(GameEvent::RecordingStopped { frames });
                }
                match engine.replay() {
                    Ok(frames) => {
                        info!("Replaying {} frames at {}", frames, engine.speed());
                        event_bus.emit(GameEvent::ReplayStarted {
                            frames,
                            speed: engine.speed(),
                        });
                    }
                    Err(e) => warn!("Replay refused: {}", e),
                }
            }
            DirectorCommand::SetReplaySpeed(speed) => {
                if let Err(e) = engine.set_speed(speed) {
                    warn!("Replay speed unchanged: {}", e);
                }
            }
            DirectorCommand::SpeedUp => engine.speed_up(),
            DirectorCommand::SpeedDown => engine.speed_down(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = DirectorQueue::default();
        queue.push(DirectorCommand::StartRecording);
        queue.push(DirectorCommand::SetReplaySpeed(2.0));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(DirectorCommand::StartRecording));
        assert_eq!(queue.pop(), Some(DirectorCommand::SetReplaySpeed(2.0)));
        assert!(queue.is_empty());
    }
}
