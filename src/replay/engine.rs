//! Recording and playback of per-ball kinematic frames

use bevy::prelude::*;
use std::collections::BTreeMap;

use super::data::{ReplayBuffer, ReplayFrame};
use super::state::{KinematicAuthority, ReplayPhase, ReplaySpeed};
use crate::ball::BallId;
use crate::error::PoolError;
use crate::tuning::TableTuning;

/// Result of one playback tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTick {
    /// Frame to write to every tracked ball this tick, if any
    pub index: Option<usize>,
    /// Playback halted at the end of this tick
    pub finished: bool,
}

/// Owner of the replay buffers and the only writer of ball kinematics while playing.
///
/// Playback clock units are frames: each tick applies the frame at `floor(clock)` and
/// then advances the clock by `dt * speed`. Once the index reaches the shortest buffer
/// every ball stops together.
#[derive(Resource, Debug, Clone, Default)]
pub struct ReplayEngine {
    phase: ReplayPhase,
    buffers: BTreeMap<BallId, ReplayBuffer>,
    clock: f32,
    speed: ReplaySpeed,
    frames_played: usize,
}

impl ReplayEngine {
    pub fn new(speed: ReplaySpeed) -> Self {
        Self {
            speed,
            ..Default::default()
        }
    }

    pub fn from_tuning(tuning: &TableTuning) -> Self {
        let speed = ReplaySpeed::new(tuning.replay_speed).unwrap_or_default();
        Self::new(speed)
    }

    pub fn phase(&self) -> ReplayPhase {
        self.phase
    }

    pub fn is_recording(&self) -> bool {
        self.phase == ReplayPhase::Recording
    }

    pub fn is_playing(&self) -> bool {
        self.phase == ReplayPhase::Playing
    }

    pub fn authority(&self) -> KinematicAuthority {
        if self.is_playing() {
            KinematicAuthority::Replay
        } else {
            KinematicAuthority::Physics
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed.value()
    }

    pub fn set_speed(&mut self, value: f32) -> Result<(), PoolError> {
        self.speed.set(value)
    }

    pub fn speed_up(&mut self) {
        self.speed.speed_up();
    }

    pub fn speed_down(&mut self) {
        self.speed.speed_down();
    }

    /// Playable frame count (shortest buffer)
    pub fn frame_count(&self) -> usize {
        self.buffers.values().map(ReplayBuffer::len).min().unwrap_or(0)
    }

    pub fn tracked_balls(&self) -> impl Iterator<Item = BallId> + '_ {
        self.buffers.keys().copied()
    }

    pub fn buffer(&self, ball: BallId) -> Option<&ReplayBuffer> {
        self.buffers.get(&ball)
    }

    pub fn frames_played(&self) -> usize {
        self.frames_played
    }

    /// Frame `index` of one ball's buffer
    pub fn frame(&self, ball: BallId, index: usize) -> Result<ReplayFrame, PoolError> {
        let buffer = self.buffers.get(&ball).ok_or(PoolError::ReplayEmpty)?;
        buffer.get(index).copied().ok_or(PoolError::ReplayUnderrun {
            index,
            len: buffer.len(),
        })
    }

    /// Clear every buffer and start sampling the given balls. Cancels playback.
    pub fn start_recording(&mut self, balls: impl IntoIterator<Item = BallId>) {
        self.buffers = balls
            .into_iter()
            .map(|ball| (ball, ReplayBuffer::default()))
            .collect();
        self.clock = 0.0;
        self.frames_played = 0;
        self.phase = ReplayPhase::Recording;
    }

    /// Append one tick of samples. A tracked ball missing from `samples` repeats its
    /// previous frame so all buffers stay the same length.
    pub fn record_tick(&mut self, samples: impl IntoIterator<Item = (BallId, ReplayFrame)>) {
        if !self.is_recording() {
            return;
        }
        let mut samples: BTreeMap<BallId, ReplayFrame> = samples.into_iter().collect();
        self.buffers.retain(|ball, buffer| {
            match samples.remove(ball) {
                Some(frame) => buffer.push(frame),
                None => {
                    if !buffer.repeat_last() {
                        warn!("{} has no first replay sample, dropping it from the recording", ball);
                        return false;
                    }
                }
            }
            true
        });

        for ball in samples.keys() {
            debug!("Sample for untracked ball {} ignored", ball);
        }
    }

    /// Freeze the buffers. Returns the frame count if a recording was running.
    pub fn stop_recording(&mut self) -> Option<usize> {
        if !self.is_recording() {
            return None;
        }
        self.phase = ReplayPhase::Idle;
        Some(self.frame_count())
    }

    /// Begin playback from frame 0. Ends any recording in progress.
    pub fn replay(&mut self) -> Result<usize, PoolError> {
        if self.is_recording() {
            self.phase = ReplayPhase::Idle;
        }
        let frames = self.frame_count();
        if frames == 0 {
            return Err(PoolError::ReplayEmpty);
        }
        self.clock = 0.0;
        self.frames_played = 0;
        self.phase = ReplayPhase::Playing;
        Ok(frames)
    }

    /// Advance playback by one tick of `dt` seconds
    pub fn playback_tick(&mut self, dt: f32) -> PlaybackTick {
        if !self.is_playing() {
            return PlaybackTick {
                index: None,
                finished: false,
            };
        }

        let len = self.frame_count();
        let index = self.clock.floor() as usize;
        if index >= len {
            self.halt();
            return PlaybackTick {
                index: None,
                finished: true,
            };
        }

        self.frames_played = self.frames_played.max(index + 1);
        self.clock += dt * self.speed.value();

        let finished = self.clock.floor() as usize >= len;
        if finished {
            self.halt();
        }
        PlaybackTick {
            index: Some(index),
            finished,
        }
    }

    /// Stop playback without finishing it
    pub fn cancel_playback(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.halt();
        true
    }

    /// Drop all recorded data and return to Idle
    pub fn clear(&mut self) {
        self.buffers.clear();
        self.clock = 0.0;
        self.frames_played = 0;
        self.phase = ReplayPhase::Idle;
    }

    fn halt(&mut self) {
        self.phase = ReplayPhase::Idle;
    }
}
