//! Recorded kinematic frames

use bevy::prelude::*;

/// One ball's kinematic snapshot at a recorded tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayFrame {
    pub position: Vec3,
    pub rotation: Quat,
    pub linear_velocity: Vec3,
}

impl ReplayFrame {
    pub fn new(position: Vec3, rotation: Quat, linear_velocity: Vec3) -> Self {
        Self {
            position,
            rotation,
            linear_velocity,
        }
    }

    pub fn from_transform(transform: &Transform, linear_velocity: Vec3) -> Self {
        Self::new(transform.translation, transform.rotation, linear_velocity)
    }
}

/// Frames for one ball, in recording order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayBuffer {
    frames: Vec<ReplayFrame>,
}

impl ReplayBuffer {
    pub fn push(&mut self, frame: ReplayFrame) {
        self.frames.push(frame);
    }

    /// Append a copy of the newest frame; false if there is none to copy
    pub fn repeat_last(&mut self) -> bool {
        match self.frames.last().copied() {
            Some(frame) => {
                self.frames.push(frame);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&ReplayFrame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[ReplayFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
