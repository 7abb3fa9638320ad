//! Ball-related components

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Marker for ball entities.
///
/// Position and rotation live in `Transform`; velocities are owned by the external
/// physics engine and mirrored into the velocity components each tick.
#[derive(Component, Debug, Default, Clone, Copy)]
#[require(Transform, LinearVelocity, AngularVelocity, PendingImpulse, InPlay)]
pub struct Ball;

/// Stable ball identifier (pocket triggers and replay buffers refer to balls by id)
#[derive(
    Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BallId(pub u32);

impl std::fmt::Display for BallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ball role - exactly one cue ball per table
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallRole {
    Cue,
    Object,
}

/// Linear velocity (world units per second)
#[derive(Component, Default, Debug, Clone, Copy, PartialEq)]
pub struct LinearVelocity(pub Vec3);

/// Angular velocity (radians per second around each axis)
#[derive(Component, Default, Debug, Clone, Copy, PartialEq)]
pub struct AngularVelocity(pub Vec3);

/// Impulse commanded by the table, waiting for the physics engine to consume it
#[derive(Component, Default, Debug, Clone, Copy, PartialEq)]
pub struct PendingImpulse(pub Vec3);

impl PendingImpulse {
    /// Take the accumulated impulse, leaving zero behind
    pub fn take(&mut self) -> Vec3 {
        std::mem::take(&mut self.0)
    }
}

/// False once an object ball has been pocketed; settling stops waiting on it
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InPlay(pub bool);

impl Default for InPlay {
    fn default() -> Self {
        Self(true)
    }
}
