//! Tunable defaults for the pool table
//!
//! Every gameplay value has a default here; `TableTuning` can override them from config.

use bevy::prelude::*;

// =============================================================================
// TICK
// =============================================================================

pub const TICK_RATE_HZ: f32 = 60.0; // Fixed-step rate driving every table system

// =============================================================================
// REST DETECTION
// =============================================================================

/// Linear speed strictly below this counts as at rest (single epsilon for
/// both "stopped" and "shot taken" checks)
pub const REST_THRESHOLD: f32 = 1e-3;
pub const SETTLE_TICKS: u32 = 10; // Consecutive all-at-rest ticks before Settling -> Idle

// =============================================================================
// SHOOTING
// =============================================================================

pub const MAX_FORCE: f32 = 1000.0; // Impulse magnitude at full charge
pub const SLIDER_SPRING_SPEED: f32 = 10.0; // Slider units per second back toward 1.0
pub const STICK_MOVE_DISTANCE: f32 = 0.5; // Cue stick pull-back at full charge
pub const AIM_DEFAULT_FORWARD: Vec3 = Vec3::NEG_Z;

// =============================================================================
// POCKETS
// =============================================================================

pub const POCKET_SCORE: u32 = 10; // Points for an object ball, unless the pocket overrides it
pub const RESPAWN_DELAY_SECS: f32 = 2.0;
pub const CUE_SPAWN_POSITION: Vec3 = Vec3::new(0.04, 0.8, 0.03);

// =============================================================================
// SESSION
// =============================================================================

pub const TIME_LIMIT_SECS: f32 = 180.0;
pub const MAX_POCKETED_COUNT: u32 = 7;
pub const GAME_OVER_MESSAGE: &str = "Game Over!";

/// Timer color at full time (calm green) and at zero (alarm red), sRGB
pub const TIMER_CALM_COLOR: [f32; 3] = [0.2, 0.8, 0.3];
pub const TIMER_ALARM_COLOR: [f32; 3] = [0.9, 0.15, 0.1];

// =============================================================================
// REPLAY
// =============================================================================

pub const REPLAY_SPEED: f32 = 1.0;
