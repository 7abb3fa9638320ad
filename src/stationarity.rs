//! Rest/motion classification for physics bodies

use bevy::prelude::*;

use crate::ball::BallBody;
use crate::constants::REST_THRESHOLD;
use crate::tuning::TableTuning;

/// Classifies bodies as at rest or moving from their linear speed.
///
/// One strict threshold serves both "has it stopped" and "was a shot taken", so the two
/// checks can never disagree about the same body. Debouncing belongs to callers.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct StationarityOracle {
    rest_threshold: f32,
}

impl StationarityOracle {
    pub fn new(rest_threshold: f32) -> Self {
        Self { rest_threshold }
    }

    pub fn from_tuning(tuning: &TableTuning) -> Self {
        Self::new(tuning.rest_threshold)
    }

    pub fn rest_threshold(&self) -> f32 {
        self.rest_threshold
    }

    /// True iff speed is strictly below the rest threshold
    pub fn is_speed_at_rest(&self, speed: f32) -> bool {
        speed < self.rest_threshold
    }

    pub fn is_velocity_at_rest(&self, velocity: Vec3) -> bool {
        self.is_speed_at_rest(velocity.length())
    }

    pub fn is_at_rest<B: BallBody + ?Sized>(&self, body: &B) -> bool {
        self.is_velocity_at_rest(body.linear_velocity())
    }

    pub fn is_moving<B: BallBody + ?Sized>(&self, body: &B) -> bool {
        !self.is_at_rest(body)
    }

    /// True when every velocity in the iterator is at rest (vacuously true when empty)
    pub fn all_at_rest(&self, velocities: impl IntoIterator<Item = Vec3>) -> bool {
        velocities.into_iter().all(|v| self.is_velocity_at_rest(v))
    }
}

impl Default for StationarityOracle {
    fn default() -> Self {
        Self::new(REST_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ball::KinematicBody;

    #[test]
    fn test_boundary_is_strict() {
        let oracle = StationarityOracle::new(1e-3);
        assert!(oracle.is_speed_at_rest(0.0));
        assert!(oracle.is_speed_at_rest(0.000_999));
        assert!(!oracle.is_speed_at_rest(1e-3));
        assert!(!oracle.is_speed_at_rest(0.5));
    }

    #[test]
    fn test_sweep_matches_threshold() {
        let oracle = StationarityOracle::default();
        for step in 0..200 {
            let speed = step as f32 * 1e-5;
            assert_eq!(oracle.is_speed_at_rest(speed), speed < REST_THRESHOLD, "speed {}", speed);
        }
    }

    #[test]
    fn test_moving_is_negation() {
        let oracle = StationarityOracle::default();
        let still = KinematicBody::default();
        let rolling = KinematicBody::moving(Vec3::new(0.0, 0.0, 0.2));

        assert!(oracle.is_at_rest(&still));
        assert!(!oracle.is_moving(&still));
        assert!(oracle.is_moving(&rolling));
    }

    #[test]
    fn test_speed_uses_full_magnitude() {
        let oracle = StationarityOracle::new(1.0);
        // Each component below threshold, magnitude above it
        assert!(!oracle.is_velocity_at_rest(Vec3::new(0.8, 0.0, 0.8)));
    }

    #[test]
    fn test_all_at_rest() {
        let oracle = StationarityOracle::default();
        assert!(oracle.all_at_rest([Vec3::ZERO; 0]));
        assert!(oracle.all_at_rest([Vec3::ZERO, Vec3::splat(1e-5)]));
        assert!(!oracle.all_at_rest([Vec3::ZERO, Vec3::X]));
    }
}
