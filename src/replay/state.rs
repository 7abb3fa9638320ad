//! Replay mode and playback speed

use crate::constants::REPLAY_SPEED;
use crate::error::PoolError;

/// Available playback speeds
pub const PLAYBACK_SPEEDS: [f32; 5] = [0.25, 0.5, 1.0, 2.0, 4.0];

/// Which mode the replay engine is in (never both)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReplayPhase {
    #[default]
    Idle,
    Recording,
    Playing,
}

/// Who writes ball kinematics this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KinematicAuthority {
    Physics,
    Replay,
}

/// Playback speed multiplier with stepping through `PLAYBACK_SPEEDS`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplaySpeed {
    value: f32,
}

impl ReplaySpeed {
    pub fn new(value: f32) -> Result<Self, PoolError> {
        let mut speed = Self::default();
        speed.set(value)?;
        Ok(speed)
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn set(&mut self, value: f32) -> Result<(), PoolError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(PoolError::InvalidConfig(format!(
                "replay speed must be finite and > 0, got {}",
                value
            )));
        }
        self.value = value;
        Ok(())
    }

    /// Increase playback speed to the next listed step
    pub fn speed_up(&mut self) {
        if let Some(next) = PLAYBACK_SPEEDS.iter().find(|s| **s > self.value) {
            self.value = *next;
        }
    }

    /// Decrease playback speed to the previous listed step
    pub fn speed_down(&mut self) {
        if let Some(prev) = PLAYBACK_SPEEDS.iter().rev().find(|s| **s < self.value) {
            self.value = *prev;
        }
    }

    /// Get formatted speed string for display
    pub fn speed_string(&self) -> String {
        format!("{:.2}x", self.value)
    }
}

impl Default for ReplaySpeed {
    fn default() -> Self {
        Self {
            value: REPLAY_SPEED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_steps_clamp_at_ends() {
        let mut speed = ReplaySpeed::default();
        speed.speed_up();
        assert_eq!(speed.value(), 2.0);
        speed.speed_up();
        speed.speed_up();
        assert_eq!(speed.value(), 4.0);

        for _ in 0..10 {
            speed.speed_down();
        }
        assert_eq!(speed.value(), 0.25);
        assert_eq!(speed.speed_string(), "0.25x");
    }

    #[test]
    fn test_off_list_speed_steps_to_neighbor() {
        let mut speed = ReplaySpeed::new(1.5).unwrap();
        speed.speed_down();
        assert_eq!(speed.value(), 1.0);

        let mut fast = ReplaySpeed::new(60.0).unwrap();
        fast.speed_up();
        assert_eq!(fast.value(), 60.0);
        fast.speed_down();
        assert_eq!(fast.value(), 4.0);
    }

    #[test]
    fn test_rejects_bad_speed() {
        assert!(ReplaySpeed::new(0.0).is_err());
        assert!(ReplaySpeed::new(f32::INFINITY).is_err());
        let mut speed = ReplaySpeed::default();
        assert!(speed.set(-1.0).is_err());
        assert_eq!(speed.value(), 1.0);
    }
}
